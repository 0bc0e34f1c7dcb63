//! Display rendering of leaf values
//!
//! Rendering is pluggable: the engine only decides *whether* a value changed
//! and asks a [`ValueFormatter`] how to show it.

use crate::errors::{AuditError, Result};
use crate::value::Value;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Renders leaf values into change-record text
pub trait ValueFormatter: Send + Sync {
    fn format_timestamp(&self, ts: &DateTime<Utc>) -> String;

    fn format_bool(&self, value: bool) -> String;

    /// Render any non-null value
    fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::Bool(b) => self.format_bool(*b),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Str(s) => s.clone(),
            Value::Timestamp(ts) => self.format_timestamp(ts),
            Value::Array(_) | Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
        }
    }
}

/// Locale-style rendering: `2/1/2019, 12:00:00 AM`, `Checked`/`Unchecked`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultFormatter {
    /// chrono `strftime` pattern
    pub timestamp_format: String,
    pub checked_label: String,
    pub unchecked_label: String,
}

impl Default for DefaultFormatter {
    fn default() -> Self {
        Self {
            timestamp_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            checked_label: "Checked".to_string(),
            unchecked_label: "Unchecked".to_string(),
        }
    }
}

impl DefaultFormatter {
    /// Reject `strftime` patterns chrono cannot render
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` naming the offending pattern
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(AuditError::InvalidConfig {
                reason: format!("invalid timestamp_format '{}'", self.timestamp_format),
            });
        }
        Ok(())
    }
}

impl ValueFormatter for DefaultFormatter {
    /// A pattern that fails to render falls back to RFC 3339
    fn format_timestamp(&self, ts: &DateTime<Utc>) -> String {
        let mut text = String::new();
        match write!(text, "{}", ts.format(&self.timestamp_format)) {
            Ok(()) => text,
            Err(_) => ts.to_rfc3339(),
        }
    }

    fn format_bool(&self, value: bool) -> String {
        if value {
            self.checked_label.clone()
        } else {
            self.unchecked_label.clone()
        }
    }
}
