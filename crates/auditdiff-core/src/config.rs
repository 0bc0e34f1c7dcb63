//! Engine options and declarative descriptor configuration
//!
//! Descriptors are usually built in code, but a whole service can also be
//! loaded from a JSON document:
//!
//! ```json
//! {
//!   "options": { "delimiter": " / ", "empty_label": "-" },
//!   "descriptor": {
//!     "name": "Order",
//!     "fields": {
//!       "title": "Title",
//!       "lines": {
//!         "name": "Order line",
//!         "kind": "array",
//!         "identity_field": "sku",
//!         "key_field": "id",
//!         "fields": { "qty": "Quantity" }
//!       }
//!     }
//!   }
//! }
//! ```

use crate::descriptor::{Descriptor, DescriptorKind, FieldMap};
use crate::errors::{AuditError, ExErrorKind, Result};
use crate::format::DefaultFormatter;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DELIMITER: &str = " -> ";
pub const DEFAULT_EMPTY_LABEL: &str = "N/A";

/// Engine-wide rendering options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Separator between label-path segments
    pub delimiter: String,
    /// Sentinel rendered for absent values
    pub empty_label: String,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            empty_label: DEFAULT_EMPTY_LABEL.to_string(),
        }
    }
}

impl DiffOptions {
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_empty_label(mut self, empty_label: impl Into<String>) -> Self {
        self.empty_label = empty_label.into();
        self
    }

    /// Empty strings fall back to the defaults
    pub(crate) fn normalized(mut self) -> Self {
        if self.delimiter.is_empty() {
            self.delimiter = DEFAULT_DELIMITER.to_string();
        }
        if self.empty_label.is_empty() {
            self.empty_label = DEFAULT_EMPTY_LABEL.to_string();
        }
        self
    }
}

/// Declarative form of a [`Descriptor`]
///
/// `fields` keeps document order. A string entry is a scalar label, an
/// object entry is a nested descriptor; anything else is logged and skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DescriptorConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    /// Identity is the scalar text of this field
    #[serde(default)]
    pub identity_field: Option<String>,
    /// Equality compares this field strictly
    #[serde(default)]
    pub key_field: Option<String>,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl DescriptorConfig {
    /// Build the descriptor tree
    ///
    /// # Errors
    ///
    /// - `UnsupportedDescriptorKind` if `kind` is not `object` or `array`
    /// - `InvalidConfig` if a nested descriptor entry does not deserialize
    pub fn build(&self) -> Result<Descriptor> {
        let kind = match self.kind.as_deref() {
            None | Some("object") => DescriptorKind::Object,
            Some("array") => DescriptorKind::Array,
            Some(other) => {
                return Err(AuditError::UnsupportedDescriptorKind {
                    kind: other.to_string(),
                })
            }
        };

        let mut map = FieldMap::new();
        for (key, entry) in &self.fields {
            match entry {
                serde_json::Value::String(label) => {
                    map = map.label(key.as_str(), label.as_str());
                }
                serde_json::Value::Object(_) => {
                    let nested: DescriptorConfig = serde_json::from_value(entry.clone())
                        .map_err(|e| AuditError::InvalidConfig {
                            reason: format!("field '{}': {}", key, e),
                        })?;
                    map = map.nested(key.as_str(), nested.build()?);
                }
                _ => {
                    let err = AuditError::MalformedFieldSpec { key: key.clone() };
                    tracing::warn!(
                        path = key.as_str(),
                        descriptor = self.name.as_deref().unwrap_or(""),
                        err_code = ExErrorKind::MalformedFieldSpec.code(),
                        "{}; skipped",
                        err
                    );
                }
            }
        }

        let mut descriptor = Descriptor::new(map, kind);
        if let Some(name) = &self.name {
            descriptor = descriptor.named(name.as_str());
        }
        if let Some(field) = &self.identity_field {
            descriptor = descriptor.with_identity_field(field.as_str());
        }
        if let Some(field) = &self.key_field {
            descriptor = descriptor.with_key_field(field.as_str());
        }
        Ok(descriptor)
    }
}

/// Complete service configuration document
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub options: DiffOptions,
    #[serde(default)]
    pub format: DefaultFormatter,
    pub descriptor: DescriptorConfig,
}
