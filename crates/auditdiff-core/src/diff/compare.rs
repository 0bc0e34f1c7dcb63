//! Leaf value comparison.
//!
//! Temporal values compare by their rendered form, booleans by value with
//! `Checked`/`Unchecked` text, and everything else by strict equality.
//! Absent values render as the empty-label sentinel.

use crate::diff::model::{ChangeRecord, Comparison, RenderFailure};
use crate::errors::AuditError;
use crate::format::ValueFormatter;
use crate::reference::ReferenceDetector;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// String layouts accepted opposite a timestamp, after RFC 3339
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const NAIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Everything a leaf comparison needs from the service
pub struct ValueComparer<'a> {
    pub formatter: &'a dyn ValueFormatter,
    pub references: Option<&'a dyn ReferenceDetector>,
    pub empty_label: &'a str,
}

impl ValueComparer<'_> {
    /// Compare two leaf values
    pub fn compare(
        &self,
        new: Option<&Value>,
        old: Option<&Value>,
        path: &str,
        label: &str,
    ) -> Comparison {
        let new = Value::present(new);
        let old = Value::present(old);

        if self.is_reference(new) || self.is_reference(old) {
            tracing::debug!(path, label, "reference value; comparison skipped");
            return Comparison::Unchanged;
        }

        let rendered = if is_timestamp(new) || is_timestamp(old) {
            self.compare_temporal(new, old, path)
        } else {
            Ok(self.compare_strict(new, old))
        };

        match rendered {
            Ok(None) => Comparison::Unchanged,
            Ok(Some((old_text, new_text))) => {
                Comparison::Changed(ChangeRecord::new(label, path, old_text, new_text))
            }
            Err(error) => Comparison::RenderFailed(RenderFailure {
                label: label.to_string(),
                path: path.to_string(),
                error,
            }),
        }
    }

    /// Only composite values are candidates for reference detection
    fn is_reference(&self, value: Option<&Value>) -> bool {
        match (self.references, value) {
            (Some(detector), Some(v)) if v.is_composite() => detector.is_reference(v),
            _ => false,
        }
    }

    fn compare_temporal(
        &self,
        new: Option<&Value>,
        old: Option<&Value>,
        path: &str,
    ) -> Result<Option<(String, String)>, AuditError> {
        let new_text = self.render_timestamp(to_timestamp(new, path)?);
        let old_text = self.render_timestamp(to_timestamp(old, path)?);
        Ok((new_text != old_text).then_some((old_text, new_text)))
    }

    /// Booleans and all other scalars; bools render through the formatter
    fn compare_strict(
        &self,
        new: Option<&Value>,
        old: Option<&Value>,
    ) -> Option<(String, String)> {
        if new == old {
            return None;
        }
        Some((self.render(old), self.render(new)))
    }

    fn render(&self, value: Option<&Value>) -> String {
        match value {
            Some(v) => self.formatter.format_value(v),
            None => self.empty_label.to_string(),
        }
    }

    fn render_timestamp(&self, ts: Option<DateTime<Utc>>) -> String {
        match ts {
            Some(ts) => self.formatter.format_timestamp(&ts),
            None => self.empty_label.to_string(),
        }
    }
}

fn is_timestamp(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Timestamp(_)))
}

/// Coerce the counterpart of a timestamp; strings are parsed, integers are
/// epoch milliseconds
fn to_timestamp(value: Option<&Value>, path: &str) -> Result<Option<DateTime<Utc>>, AuditError> {
    let invalid = |input: String| AuditError::InvalidTemporal {
        path: path.to_string(),
        input,
    };
    match value {
        None => Ok(None),
        Some(Value::Timestamp(ts)) => Ok(Some(*ts)),
        Some(Value::Str(s)) => parse_timestamp(s).map(Some).ok_or_else(|| invalid(s.clone())),
        Some(Value::Int(ms)) => Utc
            .timestamp_millis_opt(*ms)
            .single()
            .map(Some)
            .ok_or_else(|| invalid(ms.to_string())),
        Some(other) => Err(invalid(other.type_name().to_string())),
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, NAIVE_DATE_FORMAT)
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
}
