//! Opaque reference detection
//!
//! A field holding a reference to an externally stored entity (a foreign-key
//! token, an unpopulated document id) must not be mistaken for an embedded
//! object. The engine asks a [`ReferenceDetector`] before recursing into an
//! object-typed field or comparing composite leaves, and treats flagged
//! values as unchanged.

use crate::value::Value;

/// Predicate recognising opaque reference values
pub trait ReferenceDetector: Send + Sync {
    fn is_reference(&self, value: &Value) -> bool;
}

impl<F> ReferenceDetector for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn is_reference(&self, value: &Value) -> bool {
        self(value)
    }
}

/// Flags 24-hex-digit document ids, bare or in extended-JSON `{"$oid": ..}` form
///
/// # Example
/// ```
/// use auditdiff_core::reference::{ObjectIdDetector, ReferenceDetector};
/// use auditdiff_core::Value;
///
/// let detector = ObjectIdDetector;
/// assert!(detector.is_reference(&Value::from("5c8f8f8f8f8f8f8f8f8f8f8f")));
/// assert!(!detector.is_reference(&Value::from("not-an-id")));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdDetector;

impl ObjectIdDetector {
    pub fn is_object_id(text: &str) -> bool {
        text.len() == 24 && text.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl ReferenceDetector for ObjectIdDetector {
    fn is_reference(&self, value: &Value) -> bool {
        match value {
            Value::Str(s) => Self::is_object_id(s),
            Value::Object(map) if map.len() == 1 => map
                .get("$oid")
                .and_then(Value::as_str)
                .is_some_and(Self::is_object_id),
            _ => false,
        }
    }
}
