//! Field maps and descriptors
//!
//! A [`Descriptor`] says which fields of a type are audited, how each field
//! behaves (scalar label, nested object, nested array) and how two instances
//! are recognised as the same logical entity. Descriptors are built once and
//! shared read-only across any number of diff calls.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Maps an instance to a stable identity string
pub type IdentityFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Decides whether two instances are the same logical entity
pub type EqualityFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Shape of the values a descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    #[default]
    Object,
    Array,
}

/// How a single field-map entry behaves during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Field,
    Object,
    Array,
}

impl From<DescriptorKind> for FieldKind {
    fn from(kind: DescriptorKind) -> Self {
        match kind {
            DescriptorKind::Object => FieldKind::Object,
            DescriptorKind::Array => FieldKind::Array,
        }
    }
}

/// One entry of a field map
#[derive(Debug, Clone)]
pub enum FieldSpec {
    /// Scalar field rendered under this label
    Label(String),
    /// Nested object or array of objects
    Nested(Descriptor),
}

impl FieldSpec {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldSpec::Label(_) => FieldKind::Field,
            FieldSpec::Nested(descriptor) => descriptor.kind().into(),
        }
    }
}

/// Ordered mapping from field name to [`FieldSpec`]
///
/// Insertion order is the order in which changes are reported.
#[derive(Debug, Clone, Default)]
pub struct FieldMap {
    entries: Vec<(String, FieldSpec)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar field
    pub fn label(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.insert(key, FieldSpec::Label(label.into()));
        self
    }

    /// Add a nested object or array field
    pub fn nested(mut self, key: impl Into<String>, descriptor: Descriptor) -> Self {
        self.insert(key, FieldSpec::Nested(descriptor));
        self
    }

    /// Insert an entry; an existing key is replaced in place
    pub fn insert(&mut self, key: impl Into<String>, spec: FieldSpec) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((key, spec)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, spec)| spec)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.entries.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-type diff metadata: field map plus identity rules
///
/// # Example
///
/// ```
/// use auditdiff_core::{Descriptor, FieldMap, Value};
///
/// let stack = Descriptor::array(FieldMap::new().label("name", "Name").label("id", "Key"))
///     .named("Stack")
///     .with_identity_field("name")
///     .with_key_field("id");
///
/// let a = Value::object([("id", 1)]);
/// let b = Value::object([("id", 1)]);
/// assert!(stack.same_entity(&a, &b));
/// ```
#[derive(Clone)]
pub struct Descriptor {
    map: FieldMap,
    name: Option<String>,
    kind: DescriptorKind,
    identity: Option<IdentityFn>,
    equality: Option<EqualityFn>,
}

impl Descriptor {
    pub fn new(map: FieldMap, kind: DescriptorKind) -> Self {
        Self {
            map,
            name: None,
            kind,
            identity: None,
            equality: None,
        }
    }

    /// Descriptor for a nested single object (or the root)
    pub fn object(map: FieldMap) -> Self {
        Self::new(map, DescriptorKind::Object)
    }

    /// Descriptor for the elements of an array field
    pub fn array(map: FieldMap) -> Self {
        Self::new(map, DescriptorKind::Array)
    }

    /// Human label for the described entity
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_identity<F>(mut self, identity: F) -> Self
    where
        F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
    {
        self.identity = Some(Arc::new(identity));
        self
    }

    /// Takes precedence over the identity function in [`Descriptor::same_entity`]
    pub fn with_equality<F>(mut self, equality: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.equality = Some(Arc::new(equality));
        self
    }

    /// Identity is the scalar text of `key`
    pub fn with_identity_field(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.with_identity(move |v| v.get(&key).and_then(scalar_text))
    }

    /// Equality compares `key` strictly; missing on both sides counts as equal
    pub fn with_key_field(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.with_equality(move |a, b| a.get(&key) == b.get(&key))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> DescriptorKind {
        self.kind
    }

    pub fn map(&self) -> &FieldMap {
        &self.map
    }

    /// Mapped keys in insertion order
    pub fn fields(&self) -> Vec<&str> {
        self.map.keys().collect()
    }

    /// `None` for unmapped keys
    pub fn field_kind(&self, key: &str) -> Option<FieldKind> {
        self.map.get(key).map(FieldSpec::kind)
    }

    /// Label of a scalar field, or the nested descriptor's name
    pub fn description(&self, key: &str) -> Option<&str> {
        match self.map.get(key)? {
            FieldSpec::Label(label) => Some(label.as_str()),
            FieldSpec::Nested(nested) => nested.name(),
        }
    }

    /// True when an identity or equality function is configured
    pub fn has_identity_contract(&self) -> bool {
        self.identity.is_some() || self.equality.is_some()
    }

    pub fn identity_of(&self, value: &Value) -> Option<String> {
        self.identity.as_ref().and_then(|f| f(value))
    }

    /// Equality function if present, else equal identities (two missing
    /// identities are equal), else `false`
    pub fn same_entity(&self, a: &Value, b: &Value) -> bool {
        if let Some(equality) = &self.equality {
            return equality(a, b);
        }
        match &self.identity {
            Some(identity) => identity(a) == identity(b),
            None => false,
        }
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("map", &self.map)
            .field("identity", &self.identity.is_some())
            .field("equality", &self.equality.is_some())
            .finish()
    }
}

/// Text of a scalar used as an identity; composites have none
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(x) => Some(x.to_string()),
        Value::Str(s) => Some(s.clone()),
        Value::Timestamp(ts) => Some(ts.to_rfc3339()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
