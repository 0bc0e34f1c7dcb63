//! Recursive diff engine.
//!
//! [`DiffService`] walks an old and a new [`Value`] graph in lock-step under
//! a root [`Descriptor`] and produces an ordered list of [`ChangeRecord`]s.
//! Arrays are reconciled by entity identity, not position: matched pairs are
//! diffed field by field, unmatched elements become create/delete records.

use crate::config::{DiffOptions, ServiceConfig};
use crate::core_types::schema::{OP_DIFF, OP_LOAD_CONFIG};
use crate::descriptor::{Descriptor, DescriptorKind, FieldSpec};
use crate::diff::compare::ValueComparer;
use crate::diff::model::{ChangeRecord, Comparison, DiffReport};
use crate::diff::path::{bind_label, bind_path};
use crate::errors::{AuditError, ExError};
use crate::format::{DefaultFormatter, ValueFormatter};
use crate::reference::ReferenceDetector;
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use std::sync::Arc;
use std::time::Instant;

/// Diff entry point bound to one root descriptor
///
/// A service is immutable once built and can be shared across threads.
///
/// # Example
///
/// ```
/// use auditdiff_core::{Descriptor, DiffService, FieldMap, Value};
///
/// let service = DiffService::new(Descriptor::object(FieldMap::new().label("field", "Label")));
/// let old = Value::object([("field", "a")]);
/// let new = Value::object([("field", "b")]);
///
/// let changes = service.diff(Some(&old), Some(&new));
/// assert_eq!(changes.len(), 1);
/// assert_eq!(changes[0].label(), "Label");
/// assert_eq!(changes[0].old_text(), "a");
/// assert_eq!(changes[0].new_text(), "b");
/// ```
#[derive(Clone)]
pub struct DiffService {
    descriptor: Descriptor,
    options: DiffOptions,
    formatter: Arc<dyn ValueFormatter>,
    references: Option<Arc<dyn ReferenceDetector>>,
}

impl DiffService {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            options: DiffOptions::default(),
            formatter: Arc::new(DefaultFormatter::default()),
            references: None,
        }
    }

    /// Replace the options; empty strings fall back to the defaults
    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options.normalized();
        self
    }

    pub fn with_formatter<F: ValueFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Arc::new(formatter);
        self
    }

    /// Install the opaque-reference predicate
    pub fn with_reference_detector<R: ReferenceDetector + 'static>(mut self, detector: R) -> Self {
        self.references = Some(Arc::new(detector));
        self
    }

    /// Load a service from a JSON [`ServiceConfig`] document
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the document does not deserialize
    /// - `InvalidConfig` if `format.timestamp_format` is not a valid pattern
    /// - `UnsupportedDescriptorKind` if a descriptor kind is not `object`/`array`
    pub fn from_config_json(text: &str) -> Result<Self, ExError> {
        log_op_start!(OP_LOAD_CONFIG);
        let start = Instant::now();

        let service = Self::from_config_json_impl(text).map_err(|e| {
            log_op_error!(
                OP_LOAD_CONFIG,
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

        log_op_end!(
            OP_LOAD_CONFIG,
            duration_ms = start.elapsed().as_millis() as u64,
            descriptor = service.descriptor.name().unwrap_or_default()
        );
        Ok(service)
    }

    fn from_config_json_impl(text: &str) -> Result<Self, ExError> {
        let config: ServiceConfig =
            serde_json::from_str(text).map_err(|e| AuditError::InvalidConfig {
                reason: e.to_string(),
            })?;
        config.format.validate()?;
        let descriptor = config.descriptor.build()?;
        Ok(Self::new(descriptor)
            .with_options(config.options)
            .with_formatter(config.format))
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn delimiter(&self) -> &str {
        &self.options.delimiter
    }

    pub fn empty_label(&self) -> &str {
        &self.options.empty_label
    }

    /// Ordered field-level changes from `old` to `new`
    ///
    /// Never fails: absent inputs produce create/delete records (or nothing
    /// when both are absent), and leaves that fail to render are treated as
    /// unchanged. Use [`DiffService::diff_report`] to see those failures.
    pub fn diff(&self, old: Option<&Value>, new: Option<&Value>) -> Vec<ChangeRecord> {
        self.diff_report(old, new).changes
    }

    /// Like [`DiffService::diff`], also returning render failures
    pub fn diff_report(&self, old: Option<&Value>, new: Option<&Value>) -> DiffReport {
        let descriptor_name = self.descriptor.name().unwrap_or_default();
        log_op_start!(OP_DIFF, descriptor = descriptor_name);
        let start = Instant::now();

        let mut walk = Walk::new(self);
        walk.collect(&self.descriptor, new, old, "", "");
        let report = walk.report;

        log_op_end!(
            OP_DIFF,
            duration_ms = start.elapsed().as_millis() as u64,
            descriptor = descriptor_name,
            change_count = report.changes.len() as u64,
            render_failures = report.render_failures.len() as u64
        );
        report
    }
}

impl std::fmt::Debug for DiffService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffService")
            .field("descriptor", &self.descriptor)
            .field("options", &self.options)
            .field("references", &self.references.is_some())
            .finish()
    }
}

/// State of a single diff call
struct Walk<'a> {
    service: &'a DiffService,
    comparer: ValueComparer<'a>,
    report: DiffReport,
}

impl<'a> Walk<'a> {
    fn new(service: &'a DiffService) -> Self {
        Self {
            service,
            comparer: ValueComparer {
                formatter: service.formatter.as_ref(),
                references: service.references.as_deref(),
                empty_label: &service.options.empty_label,
            },
            report: DiffReport::default(),
        }
    }

    fn delimiter(&self) -> &'a str {
        &self.service.options.delimiter
    }

    fn empty_label(&self) -> &'a str {
        &self.service.options.empty_label
    }

    fn push(&mut self, label: &str, path: &str, old_text: String, new_text: String) {
        self.report
            .changes
            .push(ChangeRecord::new(label, path, old_text, new_text));
    }

    fn is_reference(&self, value: Option<&Value>) -> bool {
        match (&self.service.references, Value::present(value)) {
            (Some(detector), Some(v)) => detector.is_reference(v),
            _ => false,
        }
    }

    /// Diff one entity described by `descriptor`
    fn collect(
        &mut self,
        descriptor: &Descriptor,
        new: Option<&Value>,
        old: Option<&Value>,
        path: &str,
        label: &str,
    ) {
        let (new, old) = match (Value::present(new), Value::present(old)) {
            (None, None) => return,
            (None, Some(old)) => {
                let text = entity_message("Delete", descriptor, old);
                self.push(label, path, text, self.empty_label().to_string());
                return;
            }
            (Some(new), None) => {
                let text = entity_message("Create", descriptor, new);
                self.push(label, path, self.empty_label().to_string(), text);
                return;
            }
            (Some(new), Some(old)) => (new, old),
        };

        if descriptor.has_identity_contract() && !descriptor.same_entity(new, old) {
            // Different entities in the same slot: one replacement record.
            let old_text = replacement_message("from", descriptor, old);
            let new_text = replacement_message("to", descriptor, new);
            self.push(label, path, old_text, new_text);
            return;
        }

        for (key, spec) in descriptor.map().iter() {
            let field_path = bind_path(Some(path), Some(key), None);
            let new_field = new.get(key);
            let old_field = old.get(key);

            match spec {
                FieldSpec::Label(text) => {
                    let field_label = bind_label(label, text, self.delimiter());
                    match self
                        .comparer
                        .compare(new_field, old_field, &field_path, &field_label)
                    {
                        Comparison::Unchanged => {}
                        Comparison::Changed(record) => self.report.changes.push(record),
                        Comparison::RenderFailed(failure) => {
                            tracing::warn!(
                                path = failure.path.as_str(),
                                label = failure.label.as_str(),
                                err_code = failure.to_ex_error().code(),
                                "{}; treated as unchanged",
                                failure.error
                            );
                            self.report.render_failures.push(failure);
                        }
                    }
                }
                FieldSpec::Nested(nested) => {
                    let nested_label =
                        bind_label(label, nested.name().unwrap_or_default(), self.delimiter());
                    match nested.kind() {
                        DescriptorKind::Object => {
                            if self.is_reference(new_field) || self.is_reference(old_field) {
                                tracing::debug!(
                                    path = field_path.as_str(),
                                    "reference value; recursion skipped"
                                );
                                continue;
                            }
                            self.collect(nested, new_field, old_field, &field_path, &nested_label);
                        }
                        DescriptorKind::Array => {
                            self.reconcile(nested, new_field, old_field, &field_path, &nested_label);
                        }
                    }
                }
            }
        }
    }

    /// Match array elements by entity identity and diff each pairing
    ///
    /// Each new element takes the first unconsumed old element that is the
    /// same entity. Output order: matched pairs (new-array order), then
    /// created elements, then deleted elements.
    fn reconcile(
        &mut self,
        descriptor: &Descriptor,
        new: Option<&Value>,
        old: Option<&Value>,
        path: &str,
        label: &str,
    ) {
        let new_items = array_items(new, path);
        let old_items = array_items(old, path);

        if !descriptor.has_identity_contract() && !new_items.is_empty() && !old_items.is_empty()
        {
            tracing::debug!(
                path,
                descriptor = descriptor.name().unwrap_or_default(),
                "no identity or equality function; elements reported as created and deleted"
            );
        }

        let mut consumed = vec![false; old_items.len()];
        let mut matched = Vec::new();
        let mut created = Vec::new();
        for item in new_items {
            let hit = (0..old_items.len())
                .find(|&i| !consumed[i] && descriptor.same_entity(&old_items[i], item));
            match hit {
                Some(i) => {
                    consumed[i] = true;
                    matched.push((item, &old_items[i]));
                }
                None => created.push(item),
            }
        }

        for (index, (new_item, old_item)) in matched.into_iter().enumerate() {
            let item_path = bind_path(Some(path), None, Some(index));
            self.collect(descriptor, Some(new_item), Some(old_item), &item_path, label);
        }
        for item in created {
            self.collect(descriptor, Some(item), None, path, label);
        }
        for (item, used) in old_items.iter().zip(consumed) {
            if !used {
                self.collect(descriptor, None, Some(item), path, label);
            }
        }
    }
}

/// Elements of an array field; absent or non-array values are empty
fn array_items<'v>(value: Option<&'v Value>, path: &str) -> &'v [Value] {
    match Value::present(value) {
        None => &[],
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(
                path,
                found = other.type_name(),
                "array field holds a non-array value; treated as empty"
            );
            &[]
        }
    }
}

/// Verb, then the descriptor name and identity when known
fn entity_message(verb: &str, descriptor: &Descriptor, value: &Value) -> String {
    let mut text = verb.to_string();
    if let Some(name) = descriptor.name().filter(|n| !n.is_empty()) {
        text.push(' ');
        text.push_str(name);
    }
    if let Some(id) = descriptor.identity_of(value) {
        text.push_str(": ");
        text.push_str(&id);
    }
    text
}

/// Replacement text: `verb: identity`, or the entity message without one
fn replacement_message(verb: &str, descriptor: &Descriptor, value: &Value) -> String {
    match descriptor.identity_of(value) {
        Some(id) => format!("{}: {}", verb, id),
        None => entity_message(verb, descriptor, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldMap;

    fn line(id: i64, sku: &str, qty: i64) -> Value {
        Value::object([
            ("id", Value::from(id)),
            ("sku", Value::from(sku)),
            ("qty", Value::from(qty)),
        ])
    }

    fn lines_descriptor() -> Descriptor {
        Descriptor::array(FieldMap::new().label("qty", "Quantity"))
            .named("Line")
            .with_identity_field("sku")
            .with_key_field("id")
    }

    fn order(lines: Vec<Value>) -> Value {
        Value::object([("lines", Value::Array(lines))])
    }

    fn service() -> DiffService {
        DiffService::new(Descriptor::object(
            FieldMap::new().nested("lines", lines_descriptor()),
        ))
    }

    #[test]
    fn test_entity_message_shapes() {
        let d = lines_descriptor();
        assert_eq!(entity_message("Delete", &d, &line(1, "a", 1)), "Delete Line: a");
        let anonymous = Descriptor::object(FieldMap::new());
        assert_eq!(entity_message("Create", &anonymous, &Value::Int(1)), "Create");
        assert_eq!(replacement_message("from", &d, &line(1, "a", 1)), "from: a");
        let keyed = Descriptor::object(FieldMap::new()).named("Bar").with_key_field("id");
        assert_eq!(replacement_message("to", &keyed, &line(1, "a", 1)), "to Bar");
    }

    #[test]
    fn test_greedy_match_consumes_each_old_element_once() {
        let old = order(vec![line(1, "a", 1), line(1, "a", 2)]);
        let new = order(vec![line(1, "a", 5), line(1, "a", 6)]);
        let changes = service().diff(Some(&old), Some(&new));

        let paths: Vec<&str> = changes.iter().map(ChangeRecord::path).collect();
        assert_eq!(paths, vec!["lines[0].qty", "lines[1].qty"]);
        assert_eq!(changes[0].old_text(), "1");
        assert_eq!(changes[0].new_text(), "5");
        assert_eq!(changes[1].old_text(), "2");
        assert_eq!(changes[1].new_text(), "6");
    }

    #[test]
    fn test_match_index_counts_matches_not_positions() {
        let old = order(vec![line(1, "a", 1), line(2, "b", 1)]);
        let new = order(vec![line(3, "c", 1), line(2, "b", 9)]);
        let changes = service().diff(Some(&old), Some(&new));

        let paths: Vec<&str> = changes.iter().map(ChangeRecord::path).collect();
        assert_eq!(paths, vec!["lines[0].qty", "lines", "lines"]);
        assert_eq!(changes[1].new_text(), "Create Line: c");
        assert_eq!(changes[2].old_text(), "Delete Line: a");
    }

    #[test]
    fn test_array_without_contract_is_create_and_delete() {
        let plain = Descriptor::array(FieldMap::new().label("qty", "Quantity")).named("Line");
        let service = DiffService::new(Descriptor::object(FieldMap::new().nested("lines", plain)));
        let old = order(vec![line(1, "a", 1)]);
        let new = order(vec![line(1, "a", 1)]);
        let changes = service.diff(Some(&old), Some(&new));

        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].new_text(), "Create Line");
        assert_eq!(changes[1].old_text(), "Delete Line");
    }

    #[test]
    fn test_non_array_value_is_treated_as_empty() {
        let old = Value::object([("lines", "oops")]);
        let new = order(vec![line(1, "a", 1)]);
        let changes = service().diff(Some(&old), Some(&new));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path(), "lines");
        assert_eq!(changes[0].old_text(), "N/A");
    }

    #[test]
    fn test_service_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiffService>();
    }
}
