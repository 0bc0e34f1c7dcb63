#![allow(clippy::unwrap_used, clippy::expect_used)]

use auditdiff_core::errors::ExErrorKind;
use auditdiff_core::{DefaultFormatter, Descriptor, DiffService, FieldMap, Value};
use chrono::{TimeZone, Utc};

const ORDER_CONFIG: &str = r#"{
    "options": { "delimiter": " / ", "empty_label": "-" },
    "format": { "checked_label": "Yes", "unchecked_label": "No" },
    "descriptor": {
        "name": "Order",
        "fields": {
            "title": "Title",
            "paid": "Paid",
            "lines": {
                "name": "Order line",
                "kind": "array",
                "identity_field": "sku",
                "key_field": "id",
                "fields": { "qty": "Quantity" }
            }
        }
    }
}"#;

fn line(id: i64, sku: &str, qty: i64) -> Value {
    Value::object([
        ("id", Value::from(id)),
        ("sku", Value::from(sku)),
        ("qty", Value::from(qty)),
    ])
}

#[test]
fn test_service_from_config_document() {
    let service = DiffService::from_config_json(ORDER_CONFIG).unwrap();
    assert_eq!(service.delimiter(), " / ");
    assert_eq!(service.empty_label(), "-");
    assert_eq!(service.descriptor().name(), Some("Order"));
    assert_eq!(service.descriptor().fields(), vec!["title", "paid", "lines"]);

    let old = Value::object([
        ("paid", Value::from(false)),
        ("lines", Value::from(vec![line(1, "a", 1), line(2, "b", 1)])),
    ]);
    let new = Value::object([
        ("paid", Value::from(true)),
        ("lines", Value::from(vec![line(1, "a", 3)])),
    ]);
    let changes = service.diff(Some(&old), Some(&new));

    assert_eq!(changes.len(), 3);
    assert_eq!(changes[0].path(), "paid");
    assert_eq!(changes[0].old_text(), "No");
    assert_eq!(changes[0].new_text(), "Yes");
    assert_eq!(changes[1].path(), "lines[0].qty");
    assert_eq!(changes[1].label(), "Order line / Quantity");
    assert_eq!(changes[2].old_text(), "Delete Order line: b");
    assert_eq!(changes[2].new_text(), "-");
}

#[test]
fn test_config_timestamp_format() {
    let text = r#"{
        "format": { "timestamp_format": "%Y-%m-%d" },
        "descriptor": { "fields": { "due": "Due" } }
    }"#;
    let service = DiffService::from_config_json(text).unwrap();
    let due = Utc.with_ymd_and_hms(2019, 2, 1, 13, 0, 0).unwrap();
    let changes = service.diff(
        Some(&Value::object([("due", Value::Null)])),
        Some(&Value::object([("due", Value::from(due))])),
    );
    assert_eq!(changes[0].old_text(), "N/A");
    assert_eq!(changes[0].new_text(), "2019-02-01");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let service =
        DiffService::from_config_json(r#"{ "descriptor": { "fields": { "a": "A" } } }"#).unwrap();
    assert_eq!(service.delimiter(), " -> ");
    assert_eq!(service.empty_label(), "N/A");
    assert_eq!(service.descriptor().name(), None);
}

#[test]
fn test_empty_option_strings_fall_back() {
    let text = r#"{
        "options": { "delimiter": "", "empty_label": "" },
        "descriptor": {}
    }"#;
    let service = DiffService::from_config_json(text).unwrap();
    assert_eq!(service.delimiter(), " -> ");
    assert_eq!(service.empty_label(), "N/A");
}

#[test]
fn test_unparseable_document_is_invalid_config() {
    let err = DiffService::from_config_json("{ not json").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    assert_eq!(err.code(), "ERR_INVALID_CONFIG");
    assert_eq!(err.op(), Some("load_config"));
}

#[test]
fn test_missing_descriptor_is_invalid_config() {
    let err = DiffService::from_config_json(r#"{ "options": {} }"#).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
}

#[test]
fn test_unknown_kind_is_unsupported() {
    let text = r#"{
        "descriptor": { "fields": { "x": { "kind": "set", "fields": {} } } }
    }"#;
    let err = DiffService::from_config_json(text).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::UnsupportedDescriptorKind);
    assert!(err.message().contains("set"));
}

#[test]
fn test_malformed_entries_are_skipped_not_fatal() {
    let text = r#"{ "descriptor": { "fields": { "a": "A", "b": [1, 2], "c": true } } }"#;
    let service = DiffService::from_config_json(text).unwrap();
    assert_eq!(service.descriptor().fields(), vec!["a"]);
}

#[test]
fn test_invalid_timestamp_format_is_rejected_at_load() {
    let text = r#"{
        "format": { "timestamp_format": "%Q bad" },
        "descriptor": { "fields": { "due": "Due" } }
    }"#;
    let err = DiffService::from_config_json(text).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
    assert!(err.message().contains("%Q bad"));
}

#[test]
fn test_code_built_bad_format_does_not_panic() {
    let formatter = DefaultFormatter {
        timestamp_format: "%Q bad".to_string(),
        ..DefaultFormatter::default()
    };
    let service = DiffService::new(Descriptor::object(FieldMap::new().label("due", "Due")))
        .with_formatter(formatter);
    let due = Utc.with_ymd_and_hms(2019, 2, 1, 0, 0, 0).unwrap();
    let changes = service.diff(
        Some(&Value::object([("due", Value::Null)])),
        Some(&Value::object([("due", Value::from(due))])),
    );
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].new_text(), "2019-02-01T00:00:00+00:00");
}
