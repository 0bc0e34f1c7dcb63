#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use auditdiff_core::diff::path::bind_path;
use auditdiff_core::{DiffService, Value};
use common::{foo_descriptor, foo_with_stack, simple, simple_descriptor, stack_item};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn stack_items() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec((0i64..6, "[A-D]"), 0..6).prop_map(|items| {
        items
            .into_iter()
            .map(|(id, name)| stack_item(id, &name))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_bind_path_index_law(parent in key(), child in key(), index in 0usize..100) {
        prop_assert_eq!(
            bind_path(Some(parent.as_str()), Some(child.as_str()), Some(index)),
            format!("{}.{}[{}]", parent, child, index)
        );
    }

    #[test]
    fn prop_bind_path_root_law(child in key()) {
        prop_assert_eq!(bind_path(None, Some(child.as_str()), None), child.clone());
        prop_assert_eq!(bind_path(Some(""), Some(child.as_str()), None), child);
    }

    #[test]
    fn prop_bind_path_without_key(parent in key(), index in 0usize..100) {
        prop_assert_eq!(bind_path(Some(parent.as_str()), None, None), parent.clone());
        prop_assert_eq!(
            bind_path(Some(parent.as_str()), None, Some(index)),
            format!("{}[{}]", parent, index)
        );
    }

    #[test]
    fn prop_absent_inputs_never_fail(field in ".{0,12}") {
        let service = DiffService::new(simple_descriptor());
        let value = simple(&field);
        prop_assert_eq!(service.diff(None, Some(&value)).len(), 1);
        prop_assert_eq!(service.diff(Some(&value), None).len(), 1);
        prop_assert!(service.diff(None, None).is_empty());
    }

    #[test]
    fn prop_unmapped_fields_are_invisible(
        field in "[a-z]{0,6}",
        noise_old in any::<i64>(),
        noise_new in any::<i64>(),
    ) {
        let service = DiffService::new(simple_descriptor());
        let old = Value::object([("field", Value::from(field.as_str())), ("noise", Value::from(noise_old))]);
        let new = Value::object([("field", Value::from(field.as_str())), ("noise", Value::from(noise_new))]);
        prop_assert!(service.diff(Some(&old), Some(&new)).is_empty());
    }

    #[test]
    fn prop_self_diff_is_empty(items in stack_items()) {
        let service = DiffService::new(foo_descriptor());
        let value = foo_with_stack(items);
        prop_assert!(service.diff(Some(&value), Some(&value)).is_empty());
    }

    #[test]
    fn prop_unmatched_counts_balance(old in stack_items(), new in stack_items()) {
        let service = DiffService::new(foo_descriptor());
        let changes = service.diff(Some(&foo_with_stack(old.clone())), Some(&foo_with_stack(new.clone())));

        let created = changes.iter().filter(|c| c.new_text().starts_with("Create")).count();
        let deleted = changes.iter().filter(|c| c.old_text().starts_with("Delete")).count();
        // Every element is either matched once or reported once.
        prop_assert_eq!(new.len() - created, old.len() - deleted);
        for change in &changes {
            prop_assert!(change.path() == "stack" || change.path().starts_with("stack["));
        }
    }
}
