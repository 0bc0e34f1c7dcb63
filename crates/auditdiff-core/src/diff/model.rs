//! Diff output types.

use crate::errors::{AuditError, ExError};
use serde::{Deserialize, Serialize};

/// One field-level change between the old and new graph
///
/// `label` is the human chain of field labels and descriptor names joined
/// with the configured delimiter; `path` is the structural address
/// (`stack[0].name`). Both may be empty for a change at the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    label: String,
    path: String,
    old_text: String,
    new_text: String,
}

impl ChangeRecord {
    pub fn new(
        label: impl Into<String>,
        path: impl Into<String>,
        old_text: impl Into<String>,
        new_text: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            old_text: old_text.into(),
            new_text: new_text.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn old_text(&self) -> &str {
        &self.old_text
    }

    pub fn new_text(&self) -> &str {
        &self.new_text
    }
}

/// A leaf whose values could not be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    pub label: String,
    pub path: String,
    pub error: AuditError,
}

impl RenderFailure {
    /// Structured form for logging or surfacing to callers
    pub fn to_ex_error(&self) -> ExError {
        ExError::from(self.error.clone())
            .with_path(self.path.as_str())
            .with_label(self.label.as_str())
    }
}

/// Outcome of comparing two leaf values
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Unchanged,
    Changed(ChangeRecord),
    RenderFailed(RenderFailure),
}

/// Changes plus the leaves that were skipped because they failed to render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    pub changes: Vec<ChangeRecord>,
    pub render_failures: Vec<RenderFailure>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.render_failures.is_empty()
    }
}
