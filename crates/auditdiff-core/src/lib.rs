//! auditdiff core - descriptor-driven audit diffs
//!
//! This crate computes human-readable, path-addressed field changes between
//! two snapshots of the same domain object, including:
//! - Field maps and descriptors declaring what is audited and how
//! - A recursive diff engine with identity-based array reconciliation
//! - Pluggable value rendering and opaque-reference detection
//! - JSON configuration for options and descriptor trees
//! - Structured logging facility and error taxonomy

pub mod config;
pub mod descriptor;
pub mod diff;
pub mod errors;
pub mod format;
pub mod logging_facility;
pub mod reference;
pub mod value;

pub use auditdiff_core_types as core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use config::{DescriptorConfig, DiffOptions, ServiceConfig};
pub use descriptor::{Descriptor, DescriptorKind, FieldKind, FieldMap, FieldSpec};
pub use diff::{ChangeRecord, Comparison, DiffReport, DiffService, RenderFailure};
pub use errors::{AuditError, ExError, ExErrorKind, Result};
pub use format::{DefaultFormatter, ValueFormatter};
pub use reference::{ObjectIdDetector, ReferenceDetector};
pub use value::Value;
