//! Descriptor-driven diff engine.
//!
//! Compares an old and a new object graph and produces an ordered list of
//! field-level [`ChangeRecord`]s for audit and change-history display.
//!
//! ## Entry point
//!
//! ```ignore
//! use auditdiff_core::diff::DiffService;
//!
//! let service = DiffService::new(order_descriptor());
//! let changes = service.diff(Some(&before), Some(&after));
//! ```
//!
//! ## Guarantees
//!
//! - **Total**: `diff` returns a list for any pair of inputs, including
//!   absent ones; it never panics or errors.
//! - **Ordered**: changes follow field-map order; within an array, matched
//!   updates come first, then creates, then deletes.
//! - **Not mapped, not audited**: fields missing from a descriptor are never
//!   inspected.
//! - **Identity, not position**: array elements are paired by their
//!   descriptor's equality or identity function.

pub mod compare;
pub mod engine;
pub mod model;
pub mod path;

pub use engine::DiffService;
pub use model::{ChangeRecord, Comparison, DiffReport, RenderFailure};
pub use path::{bind_label, bind_path};
