//! Structured logging facility for auditdiff
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! The diff entry points own the operation boundary (`op = "diff"`); the
//! traversal underneath only emits `debug!`/`warn!` detail events.
//!
//! # Usage
//!
//! ```rust
//! use auditdiff_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
