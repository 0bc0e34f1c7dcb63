//! Core types shared across auditdiff facilities
//!
//! This crate holds the canonical schema constants used by the logging
//! macros and the error facility, so that field keys and event names stay
//! identical between the engine, its tests and any downstream log consumer.

pub mod schema;
