//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Diff addressing
pub const FIELD_PATH: &str = "path";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_DESCRIPTOR: &str = "descriptor";

// Collection sizes
pub const FIELD_CHANGE_COUNT: &str = "change_count";
pub const FIELD_RENDER_FAILURES: &str = "render_failures";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Canonical operation names
pub const OP_DIFF: &str = "diff";
pub const OP_LOAD_CONFIG: &str = "load_config";
