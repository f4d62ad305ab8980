//! Structured logging schema and field name constants for notekeep.
//!
//! All crates log with these field names for consistent structured fields,
//! so log output can be queried by the same names across subsystems.
//! `tracing` macros take field names as identifiers, so call sites spell the
//! names out; this module is the reference they must agree with.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (module start/stop) |
//! | DEBUG | Decision points, operation completions |
//! | TRACE | Per-item iteration (notes in a cascade, filter passes) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "notes", "store", "bus"
pub const SUBSYSTEM: &str = "subsystem";

/// Logical operation name.
/// Examples: "save_model", "remove", "change_notebook_id"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Profile partition the operation is scoped to.
pub const PROFILE_ID: &str = "profile_id";

/// Note id being operated on.
pub const NOTE_ID: &str = "note_id";

/// Notebook id involved in a cascade or hydration.
pub const NOTEBOOK_ID: &str = "notebook_id";

// ─── Bus fields ────────────────────────────────────────────────────────────

/// Bus channel name.
pub const CHANNEL: &str = "channel";

/// Bus request name.
pub const REQUEST: &str = "request";

/// Bus event name.
pub const EVENT_TYPE: &str = "event_type";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of notes returned or touched.
pub const RESULT_COUNT: &str = "result_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Every field name above, in declaration order.
pub const ALL_FIELDS: &[&str] = &[
    SUBSYSTEM,
    OPERATION,
    PROFILE_ID,
    NOTE_ID,
    NOTEBOOK_ID,
    CHANNEL,
    REQUEST,
    EVENT_TYPE,
    RESULT_COUNT,
    ERROR_MSG,
];
