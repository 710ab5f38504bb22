//! Domain model for quotes, categories and the settings row.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep relationships explicit (`category_id`) instead of live references.
//!
//! # Invariants
//! - Quotes and categories are identified by a stable `Uuid`.
//! - Timestamps are Unix epoch milliseconds.
//! - `Quote::category_name` is a denormalized label, not a checked reference.

pub mod category;
pub mod quote;
pub mod settings;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
