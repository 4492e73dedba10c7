//! Record store HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared path-id parsing helper.
pub mod error;
pub mod openapi;
pub mod people;
pub mod system;
pub mod types;

/// Parse a path segment as a record id.
///
/// Ids that are not integers cannot name a stored row, so callers treat a
/// parse failure the same as a missing row.
pub(crate) fn parse_person_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
