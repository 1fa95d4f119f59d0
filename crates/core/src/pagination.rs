//! Pagination defaults shared by list endpoints and repositories.

/// Default number of records per page.
pub const DEFAULT_LIMIT: i64 = 100;

/// Maximum number of records per page.
pub const MAX_LIMIT: i64 = 1000;

/// Clamp a requested limit to `1..=MAX_LIMIT`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
