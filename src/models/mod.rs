//! Data models and payload normalization

pub mod book;
pub mod copy;

// Re-export commonly used types
pub use book::{Book, BookStatus};
pub use copy::{BookCopy, BorrowRecord, CopyStatus};

use chrono::Local;

/// Trim a possibly-absent string field; absent fields become empty.
pub fn trim_or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Clamp a numeric field to a finite non-negative value, defaulting to 0.
pub fn clamp_non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

/// Clamp an optional count to a non-negative integer, defaulting to 0.
pub fn clamp_count(value: Option<i64>) -> u32 {
    match value {
        Some(v) if v >= 0 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => 0,
    }
}

/// Current local time in the catalog's fixed `YYYY-MM-DD HH:mm` format.
pub fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Resolve an optional caller-supplied timestamp, falling back to now.
pub fn stamp_or_now(supplied: Option<&str>) -> String {
    let trimmed = trim_or_empty(supplied);
    if trimmed.is_empty() {
        now_stamp()
    } else {
        trimmed
    }
}
