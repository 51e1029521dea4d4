//! Shared constants

/// Units walked by the byte scaler, smallest first
pub const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// A scaled value stays in its unit while below this
pub const BYTE_UNIT_THRESHOLD: f64 = 1000.0;

/// Divisor applied when moving to the next unit
pub const BYTE_UNIT_DIVISOR: f64 = 1024.0;

/// Upper bound of percentage gauges
pub const PERCENT_LIMIT: f64 = 100.0;
