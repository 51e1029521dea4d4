//! Presentation helpers shared by indicators

use crate::constants::{BYTE_UNITS, BYTE_UNIT_DIVISOR, BYTE_UNIT_THRESHOLD};

/// Render a byte count with two decimals and the first unit it fits in.
///
/// The value moves up a unit while it is >= 1000 but is divided by 1024,
/// so `1000` renders as `0.98KB`. Values past the TB range stay in TB.
pub fn convert_bytes_unit(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = BYTE_UNITS[0];
    for next in &BYTE_UNITS[1..] {
        if value < BYTE_UNIT_THRESHOLD {
            break;
        }
        value /= BYTE_UNIT_DIVISOR;
        unit = next;
    }
    format!("{:.2}{}", value, unit)
}

/// Round a percentage for display, ties to even
pub fn round_percent(percent: f64) -> i64 {
    percent.round_ties_even() as i64
}
