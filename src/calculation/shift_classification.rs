//! Shift type classification.
//!
//! Maps a shift's scheduled start to the pricing category used by rate
//! lookup and funding-category fallback.

use chrono::{NaiveDateTime, Timelike};

use crate::models::ShiftType;

/// First hour of the day shift window.
pub const DAY_SHIFT_START_HOUR: u32 = 6;

/// First hour of the evening shift window.
pub const EVENING_SHIFT_START_HOUR: u32 = 20;

/// Classifies a shift by its start hour.
///
/// - `[06:00, 20:00)` → `AM`
/// - `[20:00, 24:00)` → `PM`
/// - `[00:00, 06:00)` → `ActiveNight`
///
/// Never returns `Sleepover`; see [`resolve_shift_type`].
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::classify_shift_type;
/// use settlement_engine::models::ShiftType;
/// use chrono::NaiveDateTime;
///
/// let start = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// assert_eq!(classify_shift_type(start), ShiftType::AM);
/// ```
pub fn classify_shift_type(start: NaiveDateTime) -> ShiftType {
    let hour = start.hour();
    if hour < DAY_SHIFT_START_HOUR {
        ShiftType::ActiveNight
    } else if hour < EVENING_SHIFT_START_HOUR {
        ShiftType::AM
    } else {
        ShiftType::PM
    }
}

/// Resolves a shift's type: an explicit type set by scheduling wins,
/// otherwise the start hour decides.
///
/// This is the only route by which a shift becomes a `Sleepover`.
pub fn resolve_shift_type(explicit: Option<ShiftType>, start: NaiveDateTime) -> ShiftType {
    explicit.unwrap_or_else(|| classify_shift_type(start))
}
