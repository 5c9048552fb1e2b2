//! Unpaid meal-break entitlement by shift length.
//!
//! The same tiers apply whether the duration being paid is the actual or
//! the scheduled one.

/// Unpaid break minutes for a worked duration.
///
/// | minutes    | break |
/// |------------|-------|
/// | ≤ 240      | 0     |
/// | 241 – 360  | 30    |
/// | 361 – 480  | 45    |
/// | > 480      | 60    |
///
/// Negative durations get no break.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::unpaid_break_minutes;
///
/// assert_eq!(unpaid_break_minutes(240), 0);
/// assert_eq!(unpaid_break_minutes(420), 45);
/// assert_eq!(unpaid_break_minutes(481), 60);
/// ```
pub fn unpaid_break_minutes(minutes: i64) -> i64 {
    match minutes {
        m if m <= 240 => 0,
        241..=360 => 30,
        361..=480 => 45,
        _ => 60,
    }
}
