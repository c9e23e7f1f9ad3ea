//! Read-time derivations: duration and goal attainment.
//!
//! Nothing here is stored. Every read recomputes the values from the
//! session's window and the owner's current goal.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::{SleepGoal, SleepSession};

const MICROS_PER_SECOND: f64 = 1_000_000.0;
const MILLIS_PER_SECOND: f64 = 1_000.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Round to two decimal places.
///
/// The exact binary value is rounded with ties going to the even digit, so
/// `7.125` becomes `7.12` and `0.375` becomes `0.38`, while `2.675` (stored
/// just below the midpoint) becomes `2.67`. Non-finite values are returned unchanged.
///
/// # Examples
/// ```
/// use slumbertrack::domain::round_hundredths;
///
/// assert_eq!(round_hundredths(7.125), 7.12);
/// assert_eq!(round_hundredths(0.375), 0.38);
/// ```
pub fn round_hundredths(value: f64) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|exact| exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|rounded| rounded.to_f64())
        .unwrap_or(value)
}

/// Elapsed hours between `start` and `end`, rounded to two decimals.
///
/// # Examples
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use slumbertrack::domain::duration_hours;
///
/// let start = Utc.with_ymd_and_hms(2025, 3, 1, 23, 0, 0).unwrap();
/// assert_eq!(duration_hours(start, start + Duration::minutes(450)), 7.5);
/// ```
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed = end.signed_duration_since(start);
    let seconds = elapsed.num_microseconds().map_or_else(
        || elapsed.num_milliseconds() as f64 / MILLIS_PER_SECOND,
        |micros| micros as f64 / MICROS_PER_SECOND,
    );
    round_hundredths(seconds / SECONDS_PER_HOUR)
}

/// Whether a session reached its owner's goal.
///
/// `Unknown` is the normal answer for users who have not set a goal yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalAttainment {
    Met,
    NotMet,
    Unknown,
}

impl GoalAttainment {
    /// Compare a duration against an optional goal.
    pub fn evaluate(duration_hours: f64, goal: Option<&SleepGoal>) -> Self {
        let Some(target) = goal.and_then(|goal| goal.target_hours().to_f64()) else {
            return Self::Unknown;
        };
        if duration_hours >= target {
            Self::Met
        } else {
            Self::NotMet
        }
    }

    /// Tri-state as an optional boolean (`None` for unknown).
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Met => Some(true),
            Self::NotMet => Some(false),
            Self::Unknown => None,
        }
    }
}

/// A session together with its derived values.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub session: SleepSession,
    pub duration_hours: f64,
    pub attainment: GoalAttainment,
}

impl SessionView {
    /// Derive duration and attainment for `session` against `goal`.
    pub fn new(session: SleepSession, goal: Option<&SleepGoal>) -> Self {
        let duration_hours = duration_hours(session.start(), session.end());
        let attainment = GoalAttainment::evaluate(duration_hours, goal);
        Self {
            session,
            duration_hours,
            attainment,
        }
    }
}
