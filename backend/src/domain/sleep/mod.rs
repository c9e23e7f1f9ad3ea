//! Sleep sessions, goals and the values derived from them.
//!
//! Sessions and goals are validated aggregates: every constructor and patch
//! goes through the same checks, so a value of either type that exists is
//! already consistent. Duration and goal attainment are derived on read.

use std::fmt;

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use crate::domain::Error;

mod attainment;
mod goal;
mod patch;
mod range;
mod session;
mod stages;

pub use attainment::{GoalAttainment, SessionView, duration_hours, round_hundredths};
pub use goal::{DEFAULT_TARGET_HOURS, SleepGoal, SleepGoalDraft, SleepGoalInput};
pub use patch::{GoalPatch, SessionPatch};
pub use range::SessionRange;
pub use session::{
    DEFAULT_QUALITY, SleepSession, SleepSessionDraft, SleepSessionInput, TAGS_MAX, Tags,
};
pub use stages::{ParseSleepStageError, SleepStage, StageSample};

/// Validation errors raised by session and goal constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SleepValidationError {
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    NegativeQuality {
        value: i64,
    },
    QualityTooLarge {
        value: i64,
        max: i64,
    },
    NegativeLatency {
        value: i64,
    },
    LatencyTooLarge {
        value: i64,
        max: i64,
    },
    NegativeAwakenings {
        value: i64,
    },
    AwakeningsTooLarge {
        value: i64,
        max: i64,
    },
    TagsTooLong {
        length: usize,
        max: usize,
    },
    NonPositiveTargetHours {
        value: Decimal,
    },
    TargetHoursTooLarge {
        value: Decimal,
    },
    TargetHoursTooPrecise {
        value: Decimal,
    },
    WaketimeNotAfterBedtime {
        bedtime: NaiveTime,
        waketime: NaiveTime,
    },
}

impl SleepValidationError {
    /// Wire name of the field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EndNotAfterStart { .. } => "end",
            Self::NegativeQuality { .. } | Self::QualityTooLarge { .. } => "quality",
            Self::NegativeLatency { .. } | Self::LatencyTooLarge { .. } => "latencyMinutes",
            Self::NegativeAwakenings { .. } | Self::AwakeningsTooLarge { .. } => "awakenings",
            Self::TagsTooLong { .. } => "tags",
            Self::NonPositiveTargetHours { .. }
            | Self::TargetHoursTooLarge { .. }
            | Self::TargetHoursTooPrecise { .. } => "targetHours",
            Self::WaketimeNotAfterBedtime { .. } => "targetWaketime",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EndNotAfterStart { .. } => "end_not_after_start",
            Self::NegativeQuality { .. }
            | Self::NegativeLatency { .. }
            | Self::NegativeAwakenings { .. } => "negative_value",
            Self::QualityTooLarge { .. }
            | Self::LatencyTooLarge { .. }
            | Self::AwakeningsTooLarge { .. }
            | Self::TargetHoursTooLarge { .. } => "value_too_large",
            Self::TagsTooLong { .. } => "too_long",
            Self::NonPositiveTargetHours { .. } => "non_positive",
            Self::TargetHoursTooPrecise { .. } => "too_precise",
            Self::WaketimeNotAfterBedtime { .. } => "waketime_not_after_bedtime",
        }
    }
}

impl fmt::Display for SleepValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndNotAfterStart { .. } => write!(f, "End time must be after start time."),
            Self::NegativeQuality { value } => {
                write!(f, "quality must not be negative (got {value})")
            }
            Self::QualityTooLarge { value, max } => {
                write!(f, "quality must be at most {max} (got {value})")
            }
            Self::NegativeLatency { value } => {
                write!(f, "latency minutes must not be negative (got {value})")
            }
            Self::LatencyTooLarge { value, max } => {
                write!(f, "latency minutes must be at most {max} (got {value})")
            }
            Self::NegativeAwakenings { value } => {
                write!(f, "awakenings must not be negative (got {value})")
            }
            Self::AwakeningsTooLarge { value, max } => {
                write!(f, "awakenings must be at most {max} (got {value})")
            }
            Self::TagsTooLong { length, max } => {
                write!(f, "tags must be at most {max} characters (got {length})")
            }
            Self::NonPositiveTargetHours { .. } => {
                write!(f, "Target hours must be a positive number.")
            }
            Self::TargetHoursTooLarge { value } => {
                write!(f, "target hours must be below 100 (got {value})")
            }
            Self::TargetHoursTooPrecise { value } => {
                write!(f, "target hours allow at most 2 decimal places (got {value})")
            }
            Self::WaketimeNotAfterBedtime { .. } => write!(f, "Wake time must be after bed time."),
        }
    }
}

impl std::error::Error for SleepValidationError {}

impl From<SleepValidationError> for Error {
    fn from(value: SleepValidationError) -> Self {
        let details = match &value {
            SleepValidationError::EndNotAfterStart { start, end } => json!({
                "field": value.field(),
                "code": value.code(),
                "start": start.to_rfc3339(),
                "value": end.to_rfc3339(),
            }),
            SleepValidationError::NegativeQuality { value: raw }
            | SleepValidationError::QualityTooLarge { value: raw, .. }
            | SleepValidationError::NegativeLatency { value: raw }
            | SleepValidationError::LatencyTooLarge { value: raw, .. }
            | SleepValidationError::NegativeAwakenings { value: raw }
            | SleepValidationError::AwakeningsTooLarge { value: raw, .. } => json!({
                "field": value.field(),
                "code": value.code(),
                "value": raw,
            }),
            SleepValidationError::NonPositiveTargetHours { value: raw }
            | SleepValidationError::TargetHoursTooLarge { value: raw }
            | SleepValidationError::TargetHoursTooPrecise { value: raw } => json!({
                "field": value.field(),
                "code": value.code(),
                "value": raw.to_string(),
            }),
            SleepValidationError::TagsTooLong { .. }
            | SleepValidationError::WaketimeNotAfterBedtime { .. } => json!({
                "field": value.field(),
                "code": value.code(),
            }),
        };
        Error::invalid_request(value.to_string()).with_details(details)
    }
}
