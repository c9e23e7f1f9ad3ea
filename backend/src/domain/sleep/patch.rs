//! Partial updates for sessions and goals.
//!
//! A patch is merged onto the stored aggregate and the result goes through
//! the full constructor again. That way a patch touching only `start` is
//! still checked against the stored `end`.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use super::{SleepGoal, SleepSession, SleepValidationError, StageSample};

/// Fields to change on a stored session; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub quality: Option<i64>,
    pub latency_minutes: Option<i64>,
    pub awakenings: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub stages: Option<Vec<StageSample>>,
}

impl SessionPatch {
    /// Merge onto `current` and revalidate the result.
    pub fn apply_to(self, current: &SleepSession) -> Result<SleepSession, SleepValidationError> {
        let mut draft = current.to_draft();
        if let Some(start) = self.start {
            draft.start = start;
        }
        if let Some(end) = self.end {
            draft.end = end;
        }
        if let Some(quality) = self.quality {
            draft.quality = quality;
        }
        if let Some(latency) = self.latency_minutes {
            draft.latency_minutes = latency;
        }
        if let Some(awakenings) = self.awakenings {
            draft.awakenings = awakenings;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
        if let Some(tags) = self.tags {
            draft.tags = tags;
        }
        if self.stages.is_some() {
            draft.stages = self.stages;
        }
        SleepSession::new(draft)
    }
}

/// Fields to change on a stored goal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub target_hours: Option<Decimal>,
    pub target_bedtime: Option<NaiveTime>,
    pub target_waketime: Option<NaiveTime>,
}

impl GoalPatch {
    /// Merge onto `current` and revalidate the result.
    pub fn apply_to(self, current: &SleepGoal) -> Result<SleepGoal, SleepValidationError> {
        let mut draft = current.to_draft();
        if let Some(hours) = self.target_hours {
            draft.target_hours = hours;
        }
        if self.target_bedtime.is_some() {
            draft.target_bedtime = self.target_bedtime;
        }
        if self.target_waketime.is_some() {
            draft.target_waketime = self.target_waketime;
        }
        SleepGoal::new(draft)
    }
}
