//! Per-user sleep goal.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

use crate::domain::UserId;

use super::SleepValidationError;

/// Target used when a goal is created without explicit hours (8.00).
pub const DEFAULT_TARGET_HOURS: Decimal = Decimal::from_parts(800, 0, 0, false, 2);

const TARGET_HOURS_SCALE: u32 = 2;
const TARGET_HOURS_LIMIT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Input payload for [`SleepGoal::new`].
#[derive(Debug, Clone)]
pub struct SleepGoalDraft {
    pub user_id: UserId,
    pub target_hours: Decimal,
    pub target_bedtime: Option<NaiveTime>,
    pub target_waketime: Option<NaiveTime>,
}

/// Caller-supplied goal fields for create-or-replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SleepGoalInput {
    pub target_hours: Option<Decimal>,
    pub target_bedtime: Option<NaiveTime>,
    pub target_waketime: Option<NaiveTime>,
}

impl SleepGoalInput {
    /// Apply the 8-hour default and attach the owner.
    pub fn into_draft(self, user_id: UserId) -> SleepGoalDraft {
        SleepGoalDraft {
            user_id,
            target_hours: self.target_hours.unwrap_or(DEFAULT_TARGET_HOURS),
            target_bedtime: self.target_bedtime,
            target_waketime: self.target_waketime,
        }
    }
}

/// A user's sleep target.
///
/// ## Invariants
/// - `0 < target_hours < 100`, with at most two decimal places.
/// - When both times are set, waketime follows bedtime either on the same
///   day or, for an evening bedtime and a morning waketime, on the next day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepGoal {
    user_id: UserId,
    target_hours: Decimal,
    target_bedtime: Option<NaiveTime>,
    target_waketime: Option<NaiveTime>,
}

/// Whether waking at `waketime` can follow going to bed at `bedtime`.
///
/// Same-day windows need `bedtime < waketime`. A window crosses midnight
/// only when bedtime is in the afternoon or evening (12:00 onwards) and
/// waketime is in the morning (before 12:00); `08:00 -> 07:00` is neither.
pub(crate) fn window_is_consistent(bedtime: NaiveTime, waketime: NaiveTime) -> bool {
    if bedtime < waketime {
        return true;
    }
    bedtime.hour() >= 12 && waketime.hour() < 12
}

impl SleepGoal {
    /// Creates a validated goal.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveTime;
    /// use slumbertrack::domain::{SleepGoal, SleepGoalInput, UserId};
    ///
    /// let input = SleepGoalInput {
    ///     target_bedtime: NaiveTime::from_hms_opt(23, 0, 0),
    ///     target_waketime: NaiveTime::from_hms_opt(7, 0, 0),
    ///     ..SleepGoalInput::default()
    /// };
    /// let goal = SleepGoal::new(input.into_draft(UserId::random())).unwrap();
    /// assert_eq!(goal.target_hours().to_string(), "8.00");
    /// ```
    pub fn new(draft: SleepGoalDraft) -> Result<Self, SleepValidationError> {
        let SleepGoalDraft {
            user_id,
            target_hours,
            target_bedtime,
            target_waketime,
        } = draft;

        if target_hours <= Decimal::ZERO {
            return Err(SleepValidationError::NonPositiveTargetHours {
                value: target_hours,
            });
        }
        if target_hours >= TARGET_HOURS_LIMIT {
            return Err(SleepValidationError::TargetHoursTooLarge {
                value: target_hours,
            });
        }
        if target_hours.normalize().scale() > TARGET_HOURS_SCALE {
            return Err(SleepValidationError::TargetHoursTooPrecise {
                value: target_hours,
            });
        }
        if let (Some(bedtime), Some(waketime)) = (target_bedtime, target_waketime) {
            if !window_is_consistent(bedtime, waketime) {
                return Err(SleepValidationError::WaketimeNotAfterBedtime { bedtime, waketime });
            }
        }

        let mut target_hours = target_hours;
        target_hours.rescale(TARGET_HOURS_SCALE);

        Ok(Self {
            user_id,
            target_hours,
            target_bedtime,
            target_waketime,
        })
    }

    /// Owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Target sleep per night, always carried at two decimal places.
    pub fn target_hours(&self) -> Decimal {
        self.target_hours
    }

    pub fn target_bedtime(&self) -> Option<NaiveTime> {
        self.target_bedtime
    }

    pub fn target_waketime(&self) -> Option<NaiveTime> {
        self.target_waketime
    }

    /// Break the goal back into a draft, e.g. to apply a patch.
    pub fn to_draft(&self) -> SleepGoalDraft {
        SleepGoalDraft {
            user_id: self.user_id.clone(),
            target_hours: self.target_hours,
            target_bedtime: self.target_bedtime,
            target_waketime: self.target_waketime,
        }
    }
}
