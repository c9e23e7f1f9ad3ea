//! Sleep session aggregate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::UserId;

use super::{SleepValidationError, StageSample};

/// Quality rating used when the caller leaves it out.
pub const DEFAULT_QUALITY: i64 = 3;
/// Maximum length of the comma-separated tag list.
pub const TAGS_MAX: usize = 200;

/// Comma-separated free-text labels such as `"caffeine, workout"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(String);

impl Tags {
    /// Validate the raw tag text.
    pub fn new(raw: impl Into<String>) -> Result<Self, SleepValidationError> {
        let raw = raw.into();
        let length = raw.chars().count();
        if length > TAGS_MAX {
            return Err(SleepValidationError::TagsTooLong {
                length,
                max: TAGS_MAX,
            });
        }
        Ok(Self(raw))
    }

    /// Raw text as entered.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Individual labels, trimmed, with empty entries dropped.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split(',').map(str::trim).filter(|tag| !tag.is_empty())
    }
}

/// Input payload for [`SleepSession::new`].
///
/// Counters are signed so that negative input reaches validation instead of
/// failing to decode.
#[derive(Debug, Clone)]
pub struct SleepSessionDraft {
    pub id: Uuid,
    pub user_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quality: i64,
    pub latency_minutes: i64,
    pub awakenings: i64,
    pub notes: String,
    pub tags: String,
    pub stages: Option<Vec<StageSample>>,
}

/// Caller-supplied session fields, before identity and defaults are applied.
///
/// Used for creation, full replacement and CSV import rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepSessionInput {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quality: Option<i64>,
    pub latency_minutes: Option<i64>,
    pub awakenings: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub stages: Option<Vec<StageSample>>,
}

impl SleepSessionInput {
    /// Input with only the required time window set.
    pub fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            quality: None,
            latency_minutes: None,
            awakenings: None,
            notes: None,
            tags: None,
            stages: None,
        }
    }

    /// Apply defaults (quality 3, latency 0, awakenings 0, empty text).
    pub fn into_draft(self, id: Uuid, user_id: UserId) -> SleepSessionDraft {
        SleepSessionDraft {
            id,
            user_id,
            start: self.start,
            end: self.end,
            quality: self.quality.unwrap_or(DEFAULT_QUALITY),
            latency_minutes: self.latency_minutes.unwrap_or(0),
            awakenings: self.awakenings.unwrap_or(0),
            notes: self.notes.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            stages: self.stages,
        }
    }
}

/// A validated sleep session owned by one user.
///
/// ## Invariants
/// - `end` is strictly after `start`.
/// - `quality`, `latency_minutes` and `awakenings` are non-negative.
/// - `tags` is at most [`TAGS_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepSession {
    id: Uuid,
    user_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    quality: i16,
    latency_minutes: i32,
    awakenings: i32,
    notes: String,
    tags: Tags,
    stages: Option<Vec<StageSample>>,
}

/// Narrow a signed counter to its storage type, rejecting negatives.
fn bounded<T>(
    value: i64,
    max: T,
    negative: fn(i64) -> SleepValidationError,
    too_large: fn(i64, i64) -> SleepValidationError,
) -> Result<T, SleepValidationError>
where
    T: TryFrom<i64> + Into<i64>,
{
    if value < 0 {
        return Err(negative(value));
    }
    T::try_from(value).map_err(|_| too_large(value, max.into()))
}

impl SleepSession {
    /// Creates a validated session.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use slumbertrack::domain::{SleepSession, SleepSessionInput, UserId};
    /// use uuid::Uuid;
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 1, 1, 23, 0, 0).unwrap();
    /// let draft = SleepSessionInput::window(start, start + Duration::minutes(450))
    ///     .into_draft(Uuid::new_v4(), UserId::random());
    /// let session = SleepSession::new(draft).unwrap();
    /// assert_eq!(session.quality(), 3);
    /// ```
    pub fn new(draft: SleepSessionDraft) -> Result<Self, SleepValidationError> {
        let SleepSessionDraft {
            id,
            user_id,
            start,
            end,
            quality,
            latency_minutes,
            awakenings,
            notes,
            tags,
            stages,
        } = draft;

        if start >= end {
            return Err(SleepValidationError::EndNotAfterStart { start, end });
        }
        let quality = bounded(
            quality,
            i16::MAX,
            |value| SleepValidationError::NegativeQuality { value },
            |value, max| SleepValidationError::QualityTooLarge { value, max },
        )?;
        let latency_minutes = bounded(
            latency_minutes,
            i32::MAX,
            |value| SleepValidationError::NegativeLatency { value },
            |value, max| SleepValidationError::LatencyTooLarge { value, max },
        )?;
        let awakenings = bounded(
            awakenings,
            i32::MAX,
            |value| SleepValidationError::NegativeAwakenings { value },
            |value, max| SleepValidationError::AwakeningsTooLarge { value, max },
        )?;
        let tags = Tags::new(tags)?;

        Ok(Self {
            id,
            user_id,
            start,
            end,
            quality,
            latency_minutes,
            awakenings,
            notes,
            tags,
            stages,
        })
    }

    /// Session id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// When the user went to sleep.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// When the user woke up.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Self-reported quality, conventionally 1 (poor) to 5 (excellent).
    pub fn quality(&self) -> i16 {
        self.quality
    }

    /// Minutes taken to fall asleep.
    pub fn latency_minutes(&self) -> i32 {
        self.latency_minutes
    }

    /// Number of times the user woke during the night.
    pub fn awakenings(&self) -> i32 {
        self.awakenings
    }

    pub fn notes(&self) -> &str {
        self.notes.as_str()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Stage samples in submission order, when recorded.
    pub fn stages(&self) -> Option<&[StageSample]> {
        self.stages.as_deref()
    }

    /// Break the session back into a draft, e.g. to apply a patch.
    pub fn to_draft(&self) -> SleepSessionDraft {
        SleepSessionDraft {
            id: self.id,
            user_id: self.user_id.clone(),
            start: self.start,
            end: self.end,
            quality: i64::from(self.quality),
            latency_minutes: i64::from(self.latency_minutes),
            awakenings: i64::from(self.awakenings),
            notes: self.notes.clone(),
            tags: self.tags.as_str().to_owned(),
            stages: self.stages.clone(),
        }
    }
}
