//! Optional hypnogram samples attached to a sleep session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sleep stage reported by a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SleepStage {
    Awake,
    Light,
    Deep,
    Rem,
}

impl SleepStage {
    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Awake => "awake",
            Self::Light => "light",
            Self::Deep => "deep",
            Self::Rem => "rem",
        }
    }
}

impl fmt::Display for SleepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown stage name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSleepStageError(String);

impl fmt::Display for ParseSleepStageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown sleep stage {:?}; expected awake, light, deep or rem",
            self.0
        )
    }
}

impl std::error::Error for ParseSleepStageError {}

impl FromStr for SleepStage {
    type Err = ParseSleepStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "awake" => Ok(Self::Awake),
            "light" => Ok(Self::Light),
            "deep" => Ok(Self::Deep),
            "rem" => Ok(Self::Rem),
            _ => Err(ParseSleepStageError(s.to_owned())),
        }
    }
}

/// One `{t, stage}` sample.
///
/// `t` is kept as the caller wrote it (a clock time such as `"02:30"` or a
/// full timestamp) and is not checked against the session window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StageSample {
    #[schema(example = "02:30")]
    pub t: String,
    pub stage: SleepStage,
}
