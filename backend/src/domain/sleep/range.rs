//! Start-time filters for session listings.

use chrono::{DateTime, Days, NaiveDate, Utc};

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

/// Half-open window on session start times.
///
/// Built from calendar dates: `from` is inclusive at midnight UTC and `until`
/// covers the whole of its day, so the stored bound is the next midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionRange {
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl SessionRange {
    /// Range covering `start_date` through `end_date` inclusive.
    ///
    /// # Examples
    /// ```
    /// use chrono::{NaiveDate, TimeZone, Utc};
    /// use slumbertrack::domain::SessionRange;
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    /// let range = SessionRange::from_dates(None, Some(day));
    /// assert!(range.contains(Utc.with_ymd_and_hms(2025, 3, 1, 23, 59, 0).unwrap()));
    /// assert!(!range.contains(Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap()));
    /// ```
    pub fn from_dates(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            from: start_date.and_then(midnight),
            until: end_date
                .and_then(|date| date.checked_add_days(Days::new(1)))
                .and_then(midnight),
        }
    }

    /// Inclusive lower bound.
    pub fn from(&self) -> Option<DateTime<Utc>> {
        self.from
    }

    /// Exclusive upper bound.
    pub fn until(&self) -> Option<DateTime<Utc>> {
        self.until
    }

    /// Whether a session starting at `start` falls inside the range.
    pub fn contains(&self, start: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| start >= from) && self.until.is_none_or(|until| start < until)
    }
}
