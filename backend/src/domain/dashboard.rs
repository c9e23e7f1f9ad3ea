//! Dashboard aggregates over a user's most recent sessions.

use rust_decimal::prelude::ToPrimitive;

use crate::domain::{GoalAttainment, SessionView, SleepGoal, SleepSession, round_hundredths};

/// Number of recent sessions the dashboard covers.
pub const DASHBOARD_WINDOW: usize = 30;

/// Chart series and averages for the dashboard.
///
/// Series are chronological (oldest first) so they plot left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub labels: Vec<String>,
    pub hours: Vec<f64>,
    pub quality: Vec<i16>,
    pub goal_hours: Option<f64>,
    pub avg_hours: f64,
    pub avg_quality: f64,
    pub session_count: usize,
    pub goal_met_count: usize,
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        return 0.0;
    }
    round_hundredths(values.sum::<f64>() / count as f64)
}

impl DashboardSummary {
    /// Summarise `recent`, given newest first as the store returns them.
    ///
    /// # Examples
    /// ```
    /// use slumbertrack::domain::DashboardSummary;
    ///
    /// let summary = DashboardSummary::from_recent(Vec::new(), None);
    /// assert_eq!(summary.avg_hours, 0.0);
    /// assert!(summary.labels.is_empty());
    /// ```
    pub fn from_recent(recent: Vec<SleepSession>, goal: Option<&SleepGoal>) -> Self {
        let views: Vec<SessionView> = recent
            .into_iter()
            .take(DASHBOARD_WINDOW)
            .rev()
            .map(|session| SessionView::new(session, goal))
            .collect();

        let labels = views
            .iter()
            .map(|view| view.session.start().format("%b %d").to_string())
            .collect();
        let hours: Vec<f64> = views.iter().map(|view| view.duration_hours).collect();
        let quality: Vec<i16> = views.iter().map(|view| view.session.quality()).collect();
        let goal_met_count = views
            .iter()
            .filter(|view| view.attainment == GoalAttainment::Met)
            .count();

        Self {
            labels,
            avg_hours: mean(hours.iter().copied()),
            avg_quality: mean(quality.iter().map(|value| f64::from(*value))),
            hours,
            quality,
            goal_hours: goal.and_then(|goal| goal.target_hours().to_f64()),
            session_count: views.len(),
            goal_met_count,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{SleepGoalInput, SleepSessionInput, UserId};

    fn nightly(owner: &UserId, day: u32, minutes: i64, quality: i64) -> SleepSession {
        let start = Utc
            .with_ymd_and_hms(2025, 3, day, 23, 0, 0)
            .single()
            .expect("fixture timestamp");
        let input = SleepSessionInput {
            quality: Some(quality),
            ..SleepSessionInput::window(start, start + Duration::minutes(minutes))
        };
        SleepSession::new(input.into_draft(Uuid::new_v4(), owner.clone())).expect("valid")
    }

    #[rstest]
    fn series_are_chronological_with_averages() {
        let owner = UserId::random();
        let newest_first = vec![
            nightly(&owner, 3, 480, 5),
            nightly(&owner, 2, 420, 3),
            nightly(&owner, 1, 390, 2),
        ];
        let goal = SleepGoal::new(SleepGoalInput::default().into_draft(owner)).expect("goal");

        let summary = DashboardSummary::from_recent(newest_first, Some(&goal));

        assert_eq!(summary.labels, vec!["Mar 01", "Mar 02", "Mar 03"]);
        assert_eq!(summary.hours, vec![6.5, 7.0, 8.0]);
        assert_eq!(summary.quality, vec![2, 3, 5]);
        assert_eq!(summary.avg_hours, 7.17);
        assert_eq!(summary.avg_quality, 3.33);
        assert_eq!(summary.goal_hours, Some(8.0));
        assert_eq!(summary.goal_met_count, 1);
        assert_eq!(summary.session_count, 3);
    }

    #[rstest]
    fn only_the_latest_window_is_considered() {
        let owner = UserId::random();
        let sessions: Vec<_> = (1..=31)
            .rev()
            .map(|day| nightly(&owner, day, 420, 3))
            .collect();
        let summary = DashboardSummary::from_recent(sessions, None);
        assert_eq!(summary.session_count, DASHBOARD_WINDOW);
        assert_eq!(summary.labels.first().map(String::as_str), Some("Mar 02"));
        assert_eq!(summary.goal_hours, None);
    }
}
