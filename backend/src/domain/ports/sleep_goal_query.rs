//! Driving port for reading the owner's sleep goal.

use async_trait::async_trait;

use crate::domain::{Error, SleepGoal, UserId};

/// Driving port for goal reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepGoalQuery: Send + Sync {
    /// The owner's goal, or a not-found error when none was set.
    async fn get(&self, owner: &UserId) -> Result<SleepGoal, Error>;
}

/// Fixture query for a user who never set a goal.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepGoalQuery;

#[async_trait]
impl SleepGoalQuery for FixtureSleepGoalQuery {
    async fn get(&self, _owner: &UserId) -> Result<SleepGoal, Error> {
        Err(Error::not_found("sleep goal not set"))
    }
}
