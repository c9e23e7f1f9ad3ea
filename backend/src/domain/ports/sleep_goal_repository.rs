//! Port for per-user sleep goal persistence.

use async_trait::async_trait;

use crate::domain::{SleepGoal, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by sleep goal repository adapters.
    pub enum SleepGoalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sleep goal repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "sleep goal repository query failed: {message}",
    }
}

/// Port for the one-goal-per-user store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepGoalRepository: Send + Sync {
    /// Fetch the owner's goal, if one was set.
    async fn find_for_user(&self, owner: &UserId)
    -> Result<Option<SleepGoal>, SleepGoalRepositoryError>;

    /// Insert the goal or replace the owner's existing one.
    async fn upsert(&self, goal: &SleepGoal) -> Result<(), SleepGoalRepositoryError>;

    /// Remove the owner's goal. Returns `false` when none was stored.
    async fn delete_for_user(&self, owner: &UserId) -> Result<bool, SleepGoalRepositoryError>;
}

/// Fixture implementation for users who never set a goal.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepGoalRepository;

#[async_trait]
impl SleepGoalRepository for FixtureSleepGoalRepository {
    async fn find_for_user(
        &self,
        _owner: &UserId,
    ) -> Result<Option<SleepGoal>, SleepGoalRepositoryError> {
        Ok(None)
    }

    async fn upsert(&self, _goal: &SleepGoal) -> Result<(), SleepGoalRepositoryError> {
        Ok(())
    }

    async fn delete_for_user(&self, _owner: &UserId) -> Result<bool, SleepGoalRepositoryError> {
        Ok(false)
    }
}
