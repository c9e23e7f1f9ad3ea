//! Driving port for sleep goal mutations.

use async_trait::async_trait;

use crate::domain::{Error, GoalPatch, SleepGoal, SleepGoalInput, UserId};

/// Driving port for the owner's singleton goal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepGoalCommand: Send + Sync {
    /// Create the goal or replace it wholesale.
    async fn put(&self, owner: &UserId, input: SleepGoalInput) -> Result<SleepGoal, Error>;

    /// Merge `patch` onto the stored goal, starting from the defaults when
    /// no goal exists yet.
    async fn patch(&self, owner: &UserId, patch: GoalPatch) -> Result<SleepGoal, Error>;

    /// Remove the goal. Fails with a conflict while the owner has sessions.
    async fn delete(&self, owner: &UserId) -> Result<(), Error>;
}

/// Fixture command that validates input without storing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepGoalCommand;

#[async_trait]
impl SleepGoalCommand for FixtureSleepGoalCommand {
    async fn put(&self, owner: &UserId, input: SleepGoalInput) -> Result<SleepGoal, Error> {
        Ok(SleepGoal::new(input.into_draft(owner.clone()))?)
    }

    async fn patch(&self, owner: &UserId, patch: GoalPatch) -> Result<SleepGoal, Error> {
        let defaults = SleepGoal::new(SleepGoalInput::default().into_draft(owner.clone()))?;
        Ok(patch.apply_to(&defaults)?)
    }

    async fn delete(&self, _owner: &UserId) -> Result<(), Error> {
        Err(Error::not_found("sleep goal not set"))
    }
}
