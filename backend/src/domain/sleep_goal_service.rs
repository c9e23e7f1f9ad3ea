//! Sleep goal domain service.
//!
//! Each user has at most one goal. Deleting it is refused while the user has
//! any recorded sessions so that historical attainment keeps its meaning.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    SleepGoalCommand, SleepGoalQuery, SleepGoalRepository, SleepSessionRepository,
};
use crate::domain::sleep_session_service::{
    map_goal_repository_error, map_session_repository_error,
};
use crate::domain::{Error, GoalPatch, SleepGoal, SleepGoalInput, UserId};

fn goal_not_set() -> Error {
    Error::not_found("sleep goal not set")
}

/// Goal service implementing the goal command and query driving ports.
#[derive(Clone)]
pub struct SleepGoalService<G, S> {
    goals: Arc<G>,
    sessions: Arc<S>,
}

impl<G, S> SleepGoalService<G, S> {
    /// Create a new service over the goal and session repositories.
    pub fn new(goals: Arc<G>, sessions: Arc<S>) -> Self {
        Self { goals, sessions }
    }
}

impl<G, S> SleepGoalService<G, S>
where
    G: SleepGoalRepository,
    S: SleepSessionRepository,
{
    async fn stored(&self, owner: &UserId) -> Result<Option<SleepGoal>, Error> {
        self.goals
            .find_for_user(owner)
            .await
            .map_err(map_goal_repository_error)
    }

    async fn save(&self, goal: SleepGoal) -> Result<SleepGoal, Error> {
        self.goals
            .upsert(&goal)
            .await
            .map_err(map_goal_repository_error)?;
        Ok(goal)
    }
}

#[async_trait]
impl<G, S> SleepGoalCommand for SleepGoalService<G, S>
where
    G: SleepGoalRepository,
    S: SleepSessionRepository,
{
    async fn put(&self, owner: &UserId, input: SleepGoalInput) -> Result<SleepGoal, Error> {
        let goal = SleepGoal::new(input.into_draft(owner.clone()))?;
        self.save(goal).await
    }

    async fn patch(&self, owner: &UserId, patch: GoalPatch) -> Result<SleepGoal, Error> {
        let current = match self.stored(owner).await? {
            Some(goal) => goal,
            None => SleepGoal::new(SleepGoalInput::default().into_draft(owner.clone()))?,
        };
        let goal = patch.apply_to(&current)?;
        self.save(goal).await
    }

    async fn delete(&self, owner: &UserId) -> Result<(), Error> {
        if self.stored(owner).await?.is_none() {
            return Err(goal_not_set());
        }
        let sessions = self
            .sessions
            .count_for_user(owner)
            .await
            .map_err(map_session_repository_error)?;
        if sessions > 0 {
            info!(user_id = %owner, sessions, "goal deletion refused");
            return Err(
                Error::conflict("Cannot delete goal while sleep sessions exist.").with_details(
                    json!({ "code": "sessions_exist", "sessions": sessions }),
                ),
            );
        }
        let deleted = self
            .goals
            .delete_for_user(owner)
            .await
            .map_err(map_goal_repository_error)?;
        if deleted { Ok(()) } else { Err(goal_not_set()) }
    }
}

#[async_trait]
impl<G, S> SleepGoalQuery for SleepGoalService<G, S>
where
    G: SleepGoalRepository,
    S: SleepSessionRepository,
{
    async fn get(&self, owner: &UserId) -> Result<SleepGoal, Error> {
        self.stored(owner).await?.ok_or_else(goal_not_set)
    }
}
