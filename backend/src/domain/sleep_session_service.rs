//! Sleep session domain service.
//!
//! Implements the session command and query driving ports over the session
//! and goal repositories. Derived values are attached on every read using
//! the owner's goal as it stands at that moment.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    ImportRow, ImportSummary, SleepGoalRepository, SleepGoalRepositoryError, SleepSessionCommand,
    SleepSessionQuery, SleepSessionRepository, SleepSessionRepositoryError,
};
use crate::domain::{
    DASHBOARD_WINDOW, DashboardSummary, Error, Page, PageRequest, SessionPatch, SessionRange,
    SessionView, SleepGoal, SleepSession, SleepSessionInput, UserId,
};

pub(crate) fn map_session_repository_error(error: SleepSessionRepositoryError) -> Error {
    match error {
        SleepSessionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("sleep session repository unavailable: {message}"))
        }
        SleepSessionRepositoryError::Query { message } => {
            Error::internal(format!("sleep session repository error: {message}"))
        }
    }
}

pub(crate) fn map_goal_repository_error(error: SleepGoalRepositoryError) -> Error {
    match error {
        SleepGoalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("sleep goal repository unavailable: {message}"))
        }
        SleepGoalRepositoryError::Query { message } => {
            Error::internal(format!("sleep goal repository error: {message}"))
        }
    }
}

fn session_not_found(id: Uuid) -> Error {
    Error::not_found(format!("sleep session {id} not found"))
}

fn import_failed(row: usize, reason: &str, imported: usize) -> Error {
    Error::invalid_request(format!("Error importing CSV: row {row}: {reason}")).with_details(
        json!({
            "field": "file",
            "code": "import_row_invalid",
            "row": row,
            "imported": imported,
        }),
    )
}

/// Session service implementing the command and query driving ports.
#[derive(Clone)]
pub struct SleepSessionService<S, G> {
    sessions: Arc<S>,
    goals: Arc<G>,
}

impl<S, G> SleepSessionService<S, G> {
    /// Create a new service over the session and goal repositories.
    pub fn new(sessions: Arc<S>, goals: Arc<G>) -> Self {
        Self { sessions, goals }
    }
}

impl<S, G> SleepSessionService<S, G>
where
    S: SleepSessionRepository,
    G: SleepGoalRepository,
{
    async fn goal_for(&self, owner: &UserId) -> Result<Option<SleepGoal>, Error> {
        self.goals
            .find_for_user(owner)
            .await
            .map_err(map_goal_repository_error)
    }

    async fn existing(&self, owner: &UserId, id: Uuid) -> Result<SleepSession, Error> {
        self.sessions
            .find(owner, id)
            .await
            .map_err(map_session_repository_error)?
            .ok_or_else(|| session_not_found(id))
    }

    async fn store_update(&self, session: SleepSession) -> Result<SessionView, Error> {
        let updated = self
            .sessions
            .update(&session)
            .await
            .map_err(map_session_repository_error)?;
        if !updated {
            return Err(session_not_found(session.id()));
        }
        let goal = self.goal_for(session.user_id()).await?;
        Ok(SessionView::new(session, goal.as_ref()))
    }
}

#[async_trait]
impl<S, G> SleepSessionCommand for SleepSessionService<S, G>
where
    S: SleepSessionRepository,
    G: SleepGoalRepository,
{
    async fn create(
        &self,
        owner: &UserId,
        input: SleepSessionInput,
    ) -> Result<SessionView, Error> {
        let session = SleepSession::new(input.into_draft(Uuid::new_v4(), owner.clone()))?;
        self.sessions
            .insert(&session)
            .await
            .map_err(map_session_repository_error)?;
        let goal = self.goal_for(owner).await?;
        Ok(SessionView::new(session, goal.as_ref()))
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: Uuid,
        input: SleepSessionInput,
    ) -> Result<SessionView, Error> {
        self.existing(owner, id).await?;
        let session = SleepSession::new(input.into_draft(id, owner.clone()))?;
        self.store_update(session).await
    }

    async fn patch(
        &self,
        owner: &UserId,
        id: Uuid,
        patch: SessionPatch,
    ) -> Result<SessionView, Error> {
        let current = self.existing(owner, id).await?;
        let session = patch.apply_to(&current)?;
        self.store_update(session).await
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), Error> {
        let deleted = self
            .sessions
            .delete(owner, id)
            .await
            .map_err(map_session_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(session_not_found(id))
        }
    }

    async fn import(&self, owner: &UserId, rows: Vec<ImportRow>) -> Result<ImportSummary, Error> {
        let mut imported = 0;
        for ImportRow { row, parsed } in rows {
            let input = match parsed {
                Ok(input) => input,
                Err(reason) => {
                    warn!(user_id = %owner, row, imported, %reason, "csv import aborted");
                    return Err(import_failed(row, &reason, imported));
                }
            };
            let session = match SleepSession::new(input.into_draft(Uuid::new_v4(), owner.clone()))
            {
                Ok(session) => session,
                Err(err) => {
                    warn!(user_id = %owner, row, imported, error = %err, "csv import aborted");
                    return Err(import_failed(row, &err.to_string(), imported));
                }
            };
            self.sessions
                .insert(&session)
                .await
                .map_err(map_session_repository_error)?;
            imported += 1;
        }
        info!(user_id = %owner, imported, "csv import finished");
        Ok(ImportSummary { imported })
    }
}

#[async_trait]
impl<S, G> SleepSessionQuery for SleepSessionService<S, G>
where
    S: SleepSessionRepository,
    G: SleepGoalRepository,
{
    async fn get(&self, owner: &UserId, id: Uuid) -> Result<SessionView, Error> {
        let session = self.existing(owner, id).await?;
        let goal = self.goal_for(owner).await?;
        Ok(SessionView::new(session, goal.as_ref()))
    }

    async fn list(
        &self,
        owner: &UserId,
        range: SessionRange,
        page: PageRequest,
    ) -> Result<Page<SessionView>, Error> {
        let sessions = self
            .sessions
            .list(owner, range, page)
            .await
            .map_err(map_session_repository_error)?;
        let goal = self.goal_for(owner).await?;
        Ok(sessions.map(|session| SessionView::new(session, goal.as_ref())))
    }

    async fn export(&self, owner: &UserId) -> Result<Vec<SessionView>, Error> {
        let sessions = self
            .sessions
            .list_all(owner)
            .await
            .map_err(map_session_repository_error)?;
        let goal = self.goal_for(owner).await?;
        Ok(sessions
            .into_iter()
            .map(|session| SessionView::new(session, goal.as_ref()))
            .collect())
    }

    async fn dashboard(&self, owner: &UserId) -> Result<DashboardSummary, Error> {
        let recent = self
            .sessions
            .recent(owner, DASHBOARD_WINDOW)
            .await
            .map_err(map_session_repository_error)?;
        let goal = self.goal_for(owner).await?;
        Ok(DashboardSummary::from_recent(recent, goal.as_ref()))
    }
}

#[cfg(test)]
#[path = "sleep_session_service_tests.rs"]
mod tests;
