//! Driving port for sleep session reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    DashboardSummary, Error, Page, PageRequest, SessionRange, SessionView, UserId,
};

/// Driving port for reading sessions with their derived values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepSessionQuery: Send + Sync {
    /// One of the owner's sessions.
    async fn get(&self, owner: &UserId, id: Uuid) -> Result<SessionView, Error>;

    /// A page of the owner's sessions, newest first.
    async fn list(
        &self,
        owner: &UserId,
        range: SessionRange,
        page: PageRequest,
    ) -> Result<Page<SessionView>, Error>;

    /// All of the owner's sessions, newest first, for CSV export.
    async fn export(&self, owner: &UserId) -> Result<Vec<SessionView>, Error>;

    /// Chart series and averages over recent sessions.
    async fn dashboard(&self, owner: &UserId) -> Result<DashboardSummary, Error>;
}

/// Fixture query for a user with no sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepSessionQuery;

#[async_trait]
impl SleepSessionQuery for FixtureSleepSessionQuery {
    async fn get(&self, _owner: &UserId, id: Uuid) -> Result<SessionView, Error> {
        Err(Error::not_found(format!("sleep session {id} not found")))
    }

    async fn list(
        &self,
        _owner: &UserId,
        _range: SessionRange,
        page: PageRequest,
    ) -> Result<Page<SessionView>, Error> {
        Ok(Page::from_ordered(Vec::new(), page))
    }

    async fn export(&self, _owner: &UserId) -> Result<Vec<SessionView>, Error> {
        Ok(Vec::new())
    }

    async fn dashboard(&self, _owner: &UserId) -> Result<DashboardSummary, Error> {
        Ok(DashboardSummary::from_recent(Vec::new(), None))
    }
}
