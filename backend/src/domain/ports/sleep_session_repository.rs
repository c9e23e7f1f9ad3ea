//! Port for sleep session persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, SessionRange, SleepSession, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by sleep session repository adapters.
    pub enum SleepSessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sleep session repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "sleep session repository query failed: {message}",
    }
}

/// Port for reading and writing sleep sessions.
///
/// Every read and delete is scoped to an owner; a session that belongs to
/// someone else is indistinguishable from one that does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepSessionRepository: Send + Sync {
    /// Persist a new session.
    async fn insert(&self, session: &SleepSession) -> Result<(), SleepSessionRepositoryError>;

    /// Overwrite a stored session. Returns `false` when no row matched.
    async fn update(&self, session: &SleepSession) -> Result<bool, SleepSessionRepositoryError>;

    /// Delete the owner's session. Returns `false` when no row matched.
    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, SleepSessionRepositoryError>;

    /// Find one of the owner's sessions.
    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<SleepSession>, SleepSessionRepositoryError>;

    /// One page of the owner's sessions within `range`, newest start first.
    async fn list(
        &self,
        owner: &UserId,
        range: SessionRange,
        page: PageRequest,
    ) -> Result<Page<SleepSession>, SleepSessionRepositoryError>;

    /// Every session of the owner, newest start first.
    async fn list_all(&self, owner: &UserId)
    -> Result<Vec<SleepSession>, SleepSessionRepositoryError>;

    /// The owner's `limit` most recent sessions, newest start first.
    async fn recent(
        &self,
        owner: &UserId,
        limit: usize,
    ) -> Result<Vec<SleepSession>, SleepSessionRepositoryError>;

    /// Number of sessions the owner has recorded.
    async fn count_for_user(&self, owner: &UserId) -> Result<u64, SleepSessionRepositoryError>;
}

/// Fixture implementation for tests that do not exercise session storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepSessionRepository;

#[async_trait]
impl SleepSessionRepository for FixtureSleepSessionRepository {
    async fn insert(&self, _session: &SleepSession) -> Result<(), SleepSessionRepositoryError> {
        Ok(())
    }

    async fn update(&self, _session: &SleepSession) -> Result<bool, SleepSessionRepositoryError> {
        Ok(false)
    }

    async fn delete(
        &self,
        _owner: &UserId,
        _id: Uuid,
    ) -> Result<bool, SleepSessionRepositoryError> {
        Ok(false)
    }

    async fn find(
        &self,
        _owner: &UserId,
        _id: Uuid,
    ) -> Result<Option<SleepSession>, SleepSessionRepositoryError> {
        Ok(None)
    }

    async fn list(
        &self,
        _owner: &UserId,
        _range: SessionRange,
        page: PageRequest,
    ) -> Result<Page<SleepSession>, SleepSessionRepositoryError> {
        Ok(Page::from_ordered(Vec::new(), page))
    }

    async fn list_all(
        &self,
        _owner: &UserId,
    ) -> Result<Vec<SleepSession>, SleepSessionRepositoryError> {
        Ok(Vec::new())
    }

    async fn recent(
        &self,
        _owner: &UserId,
        _limit: usize,
    ) -> Result<Vec<SleepSession>, SleepSessionRepositoryError> {
        Ok(Vec::new())
    }

    async fn count_for_user(&self, _owner: &UserId) -> Result<u64, SleepSessionRepositoryError> {
        Ok(0)
    }
}
