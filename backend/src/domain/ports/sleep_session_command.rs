//! Driving port for sleep session mutations, including CSV import.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, SessionPatch, SessionView, SleepSession, SleepSessionInput, UserId};

/// One data row of an import, numbered from 1 after the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub row: usize,
    /// The decoded session fields, or why the row could not be decoded.
    pub parsed: Result<SleepSessionInput, String>,
}

/// Outcome of a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
}

/// Driving port for session write operations.
///
/// Every operation is scoped to `owner`; ids belonging to other users are
/// reported as not found.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SleepSessionCommand: Send + Sync {
    /// Record a new session and return it with derived values.
    async fn create(&self, owner: &UserId, input: SleepSessionInput)
    -> Result<SessionView, Error>;

    /// Replace every field of a stored session.
    async fn replace(
        &self,
        owner: &UserId,
        id: Uuid,
        input: SleepSessionInput,
    ) -> Result<SessionView, Error>;

    /// Merge `patch` onto a stored session.
    async fn patch(&self, owner: &UserId, id: Uuid, patch: SessionPatch)
    -> Result<SessionView, Error>;

    /// Delete a stored session.
    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<(), Error>;

    /// Create sessions row by row, stopping at the first bad row.
    ///
    /// Rows created before the failure stay persisted. The error details
    /// carry the failing `row` and the number already `imported`.
    async fn import(&self, owner: &UserId, rows: Vec<ImportRow>) -> Result<ImportSummary, Error>;
}

/// Fixture command that validates input without storing anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSleepSessionCommand;

#[async_trait]
impl SleepSessionCommand for FixtureSleepSessionCommand {
    async fn create(
        &self,
        owner: &UserId,
        input: SleepSessionInput,
    ) -> Result<SessionView, Error> {
        let session = SleepSession::new(input.into_draft(Uuid::new_v4(), owner.clone()))?;
        Ok(SessionView::new(session, None))
    }

    async fn replace(
        &self,
        _owner: &UserId,
        id: Uuid,
        _input: SleepSessionInput,
    ) -> Result<SessionView, Error> {
        Err(Error::not_found(format!("sleep session {id} not found")))
    }

    async fn patch(
        &self,
        _owner: &UserId,
        id: Uuid,
        _patch: SessionPatch,
    ) -> Result<SessionView, Error> {
        Err(Error::not_found(format!("sleep session {id} not found")))
    }

    async fn delete(&self, _owner: &UserId, id: Uuid) -> Result<(), Error> {
        Err(Error::not_found(format!("sleep session {id} not found")))
    }

    async fn import(&self, _owner: &UserId, rows: Vec<ImportRow>) -> Result<ImportSummary, Error> {
        let imported = rows.iter().take_while(|row| row.parsed.is_ok()).count();
        Ok(ImportSummary { imported })
    }
}
