//! PostgreSQL-backed [`SleepSessionRepository`].
//!
//! Every statement filters by `user_id`, so a session belonging to someone
//! else behaves exactly like a missing one.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SleepSessionRepository, SleepSessionRepositoryError};
use crate::domain::{
    Page, PageRequest, SessionRange, SleepSession, SleepSessionDraft, StageSample, UserId,
};

use super::error_mapping;
use super::models::{NewSleepSessionRow, SleepSessionRow, SleepSessionUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::sleep_sessions;

/// Diesel implementation of the session store.
#[derive(Clone)]
pub struct DieselSleepSessionRepository {
    pool: DbPool,
}

impl DieselSleepSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SleepSessionRepositoryError {
    error_mapping::map_pool_error(error, SleepSessionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SleepSessionRepositoryError {
    error_mapping::map_diesel_error(
        error,
        SleepSessionRepositoryError::query,
        SleepSessionRepositoryError::connection,
    )
}

fn encode_stages(
    session: &SleepSession,
) -> Result<Option<serde_json::Value>, SleepSessionRepositoryError> {
    session
        .stages()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| SleepSessionRepositoryError::query(format!("encode stages: {err}")))
}

fn changes_for(
    session: &SleepSession,
) -> Result<SleepSessionUpdate<'_>, SleepSessionRepositoryError> {
    Ok(SleepSessionUpdate {
        started_at: session.start(),
        ended_at: session.end(),
        quality: session.quality(),
        latency_minutes: session.latency_minutes(),
        awakenings: session.awakenings(),
        notes: session.notes(),
        tags: session.tags().as_str(),
        stages: encode_stages(session)?,
    })
}

/// `updated_at` follows the database clock.
fn touched() -> diesel::dsl::Eq<sleep_sessions::updated_at, now> {
    sleep_sessions::updated_at.eq(now)
}

fn decode_stages(
    stages: Option<serde_json::Value>,
) -> Result<Option<Vec<StageSample>>, SleepSessionRepositoryError> {
    stages
        .map(serde_json::from_value)
        .transpose()
        .map_err(|err| SleepSessionRepositoryError::query(format!("decode stages: {err}")))
}

fn row_to_session(row: SleepSessionRow) -> Result<SleepSession, SleepSessionRepositoryError> {
    let SleepSessionRow {
        id,
        user_id,
        started_at,
        ended_at,
        quality,
        latency_minutes,
        awakenings,
        notes,
        tags,
        stages,
    } = row;

    SleepSession::new(SleepSessionDraft {
        id,
        user_id: UserId::from_uuid(user_id),
        start: started_at,
        end: ended_at,
        quality: i64::from(quality),
        latency_minutes: i64::from(latency_minutes),
        awakenings: i64::from(awakenings),
        notes,
        tags,
        stages: decode_stages(stages)?,
    })
    .map_err(|err| SleepSessionRepositoryError::query(format!("stored session {id}: {err}")))
}

fn rows_to_sessions(
    rows: Vec<SleepSessionRow>,
) -> Result<Vec<SleepSession>, SleepSessionRepositoryError> {
    rows.into_iter().map(row_to_session).collect()
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl SleepSessionRepository for DieselSleepSessionRepository {
    async fn insert(&self, session: &SleepSession) -> Result<(), SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSleepSessionRow {
            id: session.id(),
            user_id: *session.user_id().as_uuid(),
            started_at: session.start(),
            ended_at: session.end(),
            quality: session.quality(),
            latency_minutes: session.latency_minutes(),
            awakenings: session.awakenings(),
            notes: session.notes(),
            tags: session.tags().as_str(),
            stages: encode_stages(session)?,
        };

        diesel::insert_into(sleep_sessions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, session: &SleepSession) -> Result<bool, SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = changes_for(session)?;

        let affected = diesel::update(
            sleep_sessions::table
                .filter(sleep_sessions::id.eq(session.id()))
                .filter(sleep_sessions::user_id.eq(session.user_id().as_uuid())),
        )
        .set((&changes, touched()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, owner: &UserId, id: Uuid) -> Result<bool, SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(
            sleep_sessions::table
                .filter(sleep_sessions::id.eq(id))
                .filter(sleep_sessions::user_id.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: Uuid,
    ) -> Result<Option<SleepSession>, SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = sleep_sessions::table
            .filter(sleep_sessions::id.eq(id))
            .filter(sleep_sessions::user_id.eq(owner.as_uuid()))
            .select(SleepSessionRow::as_select())
            .first::<SleepSessionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_session).transpose()
    }

    async fn list(
        &self,
        owner: &UserId,
        range: SessionRange,
        page: PageRequest,
    ) -> Result<Page<SleepSession>, SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let filtered = || {
            let mut query = sleep_sessions::table
                .filter(sleep_sessions::user_id.eq(*owner.as_uuid()))
                .into_boxed();
            if let Some(from) = range.from() {
                query = query.filter(sleep_sessions::started_at.ge(from));
            }
            if let Some(until) = range.until() {
                query = query.filter(sleep_sessions::started_at.lt(until));
            }
            query
        };

        let total: i64 = filtered()
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let rows: Vec<SleepSessionRow> = filtered()
            .order((sleep_sessions::started_at.desc(), sleep_sessions::id.desc()))
            .limit(i64::from(page.page_size()))
            .offset(to_i64(page.offset()))
            .select(SleepSessionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Page {
            items: rows_to_sessions(rows)?,
            total: u64::try_from(total).unwrap_or_default(),
            request: page,
        })
    }

    async fn list_all(
        &self,
        owner: &UserId,
    ) -> Result<Vec<SleepSession>, SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SleepSessionRow> = sleep_sessions::table
            .filter(sleep_sessions::user_id.eq(owner.as_uuid()))
            .order((sleep_sessions::started_at.desc(), sleep_sessions::id.desc()))
            .select(SleepSessionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_sessions(rows)
    }

    async fn recent(
        &self,
        owner: &UserId,
        limit: usize,
    ) -> Result<Vec<SleepSession>, SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SleepSessionRow> = sleep_sessions::table
            .filter(sleep_sessions::user_id.eq(owner.as_uuid()))
            .order((sleep_sessions::started_at.desc(), sleep_sessions::id.desc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(SleepSessionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_sessions(rows)
    }

    async fn count_for_user(&self, owner: &UserId) -> Result<u64, SleepSessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = sleep_sessions::table
            .filter(sleep_sessions::user_id.eq(owner.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
