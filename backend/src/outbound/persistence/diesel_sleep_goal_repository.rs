//! PostgreSQL-backed [`SleepGoalRepository`] keyed by owner.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SleepGoalRepository, SleepGoalRepositoryError};
use crate::domain::{SleepGoal, SleepGoalDraft, UserId};

use super::error_mapping;
use super::models::{SleepGoalRow, SleepGoalValues};
use super::pool::{DbPool, PoolError};
use super::schema::sleep_goals;

/// Diesel implementation of the goal store.
#[derive(Clone)]
pub struct DieselSleepGoalRepository {
    pool: DbPool,
}

impl DieselSleepGoalRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SleepGoalRepositoryError {
    error_mapping::map_pool_error(error, SleepGoalRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SleepGoalRepositoryError {
    error_mapping::map_diesel_error(
        error,
        SleepGoalRepositoryError::query,
        SleepGoalRepositoryError::connection,
    )
}

fn row_to_goal(row: SleepGoalRow) -> Result<SleepGoal, SleepGoalRepositoryError> {
    SleepGoal::new(SleepGoalDraft {
        user_id: UserId::from_uuid(row.user_id),
        target_hours: row.target_hours,
        target_bedtime: row.target_bedtime,
        target_waketime: row.target_waketime,
    })
    .map_err(|err| SleepGoalRepositoryError::query(format!("stored goal: {err}")))
}

fn values_for(goal: &SleepGoal) -> SleepGoalValues {
    SleepGoalValues {
        user_id: *goal.user_id().as_uuid(),
        target_hours: goal.target_hours(),
        target_bedtime: goal.target_bedtime(),
        target_waketime: goal.target_waketime(),
    }
}

/// `updated_at` follows the database clock; inserts rely on the column default.
fn touched() -> diesel::dsl::Eq<sleep_goals::updated_at, now> {
    sleep_goals::updated_at.eq(now)
}

#[async_trait]
impl SleepGoalRepository for DieselSleepGoalRepository {
    async fn find_for_user(
        &self,
        owner: &UserId,
    ) -> Result<Option<SleepGoal>, SleepGoalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = sleep_goals::table
            .filter(sleep_goals::user_id.eq(owner.as_uuid()))
            .select(SleepGoalRow::as_select())
            .first::<SleepGoalRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_goal).transpose()
    }

    async fn upsert(&self, goal: &SleepGoal) -> Result<(), SleepGoalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let values = values_for(goal);

        diesel::insert_into(sleep_goals::table)
            .values(&values)
            .on_conflict(sleep_goals::user_id)
            .do_update()
            .set((
                sleep_goals::target_hours.eq(excluded(sleep_goals::target_hours)),
                sleep_goals::target_bedtime.eq(excluded(sleep_goals::target_bedtime)),
                sleep_goals::target_waketime.eq(excluded(sleep_goals::target_waketime)),
                touched(),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_for_user(&self, owner: &UserId) -> Result<bool, SleepGoalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected =
            diesel::delete(sleep_goals::table.filter(sleep_goals::user_id.eq(owner.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use diesel::debug_query;
    use diesel::pg::Pg;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    fn row(target_hours: Decimal) -> SleepGoalRow {
        SleepGoalRow {
            user_id: Uuid::new_v4(),
            target_hours,
            target_bedtime: NaiveTime::from_hms_opt(22, 30, 0),
            target_waketime: NaiveTime::from_hms_opt(6, 30, 0),
        }
    }

    #[rstest]
    fn stored_goals_are_revalidated() {
        let goal = row_to_goal(row(Decimal::new(750, 2))).expect("valid goal");
        assert_eq!(goal.target_hours(), Decimal::new(750, 2));
        assert_eq!(goal.target_bedtime(), NaiveTime::from_hms_opt(22, 30, 0));
    }

    #[rstest]
    fn corrupt_goal_rows_map_to_query_errors() {
        let err = row_to_goal(row(Decimal::ZERO)).expect_err("zero hours rejected");
        assert!(matches!(err, SleepGoalRepositoryError::Query { .. }));
    }

    #[rstest]
    fn upserts_leave_timestamps_to_the_database() {
        let goal = row_to_goal(row(Decimal::new(800, 2))).expect("valid goal");
        let insert = diesel::insert_into(sleep_goals::table).values(values_for(&goal));
        let insert_sql = debug_query::<Pg, _>(&insert).to_string();
        assert!(!insert_sql.contains("updated_at"), "{insert_sql}");

        let refresh = diesel::update(sleep_goals::table).set(touched());
        let refresh_sql = debug_query::<Pg, _>(&refresh).to_string();
        assert!(refresh_sql.contains(r#""updated_at" = CURRENT_TIMESTAMP"#), "{refresh_sql}");
    }
}
