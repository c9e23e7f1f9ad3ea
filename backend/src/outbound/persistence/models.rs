//! Diesel row structs. Internal to the persistence adapter.

use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{sleep_goals, sleep_sessions, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sleep_goals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SleepGoalRow {
    pub user_id: Uuid,
    pub target_hours: Decimal,
    pub target_bedtime: Option<NaiveTime>,
    pub target_waketime: Option<NaiveTime>,
}

/// Insert payload for `sleep_goals`; conflicts overwrite from `excluded`.
/// `updated_at` is left to the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sleep_goals)]
pub(crate) struct SleepGoalValues {
    pub user_id: Uuid,
    pub target_hours: Decimal,
    pub target_bedtime: Option<NaiveTime>,
    pub target_waketime: Option<NaiveTime>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sleep_sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SleepSessionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub quality: i16,
    pub latency_minutes: i32,
    pub awakenings: i32,
    pub notes: String,
    pub tags: String,
    pub stages: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sleep_sessions)]
pub(crate) struct NewSleepSessionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub quality: i16,
    pub latency_minutes: i32,
    pub awakenings: i32,
    pub notes: &'a str,
    pub tags: &'a str,
    pub stages: Option<serde_json::Value>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sleep_sessions)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct SleepSessionUpdate<'a> {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub quality: i16,
    pub latency_minutes: i32,
    pub awakenings: i32,
    pub notes: &'a str,
    pub tags: &'a str,
    pub stages: Option<serde_json::Value>,
}
