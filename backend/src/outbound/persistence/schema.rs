//! Diesel table definitions mirroring `migrations/`.
//!
//! Keep in step with the SQL; `diesel print-schema` regenerates this file
//! from a migrated database.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// At most one goal per user, keyed by the owner.
    sleep_goals (user_id) {
        user_id -> Uuid,
        /// `numeric(4, 2)` target in hours.
        target_hours -> Numeric,
        target_bedtime -> Nullable<Time>,
        target_waketime -> Nullable<Time>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recorded nights.
    sleep_sessions (id) {
        id -> Uuid,
        user_id -> Uuid,
        started_at -> Timestamptz,
        ended_at -> Timestamptz,
        quality -> Int2,
        latency_minutes -> Int4,
        awakenings -> Int4,
        notes -> Text,
        tags -> Varchar,
        /// Optional hypnogram samples as a JSON array.
        stages -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(sleep_goals -> users (user_id));
diesel::joinable!(sleep_sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(sleep_goals, sleep_sessions, users);
