//! PostgreSQL adapters for the storage ports, built on Diesel.
//!
//! Repositories translate between row structs and validated domain types
//! and hold no business rules. Rows loaded from the database are passed back
//! through the domain constructors, so a corrupt row surfaces as a query
//! error instead of an invalid value.
//!
//! ```ignore
//! use slumbertrack::outbound::persistence::{DbPool, DieselSleepSessionRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/slumbertrack")).await?;
//! let sessions = DieselSleepSessionRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_sleep_goal_repository;
mod diesel_sleep_session_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_sleep_goal_repository::DieselSleepGoalRepository;
pub use diesel_sleep_session_repository::DieselSleepSessionRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
