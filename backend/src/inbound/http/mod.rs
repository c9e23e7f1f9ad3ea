//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod dashboard;
pub mod error;
pub mod health;
pub mod session;
pub mod sleep_goal;
pub mod sleep_sessions;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod transfer;
pub mod users;
pub mod validation;

pub use error::ApiResult;
