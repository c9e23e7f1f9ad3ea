//! Port for local account storage.

use async_trait::async_trait;

use crate::domain::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "account repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } =>
            "username {username} is already taken",
    }
}

/// Account row to be created at signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub id: UserId,
    pub username: Username,
    /// Argon2 PHC string; never the plain password.
    pub password_hash: String,
}

/// Stored account including its credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAccount {
    pub user: User,
    pub password_hash: String,
}

/// Port for creating and looking up accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create an account; duplicate usernames fail with
    /// [`AccountRepositoryError::DuplicateUsername`].
    async fn create(&self, account: &NewAccount) -> Result<(), AccountRepositoryError>;

    /// Look an account up by its exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredAccount>, AccountRepositoryError>;

    /// Look a user up by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountRepositoryError>;
}
