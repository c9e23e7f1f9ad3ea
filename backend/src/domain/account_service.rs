//! Account service backing signup, login and current-user lookups.
//!
//! Passwords are stored as Argon2id PHC strings. Login failures never say
//! whether the username exists.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, LoginService, NewAccount, SignupService,
    UsersQuery,
};
use crate::domain::{Error, LoginCredentials, SignupCredentials, User, UserId};

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateUsername { username } => {
            Error::conflict("A user with that username already exists.").with_details(json!({
                "field": "username",
                "code": "username_taken",
                "value": username,
            }))
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

pub(crate) fn hash_password(plain: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::internal(format!("failed to hash password: {err}")))
}

fn verify_password(plain: &str, phc: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(phc)
        .map_err(|err| Error::internal(format!("stored password hash is unreadable: {err}")))?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Account service implementing login, signup and user lookups.
#[derive(Clone)]
pub struct AccountService<R> {
    accounts: Arc<R>,
}

impl<R> AccountService<R> {
    /// Create a new service over the account repository.
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<R> LoginService for AccountService<R>
where
    R: AccountRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let account = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(map_account_error)?;
        let Some(account) = account else {
            return Err(invalid_credentials());
        };
        if verify_password(credentials.password(), &account.password_hash)? {
            Ok(account.user.id().clone())
        } else {
            warn!(user_id = %account.user.id(), "password mismatch on login");
            Err(invalid_credentials())
        }
    }
}

#[async_trait]
impl<R> SignupService for AccountService<R>
where
    R: AccountRepository,
{
    async fn register(&self, credentials: &SignupCredentials) -> Result<User, Error> {
        let account = NewAccount {
            id: UserId::random(),
            username: credentials.username().clone(),
            password_hash: hash_password(credentials.password())?,
        };
        self.accounts
            .create(&account)
            .await
            .map_err(map_account_error)?;
        info!(user_id = %account.id, "account registered");
        Ok(User::new(account.id, account.username))
    }
}

#[async_trait]
impl<R> UsersQuery for AccountService<R>
where
    R: AccountRepository,
{
    async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}
