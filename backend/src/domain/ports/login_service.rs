//! Driving ports for account use-cases: login, signup and the current user.
//!
//! Inbound adapters call these without knowing how accounts are stored,
//! which keeps HTTP handler tests free of persistence wiring.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SignupCredentials, User, UserId, Username};

/// Fixed id returned by [`FixtureLoginService`].
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Domain use-case port for registering accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Create an account; a taken username yields a conflict error.
    async fn register(&self, credentials: &SignupCredentials) -> Result<User, Error>;
}

/// Port for reading account details.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// The account behind `id`.
    async fn current_user(&self, id: &UserId) -> Result<User, Error>;
}

/// In-memory authenticator accepting `admin` / `password`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == "admin" && credentials.password() == "password" {
            UserId::new(FIXTURE_USER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

/// Signup fixture that accepts every valid request without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSignupService;

#[async_trait]
impl SignupService for FixtureSignupService {
    async fn register(&self, credentials: &SignupCredentials) -> Result<User, Error> {
        Ok(User::new(UserId::random(), credentials.username().clone()))
    }
}

/// Users fixture that knows only the `admin` account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn current_user(&self, id: &UserId) -> Result<User, Error> {
        if id.as_ref() != FIXTURE_USER_ID {
            return Err(Error::not_found(format!("user {id} not found")));
        }
        let username = Username::new("admin")
            .map_err(|err| Error::internal(format!("invalid fixture username: {err}")))?;
        Ok(User::new(id.clone(), username))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", true)]
    #[case("admin", "wrong", false)]
    #[case("other", "password", false)]
    #[tokio::test]
    async fn fixture_login_accepts_only_admin(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = FixtureLoginService.authenticate(&creds).await;
        match (should_succeed, result) {
            (true, Ok(id)) => assert_eq!(id.as_ref(), FIXTURE_USER_ID),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(id)) => panic!("expected failure, got success: {id}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_users_query_resolves_admin() {
        let id = UserId::new(FIXTURE_USER_ID).expect("fixture id");
        let user = FixtureUsersQuery.current_user(&id).await.expect("admin exists");
        assert_eq!(user.username().as_ref(), "admin");
    }
}
