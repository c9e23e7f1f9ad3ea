//! Authentication primitives: login and signup credentials.
//!
//! Handlers build these from raw strings before talking to a port so that
//! services only ever see validated input. Passwords are held in
//! [`Zeroizing`] buffers and wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{UserValidationError, Username};

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// # Examples
/// ```
/// use slumbertrack::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "password").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for account lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for signup payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupValidationError {
    Username(UserValidationError),
    PasswordTooShort { min: usize },
    PasswordEntirelyNumeric,
    PasswordMismatch,
}

impl SignupValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            Self::PasswordTooShort { .. } | Self::PasswordEntirelyNumeric => "password",
            Self::PasswordMismatch => "passwordConfirmation",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Username(_) => "invalid_username",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::PasswordEntirelyNumeric => "password_entirely_numeric",
            Self::PasswordMismatch => "password_mismatch",
        }
    }
}

impl fmt::Display for SignupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(inner) => write!(f, "{inner}"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must contain at least {min} characters")
            }
            Self::PasswordEntirelyNumeric => write!(f, "password must not be entirely numeric"),
            Self::PasswordMismatch => write!(f, "the two password fields didn't match"),
        }
    }
}

impl std::error::Error for SignupValidationError {}

/// Validated signup request.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules.
/// - `password` has at least [`PASSWORD_MIN`] characters, is not made of
///   digits alone and matched its confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl SignupCredentials {
    /// Validate a signup form.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, SignupValidationError> {
        let username = Username::new(username).map_err(SignupValidationError::Username)?;
        if password != confirmation {
            return Err(SignupValidationError::PasswordMismatch);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(SignupValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(SignupValidationError::PasswordEntirelyNumeric);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plain-text password, to be hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_login_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn signup_accepts_matching_strong_password() {
        let creds = SignupCredentials::try_from_parts(" ada ", "dreaming1", "dreaming1")
            .expect("valid signup");
        assert_eq!(creds.username().as_ref(), "ada");
        assert_eq!(creds.password(), "dreaming1");
    }

    #[rstest]
    #[case("ada", "dreaming1", "dreaming2", "passwordConfirmation")]
    #[case("ada", "short1", "short1", "password")]
    #[case("ada", "12345678", "12345678", "password")]
    #[case("a b", "dreaming1", "dreaming1", "username")]
    fn signup_rejections_name_the_field(
        #[case] username: &str,
        #[case] password: &str,
        #[case] confirmation: &str,
        #[case] field: &str,
    ) {
        let err = SignupCredentials::try_from_parts(username, password, confirmation)
            .expect_err("invalid signup");
        assert_eq!(err.field(), field);
    }
}
