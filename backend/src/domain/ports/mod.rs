//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage.
//! Driving ports (`*Command`, `*Query`, `*Service`) are what inbound adapters
//! call. Each trait has a `Fixture*` implementation for tests that do not need
//! real storage, and a mockall double under `cfg(test)`.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod login_service;
mod sleep_goal_command;
mod sleep_goal_query;
mod sleep_goal_repository;
mod sleep_session_command;
mod sleep_session_query;
mod sleep_session_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, NewAccount, StoredAccount,
};
#[cfg(test)]
pub use login_service::{MockLoginService, MockSignupService, MockUsersQuery};
pub use login_service::{
    FIXTURE_USER_ID, FixtureLoginService, FixtureSignupService, FixtureUsersQuery, LoginService,
    SignupService, UsersQuery,
};
#[cfg(test)]
pub use sleep_goal_command::MockSleepGoalCommand;
pub use sleep_goal_command::{FixtureSleepGoalCommand, SleepGoalCommand};
#[cfg(test)]
pub use sleep_goal_query::MockSleepGoalQuery;
pub use sleep_goal_query::{FixtureSleepGoalQuery, SleepGoalQuery};
#[cfg(test)]
pub use sleep_goal_repository::MockSleepGoalRepository;
pub use sleep_goal_repository::{
    FixtureSleepGoalRepository, SleepGoalRepository, SleepGoalRepositoryError,
};
#[cfg(test)]
pub use sleep_session_command::MockSleepSessionCommand;
pub use sleep_session_command::{
    FixtureSleepSessionCommand, ImportRow, ImportSummary, SleepSessionCommand,
};
#[cfg(test)]
pub use sleep_session_query::MockSleepSessionQuery;
pub use sleep_session_query::{FixtureSleepSessionQuery, SleepSessionQuery};
#[cfg(test)]
pub use sleep_session_repository::MockSleepSessionRepository;
pub use sleep_session_repository::{
    FixtureSleepSessionRepository, SleepSessionRepository, SleepSessionRepositoryError,
};
