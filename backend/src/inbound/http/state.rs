//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only ever see driving
//! ports, so they can be exercised with fixtures or mocks.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, SignupService, SleepGoalCommand, SleepGoalQuery, SleepSessionCommand,
    SleepSessionQuery, UsersQuery,
};

/// Parameter object bundling every port the handlers use.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub users: Arc<dyn UsersQuery>,
    pub sessions: Arc<dyn SleepSessionCommand>,
    pub sessions_query: Arc<dyn SleepSessionQuery>,
    pub goal: Arc<dyn SleepGoalCommand>,
    pub goal_query: Arc<dyn SleepGoalQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub users: Arc<dyn UsersQuery>,
    pub sessions: Arc<dyn SleepSessionCommand>,
    pub sessions_query: Arc<dyn SleepSessionQuery>,
    pub goal: Arc<dyn SleepGoalCommand>,
    pub goal_query: Arc<dyn SleepGoalQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use slumbertrack::domain::ports::{
    ///     FixtureLoginService, FixtureSignupService, FixtureSleepGoalCommand,
    ///     FixtureSleepGoalQuery, FixtureSleepSessionCommand, FixtureSleepSessionQuery,
    ///     FixtureUsersQuery,
    /// };
    /// use slumbertrack::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     signup: Arc::new(FixtureSignupService),
    ///     users: Arc::new(FixtureUsersQuery),
    ///     sessions: Arc::new(FixtureSleepSessionCommand),
    ///     sessions_query: Arc::new(FixtureSleepSessionQuery),
    ///     goal: Arc::new(FixtureSleepGoalCommand),
    ///     goal_query: Arc::new(FixtureSleepGoalQuery),
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            signup,
            users,
            sessions,
            sessions_query,
            goal,
            goal_query,
        } = ports;
        Self {
            login,
            signup,
            users,
            sessions,
            sessions_query,
            goal,
            goal_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
