//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test as actix_test;

use crate::domain::ports::{
    FixtureLoginService, FixtureSignupService, FixtureSleepGoalCommand, FixtureSleepGoalQuery,
    FixtureSleepSessionCommand, FixtureSleepSessionQuery, FixtureUsersQuery,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::users::LoginRequest;

/// Session middleware with a fresh key, named `session`, without `Secure`.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Ports backed entirely by fixtures; override fields as a test needs.
pub fn fixture_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        signup: Arc::new(FixtureSignupService),
        users: Arc::new(FixtureUsersQuery),
        sessions: Arc::new(FixtureSleepSessionCommand),
        sessions_query: Arc::new(FixtureSleepSessionQuery),
        goal: Arc::new(FixtureSleepGoalCommand),
        goal_query: Arc::new(FixtureSleepGoalQuery),
    }
}

/// State backed entirely by fixtures.
pub fn fixture_state() -> HttpState {
    HttpState::new(fixture_ports())
}

/// The `session` cookie set on a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Log in as the fixture `admin` account and return its session cookie.
pub async fn login_and_get_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: "admin".into(),
            password: "password".into(),
        })
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "fixture login succeeds");
    session_cookie(&response)
}
