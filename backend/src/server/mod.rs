//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use slumbertrack::Trace;
#[cfg(debug_assertions)]
use slumbertrack::doc::ApiDoc;
use slumbertrack::inbound::http::dashboard::dashboard;
use slumbertrack::inbound::http::error::extractor_error;
use slumbertrack::inbound::http::health::{HealthState, live, ready};
use slumbertrack::inbound::http::sleep_goal::{delete_goal, get_goal, patch_goal, put_goal};
use slumbertrack::inbound::http::sleep_sessions::{
    create_session, delete_session, get_session, list_sessions, patch_session, replace_session,
};
use slumbertrack::inbound::http::state::HttpState;
use slumbertrack::inbound::http::transfer::{export_sessions, import_sessions};
use slumbertrack::inbound::http::users::{current_user, login, logout, signup};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const JSON_LIMIT: usize = 1024 * 1024;
const IMPORT_LIMIT: usize = 8 * 1024 * 1024;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // Export and import are registered before `/sleep-sessions/{id}`.
    let api = web::scope("/api/v1")
        .wrap(session)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_LIMIT)
                .error_handler(|err, _| extractor_error(err)),
        )
        .app_data(web::QueryConfig::default().error_handler(|err, _| extractor_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| extractor_error(err)))
        .app_data(web::PayloadConfig::new(IMPORT_LIMIT))
        .service(signup)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(export_sessions)
        .service(import_sessions)
        .service(list_sessions)
        .service(create_session)
        .service(get_session)
        .service(replace_session)
        .service(patch_session)
        .service(delete_session)
        .service(get_goal)
        .service(put_goal)
        .service(patch_goal)
        .service(delete_goal)
        .service(dashboard);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the process ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
