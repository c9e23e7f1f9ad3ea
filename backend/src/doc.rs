//! OpenAPI document for the REST API.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, SleepStage, StageSample, User};
use crate::inbound::http::dashboard::DashboardResponse;
use crate::inbound::http::sleep_goal::{SleepGoalBody, SleepGoalResponse};
use crate::inbound::http::sleep_sessions::{
    SleepSessionBody, SleepSessionListResponse, SleepSessionPatchBody, SleepSessionResponse,
};
use crate::inbound::http::transfer::ImportResponse;
use crate::inbound::http::users::{LoginRequest, SignupRequest};

/// Registers the `SessionCookie` security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/signup.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Slumbertrack API",
        description = "Sleep sessions, goals, CSV transfer and dashboard for signed-in users."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::signup,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::sleep_sessions::list_sessions,
        crate::inbound::http::sleep_sessions::create_session,
        crate::inbound::http::sleep_sessions::get_session,
        crate::inbound::http::sleep_sessions::replace_session,
        crate::inbound::http::sleep_sessions::patch_session,
        crate::inbound::http::sleep_sessions::delete_session,
        crate::inbound::http::transfer::export_sessions,
        crate::inbound::http::transfer::import_sessions,
        crate::inbound::http::sleep_goal::get_goal,
        crate::inbound::http::sleep_goal::put_goal,
        crate::inbound::http::sleep_goal::patch_goal,
        crate::inbound::http::sleep_goal::delete_goal,
        crate::inbound::http::dashboard::dashboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        LoginRequest,
        SignupRequest,
        SleepStage,
        StageSample,
        SleepSessionBody,
        SleepSessionPatchBody,
        SleepSessionResponse,
        SleepSessionListResponse,
        SleepGoalBody,
        SleepGoalResponse,
        ImportResponse,
        DashboardResponse,
    )),
    tags(
        (name = "users", description = "Accounts and login sessions"),
        (name = "sleep-sessions", description = "Logged nights, CSV import and export"),
        (name = "goal", description = "The per-user sleep target"),
        (name = "dashboard", description = "Recent-session charts and averages"),
        (name = "health", description = "Probes for orchestrators")
    )
)]
pub struct ApiDoc;
