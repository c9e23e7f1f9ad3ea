//! Sleep session HTTP handlers.
//!
//! ```text
//! GET    /api/v1/sleep-sessions?page=1&pageSize=10&start_date=2024-03-01
//! POST   /api/v1/sleep-sessions
//! GET    /api/v1/sleep-sessions/{id}
//! PUT    /api/v1/sleep-sessions/{id}
//! PATCH  /api/v1/sleep-sessions/{id}
//! DELETE /api/v1/sleep-sessions/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    Error, Page, SessionPatch, SessionRange, SessionView, SleepSessionInput, StageSample,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, page_request, parse_optional_date, parse_optional_rfc3339_timestamp,
    parse_rfc3339_timestamp, parse_uuid, require,
};

/// Body for creating or replacing a session.
///
/// Omitted counters fall back to quality 3, latency 0 and awakenings 0.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionBody {
    #[schema(format = "date-time")]
    pub start: Option<String>,
    #[schema(format = "date-time")]
    pub end: Option<String>,
    pub quality: Option<i64>,
    pub latency_minutes: Option<i64>,
    pub awakenings: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub stages: Option<Vec<StageSample>>,
}

/// Body for a partial update; only supplied fields change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionPatchBody {
    #[schema(format = "date-time")]
    pub start: Option<String>,
    #[schema(format = "date-time")]
    pub end: Option<String>,
    pub quality: Option<i64>,
    pub latency_minutes: Option<i64>,
    pub awakenings: Option<i64>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub stages: Option<Vec<StageSample>>,
}

/// A stored session with its read-time derivations.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionResponse {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "date-time")]
    pub start: String,
    #[schema(format = "date-time")]
    pub end: String,
    pub quality: i16,
    pub latency_minutes: i32,
    pub awakenings: i32,
    pub notes: String,
    pub tags: String,
    pub stages: Option<Vec<StageSample>>,
    pub duration_hours: f64,
    /// `null` when no goal is set.
    pub meets_goal: Option<bool>,
}

impl From<SessionView> for SleepSessionResponse {
    fn from(view: SessionView) -> Self {
        let SessionView {
            session,
            duration_hours,
            attainment,
        } = view;
        Self {
            id: session.id().to_string(),
            start: session.start().to_rfc3339(),
            end: session.end().to_rfc3339(),
            quality: session.quality(),
            latency_minutes: session.latency_minutes(),
            awakenings: session.awakenings(),
            notes: session.notes().to_owned(),
            tags: session.tags().as_str().to_owned(),
            stages: session.stages().map(<[StageSample]>::to_vec),
            duration_hours,
            meets_goal: attainment.as_bool(),
        }
    }
}

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SleepSessionListQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Items per page, capped at 100.
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
    /// Earliest start date (inclusive), `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Latest start date (inclusive of the whole day), `YYYY-MM-DD`.
    pub end_date: Option<String>,
}

/// One page of sessions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepSessionListResponse {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<SleepSessionResponse>,
}

impl From<Page<SessionView>> for SleepSessionListResponse {
    fn from(page: Page<SessionView>) -> Self {
        Self {
            count: page.total,
            page: page.request.page(),
            page_size: page.request.page_size(),
            results: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

fn parse_session_body(body: SleepSessionBody) -> Result<SleepSessionInput, Error> {
    let start = require(body.start, FieldName::new("start"))?;
    let end = require(body.end, FieldName::new("end"))?;
    Ok(SleepSessionInput {
        start: parse_rfc3339_timestamp(&start, FieldName::new("start"))?,
        end: parse_rfc3339_timestamp(&end, FieldName::new("end"))?,
        quality: body.quality,
        latency_minutes: body.latency_minutes,
        awakenings: body.awakenings,
        notes: body.notes,
        tags: body.tags,
        stages: body.stages,
    })
}

fn parse_patch_body(body: SleepSessionPatchBody) -> Result<SessionPatch, Error> {
    Ok(SessionPatch {
        start: parse_optional_rfc3339_timestamp(body.start.as_deref(), FieldName::new("start"))?,
        end: parse_optional_rfc3339_timestamp(body.end.as_deref(), FieldName::new("end"))?,
        quality: body.quality,
        latency_minutes: body.latency_minutes,
        awakenings: body.awakenings,
        notes: body.notes,
        tags: body.tags,
        stages: body.stages,
    })
}

fn parse_session_id(raw: &str) -> Result<Uuid, Error> {
    parse_uuid(raw, FieldName::new("id"))
}

/// List the caller's sessions, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/sleep-sessions",
    params(SleepSessionListQuery),
    responses(
        (status = 200, description = "Sessions", body = SleepSessionListResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "listSleepSessions",
    security(("SessionCookie" = []))
)]
#[get("/sleep-sessions")]
pub async fn list_sessions(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SleepSessionListQuery>,
) -> ApiResult<web::Json<SleepSessionListResponse>> {
    let user_id = session.require_user_id()?;
    let query = query.into_inner();
    let page = page_request(query.page, query.page_size)?;
    let range = SessionRange::from_dates(
        parse_optional_date(query.start_date.as_deref(), FieldName::new("start_date"))?,
        parse_optional_date(query.end_date.as_deref(), FieldName::new("end_date"))?,
    );
    let sessions = state.sessions_query.list(&user_id, range, page).await?;
    Ok(web::Json(sessions.into()))
}

/// Log a new session.
#[utoipa::path(
    post,
    path = "/api/v1/sleep-sessions",
    request_body = SleepSessionBody,
    responses(
        (status = 201, description = "Session created", body = SleepSessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "createSleepSession",
    security(("SessionCookie" = []))
)]
#[post("/sleep-sessions")]
pub async fn create_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SleepSessionBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let input = parse_session_body(payload.into_inner())?;
    let view = state.sessions.create(&user_id, input).await?;
    Ok(HttpResponse::Created().json(SleepSessionResponse::from(view)))
}

/// Fetch one of the caller's sessions.
#[utoipa::path(
    get,
    path = "/api/v1/sleep-sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session", body = SleepSessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "getSleepSession",
    security(("SessionCookie" = []))
)]
#[get("/sleep-sessions/{id}")]
pub async fn get_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SleepSessionResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_session_id(&path.into_inner())?;
    let view = state.sessions_query.get(&user_id, id).await?;
    Ok(web::Json(view.into()))
}

/// Replace every field of a session.
#[utoipa::path(
    put,
    path = "/api/v1/sleep-sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    request_body = SleepSessionBody,
    responses(
        (status = 200, description = "Session replaced", body = SleepSessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "replaceSleepSession",
    security(("SessionCookie" = []))
)]
#[put("/sleep-sessions/{id}")]
pub async fn replace_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SleepSessionBody>,
) -> ApiResult<web::Json<SleepSessionResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_session_id(&path.into_inner())?;
    let input = parse_session_body(payload.into_inner())?;
    let view = state.sessions.replace(&user_id, id, input).await?;
    Ok(web::Json(view.into()))
}

/// Change some fields of a session.
///
/// The merged record is validated as a whole, so moving only `start` past
/// the stored `end` is rejected.
#[utoipa::path(
    patch,
    path = "/api/v1/sleep-sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    request_body = SleepSessionPatchBody,
    responses(
        (status = 200, description = "Session updated", body = SleepSessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "patchSleepSession",
    security(("SessionCookie" = []))
)]
#[patch("/sleep-sessions/{id}")]
pub async fn patch_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SleepSessionPatchBody>,
) -> ApiResult<web::Json<SleepSessionResponse>> {
    let user_id = session.require_user_id()?;
    let id = parse_session_id(&path.into_inner())?;
    let patch = parse_patch_body(payload.into_inner())?;
    let view = state.sessions.patch(&user_id, id, patch).await?;
    Ok(web::Json(view.into()))
}

/// Delete a session.
#[utoipa::path(
    delete,
    path = "/api/v1/sleep-sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "deleteSleepSession",
    security(("SessionCookie" = []))
)]
#[delete("/sleep-sessions/{id}")]
pub async fn delete_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let id = parse_session_id(&path.into_inner())?;
    state.sessions.delete(&user_id, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "sleep_sessions_tests.rs"]
mod tests;
