//! CSV export and import endpoints.
//!
//! ```text
//! GET  /api/v1/sleep-sessions/export
//! POST /api/v1/sleep-sessions/import   (Content-Type: text/csv)
//! ```
//!
//! Both routes must be registered ahead of `/sleep-sessions/{id}`.

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::csv::{EXPORT_FILENAME, read_import_rows, write_sessions};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Outcome of a completed import.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    pub imported: usize,
}

/// Download every session the caller owns, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/sleep-sessions/export",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "exportSleepSessions",
    security(("SessionCookie" = []))
)]
#[get("/sleep-sessions/export")]
pub async fn export_sessions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let views = state.sessions_query.export(&user_id).await?;
    let body = write_sessions(Vec::new(), &views)?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/csv; charset=utf-8"))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(EXPORT_FILENAME.to_owned())],
        })
        .body(body))
}

/// Create sessions from an uploaded CSV file.
///
/// Rows missing `start` or `end` are skipped. The first malformed row stops
/// the import; rows before it stay saved and the error reports how many.
#[utoipa::path(
    post,
    path = "/api/v1/sleep-sessions/import",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import finished", body = ImportResponse),
        (status = 400, description = "Malformed CSV", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["sleep-sessions"],
    operation_id = "importSleepSessions",
    security(("SessionCookie" = []))
)]
#[post("/sleep-sessions/import")]
pub async fn import_sessions(
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<web::Json<ImportResponse>> {
    let user_id = session.require_user_id()?;
    let rows = read_import_rows(body.as_ref())?;
    let summary = state.sessions.import(&user_id, rows).await?;
    Ok(web::Json(ImportResponse {
        imported: summary.imported,
    }))
}
