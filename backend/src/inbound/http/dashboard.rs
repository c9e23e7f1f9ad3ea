//! Dashboard summary endpoint.
//!
//! ```text
//! GET /api/v1/dashboard
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DashboardSummary, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Chart series (oldest first) and averages over the 30 most recent sessions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// Start dates such as `Mar 01`.
    pub labels: Vec<String>,
    pub hours: Vec<f64>,
    pub quality: Vec<i16>,
    /// `null` when no goal is set.
    pub goal_hours: Option<f64>,
    pub avg_hours: f64,
    pub avg_quality: f64,
    pub session_count: usize,
    pub goal_met_count: usize,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        let DashboardSummary {
            labels,
            hours,
            quality,
            goal_hours,
            avg_hours,
            avg_quality,
            session_count,
            goal_met_count,
        } = summary;
        Self {
            labels,
            hours,
            quality,
            goal_hours,
            avg_hours,
            avg_quality,
            session_count,
            goal_met_count,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboard",
    security(("SessionCookie" = []))
)]
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardResponse>> {
    let user_id = session.require_user_id()?;
    let summary = state.sessions_query.dashboard(&user_id).await?;
    Ok(web::Json(summary.into()))
}
