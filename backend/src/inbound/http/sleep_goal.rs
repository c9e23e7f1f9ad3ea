//! Sleep goal HTTP handlers.
//!
//! ```text
//! GET|PUT|PATCH|DELETE /api/v1/goal
//! ```
//!
//! `targetHours` is a decimal carried as a string (`"8.00"`); numbers are
//! accepted on input. Times are `HH:MM` or `HH:MM:SS`.

use actix_web::{HttpResponse, delete, get, patch, put, web};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, GoalPatch, SleepGoal, SleepGoalInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_optional_time};

const TIME_FORMAT: &str = "%H:%M:%S";

/// Goal fields accepted by `PUT` and `PATCH`.
///
/// On `PUT` an omitted `targetHours` resets to 8.00 and omitted times are
/// cleared. On `PATCH` omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepGoalBody {
    #[schema(value_type = Option<String>, example = "7.50")]
    pub target_hours: Option<Decimal>,
    #[schema(example = "23:00")]
    pub target_bedtime: Option<String>,
    #[schema(example = "07:00")]
    pub target_waketime: Option<String>,
}

/// The caller's goal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SleepGoalResponse {
    #[schema(value_type = String, example = "8.00")]
    pub target_hours: Decimal,
    #[schema(example = "23:00:00")]
    pub target_bedtime: Option<String>,
    #[schema(example = "07:00:00")]
    pub target_waketime: Option<String>,
}

impl From<SleepGoal> for SleepGoalResponse {
    fn from(goal: SleepGoal) -> Self {
        let format = |time: NaiveTime| time.format(TIME_FORMAT).to_string();
        Self {
            target_hours: goal.target_hours(),
            target_bedtime: goal.target_bedtime().map(format),
            target_waketime: goal.target_waketime().map(format),
        }
    }
}

struct ParsedGoalBody {
    target_hours: Option<Decimal>,
    target_bedtime: Option<NaiveTime>,
    target_waketime: Option<NaiveTime>,
}

fn parse_goal_body(body: SleepGoalBody) -> Result<ParsedGoalBody, Error> {
    Ok(ParsedGoalBody {
        target_hours: body.target_hours,
        target_bedtime: parse_optional_time(
            body.target_bedtime.as_deref(),
            FieldName::new("targetBedtime"),
        )?,
        target_waketime: parse_optional_time(
            body.target_waketime.as_deref(),
            FieldName::new("targetWaketime"),
        )?,
    })
}

impl From<ParsedGoalBody> for SleepGoalInput {
    fn from(value: ParsedGoalBody) -> Self {
        Self {
            target_hours: value.target_hours,
            target_bedtime: value.target_bedtime,
            target_waketime: value.target_waketime,
        }
    }
}

impl From<ParsedGoalBody> for GoalPatch {
    fn from(value: ParsedGoalBody) -> Self {
        Self {
            target_hours: value.target_hours,
            target_bedtime: value.target_bedtime,
            target_waketime: value.target_waketime,
        }
    }
}

/// Fetch the caller's goal.
#[utoipa::path(
    get,
    path = "/api/v1/goal",
    responses(
        (status = 200, description = "Goal", body = SleepGoalResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No goal set", body = Error)
    ),
    tags = ["goal"],
    operation_id = "getSleepGoal",
    security(("SessionCookie" = []))
)]
#[get("/goal")]
pub async fn get_goal(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SleepGoalResponse>> {
    let user_id = session.require_user_id()?;
    let goal = state.goal_query.get(&user_id).await?;
    Ok(web::Json(goal.into()))
}

/// Create or replace the caller's goal.
#[utoipa::path(
    put,
    path = "/api/v1/goal",
    request_body = SleepGoalBody,
    responses(
        (status = 200, description = "Goal saved", body = SleepGoalResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["goal"],
    operation_id = "putSleepGoal",
    security(("SessionCookie" = []))
)]
#[put("/goal")]
pub async fn put_goal(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SleepGoalBody>,
) -> ApiResult<web::Json<SleepGoalResponse>> {
    let user_id = session.require_user_id()?;
    let input = SleepGoalInput::from(parse_goal_body(payload.into_inner())?);
    let goal = state.goal.put(&user_id, input).await?;
    Ok(web::Json(goal.into()))
}

/// Update some fields of the caller's goal, creating it from defaults if
/// none exists.
#[utoipa::path(
    patch,
    path = "/api/v1/goal",
    request_body = SleepGoalBody,
    responses(
        (status = 200, description = "Goal saved", body = SleepGoalResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["goal"],
    operation_id = "patchSleepGoal",
    security(("SessionCookie" = []))
)]
#[patch("/goal")]
pub async fn patch_goal(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SleepGoalBody>,
) -> ApiResult<web::Json<SleepGoalResponse>> {
    let user_id = session.require_user_id()?;
    let patch = GoalPatch::from(parse_goal_body(payload.into_inner())?);
    let goal = state.goal.patch(&user_id, patch).await?;
    Ok(web::Json(goal.into()))
}

/// Delete the caller's goal. Refused while any session exists.
#[utoipa::path(
    delete,
    path = "/api/v1/goal",
    responses(
        (status = 204, description = "Goal deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No goal set", body = Error),
        (status = 409, description = "Sessions still exist", body = Error)
    ),
    tags = ["goal"],
    operation_id = "deleteSleepGoal",
    security(("SessionCookie" = []))
)]
#[delete("/goal")]
pub async fn delete_goal(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.goal.delete(&user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockSleepGoalCommand, MockSleepGoalQuery};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{
        fixture_ports, login_and_get_cookie, test_session_middleware,
    };
    use crate::inbound::http::users::login;

    fn test_app(
        ports: HttpStatePorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::new(ports)))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(get_goal)
                    .service(put_goal)
                    .service(patch_goal)
                    .service(delete_goal),
            )
    }

    async fn send(
        ports: HttpStatePorts,
        request: actix_test::TestRequest,
    ) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports)).await;
        let cookie = login_and_get_cookie(&app).await;
        let response = actix_test::call_service(&app, request.cookie(cookie).to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[actix_web::test]
    async fn missing_goal_is_not_found() {
        let (status, _) = send(
            fixture_ports(),
            actix_test::TestRequest::get().uri("/api/v1/goal"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn put_returns_the_saved_goal_with_two_decimal_hours() {
        let (status, body) = send(
            fixture_ports(),
            actix_test::TestRequest::put().uri("/api/v1/goal").set_json(json!({
                "targetHours": 7.5,
                "targetBedtime": "23:00",
                "targetWaketime": "07:00",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "targetHours": "7.50",
                "targetBedtime": "23:00:00",
                "targetWaketime": "07:00:00",
            })
        );
    }

    #[rstest]
    #[case(json!({ "targetHours": "0" }), "targetHours", "non_positive")]
    #[case(json!({ "targetHours": "-1.5" }), "targetHours", "non_positive")]
    #[case(
        json!({ "targetBedtime": "08:00", "targetWaketime": "07:00" }),
        "targetWaketime",
        "waketime_not_after_bedtime"
    )]
    #[case(json!({ "targetBedtime": "late" }), "targetBedtime", "invalid_time")]
    #[actix_web::test]
    async fn put_rejects_invalid_goals(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (status, body) = send(
            fixture_ports(),
            actix_test::TestRequest::put()
                .uri("/api/v1/goal")
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], json!(field));
        assert_eq!(body["details"]["code"], json!(code));
    }

    #[actix_web::test]
    async fn patch_forwards_only_supplied_fields() {
        let mut command = MockSleepGoalCommand::new();
        command
            .expect_patch()
            .withf(|_, patch| {
                *patch
                    == GoalPatch {
                        target_waketime: NaiveTime::from_hms_opt(6, 45, 0),
                        ..GoalPatch::default()
                    }
            })
            .times(1)
            .returning(|owner, patch| {
                let defaults =
                    SleepGoal::new(SleepGoalInput::default().into_draft(owner.clone()))?;
                Ok(patch.apply_to(&defaults)?)
            });
        let ports = HttpStatePorts {
            goal: Arc::new(command),
            ..fixture_ports()
        };

        let (status, body) = send(
            ports,
            actix_test::TestRequest::patch()
                .uri("/api/v1/goal")
                .set_json(json!({ "targetWaketime": "06:45" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["targetHours"], json!("8.00"));
        assert_eq!(body["targetWaketime"], json!("06:45:00"));
        assert_eq!(body["targetBedtime"], Value::Null);
    }

    #[rstest]
    #[case(Ok(()), StatusCode::NO_CONTENT)]
    #[case(
        Err(Error::conflict("Cannot delete goal while sleep sessions exist.")),
        StatusCode::CONFLICT
    )]
    #[case(Err(Error::not_found("sleep goal not set")), StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn delete_maps_the_outcome_to_a_status(
        #[case] outcome: Result<(), Error>,
        #[case] expected: StatusCode,
    ) {
        let mut command = MockSleepGoalCommand::new();
        command
            .expect_delete()
            .times(1)
            .return_once(move |_| outcome);
        let ports = HttpStatePorts {
            goal: Arc::new(command),
            ..fixture_ports()
        };

        let (status, _) = send(ports, actix_test::TestRequest::delete().uri("/api/v1/goal")).await;
        assert_eq!(status, expected);
    }

    #[actix_web::test]
    async fn get_serialises_a_stored_goal() {
        let mut query = MockSleepGoalQuery::new();
        query.expect_get().returning(|owner| {
            Ok(SleepGoal::new(
                SleepGoalInput {
                    target_hours: Some(Decimal::new(65, 1)),
                    target_bedtime: NaiveTime::from_hms_opt(22, 30, 0),
                    target_waketime: None,
                }
                .into_draft(owner.clone()),
            )?)
        });
        let ports = HttpStatePorts {
            goal_query: Arc::new(query),
            ..fixture_ports()
        };

        let (status, body) = send(ports, actix_test::TestRequest::get().uri("/api/v1/goal")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["targetHours"], json!("6.50"));
        assert_eq!(body["targetBedtime"], json!("22:30:00"));
    }
}
