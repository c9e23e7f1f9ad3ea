//! Tests for sleep session HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{FIXTURE_USER_ID, MockSleepSessionCommand, MockSleepSessionQuery};
use crate::domain::{PageRequest, SleepGoal, SleepGoalInput, SleepSession, UserId};
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
                .service(list_sessions)
                .service(create_session)
                .service(get_session)
                .service(replace_session)
                .service(patch_session)
                .service(delete_session),
        )
}

fn owner() -> UserId {
    UserId::new(FIXTURE_USER_ID).expect("fixture id")
}

fn bedtime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn sample_view(hours: i64, goal_hours: Option<i64>) -> SessionView {
    let draft = SleepSessionInput::window(bedtime(), bedtime() + Duration::hours(hours))
        .into_draft(Uuid::new_v4(), owner());
    let session = SleepSession::new(draft).expect("valid session");
    let goal = goal_hours.map(|target| {
        SleepGoal::new(
            SleepGoalInput {
                target_hours: Some(Decimal::new(target, 0)),
                ..SleepGoalInput::default()
            }
            .into_draft(owner()),
        )
        .expect("valid goal")
    });
    SessionView::new(session, goal.as_ref())
}

fn detail<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get("details")
        .and_then(|details| details.get(key))
        .and_then(Value::as_str)
}

#[actix_web::test]
async fn requests_without_a_session_are_unauthorised() {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/sleep-sessions")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_returns_derived_fields_without_a_goal() {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/sleep-sessions")
            .cookie(cookie)
            .set_json(json!({
                "start": "2024-03-01T23:00:00Z",
                "end": "2024-03-02T06:30:00Z",
                "tags": "travel, late dinner",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("durationHours"), Some(&json!(7.5)));
    assert_eq!(body.get("meetsGoal"), Some(&Value::Null));
    assert_eq!(body.get("quality"), Some(&json!(3)));
    assert_eq!(body.get("latencyMinutes"), Some(&json!(0)));
    assert_eq!(body.get("tags"), Some(&json!("travel, late dinner")));
}

#[rstest]
#[case(json!({ "end": "2024-03-02T06:30:00Z" }), "start", "missing_field")]
#[case(json!({ "start": "2024-03-01T23:00:00Z" }), "end", "missing_field")]
#[case(json!({ "start": "yesterday", "end": "2024-03-02T06:30:00Z" }), "start", "invalid_timestamp")]
#[case(
    json!({ "start": "2024-03-02T06:30:00Z", "end": "2024-03-01T23:00:00Z" }),
    "end",
    "end_not_after_start"
)]
#[case(
    json!({ "start": "2024-03-01T23:00:00Z", "end": "2024-03-02T06:30:00Z", "quality": -1 }),
    "quality",
    "negative_value"
)]
#[case(
    json!({ "start": "2024-03-01T23:00:00Z", "end": "2024-03-02T06:30:00Z", "awakenings": -2 }),
    "awakenings",
    "negative_value"
)]
#[actix_web::test]
async fn create_rejects_invalid_bodies(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/sleep-sessions")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(detail(&body, "field"), Some(field));
    assert_eq!(detail(&body, "code"), Some(code));
}

#[actix_web::test]
async fn list_forwards_range_and_page_and_shapes_the_response() {
    let view = sample_view(8, Some(7));
    let mut query = MockSleepSessionQuery::new();
    query
        .expect_list()
        .withf(|owner_id, range, page| {
            owner_id == &owner()
                && *range
                    == SessionRange::from_dates(
                        NaiveDate::from_ymd_opt(2024, 3, 1),
                        NaiveDate::from_ymd_opt(2024, 3, 31),
                    )
                && page.page() == 2
                && page.page_size() == 5
        })
        .times(1)
        .returning(move |_, _, page| {
            Ok(Page {
                items: vec![view.clone()],
                total: 6,
                request: page,
            })
        });
    let ports = HttpStatePorts {
        sessions_query: Arc::new(query),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/sleep-sessions?page=2&pageSize=5&start_date=2024-03-01&end_date=2024-03-31")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: SleepSessionListResponse = actix_test::read_body_json(response).await;
    assert_eq!((body.count, body.page, body.page_size), (6, 2, 5));
    let first = body.results.first().expect("one result");
    assert_eq!(first.duration_hours, 8.0);
    assert_eq!(first.meets_goal, Some(true));
}

#[rstest]
#[case("page=0", "page")]
#[case("pageSize=0", "pageSize")]
#[case("start_date=03/01/2024", "start_date")]
#[actix_web::test]
async fn list_rejects_bad_query_parameters(#[case] query: &str, #[case] field: &str) {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/sleep-sessions?{query}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(detail(&body, "field"), Some(field));
}

#[actix_web::test]
async fn unknown_sessions_are_not_found() {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/sleep-sessions/{}", Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_ids_are_rejected() {
    let app = actix_test::init_service(test_app(fixture_ports())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/sleep-sessions/not-a-uuid")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(detail(&body, "field"), Some("id"));
    assert_eq!(detail(&body, "code"), Some("invalid_uuid"));
}

#[actix_web::test]
async fn patch_sends_only_supplied_fields() {
    let id = Uuid::new_v4();
    let view = sample_view(6, Some(8));
    let mut command = MockSleepSessionCommand::new();
    command
        .expect_patch()
        .withf(move |_, session_id, patch| {
            *session_id == id
                && *patch
                    == SessionPatch {
                        quality: Some(5),
                        notes: Some("woke up once".to_owned()),
                        ..SessionPatch::default()
                    }
        })
        .times(1)
        .returning(move |_, _, _| Ok(view.clone()));
    let ports = HttpStatePorts {
        sessions: Arc::new(command),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/sleep-sessions/{id}"))
            .cookie(cookie)
            .set_json(json!({ "quality": 5, "notes": "woke up once" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("meetsGoal"), Some(&json!(false)));
}

#[actix_web::test]
async fn delete_returns_no_content() {
    let id = Uuid::new_v4();
    let mut command = MockSleepSessionCommand::new();
    command
        .expect_delete()
        .withf(move |owner_id, session_id| owner_id == &owner() && *session_id == id)
        .times(1)
        .returning(|_, _| Ok(()));
    let ports = HttpStatePorts {
        sessions: Arc::new(command),
        ..fixture_ports()
    };
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/sleep-sessions/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[rstest]
fn page_request_defaults_are_reported_back() {
    let page = PageRequest::default();
    let response = SleepSessionListResponse::from(Page::<SessionView> {
        items: Vec::new(),
        total: 0,
        request: page,
    });
    assert_eq!((response.page, response.page_size), (1, 10));
    assert!(response.results.is_empty());
}
