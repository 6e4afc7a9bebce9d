//! Tests for account handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{Error, UserId};
use super::CredentialsRequest;
use crate::inbound::http::test_utils::{MockPorts, bearer, profile, test_app};

#[actix_web::test]
async fn create_user_returns_created_profile() {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_register()
        .withf(|creds| creds.email().as_str() == "walt@breakingbad.com" && creds.password() == "04234")
        .times(1)
        .return_once(|_| Ok(profile(1, "walt@breakingbad.com")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "email": "walt@breakingbad.com", "password": "04234" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "id": 1, "email": "walt@breakingbad.com" }));
}

#[rstest]
#[case(json!({ "email": "  ", "password": "pw" }), "email", "empty_email")]
#[case(json!({ "email": "a@b.c", "password": "" }), "password", "empty_password")]
#[actix_web::test]
async fn create_user_rejects_blank_fields(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    ports.credentials.expect_register().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn update_user_acts_on_the_token_subject() {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_authenticate()
        .withf(|token| token == "access-token")
        .return_once(|_| Ok(UserId::new(3).expect("id")));
    ports
        .credentials
        .expect_update_credentials()
        .withf(|id, creds| id.get() == 3 && creds.email().as_str() == "new@b.c")
        .times(1)
        .return_once(|_, _| Ok(profile(3, "new@b.c")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users")
            .insert_header(bearer("access-token"))
            .set_json(json!({ "email": "new@b.c", "password": "pw2" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "id": 3, "email": "new@b.c" }));
}

#[actix_web::test]
async fn update_user_without_a_token_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports.credentials.expect_authenticate().times(0);
    ports.credentials.expect_update_credentials().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users")
            .set_json(json!({ "email": "new@b.c", "password": "pw2" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn update_user_with_a_rejected_token_is_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_authenticate()
        .return_once(|_| Err(Error::unauthorized("invalid or expired token")));
    ports.credentials.expect_update_credentials().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users")
            .insert_header(bearer("expired"))
            .set_json(json!({ "email": "new@b.c", "password": "pw2" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert!(body["traceId"].is_string());
}

#[test]
fn credentials_request_debug_hides_the_password() {
    let request = CredentialsRequest {
        email: "walt@breakingbad.com".into(),
        password: "heisenberg-04234".into(),
    };
    let rendered = format!("{request:?}");
    assert!(rendered.contains("walt@breakingbad.com"));
    assert!(!rendered.contains("heisenberg-04234"));
}
