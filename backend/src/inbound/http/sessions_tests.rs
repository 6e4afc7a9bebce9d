//! Tests for session lifecycle handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{AccessToken, Error, LoginGrant, RefreshToken};
use super::LoginRequest;
use crate::inbound::http::test_utils::{MockPorts, bearer, profile, test_app};

fn grant() -> LoginGrant {
    LoginGrant {
        profile: profile(1, "walt@breakingbad.com"),
        access_token: AccessToken::new("header.claims.signature"),
        refresh_token: RefreshToken::new("ab".repeat(32)),
    }
}

#[rstest]
#[case(json!({ "email": "walt@breakingbad.com", "password": "04234" }), None)]
#[case(
    json!({ "email": "walt@breakingbad.com", "password": "04234", "expires_in_seconds": 60 }),
    Some(60)
)]
#[actix_web::test]
async fn login_returns_profile_and_tokens(
    #[case] payload: Value,
    #[case] requested_ttl: Option<i64>,
) {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_login()
        .withf(move |creds, ttl| creds.password() == "04234" && *ttl == requested_ttl)
        .times(1)
        .return_once(|_, _| Ok(grant()));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({
            "id": 1,
            "email": "walt@breakingbad.com",
            "access_token": "header.claims.signature",
            "refresh_token": "ab".repeat(32),
        })
    );
}

#[actix_web::test]
async fn login_failures_are_generic_unauthorised_errors() {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_login()
        .return_once(|_, _| Err(Error::unauthorized("Incorrect email or password")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "nobody@b.c", "password": "pw" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Incorrect email or password");
}

#[actix_web::test]
async fn malformed_login_json_is_a_bad_request() {
    let mut ports = MockPorts::default();
    ports.credentials.expect_login().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/login")
            .insert_header(actix_web::http::header::ContentType::json())
            .set_payload("{\"email\":")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn refresh_exchanges_the_bearer_refresh_token() {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_refresh()
        .withf(|token| token.as_str() == "refresh-123")
        .times(1)
        .return_once(|_| Ok(AccessToken::new("new.access.token")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/refresh")
            .insert_header(bearer("refresh-123"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "access_token": "new.access.token" }));
}

#[rstest]
#[case("/api/refresh")]
#[case("/api/revoke")]
#[actix_web::test]
async fn refresh_and_revoke_require_a_bearer_token(#[case] uri: &str) {
    let mut ports = MockPorts::default();
    ports.credentials.expect_refresh().times(0);
    ports.credentials.expect_revoke().times(0);
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(uri)
            .insert_header((actix_web::http::header::AUTHORIZATION, "Basic abc"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn rejected_refresh_tokens_are_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_refresh()
        .return_once(|_| Err(Error::unauthorized("invalid or expired token")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/refresh")
            .insert_header(bearer("revoked"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn revoke_answers_no_content() {
    let mut ports = MockPorts::default();
    ports
        .credentials
        .expect_revoke()
        .withf(|token| token.as_str() == "refresh-123")
        .times(1)
        .return_once(|_| Ok(()));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/revoke")
            .insert_header(bearer("refresh-123"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(actix_test::read_body(res).await.is_empty());
}

#[test]
fn login_request_debug_hides_the_password() {
    let request = LoginRequest {
        email: "walt@breakingbad.com".into(),
        password: "heisenberg-04234".into(),
        expires_in_seconds: Some(60),
    };
    let rendered = format!("{request:?}");
    assert!(rendered.contains("walt@breakingbad.com"));
    assert!(!rendered.contains("heisenberg-04234"));
}
