//! Record store durability across reopen.

#[allow(dead_code, reason = "Shared wiring includes helpers other suites use.")]
#[path = "support/app.rs"]
mod app;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tokio::task::JoinSet;

use chirpy::domain::ports::{ChirpRepository, CredentialManager, UserRepository};
use chirpy::domain::{ChirpBody, Credentials, Email, PasswordHash, RefreshToken};
use chirpy::inbound::http::configure_api;
use chirpy::inbound::http::payload::json_config;

use app::{TempDatabase, credential_service, open_store};

fn email(raw: &str) -> Email {
    Email::new(raw).expect("email")
}

#[tokio::test]
async fn records_and_counters_survive_a_reopen() {
    let db = TempDatabase::new();
    {
        let store = open_store(&db.path);
        let user = UserRepository::create(&*store, &email("a@b.c"), &PasswordHash::new("h"))
            .await
            .expect("user");
        let body = ChirpBody::parse("first").expect("body");
        ChirpRepository::create(&*store, &user.id(), &body)
            .await
            .expect("chirp");
    }

    let reopened = open_store(&db.path);
    let user = reopened
        .find_by_email(&email("a@b.c"))
        .await
        .expect("lookup")
        .expect("user persisted");
    assert_eq!(user.id().get(), 1);

    let body = ChirpBody::parse("second").expect("body");
    let chirp = ChirpRepository::create(&*reopened, &user.id(), &body)
        .await
        .expect("chirp");
    assert_eq!(chirp.id.get(), 2);
    let listed = ChirpRepository::list(&*reopened).await.expect("list");
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn refresh_sessions_are_written_to_disk() {
    let db = TempDatabase::new();
    let store = open_store(&db.path);
    let user = UserRepository::create(&*store, &email("a@b.c"), &PasswordHash::new("h"))
        .await
        .expect("user");
    let token = RefreshToken::new("ab".repeat(32));
    let expires_at = Utc::now() + Duration::days(60);
    assert!(
        store
            .store_refresh_token(&user.id(), &token, expires_at)
            .await
            .expect("store token")
    );

    let raw = std::fs::read_to_string(&db.path).expect("read document");
    let document: Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(document["users"]["1"]["refresh_token"], "ab".repeat(32));

    assert!(store.revoke_refresh_token(&token).await.expect("revoke"));
    let reopened = open_store(&db.path);
    assert!(
        reopened
            .find_refresh_session(&token)
            .await
            .expect("lookup")
            .is_none()
    );
}

#[tokio::test]
async fn deleting_the_file_resets_the_store() {
    let db = TempDatabase::new();
    let store = open_store(&db.path);
    UserRepository::create(&*store, &email("a@b.c"), &PasswordHash::new("h"))
        .await
        .expect("user");

    std::fs::remove_file(&db.path).expect("remove");

    assert!(
        store
            .find_by_email(&email("a@b.c"))
            .await
            .expect("missing file reads as empty")
            .is_none()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_get_distinct_sequential_ids() {
    const USERS: u64 = 16;
    let db = TempDatabase::new();
    let service = Arc::new(credential_service(open_store(&db.path)));

    let mut tasks = JoinSet::new();
    for n in 1..=USERS {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            let credentials = Credentials::try_from_parts(&format!("user{n}@example.com"), "pw")
                .expect("valid credentials");
            service.register(&credentials).await.expect("register")
        });
    }
    let mut ids = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        ids.push(joined.expect("task completes").id.get());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=USERS).collect::<Vec<_>>());

    let reopened = open_store(&db.path);
    for n in 1..=USERS {
        let user = reopened
            .find_by_email(&email(&format!("user{n}@example.com")))
            .await
            .expect("lookup")
            .expect("user persisted");
        assert!((1..=USERS).contains(&user.id().get()));
    }
}

#[actix_web::test]
async fn revoking_twice_leaves_other_sessions_intact() {
    let db = TempDatabase::new();
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(app::http_state(&db.path)))
            .app_data(json_config())
            .configure(configure_api),
    )
    .await;

    let mut refresh_tokens = Vec::new();
    for address in ["walt@breakingbad.com", "jesse@breakingbad.com"] {
        let credentials = json!({ "email": address, "password": "04234" });
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/users")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/login")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let login: Value = actix_test::read_body_json(res).await;
        let token = login["refresh_token"].as_str().expect("refresh token");
        refresh_tokens.push(token.to_owned());
    }

    for _ in 0..2 {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/revoke")
                .insert_header((AUTHORIZATION, format!("Bearer {}", refresh_tokens[0])))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/refresh")
            .insert_header((AUTHORIZATION, format!("Bearer {}", refresh_tokens[0])))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/refresh")
            .insert_header((AUTHORIZATION, format!("Bearer {}", refresh_tokens[1])))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}
