//! Integration tests for TokenManager against a mock token endpoint
//!
//! **Coverage:**
//! - Caching: one grant request serves repeated calls
//! - Expiry: a refresh happens once the clock passes `expires_in - margin`
//! - Failed refresh: error surfaced, cached entry left in place
//! - Single flight: concurrent callers share one grant request
//! - Environments are cached independently
//! - An oversized refresh margin forces a refresh instead of overflowing

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use einvoice_core::{Clock, MockClock};
use einvoice_domain::EInvoiceError;
use einvoice_infra::gateway::{Credentials, TokenManager};
use futures::future::join_all;
use support::{mount_token, token_manager, TEST_PASSWORD};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn clock() -> MockClock {
    MockClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap())
}

fn token_body(token: &str, expires_in: u64) -> serde_json::Value {
    serde_json::json!({"access_token": token, "expires_in": expires_in, "token_type": "Bearer"})
}

#[tokio::test]
async fn grant_request_is_form_encoded_password_grant() {
    support::init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=svc-bridge"))
        .and(body_string_contains(format!("password={TEST_PASSWORD}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("token-1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let manager = token_manager(Arc::new(clock()));
    let token = manager.get_token(&server.uri()).await.expect("token");
    assert_eq!(token, "token-1");
}

#[tokio::test]
async fn cached_token_is_reused_until_margin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("token-1", 60)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("token-2", 60)))
        .expect(1)
        .mount(&server)
        .await;

    let clock = clock();
    let manager = token_manager(Arc::new(clock.clone()));
    let env = server.uri();

    assert_eq!(manager.get_token(&env).await.unwrap(), "token-1");

    // 60s lifetime, 10s margin: reused strictly before t+50s.
    clock.advance(Duration::from_secs(49));
    assert_eq!(manager.get_token(&env).await.unwrap(), "token-1");

    clock.advance(Duration::from_secs(1));
    assert_eq!(manager.get_token(&env).await.unwrap(), "token-2");
    assert_eq!(manager.get_token(&env).await.unwrap(), "token-2");
}

#[tokio::test]
async fn trailing_slash_shares_the_cache_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("token-1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let manager = token_manager(Arc::new(clock()));
    manager.get_token(&server.uri()).await.unwrap();
    manager.get_token(&format!("{}/", server.uri())).await.unwrap();
}

#[tokio::test]
async fn failed_refresh_keeps_previous_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("token-1", 60)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(500).set_body_string("identity server down"))
        .mount(&server)
        .await;

    let clock = clock();
    let start = clock.now();
    let manager = token_manager(Arc::new(clock.clone()));
    let env = server.uri();

    assert_eq!(manager.get_token(&env).await.unwrap(), "token-1");

    clock.advance(Duration::from_secs(55));
    let err = manager.get_token(&env).await.unwrap_err();
    assert!(matches!(err, EInvoiceError::Auth(_)), "got {err:?}");

    // Back inside the original window the old token is still served from
    // cache without another grant request.
    clock.set(start);
    let before = server.received_requests().await.unwrap().len();
    assert_eq!(manager.get_token(&env).await.unwrap(), "token-1");
    assert_eq!(server.received_requests().await.unwrap().len(), before);
}

#[tokio::test]
async fn concurrent_callers_share_one_grant_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("token-1", 3600))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let manager = token_manager(Arc::new(clock()));
    let env = server.uri();

    let results = join_all((0..8).map(|_| manager.get_token(&env))).await;
    for result in results {
        assert_eq!(result.expect("token"), "token-1");
    }
}

#[tokio::test]
async fn environments_are_cached_independently() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("first-token", 3600)))
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("second-token", 3600)))
        .expect(1)
        .mount(&second)
        .await;

    let manager = token_manager(Arc::new(clock()));
    for _ in 0..2 {
        assert_eq!(manager.get_token(&first.uri()).await.unwrap(), "first-token");
        assert_eq!(manager.get_token(&second.uri()).await.unwrap(), "second-token");
    }
}

#[tokio::test]
async fn rejected_credentials_are_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&server)
        .await;

    let manager = token_manager(Arc::new(clock()));
    match manager.get_token(&server.uri()).await {
        Err(EInvoiceError::Auth(msg)) => {
            assert!(msg.contains("401"));
            assert!(!msg.contains(TEST_PASSWORD));
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_access_token_is_an_auth_error() {
    let server = MockServer::start().await;
    mount_token(&server, "", 3600).await;

    let manager = token_manager(Arc::new(clock()));
    let err = manager.get_token(&server.uri()).await.unwrap_err();
    assert!(matches!(err, EInvoiceError::Auth(_)));
}

#[tokio::test]
async fn unreachable_token_endpoint_is_an_auth_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let manager = token_manager(Arc::new(clock()));
    let err = manager.get_token(&format!("http://{addr}")).await.unwrap_err();
    assert!(matches!(err, EInvoiceError::Auth(_)));
}

#[tokio::test]
async fn oversized_refresh_margin_refreshes_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("token-max", u64::MAX)))
        .expect(2)
        .mount(&server)
        .await;

    let manager = TokenManager::new(
        support::http_client(),
        Credentials::new(support::TEST_USERNAME, TEST_PASSWORD),
        Arc::new(clock()),
    )
    .with_refresh_margin(Duration::from_secs(u64::MAX));

    let env = server.uri();
    assert_eq!(manager.get_token(&env).await.unwrap(), "token-max");
    assert_eq!(manager.get_token(&env).await.unwrap(), "token-max");
}
