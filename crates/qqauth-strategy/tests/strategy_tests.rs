// SPDX-FileCopyrightText: 2026 qqauth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the QQ token strategy.
//!
//! HTTP-level tests run the real reqwest client against a wiremock server; the
//! rest use the scripted client from `qqauth-test-utils`.

use std::sync::Arc;

use proptest::prelude::*;
use qqauth_config::{HttpConfig, QqAuthConfig, QqConfig};
use qqauth_core::{AuthOutcome, AuthStrategy, QqAuthError, TokenRequest};
use qqauth_strategy::{QqTokenStrategy, FETCH_PROFILE_FAILED, FETCH_UID_FAILED};
use qqauth_test_utils::{MockOAuth2Client, MockResponse, MockVerifier};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IDENTITY_BODY: &str = r#"callback( {"client_id":"123","openid":"abc"} );"#;
const PROFILE_BODY: &str =
    r#"{"nickname":"Alice","gender":"male","figureurl_qq_2":"http://x/y.png"}"#;

fn server_config(server: &MockServer) -> QqAuthConfig {
    let mut qq = QqConfig::with_credentials("123", "shhh");
    qq.identity_endpoint = format!("{}/oauth2.0/me", server.uri());
    qq.profile_endpoint = format!("{}/user/get_user_info", server.uri());
    QqAuthConfig {
        qq,
        http: HttpConfig::default(),
    }
}

fn mock_strategy(
    client: Arc<MockOAuth2Client>,
    verifier: MockVerifier,
) -> QqTokenStrategy<MockVerifier> {
    QqTokenStrategy::with_client(QqConfig::with_credentials("123", "shhh"), client, verifier)
        .expect("valid options")
}

async fn mount_identity(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/oauth2.0/me"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

// --- Outbound calls ---

#[tokio::test]
async fn token_flow_issues_both_calls_with_identity_params() {
    let server = MockServer::start().await;
    mount_identity(&server, IDENTITY_BODY).await;
    Mock::given(method("GET"))
        .and(path("/user/get_user_info"))
        .and(query_param("oauth_consumer_key", "123"))
        .and(query_param("openid", "abc"))
        .and(query_param("access_token", "tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let verifier = MockVerifier::accepting(json!({"id": 1}));
    let strategy = QqTokenStrategy::new(&server_config(&server), verifier.clone()).unwrap();

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;

    assert!(outcome.is_success(), "got {outcome:?}");
    assert_eq!(outcome.user(), Some(&json!({"id": 1})));

    let seen = verifier.contexts().await;
    assert_eq!(seen.len(), 1);
    let profile = &seen[0].profile;
    assert_eq!(profile.provider, "qq");
    assert_eq!(profile.id, "abc");
    assert_eq!(profile.display_name, "Alice");
    assert_eq!(profile.gender, "male");
    assert_eq!(profile.photos[0].value, "http://x/y.png");
    assert_eq!(profile.raw, PROFILE_BODY);
    assert_eq!(
        profile.parsed,
        json!({"nickname":"Alice","gender":"male","figureurl_qq_2":"http://x/y.png"})
    );
}

#[tokio::test]
async fn malformed_identity_payload_skips_profile_call() {
    let server = MockServer::start().await;
    mount_identity(&server, r#"{"client_id":"123","openid":"abc"}"#).await;
    Mock::given(method("GET"))
        .and(path("/user/get_user_info"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let verifier = MockVerifier::accepting(json!({"id": 1}));
    let strategy = QqTokenStrategy::new(&server_config(&server), verifier.clone()).unwrap();

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;

    let err = outcome.error().expect("parse failure is an error outcome");
    assert!(err.is_parse_failure(), "got {err:?}");
    assert!(verifier.contexts().await.is_empty());
}

#[tokio::test]
async fn identity_http_error_is_wrapped_with_stage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2.0/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let strategy = QqTokenStrategy::new(
        &server_config(&server),
        MockVerifier::accepting(json!(1)),
    )
    .unwrap();

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;

    match outcome {
        AuthOutcome::Error(QqAuthError::Transport { message, source }) => {
            assert_eq!(message, FETCH_UID_FAILED);
            assert_eq!(source.status, Some(500));
            assert_eq!(source.body.as_deref(), Some("boom"));
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_identity_endpoint_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut qq = QqConfig::with_credentials("123", "shhh");
    qq.identity_endpoint = format!("http://{addr}/oauth2.0/me");
    let config = QqAuthConfig {
        qq,
        http: HttpConfig::default(),
    };
    let verifier = MockVerifier::accepting(json!(1));
    let strategy = QqTokenStrategy::new(&config, verifier.clone()).unwrap();

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;

    match outcome {
        AuthOutcome::Error(QqAuthError::Transport { message, source }) => {
            assert_eq!(message, FETCH_UID_FAILED);
            assert_eq!(source.status, None);
            assert!(source.source.is_some());
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(verifier.contexts().await.is_empty());
}

#[tokio::test]
async fn token_in_json_body_is_used() {
    let server = MockServer::start().await;
    mount_identity(&server, IDENTITY_BODY).await;
    Mock::given(method("GET"))
        .and(path("/user/get_user_info"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let verifier = MockVerifier::accepting(json!("u"));
    let strategy = QqTokenStrategy::new(&server_config(&server), verifier.clone()).unwrap();

    let request = TokenRequest::new()
        .with_json_body(json!({"access_token": "tok", "refresh_token": "ref"}));
    let outcome = strategy.authenticate(&request).await;

    assert!(outcome.is_success(), "got {outcome:?}");
    let seen = verifier.contexts().await;
    assert_eq!(seen[0].access_token, "tok");
    assert_eq!(seen[0].refresh_token.as_deref(), Some("ref"));
}

// --- Missing credentials ---

#[tokio::test]
async fn missing_token_fails_without_network() {
    let client = Arc::new(MockOAuth2Client::new());
    let strategy = mock_strategy(client.clone(), MockVerifier::accepting(json!(1)));

    let request = TokenRequest::from_query_str("refresh_token=ref")
        .with_json_body(json!({"other": "x"}));
    let outcome = strategy.authenticate(&request).await;

    assert!(outcome.is_failure());
    assert_eq!(
        outcome.info(),
        Some(&json!({"message": "You should provide access_token"}))
    );
    assert_eq!(client.call_count().await, 0);
}

#[tokio::test]
async fn custom_token_field_names_are_honored() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::body(PROFILE_BODY),
    ]));
    let verifier = MockVerifier::accepting(json!(1));
    let mut options = QqConfig::with_credentials("123", "shhh");
    options.access_token_field = "token".into();
    options.refresh_token_field = "refresh".into();
    let strategy = QqTokenStrategy::with_client(options, client.clone(), verifier.clone()).unwrap();

    let missing = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;
    assert_eq!(
        missing.info(),
        Some(&json!({"message": "You should provide token"}))
    );
    assert_eq!(client.call_count().await, 0);

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("token=tok&refresh=ref"))
        .await;
    assert!(outcome.is_success());
    assert_eq!(verifier.contexts().await[0].refresh_token.as_deref(), Some("ref"));
}

// --- Verification outcomes ---

#[tokio::test]
async fn rejected_identity_is_failure_with_info() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::body(PROFILE_BODY),
    ]));
    let strategy = mock_strategy(client, MockVerifier::rejecting(json!({"message": "denied"})));

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;

    assert!(outcome.is_failure());
    assert_eq!(outcome.info(), Some(&json!({"message": "denied"})));
}

#[tokio::test]
async fn accepted_identity_is_success_with_user() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::body(PROFILE_BODY),
    ]));
    let strategy = mock_strategy(client, MockVerifier::accepting(json!({"id": 1})));

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;

    match outcome {
        AuthOutcome::Success { user, .. } => assert_eq!(user, json!({"id": 1})),
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn verifier_error_is_error_outcome() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::body(PROFILE_BODY),
    ]));
    let strategy = mock_strategy(client, MockVerifier::failing("datastore unavailable"));

    let outcome = strategy
        .authenticate(&TokenRequest::from_query_str("access_token=tok"))
        .await;

    match outcome {
        AuthOutcome::Error(QqAuthError::Verification(source)) => {
            assert_eq!(source.to_string(), "datastore unavailable");
        }
        other => panic!("expected verification error, got {other:?}"),
    }
}

// --- Profile retrieval ---

#[tokio::test]
async fn profile_failure_is_wrapped_with_stage() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::network_failure("connection reset"),
    ]));
    let strategy = mock_strategy(client, MockVerifier::accepting(json!(1)));

    let err = strategy.retrieve_profile("tok").await.unwrap_err();
    assert_eq!(err.to_string(), FETCH_PROFILE_FAILED);
    assert!(matches!(err, QqAuthError::Transport { ref source, .. } if source.status.is_none()));
}

#[tokio::test]
async fn invalid_profile_json_is_parse_failure() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::body("<html>busy</html>"),
    ]));
    let strategy = mock_strategy(client, MockVerifier::accepting(json!(1)));

    let err = strategy.retrieve_profile("tok").await.unwrap_err();
    assert!(err.is_parse_failure(), "got {err:?}");
}

#[tokio::test]
async fn missing_profile_fields_normalize_to_empty() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::body(r#"{"ret":0}"#),
    ]));
    let strategy = mock_strategy(client, MockVerifier::accepting(json!(1)));

    let profile = strategy.retrieve_profile("tok").await.unwrap();
    assert_eq!(profile.id, "abc");
    assert_eq!(profile.display_name, "");
    assert_eq!(profile.gender, "");
    assert_eq!(profile.photos.len(), 1);
    assert_eq!(profile.photos[0].value, "");
}

#[tokio::test]
async fn missing_openid_still_requests_profile() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(r#"callback({"client_id":"123"})"#),
        MockResponse::body(PROFILE_BODY),
    ]));
    let strategy = mock_strategy(client.clone(), MockVerifier::accepting(json!(1)));

    let profile = strategy.retrieve_profile("tok").await.unwrap();
    assert_eq!(profile.id, "");

    let calls = client.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls[1].url.ends_with("oauth_consumer_key=123&openid="), "got {}", calls[1].url);
}

#[tokio::test]
async fn identity_call_targets_identity_endpoint() {
    let client = Arc::new(MockOAuth2Client::with_responses(vec![
        MockResponse::body(IDENTITY_BODY),
        MockResponse::body(PROFILE_BODY),
    ]));
    let strategy = mock_strategy(client.clone(), MockVerifier::accepting(json!(1)));

    strategy.retrieve_profile("tok").await.unwrap();

    let calls = client.calls().await;
    assert_eq!(calls[0].url, "https://graph.qq.com/oauth2.0/me");
    assert_eq!(calls[0].access_token, "tok");
    assert_eq!(
        calls[1].url,
        "https://graph.qq.com/user/get_user_info?oauth_consumer_key=123&openid=abc"
    );
}

// --- Request pass-through ---

#[tokio::test]
async fn request_is_passed_only_when_enabled() {
    let request = TokenRequest::from_query_str("access_token=tok&state=xyz");

    for pass in [false, true] {
        let client = Arc::new(MockOAuth2Client::with_responses(vec![
            MockResponse::body(IDENTITY_BODY),
            MockResponse::body(PROFILE_BODY),
        ]));
        let verifier = MockVerifier::accepting(json!(1));
        let mut options = QqConfig::with_credentials("123", "shhh");
        options.pass_request_to_callback = pass;
        let strategy = QqTokenStrategy::with_client(options, client, verifier.clone()).unwrap();

        let _ = strategy.authenticate(&request).await;

        let seen = verifier.contexts().await;
        if pass {
            assert_eq!(seen[0].request.as_ref(), Some(&request));
        } else {
            assert!(seen[0].request.is_none());
        }
    }
}

#[tokio::test]
async fn concurrent_attempts_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth2.0/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string(IDENTITY_BODY))
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/get_user_info"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PROFILE_BODY))
        .expect(4)
        .mount(&server)
        .await;

    let strategy = Arc::new(
        QqTokenStrategy::new(&server_config(&server), MockVerifier::accepting(json!(1))).unwrap(),
    );

    let mut handles = Vec::new();
    for i in 0..4 {
        let strategy = Arc::clone(&strategy);
        handles.push(tokio::spawn(async move {
            strategy
                .authenticate(&TokenRequest::from_query_str(&format!("access_token=tok-{i}")))
                .await
                .is_success()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }
}

#[test]
fn invalid_endpoint_is_rejected_at_construction() {
    let mut options = QqConfig::with_credentials("123", "shhh");
    options.profile_endpoint = "ftp://graph.qq.com/user".into();
    let result = QqTokenStrategy::with_client(
        options,
        Arc::new(MockOAuth2Client::new()),
        MockVerifier::accepting(json!(1)),
    );
    assert!(matches!(result, Err(QqAuthError::Config(ref m)) if m.contains("profile_endpoint")));
}

proptest! {
    #[test]
    fn requests_without_token_never_reach_network(
        query in "[a-z_]{1,12}=[a-z0-9]{0,8}",
    ) {
        prop_assume!(!query.starts_with("access_token="));
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let client = Arc::new(MockOAuth2Client::new());
        let strategy = mock_strategy(client.clone(), MockVerifier::accepting(json!(1)));

        let outcome = rt.block_on(strategy.authenticate(&TokenRequest::from_query_str(&query)));

        prop_assert!(outcome.is_failure());
        prop_assert_eq!(rt.block_on(client.call_count()), 0);
    }
}
