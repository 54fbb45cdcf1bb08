//! Integration tests for the request executor.
//!
//! These tests run the client against a mock controller and verify the
//! request headers, body passthrough, status classification and API
//! version handling.

use controller_sdk::clients::{HttpMethod, HttpRequest, API_VERSION_HEADER};
use controller_sdk::{ApiVersion, Client, ClientConfig, ControllerUrl, ErrorKind, Token};
use serde::Deserialize;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client pointed at the mock server.
fn create_test_client(server: &MockServer, token: Token) -> Client {
    let config = ClientConfig::builder()
        .controller_url(ControllerUrl::new(server.uri()).unwrap())
        .token(token)
        .build()
        .unwrap();
    Client::new(config).unwrap()
}

/// A response advertising the version the client expects.
fn controller_response(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header(API_VERSION_HEADER, "2.3")
}

#[derive(Debug, Deserialize, PartialEq)]
struct TokenReply {
    token: String,
}

// ============================================================================
// Request Construction
// ============================================================================

#[tokio::test]
async fn test_token_and_accept_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/apps/"))
        .and(header("Authorization", "token abc"))
        .and(header("Accept", "application/json"))
        .and(header_exists("User-Agent"))
        .respond_with(controller_response(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let response = client.request(HttpMethod::Get, "/v2/apps/", None).await.unwrap();

    assert_eq!(response.code, 200);
    assert!(response.version_mismatch.is_none());
}

#[tokio::test]
async fn test_anonymous_client_sends_no_authorization() {
    let server = MockServer::start().await;

    Mock::given(header_exists("Authorization"))
        .respond_with(controller_response(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/auth/login/"))
        .respond_with(controller_response(200).set_body_json(json!({"token": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::anonymous());
    let response = client
        .request(
            HttpMethod::Post,
            "/v2/auth/login/",
            Some(br#"{"username":"test","password":"opensesame"}"#.to_vec()),
        )
        .await
        .unwrap();

    assert_eq!(response.json::<TokenReply>().unwrap().token, "abc");
}

#[tokio::test]
async fn test_body_is_sent_byte_for_byte() {
    let server = MockServer::start().await;
    // Key order and spacing must survive untouched
    let body = r#"{"values": {"TEST":null, "FOO":"bar"}}"#;

    Mock::given(method("POST"))
        .and(path("/v2/apps/example-go/config/"))
        .and(header("Content-Type", "application/json"))
        .and(body_string(body))
        .respond_with(controller_response(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let response = client
        .request(
            HttpMethod::Post,
            "/v2/apps/example-go/config/",
            Some(body.as_bytes().to_vec()),
        )
        .await
        .unwrap();

    assert_eq!(response.code, 201);
}

#[tokio::test]
async fn test_query_parameters_are_appended() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/apps/example-go/logs"))
        .and(query_param("log_lines", "1"))
        .respond_with(controller_response(200).set_body_string("test"))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let request = HttpRequest::builder(HttpMethod::Get, "/v2/apps/example-go/logs")
        .query_param("log_lines", 1)
        .build();
    let response = assert_ok!(client.execute(request).await);

    assert_eq!(response.text(), "test");
}

// ============================================================================
// Version Mismatch
// ============================================================================

#[tokio::test]
async fn test_compatible_mismatch_still_returns_usable_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/auth/login/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(API_VERSION_HEADER, "2.4")
                .set_body_json(json!({"token": "abc"})),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::anonymous());
    let response = client
        .request(HttpMethod::Post, "/v2/auth/login/", Some(b"{}".to_vec()))
        .await
        .unwrap();

    let mismatch = response.version_mismatch.clone().unwrap();
    assert_eq!(mismatch.expected, ApiVersion::current());
    assert_eq!(mismatch.advertised.as_deref(), Some("2.4"));
    assert!(mismatch.compatible);
    assert_eq!(response.json::<TokenReply>().unwrap().token, "abc");
}

#[tokio::test]
async fn test_incompatible_mismatch_is_flagged_but_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/apps/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(API_VERSION_HEADER, "3.0")
                .set_body_json(json!({"id": "example-go"})),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let response = client.request(HttpMethod::Get, "/v2/apps/", None).await.unwrap();

    let mismatch = response.version_mismatch.as_ref().unwrap();
    assert!(!mismatch.compatible);
    assert!(mismatch.to_string().contains("client 2.3, server 3.0"));
    assert_eq!(response.json::<serde_json::Value>().unwrap()["id"], "example-go");
}

#[tokio::test]
async fn test_missing_version_header_is_a_mismatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/apps/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let response = client.request(HttpMethod::Get, "/v2/apps/", None).await.unwrap();

    let mismatch = response.version_mismatch.unwrap();
    assert!(mismatch.advertised.is_none());
    assert!(!mismatch.compatible);
}

// ============================================================================
// Status Classification
// ============================================================================

#[tokio::test]
async fn test_not_found_carries_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/apps/missing/"))
        .respond_with(controller_response(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let error = client
        .request(HttpMethod::Get, "/v2/apps/missing/", None)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.status(), Some(404));
    assert_eq!(error.detail(), Some("Not found."));
    assert!(error.is_fatal());
}

#[tokio::test]
async fn test_error_status_wins_over_version_mismatch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/apps/"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header(API_VERSION_HEADER, "2.4")
                .set_body_json(json!({"detail": "Invalid token."})),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("stale"));
    let error = client.request(HttpMethod::Get, "/v2/apps/", None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Unauthorized);
    assert_eq!(error.detail(), Some("Invalid token."));
}

#[tokio::test]
async fn test_server_fault_with_plain_text_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/apps/"))
        .respond_with(controller_response(503).set_body_string("upstream unavailable\n"))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let error = client.request(HttpMethod::Post, "/v2/apps/", None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ServerFault);
    assert_eq!(error.status(), Some(503));
    assert_eq!(error.detail(), Some("upstream unavailable"));
}

#[tokio::test]
async fn test_validation_errors_are_flattened() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/keys/"))
        .respond_with(controller_response(400).set_body_json(json!({
            "id": ["This field is required."],
            "public": ["This field may not be blank."]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let error = client
        .request(HttpMethod::Post, "/v2/keys/", Some(b"{}".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::BadRequest);
    assert_eq!(
        error.detail(),
        Some("id: This field is required.\npublic: This field may not be blank.")
    );
}

#[tokio::test]
async fn test_cancellation_refusal_is_specialized() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v2/auth/cancel/"))
        .respond_with(controller_response(409).set_body_json(json!({
            "detail": "foo still has applications assigned. Delete or transfer ownership"
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let error = client
        .request(
            HttpMethod::Delete,
            "/v2/auth/cancel/",
            Some(br#"{"username":"admin"}"#.to_vec()),
        )
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::CancellationFailed);
    assert_eq!(error.status(), Some(409));
}

#[tokio::test]
async fn test_conflict_elsewhere_stays_generic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/apps/"))
        .respond_with(controller_response(409).set_body_json(json!({
            "detail": "foo still has applications assigned."
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server, Token::new("abc"));
    let error = client.request(HttpMethod::Post, "/v2/apps/", None).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let config = ClientConfig::builder()
        .controller_url(ControllerUrl::new("http://127.0.0.1:1").unwrap())
        .build()
        .unwrap();
    let client = Client::new(config).unwrap();

    let error = assert_err!(client.request(HttpMethod::Get, "/v2/apps/", None).await);

    assert_eq!(error.kind(), ErrorKind::Transport);
    assert!(error.status().is_none());
    assert!(error.is_fatal());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_requests_share_one_client() {
    let server = MockServer::start().await;

    for app in ["one", "two", "three"] {
        Mock::given(method("GET"))
            .and(path(format!("/v2/apps/{app}/")))
            .respond_with(controller_response(200).set_body_json(json!({"id": app})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = create_test_client(&server, Token::new("abc"));
    let (one, two, three) = tokio::join!(
        client.request(HttpMethod::Get, "/v2/apps/one/", None),
        client.request(HttpMethod::Get, "/v2/apps/two/", None),
        client.request(HttpMethod::Get, "/v2/apps/three/", None),
    );

    for (response, expected) in [(one, "one"), (two, "two"), (three, "three")] {
        let value: serde_json::Value = response.unwrap().json().unwrap();
        assert_eq!(value["id"], expected);
    }
}
