//! Session handling and upstream error mapping.

mod helpers;

use helpers::mock_redash::{empty_list, list_of, user_json, MockRedash, LOGIN_OK_HTML};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use identra_connector::error::ConnectorError;
use identra_connector::prelude::*;
use identra_connector_redash::RedashClient;

#[tokio::test]
async fn login_posts_form_credentials() {
    let redash = MockRedash::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("email=admin%40example.com"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_OK_HTML))
        .expect(1)
        .mount(&redash.server)
        .await;

    let connector = redash.connector();
    connector.test_connection().await.unwrap();
}

#[tokio::test]
async fn session_is_established_once_and_reused() {
    let redash = MockRedash::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_OK_HTML))
        .expect(1)
        .mount(&redash.server)
        .await;

    redash.mock_list("active", empty_list()).await;

    let connector = redash.connector();
    connector.test_connection().await.unwrap();
    // Two more reads on the same instance must not log in again.
    let context = ReadContext::for_email("a@x.com");
    connector.show(&context).await.unwrap();
    connector.show(&context).await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_map_to_auth_error() {
    let redash = MockRedash::start().await;
    redash.mock_login_rejected().await;

    let connector = redash.connector();
    let err = connector.test_connection().await.unwrap_err();

    assert!(matches!(err, ConnectorError::AuthenticationFailed { .. }));
    assert!(err.is_permanent());
}

#[tokio::test]
async fn unrecognized_login_page_maps_to_upstream_error() {
    let redash = MockRedash::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>502 Bad Gateway</title></head></html>",
        ))
        .mount(&redash.server)
        .await;

    let connector = redash.connector();
    let err = connector.test_connection().await.unwrap_err();

    assert!(matches!(err, ConnectorError::Upstream { .. }));
}

#[tokio::test]
async fn login_http_failure_maps_to_upstream_error() {
    let redash = MockRedash::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&redash.server)
        .await;

    let connector = redash.connector();
    let err = connector.test_connection().await.unwrap_err();

    assert!(matches!(err, ConnectorError::Upstream { status: Some(503), .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn expired_session_maps_to_auth_error() {
    let redash = MockRedash::start().await;
    redash.mock_login_success().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })),
        )
        .mount(&redash.server)
        .await;

    let connector = redash.connector();
    let err = connector
        .show(&ReadContext::for_email("a@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn server_error_surfaces_with_upstream_message() {
    let redash = MockRedash::start().await;
    redash.mock_login_success().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "database on fire" })),
        )
        .mount(&redash.server)
        .await;

    let connector = redash.connector();
    let err = connector
        .show(&ReadContext::for_email("a@x.com"))
        .await
        .unwrap_err();

    match err {
        ConnectorError::Upstream { status, message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "database on fire");
        }
        other => panic!("expected Upstream, got: {other:?}"),
    }
}

#[tokio::test]
async fn create_user_maps_taken_email_to_tagged_kind() {
    let redash = MockRedash::start().await;
    redash.mock_login_success().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Email already taken" })),
        )
        .mount(&redash.server)
        .await;

    let client = RedashClient::new(&redash.config()).unwrap();
    let err = client.create_user("a@x.com", "Test User").await.unwrap_err();

    assert!(matches!(err, ConnectorError::EmailTaken { .. }));
    assert_eq!(err.error_code(), "EMAIL_TAKEN");
}

#[tokio::test]
async fn create_user_other_validation_errors_stay_upstream() {
    let redash = MockRedash::start().await;
    redash.mock_login_success().await;

    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Missing required parameter: name" })),
        )
        .mount(&redash.server)
        .await;

    let client = RedashClient::new(&redash.config()).unwrap();
    let err = client.create_user("a@x.com", "").await.unwrap_err();

    assert!(matches!(err, ConnectorError::Upstream { status: Some(400), .. }));
}

#[tokio::test]
async fn status_filters_use_redash_query_parameters() {
    let redash = MockRedash::start().await;
    redash.mock_login_success().await;

    // Each status maps to its own query parameter pair.
    redash
        .mock_list("active", list_of(&[user_json(1, "a@x.com")]))
        .await;
    redash
        .mock_list("disabled", list_of(&[user_json(2, "b@x.com")]))
        .await;
    redash
        .mock_list("pending", list_of(&[user_json(3, "c@x.com")]))
        .await;

    let client = RedashClient::new(&redash.config()).unwrap();
    let options = QueryOptions::default();

    let active = client.list_users(None, UserStatus::Active, &options).await.unwrap();
    assert_eq!(active.results[0].id, 1);

    let disabled = client.list_users(None, UserStatus::Disabled, &options).await.unwrap();
    assert_eq!(disabled.results[0].id, 2);

    let pending = client.list_users(None, UserStatus::Pending, &options).await.unwrap();
    assert_eq!(pending.results[0].id, 3);
}

#[tokio::test]
async fn malformed_response_body_maps_to_serialization_error() {
    let redash = MockRedash::start().await;
    redash.mock_login_success().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error page</html>"))
        .mount(&redash.server)
        .await;

    let client = RedashClient::new(&redash.config()).unwrap();
    let err = client
        .list_users(None, UserStatus::Active, &QueryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::Serialization { .. }));
}
