//! Mock Redash server using wiremock for integration testing.
//!
//! Provides a thin wrapper around [`MockServer`] with the Redash login
//! pages and JSON body builders the scenario tests share.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use identra_connector_redash::{Credentials, RedashConfig, RedashConnector};

/// Page Redash renders after a successful form login.
pub const LOGIN_OK_HTML: &str =
    "<html><head><title>Redash</title></head><body><div id=\"app\"></div></body></html>";

/// Login form rendered again after rejected credentials.
pub const LOGIN_REJECTED_HTML: &str =
    "<html><head><title>Login to Redash</title></head><body><form></form></body></html>";

/// A wiremock server posing as a Redash deployment.
pub struct MockRedash {
    pub server: MockServer,
}

impl MockRedash {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Config pointing at this server.
    pub fn config(&self) -> RedashConfig {
        RedashConfig::new(
            self.uri(),
            Credentials::new("admin@example.com", "secret"),
        )
    }

    /// Connector pointing at this server.
    pub fn connector(&self) -> RedashConnector {
        RedashConnector::new(&self.config()).expect("valid mock config")
    }

    /// Connector with an `excluded_groups` configuration.
    pub fn connector_with_excluded(&self, excluded: &[&str]) -> RedashConnector {
        let mut config = self.config();
        config.excluded_groups = excluded.iter().map(|s| s.to_string()).collect();
        RedashConnector::new(&config).expect("valid mock config")
    }

    /// Mount a successful form login.
    pub async fn mock_login_success(&self) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_OK_HTML))
            .mount(&self.server)
            .await;
    }

    /// Mount a rejected form login (bad credentials page).
    pub async fn mock_login_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_REJECTED_HTML))
            .mount(&self.server)
            .await;
    }

    /// Mount a user listing response for the given status filter.
    pub async fn mock_list(&self, status: &str, body: Value) {
        list_mock(status)
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

/// Builder for a `GET /api/users` mock matching the given status filter.
///
/// Returned unmounted so tests can add matchers, `expect()` counts,
/// `up_to_n_times`, or priorities.
pub fn list_mock(status: &str) -> MockBuilder {
    let builder = Mock::given(method("GET")).and(path("/api/users"));
    match status {
        "pending" => builder.and(query_param("pending", "true")),
        "disabled" => builder.and(query_param("disabled", "true")),
        _ => builder.and(query_param("pending", "false")),
    }
}

/// A plausible Redash user record.
pub fn user_json(id: i64, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "name": "Test User",
        "is_disabled": false,
        "is_invitation_pending": false,
        "groups": [{"id": 2, "name": "default"}],
        "is_email_verified": true,
        "auth_type": "password",
        "profile_image_url": "https://www.gravatar.com/avatar/0?s=40&d=identicon",
        "created_at": "2021-08-03T06:54:38.696Z",
        "updated_at": "2021-08-05T03:20:14.712Z",
        "disabled_at": null,
        "active_at": "2021-08-05T03:20:05Z"
    })
}

/// A listing body with explicit paging fields.
pub fn list_body(users: &[Value], page: u32, page_size: u32, count: u64) -> Value {
    json!({
        "count": count,
        "page": page,
        "page_size": page_size,
        "results": users
    })
}

/// A single-page listing of the given users.
pub fn list_of(users: &[Value]) -> Value {
    list_body(users, 1, 20, users.len() as u64)
}

/// An empty listing.
pub fn empty_list() -> Value {
    list_body(&[], 1, 20, 0)
}
