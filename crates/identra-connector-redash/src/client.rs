//! Redash HTTP client (reqwest-based)
//!
//! Raw user CRUD/list calls against the Redash admin API. The session is
//! established lazily on first use and reused for the lifetime of the
//! client; all upstream error wording is mapped to tagged
//! [`ConnectorError`] kinds at this boundary so the reconciler never
//! matches on strings.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use tracing::debug;

use identra_connector::error::{ConnectorError, ConnectorResult};
use identra_connector::types::{QueryOptions, UserStatus};

use crate::auth::{classify_login_page, Credentials};
use crate::config::RedashConfig;
use crate::models::{ApiErrorBody, RedashGroup, RedashUser, UserListResponse};

/// Message Redash returns when creating a user with an email already in use.
const EMAIL_TAKEN_MESSAGE: &str = "Email already taken";

/// Authenticated client for the Redash user-administration endpoints.
#[derive(Debug)]
pub struct RedashClient {
    base_url: String,
    credentials: Credentials,
    http: Client,
    /// Single-flight guard for the lazy form login.
    session: OnceCell<()>,
}

impl RedashClient {
    /// Create a new client from a validated configuration.
    pub fn new(config: &RedashConfig) -> ConnectorResult<Self> {
        config.validate()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
            http: build_http_client(config)?,
            session: OnceCell::new(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Session ───────────────────────────────────────────────────────

    /// Establish the session if this instance has not logged in yet.
    ///
    /// Concurrent first calls collapse into one login request; a failed
    /// login leaves the cell empty so a later call can try again.
    pub async fn ensure_session(&self) -> ConnectorResult<()> {
        self.session.get_or_try_init(|| self.login()).await?;
        Ok(())
    }

    /// Simulate the browser form login (`POST /login`).
    ///
    /// Redash answers `200 OK` for both outcomes; the page title is the only
    /// discriminator (see [`crate::auth`]). The session cookie lands in the
    /// client's cookie jar.
    async fn login(&self) -> ConnectorResult<()> {
        let url = format!("{}/login", self.base_url);
        debug!(email = %self.credentials.email, "logging in to Redash");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("email", self.credentials.email.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("login request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ConnectorError::network_with_source("failed to read login response", e))?;

        if !status.is_success() {
            return Err(ConnectorError::upstream(
                Some(status.as_u16()),
                format!("login returned HTTP {status}"),
            ));
        }

        classify_login_page(&body)
    }

    // ── User Operations ───────────────────────────────────────────────

    /// Retrieve one page of users filtered by email and status
    /// (`GET /api/users`).
    pub async fn list_users(
        &self,
        email: Option<&str>,
        status: UserStatus,
        options: &QueryOptions,
    ) -> ConnectorResult<UserListResponse> {
        self.ensure_session().await?;

        let url = format!("{}/api/users", self.base_url);
        debug!(%status, email = email.unwrap_or(""), page = options.page, "listing Redash users");

        let mut query: Vec<(&str, String)> = vec![
            ("q", email.unwrap_or("").to_string()),
            ("page", options.page.to_string()),
            ("page_size", options.page_size.to_string()),
            ("order", options.order.clone()),
        ];
        match status {
            UserStatus::Pending => query.push(("pending", "true".to_string())),
            UserStatus::Disabled => query.push(("disabled", "true".to_string())),
            UserStatus::Active => query.push(("pending", "false".to_string())),
        }

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("user listing request failed", e))?;
        self.handle_response(response).await
    }

    /// First user matching the email in the given status, or
    /// [`ConnectorError::UserNotFound`].
    pub async fn find_user(&self, email: &str, status: UserStatus) -> ConnectorResult<RedashUser> {
        let listing = self
            .list_users(Some(email), status, &QueryOptions::default())
            .await?;
        listing
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ConnectorError::UserNotFound {
                email: email.to_string(),
                status,
            })
    }

    /// Create a new user (`POST /api/users`).
    ///
    /// Redash rejects duplicate emails with a 400 and a well-known message;
    /// that case becomes the tagged [`ConnectorError::EmailTaken`].
    pub async fn create_user(&self, email: &str, name: &str) -> ConnectorResult<RedashUser> {
        self.ensure_session().await?;

        let url = format!("{}/api/users", self.base_url);
        debug!(email, "creating Redash user");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "email": email, "name": name }))
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("user creation request failed", e))?;

        if response.status() == StatusCode::BAD_REQUEST {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            if let Ok(api_error) = serde_json::from_str::<ApiErrorBody>(&body) {
                if api_error.message == EMAIL_TAKEN_MESSAGE {
                    return Err(ConnectorError::EmailTaken {
                        email: email.to_string(),
                    });
                }
                return Err(ConnectorError::upstream(Some(400), api_error.message));
            }
            return Err(ConnectorError::upstream(Some(400), body));
        }

        self.handle_response(response).await
    }

    /// Re-enable a disabled user (`DELETE /api/users/:id/disable`).
    pub async fn enable_user(&self, email: &str) -> ConnectorResult<RedashUser> {
        let user = self.find_user(email, UserStatus::Disabled).await?;
        let url = format!("{}/api/users/{}/disable", self.base_url, user.id);
        debug!(email, user_id = user.id, "enabling Redash user");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("enable request failed", e))?;
        self.handle_response(response).await
    }

    /// Disable an active user (`POST /api/users/:id/disable`).
    pub async fn disable_user(&self, email: &str) -> ConnectorResult<RedashUser> {
        let user = self.find_user(email, UserStatus::Active).await?;
        let url = format!("{}/api/users/{}/disable", self.base_url, user.id);
        debug!(email, user_id = user.id, "disabling Redash user");

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("disable request failed", e))?;
        self.handle_response(response).await
    }

    /// Resend the invitation of a pending user (`POST /api/users/:id/invite`).
    pub async fn resend_invitation(&self, email: &str) -> ConnectorResult<RedashUser> {
        let user = self.find_user(email, UserStatus::Pending).await?;
        let url = format!("{}/api/users/{}/invite", self.base_url, user.id);
        debug!(email, user_id = user.id, "resending Redash invitation");

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("invitation request failed", e))?;
        self.handle_response(response).await
    }

    /// Hard-delete a user that is still pending (`DELETE /api/users/:id`).
    ///
    /// Only pending users are deletable in Redash; active/disabled users are
    /// not.
    pub async fn delete_pending_user(&self, email: &str) -> ConnectorResult<RedashUser> {
        let user = self.find_user(email, UserStatus::Pending).await?;
        let url = format!("{}/api/users/{}", self.base_url, user.id);
        debug!(email, user_id = user.id, "deleting pending Redash user");

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("delete request failed", e))?;
        self.handle_response(response).await
    }

    // ── Group Operations ──────────────────────────────────────────────

    /// Add a user to a group (`POST /api/groups/:id/members`).
    pub async fn add_user_to_group(&self, user_id: i64, group_id: i64) -> ConnectorResult<()> {
        self.ensure_session().await?;

        let url = format!("{}/api/groups/{group_id}/members", self.base_url);
        debug!(user_id, group_id, "adding Redash user to group");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "user_id": user_id }))
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("group membership request failed", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            self.handle_error_response(response).await
        }
    }

    /// List all groups (`GET /api/groups`).
    pub async fn list_groups(&self) -> ConnectorResult<Vec<RedashGroup>> {
        self.ensure_session().await?;

        let url = format!("{}/api/groups", self.base_url);
        debug!("listing Redash groups");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ConnectorError::network_with_source("group listing request failed", e))?;
        self.handle_response(response).await
    }

    // ── Response Handling ─────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ConnectorResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| {
                ConnectorError::network_with_source("failed to read response body", e)
            })?;
            serde_json::from_str(&body).map_err(|e| {
                ConnectorError::serialization(format!("failed to parse Redash response: {e}"))
            })
        } else {
            self.handle_error_response(response).await
        }
    }

    async fn handle_error_response<T>(&self, response: Response) -> ConnectorResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);

        if status == StatusCode::UNAUTHORIZED {
            return Err(ConnectorError::auth_failed(format!(
                "Redash session rejected (HTTP 401): {message}"
            )));
        }

        Err(ConnectorError::upstream(Some(status.as_u16()), message))
    }
}

/// Build the HTTP client: cookie jar for the session, timeouts, and the
/// optional CA bundle / client identity from the TLS configuration.
fn build_http_client(config: &RedashConfig) -> ConnectorResult<Client> {
    let mut builder = Client::builder()
        .cookie_store(true)
        .connect_timeout(config.connection.connection_timeout())
        .timeout(config.connection.read_timeout());

    if !config.tls.verify_certificate {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(path) = &config.tls.ca_cert_path {
        let pem = std::fs::read(path).map_err(|e| {
            ConnectorError::invalid_config(format!("failed to read CA certificate {path}: {e}"))
        })?;
        let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
            ConnectorError::invalid_config(format!("invalid CA certificate {path}: {e}"))
        })?;
        builder = builder.add_root_certificate(cert);
    }

    if let (Some(cert_path), Some(key_path)) =
        (&config.tls.client_cert_path, &config.tls.client_key_path)
    {
        let mut pem = std::fs::read(cert_path).map_err(|e| {
            ConnectorError::invalid_config(format!(
                "failed to read client certificate {cert_path}: {e}"
            ))
        })?;
        let key = std::fs::read(key_path).map_err(|e| {
            ConnectorError::invalid_config(format!("failed to read client key {key_path}: {e}"))
        })?;
        pem.push(b'\n');
        pem.extend_from_slice(&key);

        let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
            ConnectorError::invalid_config(format!("invalid client certificate/key pair: {e}"))
        })?;
        builder = builder.identity(identity);
    }

    builder
        .build()
        .map_err(|e| ConnectorError::invalid_config(format!("failed to build HTTP client: {e}")))
}
