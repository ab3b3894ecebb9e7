//! Redash connector configuration
//!
//! Configuration is deserialized from the workflow engine's credentials
//! registry; [`credentials_registry_schema`] describes the expected shape.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use identra_connector::error::{ConnectorError, ConnectorResult};

use crate::auth::Credentials;

/// Common connection settings for the HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Connection timeout in seconds.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_read_timeout() -> u64 {
    60
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connection_timeout_secs: default_connection_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }
}

impl ConnectionSettings {
    /// Get connection timeout as Duration.
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.connection_timeout_secs)
    }

    /// Get read timeout as Duration.
    pub fn read_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.read_timeout_secs)
    }
}

/// TLS configuration for Redash deployments behind client-certificate auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Whether to verify the server certificate.
    #[serde(default = "default_true")]
    pub verify_certificate: bool,

    /// Path to a CA certificate bundle (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert_path: Option<String>,

    /// Path to the client certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert_path: Option<String>,

    /// Path to the client private key (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key_path: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            verify_certificate: true,
            ca_cert_path: None,
            client_cert_path: None,
            client_key_path: None,
        }
    }
}

impl TlsConfig {
    /// Validate that client cert and key are configured as a pair.
    pub fn validate(&self) -> ConnectorResult<()> {
        match (&self.client_cert_path, &self.client_key_path) {
            (Some(_), None) | (None, Some(_)) => Err(ConnectorError::invalid_config(
                "tls client_cert_path and client_key_path must be configured together",
            )),
            _ => Ok(()),
        }
    }

    /// Whether a client identity is configured.
    pub fn has_client_identity(&self) -> bool {
        self.client_cert_path.is_some() && self.client_key_path.is_some()
    }
}

/// Configuration for the Redash connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedashConfig {
    /// Base URL of the Redash deployment (e.g. "https://redash.example.com").
    pub base_url: String,

    /// Admin credentials used for the form login.
    pub credentials: Credentials,

    /// TLS configuration.
    #[serde(default)]
    pub tls: TlsConfig,

    /// Connection settings (timeouts).
    #[serde(default)]
    pub connection: ConnectionSettings,

    /// Group names hidden from `available_groups` (service accounts,
    /// admin-only groups, deprecated groups).
    #[serde(default)]
    pub excluded_groups: Vec<String>,
}

impl RedashConfig {
    /// Create a config with required fields and defaults otherwise.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            tls: TlsConfig::default(),
            connection: ConnectionSettings::default(),
            excluded_groups: Vec::new(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConnectorResult<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConnectorError::invalid_config(format!("invalid base_url: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConnectorError::invalid_config(format!(
                "unsupported base_url scheme: {}",
                url.scheme()
            )));
        }
        if self.credentials.email.is_empty() {
            return Err(ConnectorError::invalid_config("credentials.email is empty"));
        }
        if self.credentials.password.is_empty() {
            return Err(ConnectorError::invalid_config(
                "credentials.password is empty",
            ));
        }
        self.tls.validate()
    }

    /// Create a redacted copy safe for logging/display.
    pub fn redacted(&self) -> Self {
        Self {
            credentials: self.credentials.redacted(),
            ..self.clone()
        }
    }
}

/// JSON Schema for the credentials registry entry this connector is
/// configured from.
pub fn credentials_registry_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "credentials": {
                "type": "object",
                "properties": {
                    "email": { "type": "string" },
                    "password": { "type": "string" }
                },
                "required": ["email", "password"]
            },
            "tls": {
                "type": "object",
                "properties": {
                    "verify_certificate": { "type": "boolean", "default": true },
                    "ca_cert_path": { "type": "string" },
                    "client_cert_path": { "type": "string" },
                    "client_key_path": { "type": "string" }
                }
            },
            "connection": {
                "type": "object",
                "properties": {
                    "connection_timeout_secs": { "type": "integer", "default": 30 },
                    "read_timeout_secs": { "type": "integer", "default": 60 }
                }
            },
            "base_url": { "type": "string" },
            "excluded_groups": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["credentials", "base_url"]
    })
}
