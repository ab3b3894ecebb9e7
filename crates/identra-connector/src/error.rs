//! Connector error types
//!
//! Error definitions with transient/permanent classification. The connector
//! itself never retries; the classification exists so the calling workflow
//! engine can decide.

use thiserror::Error;

use crate::types::UserStatus;

/// Error that can occur during connector operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Credentials were rejected by the target system. Fatal, never retried.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The target system answered with a non-success HTTP status.
    #[error("upstream error: {message}")]
    Upstream { status: Option<u16>, message: String },

    /// Transport-level failure before a response was obtained.
    #[error("network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Account creation was rejected because the email is already in use.
    ///
    /// This is the tagged form of the target system's "email taken" response;
    /// the reconciler consumes it to start the status search.
    #[error("email already taken: {email}")]
    EmailTaken { email: String },

    /// The user is already a member of the requested group.
    ///
    /// Deterministic conflict: callers should treat it as a no-op/conflict,
    /// not a system error.
    #[error("user {email} is already a member of group '{group}'")]
    AlreadyInGroup { email: String, group: String },

    /// Creation failed as "taken" but no matching user was found in any
    /// status. Internal invariant violation, surfaced loudly.
    #[error("user {email} reported as taken upstream but not found in any status")]
    Unreconciled { email: String },

    /// No user with the required status matched the email.
    #[error("no {status} user found for {email}")]
    UserNotFound { email: String, status: UserStatus },

    /// Connector configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Workflow context violates an invariant the connector enforces itself.
    #[error("invalid context: {message}")]
    InvalidContext { message: String },

    /// A response body could not be decoded.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl ConnectorError {
    /// Check if this error is transient and the operation may be retried
    /// by the caller.
    pub fn is_transient(&self) -> bool {
        match self {
            ConnectorError::NetworkError { .. } => true,
            ConnectorError::Upstream { status, .. } => status.map_or(true, |s| s >= 500),
            _ => false,
        }
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::AuthenticationFailed { .. } => "AUTH_FAILED",
            ConnectorError::Upstream { .. } => "UPSTREAM_ERROR",
            ConnectorError::NetworkError { .. } => "NETWORK_ERROR",
            ConnectorError::EmailTaken { .. } => "EMAIL_TAKEN",
            ConnectorError::AlreadyInGroup { .. } => "ALREADY_IN_GROUP",
            ConnectorError::Unreconciled { .. } => "UNRECONCILED",
            ConnectorError::UserNotFound { .. } => "USER_NOT_FOUND",
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ConnectorError::InvalidContext { .. } => "INVALID_CONTEXT",
            ConnectorError::Serialization { .. } => "SERIALIZATION_ERROR",
        }
    }

    // Convenience constructors

    /// Create an authentication failure.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        ConnectorError::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Create an upstream error from an HTTP status and message.
    pub fn upstream(status: impl Into<Option<u16>>, message: impl Into<String>) -> Self {
        ConnectorError::Upstream {
            status: status.into(),
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        ConnectorError::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an invalid context error.
    pub fn invalid_context(message: impl Into<String>) -> Self {
        ConnectorError::InvalidContext {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        ConnectorError::Serialization {
            message: message.into(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
