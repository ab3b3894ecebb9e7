//! # Identra Redash Connector
//!
//! Lifecycle connector that lets the Identra workflow engine manage user
//! accounts in a Redash deployment through Redash's admin HTTP surface.
//!
//! Redash exposes no transactional account API, only create, enable,
//! disable, invite-resend, delete-pending, and group-membership primitives
//! behind a cookie-session form login. This crate reconciles those
//! primitives into the four uniform executions the workflow engine speaks:
//!
//! - `provision`: create the account, or resolve an existing account's
//!   state (disabled, pending, active) and issue the minimal mutations to
//!   reach the provisioned state ([`account::AccountManager`])
//! - `revoke`: disable the account, falling back to deleting it while
//!   still pending
//! - `show`: single-user lookup
//! - `fetchBatch`: lazy paged iteration over the directory
//!   ([`batch::BatchIterator`])
//!
//! ## Example
//!
//! ```ignore
//! use identra_connector::prelude::*;
//! use identra_connector_redash::connector_from_registry;
//!
//! let connector = connector_from_registry(&registry_entry)?;
//! connector.test_connection().await?;
//!
//! let context = MutatingContext {
//!     user: AccountRequest::new("analyst@example.com")
//!         .with_name("Analyst Example")
//!         .with_group(7, "analysts"),
//! };
//! let user = connector.provision(&context).await?;
//! ```

pub mod account;
pub mod auth;
pub mod batch;
pub mod client;
pub mod config;
pub mod connector;
pub mod models;

pub use account::AccountManager;
pub use auth::Credentials;
pub use batch::{BatchIterator, UserPageFetcher};
pub use client::RedashClient;
pub use config::{credentials_registry_schema, RedashConfig};
pub use connector::{RedashConnector, METADATA};
pub use models::{RedashGroup, RedashUser};

use identra_connector::error::{ConnectorError, ConnectorResult};

/// Build a [`RedashConnector`] from a workflow engine registry entry.
///
/// The entry must match [`credentials_registry_schema`]; this is the single
/// shared construction path for engine-driven deployments.
pub fn connector_from_registry(registry: &serde_json::Value) -> ConnectorResult<RedashConnector> {
    let config: RedashConfig = serde_json::from_value(registry.clone())
        .map_err(|e| ConnectorError::invalid_config(format!("invalid registry entry: {e}")))?;
    RedashConnector::new(&config)
}
