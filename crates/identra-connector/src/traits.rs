//! Connector traits
//!
//! Capability-based trait definitions for lifecycle connectors. The workflow
//! engine only ever talks to these traits; the target system's REST/HTML
//! quirks stay behind them.

use async_trait::async_trait;

use crate::error::ConnectorResult;
use crate::metadata::ModuleMetadata;
use crate::types::{MutatingContext, ReadContext};

/// Base trait for all connectors.
///
/// Provides the module descriptor and the context schemas the workflow
/// engine validates incoming contexts against before dispatching.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Get the module descriptor for this connector.
    fn metadata(&self) -> &ModuleMetadata;

    /// Stable engine identifier.
    fn engine(&self) -> &'static str {
        self.metadata().engine
    }

    /// JSON Schema for the credentials registry entry this connector is
    /// configured from.
    fn registry_format(&self) -> serde_json::Value;

    /// JSON Schema for read-only workflow contexts (show, fetchBatch).
    fn read_context_format(&self) -> serde_json::Value;

    /// JSON Schema for mutating workflow contexts (provision, revoke).
    fn write_context_format(&self) -> serde_json::Value;

    /// Test connectivity and credentials against the target system.
    async fn test_connection(&self) -> ConnectorResult<()>;
}

/// Capability for managing user account lifecycles in a target system.
///
/// `Record` is the target system's user representation; `Batch` is a lazy
/// paged sequence over records (see the connector crate's batch iterator).
#[async_trait]
pub trait AccountLifecycle: Connector {
    type Record: Send;
    type Batch: Send;

    /// Drive the target user to an existing/active state.
    ///
    /// Idempotent with respect to prior provisioning: an account that
    /// already exists is reconciled (re-enabled, re-invited, or given the
    /// requested group membership) rather than recreated.
    async fn provision(&self, context: &MutatingContext) -> ConnectorResult<Self::Record>;

    /// Drive the target user to its terminal revoked state.
    ///
    /// Idempotent: revoking an already-revoked account is not an error.
    /// `None` means the account is absent upstream, which is treated as the
    /// terminal revoked form.
    async fn revoke(&self, context: &MutatingContext) -> ConnectorResult<Option<Self::Record>>;

    /// Look up a single user; `None` when nothing matches.
    async fn show(&self, context: &ReadContext) -> ConnectorResult<Option<Self::Record>>;

    /// Fetch a page of users wrapped in a lazy batch sequence.
    async fn fetch_batch(&self, context: &ReadContext) -> ConnectorResult<Self::Batch>;
}
