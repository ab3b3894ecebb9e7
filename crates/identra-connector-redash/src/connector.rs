//! Redash connector facade
//!
//! Implements the Identra connector traits on top of the account
//! reconciler. This is the only type the workflow engine sees.

use std::sync::Arc;

use async_trait::async_trait;

use identra_connector::error::ConnectorResult;
use identra_connector::metadata::{Execution, ModuleMetadata};
use identra_connector::schema::{mutating_context_schema, read_context_schema};
use identra_connector::traits::{AccountLifecycle, Connector};
use identra_connector::types::{MutatingContext, PageResult, QueryOptions, ReadContext};

use crate::account::AccountManager;
use crate::batch::{BatchIterator, UserPageFetcher};
use crate::config::{credentials_registry_schema, RedashConfig};
use crate::models::RedashUser;

/// Module descriptor published to the workflow engine.
pub const METADATA: ModuleMetadata = ModuleMetadata {
    engine: "identra-redash",
    name: "Identra Redash Connector",
    version: env!("CARGO_PKG_VERSION"),
    supported_execution: &[
        Execution::Provision,
        Execution::Revoke,
        Execution::Show,
        Execution::FetchBatch,
    ],
};

/// Lifecycle connector for Redash user administration.
pub struct RedashConnector {
    manager: Arc<AccountManager>,
}

impl RedashConnector {
    /// Create a connector from a validated configuration.
    pub fn new(config: &RedashConfig) -> ConnectorResult<Self> {
        Ok(Self {
            manager: Arc::new(AccountManager::new(config)?),
        })
    }

    /// The account reconciler backing this connector.
    pub fn account_manager(&self) -> &AccountManager {
        &self.manager
    }

    /// Group names a workflow may assign on this deployment.
    pub async fn available_groups(&self) -> ConnectorResult<Vec<String>> {
        self.manager.available_groups().await
    }
}

impl std::fmt::Debug for RedashConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedashConnector")
            .field("engine", &METADATA.engine)
            .field("base_url", &self.manager.client().base_url())
            .finish()
    }
}

#[async_trait]
impl Connector for RedashConnector {
    fn metadata(&self) -> &ModuleMetadata {
        &METADATA
    }

    fn registry_format(&self) -> serde_json::Value {
        credentials_registry_schema()
    }

    fn read_context_format(&self) -> serde_json::Value {
        read_context_schema()
    }

    fn write_context_format(&self) -> serde_json::Value {
        mutating_context_schema()
    }

    async fn test_connection(&self) -> ConnectorResult<()> {
        self.manager.client().ensure_session().await
    }
}

#[async_trait]
impl AccountLifecycle for RedashConnector {
    type Record = RedashUser;
    type Batch = BatchIterator;

    async fn provision(&self, context: &MutatingContext) -> ConnectorResult<RedashUser> {
        self.manager.provision_user(&context.user).await
    }

    async fn revoke(&self, context: &MutatingContext) -> ConnectorResult<Option<RedashUser>> {
        self.manager.revoke_user(&context.user.email).await
    }

    async fn show(&self, context: &ReadContext) -> ConnectorResult<Option<RedashUser>> {
        let page = self.manager.show_users(context).await?;
        Ok(page.results.into_iter().next())
    }

    async fn fetch_batch(&self, context: &ReadContext) -> ConnectorResult<BatchIterator> {
        let order = context
            .query_options
            .as_ref()
            .map(|o| o.order.clone())
            .unwrap_or_else(|| QueryOptions::default().order);
        let page = self.manager.show_users(context).await?;

        Ok(BatchIterator::new(
            Arc::new(ManagerPageFetcher(Arc::clone(&self.manager))),
            page,
            order,
        ))
    }
}

/// Page fetcher handed to batch iterators.
///
/// Subsequent pages carry only the paging options: the email filter and
/// status of the originating context are not replayed, matching the
/// workflow engine's batch contract (a batch walk is a directory sweep, not
/// a filtered query).
struct ManagerPageFetcher(Arc<AccountManager>);

#[async_trait]
impl UserPageFetcher for ManagerPageFetcher {
    async fn fetch_users_page(
        &self,
        options: QueryOptions,
    ) -> ConnectorResult<PageResult<RedashUser>> {
        let context = ReadContext {
            user: None,
            status: None,
            query_options: Some(options),
        };
        self.0.show_users(&context).await
    }
}
