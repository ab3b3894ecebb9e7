//! # Identra Connector SPI
//!
//! Core abstractions for connecting the Identra workflow engine to managed
//! target systems.
//!
//! A connector adapts one target system's user-administration surface to a
//! small uniform lifecycle contract (provision, revoke, show, fetchBatch) so
//! the workflow engine can manage accounts without knowing the target's API
//! quirks.
//!
//! ## Architecture
//!
//! - [`Connector`] - base trait: module metadata, context schemas, and a
//!   connection probe
//! - [`AccountLifecycle`] - the four lifecycle executions
//! - [`ConnectorError`] - tagged error taxonomy with transient/permanent
//!   classification (retry policy belongs to the workflow engine)
//! - [`types`] - workflow contexts and paging types
//! - [`schema`] - JSON Schema descriptors for context validation
//! - [`metadata`] - module descriptor published to the workflow engine
//!
//! ## Example
//!
//! ```ignore
//! use identra_connector::prelude::*;
//!
//! let context = MutatingContext {
//!     user: AccountRequest::new("user@example.com")
//!         .with_name("User Example")
//!         .with_group(7, "analysts"),
//! };
//! let record = connector.provision(&context).await?;
//! ```

pub mod error;
pub mod metadata;
pub mod schema;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```
/// use identra_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ConnectorError, ConnectorResult};
    pub use crate::metadata::{Execution, ModuleMetadata};
    pub use crate::traits::{AccountLifecycle, Connector};
    pub use crate::types::{
        AccountRequest, GroupRef, MutatingContext, PageResult, QueryOptions, ReadContext,
        UserFilter, UserStatus,
    };
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        // Verify the prelude types are accessible.
        let _status = UserStatus::Active;
        let _options = QueryOptions::default();
        let request = AccountRequest::new("test@example.com").with_group(1, "default");
        assert_eq!(request.group.as_ref().map(|g| g.id), Some(1));
        let _err: ConnectorError = ConnectorError::invalid_context("test");
    }
}
