//! Workflow context and paging types
//!
//! The shapes the workflow engine sends into a connector (provision/revoke
//! requests, read queries) and the paged result type connectors hand back.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};

/// Lifecycle status a directory listing can be filtered by.
///
/// `absent` is a derived reconciliation outcome, not a listing filter, so it
/// is deliberately not representable here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Enabled and able to sign in.
    #[default]
    Active,
    /// Administratively suspended; re-enterable via enable.
    Disabled,
    /// Created but the email invitation has not been accepted; deletable.
    Pending,
}

impl UserStatus {
    /// Get the string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Disabled => "disabled",
            UserStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a group a provisioned user should be made a member of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    #[serde(rename = "group_id")]
    pub id: i64,
    #[serde(rename = "group_name")]
    pub name: String,
}

/// The user portion of a mutating workflow context.
///
/// `email` is the identity key. `name` is required only when the account has
/// to be created; reconciliation of an existing account works without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupRef>,
}

impl AccountRequest {
    /// Create a request for the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            group: None,
        }
    }

    /// Set the display name used on first creation.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the target group membership.
    pub fn with_group(mut self, id: i64, name: impl Into<String>) -> Self {
        self.group = Some(GroupRef {
            id,
            name: name.into(),
        });
        self
    }
}

/// Context for mutating executions (provision, revoke).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutatingContext {
    pub user: AccountRequest,
}

/// The user filter portion of a read-only workflow context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Context for read-only executions (show, fetchBatch).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserFilter>,
    /// Status filter; defaults to `active` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(
        default,
        rename = "queryOptions",
        skip_serializing_if = "Option::is_none"
    )]
    pub query_options: Option<QueryOptions>,
}

impl ReadContext {
    /// Context selecting a single user by email.
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            user: Some(UserFilter {
                email: Some(email.into()),
            }),
            status: None,
            query_options: None,
        }
    }
}

/// Paging options for directory listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_order")]
    pub order: String,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

fn default_order() -> String {
    "created_at".to_string()
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            order: default_order(),
        }
    }
}

impl QueryOptions {
    /// Options for a specific page with defaults otherwise.
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Validate the paging invariants (page ≥ 1, page_size ≥ 1).
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.page < 1 {
            return Err(ConnectorError::invalid_context("page must be >= 1"));
        }
        if self.page_size < 1 {
            return Err(ConnectorError::invalid_context("pageSize must be >= 1"));
        }
        Ok(())
    }
}

/// One page of a directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub results: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    /// Total number of records matching the query, across all pages.
    pub count: u64,
}

impl<T> PageResult<T> {
    /// Total number of pages implied by `count` and `page_size`.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.count.div_ceil(u64::from(self.page_size))
    }

    /// Whether a page exists after this one.
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}
