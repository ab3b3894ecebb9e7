//! Redash wire models
//!
//! Response shapes of the Redash user-administration API. Fields the
//! connector does not act on are kept as tolerant passthrough so records can
//! be handed back to the workflow engine unmodified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use identra_connector::types::{GroupRef, PageResult};

/// A Redash group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedashGroup {
    pub id: i64,
    pub name: String,
}

impl From<GroupRef> for RedashGroup {
    fn from(group: GroupRef) -> Self {
        Self {
            id: group.id,
            name: group.name,
        }
    }
}

/// A Redash user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedashUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_invitation_pending: bool,
    #[serde(default)]
    pub groups: Vec<RedashGroup>,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_at: Option<DateTime<Utc>>,
}

impl RedashUser {
    /// Whether the user is already a member of the given group.
    pub fn is_member_of(&self, group: &GroupRef) -> bool {
        self.groups.iter().any(|g| g.id == group.id)
    }
}

/// One page of `GET /api/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserListResponse {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    #[serde(default)]
    pub results: Vec<RedashUser>,
}

impl From<UserListResponse> for PageResult<RedashUser> {
    fn from(response: UserListResponse) -> Self {
        PageResult {
            results: response.results,
            page: response.page,
            page_size: response.page_size,
            count: response.count,
        }
    }
}

/// Error body Redash returns for rejected API calls.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}
