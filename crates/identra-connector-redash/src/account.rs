//! Account reconciliation
//!
//! Redash has no atomic "upsert" or "ensure-active" operation, only create,
//! enable, disable, invite-resend, delete-pending, and add-group. The
//! [`AccountManager`] drives those primitives until the remote account
//! matches the requested target state.
//!
//! Reconciliation is strictly sequential: each step's outcome gates the
//! next. Concurrent calls targeting the same email are not synchronized;
//! that race is an accepted limitation of the upstream API.

use tracing::{debug, info, warn};

use identra_connector::error::{ConnectorError, ConnectorResult};
use identra_connector::types::{
    AccountRequest, GroupRef, PageResult, QueryOptions, ReadContext, UserStatus,
};

use crate::client::RedashClient;
use crate::config::RedashConfig;
use crate::models::RedashUser;

/// Reconciles Redash accounts toward a requested lifecycle state.
#[derive(Debug)]
pub struct AccountManager {
    client: RedashClient,
    excluded_groups: Vec<String>,
}

impl AccountManager {
    /// Create a manager from a validated configuration.
    pub fn new(config: &RedashConfig) -> ConnectorResult<Self> {
        Ok(Self {
            client: RedashClient::new(config)?,
            excluded_groups: config.excluded_groups.clone(),
        })
    }

    /// The underlying directory client.
    pub fn client(&self) -> &RedashClient {
        &self.client
    }

    /// Drive the account for `request.email` to an existing/active state.
    ///
    /// Fresh emails are created (and given the requested group). A taken
    /// email starts reconciliation by status with strict precedence
    /// disabled > pending > active: re-enabling is destructive to skip if
    /// missed, and is cheaper to check than full group reconciliation.
    pub async fn provision_user(&self, request: &AccountRequest) -> ConnectorResult<RedashUser> {
        // Without a name the account cannot be created, so reconciliation of
        // an existing account is the only possible outcome.
        let Some(name) = request.name.as_deref() else {
            debug!(email = %request.email, "no name in request, reconciling existing account");
            return match self.reconcile_existing(request).await {
                Err(ConnectorError::Unreconciled { .. }) => Err(ConnectorError::invalid_context(
                    "user.name is required to create a new account",
                )),
                other => other,
            };
        };

        match self.client.create_user(&request.email, name).await {
            Ok(user) => {
                info!(email = %request.email, user_id = user.id, "created Redash user");
                match &request.group {
                    Some(group) => self.add_membership(user, group).await,
                    None => Ok(user),
                }
            }
            Err(ConnectorError::EmailTaken { .. }) => {
                info!(email = %request.email, "email already taken, reconciling account state");
                self.reconcile_existing(request).await
            }
            Err(err) => Err(err),
        }
    }

    /// Resolve the actual state of an existing account and issue the
    /// minimal mutations needed to reach the provisioned state.
    async fn reconcile_existing(&self, request: &AccountRequest) -> ConnectorResult<RedashUser> {
        let email = request.email.as_str();

        if let Some(disabled) = self.first_with_status(email, UserStatus::Disabled).await? {
            let enabled = self.client.enable_user(email).await?;
            info!(email, user_id = enabled.id, "re-enabled disabled Redash user");
            if disabled.is_invitation_pending {
                return self.client.resend_invitation(email).await;
            }
            return Ok(enabled);
        }

        if let Some(pending) = self.first_with_status(email, UserStatus::Pending).await? {
            info!(email, user_id = pending.id, "account pending, resending invitation");
            return self.client.resend_invitation(email).await;
        }

        if let Some(active) = self.first_with_status(email, UserStatus::Active).await? {
            let Some(group) = &request.group else {
                debug!(email, user_id = active.id, "account already active");
                return Ok(active);
            };
            if active.is_member_of(group) {
                return Err(ConnectorError::AlreadyInGroup {
                    email: email.to_string(),
                    group: group.name.clone(),
                });
            }
            return self.add_membership(active, group).await;
        }

        // Creation said "taken", yet the account matches no status. Surface
        // the inconsistency instead of returning an empty success.
        warn!(email, "account reported as taken but not found in any status");
        Err(ConnectorError::Unreconciled {
            email: email.to_string(),
        })
    }

    /// Add the group membership and reflect it on the returned record.
    async fn add_membership(
        &self,
        mut user: RedashUser,
        group: &GroupRef,
    ) -> ConnectorResult<RedashUser> {
        self.client.add_user_to_group(user.id, group.id).await?;
        info!(email = %user.email, user_id = user.id, group = %group.name, "added Redash group membership");
        if !user.is_member_of(group) {
            user.groups.push(group.clone().into());
        }
        Ok(user)
    }

    /// Drive the account for `email` to its terminal revoked state.
    ///
    /// Disable the active account; if there is none, fall back to deleting
    /// it while still pending; if there is nothing pending either, report
    /// the disabled record that already exists. `None` means the account is
    /// absent upstream, which is its terminal revoked form. Idempotent by
    /// construction: only the status-qualified not-found errors of the two
    /// fallback steps are swallowed, everything else propagates.
    pub async fn revoke_user(&self, email: &str) -> ConnectorResult<Option<RedashUser>> {
        match self.client.disable_user(email).await {
            Ok(user) => {
                info!(email, user_id = user.id, "disabled Redash user");
                Ok(Some(user))
            }
            Err(ConnectorError::UserNotFound {
                status: UserStatus::Active,
                ..
            }) => {
                debug!(email, "no active user to disable, trying pending delete");
                match self.client.delete_pending_user(email).await {
                    Ok(user) => {
                        info!(email, user_id = user.id, "deleted pending Redash user");
                        Ok(Some(user))
                    }
                    Err(ConnectorError::UserNotFound {
                        status: UserStatus::Pending,
                        ..
                    }) => {
                        debug!(email, "nothing pending either, reporting terminal state");
                        self.first_with_status(email, UserStatus::Disabled).await
                    }
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    /// One page of users matching the read context. Pure read, single round
    /// trip; status defaults to active, paging to page 1 / 20 per page
    /// ordered by creation time.
    pub async fn show_users(&self, context: &ReadContext) -> ConnectorResult<PageResult<RedashUser>> {
        let email = context.user.as_ref().and_then(|u| u.email.as_deref());
        let status = context.status.unwrap_or_default();
        let options = context.query_options.clone().unwrap_or_default();
        options.validate()?;

        let listing = self.client.list_users(email, status, &options).await?;
        Ok(listing.into())
    }

    /// Names of groups a workflow may assign, with the configured
    /// exclusions (admin/service/deprecated groups) filtered out.
    pub async fn available_groups(&self) -> ConnectorResult<Vec<String>> {
        let groups = self.client.list_groups().await?;
        Ok(groups
            .into_iter()
            .map(|g| g.name)
            .filter(|name| !self.excluded_groups.contains(name))
            .collect())
    }

    async fn first_with_status(
        &self,
        email: &str,
        status: UserStatus,
    ) -> ConnectorResult<Option<RedashUser>> {
        let listing = self
            .client
            .list_users(Some(email), status, &QueryOptions::default())
            .await?;
        Ok(listing.results.into_iter().next())
    }
}
