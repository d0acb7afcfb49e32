//! Storage seam for the organization workflows.

use async_trait::async_trait;
use thiserror::Error;

use super::models::{OrganizationSummary, OrganizationWithMembers};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn other(message: impl Into<String>) -> Self {
        StoreError::Other(message.into())
    }
}

/// Persistence operations the organization service relies on.
///
/// Each call is its own unit of work. Nothing here groups several calls into
/// one transaction.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Load a team flagged `isOrganization` together with its memberships and
    /// their users, ordered by membership id. Teams that exist but are not
    /// flagged come back as `None`.
    async fn find_organization_with_members(
        &self,
        org_id: i32,
    ) -> Result<Option<OrganizationWithMembers>, StoreError>;

    async fn list_organizations(&self) -> Result<Vec<OrganizationSummary>, StoreError>;

    async fn update_username(&self, user_id: i32, username: &str) -> Result<(), StoreError>;

    /// Delete a team row. Memberships go with it.
    async fn delete_team(&self, team_id: i32) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
