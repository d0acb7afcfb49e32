use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::database::models::{freed_username, OrganizationSummary, OrganizationWithMembers};
use crate::database::{OrganizationStore, StoreError};
use crate::domains::{DomainError, DomainRegistry};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrganizationInput {
    pub org_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOrganizationOutput {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    /// The id does not name a team, or names a team that is not an organization
    #[error("You are not authorized to delete this organization or it does not exist")]
    NotAuthorizedOrNotFound,

    #[error("Failed to release domain for '{slug}': {source}")]
    DomainRelease {
        slug: String,
        #[source]
        source: DomainError,
    },

    #[error("Failed to free username of user {user_id} after {renamed} rename(s): {source}")]
    UsernameRewrite {
        user_id: i32,
        renamed: usize,
        #[source]
        source: StoreError,
    },

    #[error("Failed to delete team {team_id}: {source}")]
    TeamDelete {
        team_id: i32,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Administrative operations over organizations
#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn OrganizationStore>,
    domains: Arc<dyn DomainRegistry>,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn OrganizationStore>, domains: Arc<dyn DomainRegistry>) -> Self {
        Self { store, domains }
    }

    pub fn store(&self) -> &Arc<dyn OrganizationStore> {
        &self.store
    }

    /// Delete an organization, releasing its domain and freeing member usernames.
    ///
    /// Steps run strictly in order and each one commits on its own:
    /// domain release, one username rewrite per member, team delete.
    /// A failure stops the sequence and nothing already done is undone.
    pub async fn delete_organization(
        &self,
        input: DeleteOrganizationInput,
    ) -> Result<DeleteOrganizationOutput, OrganizationError> {
        let org_id = input.org_id;
        info!("Deleting organization {}", org_id);

        let organization = self
            .store
            .find_organization_with_members(org_id)
            .await?
            .ok_or_else(|| {
                warn!("Organization {} not found or not flagged as organization", org_id);
                OrganizationError::NotAuthorizedOrNotFound
            })?;

        let OrganizationWithMembers { team, members } = organization;

        if let Some(slug) = team.domain_slug() {
            self.domains
                .release(slug)
                .await
                .map_err(|source| {
                    warn!("Domain release for organization {} failed: {}", org_id, source);
                    OrganizationError::DomainRelease {
                        slug: slug.to_string(),
                        source,
                    }
                })?;
        }

        let mut renamed = 0;
        for member in &members {
            let user = &member.user;
            let username = freed_username(user.username.as_deref(), user.id);

            if let Err(source) = self.store.update_username(user.id, &username).await {
                warn!(
                    "Username rewrite for user {} failed in organization {} ({} of {} done)",
                    user.id,
                    org_id,
                    renamed,
                    members.len()
                );
                return Err(OrganizationError::UsernameRewrite {
                    user_id: user.id,
                    renamed,
                    source,
                });
            }
            renamed += 1;
        }

        self.store
            .delete_team(team.id)
            .await
            .map_err(|source| OrganizationError::TeamDelete {
                team_id: team.id,
                source,
            })?;

        info!(
            "Organization {} ('{}') deleted, {} member username(s) freed",
            org_id, team.name, renamed
        );

        Ok(DeleteOrganizationOutput {
            ok: true,
            message: format!("Organization {} deleted.", team.name),
        })
    }

    pub async fn list_organizations(&self) -> Result<Vec<OrganizationSummary>, OrganizationError> {
        Ok(self.store.list_organizations().await?)
    }

    pub async fn get_organization(
        &self,
        org_id: i32,
    ) -> Result<OrganizationWithMembers, OrganizationError> {
        self.store
            .find_organization_with_members(org_id)
            .await?
            .ok_or(OrganizationError::NotAuthorizedOrNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::MembershipRole;
    use crate::testing::{InMemoryOrganizationStore, RecordingDomainRegistry, SideEffect};

    fn service(
        store: &InMemoryOrganizationStore,
        domains: &RecordingDomainRegistry,
    ) -> OrganizationService {
        OrganizationService::new(Arc::new(store.clone()), Arc::new(domains.clone()))
    }

    /// Acme (42) with alice (1) and a user without username (2)
    fn seed_acme(store: &InMemoryOrganizationStore) {
        store.insert_user(1, Some("alice"), "alice@acme.com");
        store.insert_user(2, None, "bob@acme.com");
        store.insert_organization(42, "Acme", Some("acme"));
        store.insert_membership(42, 1, MembershipRole::Owner, true);
        store.insert_membership(42, 2, MembershipRole::Member, false);
    }

    #[tokio::test]
    async fn deletes_acme_end_to_end() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        seed_acme(&store);

        let output = service(&store, &domains)
            .delete_organization(DeleteOrganizationInput { org_id: 42 })
            .await
            .unwrap();

        assert_eq!(
            output,
            DeleteOrganizationOutput {
                ok: true,
                message: "Organization Acme deleted.".to_string()
            }
        );
        assert_eq!(domains.released(), vec!["acme".to_string()]);
        assert_eq!(store.username(1), Some("alice-1".to_string()));
        assert_eq!(store.username(2), Some("-2".to_string()));
        assert!(!store.team_exists(42));
        assert_eq!(store.membership_count(42), 0);
    }

    #[tokio::test]
    async fn missing_organization_is_rejected_without_writes() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();

        let err = service(&store, &domains)
            .delete_organization(DeleteOrganizationInput { org_id: 999 })
            .await
            .unwrap_err();

        assert!(matches!(err, OrganizationError::NotAuthorizedOrNotFound));
        assert!(store.effects().is_empty());
        assert!(domains.released().is_empty());
    }

    #[tokio::test]
    async fn plain_team_is_treated_like_missing() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        store.insert_user(1, Some("alice"), "alice@acme.com");
        store.insert_team(7, "Design", Some("design"));
        store.insert_membership(7, 1, MembershipRole::Member, true);

        let err = service(&store, &domains)
            .delete_organization(DeleteOrganizationInput { org_id: 7 })
            .await
            .unwrap_err();

        assert!(matches!(err, OrganizationError::NotAuthorizedOrNotFound));
        assert!(store.effects().is_empty());
        assert!(domains.released().is_empty());
        assert!(store.team_exists(7));
        assert_eq!(store.username(1), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn no_slug_means_no_domain_release() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        store.insert_user(3, Some("carol"), "carol@initech.com");
        store.insert_organization(5, "Initech", None);
        store.insert_membership(5, 3, MembershipRole::Admin, true);
        store.insert_organization(6, "Hooli", Some(""));

        let svc = service(&store, &domains);
        svc.delete_organization(DeleteOrganizationInput { org_id: 5 }).await.unwrap();
        svc.delete_organization(DeleteOrganizationInput { org_id: 6 }).await.unwrap();

        assert!(domains.released().is_empty());
        assert_eq!(store.username(3), Some("carol-3".to_string()));
        assert!(!store.team_exists(5));
        assert!(!store.team_exists(6));
    }

    #[tokio::test]
    async fn domain_release_happens_before_any_rename() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        seed_acme(&store);
        domains.on_release(store.clone());

        service(&store, &domains)
            .delete_organization(DeleteOrganizationInput { org_id: 42 })
            .await
            .unwrap();

        assert_eq!(
            store.effects(),
            vec![
                SideEffect::DomainReleased("acme".to_string()),
                SideEffect::Username { user_id: 1, username: "alice-1".to_string() },
                SideEffect::Username { user_id: 2, username: "-2".to_string() },
                SideEffect::TeamDeleted(42),
            ]
        );
    }

    #[tokio::test]
    async fn domain_failure_leaves_everything_untouched() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        seed_acme(&store);
        domains.fail_with(502);

        let err = service(&store, &domains)
            .delete_organization(DeleteOrganizationInput { org_id: 42 })
            .await
            .unwrap_err();

        assert!(matches!(err, OrganizationError::DomainRelease { ref slug, .. } if slug == "acme"));
        assert!(store.effects().is_empty());
        assert_eq!(store.username(1), Some("alice".to_string()));
        assert!(store.team_exists(42));
    }

    #[tokio::test]
    async fn rename_failure_stops_and_keeps_earlier_renames() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        seed_acme(&store);
        store.insert_user(3, Some("carol"), "carol@acme.com");
        store.insert_membership(42, 3, MembershipRole::Member, true);
        store.fail_username_update(2);

        let err = service(&store, &domains)
            .delete_organization(DeleteOrganizationInput { org_id: 42 })
            .await
            .unwrap_err();

        match err {
            OrganizationError::UsernameRewrite { user_id, renamed, .. } => {
                assert_eq!(user_id, 2);
                assert_eq!(renamed, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(domains.released(), vec!["acme".to_string()]);
        assert_eq!(store.username(1), Some("alice-1".to_string()));
        assert_eq!(store.username(2), None);
        assert_eq!(store.username(3), Some("carol".to_string()));
        assert!(store.team_exists(42));
    }

    #[tokio::test]
    async fn team_delete_failure_keeps_prior_steps() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        seed_acme(&store);
        store.fail_team_delete();

        let err = service(&store, &domains)
            .delete_organization(DeleteOrganizationInput { org_id: 42 })
            .await
            .unwrap_err();

        assert!(matches!(err, OrganizationError::TeamDelete { team_id: 42, .. }));
        assert_eq!(domains.released().len(), 1);
        assert_eq!(store.username(1), Some("alice-1".to_string()));
        assert!(store.team_exists(42));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        seed_acme(&store);
        let svc = service(&store, &domains);

        svc.delete_organization(DeleteOrganizationInput { org_id: 42 }).await.unwrap();
        let err = svc
            .delete_organization(DeleteOrganizationInput { org_id: 42 })
            .await
            .unwrap_err();

        assert!(matches!(err, OrganizationError::NotAuthorizedOrNotFound));
        assert_eq!(domains.released().len(), 1);
    }

    #[tokio::test]
    async fn reads_apply_the_same_organization_check() {
        let store = InMemoryOrganizationStore::new();
        let domains = RecordingDomainRegistry::new();
        seed_acme(&store);
        store.insert_team(7, "Design", None);
        let svc = service(&store, &domains);

        let listed = svc.list_organizations().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 42);
        assert_eq!(listed[0].member_count, 2);

        let org = svc.get_organization(42).await.unwrap();
        assert_eq!(org.members.len(), 2);
        assert_eq!(org.members[0].user.id, 1);
        assert!(matches!(
            svc.get_organization(7).await,
            Err(OrganizationError::NotAuthorizedOrNotFound)
        ));
    }
}
