//! In-memory collaborators for exercising the organization workflows
//! without Postgres or a domain provider.
//!
//! Both types are cheap to clone and clones share state, so a test can hand
//! one copy to the service and keep another for assertions.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::database::models::{
    MemberWithUser, Membership, MembershipRole, OrganizationSummary, OrganizationWithMembers,
    Team, TeamMetadata, User,
};
use crate::database::{OrganizationStore, StoreError};
use crate::domains::{DomainError, DomainRegistry};

/// Externally visible mutation, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    DomainReleased(String),
    Username { user_id: i32, username: String },
    TeamDeleted(i32),
}

#[derive(Default)]
struct StoreState {
    users: HashMap<i32, User>,
    teams: HashMap<i32, Team>,
    memberships: Vec<Membership>,
    effects: Vec<SideEffect>,
    failing_username_updates: HashSet<i32>,
    fail_team_delete: bool,
}

#[derive(Clone, Default)]
pub struct InMemoryOrganizationStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryOrganizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, id: i32, username: Option<&str>, email: &str) {
        let user = User {
            id,
            username: username.map(str::to_string),
            email: email.to_string(),
            name: None,
            role: "USER".to_string(),
            organization_id: None,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().users.insert(id, user);
    }

    /// Team flagged `isOrganization: true`
    pub fn insert_organization(&self, id: i32, name: &str, slug: Option<&str>) {
        self.insert_team_with(id, name, slug, TeamMetadata::organization());
    }

    /// Regular team without the organization flag
    pub fn insert_team(&self, id: i32, name: &str, slug: Option<&str>) {
        self.insert_team_with(id, name, slug, TeamMetadata::default());
    }

    fn insert_team_with(&self, id: i32, name: &str, slug: Option<&str>, metadata: TeamMetadata) {
        let team = Team {
            id,
            name: name.to_string(),
            slug: slug.map(str::to_string),
            metadata,
            parent_id: None,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().teams.insert(id, team);
    }

    pub fn insert_membership(&self, team_id: i32, user_id: i32, role: MembershipRole, accepted: bool) {
        let mut state = self.state.lock().unwrap();
        let id = state.memberships.len() as i32 + 1;
        state.memberships.push(Membership {
            id,
            team_id,
            user_id,
            role,
            accepted,
        });
    }

    /// Make `update_username` fail for this user
    pub fn fail_username_update(&self, user_id: i32) {
        self.state.lock().unwrap().failing_username_updates.insert(user_id);
    }

    /// Make every `delete_team` call fail
    pub fn fail_team_delete(&self) {
        self.state.lock().unwrap().fail_team_delete = true;
    }

    pub fn record(&self, effect: SideEffect) {
        self.state.lock().unwrap().effects.push(effect);
    }

    pub fn effects(&self) -> Vec<SideEffect> {
        self.state.lock().unwrap().effects.clone()
    }

    pub fn username(&self, user_id: i32) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(&user_id)
            .and_then(|u| u.username.clone())
    }

    pub fn team_exists(&self, team_id: i32) -> bool {
        self.state.lock().unwrap().teams.contains_key(&team_id)
    }

    pub fn membership_count(&self, team_id: i32) -> usize {
        self.state
            .lock()
            .unwrap()
            .memberships
            .iter()
            .filter(|m| m.team_id == team_id)
            .count()
    }
}

#[async_trait]
impl OrganizationStore for InMemoryOrganizationStore {
    async fn find_organization_with_members(
        &self,
        org_id: i32,
    ) -> Result<Option<OrganizationWithMembers>, StoreError> {
        let state = self.state.lock().unwrap();
        let Some(team) = state.teams.get(&org_id).filter(|t| t.is_organization()) else {
            return Ok(None);
        };

        let mut memberships: Vec<&Membership> = state
            .memberships
            .iter()
            .filter(|m| m.team_id == org_id)
            .collect();
        memberships.sort_by_key(|m| m.id);

        let members = memberships
            .into_iter()
            .filter_map(|m| {
                state.users.get(&m.user_id).map(|user| MemberWithUser {
                    membership: m.clone(),
                    user: user.clone(),
                })
            })
            .collect();

        Ok(Some(OrganizationWithMembers {
            team: team.clone(),
            members,
        }))
    }

    async fn list_organizations(&self) -> Result<Vec<OrganizationSummary>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut summaries: Vec<OrganizationSummary> = state
            .teams
            .values()
            .filter(|t| t.is_organization())
            .map(|t| OrganizationSummary {
                id: t.id,
                name: t.name.clone(),
                slug: t.slug.clone(),
                member_count: state.memberships.iter().filter(|m| m.team_id == t.id).count() as i64,
            })
            .collect();
        summaries.sort_by_key(|s| s.id);
        Ok(summaries)
    }

    async fn update_username(&self, user_id: i32, username: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_username_updates.contains(&user_id) {
            return Err(StoreError::other(format!("simulated failure updating user {user_id}")));
        }
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::Sqlx(sqlx::Error::RowNotFound))?;
        user.username = Some(username.to_string());
        state.effects.push(SideEffect::Username {
            user_id,
            username: username.to_string(),
        });
        Ok(())
    }

    async fn delete_team(&self, team_id: i32) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_team_delete {
            return Err(StoreError::other(format!("simulated failure deleting team {team_id}")));
        }
        if state.teams.remove(&team_id).is_none() {
            return Err(StoreError::Sqlx(sqlx::Error::RowNotFound));
        }
        state.memberships.retain(|m| m.team_id != team_id);
        state.effects.push(SideEffect::TeamDeleted(team_id));
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
struct RegistryState {
    released: Vec<String>,
    failure: Option<u16>,
    journal: Option<InMemoryOrganizationStore>,
}

/// Domain registry that remembers every release call
#[derive(Clone, Default)]
pub struct RecordingDomainRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl RecordingDomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every release with this HTTP status
    pub fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().failure = Some(status);
    }

    /// Also log successful releases into the store's effect journal, so tests
    /// can assert ordering across both collaborators
    pub fn on_release(&self, store: InMemoryOrganizationStore) {
        self.state.lock().unwrap().journal = Some(store);
    }

    pub fn released(&self) -> Vec<String> {
        self.state.lock().unwrap().released.clone()
    }
}

#[async_trait]
impl DomainRegistry for RecordingDomainRegistry {
    async fn release(&self, slug: &str) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.failure {
            return Err(DomainError::Rejected {
                status,
                body: "simulated provider failure".to_string(),
            });
        }
        state.released.push(slug.to_string());
        if let Some(journal) = &state.journal {
            journal.record(SideEffect::DomainReleased(slug.to_string()));
        }
        Ok(())
    }
}
