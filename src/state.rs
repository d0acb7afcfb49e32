use std::sync::Arc;

use crate::database::OrganizationStore;
use crate::domains::DomainRegistry;
use crate::services::OrganizationService;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub organizations: OrganizationService,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OrganizationStore>,
        domains: Arc<dyn DomainRegistry>,
        jwt_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            organizations: OrganizationService::new(store, domains),
            jwt_secret: jwt_secret.into(),
        }
    }
}
