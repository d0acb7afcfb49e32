use async_trait::async_trait;

use super::{DomainError, DomainRegistry};

/// Used when the deployment does not manage custom subdomains
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDomainRegistry;

#[async_trait]
impl DomainRegistry for NoopDomainRegistry {
    async fn release(&self, slug: &str) -> Result<(), DomainError> {
        tracing::info!("No domain provider configured, skipping release of '{}'", slug);
        Ok(())
    }
}
