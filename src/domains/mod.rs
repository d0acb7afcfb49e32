//! Custom-domain registry seam.
//!
//! Organizations with a slug are served from `<slug>.<suffix>`. That domain is
//! registered with the hosting provider and has to be released when the
//! organization is removed.

mod noop;
mod vercel;

pub use noop::NoopDomainRegistry;
pub use vercel::VercelDomainRegistry;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{DomainConfig, DomainProvider};

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Domain provider is misconfigured: {0}")]
    Misconfigured(&'static str),

    #[error("Domain provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Domain provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait DomainRegistry: Send + Sync {
    /// Release the domain registered for `slug`
    async fn release(&self, slug: &str) -> Result<(), DomainError>;
}

/// Build the registry selected by configuration
pub fn from_config(config: &DomainConfig) -> Result<Arc<dyn DomainRegistry>, DomainError> {
    match config.provider {
        DomainProvider::None => Ok(Arc::new(NoopDomainRegistry)),
        DomainProvider::Vercel => Ok(Arc::new(VercelDomainRegistry::from_config(config)?)),
    }
}
