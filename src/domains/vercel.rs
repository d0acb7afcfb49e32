use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use super::{DomainError, DomainRegistry};
use crate::config::DomainConfig;

/// Releases organization subdomains attached to a Vercel project
#[derive(Debug, Clone)]
pub struct VercelDomainRegistry {
    client: reqwest::Client,
    api_base: String,
    api_token: String,
    project_id: String,
    team_id: Option<String>,
    subdomain_suffix: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
}

impl VercelDomainRegistry {
    pub fn from_config(config: &DomainConfig) -> Result<Self, DomainError> {
        let api_token = config
            .api_token
            .clone()
            .ok_or(DomainError::Misconfigured("DOMAINS_API_TOKEN is required"))?;
        let project_id = config
            .project_id
            .clone()
            .ok_or(DomainError::Misconfigured("DOMAINS_PROJECT_ID is required"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_token,
            project_id,
            team_id: config.team_id.clone(),
            subdomain_suffix: config.subdomain_suffix.clone(),
        })
    }

    /// Fully qualified domain for an organization slug
    pub fn domain_for(&self, slug: &str) -> String {
        format!("{}.{}", slug, self.subdomain_suffix)
    }

    fn release_url(&self, slug: &str) -> String {
        format!(
            "{}/v9/projects/{}/domains/{}",
            self.api_base,
            self.project_id,
            self.domain_for(slug)
        )
    }
}

#[async_trait]
impl DomainRegistry for VercelDomainRegistry {
    async fn release(&self, slug: &str) -> Result<(), DomainError> {
        let url = self.release_url(slug);
        tracing::debug!("Releasing domain via {}", url);

        let mut request = self.client.delete(&url).bearer_auth(&self.api_token);
        if let Some(team_id) = &self.team_id {
            request = request.query(&[("teamId", team_id)]);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Released domain {}", self.domain_for(slug));
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();

        // Already gone on the provider side
        if status == StatusCode::NOT_FOUND {
            let code = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.code);
            if code.as_deref() == Some("not_found") {
                tracing::warn!("Domain {} was not registered, treating as released", self.domain_for(slug));
                return Ok(());
            }
        }

        Err(DomainError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
