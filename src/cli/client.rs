use anyhow::Context;
use reqwest::Method;
use serde_json::Value;

/// Thin JSON client for the admin API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> anyhow::Result<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Send a request and unwrap the `data` member of the success envelope
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .with_context(|| format!("invalid JSON from {}", url))?;

        if !status.is_success() {
            let message = payload["message"].as_str().unwrap_or("request failed");
            let code = payload["code"].as_str().unwrap_or("UNKNOWN");
            anyhow::bail!("{} ({}): {}", code, status.as_u16(), message);
        }

        Ok(payload.get("data").cloned().unwrap_or(Value::Null))
    }
}
