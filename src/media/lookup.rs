use super::{error::FetchError, types::PostIdentifier};
use crate::config::ApiConfig;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

#[async_trait]
pub trait Lookup: Send + Sync {
    /// Human-readable name of the lookup service
    fn name(&self) -> &'static str;

    /// Fetch the raw JSON description of a post
    async fn lookup(&self, id: &PostIdentifier) -> Result<Value, FetchError>;
}

/// Lookup against an fxtwitter-compatible `/status/<id>` JSON API.
pub struct StatusApiLookup {
    client: reqwest::Client,
    base_url: String,
}

impl StatusApiLookup {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, id: &PostIdentifier) -> String {
        format!("{}/status/{}", self.base_url, id)
    }
}

#[async_trait]
impl Lookup for StatusApiLookup {
    fn name(&self) -> &'static str {
        "status-api"
    }

    async fn lookup(&self, id: &PostIdentifier) -> Result<Value, FetchError> {
        let endpoint = self.endpoint(id);
        debug!("Requesting {}", endpoint);

        let response = self.client.get(&endpoint).send().await?;
        let status = response.status();
        info!("Lookup for post {} returned {}", id, status);

        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
