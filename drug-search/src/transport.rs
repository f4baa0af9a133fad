use async_trait::async_trait;
use tracing::debug;

use crate::{config::ClientConfig, error::Result, payload::SearchRequest};

/// How the search endpoint answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchReply {
    /// 2xx status with the unparsed body
    Success(String),
    /// Any other status; the body is left unread
    Failure(u16),
}

/// Carries a search request to the endpoint
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn post_search(&self, request: &SearchRequest) -> Result<SearchReply>;
}

/// reqwest-backed transport posting JSON to the configured endpoint
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn post_search(&self, request: &SearchRequest) -> Result<SearchReply> {
        debug!(endpoint = %self.endpoint, brand_drug = %request.brand_drug, "Posting search request");

        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(SearchReply::Failure(status.as_u16()));
        }

        Ok(SearchReply::Success(response.text().await?))
    }
}
