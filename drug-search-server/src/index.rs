use anyhow::{Result, anyhow};
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::info;

use crate::config::PineconeConfig;

/// Text used when the matching record carries no `drug_info`
pub const NO_DRUG_INFO: &str = "No drug info available";

/// Text used when nothing in the index matches the brand name
pub const NO_MATCH: &str = "No information found for this drug";

const PINECONE_API_VERSION: &str = "2024-07";

/// A record returned by an index query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Lookup of stored drug information by brand name
#[async_trait]
pub trait DrugIndex: Send + Sync {
    /// Best match for records whose `brand_name` equals `brand_drug`
    async fn query(&self, brand_drug: &str) -> Result<Vec<IndexMatch>>;
}

/// Resolve the raw drug information for a brand, falling back to fixed texts
pub async fn describe_drug(index: &dyn DrugIndex, brand_drug: &str) -> Result<String> {
    let matches = index.query(brand_drug).await?;

    let Some(first) = matches.first() else {
        info!("No index match for brand drug {}", brand_drug);
        return Ok(NO_MATCH.to_string());
    };

    let drug_info = match first.metadata.get("drug_info") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => NO_DRUG_INFO.to_string(),
        Some(other) => other.to_string(),
    };

    Ok(drug_info)
}

/// In-memory index keyed by brand name
pub struct InMemoryDrugIndex {
    records: Arc<DashMap<String, Map<String, Value>>>,
}

impl InMemoryDrugIndex {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Store metadata for a brand name, replacing what was there
    pub fn insert(&self, brand_name: impl Into<String>, metadata: Map<String, Value>) {
        self.records.insert(brand_name.into(), metadata);
    }

    /// Store a record carrying only `drug_info`
    pub fn insert_info(&self, brand_name: impl Into<String>, drug_info: impl Into<String>) {
        let mut metadata = Map::new();
        metadata.insert("drug_info".to_string(), Value::String(drug_info.into()));
        self.insert(brand_name, metadata);
    }
}

impl Default for InMemoryDrugIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DrugIndex for InMemoryDrugIndex {
    async fn query(&self, brand_drug: &str) -> Result<Vec<IndexMatch>> {
        Ok(self
            .records
            .get(brand_drug)
            .map(|entry| IndexMatch {
                id: entry.key().clone(),
                score: None,
                metadata: entry.value().clone(),
            })
            .into_iter()
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
    #[serde(default)]
    host: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

/// Pinecone serverless index accessed over its REST API
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    host: String,
    dimension: usize,
}

impl PineconeIndex {
    /// Make sure the index exists (creating it if needed) and resolve its data-plane host
    pub async fn connect(config: &PineconeConfig) -> Result<Self> {
        let client = reqwest::Client::new();
        let control_url = config.control_url.trim_end_matches('/');

        let list: IndexList = client
            .get(format!("{}/indexes", control_url))
            .header("Api-Key", &config.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .send()
            .await
            .map_err(|e| anyhow!("Pinecone list indexes request failed: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow!("Pinecone list indexes failed: {}", e))?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Pinecone index list: {}", e))?;

        if !list.indexes.iter().any(|index| index.name == config.index_name) {
            info!(
                "Creating Pinecone index {} (dimension {}, region {})",
                config.index_name, config.dimension, config.environment
            );
            client
                .post(format!("{}/indexes", control_url))
                .header("Api-Key", &config.api_key)
                .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
                .json(&json!({
                    "name": config.index_name,
                    "dimension": config.dimension,
                    "metric": "euclidean",
                    "spec": {
                        "serverless": {
                            "cloud": "aws",
                            "region": config.environment
                        }
                    }
                }))
                .send()
                .await
                .map_err(|e| anyhow!("Pinecone create index request failed: {}", e))?
                .error_for_status()
                .map_err(|e| anyhow!("Pinecone create index failed: {}", e))?;
        }

        let description: IndexDescription = client
            .get(format!("{}/indexes/{}", control_url, config.index_name))
            .header("Api-Key", &config.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .send()
            .await
            .map_err(|e| anyhow!("Pinecone describe index request failed: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow!("Pinecone describe index failed: {}", e))?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Pinecone index description: {}", e))?;

        let host = description
            .host
            .filter(|host| !host.is_empty())
            .ok_or_else(|| anyhow!("Pinecone index {} has no host yet", config.index_name))?;

        info!("Connected to Pinecone index {} at {}", description.name, host);

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            host: with_scheme(&host),
            dimension: config.dimension,
        })
    }
}

fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}

#[async_trait]
impl DrugIndex for PineconeIndex {
    async fn query(&self, brand_drug: &str) -> Result<Vec<IndexMatch>> {
        // Metadata-filter lookup: the vector only has to have the right dimension.
        let body = json!({
            "vector": vec![0.0f32; self.dimension],
            "topK": 1,
            "filter": { "brand_name": brand_drug },
            "includeMetadata": true
        });

        let response: QueryResponse = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", PINECONE_API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Pinecone query request failed: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow!("Pinecone query failed: {}", e))?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Pinecone query response: {}", e))?;

        Ok(response.matches)
    }
}
