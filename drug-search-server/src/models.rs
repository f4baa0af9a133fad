use serde::{Deserialize, Serialize};

// Wire types shared with the search handler.
pub use drug_search::{GenericLookup as SearchResponse, SearchRequest};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
