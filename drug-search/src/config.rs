/// Endpoint the search handler posts to when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/search";

/// Environment variable overriding the endpoint
pub const ENDPOINT_ENV: &str = "DRUG_SEARCH_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Read the endpoint from `DRUG_SEARCH_ENDPOINT`, falling back to the local default
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup(ENDPOINT_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        Self::new(endpoint)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_override() {
        let config = ClientConfig::from_lookup(|name: &str| {
            (name == ENDPOINT_ENV).then(|| " http://search.internal:8080/search ".to_string())
        });
        assert_eq!(config.endpoint, "http://search.internal:8080/search");
    }

    #[test]
    fn test_blank_or_missing_endpoint_uses_default() {
        let config = ClientConfig::from_lookup(|_: &str| Some("   ".to_string()));
        assert_eq!(config.endpoint, "http://localhost:5000/search");

        let config = ClientConfig::from_lookup(|_: &str| None);
        assert_eq!(config, ClientConfig::default());
    }
}
