use thiserror::Error;

pub const INDEX_NAME: &str = "drug-info-index";
pub const INDEX_DIMENSION: usize = 1536;
pub const DEFAULT_PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_GEMINI_API_URL: &str = "https://api.gemini.com/v1/generate";
pub const DEFAULT_OPENROUTER_MODEL: &str = "openai/gpt-4.1-mini";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Either GEMINI_API_KEY or OPENROUTER_API_KEY environment variable is required")]
    NoGenerator,
}

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    /// Region of the serverless index, e.g. `us-west-2`
    pub environment: String,
    pub control_url: String,
    pub index_name: String,
    pub dimension: usize,
}

#[derive(Debug, Clone)]
pub enum GeneratorConfig {
    Gemini { api_url: String, api_key: String },
    OpenRouter { api_key: String, model: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub pinecone: PineconeConfig,
    pub generator: GeneratorConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        let port = match var("PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 5000,
        };

        let pinecone = PineconeConfig {
            api_key: required("PINECONE_API_KEY")?,
            environment: required("PINECONE_ENV")?,
            control_url: var("PINECONE_CONTROL_URL")
                .unwrap_or_else(|| DEFAULT_PINECONE_CONTROL_URL.to_string()),
            index_name: INDEX_NAME.to_string(),
            dimension: INDEX_DIMENSION,
        };

        let generator = if let Some(api_key) = var("GEMINI_API_KEY") {
            GeneratorConfig::Gemini {
                api_url: var("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
                api_key,
            }
        } else if let Some(api_key) = var("OPENROUTER_API_KEY") {
            GeneratorConfig::OpenRouter {
                api_key,
                model: var("OPENROUTER_MODEL")
                    .unwrap_or_else(|| DEFAULT_OPENROUTER_MODEL.to_string()),
            }
        } else {
            return Err(ConfigError::NoGenerator);
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            pinecone,
            generator,
        })
    }
}
