pub mod config;
pub mod generator;
pub mod index;
pub mod models;
pub mod service;

pub use config::{ConfigError, ServerConfig};
pub use generator::{GeminiGenerator, GenericInfoGenerator, OpenRouterGenerator};
pub use index::{DrugIndex, InMemoryDrugIndex, PineconeIndex, describe_drug};
pub use service::{AppState, build_router, create_app};
