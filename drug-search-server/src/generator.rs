use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::StatusCode;
use rig::completion::Prompt;
use rig::prelude::*;
use serde_json::{Value, json};
use tracing::{info, warn};

/// Upper bound on generated tokens per request
pub const MAX_TOKENS: u32 = 150;

/// Build the prompt asking for the generic drug and a comparison
pub fn build_prompt(brand_drug: &str, drug_info: &str) -> String {
    format!(
        "Given the following drug information for brand drug '{}': {}, \
         provide the generic drug name along with detailed comparison information.",
        brand_drug, drug_info
    )
}

/// Produces the generic-drug text shown to the user
#[async_trait]
pub trait GenericInfoGenerator: Send + Sync {
    async fn generate(&self, brand_drug: &str, drug_info: &str) -> Result<String>;
}

/// Plain HTTP generate endpoint (`{prompt, max_tokens}` in, `{generated_text}` out)
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl GenericInfoGenerator for GeminiGenerator {
    async fn generate(&self, brand_drug: &str, drug_info: &str) -> Result<String> {
        let payload = json!({
            "prompt": build_prompt(brand_drug, drug_info),
            "max_tokens": MAX_TOKENS
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("Gemini API request failed: {}", e))?;

        // A rejected generation is reported to the user as text, not as a failed search.
        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            return Ok(format!("Error querying Gemini API: {}", body));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Gemini API response: {}", e))?;

        Ok(data
            .get("generated_text")
            .and_then(Value::as_str)
            .unwrap_or("No text returned")
            .to_string())
    }
}

/// LLM agent over OpenRouter
pub struct OpenRouterGenerator {
    agent: rig::agent::Agent<rig::providers::openrouter::CompletionModel>,
}

impl OpenRouterGenerator {
    pub fn new(api_key: &str, model: &str) -> Self {
        let client = rig::providers::openrouter::Client::new(api_key);
        let agent = client
            .agent(model)
            .preamble("You are a pharmacist comparing brand-name drugs with their generic equivalents.")
            .max_tokens(MAX_TOKENS as u64)
            .build();
        Self { agent }
    }
}

#[async_trait]
impl GenericInfoGenerator for OpenRouterGenerator {
    async fn generate(&self, brand_drug: &str, drug_info: &str) -> Result<String> {
        let prompt = build_prompt(brand_drug, drug_info);
        let response = self.agent.prompt(prompt.as_str()).await?;
        info!("Generated generic info for {} ({} chars)", brand_drug, response.len());
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_prompt_text() {
        assert_eq!(
            build_prompt("Lipitor", "Statin"),
            "Given the following drug information for brand drug 'Lipitor': Statin, \
             provide the generic drug name along with detailed comparison information."
        );
    }

    #[tokio::test]
    async fn test_generated_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/generate")
            .match_header("authorization", "Bearer gm-key")
            .match_body(Matcher::Json(json!({
                "prompt": build_prompt("Lipitor", "Statin"),
                "max_tokens": 150
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"generated_text":"Atorvastatin"}"#)
            .create_async()
            .await;

        let generator = GeminiGenerator::new(format!("{}/v1/generate", server.url()), "gm-key");
        let text = generator.generate("Lipitor", "Statin").await.unwrap();

        assert_eq!(text, "Atorvastatin");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_generated_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/generate")
            .with_status(200)
            .with_body(r#"{"other":"field"}"#)
            .create_async()
            .await;

        let generator = GeminiGenerator::new(format!("{}/v1/generate", server.url()), "gm-key");

        assert_eq!(
            generator.generate("Lipitor", "Statin").await.unwrap(),
            "No text returned"
        );
    }

    #[tokio::test]
    async fn test_error_status_becomes_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/generate")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let generator = GeminiGenerator::new(format!("{}/v1/generate", server.url()), "gm-key");

        assert_eq!(
            generator.generate("Lipitor", "Statin").await.unwrap(),
            "Error querying Gemini API: quota exceeded"
        );
    }
}
