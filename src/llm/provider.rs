//! Provider trait and factory for inference endpoints

use async_trait::async_trait;

use crate::config::Config;
use crate::llm::{
    errors::{LlmError, LlmResult},
    ollama::OllamaProvider,
};

/// A text-generation backend.
///
/// Implementations take a fully assembled prompt and return the model's raw
/// text. Nothing is assumed about the shape of that text.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Generate a completion for `prompt` using `model`
    async fn generate(&self, prompt: &str, model: &str) -> LlmResult<String>;

    /// List the model identifiers the backend can serve
    async fn list_models(&self) -> LlmResult<Vec<String>>;

    /// Get the provider name
    fn name(&self) -> &str;
}

/// Factory for creating inference providers
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a new provider from configuration
    pub fn create_provider(config: &Config) -> LlmResult<Box<dyn InferenceProvider>> {
        match config.provider.as_str() {
            "ollama" => {
                let provider = OllamaProvider::new(config.base_url.clone())?;
                Ok(Box::new(provider))
            }
            other => Err(LlmError::Api(format!(
                "Unsupported provider type: {} (available: {})",
                other,
                Self::available_providers().join(", ")
            ))),
        }
    }

    /// Get available provider types
    pub fn available_providers() -> Vec<&'static str> {
        vec!["ollama"]
    }
}
