use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    errors::{LlmError, LlmResult},
    provider::InferenceProvider,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

/// Ollama generate request (single prompt, no streaming)
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Ollama response format for generate
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct OllamaModelsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaProvider {
    /// Create a new Ollama client; `None` targets the local default port
    pub fn new(base_url: Option<String>) -> LlmResult<Self> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }

    async fn error_from_response(response: reqwest::Response) -> LlmError {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        LlmError::Api(format!("Ollama API error {}: {}", status, error_text))
    }

    fn parse_generate(body: &str) -> LlmResult<String> {
        let parsed: OllamaGenerateResponse = serde_json::from_str(body)?;
        Ok(parsed.response)
    }

    fn parse_models(body: &str) -> LlmResult<Vec<String>> {
        let parsed: OllamaModelsResponse = serde_json::from_str(body)?;
        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl InferenceProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, model: &str) -> LlmResult<String> {
        let url = self.generate_url();

        debug!("Sending Ollama generate request to: {} (model {})", url, model);

        let request = OllamaGenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&self.base_url, e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.text().await?;
        Self::parse_generate(&body)
    }

    async fn list_models(&self) -> LlmResult<Vec<String>> {
        let url = self.tags_url();

        debug!("Fetching Ollama models from: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&self.base_url, e))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.text().await?;
        let model_names = Self::parse_models(&body)?;

        debug!("Available Ollama models: {:?}", model_names);
        Ok(model_names)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_shape() {
        let request = OllamaGenerateRequest {
            model: "mistral",
            prompt: "list files",
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"model": "mistral", "prompt": "list files", "stream": false})
        );
    }

    #[test]
    fn test_parse_generate() {
        let body = r#"{"model":"mistral","response":"```ls -la```","done":true,"eval_count":12}"#;
        assert_eq!(OllamaProvider::parse_generate(body).unwrap(), "```ls -la```");

        let missing = r#"{"done":true}"#;
        assert!(matches!(
            OllamaProvider::parse_generate(missing),
            Err(LlmError::Json(_))
        ));
    }

    #[test]
    fn test_parse_models() {
        let body = r#"{"models":[{"name":"mistral:latest","size":1},{"name":"llama3:8b"}]}"#;
        assert_eq!(
            OllamaProvider::parse_models(body).unwrap(),
            vec!["mistral:latest".to_string(), "llama3:8b".to_string()]
        );
    }

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new(None).unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.name(), "ollama");
        assert_eq!(provider.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_ollama_provider_custom_url() {
        let provider = OllamaProvider::new(Some("http://custom-ollama:8080/".to_string())).unwrap();
        assert_eq!(provider.base_url, "http://custom-ollama:8080");
        assert_eq!(provider.tags_url(), "http://custom-ollama:8080/api/tags");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        // Port 9 (discard) is closed on any sane test host.
        let provider = OllamaProvider::new(Some("http://127.0.0.1:9".to_string())).unwrap();
        let err = provider.generate("hi", "mistral").await.unwrap_err();
        assert!(matches!(err, LlmError::Connection { .. }));
        assert!(err.user_message().contains("Make sure Ollama is running"));
    }
}
