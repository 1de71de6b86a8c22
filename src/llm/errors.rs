//! Error types for the inference endpoint

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("cannot connect to {endpoint}")]
    Connection {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Classify a transport error, separating refused/unreachable endpoints
    /// from everything else.
    pub fn from_transport(endpoint: &str, error: reqwest::Error) -> Self {
        if error.is_connect() {
            LlmError::Connection {
                endpoint: endpoint.to_string(),
                source: error,
            }
        } else {
            LlmError::Http(error)
        }
    }

    /// Text shown to the user when a request fails.
    pub fn user_message(&self) -> String {
        match self {
            LlmError::Connection { endpoint, .. } => format!(
                "Error: cannot connect to Ollama at {}. Make sure Ollama is running.",
                endpoint
            ),
            other => format!("Error while calling Ollama: {}", other),
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
