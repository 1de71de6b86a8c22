use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::llm::ollama::DEFAULT_BASE_URL;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Inference provider type
    pub provider: String,

    /// Base URL of the inference endpoint
    pub base_url: Option<String>,

    /// Model to use
    pub model: String,

    /// Whether extracted commands run without further confirmation
    pub auto_execute: bool,

    /// Directory scanned for installed GUI applications
    pub applications_dir: PathBuf,

    /// Shell interpreter override; the platform default is used when unset
    pub shell: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: None,
            model: "mistral".to_string(),
            auto_execute: true,
            applications_dir: PathBuf::from("/Applications"),
            shell: None,
        }
    }
}

/// On-disk configuration; every field is optional and only overrides
/// what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub auto_execute: Option<bool>,
    pub applications_dir: Option<PathBuf>,
    pub shell: Option<String>,
}

impl Config {
    /// Initialize configuration from the environment and config files
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = Self::default();

        config.apply_env(|key| std::env::var(key).ok());

        if let Some(file_config) = Self::load_from_file().await? {
            config.merge_with(file_config);
        }

        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("WHIZTERM_PROVIDER") {
            self.provider = provider;
        }

        if let Some(url) = lookup("OLLAMA_HOST").or_else(|| lookup("OLLAMA_BASE_URL")) {
            self.base_url = Some(normalize_host(&url));
        }

        if let Some(url) = lookup("WHIZTERM_BASE_URL") {
            self.base_url = Some(url);
        }

        if let Some(model) = lookup("WHIZTERM_MODEL") {
            self.model = model;
        }

        if let Some(flag) = lookup("WHIZTERM_AUTO_EXECUTE") {
            self.auto_execute = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(dir) = lookup("WHIZTERM_APPLICATIONS_DIR") {
            self.applications_dir = PathBuf::from(dir);
        }

        if let Some(shell) = lookup("WHIZTERM_SHELL") {
            self.shell = Some(shell);
        }
    }

    /// Candidate configuration files, highest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.whizterm.json"),
            PathBuf::from("./whizterm.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("whizterm").join("whizterm.json"));
        }

        config_paths
    }

    /// Load the first configuration file that exists. A missing file is not
    /// an error; a malformed one is.
    pub async fn load_from_file() -> Result<Option<FileConfig>> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::read_file(&path).await.map(Some);
            }
        }

        Ok(None)
    }

    async fn read_file(path: &Path) -> Result<FileConfig> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Merge file settings into this configuration
    pub fn merge_with(&mut self, other: FileConfig) {
        if let Some(provider) = other.provider {
            self.provider = provider;
        }
        if other.base_url.is_some() {
            self.base_url = other.base_url;
        }
        if let Some(model) = other.model {
            self.model = model;
        }
        if let Some(auto_execute) = other.auto_execute {
            self.auto_execute = auto_execute;
        }
        if let Some(dir) = other.applications_dir {
            self.applications_dir = dir;
        }
        if other.shell.is_some() {
            self.shell = other.shell;
        }
    }

    /// Effective endpoint base URL
    pub fn endpoint(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(anyhow::anyhow!("Model is required"));
        }

        if !self.endpoint().starts_with("http://") && !self.endpoint().starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Endpoint must be an http(s) URL, got '{}'",
                self.endpoint()
            ));
        }

        Ok(())
    }
}

/// `OLLAMA_HOST` is commonly set as a bare `host:port`.
fn normalize_host(value: &str) -> String {
    if value.starts_with("http://") || value.starts_with("https://") {
        value.to_string()
    } else {
        format!("http://{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "mistral");
        assert!(config.auto_execute);
        assert_eq!(config.endpoint(), "http://localhost:11434");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("OLLAMA_HOST", "127.0.0.1:11435"),
            ("WHIZTERM_MODEL", "llama3"),
            ("WHIZTERM_AUTO_EXECUTE", "false"),
            ("WHIZTERM_APPLICATIONS_DIR", "/tmp/apps"),
        ]);
        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).cloned());

        assert_eq!(config.endpoint(), "http://127.0.0.1:11435");
        assert_eq!(config.model, "llama3");
        assert!(!config.auto_execute);
        assert_eq!(config.applications_dir, PathBuf::from("/tmp/apps"));
    }

    #[test]
    fn test_explicit_base_url_wins_over_ollama_host() {
        let vars = env(&[
            ("OLLAMA_HOST", "other:1"),
            ("WHIZTERM_BASE_URL", "http://gpu-box:11434"),
        ]);
        let mut config = Config::default();
        config.apply_env(|key| vars.get(key).cloned());
        assert_eq!(config.endpoint(), "http://gpu-box:11434");
    }

    #[test]
    fn test_merge_partial_file() {
        let file: FileConfig = serde_json::from_str(r#"{"model": "codellama"}"#).unwrap();
        let mut config = Config::default();
        config.merge_with(file);
        assert_eq!(config.model, "codellama");
        assert!(config.auto_execute);
        assert_eq!(config.provider, "ollama");
    }

    #[tokio::test]
    async fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whizterm.json");
        std::fs::write(&path, r#"{"auto_execute": false, "shell": "/bin/zsh"}"#).unwrap();

        let file = Config::read_file(&path).await.unwrap();
        assert_eq!(file.auto_execute, Some(false));
        assert_eq!(file.shell.as_deref(), Some("/bin/zsh"));

        std::fs::write(&path, "{oops").unwrap();
        assert!(Config::read_file(&path).await.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            model: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            base_url: Some("localhost:11434".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
