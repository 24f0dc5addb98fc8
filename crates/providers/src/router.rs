//! Provider router: selects the correct LLM provider based on config.

use concierge_core::error::ProviderError;
use concierge_core::provider::Provider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::openai_compat::{GEMINI_BASE_URL, OpenAiCompatProvider};

/// Routes LLM requests to the correct provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Build providers from configuration.
pub fn build_from_config(
    config: &concierge_config::AppConfig,
) -> Result<ProviderRouter, ProviderError> {
    let mut router = ProviderRouter::new(&config.default_provider);
    let timeout = Duration::from_secs(config.llm_timeout_secs);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        let base_url = match &provider_config.api_url {
            Some(url) => url.clone(),
            None => default_base_url(name).ok_or_else(|| {
                ProviderError::NotConfigured(format!("provider '{name}' needs an api_url"))
            })?,
        };

        let provider = OpenAiCompatProvider::new(name, base_url, api_key, timeout)?;
        router.register(name.clone(), Arc::new(provider));
    }

    // Ensure the default provider exists (even if not explicitly configured)
    if router.get(&config.default_provider).is_none() {
        let base_url = default_base_url(&config.default_provider).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "unknown provider '{}'; add [providers.{}] with an api_url",
                config.default_provider, config.default_provider
            ))
        })?;
        let provider = OpenAiCompatProvider::new(
            &config.default_provider,
            base_url,
            config.api_key.clone().unwrap_or_default(),
            timeout,
        )?;
        router.register(config.default_provider.clone(), Arc::new(provider));
    }

    Ok(router)
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> Option<String> {
    let url = match provider_name {
        "gemini" | "google" => GEMINI_BASE_URL,
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "ollama" => "http://localhost:11434/v1",
        _ => return None,
    };
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_config::{AppConfig, ProviderConfig};

    #[test]
    fn router_register_and_lookup() {
        let mut router = ProviderRouter::new("gemini");
        let provider = Arc::new(OpenAiCompatProvider::gemini("g-test").unwrap());
        router.register("gemini", provider);

        assert!(router.get("gemini").is_some());
        assert!(router.get("nonexistent").is_none());
        assert!(router.default().is_some());
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("gemini").unwrap().contains("generativelanguage.googleapis.com"));
        assert!(default_base_url("openai").unwrap().contains("api.openai.com"));
        assert!(default_base_url("mystery").is_none());
    }

    #[test]
    fn build_from_default_config() {
        let router = build_from_config(&AppConfig::default()).unwrap();
        assert_eq!(router.list(), vec!["gemini"]);
        assert!(router.default().is_some());
    }

    #[test]
    fn custom_provider_needs_url() {
        let mut config = AppConfig::default();
        config.default_provider = "mystery".into();
        assert!(build_from_config(&config).is_err());

        config.providers.insert(
            "mystery".into(),
            ProviderConfig {
                api_key: Some("k".into()),
                api_url: Some("http://localhost:4000/v1".into()),
                default_model: None,
            },
        );
        let router = build_from_config(&config).unwrap();
        assert_eq!(router.default().unwrap().name(), "mystery");
    }
}
