//! Configuration loading, validation, and management for Concierge.
//!
//! Loads configuration from `~/.concierge/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.concierge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Seconds before an LLM request is abandoned
    #[serde(default = "default_llm_timeout")]
    pub llm_timeout_secs: u64,

    /// Upper bound on tool-calling rounds per run
    #[serde(default = "default_max_iterations")]
    pub max_tool_iterations: usize,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Remote health store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Sub-agent endpoints
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_llm_timeout() -> u64 {
    120
}
fn default_max_iterations() -> usize {
    10
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("max_tool_iterations", &self.max_tool_iterations)
            .field("gateway", &self.gateway)
            .field("store", &self.store)
            .field("agents", &self.agents)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &redact(&self.api_key))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Request body limit in bytes
    #[serde(default = "default_body_limit")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    8300
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_body_bytes: default_body_limit(),
        }
    }
}

/// Remote (Supabase/PostgREST) store settings.
///
/// The store is used only when both `url` and `api_key` are set.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_store_timeout")]
    pub timeout_secs: u64,
}

fn default_store_timeout() -> u64 {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            timeout_secs: default_store_timeout(),
        }
    }
}

impl StoreConfig {
    pub fn is_configured(&self) -> bool {
        self.normalized_url().is_some() && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// The store URL with an `https://` scheme and no trailing slash.
    ///
    /// URLs that already carry a scheme are left alone.
    pub fn normalized_url(&self) -> Option<String> {
        let url = self.url.as_deref()?.trim().trim_end_matches('/');
        if url.is_empty() {
            return None;
        }
        if url.starts_with("https://") || url.starts_with("http://") {
            Some(url.to_string())
        } else {
            Some(format!("https://{url}"))
        }
    }
}

/// Where one ACP sub-agent lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAgentConfig {
    /// Base URL of the agent's ACP server
    pub url: String,

    /// Agent name passed in `RunRequest.agent_name`
    pub agent_name: String,

    #[serde(default = "default_agent_timeout")]
    pub timeout_secs: u64,
}

fn default_agent_timeout() -> u64 {
    120
}

impl SubAgentConfig {
    fn local(port: u16, agent_name: &str) -> Self {
        Self {
            url: format!("http://localhost:{port}"),
            agent_name: agent_name.into(),
            timeout_secs: default_agent_timeout(),
        }
    }
}

/// Remote ACP sub-agents. The notes agent runs in process and has no entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default = "default_meeting")]
    pub meeting: SubAgentConfig,

    #[serde(default = "default_expense")]
    pub expense: SubAgentConfig,
}

fn default_meeting() -> SubAgentConfig {
    SubAgentConfig::local(8100, "meeting_manager")
}
fn default_expense() -> SubAgentConfig {
    SubAgentConfig::local(8200, "expense_tracker")
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            meeting: default_meeting(),
            expense: default_expense(),
        }
    }
}

impl AgentsConfig {
    /// All remote sub-agents with their config section names.
    pub fn all(&self) -> [(&'static str, &SubAgentConfig); 2] {
        [("meeting", &self.meeting), ("expense", &self.expense)]
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.concierge/config.toml).
    ///
    /// Then applies environment overrides:
    /// - `CONCIERGE_API_KEY` / `GOOGLE_API_KEY` for the LLM key
    /// - `CONCIERGE_PROVIDER`, `CONCIERGE_MODEL`
    /// - `MAX_TOKENS`, `TEMPERATURE`
    /// - `SUPABASE_URL`, `SUPABASE_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`AppConfig::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = lookup("CONCIERGE_API_KEY").or_else(|| lookup("GOOGLE_API_KEY"));
        }
        if let Some(provider) = lookup("CONCIERGE_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = lookup("CONCIERGE_MODEL") {
            self.default_model = model;
        }
        if let Some(raw) = lookup("MAX_TOKENS") {
            self.default_max_tokens = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("MAX_TOKENS must be an integer, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup("TEMPERATURE") {
            self.default_temperature = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("TEMPERATURE must be a number, got '{raw}'"))
            })?;
        }
        if let Some(url) = lookup("SUPABASE_URL") {
            self.store.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_API_KEY") {
            self.store.api_key = Some(key);
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".concierge")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.default_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "default_max_tokens must be > 0".into(),
            ));
        }

        if self.max_tool_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_tool_iterations must be > 0".into(),
            ));
        }

        for (section, agent) in self.agents.all() {
            if agent.url.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "agents.{section}.url must not be empty"
                )));
            }
            if agent.agent_name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "agents.{section}.agent_name must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// Check if an LLM API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Socket address string the gateway binds to.
    pub fn gateway_addr(&self) -> String {
        format!("{}:{}", self.gateway.host, self.gateway.port)
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            llm_timeout_secs: default_llm_timeout(),
            max_tool_iterations: default_max_iterations(),
            gateway: GatewayConfig::default(),
            store: StoreConfig::default(),
            agents: AgentsConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
