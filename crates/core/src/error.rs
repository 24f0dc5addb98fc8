//! Error types for the Concierge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level [`Error`]
//! wraps them all.

use thiserror::Error;

/// The top-level error type for all Concierge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Agent errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors raised by a storage backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("failed to decode remote record: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}

/// Errors raised while talking to (or running) an ACP agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Agent {agent} unreachable: {reason}")]
    Unreachable { agent: String, reason: String },

    #[error("Agent {agent} run failed: {reason}")]
    RunFailed { agent: String, reason: String },

    #[error("Agent {0} returned no output")]
    EmptyOutput(String),

    #[error("Run input contained no text")]
    EmptyInput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_displays_correctly() {
        let err = Error::Store(StoreError::Remote {
            status: 503,
            message: "service unavailable".into(),
        });
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("service unavailable"));
    }

    #[test]
    fn not_found_names_the_record() {
        let err = StoreError::NotFound("goal-42".into());
        assert_eq!(err.to_string(), "record goal-42 not found");
    }

    #[test]
    fn agent_error_converts_into_top_level() {
        let err: Error = AgentError::UnknownAgent("weather".into()).into();
        assert!(matches!(err, Error::Agent(AgentError::UnknownAgent(_))));
        assert!(err.to_string().contains("weather"));
    }
}
