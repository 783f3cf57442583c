//! Error types for agentry

use thiserror::Error;

/// Result type alias using [`AgentError`]
pub type Result<T> = std::result::Result<T, AgentError>;

/// Main error type for agentry
#[derive(Debug, Error)]
pub enum AgentError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing API credential for a provider
    #[error("Missing API key for provider '{provider}'. Set {env_var} in your environment or .env file.")]
    MissingApiKey { provider: String, env_var: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// API error returned by a backend
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Streaming protocol error
    #[error("Stream error: {0}")]
    Stream(String),

    /// Tool execution error
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Operation not implemented by this backend
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<String> for AgentError {
    fn from(s: String) -> Self {
        AgentError::Other(s)
    }
}

impl From<&str> for AgentError {
    fn from(s: &str) -> Self {
        AgentError::Other(s.to_string())
    }
}
