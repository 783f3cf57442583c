//! Environment-driven application settings
//!
//! Each settings struct maps one group of environment variables and carries
//! defaults suitable for local development. Only the API credential is
//! validated, and only for presence, at backend construction time.

use serde::{Deserialize, Serialize};

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_string(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// OpenAI configuration (`OPENAI_*`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiSettings {
    /// API key; absence is a fatal construction error for the backend
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Custom API endpoint (OpenAI-compatible servers, test doubles)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Maximum output tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o".to_string(),
            base_url: None,
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

impl OpenAiSettings {
    /// Load from `OPENAI_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env_string("OPENAI_API_KEY"),
            model: env_string("OPENAI_MODEL").unwrap_or(defaults.model),
            base_url: env_string("OPENAI_BASE_URL"),
            max_tokens: env_parsed("OPENAI_MAX_TOKENS", defaults.max_tokens),
            temperature: env_parsed("OPENAI_TEMPERATURE", defaults.temperature),
        }
    }
}

/// AWS credentials and region (`AWS_*`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsSettings {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

impl AwsSettings {
    /// Load from `AWS_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            region: env_string("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: env_string("AWS_ACCESS_KEY_ID"),
            secret_access_key: env_string("AWS_SECRET_ACCESS_KEY"),
            session_token: env_string("AWS_SESSION_TOKEN"),
        }
    }
}

/// Bedrock model configuration (`BEDROCK_*`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BedrockSettings {
    pub model_id: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for BedrockSettings {
    fn default() -> Self {
        Self {
            model_id: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

impl BedrockSettings {
    /// Load from `BEDROCK_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model_id: env_string("BEDROCK_MODEL_ID").unwrap_or(defaults.model_id),
            max_tokens: env_parsed("BEDROCK_MAX_TOKENS", defaults.max_tokens),
            temperature: env_parsed("BEDROCK_TEMPERATURE", defaults.temperature),
        }
    }
}

/// Knowledge-base configuration (`KB_*`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseSettings {
    /// Knowledge-base identifier; the retrieval tool reports an error when unset
    pub kb_id: Option<String>,
    pub region: String,
}

impl Default for KnowledgeBaseSettings {
    fn default() -> Self {
        Self {
            kb_id: None,
            region: "us-east-1".to_string(),
        }
    }
}

impl KnowledgeBaseSettings {
    /// Load from `KB_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            kb_id: env_string("KB_ID"),
            region: env_string("KB_REGION").unwrap_or(defaults.region),
        }
    }
}

/// Agent-level configuration (`AGENT_*`, `LOG_LEVEL`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    pub agent_name: String,
    /// Backend selector: "openai" or "bedrock"
    pub provider: String,
    pub log_level: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            agent_name: "agentry-poc".to_string(),
            provider: "openai".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AgentSettings {
    /// Load from `AGENT_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            agent_name: env_string("AGENT_NAME").unwrap_or(defaults.agent_name),
            provider: env_string("AGENT_PROVIDER").unwrap_or(defaults.provider),
            log_level: env_string("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}
