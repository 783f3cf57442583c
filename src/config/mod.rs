//! Configuration for agentry
//!
//! Settings come from the environment (optionally seeded from a `.env` file
//! loaded in `main`), one struct per concern, with development defaults.

pub mod settings;

use serde::{Deserialize, Serialize};

pub use self::settings::{
    AgentSettings, AwsSettings, BedrockSettings, KnowledgeBaseSettings, OpenAiSettings,
};
use crate::error::{AgentError, Result};

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Bedrock,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Bedrock => write!(f, "bedrock"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "bedrock" => Ok(Self::Bedrock),
            other => Err(AgentError::InvalidConfig(format!(
                "Unknown provider '{other}', expected 'openai' or 'bedrock'"
            ))),
        }
    }
}

/// Aggregate application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub openai: OpenAiSettings,
    pub aws: AwsSettings,
    pub bedrock: BedrockSettings,
    pub knowledge_base: KnowledgeBaseSettings,
    pub agent: AgentSettings,
}

impl Settings {
    /// Load all settings from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            openai: OpenAiSettings::from_env(),
            aws: AwsSettings::from_env(),
            bedrock: BedrockSettings::from_env(),
            knowledge_base: KnowledgeBaseSettings::from_env(),
            agent: AgentSettings::from_env(),
        }
    }

    /// Parse the configured provider selector
    pub fn provider(&self) -> Result<Provider> {
        self.agent.provider.parse()
    }
}
