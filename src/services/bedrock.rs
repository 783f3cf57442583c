//! Bedrock backend plumbing
//!
//! The managed inference service is invoked through its vendor SDK, which
//! this crate does not reimplement. This backend validates and carries the
//! configuration (model id, region, credentials, sampling settings) and
//! satisfies the [`ModelBackend`] surface; the invocation operations report
//! `NotImplemented`.

use async_trait::async_trait;

use crate::{
    config::{AwsSettings, BedrockSettings},
    error::{AgentError, Result},
    messages::Message,
};

use super::{
    BackendConfig, ConfigUpdate, EventStream, GenerationOptions, ModelBackend, ToolSchema,
};

/// Configuration-only Bedrock backend
pub struct BedrockBackend {
    aws: AwsSettings,
    settings: BedrockSettings,
}

impl BedrockBackend {
    /// Create a new backend from AWS and Bedrock settings.
    ///
    /// # Errors
    ///
    /// Fails when the model id or region is empty.
    pub fn new(aws: AwsSettings, settings: BedrockSettings) -> Result<Self> {
        if settings.model_id.is_empty() {
            return Err(AgentError::InvalidConfig(
                "Bedrock model id must not be empty".to_string(),
            ));
        }
        if aws.region.is_empty() {
            return Err(AgentError::InvalidConfig(
                "AWS region must not be empty".to_string(),
            ));
        }

        tracing::info!(
            model_id = %settings.model_id,
            region = %aws.region,
            "initialized Bedrock backend configuration"
        );

        Ok(Self { aws, settings })
    }

    /// AWS region the backend is configured for
    #[must_use]
    pub fn region(&self) -> &str {
        &self.aws.region
    }

    /// Whether explicit credentials were supplied (as opposed to relying on
    /// the ambient credential chain)
    #[must_use]
    pub fn has_explicit_credentials(&self) -> bool {
        self.aws.access_key_id.is_some() && self.aws.secret_access_key.is_some()
    }
}

#[async_trait]
impl ModelBackend for BedrockBackend {
    fn provider(&self) -> &str {
        "bedrock"
    }

    fn model(&self) -> &str {
        &self.settings.model_id
    }

    async fn generate(
        &self,
        _messages: Vec<Message>,
        _options: GenerationOptions,
    ) -> Result<String> {
        Err(AgentError::NotImplemented(
            "Bedrock invocation is delegated to the vendor SDK".to_string(),
        ))
    }

    async fn stream(
        &self,
        _messages: Vec<Message>,
        _tool_specs: Vec<ToolSchema>,
        _system_prompt: Option<String>,
        _options: GenerationOptions,
    ) -> Result<EventStream> {
        Err(AgentError::NotImplemented(
            "Bedrock streaming is delegated to the vendor SDK".to_string(),
        ))
    }

    async fn structured_output(
        &self,
        _messages: Vec<Message>,
        _schema: serde_json::Value,
        _system_prompt: Option<String>,
        _options: GenerationOptions,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        Err(AgentError::NotImplemented(
            "Bedrock structured output is delegated to the vendor SDK".to_string(),
        ))
    }

    fn get_config(&self) -> BackendConfig {
        BackendConfig {
            model: self.settings.model_id.clone(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    fn update_config(&mut self, update: ConfigUpdate) {
        if let Some(temperature) = update.temperature {
            self.settings.temperature = temperature;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.settings.max_tokens = max_tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_construction_from_defaults() {
        let backend =
            BedrockBackend::new(AwsSettings::default(), BedrockSettings::default()).unwrap();
        assert_eq!(backend.provider(), "bedrock");
        assert_eq!(backend.model(), "anthropic.claude-3-sonnet-20240229-v1:0");
    }

    #[test]
    fn test_empty_model_id_rejected() {
        let settings = BedrockSettings {
            model_id: String::new(),
            ..BedrockSettings::default()
        };
        assert!(BedrockBackend::new(AwsSettings::default(), settings).is_err());
    }

    #[tokio::test]
    async fn test_invocation_reports_not_implemented() {
        let backend =
            BedrockBackend::new(AwsSettings::default(), BedrockSettings::default()).unwrap();
        let err = backend
            .generate(vec![Message::user("hi")], GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::NotImplemented(_)));
    }

    #[test]
    fn test_explicit_credentials_detection() {
        let aws = AwsSettings {
            region: "us-east-1".to_string(),
            access_key_id: Some("id".to_string()),
            secret_access_key: Some("secret".to_string()),
            session_token: None,
        };
        let backend = BedrockBackend::new(aws, BedrockSettings::default()).unwrap();
        assert!(backend.has_explicit_credentials());
        assert_eq!(backend.region(), "us-east-1");
    }
}
