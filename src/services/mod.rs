//! Model backend layer
//!
//! Adapters translating between the host-agnostic message shapes in
//! [`crate::messages`] and provider wire formats. The OpenAI-compatible
//! backend is fully implemented; Bedrock is configuration plumbing over an
//! external SDK and stays a stub.

pub mod bedrock;
pub mod openai;
pub mod streaming;

pub use bedrock::BedrockBackend;
pub use openai::OpenAiBackend;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::{
    config::{Provider, Settings},
    error::Result,
    messages::{Message, StreamEvent},
};

/// Per-call generation options
///
/// Caller-supplied values take precedence over the backend's configured
/// defaults; `None` means "use the backend default".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Read-only snapshot of a backend's configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Configuration fields mutable between calls via
/// [`ModelBackend::update_config`]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Tool specification handed to a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Lazy pull-based event sequence produced by [`ModelBackend::stream`]
///
/// Each item is produced only as the consumer polls; production blocks on the
/// underlying network read. The sequence is finite and not restartable.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Uniform surface over model providers.
///
/// Configuration is read-only during a call and may be mutated between calls
/// with [`update_config`](Self::update_config); no internal locking is
/// provided, so callers must not update concurrently with an in-flight call.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Provider name (e.g. "openai", "bedrock")
    fn provider(&self) -> &str;

    /// Model identifier
    fn model(&self) -> &str;

    /// Generate a complete response, returning the text of the first choice.
    ///
    /// Returns an empty string when the backend produces no content.
    /// Transport and authentication failures propagate unchanged.
    async fn generate(&self, messages: Vec<Message>, options: GenerationOptions)
        -> Result<String>;

    /// Stream a response as the fixed event sequence described in
    /// [`crate::messages::StreamEvent`].
    ///
    /// `tool_specs` is accepted for interface parity but not yet forwarded on
    /// the streaming path. A `system_prompt`, when present, is prepended as a
    /// synthetic system-role message.
    async fn stream(
        &self,
        messages: Vec<Message>,
        tool_specs: Vec<ToolSchema>,
        system_prompt: Option<String>,
        options: GenerationOptions,
    ) -> Result<EventStream>;

    /// Generate output intended to match `schema`.
    ///
    /// Current backends wrap the plain generate text in a `{"response": …}`
    /// map and perform no schema validation.
    async fn structured_output(
        &self,
        messages: Vec<Message>,
        schema: serde_json::Value,
        system_prompt: Option<String>,
        options: GenerationOptions,
    ) -> Result<serde_json::Map<String, serde_json::Value>>;

    /// Snapshot of the current configuration
    fn get_config(&self) -> BackendConfig;

    /// Apply a configuration update between calls
    fn update_config(&mut self, update: ConfigUpdate);
}

/// Create a backend for the configured provider.
///
/// # Errors
///
/// Returns an error when the selected provider's settings are invalid, in
/// particular when the OpenAI API key is absent.
pub fn create_backend(settings: &Settings) -> Result<Box<dyn ModelBackend>> {
    match settings.provider()? {
        Provider::OpenAi => Ok(Box::new(openai::OpenAiBackend::new(
            settings.openai.clone(),
        )?)),
        Provider::Bedrock => Ok(Box::new(bedrock::BedrockBackend::new(
            settings.aws.clone(),
            settings.bedrock.clone(),
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_rejects_missing_openai_key() {
        let settings = Settings::default();
        assert!(settings.openai.api_key.is_none());
        assert!(create_backend(&settings).is_err());
    }

    #[test]
    fn test_factory_builds_bedrock_stub() {
        let mut settings = Settings::default();
        settings.agent.provider = "bedrock".to_string();
        let backend = create_backend(&settings).unwrap();
        assert_eq!(backend.provider(), "bedrock");
    }
}
