//! OpenAI chat-completion backend
//!
//! Translates the host-agnostic message list into the chat-completion wire
//! format, invokes the endpoint (batch or streaming), and translates results
//! back. Also usable against OpenAI-compatible servers via a custom base URL.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::{
    config::OpenAiSettings,
    error::{AgentError, Result},
    messages::{ContentBlock, Message, MessageContent},
};

use super::{
    streaming::into_event_stream, BackendConfig, ConfigUpdate, EventStream, GenerationOptions,
    ModelBackend, ToolSchema,
};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completion backend
#[derive(Debug)]
pub struct OpenAiBackend {
    client: Client,
    settings: OpenAiSettings,
    base_url: String,
}

impl OpenAiBackend {
    /// Create a new backend.
    ///
    /// # Errors
    ///
    /// Fails with [`AgentError::MissingApiKey`] when no API key is configured.
    /// No network I/O happens here.
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| AgentError::MissingApiKey {
                provider: "openai".to_string(),
                env_var: "OPENAI_API_KEY".to_string(),
            })?;

        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::AUTHORIZATION,
                    header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                        .map_err(|_| {
                            AgentError::InvalidConfig("Invalid API key format".to_string())
                        })?,
                );
                headers
            })
            .build()?;

        tracing::info!(model = %settings.model, "initialized OpenAI backend");

        Ok(Self {
            client,
            settings,
            base_url,
        })
    }

    /// Normalize one message into the wire `{role, content}` shape.
    ///
    /// Scalar text passes through. Block sequences are normalized per block
    /// and collapsed back to a scalar when exactly one text block remains,
    /// matching the endpoint's preference for string content when
    /// unambiguous.
    fn normalize_message(message: &Message) -> WireMessage {
        let content = match &message.content {
            MessageContent::Text(text) => WireContent::Text(text.clone()),
            MessageContent::Blocks(blocks) => {
                let normalized: Vec<serde_json::Value> =
                    blocks.iter().map(Self::normalize_block).collect();

                let single_text = normalized.len() == 1
                    && normalized[0].get("type").and_then(|t| t.as_str()) == Some("text")
                    && normalized[0].get("text").is_some_and(|t| t.is_string());

                if single_text {
                    let text = normalized[0]["text"]
                        .as_str()
                        .unwrap_or_default()
                        .to_string();
                    WireContent::Text(text)
                } else {
                    WireContent::Blocks(normalized)
                }
            }
        };

        WireMessage {
            role: message.role.as_str().to_string(),
            content,
        }
    }

    /// Normalize one content block to a typed dict.
    ///
    /// Blocks with an explicit `type` pass through opaquely. A dict carrying
    /// `text` but no `type` is tagged as text. Anything else is coerced to a
    /// text block via string conversion (lenient by default).
    fn normalize_block(block: &ContentBlock) -> serde_json::Value {
        match block {
            ContentBlock::Text { text } => serde_json::json!({
                "type": "text",
                "text": text,
            }),
            ContentBlock::Other(value) => match value.as_object() {
                Some(object) if object.contains_key("type") => value.clone(),
                Some(object) if object.contains_key("text") => {
                    let mut tagged = object.clone();
                    tagged.insert(
                        "type".to_string(),
                        serde_json::Value::String("text".to_string()),
                    );
                    serde_json::Value::Object(tagged)
                }
                _ => {
                    let text = match value {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    serde_json::json!({"type": "text", "text": text})
                }
            },
        }
    }

    /// Build the request body, optionally prepending a system prompt.
    fn build_request(
        &self,
        messages: &[Message],
        system_prompt: Option<&str>,
        options: GenerationOptions,
        stream: bool,
    ) -> ChatRequest {
        let mut wire_messages = Vec::with_capacity(messages.len() + 1);

        if let Some(system) = system_prompt {
            wire_messages.push(WireMessage {
                role: "system".to_string(),
                content: WireContent::Text(system.to_string()),
            });
        }

        wire_messages.extend(messages.iter().map(Self::normalize_message));

        ChatRequest {
            model: self.settings.model.clone(),
            messages: wire_messages,
            temperature: options.temperature.unwrap_or(self.settings.temperature),
            max_tokens: options.max_tokens.unwrap_or(self.settings.max_tokens),
            stream: if stream { Some(true) } else { None },
        }
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AgentError::Api {
                provider: "openai".to_string(),
                message: format!("HTTP {status}: {error_text}"),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    fn provider(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn generate(
        &self,
        messages: Vec<Message>,
        options: GenerationOptions,
    ) -> Result<String> {
        let request = self.build_request(&messages, None, options, false);

        tracing::debug!(
            model = %request.model,
            message_count = request.messages.len(),
            "sending completion request"
        );

        let response = self.post_chat(&request).await?;
        let api_response: ChatResponse = response.json().await?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(text)
    }

    async fn stream(
        &self,
        messages: Vec<Message>,
        tool_specs: Vec<ToolSchema>,
        system_prompt: Option<String>,
        options: GenerationOptions,
    ) -> Result<EventStream> {
        // TODO: forward tool specs once the streaming path handles tool_calls
        // deltas; until then they are accepted for interface parity only.
        let _ = tool_specs;

        let request = self.build_request(&messages, system_prompt.as_deref(), options, true);

        tracing::debug!(
            model = %request.model,
            message_count = request.messages.len(),
            "opening completion stream"
        );

        let response = self.post_chat(&request).await?;
        Ok(Box::pin(into_event_stream(response.bytes_stream())))
    }

    async fn structured_output(
        &self,
        messages: Vec<Message>,
        schema: serde_json::Value,
        system_prompt: Option<String>,
        options: GenerationOptions,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        // TODO: request schema-conforming output via response_format
        // json_schema and validate the result; for now the generate text is
        // wrapped unvalidated.
        let _ = schema;

        let mut messages = messages;
        if let Some(system) = system_prompt {
            messages.insert(0, Message::system(system));
        }

        let text = self.generate(messages, options).await?;

        let mut output = serde_json::Map::new();
        output.insert("response".to_string(), serde_json::Value::String(text));
        Ok(output)
    }

    fn get_config(&self) -> BackendConfig {
        BackendConfig {
            model: self.settings.model.clone(),
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

// Chat-completion wire types

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: WireContent,
}

/// Scalar string content or a typed block list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Blocks(Vec<serde_json::Value>),
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;
    use pretty_assertions::assert_eq;

    fn backend() -> OpenAiBackend {
        OpenAiBackend::new(OpenAiSettings {
            api_key: Some("test-key".to_string()),
            ..OpenAiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_missing_api_key_fails_construction() {
        let err = OpenAiBackend::new(OpenAiSettings::default()).unwrap_err();
        assert!(matches!(err, AgentError::MissingApiKey { .. }));
    }

    #[test]
    fn test_scalar_messages_keep_length_and_pairs() {
        let backend = backend();
        let messages = vec![
            Message::system("Be terse"),
            Message::user("2+2?"),
            Message::assistant("4"),
        ];
        let request =
            backend.build_request(&messages, None, GenerationOptions::default(), false);

        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(
            request.messages[0].content,
            WireContent::Text("Be terse".into())
        );
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, WireContent::Text("2+2?".into()));
        assert_eq!(request.messages[2].role, "assistant");
    }

    #[test]
    fn test_system_prompt_prepended() {
        let backend = backend();
        let messages = vec![Message::user("2+2?")];
        let request = backend.build_request(
            &messages,
            Some("Be terse"),
            GenerationOptions::default(),
            true,
        );

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(
            request.messages[0].content,
            WireContent::Text("Be terse".into())
        );
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.stream, Some(true));
    }

    #[test]
    fn test_single_text_block_collapses_to_scalar() {
        let message =
            Message::with_blocks(Role::User, vec![ContentBlock::text("hello")]);
        let wire = OpenAiBackend::normalize_message(&message);
        assert_eq!(wire.content, WireContent::Text("hello".into()));
    }

    #[test]
    fn test_two_text_blocks_stay_tagged_list() {
        let message = Message::with_blocks(
            Role::User,
            vec![ContentBlock::text("a"), ContentBlock::text("b")],
        );
        let wire = OpenAiBackend::normalize_message(&message);

        match wire.content {
            WireContent::Blocks(blocks) => {
                assert_eq!(blocks.len(), 2);
                assert_eq!(blocks[0]["type"], "text");
                assert_eq!(blocks[0]["text"], "a");
                assert_eq!(blocks[1]["type"], "text");
                assert_eq!(blocks[1]["text"], "b");
            }
            WireContent::Text(_) => panic!("expected block list"),
        }
    }

    #[test]
    fn test_untyped_text_dict_gets_tagged() {
        let message = Message::with_blocks(
            Role::User,
            vec![
                ContentBlock::Other(serde_json::json!({"text": "raw"})),
                ContentBlock::text("other"),
            ],
        );
        let wire = OpenAiBackend::normalize_message(&message);

        match wire.content {
            WireContent::Blocks(blocks) => {
                assert_eq!(blocks[0]["type"], "text");
                assert_eq!(blocks[0]["text"], "raw");
            }
            WireContent::Text(_) => panic!("expected block list"),
        }
    }

    #[test]
    fn test_typed_dict_passes_through_opaquely() {
        let tool_result = serde_json::json!({
            "type": "tool_result",
            "tool_use_id": "t1",
            "content": "4"
        });
        let message = Message::with_blocks(
            Role::User,
            vec![
                ContentBlock::Other(tool_result.clone()),
                ContentBlock::text("and"),
            ],
        );
        let wire = OpenAiBackend::normalize_message(&message);

        match wire.content {
            WireContent::Blocks(blocks) => assert_eq!(blocks[0], tool_result),
            WireContent::Text(_) => panic!("expected block list"),
        }
    }

    #[test]
    fn test_unrecognized_value_coerced_to_text() {
        let message = Message::with_blocks(
            Role::User,
            vec![
                ContentBlock::Other(serde_json::json!(42)),
                ContentBlock::text("tail"),
            ],
        );
        let wire = OpenAiBackend::normalize_message(&message);

        match wire.content {
            WireContent::Blocks(blocks) => {
                assert_eq!(blocks[0]["type"], "text");
                assert_eq!(blocks[0]["text"], "42");
            }
            WireContent::Text(_) => panic!("expected block list"),
        }
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let backend = backend();
        let messages = vec![
            Message::user("same input"),
            Message::with_blocks(Role::User, vec![ContentBlock::text("block")]),
        ];
        let options = GenerationOptions {
            temperature: Some(0.0),
            max_tokens: None,
        };

        let first = backend.build_request(&messages, Some("sys"), options, false);
        let second = backend.build_request(&messages, Some("sys"), options, false);

        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_options_override_defaults() {
        let backend = backend();
        let request = backend.build_request(
            &[Message::user("hi")],
            None,
            GenerationOptions {
                temperature: Some(0.2),
                max_tokens: Some(128),
            },
            false,
        );
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 128);

        let defaults =
            backend.build_request(&[Message::user("hi")], None, GenerationOptions::default(), false);
        assert!((defaults.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(defaults.max_tokens, 4096);
    }

    #[test]
    fn test_update_config_between_calls() {
        let mut backend = backend();
        backend.update_config(ConfigUpdate {
            temperature: Some(0.1),
            max_tokens: Some(64),
        });

        let config = backend.get_config();
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.model, "gpt-4o");
    }
}
