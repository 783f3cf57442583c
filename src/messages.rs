//! Message and stream-event types for model conversations
//!
//! Defines the host-agnostic message shapes handed to model backends and the
//! stream-event frames handed back. The event wire shape is pattern-matched by
//! the consuming runtime, so the serialized kind and field names are part of
//! the contract and must not drift.

use serde::{Deserialize, Serialize};

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used in chat-completion requests
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Content block in a message
///
/// Text is the only variant actively produced here. Blocks that already carry
/// a structured form (tool use, tool results, images) pass through opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    /// Already-structured block forwarded to the backend untouched
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl ContentBlock {
    /// Create a text block
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Message content: a plain string or an ordered block sequence
///
/// The variant is decided once when the message is built; downstream code
/// matches on it instead of sniffing shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// Create a new user message with scalar text content
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a new assistant message with scalar text content
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a new system message with scalar text content
    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a message from an explicit block sequence
    #[must_use]
    pub fn with_blocks(role: Role, blocks: Vec<ContentBlock>) -> Self {
        Self {
            role,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Concatenated text of all text content in the message
    #[must_use]
    pub fn text_content(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    ContentBlock::Other(_) => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ToolUse,
    StopSequence,
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason` onto the host's stop-reason set.
    ///
    /// Unknown reasons fall back to `end_turn`.
    #[must_use]
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "length" => Self::MaxTokens,
            "tool_calls" | "function_call" => Self::ToolUse,
            "stop_sequence" => Self::StopSequence,
            _ => Self::EndTurn,
        }
    }
}

/// Incremental text fragment carried by a delta event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDelta {
    pub text: String,
}

/// One increment of a streaming response.
///
/// Serialized externally tagged with camelCase keys, e.g.
/// `{"contentBlockDelta":{"delta":{"text":"hi"},"contentBlockIndex":0}}`.
///
/// Every stream emits exactly one `MessageStart`, one `ContentBlockStart`,
/// zero or more `ContentBlockDelta`, one `ContentBlockStop`, and one
/// `MessageStop`, in that order. Only content-block index 0 is ever used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StreamEvent {
    MessageStart {
        role: Role,
    },
    ContentBlockStart {
        content_block_index: usize,
    },
    ContentBlockDelta {
        delta: TextDelta,
        content_block_index: usize,
    },
    ContentBlockStop {
        content_block_index: usize,
    },
    MessageStop {
        stop_reason: StopReason,
    },
}
