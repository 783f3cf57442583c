//! Streaming support for model responses
//!
//! SSE decoding plus the translation from chat-completion stream chunks into
//! the host's fixed event sequence.

pub mod openai_stream;
pub mod sse;

pub use openai_stream::into_event_stream;
pub use sse::{SseDecoder, SseFrame};

use serde::Deserialize;

/// One parsed chat-completion stream chunk
///
/// Only the fields this adapter consumes are modeled; everything else in the
/// payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A choice inside a stream chunk
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub index: usize,

    #[serde(default)]
    pub delta: ChunkDelta,

    pub finish_reason: Option<String>,
}

/// Incremental delta carried by a choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    pub role: Option<String>,
    pub content: Option<String>,
}
