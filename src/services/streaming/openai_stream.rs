//! Chat-completion stream translation
//!
//! Turns the raw SSE byte stream of a chat-completion response into the
//! host's event sequence: one `messageStart`, one `contentBlockStart`, a
//! `contentBlockDelta` per non-empty text fragment, one `contentBlockStop`,
//! one `messageStop`. The backend never interleaves content blocks, so the
//! block index is fixed at 0.

use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::{
    error::AgentError,
    messages::{Role, StopReason, StreamEvent, TextDelta},
};

use super::{sse::SseDecoder, ChatChunk};

/// Translate an SSE byte stream into the fixed event sequence.
///
/// A transport or decode failure yields one `Err` item and terminates the
/// sequence without the trailing stop frames; there is no buffering or
/// replay. Zero text deltas is a valid (empty) response.
pub fn into_event_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = crate::error::Result<StreamEvent>> + Send + 'static {
    async_stream::stream! {
        yield Ok(StreamEvent::MessageStart {
            role: Role::Assistant,
        });
        yield Ok(StreamEvent::ContentBlockStart {
            content_block_index: 0,
        });

        let mut decoder = SseDecoder::new();
        let mut stop_reason = StopReason::EndTurn;
        let mut byte_stream = Box::pin(byte_stream);
        let mut failed = false;

        'transport: while let Some(next) = byte_stream.next().await {
            let bytes = match next {
                Ok(bytes) => bytes,
                Err(e) => {
                    yield Err(AgentError::Http(e));
                    failed = true;
                    break 'transport;
                }
            };

            let text = match std::str::from_utf8(&bytes) {
                Ok(text) => text,
                Err(e) => {
                    yield Err(AgentError::Stream(format!("invalid UTF-8 in stream: {e}")));
                    failed = true;
                    break 'transport;
                }
            };

            for frame in decoder.feed(text) {
                if frame.is_done() {
                    break 'transport;
                }

                let chunk: ChatChunk = match serde_json::from_str(&frame.data) {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(AgentError::Stream(format!(
                            "malformed stream chunk: {e}"
                        )));
                        failed = true;
                        break 'transport;
                    }
                };

                if let Some(choice) = chunk.choices.first() {
                    if let Some(content) = &choice.delta.content {
                        if !content.is_empty() {
                            yield Ok(StreamEvent::ContentBlockDelta {
                                delta: TextDelta {
                                    text: content.clone(),
                                },
                                content_block_index: 0,
                            });
                        }
                    }
                    if let Some(reason) = &choice.finish_reason {
                        stop_reason = StopReason::from_finish_reason(reason);
                    }
                }
            }
        }

        if !failed {
            yield Ok(StreamEvent::ContentBlockStop {
                content_block_index: 0,
            });
            yield Ok(StreamEvent::MessageStop { stop_reason });
        }
    }
}
