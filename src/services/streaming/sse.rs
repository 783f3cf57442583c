//! Incremental Server-Sent Events decoding
//!
//! Chat-completion streams arrive as SSE frames whose `data:` lines carry one
//! JSON chunk each, terminated by a literal `[DONE]` frame. The decoder
//! buffers partial lines across network chunks and yields only completed
//! frames.

/// One decoded SSE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Value of the `event:` field, if any
    pub event: Option<String>,

    /// Concatenated `data:` payload
    pub data: String,
}

impl SseFrame {
    /// The terminal marker on chat-completion streams
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.data == "[DONE]"
    }
}

/// Incremental SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    event: Option<String>,
    data: String,
    line_buffer: String,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes-as-text, returning every frame it completes.
    ///
    /// Partial lines and partially assembled frames are held until a later
    /// chunk finishes them.
    pub fn feed(&mut self, chunk: &str) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        self.line_buffer.push_str(chunk);

        while let Some(end) = self.line_buffer.find('\n') {
            let line = self.line_buffer[..end].trim_end_matches('\r').to_string();
            self.line_buffer.drain(..=end);

            if let Some(frame) = self.take_line(&line) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Flush a frame left unterminated when the transport closed
    pub fn flush(&mut self) -> Option<SseFrame> {
        if !self.line_buffer.is_empty() {
            let line = std::mem::take(&mut self.line_buffer);
            self.take_line(&line);
        }
        self.complete_frame()
    }

    fn take_line(&mut self, line: &str) -> Option<SseFrame> {
        // Blank line terminates the current frame
        if line.is_empty() {
            return self.complete_frame();
        }

        // Comment lines
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                if !self.data.is_empty() {
                    self.data.push('\n');
                }
                self.data.push_str(value);
            }
            _ => {}
        }

        None
    }

    fn complete_frame(&mut self) -> Option<SseFrame> {
        if self.data.is_empty() {
            self.event = None;
            return None;
        }
        Some(SseFrame {
            event: self.event.take(),
            data: std::mem::take(&mut self.data),
        })
    }
}
