//! Agent wrapper
//!
//! Thin conversational wrapper over a [`ModelBackend`]: keeps the
//! conversation history, carries the system prompt and registered tools, and
//! exposes batch and streaming run operations.

use std::pin::Pin;

use futures::{Stream, StreamExt};

use crate::{
    error::Result,
    messages::{Message, StreamEvent},
    services::{GenerationOptions, ModelBackend, ToolSchema},
    tools::DynTool,
};

/// Stream of response text fragments
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Conversational agent over a model backend
pub struct Agent {
    name: String,
    backend: Box<dyn ModelBackend>,
    system_prompt: String,
    tools: Vec<DynTool>,
    history: Vec<Message>,
}

impl Agent {
    /// Create a new agent.
    ///
    /// When no system prompt is supplied, a default one naming the backend
    /// provider is used.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        backend: Box<dyn ModelBackend>,
        system_prompt: Option<String>,
        tools: Vec<DynTool>,
    ) -> Self {
        let name = name.into();
        let system_prompt = system_prompt.unwrap_or_else(|| {
            format!(
                "You are a helpful AI assistant powered by {}. \
                 You provide accurate, thoughtful, and concise responses.",
                backend.provider()
            )
        });

        tracing::info!(
            agent = %name,
            provider = backend.provider(),
            model = backend.model(),
            "initialized agent"
        );

        Self {
            name,
            backend,
            system_prompt,
            tools,
            history: Vec::new(),
        }
    }

    /// Agent name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The active system prompt
    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Conversation history so far
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Schemas for all registered tools
    #[must_use]
    pub fn tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|tool| tool.schema()).collect()
    }

    /// Register an additional tool
    pub fn add_tool(&mut self, tool: DynTool) {
        tracing::info!(agent = %self.name, tool = tool.name(), "registered tool");
        self.tools.push(tool);
    }

    /// Drop the conversation history, keeping configuration and tools
    pub fn reset_conversation(&mut self) {
        self.history.clear();
        tracing::info!(agent = %self.name, "conversation reset");
    }

    /// Run one conversational turn and return the response text.
    ///
    /// The user input and the assistant response are both appended to the
    /// history.
    pub async fn run(&mut self, input: impl Into<String>) -> Result<String> {
        let input = input.into();
        tracing::info!(agent = %self.name, "processing user input");

        self.history.push(Message::user(input));

        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(Message::system(self.system_prompt.clone()));
        messages.extend(self.history.iter().cloned());

        let response = self
            .backend
            .generate(messages, GenerationOptions::default())
            .await?;

        self.history.push(Message::assistant(response.clone()));
        Ok(response)
    }

    /// Run one conversational turn, streaming the response text.
    ///
    /// The user input is appended to the history; the streamed response is
    /// not (callers that need it recorded can append it after draining the
    /// stream).
    pub async fn run_streaming(&mut self, input: impl Into<String>) -> Result<TextStream> {
        let input = input.into();
        tracing::info!(agent = %self.name, "processing user input (streaming)");

        self.history.push(Message::user(input));

        let events = self
            .backend
            .stream(
                self.history.clone(),
                self.tool_schemas(),
                Some(self.system_prompt.clone()),
                GenerationOptions::default(),
            )
            .await?;

        let text = events.filter_map(|event| async move {
            match event {
                Ok(StreamEvent::ContentBlockDelta { delta, .. }) => Some(Ok(delta.text)),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(text))
    }
}
