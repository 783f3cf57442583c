//! Agentry: conversational agent PoC with pluggable LLM backends
//!
//! Wires a thin agent wrapper to one of two model backends — an
//! OpenAI-compatible chat-completion API (fully implemented) or a managed
//! cloud inference service (configuration plumbing over an external SDK) —
//! and exposes a small set of callable tools.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod messages;
pub mod services;
pub mod tools;

// Re-exports for convenience
pub use error::{AgentError, Result};
