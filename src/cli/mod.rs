//! CLI argument parsing

use clap::{Parser, Subcommand};

/// Agentry: conversational agent PoC with pluggable LLM backends
#[derive(Debug, Parser)]
#[command(name = "agentry")]
#[command(about = "Conversational agent PoC with pluggable LLM backends", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a single query and print the response
    Query {
        /// The query to send to the agent
        query: String,
    },

    /// Run a single query, streaming the response as it arrives
    Stream {
        /// The query to send to the agent
        query: String,
    },

    /// List the built-in tools
    Tools,

    /// Show version information
    Version,
}

impl Cli {
    /// Parse CLI arguments from the environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
