//! Tool system
//!
//! Provides the [`Tool`] trait and the built-in tools the agent can call:
//! a clock, a calculator, and a knowledge-base retrieval stub.

pub mod calculator;
pub mod clock;
pub mod knowledge_base;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{config::Settings, error::Result, services::ToolSchema};

pub use calculator::CalculatorTool;
pub use clock::ClockTool;
pub use knowledge_base::KnowledgeBaseTool;

/// Context available to a tool during execution
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Application settings (knowledge-base ids, regions, …)
    pub settings: Settings,
}

/// A callable capability exposed to the model.
///
/// Tools return their result as text for the model to read; recoverable
/// problems (bad expression, unconfigured knowledge base) are reported as
/// `Error: …` result text rather than failing the call, so the model can
/// react to them.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as advertised to the model
    fn name(&self) -> &str;

    /// One-line description of what the tool does
    fn description(&self) -> String;

    /// JSON schema for the tool input
    fn input_schema(&self) -> Value;

    /// Whether the tool only reads state
    fn is_read_only(&self) -> bool {
        true
    }

    /// Execute the tool
    async fn call(&self, input: Value, context: &ToolContext) -> Result<String>;

    /// Schema handed to model backends
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

/// Shared trait-object type for registered tools
pub type DynTool = Arc<dyn Tool>;

/// The built-in tool set
#[must_use]
pub fn builtin_tools() -> Vec<DynTool> {
    vec![
        Arc::new(ClockTool),
        Arc::new(CalculatorTool),
        Arc::new(KnowledgeBaseTool),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tool_names() {
        let names: Vec<String> = builtin_tools()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["clock", "calculator", "knowledge_base"]);
    }

    #[test]
    fn test_schemas_are_objects() {
        for tool in builtin_tools() {
            let schema = tool.schema();
            assert!(!schema.description.is_empty());
            assert_eq!(schema.input_schema["type"], "object");
        }
    }
}
