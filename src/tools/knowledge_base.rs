//! Knowledge-base retrieval tool
//!
//! Retrieval stub: validates the configured knowledge-base id and returns
//! placeholder results. The real vector-store query runs through the managed
//! service's SDK, which this crate treats as an external collaborator.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AgentError, Result};

use super::{Tool, ToolContext};

fn default_max_results() -> u32 {
    5
}

/// Input for the knowledge-base tool
#[derive(Debug, Deserialize)]
struct KnowledgeBaseInput {
    /// The search query
    query: String,

    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    max_results: u32,
}

/// Tool for querying a knowledge base
pub struct KnowledgeBaseTool;

#[async_trait]
impl Tool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    fn description(&self) -> String {
        "Search the configured knowledge base for information relevant to a query.".to_string()
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, input: Value, context: &ToolContext) -> Result<String> {
        let input: KnowledgeBaseInput = serde_json::from_value(input).map_err(|e| {
            AgentError::ToolExecution(format!("invalid knowledge_base input: {e}"))
        })?;

        tracing::info!(query = %input.query, "tool called: knowledge_base");

        let Some(kb_id) = &context.settings.knowledge_base.kb_id else {
            return Ok(
                "Error: Knowledge base id is not configured. Set KB_ID in your .env file."
                    .to_string(),
            );
        };

        // Placeholder retrieval: a production deployment would issue a vector
        // search against the configured store here.
        let results: Vec<String> = (1..=input.max_results.min(3))
            .map(|i| {
                format!(
                    "Result {i} (relevance: {:.2}):\nPlaceholder passage for query '{}' from knowledge base '{kb_id}'.\n",
                    1.0 - f64::from(i) * 0.1,
                    input.query,
                )
            })
            .collect();

        if results.is_empty() {
            return Ok(format!(
                "No results found in the knowledge base for query: '{}'",
                input.query
            ));
        }

        Ok(format!(
            "Knowledge Base Search Results for '{}':\n\n{}",
            input.query,
            results.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn context_with_kb(kb_id: Option<&str>) -> ToolContext {
        let mut settings = Settings::default();
        settings.knowledge_base.kb_id = kb_id.map(String::from);
        ToolContext { settings }
    }

    #[tokio::test]
    async fn test_unconfigured_kb_reports_error_text() {
        let result = KnowledgeBaseTool
            .call(
                serde_json::json!({"query": "rust"}),
                &context_with_kb(None),
            )
            .await
            .unwrap();
        assert!(result.starts_with("Error: Knowledge base id is not configured"));
    }

    #[tokio::test]
    async fn test_configured_kb_returns_results() {
        let result = KnowledgeBaseTool
            .call(
                serde_json::json!({"query": "rust", "max_results": 2}),
                &context_with_kb(Some("kb-123")),
            )
            .await
            .unwrap();
        assert!(result.contains("Knowledge Base Search Results for 'rust'"));
        assert!(result.contains("Result 1"));
        assert!(result.contains("Result 2"));
        assert!(!result.contains("Result 3"));
    }

    #[tokio::test]
    async fn test_zero_max_results() {
        let result = KnowledgeBaseTool
            .call(
                serde_json::json!({"query": "rust", "max_results": 0}),
                &context_with_kb(Some("kb-123")),
            )
            .await
            .unwrap();
        assert!(result.starts_with("No results found"));
    }
}
