//! Clock tool

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

use super::{Tool, ToolContext};

/// Tool reporting the current local time
pub struct ClockTool;

#[async_trait]
impl Tool for ClockTool {
    fn name(&self) -> &str {
        "clock"
    }

    fn description(&self) -> String {
        "Get the current date and time in RFC 3339 format.".to_string()
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn call(&self, _input: Value, _context: &ToolContext) -> Result<String> {
        tracing::info!("tool called: clock");
        Ok(chrono::Local::now().to_rfc3339())
    }
}
