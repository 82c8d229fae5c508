//! Policy Lookup Tool
//!
//! Keyword search over internal policy documents.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use supervisor_core::{Result as CoreResult, Tool, ToolResult, ToolSchema, tool::ParameterSchema};

use super::string_arg;
use crate::directory::Directory;

/// Tool for looking up policy documents by topic
pub struct PolicyLookupTool {
    directory: Arc<dyn Directory>,
}

impl PolicyLookupTool {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for PolicyLookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "lookupPolicyDocument".into(),
            description: "Tool to look up internal documents and policies by topic or keyword."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "topic",
                "The topic or keyword to search for in company policies or documents.",
            )],
        }
    }

    async fn execute(&self, arguments: &Value) -> CoreResult<ToolResult> {
        // No topic means the supervisor gets the whole catalogue.
        let topic = string_arg(arguments, "topic").unwrap_or_default();

        let documents: Vec<_> = self
            .directory
            .policies()
            .await?
            .into_iter()
            .filter(|doc| doc.matches(topic))
            .collect();

        tracing::debug!(topic, found = documents.len(), "Policy lookup");

        if documents.is_empty() {
            return Ok(ToolResult::new(json!({
                "topic": topic,
                "documents": [],
                "note": "No matching documents. Offer to connect the customer with an operator.",
            })));
        }

        Ok(ToolResult::new(json!({
            "topic": topic,
            "documents": documents,
        })))
    }
}
