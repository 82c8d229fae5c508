//! Nearest Store Tool
//!
//! Orders warehouses and pickup points by closeness to a postal code.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use supervisor_core::{Result as CoreResult, Tool, ToolResult, ToolSchema, tool::ParameterSchema};

use super::string_arg;
use crate::directory::Directory;
use crate::model::digits;

/// How many locations to return for a valid postal code
const NEAREST_LIMIT: usize = 3;

/// Tool for finding the nearest warehouse
pub struct NearestStoreTool {
    directory: Arc<dyn Directory>,
}

impl NearestStoreTool {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for NearestStoreTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "findNearestStore".into(),
            description: "Tool to find the nearest warehouse or pickup point to a customer, \
                          given their postal code."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "zip_code",
                "The customer's postal code.",
            )],
        }
    }

    async fn execute(&self, arguments: &Value) -> CoreResult<ToolResult> {
        let mut locations = self.directory.warehouses().await?;

        let zip = string_arg(arguments, "zip_code")
            .ok()
            .map(digits)
            .and_then(|z| z.parse::<u32>().ok());

        let Some(zip) = zip else {
            tracing::debug!("No usable postal code, returning every location");
            return Ok(ToolResult::new(json!({ "locations": locations })));
        };

        locations.sort_by_key(|w| w.zip_distance(zip).unwrap_or(u32::MAX));
        locations.truncate(NEAREST_LIMIT);

        Ok(ToolResult::new(json!({
            "zip_code": format!("{zip:06}"),
            "locations": locations,
        })))
    }
}
