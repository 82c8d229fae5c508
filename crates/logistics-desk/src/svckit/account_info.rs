//! Account Info Tool
//!
//! Read-only account lookup by the caller's phone number.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use supervisor_core::{Result as CoreResult, Tool, ToolResult, ToolSchema, tool::ParameterSchema};

use super::string_arg;
use crate::directory::Directory;
use crate::error::DeskError;
use crate::model::digits;

/// Tool for reading customer account information
pub struct AccountInfoTool {
    directory: Arc<dyn Directory>,
}

impl AccountInfoTool {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }
}

fn not_found(reason: &DeskError) -> ToolResult {
    ToolResult::new(json!({
        "found": false,
        "reason": reason.to_string(),
    }))
}

#[async_trait]
impl Tool for AccountInfoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "getUserAccountInfo".into(),
            description: "Tool to get user account information. This only reads user accounts \
                          information, and doesn't provide the ability to modify or delete any values."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "phone_number",
                "Formatted as '(xxx) xxx-xxxx'. MUST be provided by the user, never a null or empty string.",
            )],
        }
    }

    async fn execute(&self, arguments: &Value) -> CoreResult<ToolResult> {
        let phone = match string_arg(arguments, "phone_number") {
            Ok(phone) => digits(phone),
            Err(e) => return Ok(not_found(&e)),
        };

        if phone.len() < 7 {
            return Ok(not_found(&DeskError::InvalidArgument {
                name: "phone_number".into(),
                reason: "too few digits".into(),
            }));
        }

        match self.directory.account_by_phone(&phone).await {
            Ok(account) => Ok(ToolResult::new(json!({
                "found": true,
                "account": account,
            }))),
            Err(e @ DeskError::AccountNotFound(_)) => Ok(not_found(&e)),
            Err(e) => Err(e.into()),
        }
    }
}
