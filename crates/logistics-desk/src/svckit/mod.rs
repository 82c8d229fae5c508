//! Service Kit - Supervisor Tools
//!
//! Lookup tools that implement `supervisor_core::Tool` for the logistics desk.

mod account_info;
mod nearest_store;
mod policy_lookup;

pub use account_info::AccountInfoTool;
pub use nearest_store::NearestStoreTool;
pub use policy_lookup::PolicyLookupTool;

use serde_json::Value;

use crate::error::{DeskError, Result};

/// Non-empty string argument
fn string_arg<'a>(arguments: &'a Value, name: &str) -> Result<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DeskError::MissingArgument(name.to_owned()))
}
