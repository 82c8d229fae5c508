//! Tool System
//!
//! Tools are registered once at startup and resolved by name from the
//! delegation loop. An unknown name is not an error: it resolves to a
//! generic acknowledgment so the conversation degrades instead of aborting.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;

/// Structured result of one tool execution
///
/// Opaque to the delegation loop; serialized verbatim into the
/// `function_call_output` item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolResult(Value);

impl ToolResult {
    pub const fn new(data: Value) -> Self {
        Self(data)
    }

    /// Generic result for names nobody registered
    pub fn acknowledged() -> Self {
        Self(json!({ "result": true }))
    }

    /// Tool failure surfaced as data
    pub fn failure(error: impl Into<String>) -> Self {
        Self(json!({ "error": error.into() }))
    }

    pub const fn data(&self) -> &Value {
        &self.0
    }

    /// Compact JSON form used as the `output` string
    pub fn to_output_string(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for ToolResult {
    fn from(data: Value) -> Self {
        Self(data)
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

impl ParameterSchema {
    /// Required string parameter, the common case for lookups
    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: true,
            enum_values: None,
        }
    }
}

/// Tool definition schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// Strict function declaration for the outbound payload
    pub fn declaration(&self) -> FunctionDeclaration {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut property = json!({
                "type": param.param_type,
                "description": param.description,
            });
            if let Some(values) = &param.enum_values {
                property["enum"] = Value::Array(values.clone());
            }
            properties.insert(param.name.clone(), property);

            if param.required {
                required.push(param.name.clone());
            }
        }

        FunctionDeclaration {
            kind: FunctionDeclaration::FUNCTION.into(),
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }),
        }
    }
}

/// Wire form of a tool declaration in the request payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl FunctionDeclaration {
    pub const FUNCTION: &'static str = "function";
}

/// Tool trait - implement to add new lookups
///
/// Arguments arrive exactly as the supervisor produced them (possibly
/// `null` when they did not parse). Implementations should degrade to a
/// best-effort result rather than fail on missing fields.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: &Value) -> Result<ToolResult>;
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Resolve one invocation
    ///
    /// Never fails: unknown names acknowledge, tool errors become
    /// `{"error": ...}` data for the supervisor to interpret.
    pub async fn invoke(&self, name: &str, arguments: &Value) -> ToolResult {
        let Some(tool) = self.get(name) else {
            tracing::warn!(tool = name, "Unregistered tool requested, acknowledging");
            return ToolResult::acknowledged();
        };

        match tool.execute(arguments).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool failed");
                ToolResult::failure(e.to_string())
            }
        }
    }

    /// Get all tool schemas, sorted by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<_> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Declarations for the outbound payload, sorted by name
    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        self.schemas().iter().map(ToolSchema::declaration).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
