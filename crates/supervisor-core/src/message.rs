//! Conversation Items and Request Payloads
//!
//! `ConversationItem` is what the front-line session recorded; `InputItem`
//! is what the completion service receives. The two never mix: history is
//! serialized into a single user message by the context assembler.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::provider::ToolInvocationRequest;
use crate::tool::{FunctionDeclaration, ToolResult};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One recorded turn of the front-line session
///
/// Only the `type` tag is interpreted. Every other field is kept verbatim so
/// the item serializes back exactly as the session recorded it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationItem {
    /// Item discriminator (`message`, `function_call`, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Remaining fields, untouched
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ConversationItem {
    pub const MESSAGE: &'static str = "message";

    /// Create a message item with plain text content
    pub fn message(role: Role, content: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("role".into(), Value::String(role.to_string()));
        fields.insert("content".into(), Value::String(content.into()));
        Self {
            kind: Self::MESSAGE.into(),
            fields,
        }
    }

    /// Create a non-message bookkeeping item
    pub fn other(kind: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            fields,
        }
    }

    pub fn is_message(&self) -> bool {
        self.kind == Self::MESSAGE
    }

    /// Role of a message item, if it carries a recognizable one
    pub fn role(&self) -> Option<Role> {
        self.fields
            .get("role")
            .cloned()
            .and_then(|r| serde_json::from_value(r).ok())
    }
}

/// One entry of the outbound `input` array
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message {
        role: Role,
        content: String,
    },

    /// Echo of a tool invocation the service requested
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },

    /// Serialized result paired with the echo of the same `call_id`
    FunctionCallOutput {
        call_id: String,
        output: String,
    },
}

impl InputItem {
    pub fn system(content: impl Into<String>) -> Self {
        Self::Message {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::Message {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn call_id(&self) -> Option<&str> {
        match self {
            Self::Message { .. } => None,
            Self::FunctionCall { call_id, .. } | Self::FunctionCallOutput { call_id, .. } => {
                Some(call_id)
            }
        }
    }
}

/// Payload submitted to the completion service
///
/// Built fresh for each delegation invocation. Input items are append-only,
/// so a call echo always precedes its result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestPayload {
    model: String,
    input: Vec<InputItem>,
    tools: Vec<FunctionDeclaration>,
}

impl RequestPayload {
    pub fn new(model: impl Into<String>, tools: Vec<FunctionDeclaration>) -> Self {
        Self {
            model: model.into(),
            input: Vec::new(),
            tools,
        }
    }

    /// Append a message item
    pub fn push_message(&mut self, role: Role, content: impl Into<String>) {
        self.input.push(InputItem::Message {
            role,
            content: content.into(),
        });
    }

    /// Append the echo of `request` followed by its serialized result
    pub fn push_tool_exchange(&mut self, request: &ToolInvocationRequest, result: &ToolResult) {
        self.input.push(InputItem::FunctionCall {
            call_id: request.call_id.clone(),
            name: request.name.clone(),
            arguments: request.arguments.clone(),
        });
        self.input.push(InputItem::FunctionCallOutput {
            call_id: request.call_id.clone(),
            output: result.to_output_string(),
        });
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input(&self) -> &[InputItem] {
        &self.input
    }

    pub fn tools(&self) -> &[FunctionDeclaration] {
        &self.tools
    }

    /// Number of input items
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}
