//! Context Assembly
//!
//! Turns the front-line session history plus the latest user summary into
//! the first payload of a delegation. Pure: same inputs, same payload.

use crate::message::{ConversationItem, RequestPayload, Role};
use crate::tool::FunctionDeclaration;

/// Builds initial request payloads
#[derive(Clone, Debug)]
pub struct ContextAssembler {
    model: String,
    instructions: String,
    tools: Vec<FunctionDeclaration>,
}

impl ContextAssembler {
    pub fn new(
        model: impl Into<String>,
        instructions: impl Into<String>,
        tools: Vec<FunctionDeclaration>,
    ) -> Self {
        Self {
            model: model.into(),
            instructions: instructions.into(),
            tools,
        }
    }

    /// Assemble the payload for a new delegation
    ///
    /// Only `message` items of the history are forwarded. Empty history and
    /// an empty summary are both fine.
    pub fn assemble(&self, history: &[ConversationItem], new_information: &str) -> RequestPayload {
        let messages: Vec<&ConversationItem> =
            history.iter().filter(|item| item.is_message()).collect();

        let serialized =
            serde_json::to_string_pretty(&messages).unwrap_or_else(|_| "[]".to_owned());

        let mut payload = RequestPayload::new(self.model.clone(), self.tools.clone());
        payload.push_message(Role::System, self.instructions.clone());
        payload.push_message(
            Role::User,
            format!(
                "==== Conversation History ====\n{serialized}\n\n\
                 ==== Relevant Context From Last User Message ====\n{new_information}\n"
            ),
        );
        payload
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &[FunctionDeclaration] {
        &self.tools
    }
}
