//! Completion Client Strategy
//!
//! Defines the single capability the delegation loop needs from a
//! completion service: submit a payload, get back a tagged result.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use supervisor_core::provider::{CompletionClient, CompletionResult};
//!
//! let client = ResponsesClient::from_env()?;
//!
//! match client.submit(&payload).await {
//!     CompletionResult::Answer(messages) => { /* done */ }
//!     CompletionResult::ToolInvocations(calls) => { /* resolve */ }
//!     CompletionResult::Error(e) => { /* abort */ }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SupervisorError;
use crate::message::RequestPayload;

/// One item of the service's `output` array
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },

    FunctionCall {
        call_id: String,
        name: String,
        #[serde(default)]
        arguments: String,
    },

    /// Reasoning traces and anything else the loop does not act on
    #[serde(other)]
    Other,
}

/// One content part of an output message
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    OutputText { text: String },

    #[serde(other)]
    Other,
}

/// A tool execution the supervisor asked for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    pub call_id: String,
    pub name: String,

    /// Raw serialized arguments, echoed back unchanged
    pub arguments: String,
}

impl ToolInvocationRequest {
    /// Parse the raw argument string
    ///
    /// Empty arguments mean `{}`. Unparseable arguments become `null`; the
    /// tool is expected to degrade.
    pub fn parsed_arguments(&self) -> Value {
        if self.arguments.trim().is_empty() {
            return Value::Object(serde_json::Map::new());
        }

        serde_json::from_str(&self.arguments).unwrap_or_else(|e| {
            tracing::warn!(
                tool = %self.name,
                call_id = %self.call_id,
                error = %e,
                "Unparseable tool arguments"
            );
            Value::Null
        })
    }
}

/// A final message, as ordered text segments
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMessage {
    pub segments: Vec<String>,
}

impl AnswerMessage {
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Segments concatenated without separator
    pub fn text(&self) -> String {
        self.segments.concat()
    }
}

/// Outcome of one submission
#[derive(Debug)]
pub enum CompletionResult {
    /// No tool invocations; these messages are final
    Answer(Vec<AnswerMessage>),

    /// Tool invocations in service order
    ToolInvocations(Vec<ToolInvocationRequest>),

    /// Transport or service failure
    Error(SupervisorError),
}

impl CompletionResult {
    /// Classify a decoded `output` array
    ///
    /// Invocations take precedence: any message text alongside them is
    /// discarded.
    pub fn from_output(items: Vec<OutputItem>) -> Self {
        let mut invocations = Vec::new();
        let mut messages = Vec::new();

        for item in items {
            match item {
                OutputItem::FunctionCall {
                    call_id,
                    name,
                    arguments,
                } => invocations.push(ToolInvocationRequest {
                    call_id,
                    name,
                    arguments,
                }),
                OutputItem::Message { content } => {
                    let segments = content
                        .into_iter()
                        .filter_map(|part| match part {
                            ContentPart::OutputText { text } => Some(text),
                            ContentPart::Other => None,
                        })
                        .collect();
                    messages.push(AnswerMessage { segments });
                }
                OutputItem::Other => {}
            }
        }

        if invocations.is_empty() {
            Self::Answer(messages)
        } else {
            Self::ToolInvocations(invocations)
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Join final messages: segments without separator, messages by newline
pub fn answer_text(messages: &[AnswerMessage]) -> String {
    messages
        .iter()
        .map(AnswerMessage::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strategy trait for completion services
///
/// Implementations must not mutate the payload, must not retry, and must
/// report every failure as `CompletionResult::Error` instead of panicking.
/// Outbound requests always disable parallel tool calls.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform one round-trip with the completion service
    async fn submit(&self, payload: &RequestPayload) -> CompletionResult;

    /// Human-readable client name for logs
    fn name(&self) -> &str {
        "completion"
    }
}
