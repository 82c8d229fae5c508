//! Error Types

use thiserror::Error;

/// Result type alias for supervisor operations
pub type Result<T> = std::result::Result<T, SupervisorError>;

/// Supervisor error types
///
/// These travel as values (inside `CompletionResult::Error` and
/// `DelegationOutcome::Failed`), never as panics across the core.
#[derive(Error, Debug)]
pub enum SupervisorError {
    /// Network failure reaching the completion service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Completion service answered with a non-success status
    #[error("Completion service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Malformed completion response: {0}")]
    Decode(String),

    /// Completion service reported an error inside a 2xx body
    #[error("Completion service error: {0}")]
    Service(String),

    /// A single submission exceeded its deadline
    #[error("Completion round timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Supervisor kept requesting tools past the round guard
    #[error("Supervisor still requesting tools after {0} rounds")]
    RoundLimit(usize),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}
