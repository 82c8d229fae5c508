//! Error Types for the Logistics Desk

use thiserror::Error;

use supervisor_core::SupervisorError;

pub type Result<T> = std::result::Result<T, DeskError>;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Invalid {name}: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("No account found for phone number ending {0}")]
    AccountNotFound(String),
}

impl From<DeskError> for SupervisorError {
    fn from(err: DeskError) -> Self {
        Self::ToolExecution(err.to_string())
    }
}
