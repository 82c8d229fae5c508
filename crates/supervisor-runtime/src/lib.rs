//! # supervisor-runtime
//!
//! Completion service clients for the supervisor delegation loop.
//!
//! ## Clients
//!
//! - **Responses** (default): any service speaking the Responses wire format
//!   (`model`, `input`, `tools`, `parallel_tool_calls`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use supervisor_runtime::ResponsesClient;
//!
//! let client = ResponsesClient::from_env()?;
//! let supervisor = SupervisorBuilder::new()
//!     .client(Arc::new(client))
//!     .build()?;
//! ```

pub mod responses;

pub use responses::{ResponsesClient, ResponsesConfig};

// Re-export core types for convenience
pub use supervisor_core::{
    CompletionClient, CompletionResult, DelegationOutcome, Result, Supervisor, SupervisorError,
    ToolRegistry,
};
