//! # supervisor-core
//!
//! Two-tier delegation: a front-line agent talks to the user and hands every
//! non-trivial turn to a supervisor, which may consult tools before answering.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Supervisor                            │
//! │  ┌─────────────┐  ┌─────────────┐  ┌──────────────────────┐  │
//! │  │   Context   │  │ Delegation  │──│  CompletionClient    │  │
//! │  │  Assembler  │──│    Loop     │  │  (Strategy)          │  │
//! │  └─────────────┘  └─────────────┘  └──────────────────────┘  │
//! │                      │       │                                │
//! │              ┌───────┘       └────────┐                       │
//! │       ┌─────────────┐         ┌──────────────┐               │
//! │       │    Tool     │         │  Breadcrumb  │               │
//! │       │  Registry   │         │    Hook      │               │
//! │       └─────────────┘         └──────────────┘               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every boundary returns tagged values. The only failure a caller sees is
//! `DelegationOutcome::Failed`.

pub mod context;
pub mod delegation;
pub mod error;
pub mod message;
pub mod observe;
pub mod provider;
pub mod session;
pub mod tool;

pub use context::ContextAssembler;
pub use delegation::{
    DelegationOutcome, Supervisor, SupervisorBuilder, SupervisorConfig, SupervisorReply,
};
pub use error::{Result, SupervisorError};
pub use message::{ConversationItem, InputItem, RequestPayload, Role};
pub use observe::{BreadcrumbTrail, Breadcrumbs, TracingBreadcrumbs};
pub use provider::{CompletionClient, CompletionResult, ToolInvocationRequest};
pub use session::{SessionContext, SessionId};
pub use tool::{Tool, ToolRegistry, ToolResult, ToolSchema};
