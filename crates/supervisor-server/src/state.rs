//! Application State

use std::sync::Arc;

use supervisor_core::Supervisor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Supervisor with its completion client and tool registry
    pub supervisor: Arc<Supervisor>,
}
