//! Session Context
//!
//! What a front-line session hands to one delegation: its id, the history it
//! recorded so far, and an optional breadcrumb hook. Owned by the caller and
//! only read by the supervisor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::ConversationItem;
use crate::observe::Breadcrumbs;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context of one delegation invocation
#[derive(Clone, Default)]
pub struct SessionContext {
    pub id: SessionId,
    pub history: Vec<ConversationItem>,
    pub breadcrumbs: Option<Arc<dyn Breadcrumbs>>,
}

impl SessionContext {
    pub fn new(history: Vec<ConversationItem>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: SessionId) -> Self {
        self.id = id;
        self
    }

    pub fn with_breadcrumbs(mut self, hook: Arc<dyn Breadcrumbs>) -> Self {
        self.breadcrumbs = Some(hook);
        self
    }

    pub fn hook(&self) -> Option<&dyn Breadcrumbs> {
        self.breadcrumbs.as_deref()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("id", &self.id)
            .field("history", &self.history.len())
            .field("breadcrumbs", &self.breadcrumbs.is_some())
            .finish()
    }
}
