//! Breadcrumb Hooks
//!
//! Optional sinks told about each tool execution. A hook can never affect a
//! delegation: errors and panics are swallowed where the loop calls it.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SupervisorError};

/// Observability hook capability
pub trait Breadcrumbs: Send + Sync {
    /// Record one breadcrumb
    fn notify(&self, title: &str, data: Option<&Value>) -> Result<()>;
}

/// Call a hook, ignoring any failure it reports or raises
pub fn notify_quietly(hook: Option<&dyn Breadcrumbs>, title: &str, data: Option<&Value>) {
    let Some(hook) = hook else {
        return;
    };

    match catch_unwind(AssertUnwindSafe(|| hook.notify(title, data))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(title, error = %e, "Breadcrumb hook failed"),
        Err(_) => tracing::debug!(title, "Breadcrumb hook panicked"),
    }
}

/// Hook that writes breadcrumbs to the tracing log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingBreadcrumbs;

impl Breadcrumbs for TracingBreadcrumbs {
    fn notify(&self, title: &str, data: Option<&Value>) -> Result<()> {
        match data {
            Some(data) => tracing::info!(%data, "{title}"),
            None => tracing::info!("{title}"),
        }
        Ok(())
    }
}

/// A recorded breadcrumb
#[derive(Clone, Debug, Serialize)]
pub struct Breadcrumb {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub at: DateTime<Utc>,
}

/// Hook that keeps breadcrumbs for the transcript layer
#[derive(Debug, Default)]
pub struct BreadcrumbTrail {
    entries: Mutex<Vec<Breadcrumb>>,
}

impl BreadcrumbTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<Breadcrumb> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.entries().into_iter().map(|b| b.title).collect()
    }
}

impl Breadcrumbs for BreadcrumbTrail {
    fn notify(&self, title: &str, data: Option<&Value>) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SupervisorError::Other("breadcrumb trail poisoned".into()))?;
        entries.push(Breadcrumb {
            title: title.to_owned(),
            data: data.cloned(),
            at: Utc::now(),
        });
        Ok(())
    }
}
