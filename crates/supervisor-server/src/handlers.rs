//! HTTP Handlers

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use supervisor_core::{
    BreadcrumbTrail, ConversationItem, SessionContext, SessionId, SupervisorReply,
    TracingBreadcrumbs, observe::Breadcrumb, tool::FunctionDeclaration,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub tools: Vec<String>,
}

/// Body of `getNextResponseFromSupervisor`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextResponseRequest {
    /// Key information from the user's most recent message
    pub relevant_context_from_last_user_message: String,

    #[serde(default)]
    pub history: Vec<ConversationItem>,

    #[serde(default)]
    pub session_id: Option<String>,

    /// Return tool breadcrumbs for the transcript view
    #[serde(default)]
    pub breadcrumbs: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextResponseBody {
    #[serde(flatten)]
    pub reply: SupervisorReply,

    pub session_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumbs: Option<Vec<Breadcrumb>>,
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/tools", get(list_tools))
        .route("/api/supervisor/next-response", post(next_response))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model: state.supervisor.config().model.clone(),
        tools: state
            .supervisor
            .tools()
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect(),
    })
}

/// Tool declarations sent to the completion service
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<FunctionDeclaration>> {
    Json(state.supervisor.tools().declarations())
}

/// Delegate one user turn to the supervisor
///
/// Always answers 200: a failed delegation or an unreadable body is an
/// `{ "error": ... }` body the front-line agent turns into an apology.
pub async fn next_response(
    State(state): State<AppState>,
    payload: Result<Json<NextResponseRequest>, JsonRejection>,
) -> Json<NextResponseBody> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            let session_id = SessionId::new();
            tracing::warn!(
                session = %session_id,
                error = %rejection.body_text(),
                "Rejected next-response body"
            );
            return Json(NextResponseBody {
                reply: SupervisorReply::Error {
                    error: SupervisorReply::GENERIC_ERROR.into(),
                },
                session_id: session_id.to_string(),
                breadcrumbs: None,
            });
        }
    };

    let session_id = payload
        .session_id
        .map_or_else(SessionId::new, SessionId::from_string);

    let trail = payload.breadcrumbs.then(|| Arc::new(BreadcrumbTrail::new()));
    let session = SessionContext::new(payload.history).with_id(session_id.clone());
    let session = match &trail {
        Some(trail) => session.with_breadcrumbs(trail.clone()),
        None => session.with_breadcrumbs(Arc::new(TracingBreadcrumbs)),
    };

    let outcome = state
        .supervisor
        .next_response(&session, &payload.relevant_context_from_last_user_message)
        .await;

    if let supervisor_core::DelegationOutcome::Failed(e) = &outcome {
        tracing::error!(session = %session_id, error = %e, "Supervisor delegation failed");
    }

    Json(NextResponseBody {
        reply: outcome.into_reply(),
        session_id: session_id.to_string(),
        breadcrumbs: trail.map(|t| t.entries()),
    })
}
