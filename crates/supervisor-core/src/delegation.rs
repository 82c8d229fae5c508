//! Delegation Loop
//!
//! Drives one delegation from the front-line agent to a final answer:
//!
//! ```text
//! AWAITING_COMPLETION ──(invocations)──▶ RESOLVING_TOOLS ──▶ AWAITING_COMPLETION
//!        │                                                         │
//!        ├──(no invocations)──▶ DONE                               │
//!        └──(error sentinel)──▶ ABORTED ◀──────────────────────────┘
//! ```
//!
//! Tools of one round run strictly one after another in service order, and
//! each appends its echo and result before the next starts.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::context::ContextAssembler;
use crate::error::{Result, SupervisorError};
use crate::message::RequestPayload;
use crate::observe::{Breadcrumbs, notify_quietly};
use crate::provider::{CompletionClient, CompletionResult, ToolInvocationRequest, answer_text};
use crate::session::SessionContext;
use crate::tool::ToolRegistry;

/// Supervisor configuration
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Model identifier sent with every payload
    pub model: String,

    /// Maximum submissions per delegation; 0 disables the guard
    pub max_rounds: usize,

    /// Deadline for a single submission
    pub round_timeout: Option<Duration>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            max_rounds: 8,
            round_timeout: None,
        }
    }
}

const DEFAULT_MODEL: &str = "gpt-4.1";

impl SupervisorConfig {
    /// Read `SUPERVISOR_MODEL`, `SUPERVISOR_MAX_ROUNDS` and
    /// `SUPERVISOR_ROUND_TIMEOUT_SECS`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let model = std::env::var("SUPERVISOR_MODEL").unwrap_or(defaults.model);

        let max_rounds = match std::env::var("SUPERVISOR_MAX_ROUNDS") {
            Ok(raw) => raw.parse().map_err(|_| {
                SupervisorError::Config(format!("SUPERVISOR_MAX_ROUNDS is not a number: {raw}"))
            })?,
            Err(_) => defaults.max_rounds,
        };

        let round_timeout = match std::env::var("SUPERVISOR_ROUND_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(raw.parse().map_err(|_| {
                SupervisorError::Config(format!(
                    "SUPERVISOR_ROUND_TIMEOUT_SECS is not a number: {raw}"
                ))
            })?)),
            Err(_) => defaults.round_timeout,
        };

        Ok(Self {
            model,
            max_rounds,
            round_timeout,
        })
    }
}

/// Result of one delegation invocation
#[derive(Debug)]
pub enum DelegationOutcome {
    /// Final text for the front-line agent to read verbatim
    Answer(String),

    /// The delegation aborted; nothing may be fabricated from it
    Failed(SupervisorError),
}

impl DelegationOutcome {
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Answer(text) => Some(text),
            Self::Failed(_) => None,
        }
    }

    /// Wire reply for the front-line agent
    pub fn into_reply(self) -> SupervisorReply {
        match self {
            Self::Answer(next_response) => SupervisorReply::Next { next_response },
            Self::Failed(_) => SupervisorReply::Error {
                error: SupervisorReply::GENERIC_ERROR.into(),
            },
        }
    }
}

/// What the front-line agent receives
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupervisorReply {
    Next {
        #[serde(rename = "nextResponse")]
        next_response: String,
    },
    Error {
        error: String,
    },
}

impl SupervisorReply {
    pub const GENERIC_ERROR: &'static str = "Something went wrong.";
}

/// The supervisor: assembles context and runs the delegation loop
pub struct Supervisor {
    client: Arc<dyn CompletionClient>,
    tools: Arc<ToolRegistry>,
    assembler: ContextAssembler,
    config: SupervisorConfig,
}

impl Supervisor {
    /// Create a new supervisor
    pub fn new(
        client: Arc<dyn CompletionClient>,
        tools: Arc<ToolRegistry>,
        instructions: impl Into<String>,
        config: SupervisorConfig,
    ) -> Self {
        let assembler =
            ContextAssembler::new(config.model.clone(), instructions, tools.declarations());
        Self {
            client,
            tools,
            assembler,
            config,
        }
    }

    /// Answer the front-line agent for one user turn
    pub async fn next_response(
        &self,
        session: &SessionContext,
        new_information: &str,
    ) -> DelegationOutcome {
        tracing::info!(
            session = %session.id,
            history = session.history.len(),
            "Delegating to supervisor"
        );

        let mut payload = self.assembler.assemble(&session.history, new_information);
        self.resolve(&mut payload, session.hook()).await
    }

    /// Run the loop on an already assembled payload
    ///
    /// The payload only grows: two items per resolved invocation.
    pub async fn resolve(
        &self,
        payload: &mut RequestPayload,
        hook: Option<&dyn Breadcrumbs>,
    ) -> DelegationOutcome {
        let mut round = 0;

        loop {
            round += 1;

            let invocations = match self.submit(payload, round).await {
                CompletionResult::Error(e) => {
                    tracing::warn!(round, error = %e, "Supervisor round failed, aborting");
                    return DelegationOutcome::Failed(e);
                }
                CompletionResult::Answer(messages) => {
                    tracing::debug!(round, messages = messages.len(), "Supervisor answered");
                    return DelegationOutcome::Answer(answer_text(&messages));
                }
                CompletionResult::ToolInvocations(invocations) => invocations,
            };

            if self.config.max_rounds > 0 && round >= self.config.max_rounds {
                tracing::warn!(round, "Supervisor exceeded round limit");
                return DelegationOutcome::Failed(SupervisorError::RoundLimit(round));
            }

            for invocation in &invocations {
                self.resolve_invocation(payload, invocation, hook).await;
            }
        }
    }

    async fn submit(&self, payload: &RequestPayload, round: usize) -> CompletionResult {
        tracing::debug!(
            round,
            items = payload.len(),
            client = self.client.name(),
            "Submitting payload"
        );

        match self.config.round_timeout {
            Some(limit) => tokio::time::timeout(limit, self.client.submit(payload))
                .await
                .unwrap_or_else(|_| CompletionResult::Error(SupervisorError::Timeout(limit))),
            None => self.client.submit(payload).await,
        }
    }

    async fn resolve_invocation(
        &self,
        payload: &mut RequestPayload,
        invocation: &ToolInvocationRequest,
        hook: Option<&dyn Breadcrumbs>,
    ) {
        let arguments = invocation.parsed_arguments();
        tracing::debug!(tool = %invocation.name, call_id = %invocation.call_id, "Executing tool");

        notify_quietly(
            hook,
            &format!("[supervisor] function call: {}", invocation.name),
            Some(&arguments),
        );

        let result = self.tools.invoke(&invocation.name, &arguments).await;

        notify_quietly(
            hook,
            &format!("[supervisor] function call result: {}", invocation.name),
            Some(result.data()),
        );

        payload.push_tool_exchange(invocation, &result);
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &SupervisorConfig {
        &self.config
    }
}

/// Builder for a supervisor
pub struct SupervisorBuilder {
    client: Option<Arc<dyn CompletionClient>>,
    tools: ToolRegistry,
    instructions: String,
    config: SupervisorConfig,
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SupervisorBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            tools: ToolRegistry::new(),
            instructions: String::new(),
            config: SupervisorConfig::default(),
        }
    }

    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub const fn max_rounds(mut self, max: usize) -> Self {
        self.config.max_rounds = max;
        self
    }

    pub const fn round_timeout(mut self, limit: Duration) -> Self {
        self.config.round_timeout = Some(limit);
        self
    }

    pub fn build(self) -> Result<Supervisor> {
        let client = self
            .client
            .ok_or_else(|| SupervisorError::Config("Completion client is required".into()))?;

        Ok(Supervisor::new(
            client,
            Arc::new(self.tools),
            self.instructions,
            self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ConversationItem, InputItem, Role};
    use crate::observe::BreadcrumbTrail;
    use crate::provider::AnswerMessage;
    use crate::tool::{ParameterSchema, Tool, ToolResult, ToolSchema};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --- Scripted completion client ---

    struct ScriptedClient {
        script: Mutex<VecDeque<CompletionResult>>,
        submitted_lengths: Mutex<Vec<usize>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<CompletionResult>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                submitted_lengths: Mutex::new(Vec::new()),
            })
        }

        fn submissions(&self) -> Vec<usize> {
            self.submitted_lengths.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn submit(&self, payload: &RequestPayload) -> CompletionResult {
            self.submitted_lengths.lock().unwrap().push(payload.len());
            self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
                CompletionResult::Error(SupervisorError::Other("script exhausted".into()))
            })
        }
    }

    /// Requests the same tool forever
    struct InsistentClient;

    #[async_trait]
    impl CompletionClient for InsistentClient {
        async fn submit(&self, payload: &RequestPayload) -> CompletionResult {
            CompletionResult::ToolInvocations(vec![call(
                &format!("call_{}", payload.len()),
                "lookupPolicyDocument",
            )])
        }
    }

    struct SlowClient;

    #[async_trait]
    impl CompletionClient for SlowClient {
        async fn submit(&self, _payload: &RequestPayload) -> CompletionResult {
            tokio::time::sleep(Duration::from_secs(5)).await;
            CompletionResult::Answer(vec![AnswerMessage::new(["late"])])
        }
    }

    // --- Counting tool ---

    struct CountingTool {
        name: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name.into(),
                description: format!("Counting tool {}", self.name),
                parameters: vec![ParameterSchema::required_string("topic", "Topic")],
            }
        }

        async fn execute(&self, arguments: &Value) -> Result<ToolResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ToolResult::new(json!({ "tool": self.name, "args": arguments })))
        }
    }

    /// Tool that writes into the session trail while it runs
    struct TracedTool {
        name: &'static str,
        trail: Arc<BreadcrumbTrail>,
    }

    #[async_trait]
    impl Tool for TracedTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name.into(),
                description: format!("Traced tool {}", self.name),
                parameters: vec![ParameterSchema::required_string("topic", "Topic")],
            }
        }

        async fn execute(&self, arguments: &Value) -> Result<ToolResult> {
            self.trail.notify(&format!("ran: {}", self.name), Some(arguments))?;
            Ok(ToolResult::new(json!({ "tool": self.name })))
        }
    }

    // --- Hooks ---

    struct FailingHook;

    impl Breadcrumbs for FailingHook {
        fn notify(&self, _title: &str, _data: Option<&Value>) -> Result<()> {
            Err(SupervisorError::Other("renderer gone".into()))
        }
    }

    struct PanickingHook;

    impl Breadcrumbs for PanickingHook {
        fn notify(&self, _title: &str, _data: Option<&Value>) -> Result<()> {
            panic!("renderer crashed");
        }
    }

    fn call(call_id: &str, name: &str) -> ToolInvocationRequest {
        ToolInvocationRequest {
            call_id: call_id.into(),
            name: name.into(),
            arguments: r#"{"topic":"customs"}"#.into(),
        }
    }

    fn answer(text: &str) -> CompletionResult {
        CompletionResult::Answer(vec![AnswerMessage::new([text])])
    }

    fn supervisor(client: Arc<dyn CompletionClient>, calls: &Arc<AtomicUsize>) -> Supervisor {
        SupervisorBuilder::new()
            .client(client)
            .instructions("You supervise.")
            .tool(CountingTool {
                name: "lookupPolicyDocument",
                calls: Arc::clone(calls),
            })
            .tool(CountingTool {
                name: "findNearestStore",
                calls: Arc::clone(calls),
            })
            .build()
            .unwrap()
    }

    fn session() -> SessionContext {
        SessionContext::new(vec![ConversationItem::message(Role::User, "Где мой груз?")])
    }

    #[tokio::test]
    async fn test_answer_without_invocations() {
        let client = ScriptedClient::new(vec![CompletionResult::Answer(vec![
            AnswerMessage::new(["A", "B"]),
            AnswerMessage::new(["C"]),
        ])]);
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = supervisor(client.clone(), &calls)
            .next_response(&session(), "")
            .await;

        assert_eq!(outcome.text(), Some("AB\nC"));
        assert_eq!(client.submissions(), vec![2]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_answer_is_success() {
        let client = ScriptedClient::new(vec![CompletionResult::Answer(Vec::new())]);
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = supervisor(client, &calls).next_response(&session(), "").await;

        assert_eq!(outcome.text(), Some(""));
    }

    #[tokio::test]
    async fn test_round_escalation() {
        let client = ScriptedClient::new(vec![
            CompletionResult::ToolInvocations(vec![call("call_1", "lookupPolicyDocument")]),
            answer("Предварительно от 800 до 1200 долларов."),
        ]);
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = supervisor(client.clone(), &calls)
            .next_response(&session(), "300 kg to Almaty")
            .await;

        assert_eq!(outcome.text(), Some("Предварительно от 800 до 1200 долларов."));
        assert_eq!(client.submissions().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_payload_grows_two_items_per_invocation() {
        let client = ScriptedClient::new(vec![
            CompletionResult::ToolInvocations(vec![
                call("call_a", "lookupPolicyDocument"),
                call("call_b", "findNearestStore"),
                call("call_c", "lookupPolicyDocument"),
            ]),
            answer("done"),
        ]);
        let calls = Arc::new(AtomicUsize::new(0));
        let supervisor = supervisor(client.clone(), &calls);

        let mut payload = supervisor.assembler.assemble(&[], "info");
        let outcome = supervisor.resolve(&mut payload, None).await;

        assert!(!outcome.is_error());
        assert_eq!(client.submissions(), vec![2, 8]);
        assert_eq!(payload.len(), 8);

        let appended = &payload.input()[2..];
        for (pair, expected) in appended.chunks(2).zip(["call_a", "call_b", "call_c"]) {
            assert!(matches!(
                &pair[0],
                InputItem::FunctionCall { call_id, .. } if call_id == expected
            ));
            assert!(matches!(
                &pair[1],
                InputItem::FunctionCallOutput { call_id, .. } if call_id == expected
            ));
        }
    }

    #[tokio::test]
    async fn test_invocations_resolved_in_order_without_interleaving() {
        let client = ScriptedClient::new(vec![
            CompletionResult::ToolInvocations(vec![
                call("call_x", "lookupPolicyDocument"),
                call("call_y", "findNearestStore"),
            ]),
            answer("ok"),
        ]);
        let trail = Arc::new(BreadcrumbTrail::new());
        let supervisor = SupervisorBuilder::new()
            .client(client)
            .instructions("You supervise.")
            .tool(TracedTool {
                name: "lookupPolicyDocument",
                trail: Arc::clone(&trail),
            })
            .tool(TracedTool {
                name: "findNearestStore",
                trail: Arc::clone(&trail),
            })
            .build()
            .unwrap();
        let session = session().with_breadcrumbs(trail.clone());

        let outcome = supervisor.next_response(&session, "").await;

        assert_eq!(outcome.text(), Some("ok"));
        assert_eq!(
            trail.titles(),
            vec![
                "[supervisor] function call: lookupPolicyDocument",
                "ran: lookupPolicyDocument",
                "[supervisor] function call result: lookupPolicyDocument",
                "[supervisor] function call: findNearestStore",
                "ran: findNearestStore",
                "[supervisor] function call result: findNearestStore",
            ]
        );
        let entries = trail.entries();
        assert_eq!(entries[0].data, Some(json!({"topic": "customs"})));
        assert_eq!(entries[1].data, Some(json!({"topic": "customs"})));
        assert_eq!(entries[2].data, Some(json!({"tool": "lookupPolicyDocument"})));
    }

    #[tokio::test]
    async fn test_abort_on_failed_round() {
        let client = ScriptedClient::new(vec![
            CompletionResult::ToolInvocations(vec![call("call_1", "lookupPolicyDocument")]),
            CompletionResult::Error(SupervisorError::Status {
                status: 500,
                body: "upstream".into(),
            }),
            CompletionResult::ToolInvocations(vec![call("call_2", "lookupPolicyDocument")]),
        ]);
        let calls = Arc::new(AtomicUsize::new(0));

        let outcome = supervisor(client.clone(), &calls)
            .next_response(&session(), "")
            .await;

        assert!(matches!(
            outcome,
            DelegationOutcome::Failed(SupervisorError::Status { status: 500, .. })
        ));
        assert_eq!(client.submissions().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            outcome.into_reply(),
            SupervisorReply::Error {
                error: "Something went wrong.".into()
            }
        );
    }

    #[tokio::test]
    async fn test_unregistered_tool_degrades() {
        let client = ScriptedClient::new(vec![
            CompletionResult::ToolInvocations(vec![call("call_h", "transferToHuman")]),
            answer("Оператор свяжется с вами."),
        ]);
        let calls = Arc::new(AtomicUsize::new(0));
        let supervisor = supervisor(client, &calls);

        let mut payload = supervisor.assembler.assemble(&[], "");
        let outcome = supervisor.resolve(&mut payload, None).await;

        assert_eq!(outcome.text(), Some("Оператор свяжется с вами."));
        assert_eq!(
            payload.input().last(),
            Some(&InputItem::FunctionCallOutput {
                call_id: "call_h".into(),
                output: r#"{"result":true}"#.into(),
            })
        );
    }

    #[tokio::test]
    async fn test_hook_failures_do_not_affect_outcome() {
        for hook in [
            Arc::new(FailingHook) as Arc<dyn Breadcrumbs>,
            Arc::new(PanickingHook) as Arc<dyn Breadcrumbs>,
        ] {
            let client = ScriptedClient::new(vec![
                CompletionResult::ToolInvocations(vec![call("call_1", "findNearestStore")]),
                answer("Ближайший склад в Ташкенте."),
            ]);
            let calls = Arc::new(AtomicUsize::new(0));
            let session = session().with_breadcrumbs(hook);

            let outcome = supervisor(client, &calls).next_response(&session, "").await;

            assert_eq!(outcome.text(), Some("Ближайший склад в Ташкенте."));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_round_limit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let supervisor = SupervisorBuilder::new()
            .client(Arc::new(InsistentClient))
            .tool(CountingTool {
                name: "lookupPolicyDocument",
                calls: Arc::clone(&calls),
            })
            .max_rounds(3)
            .build()
            .unwrap();

        let outcome = supervisor.next_response(&session(), "").await;

        assert!(matches!(
            outcome,
            DelegationOutcome::Failed(SupervisorError::RoundLimit(3))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_round_timeout() {
        let calls = Arc::new(AtomicUsize::new(0));
        let supervisor = SupervisorBuilder::new()
            .client(Arc::new(SlowClient))
            .round_timeout(Duration::from_millis(20))
            .build()
            .unwrap();

        let outcome = supervisor.next_response(&session(), "").await;

        assert!(matches!(
            outcome,
            DelegationOutcome::Failed(SupervisorError::Timeout(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reply_wire_format() {
        let reply = DelegationOutcome::Answer("Момент.".into()).into_reply();
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"nextResponse": "Момент."})
        );
    }

    #[test]
    fn test_build_requires_client() {
        assert!(matches!(
            SupervisorBuilder::new().build(),
            Err(SupervisorError::Config(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = SupervisorConfig::default();
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.max_rounds, 8);
        assert!(config.round_timeout.is_none());
    }
}
