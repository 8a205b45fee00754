//! Shared test helpers: a scripted model provider and switchable bindings.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use integreat::agent::{AgentSessionManager, CapabilityBindings, SessionOptions};
use integreat::error::IntegreatError;
use integreat::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use integreat::tools::{AgentToolParameters, Tool, ToolArguments};
use integreat::types::*;

/// A provider that replays queued responses and records every request.
///
/// When the queue is empty it answers `"Answer to: <last user message>"`.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<ProviderResponse, IntegreatError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_text(&self, text: &str) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls: vec![AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args,
            }],
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    pub fn queue_error(&self, error: IntegreatError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, IntegreatError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.responses.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| {
            let question = request
                .messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.text())
                .unwrap_or_default();
            Ok(ProviderResponse {
                text: format!("Answer to: {question}"),
                usage: Usage::default(),
                tool_calls: vec![],
                finish_reason: Some(FinishReason::Stop),
            })
        })
    }
}

/// Bindings that hand out one provider and can be told to fail.
pub struct SwitchableBindings {
    provider: Arc<ScriptedProvider>,
    failing: AtomicBool,
    builds: AtomicUsize,
    delay: Option<Duration>,
}

impl SwitchableBindings {
    pub fn new(provider: Arc<ScriptedProvider>) -> Self {
        Self {
            provider,
            failing: AtomicBool::new(false),
            builds: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Every agent construction sleeps this long.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of construction attempts, failed ones included.
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CapabilityBindings for SwitchableBindings {
    async fn language_model(&self) -> Result<Arc<dyn ModelProvider>, IntegreatError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(IntegreatError::api(503, "model backend unreachable"));
        }
        Ok(self.provider.clone())
    }
}

/// A search tool that answers from memory and counts its calls.
pub struct CannedSearch {
    answer: &'static str,
    calls: Arc<AtomicUsize>,
    parameters: AgentToolParameters,
}

#[async_trait]
impl Tool for CannedSearch {
    fn name(&self) -> &str {
        "serpapi"
    }

    fn description(&self) -> &str {
        "Search the web"
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, IntegreatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = args.get_str("query")?;
        Ok(serde_json::Value::String(format!("{} [{query}]", self.answer)))
    }
}

pub fn canned_search_tool(answer: &'static str, calls: Arc<AtomicUsize>) -> Arc<dyn Tool> {
    Arc::new(CannedSearch {
        answer,
        calls,
        parameters: AgentToolParameters::object()
            .string("query", "The search query", true)
            .build(),
    })
}

/// A tool whose every call fails with a tool error.
pub struct BrokenTool {
    parameters: AgentToolParameters,
}

impl BrokenTool {
    pub fn new() -> Self {
        Self {
            parameters: AgentToolParameters::object().build(),
        }
    }
}

#[async_trait]
impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "flaky"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(&self, _args: &ToolArguments) -> Result<serde_json::Value, IntegreatError> {
        Err(IntegreatError::ToolExecution {
            tool_name: "flaky".into(),
            message: "quota exhausted".into(),
        })
    }
}

/// Session on the default options (Italy) backed by a fresh scripted provider.
pub async fn italy_session() -> (
    AgentSessionManager,
    Arc<ScriptedProvider>,
    Arc<SwitchableBindings>,
) {
    session_with(ScriptedProvider::new(), SessionOptions::default()).await
}

pub async fn session_with(
    provider: ScriptedProvider,
    options: SessionOptions,
) -> (
    AgentSessionManager,
    Arc<ScriptedProvider>,
    Arc<SwitchableBindings>,
) {
    let provider = Arc::new(provider);
    let bindings = Arc::new(SwitchableBindings::new(provider.clone()));
    let session = AgentSessionManager::new(bindings.clone(), Vec::new(), options)
        .await
        .expect("session should start");
    (session, provider, bindings)
}

/// The system prompt of a captured request.
pub fn system_prompt(request: &ProviderRequest) -> String {
    request
        .messages
        .iter()
        .find(|m| m.role == Role::System)
        .map(|m| m.text())
        .unwrap_or_default()
}
