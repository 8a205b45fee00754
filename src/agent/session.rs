//! Agent session management.
//!
//! [`AgentSessionManager`] owns the one active [`Agent`] of a user session.
//! Changing the destination builds a complete new agent and swaps it in as a
//! single `Arc`; questions are answered by whichever agent was committed when
//! they started. A `tokio` mutex serializes reinitialization against
//! questions, so a question waits while the assistant is being rebuilt and a
//! rebuild waits for an in-flight question to finish.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use bon::Builder;
use strum::{Display, EnumString};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::IntegreatConfig;
use crate::countries::DEFAULT_COUNTRY;
use crate::error::{IntegreatError, Result};
use crate::persona::{build_persona, government_search_prompt};
use crate::tools::{serpapi_search_tool, Tool, SERPAPI_TOOL_NAME};
use crate::types::GenerationSettings;
use crate::util::timeout::with_optional_timeout;

use super::agent::Agent;
use super::bindings::{CapabilityBindings, ConfiguredBindings};
use super::history::{HistoryEntry, HistoryStore};
use super::memory::ConversationMemory;

/// How a question is put to the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AskMode {
    /// Sent as typed; the exchange is added to the history.
    Direct,
    /// Rewritten into a search instruction for official sources; the answer
    /// is shown once and not added to the history.
    GovernmentSearch,
}

/// Whether the session can take a question right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    Ready,
    Reinitializing,
}

/// Session behaviour.
#[derive(Debug, Clone, Builder)]
pub struct SessionOptions {
    #[builder(into, default = DEFAULT_COUNTRY.to_string())]
    pub default_country: String,
    #[builder(default)]
    pub generation: GenerationSettings,
    /// Bound on agent construction and on each answer.
    pub request_timeout: Option<Duration>,
    /// Remembered turns sent with each question; `None` sends all of them.
    pub memory_window: Option<usize>,
    #[builder(default)]
    pub reset_memory_on_country_change: bool,
    /// Tool named in government-search instructions.
    #[builder(into, default = SERPAPI_TOOL_NAME.to_string())]
    pub search_tool_name: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&IntegreatConfig> for SessionOptions {
    fn from(config: &IntegreatConfig) -> Self {
        let settings = config.settings();
        Self {
            default_country: settings.default_country.clone(),
            generation: settings.generation_settings(),
            request_timeout: settings.request_timeout(),
            memory_window: settings.memory_window,
            reset_memory_on_country_change: settings.reset_memory_on_country_change,
            search_tool_name: SERPAPI_TOOL_NAME.to_string(),
        }
    }
}

/// Owns the session's active agent, its memory and its history.
pub struct AgentSessionManager {
    session_id: Uuid,
    bindings: Arc<dyn CapabilityBindings>,
    tools: Arc<[Arc<dyn Tool>]>,
    memory: ConversationMemory,
    options: SessionOptions,
    /// Held for the whole of every `ask` and `reinitialize`.
    gate: Mutex<()>,
    /// Last committed agent; replaced only while `gate` is held.
    active: RwLock<Arc<Agent>>,
    reinitializing: AtomicBool,
    history: RwLock<HistoryStore>,
}

impl AgentSessionManager {
    /// Start a session bound to `options.default_country`.
    pub async fn new(
        bindings: Arc<dyn CapabilityBindings>,
        tools: Vec<Arc<dyn Tool>>,
        options: SessionOptions,
    ) -> Result<Self> {
        let country = validate_country(&options.default_country)?;
        let tools: Arc<[Arc<dyn Tool>]> = tools.into();
        let memory = ConversationMemory::new();

        let agent = build_agent(&*bindings, &tools, &memory, &options, country.clone()).await?;
        let session_id = Uuid::new_v4();
        info!(session = %session_id, country = %country, model = agent.model_id(), "Session started");

        Ok(Self {
            session_id,
            bindings,
            tools,
            memory,
            options,
            gate: Mutex::new(()),
            active: RwLock::new(Arc::new(agent)),
            reinitializing: AtomicBool::new(false),
            history: RwLock::new(HistoryStore::new()),
        })
    }

    /// Start a session with the configured OpenAI model and SerpApi search.
    pub async fn from_config(config: &IntegreatConfig) -> Result<Self> {
        let bindings = Arc::new(ConfiguredBindings::new(config.clone()));
        let tools = vec![serpapi_search_tool(config)];
        Self::new(bindings, tools, SessionOptions::from(config)).await
    }

    /// Rebind the assistant to `country`.
    ///
    /// On failure the previous agent stays active and the error is a
    /// `SessionInit` naming the attempted country.
    pub async fn reinitialize(&self, country: &str) -> Result<()> {
        let country = validate_country(country)?;
        let _gate = self.gate.lock().await;
        let _phase = PhaseGuard::enter(&self.reinitializing);

        let previous = self.active_agent();
        let agent = match build_agent(
            &*self.bindings,
            &self.tools,
            &self.memory,
            &self.options,
            country.clone(),
        )
        .await
        {
            Ok(agent) => agent,
            Err(e) => {
                warn!(
                    session = %self.session_id,
                    attempted = %country,
                    kept = previous.country(),
                    error = %e,
                    "Reinitialization failed; keeping previous agent"
                );
                return Err(e);
            }
        };

        let country_changed = previous.country() != agent.country();
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(agent);

        if country_changed && self.options.reset_memory_on_country_change {
            self.memory.clear().await;
        }

        info!(
            session = %self.session_id,
            from = previous.country(),
            to = %country,
            "Agent reinitialized"
        );
        Ok(())
    }

    /// Put a question to the active agent.
    ///
    /// Blank queries are rejected before anything is sent. Only successful
    /// [`AskMode::Direct`] questions are added to the history.
    pub async fn ask(&self, query: &str, mode: AskMode) -> Result<String> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(IntegreatError::Validation("Please enter a query.".into()));
        }

        let _gate = self.gate.lock().await;
        let agent = self.active_agent();

        let prompt = match mode {
            AskMode::Direct => query.to_string(),
            AskMode::GovernmentSearch => {
                government_search_prompt(&self.options.search_tool_name, trimmed, agent.country())
            }
        };

        let response = with_optional_timeout(self.options.request_timeout, agent.run(&prompt))
            .await
            .map_err(|e| {
                warn!(session = %self.session_id, %mode, error = %e, "Agent invocation failed");
                IntegreatError::agent_invocation(e)
            })?;

        if mode == AskMode::Direct {
            let sequence_index = self
                .history
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .append(query, response.clone(), agent.country());
            info!(session = %self.session_id, sequence_index, "History entry recorded");
        }

        Ok(response)
    }

    /// Transcript, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .list()
    }

    pub fn history_len(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Last successfully committed destination.
    pub fn country(&self) -> String {
        self.active_agent().country().to_string()
    }

    /// Persona of the committed agent.
    pub fn persona(&self) -> String {
        self.active_agent().persona().to_string()
    }

    pub fn active_agent(&self) -> Arc<Agent> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn phase(&self) -> SessionPhase {
        if self.reinitializing.load(Ordering::Acquire) {
            SessionPhase::Reinitializing
        } else {
            SessionPhase::Ready
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }
}

impl std::fmt::Debug for AgentSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSessionManager")
            .field("session_id", &self.session_id)
            .field("active", &self.active_agent())
            .field("phase", &self.phase())
            .field("history_len", &self.history_len())
            .finish()
    }
}

async fn build_agent(
    bindings: &dyn CapabilityBindings,
    tools: &Arc<[Arc<dyn Tool>]>,
    memory: &ConversationMemory,
    options: &SessionOptions,
    country: String,
) -> Result<Agent> {
    let provider = with_optional_timeout(options.request_timeout, bindings.language_model())
        .await
        .map_err(|e| IntegreatError::session_init(country.clone(), e))?;
    let persona = build_persona(&country);
    Ok(Agent::new(
        country,
        persona,
        provider,
        Arc::clone(tools),
        memory.clone(),
        options.generation.clone(),
        options.memory_window,
    ))
}

fn validate_country(country: &str) -> Result<String> {
    let country = country.trim();
    if country.is_empty() {
        return Err(IntegreatError::Validation(
            "Destination country must not be empty.".into(),
        ));
    }
    Ok(country.to_string())
}

/// Marks the session as reinitializing until dropped.
struct PhaseGuard<'a>(&'a AtomicBool);

impl<'a> PhaseGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
