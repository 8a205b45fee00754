//! An agent bound to one destination country.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::IntegreatError;
use crate::generation;
use crate::provider::ModelProvider;
use crate::tools::Tool;
use crate::types::{GenerationSettings, ModelMessage};

use super::memory::ConversationMemory;

/// Persona, tools, memory and model fixed together.
///
/// An agent is never modified after construction; changing the destination
/// means building a new one. Only the shared memory it points at changes.
pub struct Agent {
    id: Uuid,
    country: String,
    persona: String,
    provider: Arc<dyn ModelProvider>,
    tools: Arc<[Arc<dyn Tool>]>,
    memory: ConversationMemory,
    settings: GenerationSettings,
    memory_window: Option<usize>,
}

impl Agent {
    pub(crate) fn new(
        country: String,
        persona: String,
        provider: Arc<dyn ModelProvider>,
        tools: Arc<[Arc<dyn Tool>]>,
        memory: ConversationMemory,
        settings: GenerationSettings,
        memory_window: Option<usize>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            country,
            persona,
            provider,
            tools,
            memory,
            settings,
            memory_window,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    /// Answer one input, letting the model use tools as often as it needs.
    ///
    /// The exchange is added to memory only when an answer comes back.
    pub async fn run(&self, input: &str) -> Result<String, IntegreatError> {
        let mut messages = vec![ModelMessage::system(self.persona.clone())];
        messages.extend(self.memory.context(self.memory_window).await);
        messages.push(ModelMessage::user(input));

        debug!(agent = %self.id, country = %self.country, context = messages.len(), "Agent run");

        let result = generation::generate_text(
            self.provider.as_ref(),
            messages,
            self.settings.clone(),
            &self.tools,
        )
        .await?;

        debug!(
            agent = %self.id,
            steps = result.steps.len(),
            total_tokens = result.usage.total_tokens,
            "Agent run finished"
        );

        self.memory.record_turn(input, result.text.clone()).await;
        Ok(result.text)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("country", &self.country)
            .field("model", &self.provider.model_id())
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}
