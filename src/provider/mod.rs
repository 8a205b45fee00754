//! Language-model capability: provider trait and the OpenAI adapter.

pub mod format;
pub mod http;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::IntegreatConfig;
use crate::error::IntegreatError;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Option<Vec<ToolDefinition>>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by language-model backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate one completion. Tool calls in the response are executed by
    /// the caller, not the provider.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, IntegreatError>;
}

/// Create the configured language-model provider.
pub fn create_provider(config: &IntegreatConfig) -> Result<Arc<dyn ModelProvider>, IntegreatError> {
    let api_key = config
        .get_api_key("openai")
        .ok_or_else(|| IntegreatError::Authentication("Missing OPENAI_API_KEY".into()))?;
    let model = config.settings().model.trim();
    if model.is_empty() {
        return Err(IntegreatError::Configuration("Model name is empty".into()));
    }
    Ok(Arc::new(openai::OpenAiProvider::new(
        model.to_string(),
        api_key,
        config.get_base_url("openai"),
    )))
}
