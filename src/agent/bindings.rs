//! Capability bindings: where an agent gets its language model from.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::IntegreatConfig;
use crate::error::Result;
use crate::provider::{self, ModelProvider};

/// Resolves the language-model capability for a freshly built agent.
///
/// Called once per agent construction; an error here aborts the
/// construction and leaves the previously active agent in place.
#[async_trait]
pub trait CapabilityBindings: Send + Sync {
    async fn language_model(&self) -> Result<Arc<dyn ModelProvider>>;
}

/// Bindings resolved from layered configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredBindings {
    config: IntegreatConfig,
}

impl ConfiguredBindings {
    pub fn new(config: IntegreatConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CapabilityBindings for ConfiguredBindings {
    async fn language_model(&self) -> Result<Arc<dyn ModelProvider>> {
        provider::create_provider(&self.config)
    }
}

/// Bindings that always hand out the same provider instance.
#[derive(Clone)]
pub struct FixedBindings {
    provider: Arc<dyn ModelProvider>,
}

impl FixedBindings {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CapabilityBindings for FixedBindings {
    async fn language_model(&self) -> Result<Arc<dyn ModelProvider>> {
        Ok(Arc::clone(&self.provider))
    }
}
