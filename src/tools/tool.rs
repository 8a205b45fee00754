//! The capability seam between the tool loop and a concrete backend.

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::AgentToolParameters;
use crate::error::IntegreatError;
use crate::provider::ToolDefinition;

/// A capability the model may call by name while answering.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Shown to the model; decides when it reaches for the tool.
    fn description(&self) -> &str;

    fn parameters(&self) -> &AgentToolParameters;

    /// Run one call. An `Err` is handed back to the model as an error result
    /// rather than failing the answer.
    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, IntegreatError>;

    /// How the tool is advertised in a provider request.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().schema.clone(),
        }
    }
}
