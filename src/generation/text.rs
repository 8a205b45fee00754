//! Text generation with tool loop.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::IntegreatError;
use crate::provider::{ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::Tool;
use crate::types::*;

/// Maximum model calls per generation, so a model that keeps requesting
/// tools cannot loop forever.
pub const MAX_TOOL_ITERATIONS: usize = 10;

/// Generate text with an optional tool loop.
///
/// If the model returns tool calls, they are executed and fed back until the
/// model produces a final text response. A failing tool does not fail the
/// generation: its error is handed back to the model as the tool result.
/// A model still requesting tools after [`MAX_TOOL_ITERATIONS`] calls yields
/// [`IntegreatError::IterationLimit`].
pub async fn generate_text(
    provider: &dyn ModelProvider,
    mut messages: Vec<ModelMessage>,
    settings: GenerationSettings,
    tools: &[Arc<dyn Tool>],
) -> Result<GenerateTextResult, IntegreatError> {
    let tool_defs: Option<Vec<ToolDefinition>> =
        (!tools.is_empty()).then(|| tools.iter().map(|t| t.definition()).collect());

    let mut steps = Vec::new();
    let mut total_usage = Usage::default();

    for iteration in 0..MAX_TOOL_ITERATIONS {
        let request = ProviderRequest {
            messages: messages.clone(),
            settings: settings.clone(),
            tools: tool_defs.clone(),
        };

        debug!(iteration, provider = provider.provider_name(), "generate_text: calling provider");
        let response = provider.generate_text(&request).await?;

        total_usage.merge(&response.usage);

        let mut step = GenerationStep {
            text: response.text.clone(),
            tool_calls: response.tool_calls.clone(),
            tool_results: Vec::new(),
            usage: response.usage.clone(),
            finish_reason: response.finish_reason,
        };

        if response.tool_calls.is_empty() {
            steps.push(step);
            return Ok(GenerateTextResult {
                text: response.text,
                steps,
                messages,
                usage: total_usage,
                finish_reason: response.finish_reason,
            });
        }

        messages.push(ModelMessage::assistant_tool_calls(
            &response.text,
            &response.tool_calls,
        ));

        for tc in &response.tool_calls {
            let result = execute_tool_call(tools, tc).await;
            step.tool_results.push(result.clone());
            messages.push(ModelMessage::tool_result(result));
        }

        steps.push(step);
    }

    warn!(
        max = MAX_TOOL_ITERATIONS,
        total_tokens = total_usage.total_tokens,
        "generate_text: tool loop hit iteration limit"
    );
    Err(IntegreatError::IterationLimit(MAX_TOOL_ITERATIONS))
}

async fn execute_tool_call(tools: &[Arc<dyn Tool>], tc: &AgentToolCall) -> AgentToolResult {
    let Some(tool) = tools.iter().find(|t| t.name() == tc.name) else {
        warn!(tool = tc.name, "Tool not found");
        return AgentToolResult {
            tool_call_id: tc.id.clone(),
            result: serde_json::json!({"error": format!("Tool '{}' not found", tc.name)}),
            is_error: true,
        };
    };

    let args = ToolArguments::new(tc.arguments.clone());
    match tool.execute(&args).await {
        Ok(val) => AgentToolResult {
            tool_call_id: tc.id.clone(),
            result: val,
            is_error: false,
        },
        Err(e) => {
            warn!(tool = tc.name, error = %e, "Tool execution failed");
            AgentToolResult {
                tool_call_id: tc.id.clone(),
                result: serde_json::json!({"error": e.to_string()}),
                is_error: true,
            }
        }
    }
}
