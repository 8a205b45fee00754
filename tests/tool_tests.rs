//! Tests for the tool system.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{canned_search_tool, BrokenTool};
use integreat::error::IntegreatError;
use integreat::tools::*;

#[test]
fn parameter_builder_constructs_schema() {
    let params = AgentToolParameters::object()
        .string("query", "Search query", true)
        .integer("num", "Max results", false)
        .build();

    let schema = &params.schema;
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["query"]["type"], "string");
    assert_eq!(schema["properties"]["num"]["type"], "integer");
    assert_eq!(schema["required"], serde_json::json!(["query"]));
}

#[test]
fn parameters_from_raw_schema() {
    let raw = serde_json::json!({"type": "object", "properties": {}});
    let params = AgentToolParameters::from_schema(raw.clone());
    assert_eq!(params.schema, raw);
}

#[test]
fn tool_arguments_optional() {
    let args = ToolArguments::new(serde_json::json!({"query": "test", "num": 4}));
    assert_eq!(args.get_str_opt("query"), Some("test"));
    assert_eq!(args.get_str_opt("missing"), None);
    assert_eq!(args.get_u64_opt("num"), Some(4));
    assert_eq!(args.get_u64_opt("query"), None);
}

#[tokio::test]
async fn custom_tool_executes_through_trait_object() {
    let calls = Arc::new(AtomicUsize::new(0));
    let tool = canned_search_tool("1. integrationsbeauftragte.de", calls.clone());

    let args = ToolArguments::new(serde_json::json!({"query": "Integrationskurs"}));
    let result = tool.execute(&args).await.unwrap();

    assert_eq!(
        result,
        serde_json::json!("1. integrationsbeauftragte.de [Integrationskurs]")
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_required_argument_is_an_invalid_argument() {
    let tool = canned_search_tool("unused", Arc::new(AtomicUsize::new(0)));

    let err = tool
        .execute(&ToolArguments::new(serde_json::json!({})))
        .await
        .unwrap_err();

    assert!(matches!(err, IntegreatError::InvalidArgument(_)));
}

#[tokio::test]
async fn tool_errors_are_returned_to_the_caller() {
    let err = BrokenTool::new()
        .execute(&ToolArguments::new(serde_json::json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, IntegreatError::ToolExecution { ref tool_name, .. } if tool_name == "flaky"));
}

#[test]
fn definition_mirrors_name_description_and_schema() {
    let tool = canned_search_tool("unused", Arc::new(AtomicUsize::new(0)));
    let definition = tool.definition();
    assert_eq!(definition.name, "serpapi");
    assert_eq!(definition.description, "Search the web");
    assert_eq!(definition.parameters, tool.parameters().schema);
}

#[test]
fn search_tool_is_registered_under_serpapi_name() {
    let config = integreat::config::IntegreatConfig::new();
    let tool = serpapi_search_tool(&config);
    assert_eq!(tool.name(), SERPAPI_TOOL_NAME);
    assert_eq!(tool.parameters().schema["required"], serde_json::json!(["query"]));
}
