//! Web search capability backed by SerpApi.
//!
//! The model reaches this tool through the tool loop; the session manager
//! never calls it directly. A query returns a compact text digest (answer box,
//! knowledge graph summary, then the top organic results with their links)
//! so the model can cite sources.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::AgentToolParameters;
use crate::config::IntegreatConfig;
use crate::error::IntegreatError;
use crate::provider::http::{shared_client, status_to_error};

/// Name the model uses to call the search tool.
pub const SERPAPI_TOOL_NAME: &str = "serpapi";

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const MAX_RESULTS: u64 = 10;

/// Google search through the SerpApi JSON endpoint.
pub struct SerpApiSearch {
    api_key: Option<String>,
    base_url: String,
    num_results: u64,
    parameters: AgentToolParameters,
}

impl SerpApiSearch {
    pub fn new(api_key: Option<String>, base_url: Option<String>, num_results: u64) -> Self {
        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            num_results: num_results.clamp(1, MAX_RESULTS),
            parameters: AgentToolParameters::object()
                .string("query", "The search query", true)
                .integer("num", "Number of results to return (1-10)", false)
                .build(),
        }
    }

    /// Build the tool from layered configuration.
    pub fn from_config(config: &IntegreatConfig) -> Self {
        Self::new(
            config.get_api_key("serpapi"),
            config.get_base_url("serpapi"),
            u64::from(config.settings().search_results),
        )
    }

    /// Run one search and return the text digest.
    pub async fn search(&self, query: &str, num: Option<u64>) -> Result<String, IntegreatError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| IntegreatError::Authentication("Missing SERPAPI_API_KEY".into()))?;
        let num = num.unwrap_or(self.num_results).clamp(1, MAX_RESULTS);
        let url = format!("{}/search.json", self.base_url.trim_end_matches('/'));

        debug!(query, num, "SerpApi search");

        let resp = shared_client()
            .get(&url)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", api_key),
                ("num", &num.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: SerpApiResponse = resp.json().await?;
        if let Some(error) = data.error {
            return Err(IntegreatError::ToolExecution {
                tool_name: SERPAPI_TOOL_NAME.into(),
                message: error,
            });
        }
        Ok(summarize(&data, num as usize))
    }
}

#[async_trait]
impl Tool for SerpApiSearch {
    fn name(&self) -> &str {
        SERPAPI_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Search the web with Google. Useful for current immigration rules, official \
         government pages and practical relocation information. Input is a search query."
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, IntegreatError> {
        let query = args.get_str("query")?;
        let digest = self.search(query, args.get_u64_opt("num")).await?;
        Ok(serde_json::Value::String(digest))
    }
}

/// Create the search tool as a shareable trait object.
pub fn serpapi_search_tool(config: &IntegreatConfig) -> Arc<dyn Tool> {
    Arc::new(SerpApiSearch::from_config(config))
}

fn summarize(data: &SerpApiResponse, max_results: usize) -> String {
    let mut out = String::new();

    if let Some(answer) = &data.answer_box {
        if let Some(text) = answer.answer.as_deref().or(answer.snippet.as_deref()) {
            let _ = writeln!(out, "Answer: {text}");
        }
    }
    if let Some(graph) = &data.knowledge_graph {
        match (&graph.title, &graph.description) {
            (Some(title), Some(description)) => {
                let _ = writeln!(out, "{title}: {description}");
            }
            (None, Some(description)) => {
                let _ = writeln!(out, "{description}");
            }
            _ => {}
        }
    }
    for (i, result) in data.organic_results.iter().take(max_results).enumerate() {
        let _ = write!(out, "{}. {} ({})", i + 1, result.title, result.link);
        match &result.snippet {
            Some(snippet) => {
                let _ = writeln!(out, "\n   {snippet}");
            }
            None => out.push('\n'),
        }
    }

    if out.is_empty() {
        "No good search result found".to_string()
    } else {
        out.trim_end().to_string()
    }
}

#[derive(Debug, Deserialize, Default)]
struct SerpApiResponse {
    error: Option<String>,
    answer_box: Option<AnswerBox>,
    knowledge_graph: Option<KnowledgeGraph>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct AnswerBox {
    answer: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeGraph {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    title: String,
    link: String,
    snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> SerpApiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn digest_lists_answer_then_numbered_results() {
        let data = parse(serde_json::json!({
            "answer_box": {"answer": "A national D visa"},
            "organic_results": [
                {"title": "Visas for Italy", "link": "https://vistoperitalia.esteri.it", "snippet": "Official portal"},
                {"title": "Study in Italy", "link": "https://example.org/study"}
            ]
        }));

        let digest = summarize(&data, 5);

        assert_eq!(
            digest,
            "Answer: A national D visa\n\
             1. Visas for Italy (https://vistoperitalia.esteri.it)\n   Official portal\n\
             2. Study in Italy (https://example.org/study)"
        );
    }

    #[test]
    fn digest_respects_result_limit() {
        let results: Vec<_> = (0..4)
            .map(|i| serde_json::json!({"title": format!("r{i}"), "link": format!("https://r{i}.test")}))
            .collect();
        let data = parse(serde_json::json!({ "organic_results": results }));

        let digest = summarize(&data, 2);

        assert!(digest.contains("2. r1"));
        assert!(!digest.contains("r2"));
    }

    #[test]
    fn empty_response_yields_placeholder() {
        assert_eq!(summarize(&SerpApiResponse::default(), 5), "No good search result found");
    }

    #[test]
    fn definition_advertises_query_schema() {
        let definition = SerpApiSearch::new(None, None, 5).definition();
        assert_eq!(definition.name, "serpapi");
        assert!(definition.description.contains("immigration"));
        assert_eq!(definition.parameters["required"], serde_json::json!(["query"]));
        assert_eq!(definition.parameters["properties"]["num"]["type"], "integer");
    }

    #[test]
    fn result_count_is_clamped() {
        assert_eq!(SerpApiSearch::new(None, None, 0).num_results, 1);
        assert_eq!(SerpApiSearch::new(None, None, 99).num_results, MAX_RESULTS);
    }

    #[tokio::test]
    async fn missing_key_is_an_authentication_error() {
        let search = SerpApiSearch::new(None, None, 5);
        let err = search.search("schengen", None).await.unwrap_err();
        assert!(matches!(err, IntegreatError::Authentication(_)));
    }
}
