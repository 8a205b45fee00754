//! Tool system for function calling.

pub mod arguments;
pub mod search;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use search::{serpapi_search_tool, SerpApiSearch, SERPAPI_TOOL_NAME};
pub use tool::Tool;
pub use types::AgentToolParameters;
