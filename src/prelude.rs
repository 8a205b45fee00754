//! Convenience re-exports for common use.

pub use crate::agent::{
    AgentSessionManager, AskMode, CapabilityBindings, HistoryEntry, SessionOptions, SessionPhase,
};
pub use crate::config::IntegreatConfig;
pub use crate::countries::{Country, CountryCatalog};
pub use crate::error::{IntegreatError, Result};
pub use crate::persona::build_persona;
pub use crate::provider::ModelProvider;
pub use crate::tools::{AgentToolParameters, Tool, ToolArguments};
pub use crate::types::{GenerationSettings, ModelMessage, Role};
