//! Sampling settings and finish reasons.

use bon::Builder;
use strum::{Display, EnumString};

/// Sampling knobs sent with every model call; unset fields leave the
/// provider's defaults in place.
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct GenerationSettings {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Why a model call stopped, parsed from the provider's wire value
/// (`"stop"`, `"tool_calls"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
}
