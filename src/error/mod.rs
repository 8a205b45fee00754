//! Error types for Integreat.

pub mod unified;

pub use unified::{ErrorCategory, ErrorCode, ErrorDetails, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all Integreat operations.
///
/// The first three variants are what the session manager reports to its
/// caller. Everything below them describes a capability backend failure and
/// normally reaches the caller wrapped in `SessionInit` or `AgentInvocation`.
#[derive(Error, Debug)]
pub enum IntegreatError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not set up the assistant for {country}: {source}")]
    SessionInit {
        country: String,
        #[source]
        source: Box<IntegreatError>,
    },

    #[error("The assistant failed to answer: {source}")]
    AgentInvocation {
        #[source]
        source: Box<IntegreatError>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<ErrorDetails>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Tool execution error: {tool_name}: {message}")]
    ToolExecution { tool_name: String, message: String },

    /// The model kept requesting tools and never produced an answer.
    #[error("Agent stopped after {0} model calls without a final answer")]
    IterationLimit(usize),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl IntegreatError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            details: None,
        }
    }

    /// Create an API error with provider details.
    pub fn api_with_details(status: u16, message: impl Into<String>, details: ErrorDetails) -> Self {
        Self::Api {
            status,
            message: message.into(),
            details: Some(details),
        }
    }

    pub(crate) fn session_init(country: impl Into<String>, source: IntegreatError) -> Self {
        Self::SessionInit {
            country: country.into(),
            source: Box::new(source),
        }
    }

    pub(crate) fn agent_invocation(source: IntegreatError) -> Self {
        Self::AgentInvocation {
            source: Box::new(source),
        }
    }

    /// Classify this error into a category.
    ///
    /// Session-level wrappers report the category of the backend failure
    /// they carry.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SessionInit { source, .. } | Self::AgentInvocation { source } => {
                source.category()
            }
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) | Self::ConfigFile(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::ToolExecution { .. } | Self::IterationLimit(_) => ErrorCategory::ToolExecution,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Whether resubmitting the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Validation => RecoverySuggestion::RephraseInput,
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Network => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::ToolExecution => RecoverySuggestion::CheckToolImplementation,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, IntegreatError>;
