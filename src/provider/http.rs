//! Shared HTTP client and status mapping.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{ErrorCode, ErrorDetails, IntegreatError};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status and body onto an error.
pub fn status_to_error(status: u16, body: &str) -> IntegreatError {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    match status {
        401 | 403 => IntegreatError::Authentication(error_message(parsed.as_ref(), body)),
        429 => IntegreatError::RateLimited {
            retry_after_ms: parsed.as_ref().and_then(extract_retry_after),
        },
        _ => match parsed.as_ref().and_then(extract_details) {
            Some(details) => {
                IntegreatError::api_with_details(status, error_message(parsed.as_ref(), body), details)
            }
            None => IntegreatError::api(status, body),
        },
    }
}

fn error_message(parsed: Option<&serde_json::Value>, body: &str) -> String {
    parsed
        .and_then(|v| v.get("error"))
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

fn extract_retry_after(v: &serde_json::Value) -> Option<u64> {
    v.get("error")
        .and_then(|e| e.get("retry_after"))
        .and_then(|r| r.as_f64())
        .map(|s| (s * 1000.0) as u64)
}

fn extract_details(v: &serde_json::Value) -> Option<ErrorDetails> {
    let error = v.get("error")?.as_object()?;
    let provider_code = error
        .get("code")
        .and_then(|c| c.as_str())
        .or_else(|| error.get("type").and_then(|t| t.as_str()))
        .map(str::to_string);
    Some(ErrorDetails {
        code: provider_code.as_deref().map(ErrorCode::from_provider_code),
        provider_code,
        param: error.get("param").and_then(|p| p.as_str()).map(str::to_string),
    })
}
