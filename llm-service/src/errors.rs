//! Unified error handling for `llm-service`.
//!
//! One top-level [`LlmServiceError`] for the whole crate, with
//! configuration problems grouped in [`ConfigError`]. Helpers for reading
//! environment variables return the unified [`Result<T>`] alias.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmServiceError>;

/// Top-level error for the `llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmServiceError {
    /// Configuration/validation errors (startup time).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error.
    #[error("[llm-service] transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream returned a non-successful HTTP status.
    #[error("[llm-service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        /// Short trimmed snippet of the response body.
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[llm-service] failed to decode response: {0}")]
    Decode(String),

    /// Chat completion returned no choices.
    #[error("[llm-service] model returned no choices")]
    EmptyChoices,
}

/// Errors that realistically happen at config load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[llm-service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, token limits).
    #[error("[llm-service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported value in `LLM_KIND`.
    #[error("[llm-service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Endpoint is empty or does not start with http/https.
    #[error("[llm-service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Provider requires an API key and none was configured.
    #[error("[llm-service] missing API key for provider")]
    MissingApiKey,
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u32>().map(Some).map_err(|_| {
            LlmServiceError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(None),
    }
}

/// Validates that an endpoint starts with `http://` or `https://`.
///
/// # Errors
/// [`ConfigError::InvalidEndpoint`] otherwise.
pub fn validate_endpoint(value: &str) -> Result<()> {
    let v = value.trim();
    if v.is_empty() || !(v.starts_with("http://") || v.starts_with("https://")) {
        return Err(ConfigError::InvalidEndpoint(value.to_string()).into());
    }
    Ok(())
}

/// Trims a response body down to a log-friendly snippet.
pub(crate) fn make_snippet(body: &str) -> String {
    body.chars().take(240).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_validation() {
        assert!(validate_endpoint("http://localhost:11434").is_ok());
        assert!(validate_endpoint("https://api.openai.com").is_ok());
        assert!(validate_endpoint("").is_err());
        assert!(validate_endpoint("localhost:11434").is_err());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(10_000);
        assert_eq!(make_snippet(&long).len(), 240);
    }
}
