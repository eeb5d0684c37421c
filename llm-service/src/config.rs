//! Provider and model configuration, loaded strictly from environment
//! variables or built directly by the caller.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`       = provider kind (`ollama` | `openai`), default `ollama`
//! - `LLM_MAX_TOKENS` = optional generation cap (u32)
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (one required)
//! - `OLLAMA_MODEL_FAST`           = generation model (required)
//! - `EMBEDDING_MODEL`             = embedding model (required)
//!
//! OpenAI:
//! - `OPENAI_API_KEY`         (required)
//! - `OPENAI_URL`             (default `https://api.openai.com`)
//! - `OPENAI_MODEL_FAST`      (required)
//! - `OPENAI_EMBEDDING_MODEL` (required)

use crate::errors::{ConfigError, Result, env_opt_u32, must_env};

/// Backend used for generation and embeddings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime.
    Ollama,
    /// OpenAI REST API.
    OpenAi,
}

/// Configuration for one model endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    /// Model identifier, e.g. `qwen3:14b` or `text-embedding-3-small`.
    pub model: String,
    /// Base URL of the inference endpoint.
    pub endpoint: String,
    /// API key for providers that require authentication.
    pub api_key: Option<String>,
    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Nucleus sampling cutoff.
    pub top_p: Option<f32>,
    /// Per-request timeout in seconds (defaults to 60 in the clients).
    pub timeout_secs: Option<u64>,
}

/// Reads `LLM_KIND` and dispatches to the provider-specific constructors.
///
/// Returns `(fast, embedding)` configs.
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for unknown kinds, plus whatever the
/// provider constructors raise for missing variables.
pub fn configs_from_env() -> Result<(LlmModelConfig, LlmModelConfig)> {
    let kind = std::env::var("LLM_KIND").unwrap_or_else(|_| "ollama".to_string());
    match kind.to_lowercase().as_str() {
        "ollama" => Ok((config_ollama_fast()?, config_ollama_embedding()?)),
        "openai" => Ok((config_openai_fast()?, config_openai_embedding()?)),
        other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
    }
}

/// Resolves the Ollama endpoint: `OLLAMA_URL`, else `OLLAMA_PORT` on
/// localhost.
fn ollama_endpoint() -> Result<String> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
            return Ok(format!("http://localhost:{port}"));
        }
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

/// Fast/generation profile on Ollama.
pub fn config_ollama_fast() -> Result<LlmModelConfig> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("OLLAMA_MODEL_FAST")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.7),
        top_p: Some(0.9),
        timeout_secs: Some(45),
    })
}

/// Embedding profile on Ollama. Deterministic settings.
pub fn config_ollama_embedding() -> Result<LlmModelConfig> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("EMBEDDING_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}

/// Fast/generation profile on OpenAI.
pub fn config_openai_fast() -> Result<LlmModelConfig> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAi,
        model: must_env("OPENAI_MODEL_FAST")?,
        endpoint: std::env::var("OPENAI_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com".to_string()),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.7),
        top_p: None,
        timeout_secs: Some(45),
    })
}

/// Embedding profile on OpenAI.
pub fn config_openai_embedding() -> Result<LlmModelConfig> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAi,
        model: must_env("OPENAI_EMBEDDING_MODEL")?,
        endpoint: std::env::var("OPENAI_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com".to_string()),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(30),
    })
}
