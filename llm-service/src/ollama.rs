//! Thin client for the local Ollama API.
//!
//! Two endpoints are used, both non-streaming:
//! - `POST {endpoint}/api/generate`   — text generation (`stream=false`)
//! - `POST {endpoint}/api/embeddings` — embedding retrieval

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::{LlmModelConfig, LlmProvider};
use crate::errors::{ConfigError, LlmServiceError, Result, make_snippet, validate_endpoint};

/// Non-streaming Ollama client bound to one model config.
///
/// Reuses a single `reqwest::Client` with the configured timeout.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Builds a client from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if the config is not Ollama
    /// - [`ConfigError::InvalidEndpoint`] for a malformed endpoint
    /// - [`LlmServiceError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(ConfigError::UnsupportedProvider("expected ollama".into()).into());
        }
        validate_endpoint(&cfg.endpoint)?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = cfg.endpoint.trim().trim_end_matches('/').to_string();
        Ok(Self {
            url_generate: format!("{base}/api/generate"),
            url_embeddings: format!("{base}/api/embeddings"),
            client,
            cfg,
        })
    }

    /// Non-streaming generation via `/api/generate`.
    ///
    /// `system` is prepended to the prompt since the generate endpoint has
    /// no separate system slot.
    ///
    /// # Errors
    /// [`LlmServiceError::HttpStatus`], [`LlmServiceError::Transport`] or
    /// [`LlmServiceError::Decode`].
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        let full_prompt;
        let prompt = match system {
            Some(sys) => {
                full_prompt = format!("{sys}\n\n{prompt}");
                full_prompt.as_str()
            }
            None => prompt,
        };

        let body = GenerateRequest {
            model: &self.cfg.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.cfg.temperature,
                top_p: self.cfg.top_p,
                num_predict: self.cfg.max_tokens,
            },
        };

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp, &self.url_generate).await?;

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            LlmServiceError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
        })?;
        Ok(out.response)
    }

    /// Embedding retrieval via `/api/embeddings`.
    ///
    /// # Errors
    /// [`LlmServiceError::HttpStatus`], [`LlmServiceError::Transport`] or
    /// [`LlmServiceError::Decode`].
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp, &self.url_embeddings).await?;

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            LlmServiceError::Decode(format!("serde error: {e}; expected `{{ embedding: [..] }}`"))
        })?;
        Ok(out.embedding)
    }
}

/// Converts a non-2xx response into [`LlmServiceError::HttpStatus`].
async fn check_status(resp: reqwest::Response, url: &str) -> Result<reqwest::Response> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    Err(LlmServiceError::HttpStatus {
        status,
        url: url.to_string(),
        snippet: make_snippet(&text),
    })
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: LlmProvider, endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "nomic-embed-text".into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn rejects_wrong_provider() {
        let err = OllamaService::new(cfg(LlmProvider::OpenAi, "http://localhost:11434"));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_bad_endpoint() {
        assert!(OllamaService::new(cfg(LlmProvider::Ollama, "localhost")).is_err());
        assert!(OllamaService::new(cfg(LlmProvider::Ollama, "http://localhost:11434")).is_ok());
    }
}
