//! Shared LLM service with two active profiles: `fast` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (endpoint+model+key+timeout),
//!   so repeated calls never rebuild a client.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    config::{LlmModelConfig, LlmProvider},
    errors::Result,
    ollama::OllamaService,
    openai::OpenAiService,
};

/// Shared service managing the **fast** (generation) and **embedding**
/// profiles.
pub struct LlmServiceProfiles {
    fast: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    /// Creates the service from the two profile configs.
    pub fn new(fast: LlmModelConfig, embedding: LlmModelConfig) -> Self {
        Self {
            fast,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
        }
    }

    /// Creates the service from environment variables (see [`crate::config`]).
    ///
    /// # Errors
    /// Propagates config errors for missing/invalid variables.
    pub fn from_env() -> Result<Self> {
        let (fast, embedding) = crate::config::configs_from_env()?;
        Ok(Self::new(fast, embedding))
    }

    /// Generates text using the **fast** profile.
    ///
    /// # Errors
    /// Returns the underlying client error if generation fails.
    pub async fn generate_fast(&self, prompt: &str, system: Option<&str>) -> Result<String> {
        match self.fast.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.fast).await?;
                cli.generate(prompt, system).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.fast).await?;
                cli.generate(prompt, system).await
            }
        }
    }

    /// Computes an embedding using the **embedding** profile.
    ///
    /// # Errors
    /// Returns the underlying client error if embedding fails.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.embedding).await?;
                cli.embeddings(input).await
            }
            LlmProvider::OpenAi => {
                let cli = self.get_or_init_openai(&self.embedding).await?;
                cli.embeddings(input).await
            }
        }
    }

    /// Returns references to the `(fast, embedding)` profiles.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.fast, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_ollama(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        let mut w = self.ollama.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }

    async fn get_or_init_openai(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        let mut w = self.openai.write().await;
        Ok(w.entry(key).or_insert(cli).clone())
    }
}

/// Cache key identifying a unique client config.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn client_cache_reuses_instances() {
        let svc = LlmServiceProfiles::new(cfg("qwen3:4b"), cfg("nomic-embed-text"));
        let a = svc.get_or_init_ollama(&svc.fast.clone()).await.unwrap();
        let b = svc.get_or_init_ollama(&svc.fast.clone()).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        // Different config gets its own client.
        let c = svc.get_or_init_ollama(&svc.embedding.clone()).await.unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
