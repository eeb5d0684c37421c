//! Shared LLM service used by the triage engine.
//!
//! Thin, non-streaming clients for the two external capabilities the engine
//! depends on:
//! - text **generation** (duplicate reasoning, triage prediction prompts)
//! - **embeddings** (fixed-length vectors for similarity search)
//!
//! Supported providers are local Ollama and the OpenAI REST API. All
//! requests run with bounded timeouts, non-2xx responses are normalized
//! into a unified error type, and clients are cached per configuration key
//! inside [`profiles::LlmServiceProfiles`]. Construct the profiles once,
//! wrap them in `Arc`, and pass clones to dependents; there is no global
//! singleton.

pub mod config;
pub mod errors;
pub mod ollama;
pub mod openai;
pub mod profiles;
pub mod telemetry;

pub use config::{LlmModelConfig, LlmProvider};
pub use errors::{LlmServiceError, Result};
pub use profiles::LlmServiceProfiles;
