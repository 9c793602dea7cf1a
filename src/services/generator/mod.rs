//! The generation-capability seam.
//!
//! This module provides a trait-based abstraction over the text
//! generation backend, allowing the llama.cpp implementation and the
//! test mocks to be swapped behind the same handle.

#[cfg(feature = "llama")]
pub mod llama;
pub mod mock;

use crate::config::ModelSettings;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Error type for generator operations.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("model backend not available: {0}")]
    Unavailable(String),

    #[error("failed to load model: {0}")]
    LoadFailed(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

/// A text generation backend.
///
/// Each call is scoped to its own session: implementations must not
/// carry conversational state from one call into the next.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a continuation for `prompt`, producing at most
    /// `max_tokens` new tokens. Failures are returned as error values,
    /// never as truncated or garbled silent results.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GeneratorError>;
}

/// Handle to the generation capability, created once at process start.
///
/// The initialization outcome is cached for the process lifetime: a
/// failed load is permanent and every later call short-circuits without
/// touching the backend. The handle is written once at startup and only
/// read afterwards, so it needs no locking.
#[derive(Clone)]
pub struct ModelHandle {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl ModelHandle {
    /// Attempt to load the configured model artifact exactly once.
    ///
    /// On any load error the process continues in degraded mode: the
    /// error is logged and an unavailable handle is returned.
    #[cfg(feature = "llama")]
    pub fn initialize(settings: &ModelSettings) -> Self {
        match llama::LlamaTextGenerator::load(&settings.path) {
            Ok(generator) => {
                tracing::info!(path = %settings.path.display(), "Loaded model");
                Self::from_generator(Arc::new(generator))
            }
            Err(e) => {
                tracing::error!(path = %settings.path.display(), "Failed to load model: {}", e);
                Self::unavailable()
            }
        }
    }

    /// Without the `llama` feature there is no backend to load; the
    /// handle starts out unavailable and the service runs degraded.
    #[cfg(not(feature = "llama"))]
    pub fn initialize(settings: &ModelSettings) -> Self {
        tracing::warn!(
            path = %settings.path.display(),
            "Built without the `llama` feature; no generation backend is available"
        );
        Self::unavailable()
    }

    /// Wrap an already-constructed generator.
    pub fn from_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A handle whose initialization failed (or never happened).
    pub fn unavailable() -> Self {
        Self { generator: None }
    }

    /// Whether the backend loaded successfully at startup.
    pub fn is_ready(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GeneratorError> {
        match &self.generator {
            Some(generator) => generator.generate(prompt, max_tokens).await,
            None => Err(GeneratorError::Unavailable(
                "model failed to initialize at startup".to_string(),
            )),
        }
    }
}
