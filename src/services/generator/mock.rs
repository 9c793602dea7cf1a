//! Mock generator implementations for testing.

use super::{GeneratorError, TextGenerator};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic mock generator returning a fixed reply or a scripted
/// failure, and counting how often it was invoked.
pub struct MockTextGenerator {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl MockTextGenerator {
    /// A generator that always succeeds with `reply`.
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A generator that always fails with `detail`.
    pub fn failing(detail: &str) -> Self {
        Self {
            reply: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(detail) => Err(GeneratorError::GenerationFailed(detail.clone())),
        }
    }
}
