//! llama.cpp-backed text generation.
//!
//! The backend and model are loaded once at startup; every `generate`
//! call runs inside its own freshly created inference context, so no
//! conversational state survives from one request to the next.

use super::{GeneratorError, TextGenerator};
use async_trait::async_trait;
use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::token::data_array::LlamaTokenDataArray;
use std::num::NonZeroU32;
use std::path::Path;
use tokio::sync::Mutex;

/// Size of the per-call prompt context.
const CONTEXT_WINDOW: u32 = 4096;

pub struct LlamaTextGenerator {
    backend: LlamaBackend,
    model: LlamaModel,
    // One in-flight generation at a time; requests queue on this lock.
    generation_lock: Mutex<()>,
}

impl LlamaTextGenerator {
    /// Load the GGUF model at `path`. Called exactly once at startup.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let backend =
            LlamaBackend::init().map_err(|e| GeneratorError::LoadFailed(e.to_string()))?;
        let model_params = LlamaModelParams::default();
        let model = LlamaModel::load_from_file(&backend, path, &model_params)
            .map_err(|e| GeneratorError::LoadFailed(e.to_string()))?;

        Ok(Self {
            backend,
            model,
            generation_lock: Mutex::new(()),
        })
    }

    /// Wrap the raw user text in the Llama-3 instruct chat framing.
    fn frame_prompt(prompt: &str) -> String {
        format!(
            "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n\n{prompt}<|eot_id|>\
             <|start_header_id|>assistant<|end_header_id|>\n\n"
        )
    }
}

#[async_trait]
impl TextGenerator for LlamaTextGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GeneratorError> {
        let _guard = self.generation_lock.lock().await;

        let framed = Self::frame_prompt(prompt);
        let tokens = self
            .model
            .str_to_token(&framed, AddBos::Never)
            .map_err(|e| GeneratorError::Tokenizer(e.to_string()))?;

        let ctx_params =
            LlamaContextParams::default().with_n_ctx(NonZeroU32::new(CONTEXT_WINDOW));
        let mut ctx = self
            .model
            .new_context(&self.backend, ctx_params)
            .map_err(|e| GeneratorError::GenerationFailed(e.to_string()))?;

        let n_ctx = ctx.n_ctx();
        if tokens.len() as u32 + max_tokens > n_ctx {
            return Err(GeneratorError::GenerationFailed(format!(
                "prompt of {} tokens plus a budget of {} exceeds the {} token context window",
                tokens.len(),
                max_tokens,
                n_ctx
            )));
        }

        // Submit the whole prompt in one batch; logits are only needed
        // for the last prompt token.
        let mut batch = LlamaBatch::new(n_ctx as usize, 1);
        let last_index = tokens.len() as i32 - 1;
        for (i, token) in (0_i32..).zip(tokens.into_iter()) {
            batch
                .add(token, i, &[0], i == last_index)
                .map_err(|e| GeneratorError::GenerationFailed(e.to_string()))?;
        }
        ctx.decode(&mut batch)
            .map_err(|e| GeneratorError::GenerationFailed(e.to_string()))?;

        let mut n_cur = batch.n_tokens();
        let mut decoder = encoding_rs::UTF_8.new_decoder();
        let mut output = String::new();

        for _ in 0..max_tokens {
            let candidates = LlamaTokenDataArray::from_iter(ctx.candidates(), false);
            let new_token = ctx.sample_token_greedy(candidates);

            if self.model.is_eog_token(new_token) {
                break;
            }

            let token_bytes = self
                .model
                .token_to_bytes(new_token, Special::Tokenize)
                .map_err(|e| GeneratorError::Tokenizer(e.to_string()))?;
            let mut piece = String::with_capacity(32);
            let _ = decoder.decode_to_string(&token_bytes, &mut piece, false);
            output.push_str(&piece);

            batch.clear();
            batch
                .add(new_token, n_cur, &[0], true)
                .map_err(|e| GeneratorError::GenerationFailed(e.to_string()))?;
            n_cur += 1;
            ctx.decode(&mut batch)
                .map_err(|e| GeneratorError::GenerationFailed(e.to_string()))?;
        }

        Ok(output)
    }
}
