//! The chat endpoint: one page, GET to render it, POST to submit input.
//!
//! Every outcome renders with status 200; errors are surfaced in-page,
//! never as HTTP error statuses.

use crate::AppState;
use askama::Template;
use axum::{extract::State, response::IntoResponse, Form};
use serde::Deserialize;

/// Token budget for a single reply.
const MAX_RESPONSE_TOKENS: u32 = 1024;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some input before submitting.";
pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "GPT-4All model failed to initialize. Please check the model path or configuration.";
pub const GENERATION_ERROR_PREFIX: &str = "An error occurred while processing your request: ";

#[derive(Template)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub result_message: String,
    pub error_message: String,
}

impl ChatTemplate {
    fn empty() -> Self {
        Self {
            result_message: String::new(),
            error_message: String::new(),
        }
    }

    fn with_result(result_message: String) -> Self {
        Self {
            result_message,
            error_message: String::new(),
        }
    }

    fn with_error(error_message: String) -> Self {
        Self {
            result_message: String::new(),
            error_message,
        }
    }
}

#[derive(Deserialize)]
pub struct ChatForm {
    // A missing field is treated the same as a blank submission.
    #[serde(default)]
    pub text_input: String,
}

pub async fn chat_page() -> impl IntoResponse {
    ChatTemplate::empty()
}

pub async fn chat_submit(
    State(state): State<AppState>,
    Form(payload): Form<ChatForm>,
) -> impl IntoResponse {
    let input = payload.text_input.trim();

    if input.is_empty() {
        tracing::debug!("Rejected blank submission");
        return ChatTemplate::with_error(EMPTY_INPUT_MESSAGE.to_string());
    }

    if !state.model.is_ready() {
        tracing::warn!("Submission received while the model is unavailable");
        return ChatTemplate::with_error(MODEL_UNAVAILABLE_MESSAGE.to_string());
    }

    match state.model.generate(input, MAX_RESPONSE_TOKENS).await {
        Ok(text) => ChatTemplate::with_result(text),
        Err(e) => {
            tracing::error!("Generation failed: {}", e);
            ChatTemplate::with_error(format!("{}{}", GENERATION_ERROR_PREFIX, e))
        }
    }
}
