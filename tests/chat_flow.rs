//! Integration tests for the chat endpoint, driven through the router
//! with mock generators behind the model handle.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chat_frontend::handlers::chat::{
    EMPTY_INPUT_MESSAGE, GENERATION_ERROR_PREFIX, MODEL_UNAVAILABLE_MESSAGE,
};
use chat_frontend::services::generator::{mock::MockTextGenerator, ModelHandle};
use chat_frontend::startup::build_router;
use chat_frontend::AppState;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app(model: ModelHandle) -> Router {
    build_router(AppState::new(model))
}

async fn get_page(app: Router) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn post_form(app: Router, form_body: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn get_renders_empty_page() {
    let (status, body) = get_page(app(ModelHandle::unavailable())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("response-area"));
    assert!(!body.contains("class=\"error\""));
}

#[tokio::test]
async fn blank_input_shows_validation_message_without_calling_generator() {
    let generator = Arc::new(MockTextGenerator::with_reply("should never appear"));
    let handle = ModelHandle::from_generator(generator.clone());

    let (status, body) = post_form(app(handle), "text_input=%20%20%20").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(EMPTY_INPUT_MESSAGE));
    assert!(!body.contains("response-area"));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn missing_field_is_treated_as_blank_input() {
    let generator = Arc::new(MockTextGenerator::with_reply("should never appear"));
    let handle = ModelHandle::from_generator(generator.clone());

    let (status, body) = post_form(app(handle), "").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(EMPTY_INPUT_MESSAGE));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn unavailable_model_shows_initialization_failure_message() {
    let (status, body) = post_form(app(ModelHandle::unavailable()), "text_input=Hello").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(MODEL_UNAVAILABLE_MESSAGE));
    assert!(!body.contains("response-area"));
}

#[tokio::test]
async fn successful_generation_renders_the_reply() {
    let handle = ModelHandle::from_generator(Arc::new(MockTextGenerator::with_reply("Hi there!")));

    let (status, body) = post_form(app(handle), "text_input=Hello").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("response-area"));
    assert!(body.contains("Hi there!"));
    assert!(!body.contains("class=\"error\""));
}

#[tokio::test]
async fn generation_failure_renders_the_error_with_detail() {
    let handle =
        ModelHandle::from_generator(Arc::new(MockTextGenerator::failing("generation timed out")));

    let (status, body) = post_form(app(handle), "text_input=Hello").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(GENERATION_ERROR_PREFIX));
    assert!(body.contains("generation timed out"));
    assert!(!body.contains("response-area"));
}

#[tokio::test]
async fn identical_submissions_produce_identical_pages() {
    let handle = ModelHandle::from_generator(Arc::new(MockTextGenerator::with_reply("Hi there!")));
    let router = app(handle);

    let (_, first) = post_form(router.clone(), "text_input=Hello").await;
    let (_, second) = post_form(router, "text_input=Hello").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn input_surrounded_by_whitespace_is_trimmed_before_generation() {
    let handle = ModelHandle::from_generator(Arc::new(MockTextGenerator::with_reply("trimmed ok")));

    let (status, body) = post_form(app(handle), "text_input=%20Hello%20").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("trimmed ok"));
    assert!(!body.contains(EMPTY_INPUT_MESSAGE));
}
