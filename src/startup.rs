use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::chat::{chat_page, chat_submit};
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(chat_page).post(chat_submit))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .with_state(state)
}
