pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;

use services::generator::ModelHandle;

/// Shared application state injected into the request handlers.
#[derive(Clone)]
pub struct AppState {
    pub model: ModelHandle,
}

impl AppState {
    pub fn new(model: ModelHandle) -> Self {
        Self { model }
    }
}
