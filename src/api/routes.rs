use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::types::*;
use super::AppState;
use crate::config::GenerationConfig;
use crate::error::{InferenceError, Result};
use crate::generation::TextGenerator;

pub const INDEX_MESSAGE: &str = "App is successfully running!";

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .with_state(state)
}

/// Router plus the HTTP layers the served application runs with.
pub fn build_app(state: Arc<AppState>) -> Router {
    create_router(state).layer(TraceLayer::new_for_http())
}

async fn index() -> &'static str {
    INDEX_MESSAGE
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    info!(
        "Generate request: input_len={}, model={}",
        request.input_text.len(),
        state.model_id
    );

    let config = GenerationConfig::default();

    // Generation is compute-bound; keep it off the async workers so `/`
    // still answers while a long generation holds the model.
    let mut model = state.model.clone().lock_owned().await;
    let tokenizer = state.tokenizer.clone();
    let device = state.device.clone();

    let output = tokio::task::spawn_blocking(move || {
        let mut generator = TextGenerator::new(model.as_mut(), tokenizer.as_ref(), &device);
        generator.generate(&request.input_text, &config)
    })
    .await
    .map_err(|e| InferenceError::Inference(format!("Generation task failed: {}", e)))??;

    Ok(Json(GenerateResponse {
        generated_text: output.text,
    }))
}
