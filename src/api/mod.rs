mod routes;
mod types;

pub use routes::{build_app, create_router, INDEX_MESSAGE};
pub use types::{GenerateRequest, GenerateResponse};

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::LanguageModel;
use crate::tokenizer::TokenizerWrapper;
use candle_core::Device;

/// Shared application state, built once before the server starts.
///
/// The model sits behind a mutex because each forward pass updates its
/// KV cache; the tokenizer is only ever read.
pub struct AppState {
    pub model: Arc<Mutex<Box<dyn LanguageModel>>>,
    pub tokenizer: Arc<TokenizerWrapper>,
    pub device: Device,
    pub model_id: String,
}

impl AppState {
    pub fn new(
        model: Box<dyn LanguageModel>,
        tokenizer: TokenizerWrapper,
        device: Device,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            model: Arc::new(Mutex::new(model)),
            tokenizer: Arc::new(tokenizer),
            device,
            model_id: model_id.into(),
        }
    }
}
