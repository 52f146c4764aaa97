use std::path::{Path, PathBuf};

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::gemma::{Config, Model};
use tracing::info;

use super::LanguageModel;
use crate::device::weight_dtype;
use crate::error::{InferenceError, Result};

pub struct GemmaModel {
    model: Model,
    eos_token_id: u32,
}

impl GemmaModel {
    pub fn load(config_path: &Path, weight_paths: &[PathBuf], device: &Device) -> Result<Self> {
        info!("Loading Gemma model configuration...");
        let config_str = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        let eos_token_id = eos_from_config(&config_str)?;

        info!(
            "Gemma config: vocab_size={}, hidden_size={}, num_layers={}, num_heads={}",
            config.vocab_size,
            config.hidden_size,
            config.num_hidden_layers,
            config.num_attention_heads
        );

        if weight_paths.is_empty() {
            return Err(InferenceError::ModelLoad("No weight files to load".to_string()));
        }

        info!("Loading model weights...");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(weight_paths, weight_dtype(device), device)?
        };

        info!("Building Gemma model...");
        let model = Model::new(false, &config, vb)?;

        info!("Gemma model loaded successfully");
        Ok(Self {
            model,
            eos_token_id,
        })
    }
}

/// `eos_token_id` may be a single id or a list; the first entry wins.
/// Gemma checkpoints use id 1 when the field is absent.
fn eos_from_config(config_str: &str) -> Result<u32> {
    let config_json: serde_json::Value = serde_json::from_str(config_str)?;
    let eos = config_json
        .get("eos_token_id")
        .and_then(|v| v.as_u64().or_else(|| v.as_array().and_then(|arr| arr.first()?.as_u64())))
        .unwrap_or(1);
    Ok(eos as u32)
}

impl LanguageModel for GemmaModel {
    fn forward(&mut self, input_ids: &Tensor, position: usize) -> Result<Tensor> {
        let logits = self.model.forward(input_ids, position)?;
        Ok(logits)
    }

    fn reset_cache(&mut self) {
        self.model.clear_kv_cache();
    }

    fn eos_token_id(&self) -> u32 {
        self.eos_token_id
    }
}
