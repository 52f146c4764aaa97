use std::collections::BTreeSet;
use std::path::PathBuf;

use hf_hub::api::sync::{ApiBuilder, ApiRepo};
use hf_hub::{Repo, RepoType};
use tracing::info;

use crate::error::{InferenceError, Result};

pub struct ModelFiles {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: Vec<PathBuf>,
}

/// Fetch model artifacts from the HuggingFace Hub with the given access token.
pub fn load_model(model_id: &str, revision: &str, token: &str) -> Result<ModelFiles> {
    info!("Loading model: {} (revision: {})", model_id, revision);

    let api = ApiBuilder::new()
        .with_token(Some(token.to_string()))
        .build()
        .map_err(|e| InferenceError::Hub(e.to_string()))?;

    let repo = api.repo(Repo::with_revision(
        model_id.to_string(),
        RepoType::Model,
        revision.to_string(),
    ));

    info!("Downloading config.json...");
    let config = repo
        .get("config.json")
        .map_err(|e| InferenceError::Hub(format!("Failed to download config.json: {}", e)))?;

    info!("Downloading tokenizer...");
    let tokenizer = repo
        .get("tokenizer.json")
        .map_err(|e| InferenceError::Hub(format!("Failed to download tokenizer.json: {}", e)))?;

    info!("Downloading model weights...");
    let weights = download_weights(&repo)?;

    info!(
        "Model files downloaded: config={:?}, tokenizer={:?}, weights={} files",
        config,
        tokenizer,
        weights.len()
    );

    Ok(ModelFiles {
        config,
        tokenizer,
        weights,
    })
}

fn download_weights(repo: &ApiRepo) -> Result<Vec<PathBuf>> {
    if let Ok(path) = repo.get("model.safetensors") {
        return Ok(vec![path]);
    }

    let index = repo.get("model.safetensors.index.json").map_err(|e| {
        InferenceError::Hub(format!(
            "Could not find model weights (tried model.safetensors and model.safetensors.index.json): {}",
            e
        ))
    })?;

    let index_str = std::fs::read_to_string(index)?;
    shard_files(&index_str)?
        .iter()
        .map(|shard| {
            info!("Downloading {}...", shard);
            repo.get(shard)
                .map_err(|e| InferenceError::Hub(format!("Failed to download {}: {}", shard, e)))
        })
        .collect()
}

/// Distinct shard file names referenced by a safetensors index, sorted.
fn shard_files(index_json: &str) -> Result<Vec<String>> {
    let index: serde_json::Value = serde_json::from_str(index_json)?;
    let weight_map = index
        .get("weight_map")
        .and_then(|v| v.as_object())
        .ok_or_else(|| InferenceError::ModelLoad("Index has no weight_map".to_string()))?;

    let shards: BTreeSet<String> = weight_map
        .values()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();

    if shards.is_empty() {
        return Err(InferenceError::ModelLoad("Index lists no weight shards".to_string()));
    }
    Ok(shards.into_iter().collect())
}
