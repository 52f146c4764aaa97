use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemma_generate::api::{self, AppState};
use gemma_generate::config::{Args, GenerationConfig};
use gemma_generate::device::{device_info, get_device};
use gemma_generate::generation::TextGenerator;
use gemma_generate::model::{load_model, GemmaModel, LanguageModel};
use gemma_generate::tokenizer::TokenizerWrapper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "gemma_generate=info,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let token = args.credential()?;

    let device = get_device(args.cpu)?;
    info!("Using device: {}", device_info(&device));

    // Everything below is fatal on failure: no request is served until both
    // handles exist.
    let model_files = load_model(&args.model, &args.revision, token)?;
    let tokenizer = TokenizerWrapper::load(&model_files.tokenizer)?;
    let model: Box<dyn LanguageModel> = Box::new(GemmaModel::load(
        &model_files.config,
        &model_files.weights,
        &device,
    )?);

    info!("Model loaded successfully!");
    info!("Vocabulary size: {}", tokenizer.vocab_size());

    match &args.prompt {
        Some(prompt) => run_single_prompt(model, &tokenizer, &device, prompt),
        None => run_server(AppState::new(model, tokenizer, device, args.model.clone()), &args).await,
    }
}

fn run_single_prompt(
    mut model: Box<dyn LanguageModel>,
    tokenizer: &TokenizerWrapper,
    device: &candle_core::Device,
    prompt: &str,
) -> anyhow::Result<()> {
    let config = GenerationConfig::default();
    let mut generator = TextGenerator::new(model.as_mut(), tokenizer, device);

    let output = generator.generate(prompt, &config)?;

    println!("{}", output.text);
    println!(
        "[{} prompt tokens, {} new tokens, {:.2} tokens/sec, {}ms total]",
        output.prompt_tokens, output.new_tokens, output.tokens_per_second, output.total_time_ms
    );

    Ok(())
}

async fn run_server(state: AppState, args: &Args) -> anyhow::Result<()> {
    let app = api::build_app(Arc::new(state));

    let addr = SocketAddr::new(args.host.parse()?, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving {} on http://{}", args.model, listener.local_addr()?);
    info!("  GET  /          - liveness check");
    info!("  POST /generate  - text generation");

    axum::serve(listener, app).await?;

    Ok(())
}
