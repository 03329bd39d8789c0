use anyhow::{Context, Result};
use clap::Parser;
use kgdesc::describe::{load_blocks, run_pipeline, ChatClient};
use kgdesc::Config;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "describe")]
#[command(about = "Generate one description per entity block of the relations file")]
struct Args {
    /// Relations file to read (overrides output.relations_path)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Descriptions CSV to write (overrides output.descriptions_path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum concurrent requests (overrides generation.concurrency)
    #[arg(short, long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let config = Config::load()?;
    log::info!("Configuration loaded successfully");

    let input = args.input.unwrap_or_else(|| config.output.relations_path.clone());
    let output = args.output.unwrap_or_else(|| config.output.descriptions_path.clone());
    let concurrency = args.concurrency.unwrap_or(config.generation.concurrency);

    let blocks = load_blocks(&input)
        .with_context(|| format!("Failed to read relations file {}", input.display()))?;
    if blocks.is_empty() {
        log::warn!("No entity blocks found in {}. Run `sample` first.", input.display());
    }

    let api_key = config.api_key()?;
    let client = ChatClient::new(api_key, &config.generation)?;
    log::info!(
        "Generator configured: model={}, concurrency={}",
        config.generation.model,
        concurrency
    );

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let summary = run_pipeline(Arc::new(client), blocks, concurrency, BufWriter::new(file)).await?;

    log::info!("Successfully described: {} entities", summary.succeeded);
    if summary.failed > 0 {
        log::warn!("Failed to describe: {} entities (see rows starting with \"Error:\")", summary.failed);
    }
    log::info!("All entity descriptions have been saved to {}", output.display());

    Ok(())
}
