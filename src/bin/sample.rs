use anyhow::{Context, Result};
use clap::Parser;
use kgdesc::describe::write_blocks;
use kgdesc::graph::{render_blocks, select_start_entities};
use kgdesc::loader::{load_graph_from_folder, load_mapping};
use kgdesc::{Config, DegreeIndex};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "sample")]
#[command(about = "Sample a degree-prioritized subgraph around each entity and write it as text")]
struct Args {
    /// Maximum nodes per sampled subgraph (overrides sampling.max_nodes)
    #[arg(short, long)]
    max_nodes: Option<usize>,

    /// Sample this many random start entities instead of all entities
    #[arg(short, long)]
    sample_size: Option<usize>,

    /// Seed for random start-entity selection
    #[arg(long)]
    seed: Option<u64>,

    /// Output path (overrides output.relations_path)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    let config = Config::load()?;
    log::info!("Configuration loaded successfully");
    log::info!("Dataset folder: {}", config.dataset.folder.display());

    let max_nodes = args.max_nodes.unwrap_or(config.sampling.max_nodes);
    let sample_size = args.sample_size.or(config.sampling.sample_size);
    let seed = args.seed.unwrap_or(config.sampling.seed);
    let output = args.output.unwrap_or_else(|| config.output.relations_path.clone());

    let entity_text = load_mapping(&config.entity_text_path())?;
    let relation_text = load_mapping(&config.relation_text_path())?;

    let graph = load_graph_from_folder(&config.dataset.folder, config.dataset.splits.as_slice())?;
    if graph.node_count() == 0 {
        log::warn!("Graph is empty. Check dataset.folder and dataset.splits in config.toml.");
    }

    let degrees = DegreeIndex::compute(&graph);
    let starts = select_start_entities(&graph, sample_size, seed);
    log::info!(
        "Sampling {} start entities (max_nodes={})",
        starts.len(),
        max_nodes
    );

    let start = Instant::now();
    let blocks = render_blocks(&graph, &degrees, &starts, max_nodes, &entity_text, &relation_text)?;
    log::info!("Rendered {} subgraphs in {:?}", blocks.len(), start.elapsed());

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_blocks(&mut BufWriter::new(file), &blocks)?;

    log::info!("Results saved to {}", output.display());
    Ok(())
}
