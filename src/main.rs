use anyhow::Result;
use kgdesc::loader::load_graph_from_folder;
use kgdesc::{Config, DegreeIndex};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let top = args
        .get(1)
        .map(|s| s.parse::<usize>())
        .transpose()
        .map_err(|e| anyhow::anyhow!("usage: kgdesc [TOP_N]: {}", e))?
        .unwrap_or(10);

    run_graph_summary(top).await
}

/// Load the configured graph and print its size and best-connected entities
async fn run_graph_summary(top: usize) -> Result<()> {
    log::info!("Starting kgdesc v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let folder = config.dataset.folder.clone();
    let splits = config.dataset.splits.clone();

    // Loading is blocking file I/O
    let graph = tokio::task::spawn_blocking(move || load_graph_from_folder(&folder, splits.as_slice()))
        .await??;
    let degrees = DegreeIndex::compute(&graph);

    println!("\n=== kgdesc Graph Summary ===\n");
    println!("  Nodes: {}", graph.node_count());
    println!("  Edges: {}", graph.edge_count());

    if !degrees.is_empty() {
        println!("\nTop {} Entities by Degree:\n", top);
        println!("{:-<50}", "");
        println!("{:<35} {:>12}", "Entity", "Degree");
        println!("{:-<50}", "");
        for (entity, degree) in degrees.top(top) {
            println!("{:<35} {:>12}", entity, degree);
        }
        println!("{:-<50}", "");
    }

    println!();
    Ok(())
}
