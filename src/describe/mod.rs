//! Description stage: turn rendered subgraph blocks into one generated
//! description per entity.

mod blocks;
mod client;
mod pipeline;

pub use blocks::{parse_blocks, write_blocks, EntityBlock, SYSTEM_PROMPT};
pub use client::{ChatClient, DescriptionGenerator};
pub use pipeline::{run_pipeline, PipelineSummary};

use crate::error::Result;
use std::path::Path;

/// Read and parse a relations artifact from disk.
pub fn load_blocks(path: &Path) -> Result<Vec<EntityBlock>> {
    let text = std::fs::read_to_string(path)?;
    let blocks = parse_blocks(&text);
    log::info!("Parsed {} entity blocks from {}", blocks.len(), path.display());
    Ok(blocks)
}
