pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod describe;

pub use config::Config;
pub use error::{KgdescError, Result};
pub use graph::{
    sample_subgraph, render_block, render_subgraph, DegreeIndex, EntityId, KnowledgeGraph,
    RelationId, SampledSubgraph, TextMapping, Triple,
};
