//! Knowledge graph module: multigraph construction, degree index,
//! degree-prioritized subgraph sampling and text rendering.
//!
//! The graph is built once per run and never mutated afterwards; every
//! sampling and rendering pass borrows it read-only.

mod builder;
mod degree;
mod render;
mod sampler;

pub use builder::{build_graph, GraphBuilder};
pub use degree::DegreeIndex;
pub use render::{
    clean_entity, render_block, render_blocks, render_subgraph, subgraph_lines, TextMapping,
};
pub use sampler::{sample_subgraph, select_start_entities, SampledSubgraph};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Opaque entity identifier. Equality is exact string match.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Opaque relation identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationId(pub String);

impl RelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RelationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A (subject, relation, object) fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: EntityId,
    pub relation: RelationId,
    pub object: EntityId,
}

impl Triple {
    pub fn new(
        subject: impl Into<EntityId>,
        relation: impl Into<RelationId>,
        object: impl Into<EntityId>,
    ) -> Self {
        Self {
            subject: subject.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }

    /// Build a triple from raw record fields.
    ///
    /// Returns `None` for records with fewer than three fields. The first
    /// three fields are trimmed; any further fields are ignored.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        match fields {
            [subject, relation, object, ..] => Some(Self::new(
                subject.as_ref().trim(),
                relation.as_ref().trim(),
                object.as_ref().trim(),
            )),
            _ => None,
        }
    }
}

/// Borrowed view of one edge of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripleRef<'a> {
    pub subject: &'a EntityId,
    pub relation: &'a RelationId,
    pub object: &'a EntityId,
}

/// Directed multigraph of triples.
///
/// Parallel edges and self-loops are kept as separate edges. Edges are
/// enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<EntityId, RelationId>,
    entity_index: HashMap<EntityId, NodeIndex>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one triple, creating its endpoint nodes on first sight.
    pub fn add_triple(&mut self, triple: Triple) {
        let subject_idx = self.get_or_create_entity(triple.subject);
        let object_idx = self.get_or_create_entity(triple.object);
        self.graph.add_edge(subject_idx, object_idx, triple.relation);
    }

    fn get_or_create_entity(&mut self, id: EntityId) -> NodeIndex {
        if let Some(&idx) = self.entity_index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.entity_index.insert(id, idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entity_index.contains_key(id)
    }

    /// All entities in first-seen order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityId> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All edges in insertion order.
    pub fn triples(&self) -> impl Iterator<Item = TripleRef<'_>> {
        self.graph.edge_references().map(move |edge| TripleRef {
            subject: &self.graph[edge.source()],
            relation: edge.weight(),
            object: &self.graph[edge.target()],
        })
    }

    /// Distinct predecessors and successors of `id`.
    ///
    /// A node with a self-loop appears in its own neighbor set. Unknown
    /// entities have no neighbors.
    pub fn neighbors(&self, id: &EntityId) -> BTreeSet<&EntityId> {
        match self.entity_index.get(id) {
            Some(&idx) => self
                .graph
                .neighbors_undirected(idx)
                .map(|n| &self.graph[n])
                .collect(),
            None => BTreeSet::new(),
        }
    }

    /// Number of edges touching `id`, counting parallel edges and counting
    /// a self-loop twice.
    pub fn incident_edge_count(&self, id: &EntityId) -> usize {
        self.entity_index.get(id).map_or(0, |&idx| {
            self.graph.edges_directed(idx, Direction::Outgoing).count()
                + self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }
}

impl Extend<Triple> for KnowledgeGraph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.add_triple(triple);
        }
    }
}

impl FromIterator<Triple> for KnowledgeGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}
