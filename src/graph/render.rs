//! Linearize a sampled subgraph into `Head/Relation/Tail` lines.

use super::{sample_subgraph, DegreeIndex, EntityId, KnowledgeGraph, SampledSubgraph, TripleRef};
use crate::error::Result;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Identifier to human-readable text lookup.
///
/// Missing keys fall back to the identifier itself.
#[derive(Debug, Clone, Default)]
pub struct TextMapping {
    entries: HashMap<String, String>,
}

impl TextMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same key overwrite earlier ones.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, text) in iter {
            mapping.insert(key, text);
        }
        mapping
    }
}

/// Keep only the part of an entity's text before the first comma.
pub fn clean_entity(name: &str) -> &str {
    name.split_once(',').map_or(name, |(head, _)| head)
}

impl KnowledgeGraph {
    /// Edges whose subject and object both lie in `nodes`, in graph edge order.
    pub fn induced_triples(&self, nodes: &HashSet<EntityId>) -> Vec<TripleRef<'_>> {
        let mut edges: Vec<_> = nodes
            .iter()
            .filter_map(|id| self.entity_index.get(id))
            .flat_map(|&idx| self.graph.edges_directed(idx, Direction::Outgoing))
            .filter(|edge| nodes.contains(&self.graph[edge.target()]))
            .map(|edge| edge.id())
            .collect();
        edges.sort_unstable();

        edges
            .into_iter()
            .map(|edge| {
                let (source, target) = self.graph.edge_endpoints(edge).unwrap_or_else(|| {
                    unreachable!("edge ids come from this graph")
                });
                TripleRef {
                    subject: &self.graph[source],
                    relation: &self.graph[edge],
                    object: &self.graph[target],
                }
            })
            .collect()
    }
}

/// One `Head: ..; Relation: ..; Tail: ..` line per induced edge.
pub fn subgraph_lines(
    graph: &KnowledgeGraph,
    nodes: &HashSet<EntityId>,
    entity_text: &TextMapping,
    relation_text: &TextMapping,
) -> Vec<String> {
    graph
        .induced_triples(nodes)
        .into_iter()
        .map(|triple| {
            format!(
                "Head: {}; Relation: {}; Tail: {}",
                entity_label(triple.subject, entity_text),
                relation_text.lookup(triple.relation.as_str()),
                entity_label(triple.object, entity_text),
            )
        })
        .collect()
}

/// Newline-joined lines; empty when the node set induces no edges.
pub fn render_subgraph(
    graph: &KnowledgeGraph,
    nodes: &HashSet<EntityId>,
    entity_text: &TextMapping,
    relation_text: &TextMapping,
) -> String {
    subgraph_lines(graph, nodes, entity_text, relation_text).join("\n")
}

/// Text block handed to the description stage: a `Center node:` line for the
/// start entity followed by the rendered edges.
pub fn render_block(
    graph: &KnowledgeGraph,
    nodes: &SampledSubgraph,
    entity_text: &TextMapping,
    relation_text: &TextMapping,
) -> String {
    let center = entity_label(nodes.start(), entity_text);
    let lines = render_subgraph(graph, nodes.nodes(), entity_text, relation_text);
    if lines.is_empty() {
        format!("Center node: {}", center)
    } else {
        format!("Center node: {}\n{}", center, lines)
    }
}

/// Sample and render one block per start entity, in the given order.
pub fn render_blocks(
    graph: &KnowledgeGraph,
    degrees: &DegreeIndex,
    starts: &[EntityId],
    max_nodes: usize,
    entity_text: &TextMapping,
    relation_text: &TextMapping,
) -> Result<Vec<String>> {
    starts
        .iter()
        .map(|start| {
            let nodes = sample_subgraph(graph, start, degrees, max_nodes)?;
            Ok(render_block(graph, &nodes, entity_text, relation_text))
        })
        .collect()
}

fn entity_label<'a>(id: &'a EntityId, entity_text: &'a TextMapping) -> &'a str {
    clean_entity(entity_text.lookup(id.as_str()))
}
