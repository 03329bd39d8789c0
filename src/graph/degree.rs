//! Total-degree index.
//!
//! Degree here is the raw incident-edge count (in + out), with parallel edges
//! counted individually. It is computed once per graph and passed explicitly
//! to the sampler.

use super::{EntityId, KnowledgeGraph};
use std::collections::HashMap;

/// Read-only map from entity to total degree.
#[derive(Debug, Clone, Default)]
pub struct DegreeIndex {
    degrees: HashMap<EntityId, usize>,
}

impl DegreeIndex {
    /// Count every edge once for its subject and once for its object.
    pub fn compute(graph: &KnowledgeGraph) -> Self {
        let mut degrees: HashMap<EntityId, usize> = HashMap::with_capacity(graph.node_count());
        for triple in graph.triples() {
            *degrees.entry(triple.subject.clone()).or_insert(0) += 1;
            *degrees.entry(triple.object.clone()).or_insert(0) += 1;
        }
        Self { degrees }
    }

    /// Degree of `id`; entities never seen in a triple have degree 0.
    pub fn get(&self, id: &EntityId) -> usize {
        self.degrees.get(id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// The `k` highest-degree entities, ties broken by identifier.
    pub fn top(&self, k: usize) -> Vec<(&EntityId, usize)> {
        let mut ranked: Vec<(&EntityId, usize)> =
            self.degrees.iter().map(|(id, &d)| (id, d)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(k);
        ranked
    }
}

impl FromIterator<(EntityId, usize)> for DegreeIndex {
    fn from_iter<I: IntoIterator<Item = (EntityId, usize)>>(iter: I) -> Self {
        Self {
            degrees: iter.into_iter().collect(),
        }
    }
}
