//! Greedy degree-prioritized subgraph sampling.

use super::{DegreeIndex, EntityId, KnowledgeGraph};
use crate::error::{KgdescError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashSet};

/// Node set chosen around one start entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledSubgraph {
    order: Vec<EntityId>,
    nodes: HashSet<EntityId>,
}

impl SampledSubgraph {
    /// The entity sampling started from.
    pub fn start(&self) -> &EntityId {
        &self.order[0]
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false: a sample contains at least its start entity.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.nodes.contains(id)
    }

    pub fn nodes(&self) -> &HashSet<EntityId> {
        &self.nodes
    }

    /// Entities in the order they were added, start first.
    pub fn visit_order(&self) -> &[EntityId] {
        &self.order
    }
}

/// Expand a node set from `start`, always taking the frontier node with the
/// highest global degree next.
///
/// The frontier holds every not-yet-visited neighbor (either direction) of
/// the visited set. Equal degrees are broken by the smaller identifier, so
/// the result depends only on the inputs. Expansion stops when the set
/// reaches `max_nodes` or the frontier runs dry. An entity that is not in
/// the graph yields just `{start}`.
///
/// # Errors
///
/// Returns `InvalidInput` when `max_nodes` is 0.
pub fn sample_subgraph(
    graph: &KnowledgeGraph,
    start: &EntityId,
    degrees: &DegreeIndex,
    max_nodes: usize,
) -> Result<SampledSubgraph> {
    if max_nodes == 0 {
        return Err(KgdescError::InvalidInput(
            "max_nodes must be at least 1".to_string(),
        ));
    }

    let mut visited: HashSet<&EntityId> = HashSet::from([start]);
    let mut order: Vec<&EntityId> = vec![start];

    let mut frontier: BTreeSet<&EntityId> = graph.neighbors(start);
    frontier.remove(start);

    while visited.len() < max_nodes {
        let Some(next) = pick_highest_degree(&frontier, degrees) else {
            break;
        };
        frontier.remove(next);

        if !visited.insert(next) {
            continue;
        }
        order.push(next);

        frontier.extend(
            graph
                .neighbors(next)
                .into_iter()
                .filter(|n| !visited.contains(n)),
        );
    }

    Ok(SampledSubgraph {
        nodes: order.iter().map(|&id| id.clone()).collect(),
        order: order.into_iter().cloned().collect(),
    })
}

/// First candidate in identifier order among those with maximal degree.
fn pick_highest_degree<'a>(
    frontier: &BTreeSet<&'a EntityId>,
    degrees: &DegreeIndex,
) -> Option<&'a EntityId> {
    let mut best: Option<(&'a EntityId, usize)> = None;
    for &candidate in frontier {
        let degree = degrees.get(candidate);
        match best {
            Some((_, best_degree)) if degree <= best_degree => {}
            _ => best = Some((candidate, degree)),
        }
    }
    best.map(|(id, _)| id)
}

/// Choose the start entities for a run.
///
/// With no `sample_size` every entity is used in first-seen order. Otherwise
/// `sample_size` distinct entities (at most the node count) are drawn with an
/// RNG seeded from `seed`.
pub fn select_start_entities(
    graph: &KnowledgeGraph,
    sample_size: Option<usize>,
    seed: u64,
) -> Vec<EntityId> {
    let all: Vec<&EntityId> = graph.entities().collect();
    match sample_size {
        None => all.into_iter().cloned().collect(),
        Some(size) => {
            let mut rng = StdRng::seed_from_u64(seed);
            all.choose_multiple(&mut rng, size.min(all.len()))
                .map(|&id| id.clone())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;

    fn graph_of(triples: &[(&str, &str, &str)]) -> KnowledgeGraph {
        triples
            .iter()
            .map(|&(s, r, o)| Triple::new(s, r, o))
            .collect()
    }

    fn order(sample: &SampledSubgraph) -> Vec<&str> {
        sample.visit_order().iter().map(EntityId::as_str).collect()
    }

    /// S links to a leaf and to a hub with three more leaves.
    fn hub_graph() -> KnowledgeGraph {
        graph_of(&[
            ("S", "r", "a"),
            ("S", "r", "h"),
            ("h", "r", "x1"),
            ("h", "r", "x2"),
            ("x3", "r", "h"),
        ])
    }

    #[test]
    fn test_triangle_scenario() {
        let graph = graph_of(&[("A", "knows", "B"), ("B", "knows", "C"), ("A", "likes", "C")]);
        let degrees = DegreeIndex::compute(&graph);
        let sample = sample_subgraph(&graph, &"A".into(), &degrees, 3).unwrap();

        assert_eq!(sample.len(), 3);
        assert_eq!(order(&sample), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_prefers_high_degree_neighbor() {
        let graph = hub_graph();
        let degrees = DegreeIndex::compute(&graph);

        let sample = sample_subgraph(&graph, &"S".into(), &degrees, 2).unwrap();
        assert_eq!(order(&sample), vec!["S", "h"]);

        // After the hub, every candidate has degree 1; "a" sorts first.
        let sample = sample_subgraph(&graph, &"S".into(), &degrees, 3).unwrap();
        assert_eq!(order(&sample), vec!["S", "h", "a"]);
    }

    #[test]
    fn test_degree_is_global_not_local() {
        // "z" has many edges outside the reachable neighborhood of S.
        let graph = graph_of(&[
            ("S", "r", "b"),
            ("S", "r", "z"),
            ("z", "r", "q1"),
            ("z", "r", "q2"),
            ("b", "r", "S"),
        ]);
        let degrees = DegreeIndex::compute(&graph);
        let sample = sample_subgraph(&graph, &"S".into(), &degrees, 2).unwrap();
        assert_eq!(order(&sample), vec!["S", "z"]);
    }

    #[test]
    fn test_tie_break_is_lexicographic() {
        let graph = graph_of(&[("S", "r", "m"), ("S", "r", "c"), ("S", "r", "k")]);
        let degrees = DegreeIndex::compute(&graph);
        let sample = sample_subgraph(&graph, &"S".into(), &degrees, 4).unwrap();
        assert_eq!(order(&sample), vec!["S", "c", "k", "m"]);
    }

    #[test]
    fn test_budget_invariant_and_start_membership() {
        let graph = hub_graph();
        let degrees = DegreeIndex::compute(&graph);
        for start in ["S", "a", "h", "x1", "x3"] {
            let start = EntityId::from(start);
            for max_nodes in 1..=8 {
                let sample = sample_subgraph(&graph, &start, &degrees, max_nodes).unwrap();
                assert!(sample.len() <= max_nodes);
                assert!(sample.contains(&start));
                assert_eq!(sample.start(), &start);
            }
        }
    }

    #[test]
    fn test_monotonic_containment() {
        let graph = hub_graph();
        let degrees = DegreeIndex::compute(&graph);
        let start = EntityId::from("a");
        for k in 1..7 {
            let smaller = sample_subgraph(&graph, &start, &degrees, k).unwrap();
            let larger = sample_subgraph(&graph, &start, &degrees, k + 1).unwrap();
            assert!(smaller.nodes().is_subset(larger.nodes()));
            assert!(larger.visit_order().starts_with(smaller.visit_order()));
        }
    }

    #[test]
    fn test_deterministic() {
        let graph = hub_graph();
        let degrees = DegreeIndex::compute(&graph);
        let first = sample_subgraph(&graph, &"x1".into(), &degrees, 4).unwrap();
        for _ in 0..10 {
            let again = sample_subgraph(&graph, &"x1".into(), &degrees, 4).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_isolated_and_unknown_start() {
        let graph = hub_graph();
        let degrees = DegreeIndex::compute(&graph);
        for max_nodes in [1, 5, 100] {
            let sample = sample_subgraph(&graph, &"nowhere".into(), &degrees, max_nodes).unwrap();
            assert_eq!(order(&sample), vec!["nowhere"]);
        }
    }

    #[test]
    fn test_small_component_is_exhausted() {
        let graph = graph_of(&[("A", "r", "B"), ("B", "r", "C"), ("X", "r", "Y")]);
        let degrees = DegreeIndex::compute(&graph);
        let sample = sample_subgraph(&graph, &"A".into(), &degrees, 10).unwrap();

        assert_eq!(sample.len(), 3);
        assert!(!sample.contains(&"X".into()));
        assert!(!sample.contains(&"Y".into()));
    }

    #[test]
    fn test_self_loops_and_cycles() {
        let graph = graph_of(&[
            ("A", "same_as", "A"),
            ("A", "r", "B"),
            ("B", "r", "B"),
            ("B", "r", "A"),
            ("B", "r", "A"),
        ]);
        let degrees = DegreeIndex::compute(&graph);
        let sample = sample_subgraph(&graph, &"A".into(), &degrees, 10).unwrap();
        assert_eq!(order(&sample), vec!["A", "B"]);
    }

    #[test]
    fn test_budget_of_one() {
        let graph = hub_graph();
        let degrees = DegreeIndex::compute(&graph);
        let sample = sample_subgraph(&graph, &"h".into(), &degrees, 1).unwrap();
        assert_eq!(order(&sample), vec!["h"]);
    }

    #[test]
    fn test_zero_budget_rejected() {
        let graph = hub_graph();
        let degrees = DegreeIndex::compute(&graph);
        let err = sample_subgraph(&graph, &"S".into(), &degrees, 0).unwrap_err();
        assert!(matches!(err, KgdescError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_degree_entries_count_as_zero() {
        let graph = graph_of(&[("S", "r", "a"), ("S", "r", "b")]);
        let degrees: DegreeIndex = vec![(EntityId::from("b"), 1)].into_iter().collect();
        let sample = sample_subgraph(&graph, &"S".into(), &degrees, 2).unwrap();
        assert_eq!(order(&sample), vec!["S", "b"]);
    }

    #[test]
    fn test_select_all_start_entities() {
        let graph = hub_graph();
        let starts = select_start_entities(&graph, None, 0);
        let names: Vec<_> = starts.iter().map(EntityId::as_str).collect();
        assert_eq!(names, vec!["S", "a", "h", "x1", "x2", "x3"]);
    }

    #[test]
    fn test_select_random_start_entities() {
        let graph = hub_graph();
        let first = select_start_entities(&graph, Some(3), 7);
        let second = select_start_entities(&graph, Some(3), 7);
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        let distinct: HashSet<_> = first.iter().collect();
        assert_eq!(distinct.len(), 3);
        assert!(first.iter().all(|id| graph.contains(id)));

        assert_eq!(select_start_entities(&graph, Some(100), 7).len(), 6);
    }
}
