//! Graph construction from raw triple records.

use super::{KnowledgeGraph, Triple};

/// Accumulates triple records from one or more sources into a single graph.
///
/// Records with fewer than three fields are skipped and counted. Identical
/// triples are all kept, so the same fact seen in two source files shows up
/// as two parallel edges.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: KnowledgeGraph,
    accepted: usize,
    skipped: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single record. Returns `false` if it was malformed and skipped.
    pub fn add_record<S: AsRef<str>>(&mut self, fields: &[S]) -> bool {
        match Triple::from_fields(fields) {
            Some(triple) => {
                self.graph.add_triple(triple);
                self.accepted += 1;
                true
            }
            None => {
                self.skipped += 1;
                false
            }
        }
    }

    pub fn add_records<I, R, S>(&mut self, records: I)
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        for record in records {
            self.add_record(record.as_ref());
        }
    }

    pub fn add_triple(&mut self, triple: Triple) {
        self.graph.add_triple(triple);
        self.accepted += 1;
    }

    /// Number of records turned into edges so far
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Number of malformed records dropped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn build(self) -> KnowledgeGraph {
        log::debug!(
            "Built graph from {} records ({} malformed skipped)",
            self.accepted,
            self.skipped
        );
        self.graph
    }
}

/// Build a graph from an in-memory sequence of records.
pub fn build_graph<I, R, S>(records: I) -> KnowledgeGraph
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut builder = GraphBuilder::new();
    builder.add_records(records);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EntityId;

    #[test]
    fn test_build_skips_malformed_records() {
        let records = vec![
            vec!["A", "knows", "B"],
            vec!["A", "knows"],
            vec![],
            vec!["B", "knows", "C"],
        ];
        let mut builder = GraphBuilder::new();
        builder.add_records(&records);
        assert_eq!(builder.accepted(), 2);
        assert_eq!(builder.skipped(), 2);

        let graph = builder.build();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_build_trims_identifiers() {
        let graph = build_graph(vec![vec!["  A", "knows ", " B "]]);
        assert!(graph.contains(&EntityId::from("A")));
        assert!(graph.contains(&EntityId::from("B")));
        let triple = graph.triples().next().unwrap();
        assert_eq!(triple.relation.as_str(), "knows");
    }

    #[test]
    fn test_merge_keeps_duplicates_across_sources() {
        let train = vec![vec!["A", "r", "B"]];
        let test = vec![vec!["A", "r", "B"]];

        let mut builder = GraphBuilder::new();
        builder.add_records(&train);
        builder.add_records(&test);
        let graph = builder.build();

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_merge_order_does_not_change_structure() {
        let first = vec![vec!["A", "r", "B"], vec!["B", "s", "C"]];
        let second = vec![vec!["C", "t", "A"]];

        let mut forward = GraphBuilder::new();
        forward.add_records(&first);
        forward.add_records(&second);
        let forward = forward.build();

        let mut backward = GraphBuilder::new();
        backward.add_records(&second);
        backward.add_records(&first);
        let backward = backward.build();

        assert_eq!(forward.node_count(), backward.node_count());
        assert_eq!(forward.edge_count(), backward.edge_count());
        for id in ["A", "B", "C"] {
            let id = EntityId::from(id);
            assert_eq!(forward.neighbors(&id), backward.neighbors(&id));
            assert_eq!(forward.incident_edge_count(&id), backward.incident_edge_count(&id));
        }
    }
}
