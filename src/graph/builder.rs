//! Co-authorship graph construction

use std::collections::HashMap;

use itertools::Itertools;

use crate::data::Publication;
use crate::graph::{CoauthorGraph, Coauthorship, CompressedGraph};

/// Builder for incrementally constructing a CoauthorGraph
pub struct GraphBuilder {
    /// Mapping from author ids to node indices
    id_to_index: HashMap<String, u32>,

    /// Author ids by node index
    node_ids: Vec<String>,

    /// Per-node map of neighbor index to edge slot
    adjacency: Vec<HashMap<u32, u32>>,

    /// Edge data, addressed by slot
    edges: Vec<Coauthorship>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl GraphBuilder {
    /// Create a new graph builder with room for `capacity` authors
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            adjacency: Vec::with_capacity(capacity),
            edges: Vec::new(),
        }
    }

    /// Get or create the node index for an author id
    pub fn get_or_create_node(&mut self, id: &str) -> u32 {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as u32;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency.push(HashMap::new());

        idx
    }

    /// Record one shared publication between two distinct authors
    pub fn add_coauthorship(&mut self, a: &str, b: &str, title: &str) {
        if a == b {
            return;
        }

        let a_idx = self.get_or_create_node(a);
        let b_idx = self.get_or_create_node(b);

        match self.adjacency[a_idx as usize].get(&b_idx) {
            Some(&slot) => {
                let edge = &mut self.edges[slot as usize];
                edge.weight += 1;
                edge.publications.push(title.to_string());
            }
            None => {
                let slot = self.edges.len() as u32;
                self.edges.push(Coauthorship {
                    source: a_idx.min(b_idx),
                    target: a_idx.max(b_idx),
                    weight: 1,
                    publications: vec![title.to_string()],
                });
                self.adjacency[a_idx as usize].insert(b_idx, slot);
                self.adjacency[b_idx as usize].insert(a_idx, slot);
            }
        }
    }

    /// Add every author pair of a publication.
    ///
    /// Returns the number of pairs recorded: C(k, 2) for k distinct authors,
    /// or 0 when fewer than two remain after normalization.
    pub fn add_publication(&mut self, publication: &Publication) -> usize {
        let authors = publication.normalized_authors();
        if authors.len() < 2 {
            return 0;
        }

        let mut pairs = 0;
        for (a, b) in authors.iter().tuple_combinations() {
            self.add_coauthorship(a, b, &publication.title);
            pairs += 1;
        }
        pairs
    }

    /// Build the compressed co-authorship graph
    pub fn build(self) -> CoauthorGraph {
        let rows: Vec<Vec<(u32, u32)>> = self
            .adjacency
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();

        CoauthorGraph {
            node_ids: self.node_ids,
            index: self.id_to_index,
            adjacency: CompressedGraph::from_adjacency(rows),
            edges: self.edges,
        }
    }
}

/// Build the co-authorship graph for one analysis run.
///
/// Deterministic for a given publication order; publications with fewer than
/// two distinct authors add neither nodes nor edges.
pub fn build_coauthorship_graph(publications: &[Publication]) -> CoauthorGraph {
    log::info!("Building co-authorship graph from {} publications", publications.len());

    let mut builder = GraphBuilder::with_capacity(publications.len());
    let mut skipped = 0usize;

    for publication in publications {
        if builder.add_publication(publication) == 0 {
            skipped += 1;
        }
    }

    let graph = builder.build();

    log::info!(
        "Built graph with {} authors and {} co-authorship edges ({} publications skipped with fewer than two authors)",
        graph.node_count(),
        graph.edge_count(),
        skipped
    );

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_pairs_increment_weight() {
        let graph = build_coauthorship_graph(&[
            Publication::new("P1", vec!["A", "B"], 5),
            Publication::new("P2", vec!["A", "B", "C"], 2),
            Publication::new("P3", vec!["C"], 9),
        ]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);

        let ab = graph.edge("a", "b").unwrap();
        assert_eq!(ab.weight, 2);
        assert_eq!(ab.publications, vec!["P1", "P2"]);
        assert_eq!(graph.edge("c", "a").unwrap().weight, 1);
        assert_eq!(graph.edge("b", "c").unwrap().weight, 1);
    }

    #[test]
    fn single_author_publications_add_nothing() {
        let graph = build_coauthorship_graph(&[
            Publication::new("Solo", vec!["Hermit"], 100),
            Publication::new("Echo", vec!["Twin", " twin "], 3),
        ]);

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn publication_contributes_k_choose_2_pairs() {
        let mut builder = GraphBuilder::default();
        let pairs = builder.add_publication(&Publication::new("P", vec!["A", "B", "C", "D"], 0));
        assert_eq!(pairs, 6);

        let graph = builder.build();
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(graph.coauthors("a"), vec!["b", "c", "d"]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let publications = vec![
            Publication::new("P1", vec!["A", "B"], 1),
            Publication::new("P2", vec!["B", "C"], 1),
        ];

        let first = build_coauthorship_graph(&publications);
        let second = build_coauthorship_graph(&publications);
        assert_eq!(first.node_ids(), second.node_ids());
        assert_eq!(first.edges(), second.edges());
    }
}
