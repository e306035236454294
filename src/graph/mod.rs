//! Co-authorship graph representation and algorithms

pub mod algorithms;
pub mod builder;
pub mod compressed;

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};

pub use builder::{build_coauthorship_graph, GraphBuilder};
pub use compressed::{CompressedGraph, Neighbors};

/// Undirected co-authorship between two distinct authors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coauthorship {
    /// Lower node index of the pair
    pub source: u32,
    /// Higher node index of the pair
    pub target: u32,
    /// Number of shared publications, always at least 1
    pub weight: u32,
    /// Titles of the shared publications, in processing order
    pub publications: Vec<String>,
}

/// Weighted co-authorship graph over normalized author ids.
///
/// Nodes are numbered in order of first appearance. Adjacency is stored
/// compressed; each adjacency entry carries the index of its edge in `edges`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoauthorGraph {
    pub(crate) node_ids: Vec<String>,
    pub(crate) index: HashMap<String, u32>,
    pub(crate) adjacency: CompressedGraph,
    pub(crate) edges: Vec<Coauthorship>,
}

/// Aggregate shape of a co-authorship graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_weight: u64,
    pub density: f64,
    pub average_degree: f64,
    pub component_count: usize,
    pub largest_component: usize,
}

impl CoauthorGraph {
    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// Author ids indexed by node
    pub fn node_ids(&self) -> &[String] {
        &self.node_ids
    }

    pub fn node_id(&self, node: usize) -> &str {
        &self.node_ids[node]
    }

    pub fn index_of(&self, author: &str) -> Option<usize> {
        self.index.get(author).map(|&idx| idx as usize)
    }

    pub fn contains(&self, author: &str) -> bool {
        self.index.contains_key(author)
    }

    pub fn adjacency(&self) -> &CompressedGraph {
        &self.adjacency
    }

    pub fn edges(&self) -> &[Coauthorship] {
        &self.edges
    }

    /// Edge between two author ids, in either order
    pub fn edge(&self, a: &str, b: &str) -> Option<&Coauthorship> {
        let a = self.index_of(a)?;
        let b = *self.index.get(b)?;
        self.adjacency.find_edge(a, b).map(|slot| &self.edges[slot])
    }

    /// Neighbor author ids of an author, sorted by node index
    pub fn coauthors(&self, author: &str) -> Vec<&str> {
        match self.index_of(author) {
            Some(node) => self
                .adjacency
                .neighbors(node)
                .iter()
                .map(|&n| self.node_ids[n as usize].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency.degree(node)
    }

    /// Sum of incident edge weights
    pub fn weighted_degree(&self, node: usize) -> u64 {
        self.adjacency
            .incident_edges(node)
            .iter()
            .map(|&slot| self.edges[slot as usize].weight as u64)
            .sum()
    }

    /// `(neighbor, weight)` pairs of a node
    pub(crate) fn incident_weights(&self, node: usize) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.adjacency
            .neighbors(node)
            .iter()
            .zip(self.adjacency.incident_edges(node))
            .map(move |(&n, &slot)| (n, self.edges[slot as usize].weight as f64))
    }

    /// Petgraph view with author ids as node weights and shared-publication
    /// counts as edge weights. Node indices match this graph's.
    pub fn to_petgraph(&self) -> UnGraph<String, u32> {
        let mut graph = UnGraph::with_capacity(self.node_count(), self.edge_count());
        for id in &self.node_ids {
            graph.add_node(id.clone());
        }
        for edge in &self.edges {
            graph.add_edge(
                NodeIndex::new(edge.source as usize),
                NodeIndex::new(edge.target as usize),
                edge.weight,
            );
        }
        graph
    }

    pub fn summary(&self) -> GraphSummary {
        let n = self.node_count();
        let m = self.edge_count();

        let components = algorithms::connected_components(&self.adjacency);

        GraphSummary {
            node_count: n,
            edge_count: m,
            total_weight: self.edges.iter().map(|e| e.weight as u64).sum(),
            density: if n > 1 {
                2.0 * m as f64 / (n as f64 * (n as f64 - 1.0))
            } else {
                0.0
            },
            average_degree: if n > 0 { 2.0 * m as f64 / n as f64 } else { 0.0 },
            component_count: components.len(),
            largest_component: components.iter().map(Vec::len).max().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Publication;

    #[test]
    fn summary_counts_components() {
        let graph = build_coauthorship_graph(&[
            Publication::new("P1", vec!["A", "B"], 1),
            Publication::new("P2", vec!["B", "C"], 1),
            Publication::new("P3", vec!["D", "E"], 1),
        ]);

        let summary = graph.summary();
        assert_eq!(summary.node_count, 5);
        assert_eq!(summary.edge_count, 3);
        assert_eq!(summary.component_count, 2);
        assert_eq!(summary.largest_component, 3);
        assert!((summary.density - 0.3).abs() < 1e-12);
        assert_eq!(
            summary.component_count,
            petgraph::algo::connected_components(&graph.to_petgraph())
        );
    }

    #[test]
    fn empty_graph_summary_is_zeroed() {
        let summary = CoauthorGraph::default().summary();
        assert_eq!(summary.component_count, 0);
        assert_eq!(summary.largest_component, 0);
        assert_eq!(summary.density, 0.0);
    }

    #[test]
    fn petgraph_view_preserves_weights() {
        let graph = build_coauthorship_graph(&[
            Publication::new("P1", vec!["A", "B"], 1),
            Publication::new("P2", vec!["A", "B"], 1),
        ]);

        let view = graph.to_petgraph();
        assert_eq!(view.node_count(), 2);
        assert_eq!(view.edge_count(), 1);
        assert_eq!(view.edge_weights().copied().collect::<Vec<_>>(), vec![2]);
    }
}
