//! Compressed adjacency for the undirected co-authorship graph

use serde::{Deserialize, Serialize};

/// Read-only neighbor access shared by the traversal kernels.
///
/// Implemented by the compressed graph and by plain adjacency lists, so the
/// same shortest-path code serves both the frozen graph and the mutable copy
/// used for divisive community detection.
pub trait Neighbors {
    fn node_count(&self) -> usize;

    fn neighbors(&self, node: usize) -> &[u32];

    fn degree(&self, node: usize) -> usize {
        self.neighbors(node).len()
    }
}

/// Compressed sparse row layout of an undirected graph.
///
/// Every undirected edge appears twice, once in each endpoint's row.
/// `edge_slots` runs parallel to `neighbors` and points into the owning
/// graph's edge list, so both directions resolve to the same edge data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// offsets[i] to offsets[i+1] is the neighbor range of node i
    pub offsets: Vec<u32>,

    /// Concatenated, sorted neighbor lists
    pub neighbors: Vec<u32>,

    /// Edge index for each neighbor entry
    pub edge_slots: Vec<u32>,
}

impl CompressedGraph {
    /// Build from per-node `(neighbor, edge_slot)` lists
    pub fn from_adjacency(mut rows: Vec<Vec<(u32, u32)>>) -> Self {
        let node_count = rows.len();
        let entry_count: usize = rows.iter().map(Vec::len).sum();

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut neighbors = Vec::with_capacity(entry_count);
        let mut edge_slots = Vec::with_capacity(entry_count);

        offsets.push(0);
        for row in &mut rows {
            // Sorted rows make `find_edge` a binary search
            row.sort_unstable_by_key(|&(neighbor, _)| neighbor);
            for &(neighbor, slot) in row.iter() {
                neighbors.push(neighbor);
                edge_slots.push(slot);
            }
            offsets.push(neighbors.len() as u32);
        }

        Self {
            node_count,
            offsets,
            neighbors,
            edge_slots,
        }
    }

    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize..self.offsets[node + 1] as usize
    }

    /// Edge indices incident to a node, parallel to `neighbors(node)`
    pub fn incident_edges(&self, node: usize) -> &[u32] {
        &self.edge_slots[self.range(node)]
    }

    /// Edge index joining two nodes, if they are adjacent
    pub fn find_edge(&self, a: usize, b: u32) -> Option<usize> {
        let range = self.range(a);
        self.neighbors[range.clone()]
            .binary_search(&b)
            .ok()
            .map(|pos| self.edge_slots[range.start + pos] as usize)
    }

    #[cfg(test)]
    pub(crate) fn has_edge(&self, a: usize, b: u32) -> bool {
        self.find_edge(a, b).is_some()
    }

    /// Adjacency lists as owned vectors, for algorithms that remove edges
    pub fn to_lists(&self) -> Vec<Vec<u32>> {
        (0..self.node_count)
            .map(|node| self.neighbors(node).to_vec())
            .collect()
    }
}

impl Neighbors for CompressedGraph {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn neighbors(&self, node: usize) -> &[u32] {
        &self.neighbors[self.range(node)]
    }
}

impl Neighbors for Vec<Vec<u32>> {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn neighbors(&self, node: usize) -> &[u32] {
        &self[node]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_tail() -> CompressedGraph {
        // 0-1 (slot 0), 0-2 (slot 1), 1-2 (slot 2), 2-3 (slot 3)
        CompressedGraph::from_adjacency(vec![
            vec![(2, 1), (1, 0)],
            vec![(0, 0), (2, 2)],
            vec![(3, 3), (1, 2), (0, 1)],
            vec![(2, 3)],
        ])
    }

    #[test]
    fn rows_are_sorted_and_symmetric() {
        let graph = triangle_with_tail();
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(2), &[0, 1, 3]);
        assert_eq!(graph.incident_edges(2), &[1, 2, 3]);
        assert_eq!(graph.degree(3), 1);
    }

    #[test]
    fn find_edge_resolves_both_directions() {
        let graph = triangle_with_tail();
        assert_eq!(graph.find_edge(2, 3), Some(3));
        assert_eq!(graph.find_edge(3, 2), Some(3));
        assert!(!graph.has_edge(0, 3));
    }
}
