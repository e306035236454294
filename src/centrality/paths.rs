//! Shortest-path centralities: betweenness and closeness

use rayon::prelude::*;

use crate::graph::algorithms::{bfs_distances, node_betweenness};
use crate::graph::Neighbors;

/// Normalized betweenness: the fraction of shortest paths between other
/// pairs that pass through each node.
pub fn betweenness_centrality<G: Neighbors + Sync + ?Sized>(graph: &G) -> Vec<f64> {
    let n = graph.node_count();
    let raw = node_betweenness(graph);

    if n <= 2 {
        return raw;
    }

    // Raw sums count each unordered pair twice; (n-1)(n-2) is twice the pair count
    let scale = 1.0 / ((n as f64 - 1.0) * (n as f64 - 2.0));
    raw.into_iter().map(|value| value * scale).collect()
}

/// Closeness with the Wasserman-Faust correction for disconnected graphs.
///
/// For a node reaching r nodes (itself included) at total distance d:
/// `((r - 1) / d) * ((r - 1) / (n - 1))`, or 0 when nothing is reachable.
pub fn closeness_centrality<G: Neighbors + Sync + ?Sized>(graph: &G) -> Vec<f64> {
    let n = graph.node_count();

    (0..n)
        .into_par_iter()
        .map(|node| {
            let distances = bfs_distances(graph, node);
            let (reachable, total) = distances
                .iter()
                .flatten()
                .fold((0usize, 0u64), |(count, sum), &d| (count + 1, sum + d as u64));

            if total == 0 || n <= 1 {
                return 0.0;
            }

            let others = (reachable - 1) as f64;
            (others / total as f64) * (others / (n as f64 - 1.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_of_three() {
        let lists: Vec<Vec<u32>> = vec![vec![1], vec![0, 2], vec![1]];

        let betweenness = betweenness_centrality(&lists);
        assert_eq!(betweenness, vec![0.0, 1.0, 0.0]);

        let closeness = closeness_centrality(&lists);
        assert!((closeness[1] - 1.0).abs() < 1e-12);
        assert!((closeness[0] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn disconnected_pairs_are_penalized() {
        // Two separate edges: each node reaches one other at distance 1
        let lists: Vec<Vec<u32>> = vec![vec![1], vec![0], vec![3], vec![2]];
        let closeness = closeness_centrality(&lists);
        for value in closeness {
            assert!((value - 1.0 / 3.0).abs() < 1e-12);
        }
    }
}
