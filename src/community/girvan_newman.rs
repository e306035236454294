//! Divisive edge-betweenness partitioning.
//!
//! Removes the edge carrying the most shortest paths until the graph splits
//! into more components than it started with, and returns that first split.

use crate::community::CommunityStrategy;
use crate::graph::algorithms::{connected_components, edge_betweenness};
use crate::graph::CoauthorGraph;

pub struct GirvanNewman;

impl GirvanNewman {
    fn labels_from(components: &[Vec<u32>], node_count: usize) -> Vec<usize> {
        let mut labels = vec![0; node_count];
        for (id, component) in components.iter().enumerate() {
            for &node in component {
                labels[node as usize] = id;
            }
        }
        labels
    }
}

impl CommunityStrategy for GirvanNewman {
    fn name(&self) -> &'static str {
        "girvan_newman"
    }

    fn partition(&self, graph: &CoauthorGraph) -> Vec<usize> {
        let n = graph.node_count();
        let mut lists = graph.adjacency().to_lists();
        let mut components = connected_components(&lists);
        let initial = components.len();

        let mut remaining = graph.edge_count();
        while remaining > 0 && components.len() <= initial {
            let scores = edge_betweenness(&lists);

            // Highest score wins, ties go to the smallest node pair
            let Some((a, b)) = scores
                .iter()
                .max_by(|(ka, va), (kb, vb)| va.total_cmp(vb).then_with(|| kb.cmp(ka)))
                .map(|(&key, _)| key)
            else {
                break;
            };

            lists[a as usize].retain(|&x| x != b);
            lists[b as usize].retain(|&x| x != a);
            remaining -= 1;

            log::trace!("Removed co-authorship {}-{}", graph.node_id(a as usize), graph.node_id(b as usize));
            components = connected_components(&lists);
        }

        Self::labels_from(&components, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Publication;
    use crate::graph::build_coauthorship_graph;

    #[test]
    fn splits_at_the_bridge() {
        let graph = build_coauthorship_graph(&[
            Publication::new("P1", vec!["A", "B", "C"], 0),
            Publication::new("P2", vec!["D", "E", "F"], 0),
            Publication::new("P3", vec!["C", "D"], 0),
        ]);

        let labels = GirvanNewman.partition(&graph);
        let (c, d) = (graph.index_of("c").unwrap(), graph.index_of("d").unwrap());
        assert_ne!(labels[c], labels[d]);
        assert_eq!(labels[graph.index_of("a").unwrap()], labels[c]);
        assert_eq!(labels[graph.index_of("f").unwrap()], labels[d]);
    }

    #[test]
    fn disconnected_input_splits_further() {
        // Two components already; the path a-b-c must lose its middle edge
        let graph = build_coauthorship_graph(&[
            Publication::new("P1", vec!["A", "B"], 0),
            Publication::new("P2", vec!["B", "C"], 0),
            Publication::new("P3", vec!["X", "Y"], 0),
        ]);

        let labels = GirvanNewman.partition(&graph);
        let distinct: std::collections::HashSet<usize> = labels.iter().copied().collect();
        assert_eq!(distinct.len(), 3);
    }
}
