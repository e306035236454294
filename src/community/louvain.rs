//! Louvain modularity optimisation.
//!
//! Alternates two phases until a level produces no move:
//! local moves (each node joins the neighboring community with the best
//! modularity gain, nodes visited in a seeded random order) and
//! aggregation (each community collapses into one weighted node).

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::community::CommunityStrategy;
use crate::graph::CoauthorGraph;

/// Minimum gain for a move to count, guards against float noise
const MIN_GAIN: f64 = 1e-12;

pub struct Louvain {
    seed: u64,
    resolution: f64,
    max_sweeps: usize,
}

impl Louvain {
    pub fn new(seed: u64, resolution: f64, max_sweeps: usize) -> Self {
        Self {
            seed,
            resolution,
            max_sweeps: max_sweeps.max(1),
        }
    }
}

/// Weighted graph of one aggregation level
struct Level {
    /// Neighbor lists without self-loops
    links: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight per node (internal weight of merged communities)
    loops: Vec<f64>,
}

impl Level {
    fn from_graph(graph: &CoauthorGraph) -> Self {
        let links = (0..graph.node_count())
            .map(|node| {
                graph
                    .incident_weights(node)
                    .map(|(n, w)| (n as usize, w))
                    .collect()
            })
            .collect();

        Self {
            links,
            loops: vec![0.0; graph.node_count()],
        }
    }

    fn len(&self) -> usize {
        self.links.len()
    }

    /// Weighted degree; a self-loop contributes twice
    fn strength(&self, node: usize) -> f64 {
        self.links[node].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.loops[node]
    }

    /// Collapse nodes sharing a community label into single nodes
    fn aggregate(&self, labels: &[usize], count: usize) -> Self {
        let mut loops = vec![0.0; count];
        let mut merged: Vec<HashMap<usize, f64>> = vec![HashMap::new(); count];

        for node in 0..self.len() {
            let c = labels[node];
            loops[c] += self.loops[node];
            for &(neighbor, w) in &self.links[node] {
                let d = labels[neighbor];
                if c == d {
                    // Seen from both endpoints
                    loops[c] += w / 2.0;
                } else {
                    *merged[c].entry(d).or_insert(0.0) += w;
                }
            }
        }

        let links = merged
            .into_iter()
            .map(|row| {
                let mut row: Vec<(usize, f64)> = row.into_iter().collect();
                row.sort_unstable_by_key(|&(n, _)| n);
                row
            })
            .collect();

        Self { links, loops }
    }
}

impl Louvain {
    /// One local-moving phase; returns per-node labels numbered 0.. and
    /// whether any node changed community
    fn move_nodes(&self, level: &Level, rng: &mut StdRng) -> (Vec<usize>, bool) {
        let n = level.len();
        let strength: Vec<f64> = (0..n).map(|node| level.strength(node)).collect();
        let two_m: f64 = strength.iter().sum();

        let mut community: Vec<usize> = (0..n).collect();
        let mut totals = strength.clone();
        let mut moved_any = false;

        if two_m == 0.0 {
            return (community, false);
        }

        let mut order: Vec<usize> = (0..n).collect();

        for _ in 0..self.max_sweeps {
            order.shuffle(rng);
            let mut moved = false;

            for &node in &order {
                let current = community[node];
                let k = strength[node];

                // Weight from this node into each neighboring community
                let mut weights: HashMap<usize, f64> = HashMap::new();
                for &(neighbor, w) in &level.links[node] {
                    *weights.entry(community[neighbor]).or_insert(0.0) += w;
                }

                totals[current] -= k;

                let gain = |c: usize, w_in: f64| w_in - self.resolution * totals[c] * k / two_m;

                let mut best = current;
                let mut best_gain = gain(current, weights.get(&current).copied().unwrap_or(0.0));

                let mut candidates: Vec<(usize, f64)> = weights.into_iter().collect();
                candidates.sort_unstable_by_key(|&(c, _)| c);
                for (c, w_in) in candidates {
                    let g = gain(c, w_in);
                    if g > best_gain + MIN_GAIN {
                        best = c;
                        best_gain = g;
                    }
                }

                totals[best] += k;
                if best != current {
                    community[node] = best;
                    moved = true;
                    moved_any = true;
                }
            }

            if !moved {
                break;
            }
        }

        (super::metrics::relabel(&community), moved_any)
    }
}

impl CommunityStrategy for Louvain {
    fn name(&self) -> &'static str {
        "louvain"
    }

    fn partition(&self, graph: &CoauthorGraph) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut level = Level::from_graph(graph);

        // Original node -> node of the current level
        let mut membership: Vec<usize> = (0..graph.node_count()).collect();

        loop {
            let (labels, moved) = self.move_nodes(&level, &mut rng);
            if !moved {
                break;
            }

            let count = labels.iter().max().map_or(0, |&max| max + 1);
            // Moves that only permuted singletons leave nothing to aggregate
            if count == level.len() {
                break;
            }
            for slot in membership.iter_mut() {
                *slot = labels[*slot];
            }

            log::debug!("Louvain level collapsed {} nodes into {}", level.len(), count);
            level = level.aggregate(&labels, count);
        }

        membership
    }
}
