//! Traversal kernels shared by the metrics and community stages

use std::collections::{HashMap, VecDeque};

use rayon::prelude::*;

use crate::graph::Neighbors;

/// Sources handled per parallel task in the Brandes passes.
/// Partial sums are combined in chunk order, so results do not depend on
/// thread scheduling.
const SOURCE_CHUNK: usize = 64;

/// Union-Find with path compression and union by size
pub struct DisjointSets {
    parent: Vec<u32>,
    size: Vec<u32>,
}

impl DisjointSets {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size as u32).collect(),
            size: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Attach the smaller tree under the larger one
        if self.size[root_x as usize] >= self.size[root_y as usize] {
            self.parent[root_y as usize] = root_x;
            self.size[root_x as usize] += self.size[root_y as usize];
        } else {
            self.parent[root_x as usize] = root_y;
            self.size[root_y as usize] += self.size[root_x as usize];
        }
    }

    /// Get the size of the set containing x
    #[cfg(test)]
    pub(crate) fn size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.size[root as usize]
    }
}

/// Connected components, each sorted, ordered by their smallest node
pub fn connected_components<G: Neighbors + ?Sized>(graph: &G) -> Vec<Vec<u32>> {
    let node_count = graph.node_count();
    let mut sets = DisjointSets::new(node_count);

    for node in 0..node_count {
        for &neighbor in graph.neighbors(node) {
            sets.union(node as u32, neighbor);
        }
    }

    let mut root_to_component: HashMap<u32, usize> = HashMap::new();
    let mut components: Vec<Vec<u32>> = Vec::new();

    for node in 0..node_count as u32 {
        let root = sets.find(node);
        let slot = *root_to_component.entry(root).or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[slot].push(node);
    }

    components
}

/// Breadth-first hop distances from a source; `None` when unreachable
pub fn bfs_distances<G: Neighbors + ?Sized>(graph: &G, source: usize) -> Vec<Option<u32>> {
    let mut distances = vec![None; graph.node_count()];
    let mut queue = VecDeque::new();

    distances[source] = Some(0);
    queue.push_back(source);

    while let Some(node) = queue.pop_front() {
        let next = distances[node].map(|d| d + 1);
        for &neighbor in graph.neighbors(node) {
            let neighbor = neighbor as usize;
            if distances[neighbor].is_none() {
                distances[neighbor] = next;
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

/// Shortest-path DAG from one source (unweighted), as used by Brandes
struct ShortestPaths {
    /// Nodes in non-decreasing distance order
    order: Vec<usize>,
    /// Number of shortest paths from the source
    sigma: Vec<f64>,
    /// Predecessors on shortest paths
    predecessors: Vec<Vec<usize>>,
}

impl ShortestPaths {
    fn from_source<G: Neighbors + ?Sized>(graph: &G, source: usize) -> Self {
        let n = graph.node_count();
        let mut order = Vec::with_capacity(n);
        let mut sigma = vec![0.0; n];
        let mut distance: Vec<i64> = vec![-1; n];
        let mut predecessors = vec![Vec::new(); n];
        let mut queue = VecDeque::new();

        sigma[source] = 1.0;
        distance[source] = 0;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in graph.neighbors(v) {
                let w = w as usize;
                if distance[w] < 0 {
                    distance[w] = distance[v] + 1;
                    queue.push_back(w);
                }
                if distance[w] == distance[v] + 1 {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        Self {
            order,
            sigma,
            predecessors,
        }
    }
}

/// Raw node betweenness (Brandes), summed over every ordered source.
///
/// For an undirected graph each unordered pair is counted from both ends.
pub fn node_betweenness<G: Neighbors + Sync + ?Sized>(graph: &G) -> Vec<f64> {
    let n = graph.node_count();
    let sources: Vec<usize> = (0..n).collect();

    let partials: Vec<Vec<f64>> = sources
        .par_chunks(SOURCE_CHUNK)
        .map(|chunk| {
            let mut centrality = vec![0.0; n];
            let mut delta = vec![0.0; n];
            for &source in chunk {
                let paths = ShortestPaths::from_source(graph, source);
                delta.iter_mut().for_each(|d| *d = 0.0);
                for &w in paths.order.iter().rev() {
                    for &v in &paths.predecessors[w] {
                        delta[v] += paths.sigma[v] / paths.sigma[w] * (1.0 + delta[w]);
                    }
                    if w != source {
                        centrality[w] += delta[w];
                    }
                }
            }
            centrality
        })
        .collect();

    sum_partials(partials, n)
}

/// Raw edge betweenness keyed by `(min, max)` node pair, summed over every
/// ordered source.
pub fn edge_betweenness<G: Neighbors + Sync + ?Sized>(graph: &G) -> HashMap<(u32, u32), f64> {
    let n = graph.node_count();
    let sources: Vec<usize> = (0..n).collect();

    let partials: Vec<HashMap<(u32, u32), f64>> = sources
        .par_chunks(SOURCE_CHUNK)
        .map(|chunk| {
            let mut centrality: HashMap<(u32, u32), f64> = HashMap::new();
            let mut delta = vec![0.0; n];
            for &source in chunk {
                let paths = ShortestPaths::from_source(graph, source);
                delta.iter_mut().for_each(|d| *d = 0.0);
                for &w in paths.order.iter().rev() {
                    for &v in &paths.predecessors[w] {
                        let share = paths.sigma[v] / paths.sigma[w] * (1.0 + delta[w]);
                        *centrality.entry(edge_key(v, w)).or_insert(0.0) += share;
                        delta[v] += share;
                    }
                }
            }
            centrality
        })
        .collect();

    let mut total: HashMap<(u32, u32), f64> = HashMap::new();
    for partial in partials {
        for (edge, value) in partial {
            *total.entry(edge).or_insert(0.0) += value;
        }
    }

    // Edges on no shortest path still appear with zero
    for v in 0..n {
        for &w in graph.neighbors(v) {
            total.entry(edge_key(v, w as usize)).or_insert(0.0);
        }
    }

    total
}

pub(crate) fn edge_key(a: usize, b: usize) -> (u32, u32) {
    if a < b {
        (a as u32, b as u32)
    } else {
        (b as u32, a as u32)
    }
}

fn sum_partials(partials: Vec<Vec<f64>>, n: usize) -> Vec<f64> {
    let mut total = vec![0.0; n];
    for partial in partials {
        for (acc, value) in total.iter_mut().zip(partial) {
            *acc += value;
        }
    }
    total
}
