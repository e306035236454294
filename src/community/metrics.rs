//! Community statistics: modularity, density and central members

use std::collections::{HashMap, HashSet};

use crate::community::Community;
use crate::graph::{CoauthorGraph, Neighbors};

/// Renumber labels 0.. in order of first appearance by node index
pub fn relabel(labels: &[usize]) -> Vec<usize> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|label| {
            let next = mapping.len();
            *mapping.entry(*label).or_insert(next)
        })
        .collect()
}

/// Weighted modularity of a labeling.
///
/// `Q = sum_c [ L_c / m - resolution * (d_c / 2m)^2 ]` where `L_c` is the
/// internal edge weight of community c and `d_c` its total weighted degree.
pub fn modularity(graph: &CoauthorGraph, labels: &[usize], resolution: f64) -> f64 {
    let total_weight: f64 = graph.edges().iter().map(|e| e.weight as f64).sum();
    if total_weight == 0.0 {
        return 0.0;
    }

    let mut internal: HashMap<usize, f64> = HashMap::new();
    let mut degree: HashMap<usize, f64> = HashMap::new();

    for edge in graph.edges() {
        let a = labels[edge.source as usize];
        let b = labels[edge.target as usize];
        let w = edge.weight as f64;
        if a == b {
            *internal.entry(a).or_insert(0.0) += w;
        }
        *degree.entry(a).or_insert(0.0) += w;
        *degree.entry(b).or_insert(0.0) += w;
    }

    degree
        .iter()
        .map(|(community, &d)| {
            let l = internal.get(community).copied().unwrap_or(0.0);
            l / total_weight - resolution * (d / (2.0 * total_weight)).powi(2)
        })
        .sum()
}

/// Calculate density (actual internal edges / potential internal edges)
pub fn calculate_density(graph: &CoauthorGraph, members: &[u32]) -> f64 {
    let n = members.len();
    if n <= 1 {
        // By convention, singleton communities have density 1
        return 1.0;
    }

    let member_set: HashSet<u32> = members.iter().copied().collect();
    let adjacency = graph.adjacency();

    // Each internal edge is seen from both ends
    let endpoints: usize = members
        .iter()
        .map(|&node| {
            adjacency
                .neighbors(node as usize)
                .iter()
                .filter(|&&n| member_set.contains(&n))
                .count()
        })
        .sum();

    let potential = n * (n - 1) / 2;
    (endpoints / 2) as f64 / potential as f64
}

/// Members with the highest internal degree, at most five
pub fn identify_central_members(graph: &CoauthorGraph, members: &[u32]) -> Vec<u32> {
    let member_set: HashSet<u32> = members.iter().copied().collect();
    let adjacency = graph.adjacency();

    let mut by_degree: Vec<(u32, usize)> = members
        .iter()
        .map(|&node| {
            let internal = adjacency
                .neighbors(node as usize)
                .iter()
                .filter(|&&n| member_set.contains(&n))
                .count();
            (node, internal)
        })
        .collect();

    by_degree.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    by_degree.into_iter().take(5).map(|(node, _)| node).collect()
}

/// Build community profiles, sorted by size (largest first)
pub fn profile_communities(graph: &CoauthorGraph, labels: &[usize]) -> Vec<Community> {
    let community_count = labels.iter().max().map_or(0, |&max| max + 1);
    let mut grouped: Vec<Vec<u32>> = vec![Vec::new(); community_count];
    for (node, &label) in labels.iter().enumerate() {
        grouped[label].push(node as u32);
    }

    let mut communities: Vec<Community> = grouped
        .into_iter()
        .enumerate()
        .map(|(id, members)| Community {
            id,
            size: members.len(),
            density: calculate_density(graph, &members),
            central_members: identify_central_members(graph, &members)
                .into_iter()
                .map(|node| graph.node_id(node as usize).to_string())
                .collect(),
            members: members
                .iter()
                .map(|&node| graph.node_id(node as usize).to_string())
                .collect(),
        })
        .collect();

    communities.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.id.cmp(&b.id)));
    communities
}
