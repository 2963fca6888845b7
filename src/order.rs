//! Degree-descending vertex processing order.
//!
//! High-degree vertices are the most constrained, so scheduling them first
//! lowers the total color count and reduces inter-thread conflicts in the
//! parallel phases. Ties break by ascending vertex id so the order is a
//! deterministic function of the graph.

use crate::graph::Graph;
use rayon::prelude::*;

/// Largest vertex count for which a direct comparison sort is used; above
/// this a degree-bucket pass keeps ordering linear in `N + max_degree`.
pub const DIRECT_SORT_MAX: usize = 10_000;

/// Computes the processing order: a permutation of `[0..N)` sorted by degree
/// descending, ties by ascending vertex id.
///
/// Both internal paths produce the identical permutation.
pub fn processing_order(graph: &Graph) -> Vec<u32> {
    if graph.vertex_count() <= DIRECT_SORT_MAX {
        direct_order(graph)
    } else {
        bucket_order(graph)
    }
}

fn direct_order(graph: &Graph) -> Vec<u32> {
    let mut order: Vec<u32> = (0..graph.vertex_count() as u32).collect();
    order.sort_unstable_by(|&a, &b| {
        graph
            .degree(b as usize)
            .cmp(&graph.degree(a as usize))
            .then(a.cmp(&b))
    });
    order
}

fn bucket_order(graph: &Graph) -> Vec<u32> {
    let n = graph.vertex_count();
    let mut degrees = vec![0usize; n];
    degrees
        .par_iter_mut()
        .enumerate()
        .for_each(|(v, d)| *d = graph.degree(v));

    // Vertices enter their bin in ascending id order, and bins are emptied
    // high-to-low, which reproduces the direct sort's tie-break exactly.
    let mut bins: Vec<Vec<u32>> = vec![Vec::new(); graph.max_degree() + 1];
    for v in 0..n {
        bins[degrees[v]].push(v as u32);
    }

    let mut order = Vec::with_capacity(n);
    for bin in bins.iter().rev() {
        order.extend_from_slice(bin);
    }
    order
}

// ============================================================================
// Tests
// ============================================================================
