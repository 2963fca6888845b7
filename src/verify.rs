//! Coloring validity checks.

use crate::graph::Graph;

/// Returns whether `colors` is a proper coloring of `graph`: every vertex
/// carries a non-negative color and no edge joins two equal colors.
pub fn check_coloring(graph: &Graph, colors: &[i32]) -> bool {
    if colors.len() != graph.vertex_count() {
        return false;
    }
    for u in 0..graph.vertex_count() {
        let cu = colors[u];
        if cu < 0 {
            return false;
        }
        for &w in graph.neighbors(u) {
            let w = w as usize;
            if w > u && colors[w] == cu {
                return false;
            }
        }
    }
    true
}

/// Returns the number of colors a coloring uses, `max + 1` over its entries.
pub fn color_count(colors: &[i32]) -> i32 {
    colors.iter().copied().max().map_or(0, |m| m + 1)
}

// ============================================================================
// Tests
// ============================================================================
