//! Sequential greedy coloring.
//!
//! Colors vertices in the given order, always taking the minimum available
//! color. With a fixed order this is fully deterministic, and the result
//! uses at most `max_degree + 1` colors. The same routine colors the
//! high-degree prefix ahead of every parallel strategy.

use crate::graph::Graph;
use crate::scratch::{min_available, ColorSet};
use crate::state::ColorState;

/// Greedily colors every vertex of `order` that is still uncolored.
pub fn color_in_order(graph: &Graph, state: &ColorState, order: &[u32], seen: &mut ColorSet) {
    for &v in order {
        let v = v as usize;
        if state.read(v) >= 0 {
            continue;
        }
        let c = min_available(graph, state, v, seen);
        state.bump_ceiling_to(c);
        state.assign(v, c);
    }
}

// ============================================================================
// Tests
// ============================================================================
