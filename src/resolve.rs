//! Iterative conflict detection and repair.
//!
//! Concurrent publication cannot prevent two adjacent vertices from choosing
//! the same color when both were uncolored at the moment each read the other.
//! The resolver restores the adjacency invariant afterwards: detect every
//! conflicting edge, pick one loser per edge, recolor the losers, repeat.
//!
//! Per-vertex lifecycle: `Uncolored -> Tentative(c) -> Committed(c)`, where a
//! vertex selected as a conflict loser transitions back to `Tentative(c')`
//! through repair. A vertex is committed once no detection pass flags it.
//!
//! Termination is guaranteed: after the iteration cap, every vertex still in
//! conflict takes a freshly allocated unique color.

use crate::graph::Graph;
use crate::scratch::{min_available, ColorSet};
use crate::state::{ColorState, RunStats};
use rayon::prelude::*;

// ============================================================================
// Outcome
// ============================================================================

/// What a resolver run did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Repair rounds executed.
    pub iterations: u32,
    /// Whether the iteration cap was hit and the unique-color pass ran.
    pub stalled: bool,
}

// ============================================================================
// Resolver
// ============================================================================

/// Runs detect/repair rounds until the coloring is conflict-free, up to
/// `max_iterations` rounds, then falls back to unique colors.
///
/// Runs on the current rayon pool.
pub fn resolve(
    graph: &Graph,
    state: &ColorState,
    max_iterations: u32,
    stats: &RunStats,
) -> ResolveOutcome {
    let mut iterations = 0u32;
    loop {
        clear_flags(state);
        if !detect(graph, state) {
            return ResolveOutcome {
                iterations,
                stalled: false,
            };
        }
        if iterations >= max_iterations {
            let assigned = unique_color_pass(state);
            stats.add_repaired(assigned);
            return ResolveOutcome {
                iterations,
                stalled: true,
            };
        }
        stats.add_repaired(repair(graph, state));
        iterations += 1;
    }
}

fn clear_flags(state: &ColorState) {
    (0..state.vertex_count())
        .into_par_iter()
        .for_each(|v| state.set_conflict(v, false));
}

/// Flags the loser of every conflicting edge. Each edge is inspected once,
/// from its lower endpoint. Returns whether any conflict was found.
fn detect(graph: &Graph, state: &ColorState) -> bool {
    (0..state.vertex_count())
        .into_par_iter()
        .map(|u| {
            let cu = state.read(u);
            if cu < 0 {
                // An uncolored vertex is its own repair candidate; this lets
                // the resolver also complete partial colorings.
                state.set_conflict(u, true);
                return true;
            }
            let mut found = false;
            for &w in graph.neighbors(u) {
                let w = w as usize;
                if w <= u {
                    continue;
                }
                if state.read(w) == cu {
                    state.set_conflict(loser(graph, u, w), true);
                    found = true;
                }
            }
            found
        })
        .reduce(|| false, |a, b| a || b)
}

/// The vertex that must recolor: strictly lower degree loses; on equal
/// degree the higher id loses. Callers pass `u < w`.
#[inline]
fn loser(graph: &Graph, u: usize, w: usize) -> usize {
    debug_assert!(u < w);
    if graph.degree(u) < graph.degree(w) {
        u
    } else {
        w
    }
}

/// Recolors every flagged vertex against current neighbor colors. Returns
/// the number of vertices recolored.
fn repair(graph: &Graph, state: &ColorState) -> u64 {
    (0..state.vertex_count())
        .into_par_iter()
        .map_init(ColorSet::new, |seen, v| {
            if state.has_conflict(v) {
                let c = min_available(graph, state, v, seen);
                state.bump_ceiling_to(c);
                state.assign(v, c);
                1u64
            } else {
                0
            }
        })
        .sum()
}

/// Serial terminal pass: every vertex still flagged takes a color nobody
/// else can hold.
fn unique_color_pass(state: &ColorState) -> u64 {
    let mut assigned = 0u64;
    for v in 0..state.vertex_count() {
        if state.has_conflict(v) {
            let c = state.fresh_color();
            state.assign(v, c);
            assigned += 1;
        }
    }
    assigned
}

// ============================================================================
// Tests
// ============================================================================
