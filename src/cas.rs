//! Lock-free publication via compare-and-swap on the ceiling.
//!
//! The common case never touches shared write state beyond the vertex's own
//! color slot: if the minimum available color sits below the current ceiling
//! it is stored directly. Only a vertex that needs a brand-new color races on
//! the ceiling, and a bounded CAS loop decides that race.

use crate::graph::Graph;
use crate::publish::{publish_serialized, AbortReason, Publish};
use crate::scratch::{min_available, ColorSet};
use crate::state::{ColorState, RunStats};
use std::sync::Mutex;

/// One publication attempt. Aborts only when the ceiling raise loses a race.
fn try_publish(graph: &Graph, state: &ColorState, v: usize, seen: &mut ColorSet) -> Publish {
    let snapshot = state.ceiling();
    let c = min_available(graph, state, v, seen);
    if c < snapshot {
        state.assign(v, c);
        return Publish::Committed(c);
    }
    match state.try_raise_ceiling(snapshot, c + 1) {
        Ok(()) => {
            state.assign(v, c);
            Publish::Committed(c)
        }
        Err(_) => Publish::Aborted(AbortReason::CeilingMoved),
    }
}

/// Publishes a color for `v`, retrying lost CAS races up to `retry_budget`
/// times before falling through to the serialized path.
pub fn publish(
    graph: &Graph,
    state: &ColorState,
    v: usize,
    seen: &mut ColorSet,
    retry_budget: u32,
    fallback: &Mutex<()>,
    stats: &RunStats,
) -> i32 {
    for _ in 0..=retry_budget {
        match try_publish(graph, state, v, seen) {
            Publish::Committed(c) => {
                stats.record_commit();
                return c;
            }
            Publish::Aborted(_) => stats.record_abort(),
        }
    }
    stats.record_fallback();
    publish_serialized(graph, state, v, seen, fallback)
}

// ============================================================================
// Tests
// ============================================================================
