//! Optimistic (STM-style) publication.
//!
//! A publication is a small transaction over the vertex: the read phase
//! collects neighbor colors and computes the candidate outside any critical
//! section; the commit re-validates the candidate against the neighbors'
//! *current* colors and publishes atomically. A candidate invalidated by a
//! concurrent neighbor publication aborts the transaction and the vertex
//! retries from a fresh read phase.
//!
//! No software-transactional runtime is involved; the protocol provides the
//! equivalent semantics directly over the atomic color slots.

use crate::graph::Graph;
use crate::publish::{publish_fresh, AbortReason, Publish};
use crate::scratch::{min_available, ColorSet};
use crate::state::{ColorState, RunStats};
use std::sync::{Mutex, PoisonError};

/// One transaction: read phase, validation, atomic publish.
fn try_publish(graph: &Graph, state: &ColorState, v: usize, seen: &mut ColorSet) -> Publish {
    // Read phase, outside the commit.
    let snapshot = state.ceiling();
    let c = min_available(graph, state, v, seen);

    // Commit: the candidate must still be absent from the neighborhood.
    if neighborhood_holds(graph, state, v, c) {
        return Publish::Aborted(AbortReason::CandidateTaken);
    }
    if c >= snapshot && state.try_raise_ceiling(snapshot, c + 1).is_err() {
        return Publish::Aborted(AbortReason::CeilingMoved);
    }
    state.assign(v, c);
    Publish::Committed(c)
}

#[inline]
fn neighborhood_holds(graph: &Graph, state: &ColorState, v: usize, c: i32) -> bool {
    graph.neighbors(v).iter().any(|&u| state.read(u as usize) == c)
}

/// Publishes a color for `v` with a bounded optimistic retry loop.
///
/// After the budget is exhausted the vertex goes through the serialized path;
/// if even the serialized recomputation is invalidated before it can publish,
/// the vertex takes a freshly allocated unique color instead of looping.
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
    let _guard = fallback.lock().unwrap_or_else(PoisonError::into_inner);
    let c = min_available(graph, state, v, seen);
    if neighborhood_holds(graph, state, v, c) {
        return publish_fresh(state, v);
    }
    state.bump_ceiling_to(c);
    state.assign(v, c);
    c
}

// ============================================================================
// Tests
// ============================================================================
