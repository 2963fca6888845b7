//! Bounded-speculation (HTM-style) publication.
//!
//! Models a hardware transaction over the publish step: the candidate color
//! is precomputed outside the speculative region, the region itself only
//! re-checks the ceiling and publishes, and a region whose ceiling snapshot
//! drifts aborts rather than committing a stale raise. Aborts back off with
//! exponentially growing pause loops before retrying, and a vertex that
//! exhausts its retry budget is published on the serialized non-transactional
//! path. Very-high-degree vertices skip speculation entirely; their
//! neighborhoods are too contended for short transactions to survive.

use crate::graph::Graph;
use crate::publish::{publish_serialized, AbortReason, Publish};
use crate::scratch::{min_available, ColorSet};
use crate::state::{ColorState, RunStats};
use std::sync::Mutex;

/// Longest back-off pause loop, in spin iterations.
const MAX_BACKOFF_PAUSES: usize = 1_024;

/// One speculative region. The precomputed candidate is reused on the first
/// attempt when it is still below the ceiling; later attempts recompute.
fn try_publish_speculative(
    graph: &Graph,
    state: &ColorState,
    v: usize,
    seen: &mut ColorSet,
    precomputed: i32,
    attempt: u32,
) -> Publish {
    let current = state.ceiling();
    let c = if attempt == 0 && precomputed < current {
        precomputed
    } else {
        min_available(graph, state, v, seen)
    };
    if c >= current && state.try_raise_ceiling(current, c + 1).is_err() {
        // The ceiling moved under the region; abort instead of publishing
        // against a stale snapshot.
        return Publish::Aborted(AbortReason::CeilingMoved);
    }
    state.assign(v, c);
    Publish::Committed(c)
}

/// Exponential back-off between aborted attempts.
#[inline]
fn backoff(attempt: u32) {
    let pauses = (8usize << attempt.min(7)).min(MAX_BACKOFF_PAUSES);
    for _ in 0..pauses {
        std::hint::spin_loop();
    }
}

/// Publishes a color for `v` through the bounded-speculation protocol.
#[allow(clippy::too_many_arguments)]
pub fn publish(
    graph: &Graph,
    state: &ColorState,
    v: usize,
    seen: &mut ColorSet,
    retry_budget: u32,
    high_contention_degree: u32,
    fallback: &Mutex<()>,
    stats: &RunStats,
) -> i32 {
    if graph.degree(v) > high_contention_degree as usize {
        stats.record_fallback();
        return publish_serialized(graph, state, v, seen, fallback);
    }

    // Precompute outside the speculative region to keep the region short.
    let precomputed = min_available(graph, state, v, seen);
    if precomputed < state.ceiling() {
        state.assign(v, precomputed);
        stats.record_commit();
        return precomputed;
    }

    for attempt in 0..=retry_budget {
        if attempt > 0 {
            backoff(attempt);
        }
        match try_publish_speculative(graph, state, v, seen, precomputed, attempt) {
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
