//! Publication outcomes and the serialized fallback path shared by the
//! parallel strategies.
//!
//! A publication attempt never unwinds: it returns a typed [`Publish`] value
//! and the per-strategy retry loop inspects it. The serialized fallback is
//! the only blocking point in the engine and is entered rarely.

use crate::graph::Graph;
use crate::scratch::{min_available, ColorSet};
use crate::state::ColorState;
use std::sync::{Mutex, PoisonError};

// ============================================================================
// Outcomes
// ============================================================================

/// Why a speculative publication attempt did not commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// The ceiling moved between the snapshot and the raise.
    CeilingMoved,
    /// A neighbor claimed the candidate color before the commit.
    CandidateTaken,
}

/// Typed outcome of one publication attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Publish {
    /// The color was published.
    Committed(i32),
    /// The attempt must be retried or routed to the fallback.
    Aborted(AbortReason),
}

impl Publish {
    /// Returns the committed color, if any.
    #[inline]
    pub fn committed(self) -> Option<i32> {
        match self {
            Publish::Committed(c) => Some(c),
            Publish::Aborted(_) => None,
        }
    }
}

// ============================================================================
// Serialized fallback
// ============================================================================

/// Publishes `v` under the fallback mutex: recompute the minimum available
/// color, raise the ceiling, and publish. Always succeeds.
///
/// Serialization is only against other fallback entrants; speculative
/// publishers keep running, and any conflict that slips through is the
/// resolver's to repair.
pub fn publish_serialized(
    graph: &Graph,
    state: &ColorState,
    v: usize,
    seen: &mut ColorSet,
    fallback: &Mutex<()>,
) -> i32 {
    let _guard = fallback.lock().unwrap_or_else(PoisonError::into_inner);
    let c = min_available(graph, state, v, seen);
    state.bump_ceiling_to(c);
    state.assign(v, c);
    c
}

/// Publishes a freshly allocated color nobody else can hold. Conflict-free by
/// construction, at the cost of color quality.
pub fn publish_fresh(state: &ColorState, v: usize) -> i32 {
    let c = state.fresh_color();
    state.assign(v, c);
    c
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn committed_accessor() {
        assert_eq!(Publish::Committed(3).committed(), Some(3));
        assert_eq!(Publish::Aborted(AbortReason::CeilingMoved).committed(), None);
    }

    #[test]
    fn serialized_publish_picks_minimum() {
        let g = Graph::from_edges(3, &[(0, 1), (0, 2)]).unwrap();
        let s = ColorState::new(3);
        s.bump_ceiling_to(1);
        s.assign(1, 0);
        s.assign(2, 1);
        let mut seen = ColorSet::new();
        let fallback = Mutex::new(());
        let c = publish_serialized(&g, &s, 0, &mut seen, &fallback);
        assert_eq!(c, 2);
        assert_eq!(s.read(0), 2);
        assert!(s.ceiling() > 2);
    }

    #[test]
    fn serialized_publish_on_isolated_vertex() {
        let g = Graph::from_edges(1, &[]).unwrap();
        let s = ColorState::new(1);
        let mut seen = ColorSet::new();
        let fallback = Mutex::new(());
        assert_eq!(publish_serialized(&g, &s, 0, &mut seen, &fallback), 0);
        assert_eq!(s.ceiling(), 1);
    }

    #[test]
    fn fresh_publish_never_collides() {
        let s = Arc::new(ColorState::new(64));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let s = Arc::clone(&s);
                thread::spawn(move || {
                    for i in 0..16 {
                        publish_fresh(&s, t * 16 + i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let mut colors = s.snapshot_colors();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), 64);
    }
}
