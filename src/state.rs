//! Job-scoped coloring state: atomic color slots, the color ceiling, and
//! per-vertex conflict flags.
//!
//! # Publish contract
//!
//! Publishing a color `c` requires the ceiling to already exceed `c`: callers
//! raise the ceiling first, then release-store the color. A reader that
//! observes `color[v] = c >= 0` with an acquire load will, on a subsequent
//! acquire read of the ceiling, observe `ceiling > c`. The ceiling is
//! monotonically non-decreasing for the lifetime of the state.

use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};

/// Sentinel color meaning "uncolored".
pub const UNCOLORED: i32 = -1;

// ============================================================================
// ColorState
// ============================================================================

/// Per-vertex atomic color slots plus the shared ceiling and conflict flags.
///
/// Created once per coloring run; the run exclusively owns it and destroys it
/// when the coloring is emitted. There is no per-cell lock: every cell is an
/// atomic, and the only mutex in the engine guards the serialized fallback.
pub struct ColorState {
    colors: Box<[AtomicI32]>,
    // One past the largest color any vertex currently carries. Padded so CAS
    // traffic on it does not invalidate neighboring color cells.
    ceiling: CachePadded<AtomicI32>,
    conflicts: Box<[AtomicBool]>,
}

impl ColorState {
    /// Creates state for `n` vertices, all uncolored, with ceiling 0.
    pub fn new(n: usize) -> Self {
        let colors: Vec<AtomicI32> = (0..n).map(|_| AtomicI32::new(UNCOLORED)).collect();
        let conflicts: Vec<AtomicBool> = (0..n).map(|_| AtomicBool::new(false)).collect();
        Self {
            colors: colors.into_boxed_slice(),
            ceiling: CachePadded::new(AtomicI32::new(0)),
            conflicts: conflicts.into_boxed_slice(),
        }
    }

    /// Creates state seeded from an existing coloring, with the ceiling set
    /// one past the largest color present. Uncolored entries stay `-1`.
    pub fn from_colors(colors: &[i32]) -> Self {
        let state = Self::new(colors.len());
        let mut max_color = UNCOLORED;
        for (v, &c) in colors.iter().enumerate() {
            state.colors[v].store(c, Ordering::Relaxed);
            max_color = max_color.max(c);
        }
        state.ceiling.store(max_color + 1, Ordering::Release);
        state
    }

    /// Returns the number of vertices tracked.
    #[inline(always)]
    pub fn vertex_count(&self) -> usize {
        self.colors.len()
    }

    /// Publishes color `c` for vertex `v` with release semantics.
    ///
    /// The caller must have raised the ceiling above `c` first.
    #[inline(always)]
    pub fn assign(&self, v: usize, c: i32) {
        debug_assert!(c >= 0);
        debug_assert!(c < self.ceiling(), "color published above the ceiling");
        self.colors[v].store(c, Ordering::Release);
    }

    /// Loads the current color of vertex `v` with acquire semantics.
    #[inline(always)]
    pub fn read(&self, v: usize) -> i32 {
        self.colors[v].load(Ordering::Acquire)
    }

    /// Loads the current ceiling with acquire semantics.
    #[inline(always)]
    pub fn ceiling(&self) -> i32 {
        self.ceiling.load(Ordering::Acquire)
    }

    /// Atomically raises the ceiling so that `ceiling > c`. Monotonic: the
    /// ceiling never decreases, even under concurrent raises.
    #[inline]
    pub fn bump_ceiling_to(&self, c: i32) {
        let mut current = self.ceiling.load(Ordering::Acquire);
        while current <= c {
            match self.ceiling.compare_exchange_weak(
                current,
                c + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    /// Single-shot ceiling raise from an observed snapshot.
    ///
    /// Succeeds only if the ceiling still equals `observed`; on failure the
    /// caller receives the ceiling that beat it and decides whether to retry.
    ///
    /// # Errors
    /// Returns the current ceiling value if it no longer equals `observed`.
    #[inline]
    pub fn try_raise_ceiling(&self, observed: i32, to: i32) -> Result<(), i32> {
        debug_assert!(to > observed);
        self.ceiling
            .compare_exchange(observed, to, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
    }

    /// Allocates a brand-new color nobody else can hold, returning it and
    /// leaving the ceiling above it.
    #[inline]
    pub fn fresh_color(&self) -> i32 {
        self.ceiling.fetch_add(1, Ordering::AcqRel)
    }

    /// Sets or clears the conflict flag of vertex `v`.
    #[inline(always)]
    pub fn set_conflict(&self, v: usize, flagged: bool) {
        self.conflicts[v].store(flagged, Ordering::Relaxed);
    }

    /// Reads the conflict flag of vertex `v`.
    #[inline(always)]
    pub fn has_conflict(&self, v: usize) -> bool {
        self.conflicts[v].load(Ordering::Relaxed)
    }

    /// Copies the current colors out as a plain vector.
    pub fn snapshot_colors(&self) -> Vec<i32> {
        self.colors
            .iter()
            .map(|c| c.load(Ordering::Acquire))
            .collect()
    }
}

// ============================================================================
// RunStats
// ============================================================================

/// Lock-free counters accumulated across workers during a run.
#[derive(Default)]
pub struct RunStats {
    /// Publications that committed through a transactional/optimistic path.
    pub committed: AtomicU64,
    /// Aborted publication attempts (retried or sent to the fallback).
    pub aborted: AtomicU64,
    /// Entries into the serialized fallback path.
    pub fallback_entries: AtomicU64,
    /// Vertices recolored by the conflict resolver.
    pub conflicts_repaired: AtomicU64,
}

impl RunStats {
    /// Creates new zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a committed publication.
    #[inline]
    pub fn record_commit(&self) {
        self.committed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an aborted publication attempt.
    #[inline]
    pub fn record_abort(&self) {
        self.aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one entry into the serialized fallback.
    #[inline]
    pub fn record_fallback(&self) {
        self.fallback_entries.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds repaired-vertex count from a resolver pass.
    #[inline]
    pub fn add_repaired(&self, count: u64) {
        self.conflicts_repaired.fetch_add(count, Ordering::Relaxed);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    // -------------------------------------------------------------------------
    // Basic state tests
    // -------------------------------------------------------------------------

    #[test]
    fn new_state_is_uncolored() {
        let s = ColorState::new(4);
        assert_eq!(s.vertex_count(), 4);
        assert_eq!(s.ceiling(), 0);
        for v in 0..4 {
            assert_eq!(s.read(v), UNCOLORED);
            assert!(!s.has_conflict(v));
        }
    }

    #[test]
    fn assign_and_read_roundtrip() {
        let s = ColorState::new(3);
        s.bump_ceiling_to(2);
        s.assign(1, 2);
        assert_eq!(s.read(1), 2);
        assert_eq!(s.read(0), UNCOLORED);
    }

    #[test]
    fn bump_ceiling_is_monotonic() {
        let s = ColorState::new(1);
        s.bump_ceiling_to(5);
        assert_eq!(s.ceiling(), 6);
        // A lower bump must not lower the ceiling.
        s.bump_ceiling_to(2);
        assert_eq!(s.ceiling(), 6);
        s.bump_ceiling_to(6);
        assert_eq!(s.ceiling(), 7);
    }

    #[test]
    fn try_raise_reports_the_winner() {
        let s = ColorState::new(1);
        assert!(s.try_raise_ceiling(0, 3).is_ok());
        assert_eq!(s.try_raise_ceiling(0, 5), Err(3));
        assert_eq!(s.ceiling(), 3);
    }

    #[test]
    fn fresh_colors_are_distinct_and_below_ceiling() {
        let s = ColorState::new(1);
        let a = s.fresh_color();
        let b = s.fresh_color();
        assert_ne!(a, b);
        assert!(s.ceiling() > a.max(b));
    }

    #[test]
    fn from_colors_seeds_ceiling() {
        let s = ColorState::from_colors(&[0, 3, 1, UNCOLORED]);
        assert_eq!(s.ceiling(), 4);
        assert_eq!(s.read(1), 3);
        assert_eq!(s.read(3), UNCOLORED);
    }

    #[test]
    fn from_colors_all_uncolored() {
        let s = ColorState::from_colors(&[UNCOLORED, UNCOLORED]);
        assert_eq!(s.ceiling(), 0);
    }

    #[test]
    fn conflict_flags_toggle() {
        let s = ColorState::new(2);
        s.set_conflict(0, true);
        assert!(s.has_conflict(0));
        assert!(!s.has_conflict(1));
        s.set_conflict(0, false);
        assert!(!s.has_conflict(0));
    }

    #[test]
    fn snapshot_copies_colors() {
        let s = ColorState::new(3);
        s.bump_ceiling_to(1);
        s.assign(0, 0);
        s.assign(2, 1);
        assert_eq!(s.snapshot_colors(), vec![0, UNCOLORED, 1]);
    }

    // -------------------------------------------------------------------------
    // Concurrency tests
    // -------------------------------------------------------------------------

    #[test]
    fn concurrent_bumps_keep_ceiling_monotonic() {
        let s = Arc::new(ColorState::new(1));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let s = Arc::clone(&s);
                thread::spawn(move || {
                    let mut last_seen = 0;
                    for i in 0..1000 {
                        s.bump_ceiling_to((t * 1000 + i) % 512);
                        let now = s.ceiling();
                        assert!(now >= last_seen, "ceiling decreased: {last_seen} -> {now}");
                        last_seen = now;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(s.ceiling() >= 512);
    }

    #[test]
    fn concurrent_fresh_colors_are_unique() {
        let s = Arc::new(ColorState::new(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let s = Arc::clone(&s);
                thread::spawn(move || (0..500).map(|_| s.fresh_color()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<i32> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 2000);
        assert_eq!(s.ceiling(), 2000);
    }

    #[test]
    fn publish_ordering_visible_across_threads() {
        // A reader that sees color c must then see ceiling > c.
        let s = Arc::new(ColorState::new(1));
        let writer = {
            let s = Arc::clone(&s);
            thread::spawn(move || {
                for c in 0..2000 {
                    s.bump_ceiling_to(c);
                    s.assign(0, c);
                }
            })
        };
        let reader = {
            let s = Arc::clone(&s);
            thread::spawn(move || {
                for _ in 0..2000 {
                    let c = s.read(0);
                    if c >= 0 {
                        assert!(s.ceiling() > c, "saw color {c} without ceiling above it");
                    }
                }
            })
        };
        writer.join().unwrap();
        reader.join().unwrap();
    }

    // -------------------------------------------------------------------------
    // RunStats tests
    // -------------------------------------------------------------------------

    #[test]
    fn run_stats_accumulate() {
        let stats = RunStats::new();
        stats.record_commit();
        stats.record_commit();
        stats.record_abort();
        stats.record_fallback();
        stats.add_repaired(3);
        assert_eq!(stats.committed.load(Ordering::Relaxed), 2);
        assert_eq!(stats.aborted.load(Ordering::Relaxed), 1);
        assert_eq!(stats.fallback_entries.load(Ordering::Relaxed), 1);
        assert_eq!(stats.conflicts_repaired.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn run_stats_concurrent_commits() {
        let stats = Arc::new(RunStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        stats.record_commit();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(stats.committed.load(Ordering::Relaxed), 4000);
    }
}
