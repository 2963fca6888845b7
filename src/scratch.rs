//! Worker-scoped scratch for the minimum-available-color computation.
//!
//! Every worker owns one [`ColorSet`] for its whole run, so the hot loop does
//! no allocation beyond occasional growth when the ceiling rises. The set is
//! never shared; process-wide mutable scratch is deliberately absent.

use crate::graph::Graph;
use crate::state::ColorState;

/// Extra headroom above the ceiling when sizing the scratch set, so colors
/// published concurrently with the scan still land inside the buffer.
pub const CEILING_SLACK: usize = 16;

/// Initial reservation, in colors. A sizing hint only; the set grows on
/// demand and the engine's hard color limit is the vertex count.
const RESERVED_COLORS: usize = 5_000;

// ============================================================================
// ColorSet
// ============================================================================

/// A growable bit-set over color indices.
#[derive(Clone, Debug, Default)]
pub struct ColorSet {
    blocks: Vec<u64>,
}

impl ColorSet {
    /// Creates an empty set with a generous initial reservation.
    pub fn new() -> Self {
        Self {
            blocks: Vec::with_capacity(RESERVED_COLORS / 64),
        }
    }

    /// Clears the set and ensures capacity for at least `colors` entries.
    #[inline]
    pub fn reset(&mut self, colors: usize) {
        let needed = colors.div_ceil(64);
        for block in &mut self.blocks {
            *block = 0;
        }
        if self.blocks.len() < needed {
            self.blocks.resize(needed, 0);
        }
    }

    /// Marks color `c` as taken, growing the set if needed.
    #[inline(always)]
    pub fn mark(&mut self, c: usize) {
        let block = c / 64;
        if block >= self.blocks.len() {
            self.blocks.resize(block + 1, 0);
        }
        self.blocks[block] |= 1u64 << (c % 64);
    }

    /// Returns whether color `c` is marked.
    #[inline(always)]
    pub fn contains(&self, c: usize) -> bool {
        let block = c / 64;
        block < self.blocks.len() && (self.blocks[block] >> (c % 64)) & 1 != 0
    }

    /// Returns the smallest unmarked color.
    #[inline]
    pub fn first_clear(&self) -> usize {
        for (i, &block) in self.blocks.iter().enumerate() {
            if block != u64::MAX {
                return i * 64 + (!block).trailing_zeros() as usize;
            }
        }
        self.blocks.len() * 64
    }
}

// ============================================================================
// min_available
// ============================================================================

/// Computes the smallest color not currently carried by any neighbor of `v`.
///
/// Reads of neighbor colors are acquire loads and tolerate concurrent
/// publication: a color that lands mid-scan either is or is not observed, and
/// the conflict resolver owns whatever races slip through.
///
/// If the returned color equals the current ceiling, the caller must raise
/// the ceiling before publishing.
#[inline]
pub fn min_available(graph: &Graph, state: &ColorState, v: usize, seen: &mut ColorSet) -> i32 {
    seen.reset(state.ceiling() as usize + CEILING_SLACK);
    for &u in graph.neighbors(v) {
        let c = state.read(u as usize);
        if c >= 0 {
            seen.mark(c as usize);
        }
    }
    seen.first_clear() as i32
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // ColorSet tests
    // -------------------------------------------------------------------------

    #[test]
    fn empty_set_first_clear_is_zero() {
        let set = ColorSet::new();
        assert_eq!(set.first_clear(), 0);
    }

    #[test]
    fn mark_and_query() {
        let mut set = ColorSet::new();
        set.reset(8);
        set.mark(0);
        set.mark(2);
        assert!(set.contains(0));
        assert!(!set.contains(1));
        assert!(set.contains(2));
        assert_eq!(set.first_clear(), 1);
    }

    #[test]
    fn first_clear_skips_full_blocks() {
        let mut set = ColorSet::new();
        set.reset(130);
        for c in 0..100 {
            set.mark(c);
        }
        assert_eq!(set.first_clear(), 100);
    }

    #[test]
    fn mark_grows_past_reset_capacity() {
        let mut set = ColorSet::new();
        set.reset(4);
        set.mark(500);
        assert!(set.contains(500));
        assert_eq!(set.first_clear(), 0);
    }

    #[test]
    fn reset_clears_previous_marks() {
        let mut set = ColorSet::new();
        set.reset(64);
        set.mark(3);
        set.reset(64);
        assert!(!set.contains(3));
        assert_eq!(set.first_clear(), 0);
    }

    // -------------------------------------------------------------------------
    // min_available tests
    // -------------------------------------------------------------------------

    use crate::graph::Graph;
    use crate::state::ColorState;

    #[test]
    fn min_available_on_uncolored_neighbors_is_zero() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let s = ColorState::new(3);
        let mut seen = ColorSet::new();
        assert_eq!(min_available(&g, &s, 1, &mut seen), 0);
    }

    #[test]
    fn min_available_skips_taken_colors() {
        let g = Graph::from_edges(4, &[(0, 1), (0, 2), (0, 3)]).unwrap();
        let s = ColorState::new(4);
        s.bump_ceiling_to(2);
        s.assign(1, 0);
        s.assign(2, 1);
        let mut seen = ColorSet::new();
        assert_eq!(min_available(&g, &s, 0, &mut seen), 2);
    }

    #[test]
    fn min_available_fills_gaps() {
        let g = Graph::from_edges(4, &[(0, 1), (0, 2), (0, 3)]).unwrap();
        let s = ColorState::new(4);
        s.bump_ceiling_to(2);
        s.assign(1, 0);
        s.assign(3, 2);
        let mut seen = ColorSet::new();
        assert_eq!(min_available(&g, &s, 0, &mut seen), 1);
    }

    #[test]
    fn min_available_ignores_non_neighbors() {
        let g = Graph::from_edges(4, &[(0, 1), (2, 3)]).unwrap();
        let s = ColorState::new(4);
        s.bump_ceiling_to(0);
        s.assign(2, 0);
        let mut seen = ColorSet::new();
        assert_eq!(min_available(&g, &s, 0, &mut seen), 0);
    }

    #[test]
    fn min_available_handles_colors_above_ceiling_slack() {
        // Seed a neighbor color far above the current ceiling; the scratch
        // set must grow rather than miss it.
        let mut colors = vec![-1; 3];
        colors[1] = 300;
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let s = ColorState::from_colors(&colors);
        let mut seen = ColorSet::new();
        assert_eq!(min_available(&g, &s, 0, &mut seen), 0);
        assert_eq!(min_available(&g, &s, 2, &mut seen), 0);
        // Vertex 1 sees nothing taken.
        assert_eq!(min_available(&g, &s, 1, &mut seen), 0);
    }
}
