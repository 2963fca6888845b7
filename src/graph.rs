//! Immutable CSR (compressed sparse row) graph store.
//!
//! The store is built once from an unordered edge list and never mutated.
//! Neighbor rows are sorted ascending and deduplicated, so iteration order is
//! deterministic and binary-searchable.

use std::fmt;

// ============================================================================
// Graph
// ============================================================================

/// An undirected graph in CSR form.
///
/// Representation:
/// - `offsets[v]..offsets[v+1]` indexes the neighbor row of vertex `v`.
/// - `neighbors` stores every undirected edge twice, once per direction.
///
/// Invariants (checked in debug builds):
/// - `offsets` is monotonically non-decreasing with `offsets[n] == neighbors.len()`.
/// - No row contains duplicates or a self-loop.
/// - Adjacency is symmetric: `u ∈ neighbors(v) ⇔ v ∈ neighbors(u)`.
#[derive(Clone, Debug)]
pub struct Graph {
    offsets: Vec<usize>,
    neighbors: Vec<u32>,
    max_degree: usize,
}

impl Graph {
    /// Builds a graph from a vertex count and an unordered edge list.
    ///
    /// Self-loops are dropped and duplicate edges (in either orientation) are
    /// deduplicated; both are silent. Both directions of every surviving edge
    /// are materialized.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidVertex`] if any endpoint is `>= n`.
    pub fn from_edges(n: usize, edges: &[(u32, u32)]) -> Result<Self, GraphError> {
        for (index, &(u, v)) in edges.iter().enumerate() {
            let bad = if u as usize >= n {
                Some(u)
            } else if v as usize >= n {
                Some(v)
            } else {
                None
            };
            if let Some(vertex) = bad {
                return Err(GraphError::InvalidVertex {
                    edge_index: index,
                    vertex,
                    vertex_count: n,
                });
            }
        }

        // Counting-sort construction: degree counts, prefix-sum offsets,
        // scatter, then per-row sort + in-place dedup compaction.
        let mut counts = vec![0usize; n];
        for &(u, v) in edges {
            if u != v {
                counts[u as usize] += 1;
                counts[v as usize] += 1;
            }
        }

        let mut offsets = vec![0usize; n + 1];
        for v in 0..n {
            offsets[v + 1] = offsets[v] + counts[v];
        }

        let mut neighbors = vec![0u32; offsets[n]];
        let mut cursor = offsets.clone();
        for &(u, v) in edges {
            if u != v {
                neighbors[cursor[u as usize]] = v;
                cursor[u as usize] += 1;
                neighbors[cursor[v as usize]] = u;
                cursor[v as usize] += 1;
            }
        }

        // Compaction never overtakes the read position: the write index stays
        // at or below the start of the row being read.
        let mut compact_offsets = vec![0usize; n + 1];
        let mut write = 0usize;
        let mut max_degree = 0usize;
        for v in 0..n {
            let (start, end) = (offsets[v], offsets[v + 1]);
            neighbors[start..end].sort_unstable();
            compact_offsets[v] = write;
            let mut prev: Option<u32> = None;
            for read in start..end {
                let w = neighbors[read];
                if prev != Some(w) {
                    neighbors[write] = w;
                    write += 1;
                    prev = Some(w);
                }
            }
            max_degree = max_degree.max(write - compact_offsets[v]);
        }
        compact_offsets[n] = write;
        neighbors.truncate(write);

        let graph = Self {
            offsets: compact_offsets,
            neighbors,
            max_degree,
        };
        graph.debug_check_invariants();
        Ok(graph)
    }

    /// Returns the number of vertices.
    #[inline(always)]
    pub fn vertex_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns the number of undirected edges.
    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// Returns the degree of vertex `v`.
    #[inline(always)]
    pub fn degree(&self, v: usize) -> usize {
        debug_assert!(v < self.vertex_count());
        self.offsets[v + 1] - self.offsets[v]
    }

    /// Returns the sorted neighbor row of vertex `v`.
    #[inline(always)]
    pub fn neighbors(&self, v: usize) -> &[u32] {
        debug_assert!(v < self.vertex_count());
        &self.neighbors[self.offsets[v]..self.offsets[v + 1]]
    }

    /// Returns the largest degree in the graph.
    #[inline(always)]
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Returns whether the edge `(u, v)` exists.
    #[inline]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.neighbors(u).binary_search(&(v as u32)).is_ok()
    }

    fn debug_check_invariants(&self) {
        if cfg!(debug_assertions) {
            let n = self.vertex_count();
            assert_eq!(self.offsets[n], self.neighbors.len());
            for v in 0..n {
                let row = self.neighbors(v);
                for pair in row.windows(2) {
                    assert!(pair[0] < pair[1], "row {v} not sorted/deduplicated");
                }
                for &w in row {
                    assert_ne!(w as usize, v, "self-loop at vertex {v}");
                    assert!(
                        self.neighbors(w as usize).binary_search(&(v as u32)).is_ok(),
                        "adjacency not symmetric at ({v}, {w})"
                    );
                }
            }
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors encountered while building a graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// An edge endpoint is outside `[0, vertex_count)`.
    InvalidVertex {
        /// Index of the offending edge in the input list.
        edge_index: usize,
        /// The out-of-range endpoint.
        vertex: u32,
        /// The declared vertex count.
        vertex_count: usize,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::InvalidVertex {
                edge_index,
                vertex,
                vertex_count,
            } => write!(
                f,
                "edge {edge_index} references vertex {vertex}, but the graph has {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for GraphError {}

// ============================================================================
// Tests
// ============================================================================
