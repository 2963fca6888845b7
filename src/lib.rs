//! # Chroma
//!
//! A high-performance Rust library for parallel greedy graph coloring.
//!
//! This crate provides:
//! - An immutable CSR (compressed sparse row) graph store built from unordered
//!   edge lists.
//! - A degree-descending processing order with a linear-time bucket variant
//!   for large graphs.
//! - Four coloring strategies over one shared pipeline: a sequential baseline,
//!   a lock-free CAS protocol, an optimistic (STM-style) protocol, and a
//!   bounded-speculation (HTM-style) protocol with a serialized fallback.
//! - An iterative conflict resolver that guarantees a valid coloring.
//!
//! ## Quick Start
//!
//! ```
//! use chroma::engine::{color_graph, ColoringConfig, Strategy};
//! use chroma::graph::Graph;
//!
//! // A triangle needs exactly three colors.
//! let graph = Graph::from_edges(3, &[(0, 1), (0, 2), (1, 2)]).unwrap();
//! let result = color_graph(&graph, Strategy::AtomicCas, &ColoringConfig::default());
//!
//! assert!(chroma::verify::check_coloring(&graph, &result.colors));
//! assert_eq!(result.stats.final_ceiling, 3);
//! ```
//!
//! ## Loading Graphs from Files
//!
//! ```no_run
//! use chroma::load::load_edge_list;
//! use chroma::graph::Graph;
//!
//! let (n, edges) = load_edge_list("graph.txt").expect("readable edge list");
//! let graph = Graph::from_edges(n, &edges).expect("valid edge list");
//! ```
//!
//! ## Modules
//!
//! - [`graph`]: Immutable CSR adjacency store and its builder.
//! - [`load`]: Edge-list file loader (header-style and SNAP-style).
//! - [`order`]: Degree-descending vertex processing order.
//! - [`state`]: Atomic per-vertex color slots, the color ceiling, and run counters.
//! - [`scratch`]: Worker-scoped color bit-set and the minimum-available-color primitive.
//! - [`publish`]: Publication outcomes and the serialized fallback path.
//! - [`sequential`], [`cas`], [`stm`], [`htm`]: The four publication strategies.
//! - [`resolve`]: Conflict detection and repair.
//! - [`bipartite`]: Optional BFS two-coloring fast path.
//! - [`engine`]: The coloring pipeline and its configuration.
//! - [`verify`]: Coloring validity checks.
//!
//! ## Performance Notes
//!
//! - Neighbor iteration is O(1)-indexed over dense arrays; rows are sorted and
//!   deduplicated at construction.
//! - Worker threads keep their color bit-sets across vertices to avoid
//!   allocation churn in the hot loop.
//! - For maximum performance, compile with: `RUSTFLAGS="-C target-cpu=native" cargo build --release`

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Graph-theoretic variable names
#![allow(clippy::needless_range_loop)] // Often clearer for vertex indexing
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod bipartite;
pub mod cas;
pub mod engine;
pub mod graph;
pub mod htm;
pub mod load;
pub mod order;
pub mod publish;
pub mod resolve;
pub mod scratch;
pub mod sequential;
pub mod state;
pub mod stm;
pub mod verify;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::engine::{
        color_graph, resolve_colors, Coloring, ColoringConfig, ColoringStats, Strategy,
    };
    pub use crate::graph::{Graph, GraphError};
    pub use crate::load::{load_edge_list, LoadError};
    pub use crate::verify::check_coloring;
}
