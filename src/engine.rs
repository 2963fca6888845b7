//! The coloring pipeline.
//!
//! Control flow: compute the processing order, seed the color state, color a
//! high-degree prefix sequentially, fan the remaining suffix out over a
//! worker pool under the chosen publication strategy, then run the conflict
//! resolver until the coloring is valid. All tunables live in
//! [`ColoringConfig`]; all observable counters come back in
//! [`ColoringStats`].

use crate::bipartite;
use crate::graph::Graph;
use crate::order::processing_order;
use crate::resolve::{resolve, ResolveOutcome};
use crate::scratch::ColorSet;
use crate::sequential;
use crate::state::{ColorState, RunStats};
use crate::verify::color_count;
use crate::{cas, htm, stm};
use rayon::prelude::*;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// ============================================================================
// Configuration
// ============================================================================

/// Degree floor below which a vertex is never part of the sequential
/// pre-pass, regardless of the percentage threshold.
const HIGH_DEGREE_FLOOR: usize = 50;

/// Smallest dynamic chunk handed to a worker.
const MIN_CHUNK: usize = 32;

/// Below this vertex count the engine caps itself at two workers; the
/// coordination overhead dominates otherwise.
const SMALL_GRAPH_VERTICES: usize = 1_000;

/// Above this vertex count, a max degree past [`DENSE_DEGREE`] halves the
/// worker count to curb contention.
const DENSE_GRAPH_VERTICES: usize = 10_000;

/// Max degree past which a large graph counts as dense.
const DENSE_DEGREE: usize = 1_000;

/// Average degree at which the pre-pass prefix cap grows from 10% to 30% of
/// the vertex count.
const DENSE_PREFIX_AVG_DEGREE: usize = 16;

/// How a color gets published. All variants share the same pipeline and the
/// same minimum-available-color primitive; they differ only in the
/// publication step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Deterministic greedy on the calling thread.
    Sequential,
    /// Lock-free publication with a bounded CAS loop on the ceiling.
    AtomicCas,
    /// Optimistic transactions validated against current neighbor colors.
    Stm,
    /// Bounded speculation with back-off and a non-transactional fallback.
    Htm,
}

impl Strategy {
    /// Human-readable name for reporting.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::AtomicCas => "atomic-cas",
            Strategy::Stm => "stm",
            Strategy::Htm => "htm",
        }
    }
}

/// Tunables for a coloring run.
#[derive(Clone, Debug)]
pub struct ColoringConfig {
    /// Worker thread count; 0 derives it from hardware parallelism. The
    /// engine may still reduce it for small or very dense graphs.
    pub threads: usize,
    /// Detect/repair rounds before the unique-color terminal pass.
    pub max_resolver_iterations: u32,
    /// Publication retries before the serialized fallback.
    pub retry_budget: u32,
    /// Pre-pass degree threshold as a percentage of the vertex count; the
    /// effective threshold never drops below a fixed floor.
    pub high_degree_pct: f32,
    /// Degree past which the bounded-speculation strategy skips speculation.
    pub high_contention_degree: u32,
    /// Try the BFS two-coloring fast path before the pipeline.
    pub detect_bipartite: bool,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            max_resolver_iterations: 3,
            retry_budget: 4,
            high_degree_pct: 1.0,
            high_contention_degree: 100,
            detect_bipartite: false,
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Observable counters from one coloring run.
#[derive(Clone, Debug, Default)]
pub struct ColoringStats {
    /// Wall-clock time of the whole run.
    pub time_total: Duration,
    /// Vertices colored by the sequential pre-pass (or all of them under
    /// [`Strategy::Sequential`]).
    pub sequential_prefix_count: usize,
    /// Committed transactional/optimistic publications.
    pub transactions_committed: u64,
    /// Aborted publication attempts.
    pub transactions_aborted: u64,
    /// Entries into the serialized fallback path.
    pub fallback_entries: u64,
    /// Repair rounds the resolver executed.
    pub resolver_iterations: u32,
    /// Whether the resolver hit its cap and ran the unique-color pass.
    pub resolver_stalled: bool,
    /// One past the largest color at the end of the run.
    pub final_ceiling: i32,
    /// Vertices recolored by the resolver.
    pub conflicts_repaired: u64,
}

/// A finished coloring and its statistics.
#[derive(Clone, Debug)]
pub struct Coloring {
    /// One color per vertex, all non-negative.
    pub colors: Vec<i32>,
    /// Counters from the run.
    pub stats: ColoringStats,
}

// ============================================================================
// Public API
// ============================================================================

/// Colors the graph under the chosen strategy.
///
/// Always terminates with a proper coloring: publication races are repaired
/// by the resolver, and the resolver's terminal pass is conflict-free by
/// construction.
pub fn color_graph(graph: &Graph, strategy: Strategy, cfg: &ColoringConfig) -> Coloring {
    let start = Instant::now();

    if cfg.detect_bipartite
        && let Some(colors) = bipartite::try_two_color(graph)
    {
        let final_ceiling = color_count(&colors);
        return Coloring {
            colors,
            stats: ColoringStats {
                time_total: start.elapsed(),
                final_ceiling,
                ..ColoringStats::default()
            },
        };
    }

    let order = processing_order(graph);
    let state = ColorState::new(graph.vertex_count());
    let run_stats = RunStats::new();

    let prefix = if strategy == Strategy::Sequential {
        let mut seen = ColorSet::new();
        sequential::color_in_order(graph, &state, &order, &mut seen);
        order.len()
    } else {
        run_prepass(graph, &state, &order, cfg)
    };

    let outcome = in_worker_pool(graph, cfg, || {
        if strategy != Strategy::Sequential {
            parallel_phase(graph, &state, &order[prefix..], strategy, cfg, &run_stats);
        }
        resolve(graph, &state, cfg.max_resolver_iterations, &run_stats)
    });

    let stats = assemble_stats(start, prefix, &state, &run_stats, outcome);
    Coloring {
        colors: state.snapshot_colors(),
        stats,
    }
}

/// Runs only the conflict resolver over an existing coloring.
///
/// On a valid input this is the identity: zero repairs, identical colors.
/// Partially colored or conflicting inputs are repaired in place.
pub fn resolve_colors(graph: &Graph, colors: &[i32], cfg: &ColoringConfig) -> Coloring {
    let start = Instant::now();
    let state = ColorState::from_colors(colors);
    let run_stats = RunStats::new();
    let outcome = in_worker_pool(graph, cfg, || {
        resolve(graph, &state, cfg.max_resolver_iterations, &run_stats)
    });
    let stats = assemble_stats(start, 0, &state, &run_stats, outcome);
    Coloring {
        colors: state.snapshot_colors(),
        stats,
    }
}

/// The worker count a run will actually use: the requested count (or
/// hardware parallelism), clamped for small graphs and halved for large
/// dense ones where contention dominates.
pub fn effective_threads(graph: &Graph, requested: usize) -> usize {
    let hardware = std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(1);
    let t = if requested == 0 { hardware } else { requested };
    let n = graph.vertex_count();
    if n < SMALL_GRAPH_VERTICES {
        t.clamp(1, 2)
    } else if n > DENSE_GRAPH_VERTICES && graph.max_degree() > DENSE_DEGREE {
        (t / 2).max(1)
    } else {
        t.max(1)
    }
}

// ============================================================================
// Pipeline internals
// ============================================================================

fn in_worker_pool<R: Send>(
    graph: &Graph,
    cfg: &ColoringConfig,
    body: impl FnOnce() -> R + Send,
) -> R {
    let workers = effective_threads(graph, cfg.threads);
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(body),
        // Pool creation can fail under resource exhaustion; the global pool
        // still makes progress.
        Err(_) => body(),
    }
}

/// Colors the high-degree prefix of the order on the calling thread and
/// returns its length. The hottest vertices are handled without any
/// coordination, which establishes a non-trivial ceiling before parallel
/// work begins.
fn run_prepass(graph: &Graph, state: &ColorState, order: &[u32], cfg: &ColoringConfig) -> usize {
    let n = graph.vertex_count();
    let threshold = high_degree_threshold(n, cfg.high_degree_pct);
    let cap = prefix_cap(n, graph.edge_count());

    let mut len = 0usize;
    while len < cap && len < order.len() && graph.degree(order[len] as usize) > threshold {
        len += 1;
    }

    let mut seen = ColorSet::new();
    sequential::color_in_order(graph, state, &order[..len], &mut seen);
    len
}

fn high_degree_threshold(n: usize, pct: f32) -> usize {
    let scaled = (n as f32 * pct / 100.0) as usize;
    HIGH_DEGREE_FLOOR.max(scaled)
}

fn prefix_cap(n: usize, m: usize) -> usize {
    let avg_degree = if n == 0 { 0 } else { 2 * m / n };
    if avg_degree >= DENSE_PREFIX_AVG_DEGREE {
        n * 3 / 10
    } else {
        n / 10
    }
}

/// Fans the order suffix out over the current pool with dynamic chunking.
/// Each worker owns its scratch set for the whole phase.
fn parallel_phase(
    graph: &Graph,
    state: &ColorState,
    suffix: &[u32],
    strategy: Strategy,
    cfg: &ColoringConfig,
    run_stats: &RunStats,
) {
    if suffix.is_empty() {
        return;
    }
    let workers = rayon::current_num_threads().max(1);
    let chunk = (suffix.len() / (workers * 16)).max(MIN_CHUNK);
    let fallback = Mutex::new(());

    suffix
        .par_chunks(chunk)
        .for_each_init(ColorSet::new, |seen, block| {
            for &v in block {
                let v = v as usize;
                if state.read(v) >= 0 {
                    continue;
                }
                match strategy {
                    Strategy::AtomicCas => {
                        cas::publish(graph, state, v, seen, cfg.retry_budget, &fallback, run_stats);
                    }
                    Strategy::Stm => {
                        stm::publish(graph, state, v, seen, cfg.retry_budget, &fallback, run_stats);
                    }
                    Strategy::Htm => {
                        htm::publish(
                            graph,
                            state,
                            v,
                            seen,
                            cfg.retry_budget,
                            cfg.high_contention_degree,
                            &fallback,
                            run_stats,
                        );
                    }
                    Strategy::Sequential => unreachable!("sequential runs outside the pool"),
                }
            }
        });
}

fn assemble_stats(
    start: Instant,
    prefix: usize,
    state: &ColorState,
    run_stats: &RunStats,
    outcome: ResolveOutcome,
) -> ColoringStats {
    ColoringStats {
        time_total: start.elapsed(),
        sequential_prefix_count: prefix,
        transactions_committed: run_stats.committed.load(Ordering::Relaxed),
        transactions_aborted: run_stats.aborted.load(Ordering::Relaxed),
        fallback_entries: run_stats.fallback_entries.load(Ordering::Relaxed),
        resolver_iterations: outcome.iterations,
        resolver_stalled: outcome.stalled,
        final_ceiling: state.ceiling(),
        conflicts_repaired: run_stats.conflicts_repaired.load(Ordering::Relaxed),
    }
}

// ============================================================================
// Tests
// ============================================================================
