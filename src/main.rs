use chroma::engine::{color_graph, effective_threads, ColoringConfig, Strategy};
use chroma::graph::Graph;
use chroma::load::load_edge_list;
use chroma::verify::{check_coloring, color_count};

fn main() {
    let mut file: Option<String> = None;
    let mut strategy: Option<Strategy> = None;
    let mut cfg = ColoringConfig::default();

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-f" => {
                file = Some(args.get(i + 1).unwrap_or_else(|| usage_and_exit(2)).clone());
                i += 2;
            }
            "-t" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.threads = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "-seq" => {
                set_strategy(&mut strategy, Strategy::Sequential);
                i += 1;
            }
            "-atomic" => {
                set_strategy(&mut strategy, Strategy::AtomicCas);
                i += 1;
            }
            "-stm" => {
                set_strategy(&mut strategy, Strategy::Stm);
                i += 1;
            }
            "-htm" => {
                set_strategy(&mut strategy, Strategy::Htm);
                i += 1;
            }
            "--resolver-iters" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.max_resolver_iterations = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--retry-budget" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.retry_budget = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--bipartite" => {
                cfg.detect_bipartite = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    let Some(file) = file else { usage_and_exit(2) };
    let Some(strategy) = strategy else {
        usage_and_exit(2)
    };

    let (n, edges) = match load_edge_list(&file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error reading {file}: {e}");
            std::process::exit(1);
        }
    };
    let graph = match Graph::from_edges(n, &edges) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error building graph from {file}: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Loaded graph with {} vertices and {} edges (max degree {})",
        graph.vertex_count(),
        graph.edge_count(),
        graph.max_degree()
    );
    println!(
        "Strategy: {} | Threads: {}",
        strategy.name(),
        effective_threads(&graph, cfg.threads)
    );

    let result = color_graph(&graph, strategy, &cfg);
    let stats = &result.stats;

    println!(
        "Pre-colored {} high-degree vertices sequentially",
        stats.sequential_prefix_count
    );
    if strategy != Strategy::Sequential {
        println!(
            "Transaction statistics: {} committed, {} aborted, {} fallback entries",
            stats.transactions_committed, stats.transactions_aborted, stats.fallback_entries
        );
    }
    println!(
        "Resolver: {} iterations, {} vertices repaired{}",
        stats.resolver_iterations,
        stats.conflicts_repaired,
        if stats.resolver_stalled {
            " (terminal unique-color pass ran)"
        } else {
            ""
        }
    );
    println!("Time spent: {:.5} seconds", stats.time_total.as_secs_f64());

    print_color_distribution(&result.colors);

    let valid = check_coloring(&graph, &result.colors);
    println!(
        "Coloring is {} | Used {} colors (ceiling {})",
        if valid { "valid" } else { "INVALID" },
        color_count(&result.colors),
        stats.final_ceiling
    );

    if !valid {
        eprintln!("Internal error: the engine emitted an invalid coloring");
        std::process::exit(3);
    }
}

fn print_color_distribution(colors: &[i32]) {
    let used = color_count(colors);
    if used <= 0 {
        return;
    }
    let mut counts = vec![0usize; used as usize];
    for &c in colors {
        if c >= 0 {
            counts[c as usize] += 1;
        }
    }
    let shown = counts.len().min(5);
    print!("Color distribution: ");
    for (color, count) in counts.iter().take(shown).enumerate() {
        print!("color {color}: {count} vertices, ");
    }
    if counts.len() > shown {
        println!("...");
    } else {
        println!();
    }
}

fn set_strategy(slot: &mut Option<Strategy>, value: Strategy) {
    if slot.is_some() {
        // Exactly one strategy selector is accepted.
        usage_and_exit(2);
    }
    *slot = Some(value);
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  chroma -f <graph_file> (-seq | -atomic | -stm | -htm) [options]\n\nOptions:\n  -f <path>                Input edge-list file (header-style or SNAP-style)\n  -t <N>                   Worker thread count (default: hardware parallelism)\n  -seq                     Sequential greedy baseline\n  -atomic                  Lock-free CAS strategy\n  -stm                     Optimistic (STM-style) strategy\n  -htm                     Bounded-speculation (HTM-style) strategy\n  --resolver-iters <N>     Detect/repair rounds before the terminal pass (default: 3)\n  --retry-budget <N>       Publication retries before the fallback (default: 4)\n  --bipartite              Try the BFS two-coloring fast path first\n"
    );
    std::process::exit(code)
}
