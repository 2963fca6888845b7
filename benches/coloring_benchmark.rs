use chroma::engine::{color_graph, ColoringConfig, Strategy};
use chroma::graph::Graph;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Builds a toroidal mesh with a few long-range chords: regular enough to be
/// reproducible, irregular enough to exercise the conflict paths.
fn build_mesh(side: u32) -> Graph {
    let n = side * side;
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            let v = r * side + c;
            let right = r * side + (c + 1) % side;
            let down = ((r + 1) % side) * side + c;
            edges.push((v, right));
            edges.push((v, down));
            if v % 17 == 0 {
                edges.push((v, (v * 7 + 13) % n));
            }
        }
    }
    Graph::from_edges(n as usize, &edges).unwrap()
}

fn bench_strategies(c: &mut Criterion) {
    let graph = build_mesh(100);
    let cfg = ColoringConfig {
        threads: 4,
        ..ColoringConfig::default()
    };

    for (name, strategy) in [
        ("color_sequential", Strategy::Sequential),
        ("color_atomic_cas", Strategy::AtomicCas),
        ("color_stm", Strategy::Stm),
        ("color_htm", Strategy::Htm),
    ] {
        c.bench_function(name, |b| {
            b.iter(|| black_box(color_graph(&graph, strategy, &cfg)));
        });
    }
}

fn bench_graph_build(c: &mut Criterion) {
    let mut edges = Vec::new();
    for v in 0..10_000u32 {
        edges.push((v, (v * 31 + 7) % 10_000));
        edges.push((v, (v * 53 + 11) % 10_000));
    }
    c.bench_function("graph_from_edges", |b| {
        b.iter(|| black_box(Graph::from_edges(10_000, &edges).unwrap()));
    });
}

criterion_group!(benches, bench_strategies, bench_graph_build);
criterion_main!(benches);
