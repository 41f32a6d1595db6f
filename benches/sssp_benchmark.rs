//! Benchmarks comparing the reference Dijkstra against the bucketed solver

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use post_dijkstra_sssp::graph::generators::{grid_graph, random_graph, WeightDistribution};
use post_dijkstra_sssp::{Dijkstra, PostDijkstraSSSP, ShortestPathAlgorithm, SolverConfig};

const UNIFORM: WeightDistribution = WeightDistribution::Uniform { low: 1.0, high: 100.0 };
const PARETO: WeightDistribution = WeightDistribution::Pareto { scale: 1.0, shape: 1.5 };

fn benchmark_random_graphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_graph");
    group.sample_size(20);

    for size in [1_000usize, 10_000, 100_000].iter() {
        let graph = random_graph(*size, 4, UNIFORM, 42);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::new("dijkstra", size), &graph, |b, graph| {
            b.iter(|| Dijkstra::new().compute_shortest_paths(graph, black_box(0)).unwrap())
        });

        let plain = PostDijkstraSSSP::new(&graph, SolverConfig::default());
        group.bench_with_input(BenchmarkId::new("buckets", size), &plain, |b, solver| {
            b.iter(|| solver.solve(black_box(0)).unwrap())
        });

        let pruned = PostDijkstraSSSP::new(&graph, SolverConfig::default().with_lower_bounds(true));
        group.bench_with_input(BenchmarkId::new("buckets_landmarks", size), &pruned, |b, solver| {
            b.iter(|| solver.solve(black_box(0)).unwrap())
        });

        let parallel = PostDijkstraSSSP::new(
            &graph,
            SolverConfig::default().with_parallel(true).with_parallel_threshold(256),
        );
        group.bench_with_input(BenchmarkId::new("buckets_parallel", size), &parallel, |b, solver| {
            b.iter(|| solver.solve(black_box(0)).unwrap())
        });
    }
    group.finish();
}

fn benchmark_heavy_tailed(c: &mut Criterion) {
    let graph = random_graph(10_000, 4, PARETO, 7);
    let mut group = c.benchmark_group("pareto_10k");

    group.bench_function("dijkstra", |b| {
        b.iter(|| Dijkstra::new().compute_shortest_paths(&graph, black_box(0)).unwrap())
    });
    let solver = PostDijkstraSSSP::new(&graph, SolverConfig::default());
    group.bench_function("buckets", |b| b.iter(|| solver.solve(black_box(0)).unwrap()));
    group.finish();
}

fn benchmark_grid_hierarchy(c: &mut Criterion) {
    let graph = grid_graph(200, 200, UNIFORM, 3);
    let mut group = c.benchmark_group("grid_200x200");

    let plain = PostDijkstraSSSP::new(&graph, SolverConfig::default());
    group.bench_function("buckets", |b| b.iter(|| plain.solve(black_box(0)).unwrap()));

    let clustered = PostDijkstraSSSP::new(&graph, SolverConfig::default().with_hierarchy(true));
    group.bench_function("buckets_hierarchy", |b| {
        b.iter(|| clustered.solve(black_box(0)).unwrap())
    });

    group.bench_function("preprocess_landmarks", |b| {
        b.iter(|| PostDijkstraSSSP::new(black_box(&graph), SolverConfig::default().with_lower_bounds(true)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_random_graphs,
    benchmark_heavy_tailed,
    benchmark_grid_hierarchy
);
criterion_main!(benches);
