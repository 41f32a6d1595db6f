use std::time::{Duration, Instant};

use log::info;
use post_dijkstra_sssp::graph::generators::{random_graph, GeneratedWeight, WeightDistribution};
use post_dijkstra_sssp::{Dijkstra, DirectedGraph, Metrics, PostDijkstraSSSP, ShortestPathAlgorithm, SolverConfig};

// Times one Dijkstra run and returns the reachable count with it
fn time_dijkstra(graph: &DirectedGraph<GeneratedWeight>, source: usize) -> (Duration, usize) {
    let start = Instant::now();
    let result = Dijkstra::new().compute_shortest_paths(graph, source).unwrap();
    (start.elapsed(), result.reachable_count())
}

// Builds a solver for the config and times one solve, preprocessing excluded
fn time_buckets(
    graph: &DirectedGraph<GeneratedWeight>,
    config: &SolverConfig,
    source: usize,
) -> (Duration, Duration, Metrics) {
    let solver = PostDijkstraSSSP::new(graph, config.clone());
    let (_, metrics) = solver.solve(source).unwrap();
    (metrics.total_time, solver.preprocessing_time(), metrics)
}

fn main() {
    env_logger::init();

    // Optional JSON solver config as the first argument
    let base = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {}", path, e));
            SolverConfig::from_json(&text).unwrap_or_else(|e| panic!("bad config {}: {}", path, e))
        }
        None => SolverConfig::default(),
    };

    let graph_sizes = [1_000usize, 10_000, 50_000, 100_000, 200_000];
    let edges_per_node = 4;
    let distributions = [
        ("uniform", WeightDistribution::Uniform { low: 1.0, high: 100.0 }),
        ("pareto", WeightDistribution::Pareto { scale: 1.0, shape: 1.5 }),
        ("near-uniform", WeightDistribution::NearUniform { center: 50.0, spread: 1.0 }),
    ];
    let variants = [
        ("buckets", base.clone()),
        ("landmarks", base.clone().with_lower_bounds(true)),
        ("hierarchy", base.clone().with_hierarchy(true)),
        ("parallel", base.clone().with_parallel(true).with_parallel_threshold(256)),
    ];

    println!("=====================================================");
    println!("Benchmark: Dijkstra vs bucketed SSSP");
    println!("Edges per vertex: {} (plus a connecting ring)", edges_per_node);
    println!("=====================================================");

    let mut rows = Vec::new();

    for (dist_name, weights) in distributions {
        for &size in &graph_sizes {
            let graph = random_graph(size, edges_per_node, weights, size as u64);
            info!("Generated {} graph with {} vertices", dist_name, size);

            let (dijkstra_time, reachable) = time_dijkstra(&graph, 0);
            println!(
                "\n{} / {} vertices: Dijkstra {:?} ({} reachable)",
                dist_name, size, dijkstra_time, reachable
            );

            for (name, config) in &variants {
                let (solve_time, prep_time, metrics) = time_buckets(&graph, config, 0);
                let speedup = dijkstra_time.as_secs_f64() / solve_time.as_secs_f64().max(f64::MIN_POSITIVE);
                println!(
                    "  {:<10} solve {:?} (prep {:?}), {:.2}x, {} relaxations, {} buckets",
                    name, solve_time, prep_time, speedup, metrics.relaxations, metrics.final_bucket_count
                );
                rows.push((dist_name, size, *name, dijkstra_time, solve_time, speedup));
            }
        }
    }

    // Print summary table
    println!("\n=====================================================");
    println!("Summary of Results");
    println!("=====================================================");
    println!(
        "{:<13} | {:<10} | {:<10} | {:<13} | {:<13} | {:<8}",
        "Weights", "Vertices", "Variant", "Dijkstra (ms)", "Buckets (ms)", "Speedup"
    );
    println!("-----------------------------------------------------");
    for (dist_name, size, name, dijkstra_time, solve_time, speedup) in &rows {
        println!(
            "{:<13} | {:<10} | {:<10} | {:<13} | {:<13} | {:<8.2}",
            dist_name,
            size,
            name,
            dijkstra_time.as_millis(),
            solve_time.as_millis(),
            speedup
        );
    }
}
