use post_dijkstra_sssp::graph::generators::{
    grid_graph, random_graph, random_undirected_graph, GeneratedWeight, WeightDistribution,
};
use post_dijkstra_sssp::{
    Dijkstra, DirectedGraph, Graph, PostDijkstraSSSP, ShortestPathAlgorithm, ShortestPathResult,
    SolverConfig, Weight,
};

const DISTRIBUTIONS: [WeightDistribution; 3] = [
    WeightDistribution::Uniform { low: 0.0, high: 100.0 },
    WeightDistribution::Pareto { scale: 1.0, shape: 1.2 },
    WeightDistribution::NearUniform { center: 10.0, spread: 0.5 },
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn reference(graph: &DirectedGraph<GeneratedWeight>, source: usize) -> ShortestPathResult<GeneratedWeight> {
    Dijkstra::new().compute_shortest_paths(graph, source).unwrap()
}

// Every predecessor edge must account exactly for the distance it explains
fn assert_predecessors_consistent(graph: &DirectedGraph<GeneratedWeight>, result: &ShortestPathResult<GeneratedWeight>) {
    for v in 0..graph.vertex_count() {
        match result.predecessor(v) {
            None => assert!(v == result.source || !result.is_reachable(v), "vertex {} has no predecessor", v),
            Some(p) => {
                let dist_v = result.distances[v];
                let dist_p = result.distances[p];
                assert!(
                    graph.outgoing_edges(p).any(|(t, w)| t == v && dist_p.saturating_sum(w) == dist_v),
                    "predecessor {} does not explain distance of {}",
                    p,
                    v
                );
            }
        }
    }
}

fn check_against_dijkstra(graph: &DirectedGraph<GeneratedWeight>, config: SolverConfig, source: usize) {
    let expected = reference(graph, source);
    let solver = PostDijkstraSSSP::new(graph, config);
    let (result, metrics) = solver.solve(source).unwrap();

    assert_eq!(result.distances, expected.distances);
    assert_eq!(metrics.finalized_nodes, expected.reachable_count());
    assert_predecessors_consistent(graph, &result);
}

#[test]
fn test_matches_dijkstra_across_distributions_and_sizes() {
    init_logging();
    for (i, weights) in DISTRIBUTIONS.iter().enumerate() {
        for &size in &[100usize, 1_000, 10_000] {
            let graph = random_graph(size, 4, *weights, 1_000 + i as u64);
            check_against_dijkstra(&graph, SolverConfig::default(), 0);
        }
    }
}

#[test]
fn test_matches_dijkstra_with_all_accelerants() {
    init_logging();
    let config = SolverConfig::default()
        .with_lower_bounds(true)
        .with_hierarchy(true)
        .with_landmark_count(6);
    for (i, weights) in DISTRIBUTIONS.iter().enumerate() {
        for &size in &[100usize, 2_000] {
            let graph = random_graph(size, 3, *weights, 2_000 + i as u64);
            check_against_dijkstra(&graph, config.clone(), size / 2);
        }
    }
}

#[test]
fn test_matches_dijkstra_on_undirected_graphs() {
    init_logging();
    let graph = random_undirected_graph(3_000, 2, DISTRIBUTIONS[1], 5);
    check_against_dijkstra(&graph, SolverConfig::default().with_lower_bounds(true), 17);

    let grid = grid_graph(60, 60, DISTRIBUTIONS[0], 9);
    check_against_dijkstra(&grid, SolverConfig::default().with_hierarchy(true), 0);
    check_against_dijkstra(&grid, SolverConfig::default().with_lower_bounds(true), 1_234);
}

#[test]
fn test_matches_dijkstra_for_many_bucket_widths() {
    init_logging();
    let graph = random_graph(1_500, 4, DISTRIBUTIONS[0], 77);
    for delta in [0.01, 0.5, 3.0, 25.0, 1_000.0, 1e9] {
        check_against_dijkstra(&graph, SolverConfig::default().with_delta(delta), 3);
    }
}

#[test]
fn test_zero_weight_edges() {
    let edges = vec![
        (0, 1, 0.0),
        (1, 2, 0.0),
        (2, 0, 0.0),
        (2, 3, 1.5),
        (3, 4, 0.0),
        (4, 3, 0.0),
        (1, 4, 2.0),
    ];
    let graph = DirectedGraph::<GeneratedWeight>::from_edges(
        5,
        edges.into_iter().map(|(u, v, w)| (u, v, w.into())),
    )
    .unwrap();
    check_against_dijkstra(&graph, SolverConfig::default(), 0);
    check_against_dijkstra(&graph, SolverConfig::default().with_lower_bounds(true), 0);

    let (result, _) = PostDijkstraSSSP::new(&graph, SolverConfig::default()).solve(0).unwrap();
    assert_eq!(result.path_to(4), Some(vec![0, 1, 2, 3, 4]));
}

#[test]
fn test_integer_weights_match_dijkstra() {
    let mut edges = Vec::new();
    for u in 0..300usize {
        edges.push((u, (u + 1) % 300, (u % 7) as u64 + 1));
        edges.push((u, (u * 13 + 5) % 300, ((u * 31) % 50) as u64));
    }
    let graph = DirectedGraph::from_edges(300, edges).unwrap();
    let expected = Dijkstra::new().compute_shortest_paths(&graph, 0).unwrap();

    for config in [
        SolverConfig::default(),
        SolverConfig::default().with_delta(4.0),
        SolverConfig::default().with_lower_bounds(true).with_hierarchy(true),
    ] {
        let (result, _) = PostDijkstraSSSP::new(&graph, config).solve(0).unwrap();
        assert_eq!(result.distances, expected.distances);
    }
}
