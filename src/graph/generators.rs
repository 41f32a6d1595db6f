//! Seeded random graph generators for tests and benchmarks.
//!
//! Every generator is deterministic for a given seed so that failures found on
//! a random graph can be replayed.

use ordered_float::OrderedFloat;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::graph::{DirectedGraph, Graph};

/// Weight type produced by the generators
pub type GeneratedWeight = OrderedFloat<f64>;

/// Distribution used to draw edge weights
#[derive(Debug, Clone, Copy)]
pub enum WeightDistribution {
    /// Uniform in `[low, high)`
    Uniform { low: f64, high: f64 },
    /// Pareto with the given scale (minimum) and shape; heavy-tailed for small shapes
    Pareto { scale: f64, shape: f64 },
    /// `center ± spread`, clamped at zero
    NearUniform { center: f64, spread: f64 },
}

impl WeightDistribution {
    /// Draws one weight
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            WeightDistribution::Uniform { low, high } => {
                if high > low {
                    rng.gen_range(low..high)
                } else {
                    low
                }
            }
            WeightDistribution::Pareto { scale, shape } => {
                // inverse CDF, u in (0, 1]
                let u = 1.0 - rng.gen::<f64>();
                scale / u.powf(1.0 / shape)
            }
            WeightDistribution::NearUniform { center, spread } => {
                let offset = if spread > 0.0 { rng.gen_range(-spread..spread) } else { 0.0 };
                (center + offset).max(0.0)
            }
        }
    }
}

/// Random directed graph with about `edges_per_node * n` edges
///
/// A ring `i -> i + 1` is laid first so that every vertex is reachable from 0.
pub fn random_graph(
    n: usize,
    edges_per_node: usize,
    weights: WeightDistribution,
    seed: u64,
) -> DirectedGraph<GeneratedWeight> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(n * (edges_per_node + 1));

    if n > 1 {
        for u in 0..n {
            edges.push((u, (u + 1) % n, OrderedFloat(weights.sample(&mut rng))));
        }
    }
    if n > 0 {
        for _ in 0..n * edges_per_node {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u != v {
                edges.push((u, v, OrderedFloat(weights.sample(&mut rng))));
            }
        }
    }

    DirectedGraph::from_validated(n, &edges, false)
}

/// Random undirected graph, same shape as [`random_graph`]
pub fn random_undirected_graph(
    n: usize,
    edges_per_node: usize,
    weights: WeightDistribution,
    seed: u64,
) -> DirectedGraph<GeneratedWeight> {
    let directed = random_graph(n, edges_per_node, weights, seed);
    let mut edges = Vec::with_capacity(directed.edge_count() * 2);
    for u in 0..n {
        let (targets, ws) = directed.out_slices(u);
        for (&v, &w) in targets.iter().zip(ws) {
            edges.push((u, v, w));
            edges.push((v, u, w));
        }
    }
    DirectedGraph::from_validated(n, &edges, true)
}

/// Star with the center at vertex 0 and leaf `i` (1-based) at distance `weights[i - 1]`
pub fn star_graph(weights: &[f64]) -> DirectedGraph<GeneratedWeight> {
    let edges: Vec<_> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| (0, i + 1, OrderedFloat(w.max(0.0))))
        .collect();
    DirectedGraph::from_validated(weights.len() + 1, &edges, false)
}

/// 4-connected `width x height` grid with edges in both directions
pub fn grid_graph(
    width: usize,
    height: usize,
    weights: WeightDistribution,
    seed: u64,
) -> DirectedGraph<GeneratedWeight> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    let index = |x: usize, y: usize| y * width + x;

    for y in 0..height {
        for x in 0..width {
            if x + 1 < width {
                let w = OrderedFloat(weights.sample(&mut rng));
                edges.push((index(x, y), index(x + 1, y), w));
                edges.push((index(x + 1, y), index(x, y), w));
            }
            if y + 1 < height {
                let w = OrderedFloat(weights.sample(&mut rng));
                edges.push((index(x, y), index(x, y + 1), w));
                edges.push((index(x, y + 1), index(x, y), w));
            }
        }
    }

    DirectedGraph::from_validated(width * height, &edges, true)
}

/// `components` disjoint random graphs of `size` vertices each
pub fn disconnected_graph(
    components: usize,
    size: usize,
    weights: WeightDistribution,
    seed: u64,
) -> DirectedGraph<GeneratedWeight> {
    let mut edges = Vec::new();
    for c in 0..components {
        let part = random_graph(size, 2, weights, seed.wrapping_add(c as u64));
        let base = c * size;
        for u in 0..size {
            let (targets, ws) = part.out_slices(u);
            for (&v, &w) in targets.iter().zip(ws) {
                edges.push((base + u, base + v, w));
            }
        }
    }
    DirectedGraph::from_validated(components * size, &edges, false)
}
