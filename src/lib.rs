//! Post-Dijkstra SSSP - exact single-source shortest paths without a global heap
//!
//! This library replaces the strict total order of a binary-heap Dijkstra with
//! coarse delta-stepping buckets. Nodes are grouped by tentative distance into
//! buckets of width Δ and each bucket is relaxed as a batch. Two optional
//! accelerants sit on top of the bucket loop:
//!
//! - landmark lower bounds ([`LowerBoundPruner`]) that skip relaxations the
//!   triangle inequality proves useless
//! - a clustered [`HierarchicalGraph`] that picks Δ and skips cross-cluster
//!   edges whose target is already closer than the cheapest way into its
//!   cluster
//!
//! Neither accelerant changes the distances produced; they only change the
//! amount of work recorded in [`Metrics`].

pub mod algorithm;
pub mod data_structures;
pub mod graph;

// Re-export main types for convenient use
pub use algorithm::{
    config::SolverConfig,
    dijkstra::Dijkstra,
    lower_bound::LowerBoundPruner,
    metrics::Metrics,
    minimum_finder::{Candidate, ClassicalMinimumFinder, MinimumFinder},
    post_dijkstra::PostDijkstraSSSP,
    ShortestPathAlgorithm, ShortestPathResult,
};
pub use graph::directed::{DirectedGraph, GraphBuilder};
pub use graph::hierarchy::HierarchicalGraph;
pub use graph::traits::{Graph, Weight};

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid weight {weight} on edge {from} -> {to}")]
    InvalidWeight { from: usize, to: usize, weight: f64 },

    #[error("Invalid source vertex {vertex} (graph has {vertex_count} vertices)")]
    InvalidSource { vertex: usize, vertex_count: usize },

    #[error("Invalid edge: from {0} to {1}")]
    InvalidEdge(usize, usize),

    #[error("Distance to vertex {vertex} overflows the weight type")]
    DistanceOverflow { vertex: usize },

    #[error("Invalid bucket width: {0}")]
    InvalidDelta(f64),

    #[error("Invalid solver configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
