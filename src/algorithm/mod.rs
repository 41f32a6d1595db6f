pub mod traits;
pub mod dijkstra;
pub mod minimum_finder;
pub mod lower_bound;
pub mod config;
pub mod metrics;
pub mod post_dijkstra;

pub use traits::{ShortestPathAlgorithm, ShortestPathResult};
