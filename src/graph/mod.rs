pub mod traits;
pub mod directed;
pub mod reversed;
pub mod hierarchy;
pub mod generators;

pub use traits::{Graph, Weight};
pub use directed::{DirectedGraph, GraphBuilder};
pub use reversed::ReversedGraph;
pub use hierarchy::HierarchicalGraph;
