pub mod bucket_frontier;
pub mod priority_queue;

pub use bucket_frontier::{BucketedFrontier, DeltaBucket};
pub use priority_queue::BinaryHeapWrapper;
