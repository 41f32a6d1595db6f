use serde::{Deserialize, Serialize};

use crate::Result;

/// Knobs of a [`PostDijkstraSSSP`](crate::PostDijkstraSSSP) solver
///
/// Every field has a default, so a partial JSON document such as
/// `{"use_lower_bounds": true}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Bucket width; `None` picks one from the graph
    pub delta: Option<f64>,
    /// Build a cluster hierarchy and skip edges it proves useless
    pub use_hierarchy: bool,
    /// Build landmark distance tables and prune with them
    pub use_lower_bounds: bool,
    /// Number of landmarks, clamped to the vertex count
    pub landmark_count: usize,
    /// Record the shortest path tree
    pub track_predecessors: bool,
    /// Maximum number of contraction levels
    pub hierarchy_levels: usize,
    /// Maximum members grown into one cluster
    pub cluster_size: usize,
    /// Relax large buckets on the rayon pool
    pub parallel: bool,
    /// Minimum bucket size relaxed in parallel
    pub parallel_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            delta: None,
            use_hierarchy: false,
            use_lower_bounds: false,
            landmark_count: 8,
            track_predecessors: true,
            hierarchy_levels: 2,
            cluster_size: 8,
            parallel: false,
            parallel_threshold: 1024,
        }
    }
}

impl SolverConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set a fixed bucket width
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Let the solver pick the bucket width
    pub fn with_auto_delta(mut self) -> Self {
        self.delta = None;
        self
    }

    /// Enable or disable the cluster hierarchy
    pub fn with_hierarchy(mut self, enabled: bool) -> Self {
        self.use_hierarchy = enabled;
        self
    }

    /// Enable or disable landmark pruning
    pub fn with_lower_bounds(mut self, enabled: bool) -> Self {
        self.use_lower_bounds = enabled;
        self
    }

    /// Set the number of landmarks
    pub fn with_landmark_count(mut self, count: usize) -> Self {
        self.landmark_count = count;
        self
    }

    /// Enable or disable predecessor tracking
    pub fn with_predecessors(mut self, enabled: bool) -> Self {
        self.track_predecessors = enabled;
        self
    }

    /// Set the maximum number of hierarchy levels
    pub fn with_hierarchy_levels(mut self, levels: usize) -> Self {
        self.hierarchy_levels = levels;
        self
    }

    /// Set the maximum cluster size
    pub fn with_cluster_size(mut self, size: usize) -> Self {
        self.cluster_size = size;
        self
    }

    /// Enable or disable parallel bucket relaxation
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Set the bucket size from which relaxation goes parallel
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}
