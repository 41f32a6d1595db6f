use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Work and timing counters of one solve
///
/// Counters are diagnostic only; distances never depend on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    /// Edge relaxations actually attempted
    pub relaxations: usize,
    /// Frontier inserts, moves and pops
    pub bucket_operations: usize,
    /// Edges skipped by the landmark lower bound
    pub pruned_relaxations: usize,
    /// Edges skipped by the cluster hierarchy
    pub hierarchy_skips: usize,
    /// Improvements of a node that already had a finite distance
    pub reinsertions: usize,
    /// Drained entries whose distance changed before processing
    pub stale_entries: usize,
    /// Nodes whose distance became final
    pub finalized_nodes: usize,
    /// Bucket pops, re-pops of the same ID included
    pub buckets_processed: usize,
    /// Distinct bucket IDs processed
    pub final_bucket_count: usize,
    /// Highest bucket ID processed
    pub max_bucket_id: usize,
    /// Bucket IDs in pop order, non-decreasing
    pub bucket_trace: Vec<usize>,
    /// Bucket width used
    pub delta: f64,
    /// Hierarchy and landmark construction, paid once per solver
    pub preprocessing_time: Duration,
    /// Array allocation and source seeding
    pub initialization_time: Duration,
    /// Bucket loop
    pub relaxation_time: Duration,
    /// Whole solve, preprocessing excluded
    pub total_time: Duration,
}

impl Metrics {
    /// Relaxations avoided by pruning and hierarchy skips, relative to all edge visits
    pub fn skip_ratio(&self) -> f64 {
        let skipped = self.pruned_relaxations + self.hierarchy_skips;
        let visited = skipped + self.relaxations;
        if visited == 0 {
            0.0
        } else {
            skipped as f64 / visited as f64
        }
    }

    /// Serializes the metrics to JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Relaxations: {} (pruned {}, hierarchy skips {}, {:.1}% avoided)\n\
             Buckets: {} pops over {} IDs (max ID {}, delta {:.4})\n\
             Frontier ops: {}, reinsertions: {}, stale: {}, finalized: {}\n\
             Time: {:?} total, {:?} relaxing, {:?} init, {:?} preprocessing",
            self.relaxations,
            self.pruned_relaxations,
            self.hierarchy_skips,
            100.0 * self.skip_ratio(),
            self.buckets_processed,
            self.final_bucket_count,
            self.max_bucket_id,
            self.delta,
            self.bucket_operations,
            self.reinsertions,
            self.stale_entries,
            self.finalized_nodes,
            self.total_time,
            self.relaxation_time,
            self.initialization_time,
            self.preprocessing_time
        )
    }
}
