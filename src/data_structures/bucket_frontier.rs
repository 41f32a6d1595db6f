use std::collections::{BTreeMap, HashSet};

use crate::graph::Weight;
use crate::{Error, Result};

/// All frontier nodes whose tentative distance lies in `[id * Δ, (id + 1) * Δ)`
///
/// Membership is an unordered set; callers must not rely on iteration order.
#[derive(Debug, Clone)]
pub struct DeltaBucket {
    id: usize,
    members: HashSet<usize>,
}

impl DeltaBucket {
    fn new(id: usize) -> Self {
        DeltaBucket {
            id,
            members: HashSet::new(),
        }
    }

    /// Bucket index
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of member nodes
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the bucket holds no node
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True if `node` is a member
    pub fn contains(&self, node: usize) -> bool {
        self.members.contains(&node)
    }

    /// Iterates over the members in no particular order
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    /// Consumes the bucket, returning its members in no particular order
    pub fn into_members(self) -> Vec<usize> {
        self.members.into_iter().collect()
    }
}

/// Delta-stepping frontier: sparse buckets keyed by `floor(distance / Δ)`
///
/// Only non-empty buckets are materialized, so a tiny Δ over a wide weight
/// range costs memory proportional to the frontier, not to the distance
/// range. A node lives in at most one bucket; re-inserting it with a new
/// distance moves it.
#[derive(Debug)]
pub struct BucketedFrontier {
    /// Bucket width
    delta: f64,
    /// Non-empty buckets by ID
    buckets: BTreeMap<usize, DeltaBucket>,
    /// Node -> bucket currently holding it
    location: Vec<Option<usize>>,
    /// Total number of members over all buckets
    len: usize,
    /// Last bucket ID handed out by `pop_min_bucket`
    current: Option<usize>,
    /// Inserts, moves and pops performed
    operations: usize,
}

impl BucketedFrontier {
    /// Creates an empty frontier for nodes `0..vertex_count`
    ///
    /// Fails with `InvalidDelta` unless `delta` is finite and strictly positive.
    pub fn new(vertex_count: usize, delta: f64) -> Result<Self> {
        if !(delta.is_finite() && delta > 0.0) {
            return Err(Error::InvalidDelta(delta));
        }
        Ok(BucketedFrontier {
            delta,
            buckets: BTreeMap::new(),
            location: vec![None; vertex_count],
            len: 0,
            current: None,
            operations: 0,
        })
    }

    /// Bucket width
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Bucket ID for a distance: `floor(distance / Δ)`, saturating for huge values
    pub fn bucket_index<W: Weight>(&self, distance: W) -> usize {
        // float -> int `as` casts saturate, so infinity maps to usize::MAX
        (distance.as_f64() / self.delta).floor() as usize
    }

    /// Places `node` in the bucket for `distance`, moving it out of any
    /// other bucket first. Returns the bucket ID.
    pub fn insert<W: Weight>(&mut self, node: usize, distance: W) -> usize {
        let id = self.bucket_index(distance);
        debug_assert!(
            self.current.map_or(true, |current| id >= current),
            "bucket {} inserted below current bucket {:?}",
            id,
            self.current
        );

        if node >= self.location.len() {
            self.location.resize(node + 1, None);
        }
        match self.location[node] {
            Some(old) if old == id => return id,
            Some(old) => {
                self.detach(node, old);
            }
            None => {}
        }

        self.buckets
            .entry(id)
            .or_insert_with(|| DeltaBucket::new(id))
            .members
            .insert(node);
        self.location[node] = Some(id);
        self.len += 1;
        self.operations += 1;
        id
    }

    /// Removes `node` from the frontier, returning the bucket it was in
    pub fn remove(&mut self, node: usize) -> Option<usize> {
        let id = self.location.get(node).copied().flatten()?;
        self.detach(node, id);
        self.operations += 1;
        Some(id)
    }

    fn detach(&mut self, node: usize, id: usize) {
        if let Some(bucket) = self.buckets.get_mut(&id) {
            if bucket.members.remove(&node) {
                self.len -= 1;
            }
            if bucket.members.is_empty() {
                self.buckets.remove(&id);
            }
        }
        self.location[node] = None;
    }

    /// Drains the lowest non-empty bucket; `None` once the frontier is exhausted
    pub fn pop_min_bucket(&mut self) -> Option<DeltaBucket> {
        let (id, bucket) = self.buckets.pop_first()?;
        for node in bucket.members() {
            self.location[node] = None;
        }
        self.len -= bucket.len();
        self.current = Some(id);
        self.operations += 1;
        Some(bucket)
    }

    /// ID of the lowest non-empty bucket without draining it
    pub fn peek_min_bucket_id(&self) -> Option<usize> {
        self.buckets.keys().next().copied()
    }

    /// Last popped bucket ID; non-decreasing over the life of the frontier
    pub fn current_bucket(&self) -> Option<usize> {
        self.current
    }

    /// True if no bucket holds any member
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the frontier
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of materialized (non-empty) buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket currently holding `node`
    pub fn bucket_of(&self, node: usize) -> Option<usize> {
        self.location.get(node).copied().flatten()
    }

    /// Inserts, moves, removals and pops performed so far
    pub fn operations(&self) -> usize {
        self.operations
    }
}
