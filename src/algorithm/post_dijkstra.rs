use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use crate::algorithm::config::SolverConfig;
use crate::algorithm::lower_bound::LowerBoundPruner;
use crate::algorithm::metrics::Metrics;
use crate::algorithm::minimum_finder::{Candidate, ClassicalMinimumFinder, MinimumFinder};
use crate::algorithm::{ShortestPathAlgorithm, ShortestPathResult};
use crate::data_structures::BucketedFrontier;
use crate::graph::{Graph, HierarchicalGraph, Weight};
use crate::{Error, Result};

/// Exact SSSP over delta-stepping buckets
///
/// The solver borrows an immutable graph and owns whatever preprocessing its
/// configuration asks for (cluster hierarchy, landmark tables). Preprocessing
/// happens once in the constructor; every call to [`solve`](Self::solve)
/// allocates its own working state, so one solver can serve concurrent
/// solves from different sources.
///
/// Within a bucket, nodes are processed in the order produced by the
/// [`MinimumFinder`]. A node improved while its bucket is being processed
/// goes back into the frontier, possibly into the same bucket, and is
/// processed again. A node becomes final once the frontier moves past its
/// bucket.
#[derive(Debug)]
pub struct PostDijkstraSSSP<'g, W, G, M = ClassicalMinimumFinder>
where
    W: Weight,
    G: Graph<W>,
    M: MinimumFinder<W>,
{
    graph: &'g G,
    config: SolverConfig,
    finder: M,
    hierarchy: Option<HierarchicalGraph<W>>,
    pruner: LowerBoundPruner,
    /// Bucket width used when the configuration leaves it open
    auto_delta: f64,
    preprocessing_time: Duration,
}

impl<'g, W, G> PostDijkstraSSSP<'g, W, G, ClassicalMinimumFinder>
where
    W: Weight,
    G: Graph<W>,
{
    /// Creates a solver with the classical linear-scan minimum finder
    pub fn new(graph: &'g G, config: SolverConfig) -> Self {
        Self::with_minimum_finder(graph, config, ClassicalMinimumFinder)
    }
}

impl<'g, W, G, M> PostDijkstraSSSP<'g, W, G, M>
where
    W: Weight,
    G: Graph<W>,
    M: MinimumFinder<W>,
{
    /// Creates a solver with a custom minimum-selection backend
    ///
    /// Builds the hierarchy and landmark tables when the configuration
    /// enables them. Preprocessing problems never fail construction; the
    /// affected accelerant is disabled and a warning is logged.
    pub fn with_minimum_finder(graph: &'g G, config: SolverConfig, finder: M) -> Self {
        let start = Instant::now();

        let hierarchy = if config.use_hierarchy {
            let hierarchy =
                HierarchicalGraph::build_with_cluster_size(graph, config.hierarchy_levels, config.cluster_size);
            if hierarchy.level_count() == 0 {
                warn!("Hierarchy produced no levels, edge skipping disabled");
            }
            Some(hierarchy)
        } else {
            None
        };

        let auto_delta = hierarchy
            .as_ref()
            .map(|h| h.suggested_delta())
            .or_else(|| graph.mean_positive_edge_weight())
            .filter(|d| is_valid_delta(*d))
            .unwrap_or(1.0);

        let pruner = if !config.use_lower_bounds {
            LowerBoundPruner::disabled()
        } else if config.landmark_count == 0 || graph.vertex_count() == 0 {
            warn!("Lower bounds enabled without any landmark, pruning disabled");
            LowerBoundPruner::disabled()
        } else {
            let delta = config.delta.filter(|d| is_valid_delta(*d)).unwrap_or(auto_delta);
            LowerBoundPruner::build_with_delta::<W, G>(graph, config.landmark_count, delta)
        };

        let preprocessing_time = start.elapsed();
        info!(
            "Prepared {} solver over {} vertices / {} edges in {:?} (hierarchy levels: {}, landmarks: {})",
            finder.name(),
            graph.vertex_count(),
            graph.edge_count(),
            preprocessing_time,
            hierarchy.as_ref().map_or(0, |h| h.level_count()),
            pruner.landmarks().len()
        );

        PostDijkstraSSSP {
            graph,
            config,
            finder,
            hierarchy,
            pruner,
            auto_delta,
            preprocessing_time,
        }
    }

    /// The graph this solver was prepared for
    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// The configuration in use
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Bucket width the next solve will use
    pub fn delta(&self) -> f64 {
        self.config.delta.unwrap_or(self.auto_delta)
    }

    /// The cluster hierarchy, if one was built
    pub fn hierarchy(&self) -> Option<&HierarchicalGraph<W>> {
        self.hierarchy.as_ref()
    }

    /// The landmark pruner; disabled unless lower bounds are configured
    pub fn pruner(&self) -> &LowerBoundPruner {
        &self.pruner
    }

    /// Time spent building the hierarchy and landmark tables
    pub fn preprocessing_time(&self) -> Duration {
        self.preprocessing_time
    }

    /// Computes exact distances from `source` to every vertex
    ///
    /// Unreachable vertices keep `W::infinity()`. Fails with `InvalidSource`
    /// for an out-of-range source, `InvalidDelta` for a configured bucket
    /// width that is not finite and positive, `InvalidWeight` if the graph
    /// yields an invalid weight, and `DistanceOverflow` if a reachable vertex
    /// is too far away for the weight type to represent.
    pub fn solve(&self, source: usize) -> Result<(ShortestPathResult<W>, Metrics)> {
        let start = Instant::now();
        let n = self.graph.vertex_count();
        if source >= n {
            return Err(Error::InvalidSource {
                vertex: source,
                vertex_count: n,
            });
        }

        let mut context = SolveContext::new(self.graph, self.delta(), self.config.track_predecessors)?;
        context.metrics.preprocessing_time = self.preprocessing_time;
        context.seed(source);
        context.metrics.initialization_time = start.elapsed();

        let hierarchy = self.hierarchy.as_ref().filter(|h| h.level_count() > 0);
        let parallel_threshold = self.config.parallel.then(|| self.config.parallel_threshold.max(1));

        let relax_start = Instant::now();
        context.run(&self.finder, &self.pruner, hierarchy, parallel_threshold)?;
        context.metrics.relaxation_time = relax_start.elapsed();

        let (result, mut metrics) = context.finish(source);
        metrics.total_time = start.elapsed();

        debug!(
            "Solved from {}: {} reachable, {} relaxations, {} pruned, {} hierarchy skips, {} buckets in {:?}",
            source,
            result.reachable_count(),
            metrics.relaxations,
            metrics.pruned_relaxations,
            metrics.hierarchy_skips,
            metrics.final_bucket_count,
            metrics.total_time
        );

        Ok((result, metrics))
    }
}

impl<'g, W, G, M> ShortestPathAlgorithm<W, G> for PostDijkstraSSSP<'g, W, G, M>
where
    W: Weight,
    G: Graph<W>,
    M: MinimumFinder<W> + Clone,
{
    fn name(&self) -> &'static str {
        "PostDijkstraSSSP"
    }

    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>> {
        if std::ptr::eq(graph, self.graph) {
            return Ok(self.solve(source)?.0);
        }
        debug!("Solving on a graph other than the prepared one, repeating preprocessing");
        let solver = PostDijkstraSSSP::with_minimum_finder(graph, self.config.clone(), self.finder.clone());
        Ok(solver.solve(source)?.0)
    }
}

/// Distances only, without pruning or hierarchy; used for landmark tables
pub(crate) fn solve_unpruned<W, G>(graph: &G, source: usize, delta: f64) -> Result<Vec<W>>
where
    W: Weight,
    G: Graph<W>,
{
    let n = graph.vertex_count();
    if source >= n {
        return Err(Error::InvalidSource {
            vertex: source,
            vertex_count: n,
        });
    }
    let mut context = SolveContext::new(graph, delta, false)?;
    context.seed(source);
    context.run(&ClassicalMinimumFinder, &LowerBoundPruner::disabled(), None, None)?;
    Ok(context.distances)
}

fn is_valid_delta(delta: f64) -> bool {
    delta.is_finite() && delta > 0.0
}

fn check_weight<W: Weight>(from: usize, to: usize, weight: W) -> Result<()> {
    if weight.is_valid_weight() {
        Ok(())
    } else {
        Err(Error::InvalidWeight {
            from,
            to,
            weight: weight.as_f64(),
        })
    }
}

/// Per-node outcome of a parallel relaxation pass
struct LocalRelaxation<W> {
    relaxations: usize,
    pruned: usize,
    hierarchy_skips: usize,
    improvements: Vec<(usize, W)>,
    overflowed: Vec<usize>,
}

impl<W> LocalRelaxation<W> {
    fn new() -> Self {
        LocalRelaxation {
            relaxations: 0,
            pruned: 0,
            hierarchy_skips: 0,
            improvements: Vec::new(),
            overflowed: Vec::new(),
        }
    }
}

/// Working state of one solve
struct SolveContext<'a, W, G>
where
    W: Weight,
    G: Graph<W>,
{
    graph: &'a G,
    distances: Vec<W>,
    predecessors: Option<Vec<Option<usize>>>,
    finalized: Vec<bool>,
    /// Nodes processed in the current bucket, finalized when it retires
    settled: Vec<usize>,
    in_settled: Vec<bool>,
    frontier: BucketedFrontier,
    current_bucket: Option<usize>,
    /// Targets of relaxations whose sum reached the unreachable sentinel
    overflowed: Vec<usize>,
    metrics: Metrics,
}

impl<'a, W, G> SolveContext<'a, W, G>
where
    W: Weight,
    G: Graph<W>,
{
    fn new(graph: &'a G, delta: f64, track_predecessors: bool) -> Result<Self> {
        let n = graph.vertex_count();
        let frontier = BucketedFrontier::new(n, delta)?;
        Ok(SolveContext {
            graph,
            distances: vec![W::infinity(); n],
            predecessors: track_predecessors.then(|| vec![None; n]),
            finalized: vec![false; n],
            settled: Vec::new(),
            in_settled: vec![false; n],
            frontier,
            current_bucket: None,
            overflowed: Vec::new(),
            metrics: Metrics {
                delta,
                ..Metrics::default()
            },
        })
    }

    fn seed(&mut self, source: usize) {
        self.distances[source] = W::zero();
        self.frontier.insert(source, W::zero());
    }

    fn run<M: MinimumFinder<W>>(
        &mut self,
        finder: &M,
        pruner: &LowerBoundPruner,
        hierarchy: Option<&HierarchicalGraph<W>>,
        parallel_threshold: Option<usize>,
    ) -> Result<()> {
        while let Some(bucket) = self.frontier.pop_min_bucket() {
            let id = bucket.id();
            if self.current_bucket != Some(id) {
                self.retire_settled();
                self.current_bucket = Some(id);
                self.metrics.final_bucket_count += 1;
            }
            self.metrics.buckets_processed += 1;
            self.metrics.max_bucket_id = self.metrics.max_bucket_id.max(id);
            self.metrics.bucket_trace.push(id);

            // snapshot of each member's distance at drain time
            let batch: Vec<Candidate<W>> = bucket
                .members()
                .map(|u| Candidate::new(u, self.distances[u]))
                .collect();
            let batch = finder.order_batch(batch);
            trace!("Bucket {}: {} nodes, {} left in frontier", id, batch.len(), self.frontier.len());

            match parallel_threshold {
                Some(threshold) if batch.len() >= threshold => self.relax_parallel(&batch, pruner, hierarchy)?,
                _ => self.relax_sequential(&batch, pruner, hierarchy)?,
            }
        }
        self.retire_settled();
        self.check_overflow()
    }

    fn relax_sequential(
        &mut self,
        batch: &[Candidate<W>],
        pruner: &LowerBoundPruner,
        hierarchy: Option<&HierarchicalGraph<W>>,
    ) -> Result<()> {
        let graph = self.graph;
        for candidate in batch {
            let u = candidate.node;
            let dist_u = candidate.distance;
            if self.distances[u] != dist_u {
                // improved earlier in this batch, the newer entry is in the frontier
                self.metrics.stale_entries += 1;
                continue;
            }
            self.mark_settled(u);

            for (v, weight) in graph.outgoing_edges(u) {
                check_weight(u, v, weight)?;
                if pruner.can_skip(u, v, dist_u, self.distances[v]) {
                    self.metrics.pruned_relaxations += 1;
                    continue;
                }
                if let Some(h) = hierarchy {
                    if h.edge_is_dominated(u, v, dist_u, &self.distances) {
                        self.metrics.hierarchy_skips += 1;
                        continue;
                    }
                }
                self.metrics.relaxations += 1;
                match dist_u.checked_extend(weight) {
                    Some(tentative) => self.improve(v, tentative, u),
                    None => self.overflowed.push(v),
                }
            }
        }
        Ok(())
    }

    /// Computes candidate distances for the whole batch on the rayon pool
    /// against the distances as they were at drain time, then applies them
    /// in batch order.
    fn relax_parallel(
        &mut self,
        batch: &[Candidate<W>],
        pruner: &LowerBoundPruner,
        hierarchy: Option<&HierarchicalGraph<W>>,
    ) -> Result<()> {
        let graph = self.graph;
        let distances = &self.distances;

        let outcomes = batch
            .par_iter()
            .map(|candidate| -> Result<LocalRelaxation<W>> {
                let u = candidate.node;
                let dist_u = candidate.distance;
                let mut local = LocalRelaxation::new();
                for (v, weight) in graph.outgoing_edges(u) {
                    check_weight(u, v, weight)?;
                    if pruner.can_skip(u, v, dist_u, distances[v]) {
                        local.pruned += 1;
                        continue;
                    }
                    if let Some(h) = hierarchy {
                        if h.edge_is_dominated(u, v, dist_u, distances) {
                            local.hierarchy_skips += 1;
                            continue;
                        }
                    }
                    local.relaxations += 1;
                    match dist_u.checked_extend(weight) {
                        Some(tentative) if tentative < distances[v] => local.improvements.push((v, tentative)),
                        Some(_) => {}
                        None => local.overflowed.push(v),
                    }
                }
                Ok(local)
            })
            .collect::<Result<Vec<_>>>()?;

        for (candidate, local) in batch.iter().zip(outcomes) {
            self.mark_settled(candidate.node);
            self.metrics.relaxations += local.relaxations;
            self.metrics.pruned_relaxations += local.pruned;
            self.metrics.hierarchy_skips += local.hierarchy_skips;
            self.overflowed.extend(local.overflowed);
            for (v, tentative) in local.improvements {
                self.improve(v, tentative, candidate.node);
            }
        }
        Ok(())
    }

    fn improve(&mut self, v: usize, tentative: W, via: usize) {
        if tentative < self.distances[v] {
            debug_assert!(!self.finalized[v], "finalized node {} improved", v);
            if !self.distances[v].is_infinite() {
                self.metrics.reinsertions += 1;
            }
            self.distances[v] = tentative;
            if let Some(predecessors) = self.predecessors.as_mut() {
                predecessors[v] = Some(via);
            }
            self.frontier.insert(v, tentative);
        }
    }

    fn mark_settled(&mut self, u: usize) {
        if !self.in_settled[u] {
            self.in_settled[u] = true;
            self.settled.push(u);
        }
    }

    /// Finalizes every node processed in the bucket being left behind
    fn retire_settled(&mut self) {
        for u in self.settled.drain(..) {
            self.in_settled[u] = false;
            if !self.finalized[u] {
                self.finalized[u] = true;
                self.metrics.finalized_nodes += 1;
            }
        }
    }

    /// A vertex that is still unreached but had an overflowing relaxation
    /// is reachable at a distance the weight type cannot hold.
    /// Edges into unreached vertices are never pruned or skipped, so every
    /// such vertex was recorded.
    fn check_overflow(&self) -> Result<()> {
        match self
            .overflowed
            .iter()
            .copied()
            .filter(|&v| self.distances[v].is_infinite())
            .min()
        {
            Some(vertex) => Err(Error::DistanceOverflow { vertex }),
            None => Ok(()),
        }
    }

    fn finish(self, source: usize) -> (ShortestPathResult<W>, Metrics) {
        let mut metrics = self.metrics;
        metrics.bucket_operations = self.frontier.operations();
        let result = ShortestPathResult {
            distances: self.distances,
            predecessors: self.predecessors,
            source,
        };
        (result, metrics)
    }
}
