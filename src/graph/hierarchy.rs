use std::collections::{BTreeMap, VecDeque};
use std::fmt::Debug;

use log::{debug, info};

use crate::graph::traits::{Graph, Weight};
use crate::graph::DirectedGraph;

/// Default maximum number of members grown into one cluster per level
pub const DEFAULT_CLUSTER_SIZE: usize = 8;

const UNASSIGNED: usize = usize::MAX;

/// A contracted cluster of original vertices
#[derive(Debug, Clone)]
pub struct Supernode<W>
where
    W: Weight,
{
    /// Original vertex IDs, ascending
    pub members: Vec<usize>,
    /// Members with at least one incoming edge from outside the cluster
    pub entry_portals: Vec<usize>,
    /// Members with at least one outgoing edge leaving the cluster
    pub exit_portals: Vec<usize>,
    /// Lightest edge entering the cluster, `None` if nothing enters it
    pub min_entry_weight: Option<W>,
}

/// One contraction level
#[derive(Debug, Clone)]
pub struct HierarchyLevel<W>
where
    W: Weight,
{
    /// Original vertex -> supernode ID at this level
    node_cluster: Vec<usize>,
    /// Supernodes indexed by ID
    supernodes: Vec<Supernode<W>>,
    /// Contracted graph, lightest inter-cluster edge per supernode pair
    coarse: DirectedGraph<W>,
}

impl<W> HierarchyLevel<W>
where
    W: Weight,
{
    /// Supernode containing an original vertex
    pub fn cluster_of(&self, vertex: usize) -> Option<usize> {
        self.node_cluster.get(vertex).copied()
    }

    /// All supernodes of the level
    pub fn supernodes(&self) -> &[Supernode<W>] {
        &self.supernodes
    }

    /// The contracted graph of the level
    pub fn coarse_graph(&self) -> &DirectedGraph<W> {
        &self.coarse
    }
}

/// Multi-level clustering of a graph
///
/// Level 0 clusters original vertices, level `k + 1` clusters the supernodes
/// of level `k`. Clusters nest: two vertices sharing a cluster at level `k`
/// share one at every coarser level. The hierarchy is only an accelerant; the
/// solver produces the same distances with or without it.
#[derive(Debug, Clone)]
pub struct HierarchicalGraph<W>
where
    W: Weight,
{
    vertex_count: usize,
    levels: Vec<HierarchyLevel<W>>,
    suggested_delta: f64,
}

impl<W> HierarchicalGraph<W>
where
    W: Weight,
{
    /// Builds up to `levels` contraction levels with the default cluster size
    pub fn build<G: Graph<W>>(graph: &G, levels: usize) -> Self {
        Self::build_with_cluster_size(graph, levels, DEFAULT_CLUSTER_SIZE)
    }

    /// Builds up to `levels` contraction levels, growing clusters of at most
    /// `cluster_size` members (clamped to at least 2)
    ///
    /// Contraction stops early once a level no longer shrinks the graph or a
    /// single supernode remains.
    pub fn build_with_cluster_size<G: Graph<W>>(graph: &G, levels: usize, cluster_size: usize) -> Self {
        let n = graph.vertex_count();
        let cluster_size = cluster_size.max(2);
        let mut built: Vec<HierarchyLevel<W>> = Vec::with_capacity(levels);

        // original vertex -> vertex of the graph being clustered
        let mut current: Vec<usize> = (0..n).collect();
        let mut current_count = n;

        for level in 0..levels {
            if current_count <= 1 {
                break;
            }

            let (assignment, cluster_count) = match built.last() {
                None => grow_clusters(graph, cluster_size),
                Some(previous) => grow_clusters(&previous.coarse, cluster_size),
            };
            if cluster_count >= current_count {
                debug!("Hierarchy level {} does not shrink ({} nodes), stopping", level, current_count);
                break;
            }

            let node_cluster: Vec<usize> = current.iter().map(|&c| assignment[c]).collect();
            let built_level = summarize(graph, node_cluster.clone(), cluster_count);
            debug!(
                "Hierarchy level {}: {} -> {} supernodes",
                level, current_count, cluster_count
            );

            built.push(built_level);
            current = node_cluster;
            current_count = cluster_count;
        }

        let suggested_delta = built
            .first()
            .and_then(|level0| mean_intra_cluster_weight(graph, &level0.node_cluster))
            .or_else(|| graph.mean_positive_edge_weight())
            .unwrap_or(1.0);

        info!(
            "Built hierarchy with {} levels over {} vertices (suggested delta {:.4})",
            built.len(),
            n,
            suggested_delta
        );

        HierarchicalGraph {
            vertex_count: n,
            levels: built,
            suggested_delta,
        }
    }

    /// Number of levels actually built
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of original vertices
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Access a level
    pub fn level(&self, level: usize) -> Option<&HierarchyLevel<W>> {
        self.levels.get(level)
    }

    /// Supernode containing `vertex` at `level`
    pub fn cluster_of(&self, level: usize, vertex: usize) -> Option<usize> {
        self.levels.get(level)?.cluster_of(vertex)
    }

    /// Bucket width heuristic: mean intra-cluster edge weight at level 0
    ///
    /// Falls back to the mean positive edge weight, then to `1.0`.
    pub fn suggested_delta(&self) -> f64 {
        self.suggested_delta
    }

    /// Level-0 shorthand for [`Self::is_cluster_bounded_at_level`]
    pub fn is_cluster_bounded(&self, supernode: usize, threshold: W, distances: &[W]) -> bool {
        self.is_cluster_bounded_at_level(0, supernode, threshold, distances)
    }

    /// True when the cluster has entry portals and every one of them already
    /// holds a tentative distance `<= threshold`
    ///
    /// Any edge entering the cluster lands on an entry portal, so once the
    /// cluster is bounded at `dist[u] + min_entry_weight` no edge from `u`
    /// into it can improve a distance there.
    pub fn is_cluster_bounded_at_level(
        &self,
        level: usize,
        supernode: usize,
        threshold: W,
        distances: &[W],
    ) -> bool {
        let Some(node) = self.levels.get(level).and_then(|l| l.supernodes.get(supernode)) else {
            return false;
        };
        !node.entry_portals.is_empty()
            && node
                .entry_portals
                .iter()
                .all(|&p| distances.get(p).map_or(false, |&d| d <= threshold))
    }

    /// True when the hierarchy proves that relaxing `(u, v)` from `dist_u`
    /// cannot improve `distances[v]`
    ///
    /// At every level separating `u` from `v` the edge enters `v`'s cluster,
    /// so its weight is at least that cluster's `min_entry_weight`. The
    /// edge is dominated once `distances[v] <= dist_u + w` holds for the
    /// largest of those weights.
    pub fn edge_is_dominated(&self, u: usize, v: usize, dist_u: W, distances: &[W]) -> bool {
        let Some(&dist_v) = distances.get(v) else {
            return false;
        };
        let mut bound: Option<W> = None;
        for level in &self.levels {
            let (Some(cu), Some(cv)) = (level.cluster_of(u), level.cluster_of(v)) else {
                return false;
            };
            if cu == cv {
                // clusters nest, coarser levels merge them too
                break;
            }
            if let Some(min_entry) = level.supernodes[cv].min_entry_weight {
                if bound.map_or(true, |b| min_entry > b) {
                    bound = Some(min_entry);
                }
            }
        }
        let Some(bound) = bound else {
            return false;
        };
        let threshold = dist_u.saturating_sum(bound);
        // a saturated threshold says nothing about an unreached v
        !threshold.is_infinite() && dist_v <= threshold
    }
}

/// Greedy BFS clustering over both edge directions, seeds taken in ID order
fn grow_clusters<W, G>(graph: &G, cluster_size: usize) -> (Vec<usize>, usize)
where
    W: Weight,
    G: Graph<W>,
{
    let n = graph.vertex_count();
    let mut assignment = vec![UNASSIGNED; n];
    let mut count = 0;
    let mut queue = VecDeque::new();

    for seed in 0..n {
        if assignment[seed] != UNASSIGNED {
            continue;
        }
        assignment[seed] = count;
        let mut size = 1;
        queue.clear();
        queue.push_back(seed);

        'grow: while let Some(u) = queue.pop_front() {
            for (v, _) in graph.outgoing_edges(u).chain(graph.incoming_edges(u)) {
                if size >= cluster_size {
                    break 'grow;
                }
                if assignment[v] == UNASSIGNED {
                    assignment[v] = count;
                    size += 1;
                    queue.push_back(v);
                }
            }
        }
        count += 1;
    }

    (assignment, count)
}

/// Derives supernodes, portals and the coarse graph from the original edges
fn summarize<W, G>(graph: &G, node_cluster: Vec<usize>, cluster_count: usize) -> HierarchyLevel<W>
where
    W: Weight,
    G: Graph<W>,
{
    let mut supernodes: Vec<Supernode<W>> = (0..cluster_count)
        .map(|_| Supernode {
            members: Vec::new(),
            entry_portals: Vec::new(),
            exit_portals: Vec::new(),
            min_entry_weight: None,
        })
        .collect();
    let mut is_entry = vec![false; node_cluster.len()];
    let mut is_exit = vec![false; node_cluster.len()];
    let mut coarse_edges: BTreeMap<(usize, usize), W> = BTreeMap::new();

    for (vertex, &cluster) in node_cluster.iter().enumerate() {
        supernodes[cluster].members.push(vertex);
    }

    for u in 0..node_cluster.len() {
        let cu = node_cluster[u];
        for (v, w) in graph.outgoing_edges(u) {
            let cv = node_cluster[v];
            if cu == cv {
                continue;
            }
            is_exit[u] = true;
            is_entry[v] = true;

            let entry = &mut supernodes[cv].min_entry_weight;
            if entry.map_or(true, |m| w < m) {
                *entry = Some(w);
            }
            coarse_edges
                .entry((cu, cv))
                .and_modify(|m| {
                    if w < *m {
                        *m = w;
                    }
                })
                .or_insert(w);
        }
    }

    for (vertex, &cluster) in node_cluster.iter().enumerate() {
        if is_entry[vertex] {
            supernodes[cluster].entry_portals.push(vertex);
        }
        if is_exit[vertex] {
            supernodes[cluster].exit_portals.push(vertex);
        }
    }

    let edges: Vec<(usize, usize, W)> = coarse_edges.into_iter().map(|((a, b), w)| (a, b, w)).collect();
    let coarse = DirectedGraph::from_validated(cluster_count, &edges, graph.is_undirected());

    HierarchyLevel {
        node_cluster,
        supernodes,
        coarse,
    }
}

fn mean_intra_cluster_weight<W, G>(graph: &G, node_cluster: &[usize]) -> Option<f64>
where
    W: Weight,
    G: Graph<W>,
{
    let mut sum = 0.0;
    let mut count = 0usize;
    for u in 0..graph.vertex_count() {
        for (v, w) in graph.outgoing_edges(u) {
            let w = w.as_f64();
            if node_cluster[u] == node_cluster[v] && w > 0.0 && w.is_finite() {
                sum += w;
                count += 1;
            }
        }
    }
    (count > 0).then(|| sum / count as f64)
}
