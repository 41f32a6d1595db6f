use crate::graph::traits::{Graph, Weight};
use crate::{Error, Result};

/// An immutable directed graph stored as forward and reverse CSR arrays
///
/// Edges of a vertex keep the order in which they were supplied, which keeps
/// every traversal (and therefore every solve) deterministic.
#[derive(Debug, Clone)]
pub struct DirectedGraph<W>
where
    W: Weight,
{
    /// Number of vertices in the graph
    vertex_count: usize,

    /// Outgoing edges: `out_targets[out_offsets[v]..out_offsets[v + 1]]`
    out_offsets: Vec<usize>,
    out_targets: Vec<usize>,
    out_weights: Vec<W>,

    /// Incoming edges: `in_sources[in_offsets[v]..in_offsets[v + 1]]`
    in_offsets: Vec<usize>,
    in_sources: Vec<usize>,
    in_weights: Vec<W>,

    /// Set when every edge was inserted in both directions
    undirected: bool,
}

impl<W> DirectedGraph<W>
where
    W: Weight,
{
    /// Builds a directed graph from `(from, to, weight)` triples
    ///
    /// Fails with `InvalidEdge` for an endpoint outside `[0, vertex_count)` and
    /// with `InvalidWeight` for a negative or NaN weight.
    pub fn from_edges<I>(vertex_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, W)>,
    {
        let edges: Vec<(usize, usize, W)> = edges.into_iter().collect();
        for &(from, to, weight) in &edges {
            validate_edge(vertex_count, from, to, weight)?;
        }
        Ok(Self::from_validated(vertex_count, &edges, false))
    }

    /// Builds a symmetric graph: every `(u, v, w)` becomes `u -> v` and `v -> u`
    pub fn from_undirected_edges<I>(vertex_count: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, W)>,
    {
        let mut directed = Vec::new();
        for (from, to, weight) in edges {
            validate_edge(vertex_count, from, to, weight)?;
            directed.push((from, to, weight));
            directed.push((to, from, weight));
        }
        Ok(Self::from_validated(vertex_count, &directed, true))
    }

    /// Creates a graph with the given number of vertices and no edges
    pub fn empty(vertex_count: usize) -> Self {
        Self::from_validated(vertex_count, &[], false)
    }

    pub(crate) fn from_validated(vertex_count: usize, edges: &[(usize, usize, W)], undirected: bool) -> Self {
        let (out_offsets, out_targets, out_weights) =
            compress(vertex_count, edges.iter().map(|&(u, v, w)| (u, v, w)));
        let (in_offsets, in_sources, in_weights) =
            compress(vertex_count, edges.iter().map(|&(u, v, w)| (v, u, w)));

        DirectedGraph {
            vertex_count,
            out_offsets,
            out_targets,
            out_weights,
            in_offsets,
            in_sources,
            in_weights,
            undirected,
        }
    }

    /// Outgoing edges of a vertex as parallel slices
    pub fn out_slices(&self, vertex: usize) -> (&[usize], &[W]) {
        if vertex >= self.vertex_count {
            return (&[], &[]);
        }
        let range = self.out_offsets[vertex]..self.out_offsets[vertex + 1];
        (&self.out_targets[range.clone()], &self.out_weights[range])
    }

    /// Out-degree of a vertex
    pub fn out_degree(&self, vertex: usize) -> usize {
        self.out_slices(vertex).0.len()
    }

    /// In-degree of a vertex
    pub fn in_degree(&self, vertex: usize) -> usize {
        if vertex >= self.vertex_count {
            return 0;
        }
        self.in_offsets[vertex + 1] - self.in_offsets[vertex]
    }
}

fn validate_edge<W: Weight>(vertex_count: usize, from: usize, to: usize, weight: W) -> Result<()> {
    if from >= vertex_count || to >= vertex_count {
        return Err(Error::InvalidEdge(from, to));
    }
    if !weight.is_valid_weight() {
        return Err(Error::InvalidWeight {
            from,
            to,
            weight: weight.as_f64(),
        });
    }
    Ok(())
}

/// Counting sort of `(key, value, weight)` triples into CSR arrays, stable per key
fn compress<W, I>(vertex_count: usize, edges: I) -> (Vec<usize>, Vec<usize>, Vec<W>)
where
    W: Weight,
    I: Iterator<Item = (usize, usize, W)> + Clone,
{
    let mut offsets = vec![0usize; vertex_count + 1];
    for (key, _, _) in edges.clone() {
        offsets[key + 1] += 1;
    }
    for i in 0..vertex_count {
        offsets[i + 1] += offsets[i];
    }

    let total = offsets[vertex_count];
    let mut cursor = offsets.clone();
    let mut values = vec![0usize; total];
    let mut weights = vec![W::zero(); total];
    for (key, value, weight) in edges {
        let slot = cursor[key];
        values[slot] = value;
        weights[slot] = weight;
        cursor[key] += 1;
    }

    (offsets, values, weights)
}

impl<W> Graph<W> for DirectedGraph<W>
where
    W: Weight,
{
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edge_count(&self) -> usize {
        self.out_targets.len()
    }

    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        let (targets, weights) = self.out_slices(vertex);
        Box::new(targets.iter().copied().zip(weights.iter().copied()))
    }

    fn incoming_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        if vertex >= self.vertex_count {
            return Box::new(std::iter::empty());
        }
        let range = self.in_offsets[vertex]..self.in_offsets[vertex + 1];
        Box::new(
            self.in_sources[range.clone()]
                .iter()
                .copied()
                .zip(self.in_weights[range].iter().copied()),
        )
    }

    fn is_undirected(&self) -> bool {
        self.undirected
    }
}

/// Incremental construction of a [`DirectedGraph`]
///
/// The builder is the only mutable stage; `build` hands back an immutable
/// graph and an update requires building a new one.
#[derive(Debug, Clone)]
pub struct GraphBuilder<W>
where
    W: Weight,
{
    vertex_count: usize,
    edges: Vec<(usize, usize, W)>,
    only_undirected: bool,
}

impl<W> GraphBuilder<W>
where
    W: Weight,
{
    /// Creates a builder with `vertex_count` vertices and no edges
    pub fn new(vertex_count: usize) -> Self {
        GraphBuilder {
            vertex_count,
            edges: Vec::new(),
            only_undirected: true,
        }
    }

    /// Adds a vertex and returns its ID
    pub fn add_vertex(&mut self) -> usize {
        self.vertex_count += 1;
        self.vertex_count - 1
    }

    /// Adds a directed edge
    pub fn add_edge(&mut self, from: usize, to: usize, weight: W) -> Result<&mut Self> {
        validate_edge(self.vertex_count, from, to, weight)?;
        self.edges.push((from, to, weight));
        self.only_undirected = false;
        Ok(self)
    }

    /// Adds an edge in both directions
    pub fn add_undirected_edge(&mut self, a: usize, b: usize, weight: W) -> Result<&mut Self> {
        validate_edge(self.vertex_count, a, b, weight)?;
        self.edges.push((a, b, weight));
        self.edges.push((b, a, weight));
        Ok(self)
    }

    /// Number of vertices added so far
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Freezes the builder into an immutable graph
    pub fn build(self) -> DirectedGraph<W> {
        let undirected = self.only_undirected && !self.edges.is_empty();
        DirectedGraph::from_validated(self.vertex_count, &self.edges, undirected)
    }
}
