use std::fmt::Debug;
use std::marker::PhantomData;

use crate::graph::traits::{Graph, Weight};

/// A view of a graph with every edge reversed
///
/// Running SSSP from `x` on the reversed view yields distances *to* `x` in the
/// wrapped graph.
#[derive(Debug)]
pub struct ReversedGraph<'a, W, G>
where
    W: Weight,
    G: Graph<W>,
{
    /// The wrapped graph
    graph: &'a G,
    /// Weight type marker
    _weight_marker: PhantomData<W>,
}

impl<'a, W, G> ReversedGraph<'a, W, G>
where
    W: Weight,
    G: Graph<W>,
{
    /// Wraps a graph
    pub fn new(graph: &'a G) -> Self {
        ReversedGraph {
            graph,
            _weight_marker: PhantomData,
        }
    }
}

impl<'a, W, G> Graph<W> for ReversedGraph<'a, W, G>
where
    W: Weight,
    G: Graph<W>,
{
    fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        self.graph.incoming_edges(vertex)
    }

    fn incoming_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_> {
        self.graph.outgoing_edges(vertex)
    }

    fn has_vertex(&self, vertex: usize) -> bool {
        self.graph.has_vertex(vertex)
    }

    fn is_undirected(&self) -> bool {
        self.graph.is_undirected()
    }
}
