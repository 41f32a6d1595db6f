use crate::algorithm::{ShortestPathAlgorithm, ShortestPathResult};
use crate::data_structures::BinaryHeapWrapper;
use crate::graph::{Graph, Weight};
use crate::{Error, Result};

/// Classic binary-heap Dijkstra, the reference the bucketed solver is checked against
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

impl Dijkstra {
    /// Creates a new Dijkstra algorithm instance
    pub fn new() -> Self {
        Dijkstra
    }
}

impl<W, G> ShortestPathAlgorithm<W, G> for Dijkstra
where
    W: Weight,
    G: Graph<W>,
{
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn compute_shortest_paths(&self, graph: &G, source: usize) -> Result<ShortestPathResult<W>> {
        let n = graph.vertex_count();
        if source >= n {
            return Err(Error::InvalidSource {
                vertex: source,
                vertex_count: n,
            });
        }

        // Initialize distances and predecessors
        let mut distances = vec![W::infinity(); n];
        let mut predecessors: Vec<Option<usize>> = vec![None; n];
        let mut overflowed = Vec::new();

        // Distance to source is 0
        distances[source] = W::zero();

        // Initialize priority queue
        let mut queue = BinaryHeapWrapper::new();
        queue.push(source, W::zero());

        // Main Dijkstra loop
        while let Some((u, dist_u)) = queue.pop() {
            // If we've already found a shorter path to u, skip
            if distances[u] < dist_u {
                continue;
            }

            // Relax all outgoing edges
            for (v, weight) in graph.outgoing_edges(u) {
                if !weight.is_valid_weight() {
                    return Err(Error::InvalidWeight {
                        from: u,
                        to: v,
                        weight: weight.as_f64(),
                    });
                }
                let Some(new_dist) = dist_u.checked_extend(weight) else {
                    overflowed.push(v);
                    continue;
                };
                if new_dist < distances[v] {
                    distances[v] = new_dist;
                    predecessors[v] = Some(u);
                    queue.push(v, new_dist);
                }
            }
        }

        // Reachable but too far to represent
        if let Some(vertex) = overflowed.into_iter().filter(|&v| distances[v].is_infinite()).min() {
            return Err(Error::DistanceOverflow { vertex });
        }

        Ok(ShortestPathResult {
            distances,
            predecessors: Some(predecessors),
            source,
        })
    }
}
