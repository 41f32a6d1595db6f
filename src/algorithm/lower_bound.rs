use std::time::Instant;

use log::{info, warn};

use crate::algorithm::post_dijkstra::solve_unpruned;
use crate::graph::{Graph, ReversedGraph, Weight};
use crate::Result;

/// Rounding slack multiplier applied to the magnitudes entering a prune test
const TOLERANCE_FACTOR: f64 = 8.0;

/// Landmark (ALT-style) lower bounds on point-to-point distances
///
/// For each landmark `L` the pruner keeps `d(L, x)` and, on directed graphs,
/// `d(x, L)`. The triangle inequality then gives
///
/// ```text
/// d(u, v) >= d(L, v) - d(L, u)
/// d(u, v) >= d(u, L) - d(v, L)
/// ```
///
/// which is valid for directed graphs as long as both tables are used the
/// right way round. Undirected graphs share one table for both directions.
///
/// A pruner without landmarks never prunes.
#[derive(Debug, Clone, Default)]
pub struct LowerBoundPruner {
    landmarks: Vec<usize>,
    /// `from_landmark[i][x] = d(landmarks[i], x)`, `+inf` when unreachable
    from_landmark: Vec<Vec<f64>>,
    /// `to_landmark[i][x] = d(x, landmarks[i])`; `None` on undirected graphs
    to_landmark: Option<Vec<Vec<f64>>>,
    /// Rounding precision of the weight type the tables were computed in
    epsilon: f64,
}

impl LowerBoundPruner {
    /// A pruner that never prunes
    pub fn disabled() -> Self {
        LowerBoundPruner::default()
    }

    /// Selects up to `landmark_count` landmarks and computes their tables
    ///
    /// The landmark searches use the mean positive edge weight as bucket
    /// width. On failure (e.g. an invalid edge weight) the pruner comes back
    /// disabled.
    pub fn build<W, G>(graph: &G, landmark_count: usize) -> Self
    where
        W: Weight,
        G: Graph<W>,
    {
        let delta = graph
            .mean_positive_edge_weight()
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(1.0);
        Self::build_with_delta::<W, G>(graph, landmark_count, delta)
    }

    /// [`build`](Self::build) with an explicit bucket width for the landmark searches
    pub fn build_with_delta<W, G>(graph: &G, landmark_count: usize, delta: f64) -> Self
    where
        W: Weight,
        G: Graph<W>,
    {
        let start = Instant::now();
        match Self::try_build::<W, G>(graph, landmark_count, delta) {
            Ok(pruner) => {
                info!(
                    "Selected {} landmarks over {} vertices in {:?}",
                    pruner.landmarks.len(),
                    graph.vertex_count(),
                    start.elapsed()
                );
                pruner
            }
            Err(err) => {
                warn!("Landmark preprocessing failed, pruning disabled: {}", err);
                Self::disabled()
            }
        }
    }

    /// Farthest-point landmark selection seeded at vertex 0
    ///
    /// Each next landmark maximizes its distance to the closest landmark
    /// chosen so far; vertices unreachable from every landmark count as
    /// farthest, ties go to the lowest ID. Selection stops early once every
    /// vertex is a landmark.
    pub fn try_build<W, G>(graph: &G, landmark_count: usize, delta: f64) -> Result<Self>
    where
        W: Weight,
        G: Graph<W>,
    {
        let n = graph.vertex_count();
        let target = landmark_count.min(n);
        let undirected = graph.is_undirected();
        let reversed = ReversedGraph::new(graph);

        let mut pruner = LowerBoundPruner {
            landmarks: Vec::with_capacity(target),
            from_landmark: Vec::with_capacity(target),
            to_landmark: (!undirected).then(|| Vec::with_capacity(target)),
            epsilon: W::relative_epsilon(),
        };
        if target == 0 {
            return Ok(pruner);
        }

        let mut is_landmark = vec![false; n];
        let mut closest = vec![f64::INFINITY; n];
        let mut next = Some(0);

        while let Some(landmark) = next {
            if pruner.landmarks.len() >= target {
                break;
            }
            is_landmark[landmark] = true;
            pruner.landmarks.push(landmark);

            let from = to_table(solve_unpruned::<W, G>(graph, landmark, delta)?);
            if let Some(to) = pruner.to_landmark.as_mut() {
                to.push(to_table(solve_unpruned::<W, _>(&reversed, landmark, delta)?));
            }

            for (c, &d) in closest.iter_mut().zip(&from) {
                if d < *c {
                    *c = d;
                }
            }
            pruner.from_landmark.push(from);

            next = farthest_candidate(&closest, &is_landmark);
        }

        Ok(pruner)
    }

    /// Chosen landmarks in selection order
    pub fn landmarks(&self) -> &[usize] {
        &self.landmarks
    }

    /// True if at least one landmark table exists
    pub fn is_enabled(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// Best lower bound on `d(u, v)` over all landmarks, clamped at zero
    ///
    /// `None` when no landmark has finite entries for both endpoints.
    pub fn lower_bound(&self, u: usize, v: usize) -> Option<f64> {
        self.bound_with_scale(u, v).map(|(bound, _)| bound)
    }

    /// The bound plus the largest table entry it was derived from
    fn bound_with_scale(&self, u: usize, v: usize) -> Option<(f64, f64)> {
        let mut best: Option<(f64, f64)> = None;
        let mut consider = |a: f64, b: f64| {
            // bound a - b from two finite table entries
            if a.is_finite() && b.is_finite() {
                let bound = a - b;
                let scale = a.abs().max(b.abs());
                match best {
                    Some((current, _)) if current >= bound => {}
                    _ => best = Some((bound, scale)),
                }
            }
        };

        let to_landmark = self.to_landmark.as_ref().unwrap_or(&self.from_landmark);
        for (from, to) in self.from_landmark.iter().zip(to_landmark) {
            let (Some(&from_u), Some(&from_v)) = (from.get(u), from.get(v)) else {
                return None;
            };
            let (Some(&to_u), Some(&to_v)) = (to.get(u), to.get(v)) else {
                return None;
            };
            consider(from_v, from_u);
            consider(to_u, to_v);
        }

        best.map(|(bound, scale)| (bound.max(0.0), scale))
    }

    /// True when relaxing `(u, v)` from `dist_u` provably cannot beat `best_v`
    ///
    /// The test `dist_u + LB(u, v) >= best_v` is evaluated in `f64` with a
    /// relative slack covering the rounding of the weight type, so rounding
    /// can only cost a missed prune, never a wrong one.
    pub fn can_skip<W: Weight>(&self, u: usize, v: usize, dist_u: W, best_v: W) -> bool {
        if best_v.is_infinite() || dist_u.is_infinite() {
            return false;
        }
        let Some((bound, scale)) = self.bound_with_scale(u, v) else {
            return false;
        };
        let dist_u = dist_u.as_f64();
        let best_v = best_v.as_f64();
        let slack = TOLERANCE_FACTOR * self.epsilon * (scale + dist_u.abs() + best_v.abs());
        dist_u + bound - slack >= best_v
    }
}

fn to_table<W: Weight>(distances: Vec<W>) -> Vec<f64> {
    distances
        .into_iter()
        .map(|d| if d.is_infinite() { f64::INFINITY } else { d.as_f64() })
        .collect()
}

fn farthest_candidate(closest: &[f64], is_landmark: &[bool]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (v, &d) in closest.iter().enumerate() {
        if is_landmark[v] {
            continue;
        }
        // strict comparison keeps the lowest ID on ties
        if best.map_or(true, |(_, b)| d > b) {
            best = Some((v, d));
        }
    }
    best.map(|(v, _)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DirectedGraph;

    fn line() -> DirectedGraph<f64> {
        // 0 -> 1 -> 2 -> 3, weights 1, 2, 3
        DirectedGraph::from_edges(4, vec![(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0)]).unwrap()
    }

    #[test]
    fn zero_landmarks_never_prune() {
        let pruner = LowerBoundPruner::build(&line(), 0);
        assert!(!pruner.is_enabled());
        assert!(!pruner.can_skip(0, 1, 100.0, 0.0));
        assert!(LowerBoundPruner::disabled().lower_bound(0, 1).is_none());
    }

    #[test]
    fn farthest_point_selection_on_a_line() {
        let pruner = LowerBoundPruner::build(&line(), 2);
        // from 0 the farthest vertex is 3
        assert_eq!(pruner.landmarks(), &[0, 3]);
    }

    #[test]
    fn landmark_count_is_clamped() {
        let pruner = LowerBoundPruner::build(&line(), 50);
        assert_eq!(pruner.landmarks().len(), 4);
    }

    #[test]
    fn unreachable_vertices_are_picked_first() {
        // 2 is isolated from 0
        let g = DirectedGraph::from_edges(3, vec![(0, 1, 10.0)]).unwrap();
        let pruner = LowerBoundPruner::build(&g, 2);
        assert_eq!(pruner.landmarks(), &[0, 2]);
    }

    #[test]
    fn bounds_never_exceed_true_distances_on_directed_graphs() {
        // one-way shortcut 3 -> 0 makes the reverse direction cheap
        let g = DirectedGraph::from_edges(
            4,
            vec![(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 0.5)],
        )
        .unwrap();
        let pruner = LowerBoundPruner::build_with_delta(&g, 4, 0.25);
        // d(1, 2) = 2, d(3, 0) = 0.5, d(2, 1) = 3 + 0.5 + 1
        assert!(pruner.lower_bound(1, 2).unwrap() <= 2.0);
        assert!(pruner.lower_bound(3, 0).unwrap() <= 0.5);
        assert!(pruner.lower_bound(2, 1).unwrap() <= 4.5);
        // with every vertex a landmark the bounds are tight
        assert!((pruner.lower_bound(2, 1).unwrap() - 4.5).abs() < 1e-12);
    }

    #[test]
    fn skip_requires_bound_to_reach_best() {
        let pruner = LowerBoundPruner::build(&line(), 1);
        // LB(1, 2) = d(0, 2) - d(0, 1) = 2
        assert_eq!(pruner.lower_bound(1, 2), Some(2.0));
        assert!(pruner.can_skip(1, 2, 1.0, 2.5));
        assert!(!pruner.can_skip(1, 2, 1.0, 3.5));
        assert!(!pruner.can_skip(1, 2, 1.0, f64::INFINITY));
    }
}
