use std::cmp::Ordering;
use std::fmt::Debug;

use crate::graph::Weight;

/// A frontier node together with its tentative distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<W>
where
    W: Weight,
{
    pub node: usize,
    pub distance: W,
}

impl<W> Candidate<W>
where
    W: Weight,
{
    pub fn new(node: usize, distance: W) -> Self {
        Candidate { node, distance }
    }

    /// Total order used for selection: distance first, then lowest node ID
    pub fn order(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Strategy selecting the minimum-distance candidate from a small set
///
/// `find_minimum` is the only required operation. Any backend (associative
/// search hardware, amplitude-based search, ...) can be plugged in without
/// touching the solver, as long as it honours the selection contract: the
/// candidate with the smallest distance, ties broken by the lowest node ID.
pub trait MinimumFinder<W>: Debug + Send + Sync
where
    W: Weight,
{
    /// Returns the minimum candidate, `None` only for an empty slice
    fn find_minimum(&self, candidates: &[Candidate<W>]) -> Option<Candidate<W>>;

    /// Orders a drained bucket by repeated selection
    ///
    /// The solver processes every bucket in this order, which is what makes
    /// predecessor choices reproducible across runs.
    fn order_batch(&self, mut candidates: Vec<Candidate<W>>) -> Vec<Candidate<W>> {
        let mut ordered = Vec::with_capacity(candidates.len());
        while let Some(min) = self.find_minimum(&candidates) {
            match candidates.iter().position(|c| c.node == min.node) {
                Some(index) => ordered.push(candidates.swap_remove(index)),
                None => break,
            }
        }
        // a finder that answers with a foreign candidate leaves the rest as-is
        ordered.extend(candidates);
        ordered
    }

    /// Name used in logs
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Linear-scan minimum selection, the classical reference backend
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassicalMinimumFinder;

impl<W> MinimumFinder<W> for ClassicalMinimumFinder
where
    W: Weight,
{
    fn find_minimum(&self, candidates: &[Candidate<W>]) -> Option<Candidate<W>> {
        let mut iter = candidates.iter();
        let mut best = *iter.next()?;
        for candidate in iter {
            if candidate.order(&best) == Ordering::Less {
                best = *candidate;
            }
        }
        Some(best)
    }

    fn order_batch(&self, mut candidates: Vec<Candidate<W>>) -> Vec<Candidate<W>> {
        candidates.sort_unstable_by(|a, b| a.order(b));
        candidates
    }

    fn name(&self) -> &'static str {
        "classical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Finder relying on the provided `order_batch`
    #[derive(Debug)]
    struct SelectionOnly;

    impl MinimumFinder<u32> for SelectionOnly {
        fn find_minimum(&self, candidates: &[Candidate<u32>]) -> Option<Candidate<u32>> {
            ClassicalMinimumFinder.find_minimum(candidates)
        }
    }

    fn sample() -> Vec<Candidate<u32>> {
        vec![
            Candidate::new(7, 3),
            Candidate::new(2, 5),
            Candidate::new(4, 3),
            Candidate::new(1, 9),
        ]
    }

    #[test]
    fn ties_break_on_lowest_node() {
        let min = ClassicalMinimumFinder.find_minimum(&sample()).unwrap();
        assert_eq!(min, Candidate::new(4, 3));
    }

    #[test]
    fn empty_set_has_no_minimum() {
        assert!(MinimumFinder::<f64>::find_minimum(&ClassicalMinimumFinder, &[]).is_none());
    }

    #[test]
    fn provided_ordering_matches_classical_sort() {
        let by_selection: Vec<usize> = SelectionOnly.order_batch(sample()).iter().map(|c| c.node).collect();
        let by_sort: Vec<usize> = ClassicalMinimumFinder.order_batch(sample()).iter().map(|c| c.node).collect();
        assert_eq!(by_selection, vec![4, 7, 2, 1]);
        assert_eq!(by_selection, by_sort);
    }
}
