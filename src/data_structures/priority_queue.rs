use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt::Debug;

/// Heap entry ordered by `(priority, vertex)`
///
/// Priorities only need `PartialOrd`; incomparable values (NaN) compare equal,
/// which never happens for validated weights.
#[derive(Debug, Clone, Copy)]
struct Entry<V, P> {
    priority: P,
    vertex: V,
}

impl<V: Ord, P: PartialOrd> PartialEq for Entry<V, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V: Ord, P: PartialOrd> Eq for Entry<V, P> {}

impl<V: Ord, P: PartialOrd> PartialOrd for Entry<V, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: Ord, P: PartialOrd> Ord for Entry<V, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .partial_cmp(&other.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

/// A min-priority queue around BinaryHeap for shortest path algorithms
///
/// Equal priorities pop in ascending vertex order.
#[derive(Debug)]
pub struct BinaryHeapWrapper<V, P>
where
    V: Copy + Eq + Debug + Ord,
    P: PartialOrd + Copy + Debug,
{
    /// The underlying binary heap
    heap: BinaryHeap<Reverse<Entry<V, P>>>,
}

impl<V, P> Default for BinaryHeapWrapper<V, P>
where
    V: Copy + Eq + Debug + Ord,
    P: PartialOrd + Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, P> BinaryHeapWrapper<V, P>
where
    V: Copy + Eq + Debug + Ord,
    P: PartialOrd + Copy + Debug,
{
    /// Creates a new empty priority queue
    pub fn new() -> Self {
        BinaryHeapWrapper {
            heap: BinaryHeap::new(),
        }
    }

    /// Returns true if the priority queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of elements in the priority queue
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Pushes an element with the given priority into the priority queue
    pub fn push(&mut self, vertex: V, priority: P) {
        self.heap.push(Reverse(Entry { priority, vertex }));
    }

    /// Removes the element with the smallest priority
    pub fn pop(&mut self) -> Option<(V, P)> {
        self.heap.pop().map(|Reverse(e)| (e.vertex, e.priority))
    }

    /// Returns the element with the smallest priority without removing it
    pub fn peek(&self) -> Option<(V, P)> {
        self.heap.peek().map(|Reverse(e)| (e.vertex, e.priority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_smallest_priority_then_lowest_vertex() {
        let mut q = BinaryHeapWrapper::new();
        q.push(4usize, 2.0);
        q.push(1usize, 3.0);
        q.push(2usize, 2.0);
        assert_eq!(q.peek(), Some((2, 2.0)));
        assert_eq!(q.pop(), Some((2, 2.0)));
        assert_eq!(q.pop(), Some((4, 2.0)));
        assert_eq!(q.pop(), Some((1, 3.0)));
        assert!(q.is_empty());
    }
}
