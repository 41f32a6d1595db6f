use std::fmt::Debug;
use num_traits::{Float, ToPrimitive, Zero};
use ordered_float::OrderedFloat;

/// Numeric edge weight / path distance.
///
/// A graph uses exactly one weight type. Floating types use `+inf` as the
/// unreachable distance, integer types use `MAX` and saturate on addition so
/// that infinity stays absorbing.
pub trait Weight: Copy + Debug + PartialOrd + Send + Sync + 'static {
    /// Additive identity, the distance of the source to itself
    fn zero() -> Self;

    /// Distance of an unreachable vertex
    fn infinity() -> Self;

    /// True when the value may be used as an edge weight: non-negative, not
    /// NaN and below the unreachable sentinel
    fn is_valid_weight(&self) -> bool;

    /// Path concatenation; `infinity() + w == infinity()` for every valid `w`
    fn saturating_sum(self, other: Self) -> Self;

    /// Lossy conversion used for bucket indices and bound arithmetic
    fn as_f64(self) -> f64;

    /// True for the unreachable sentinel
    fn is_infinite(&self) -> bool {
        *self == Self::infinity()
    }

    /// Path concatenation of a finite distance and a valid weight, `None`
    /// when the sum no longer fits below the unreachable sentinel
    fn checked_extend(self, weight: Self) -> Option<Self> {
        let sum = self.saturating_sum(weight);
        (!sum.is_infinite()).then_some(sum)
    }

    /// Relative rounding error of one addition, as seen through `as_f64`
    fn relative_epsilon() -> f64 {
        f64::EPSILON
    }
}

macro_rules! impl_float_weight {
    ($($t:ty => $eps:expr),*) => {$(
        impl Weight for $t {
            fn zero() -> Self {
                <$t as Zero>::zero()
            }

            fn infinity() -> Self {
                <$t as Float>::infinity()
            }

            fn is_valid_weight(&self) -> bool {
                Float::is_finite(*self) && *self >= <$t as Zero>::zero()
            }

            fn saturating_sum(self, other: Self) -> Self {
                self + other
            }

            fn as_f64(self) -> f64 {
                ToPrimitive::to_f64(&self).unwrap_or(f64::NAN)
            }

            fn relative_epsilon() -> f64 {
                $eps
            }
        }
    )*};
}

macro_rules! impl_integer_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            fn zero() -> Self {
                0
            }

            fn infinity() -> Self {
                <$t>::MAX
            }

            #[allow(unused_comparisons)]
            fn is_valid_weight(&self) -> bool {
                *self >= 0 && *self != <$t>::MAX
            }

            fn saturating_sum(self, other: Self) -> Self {
                self.saturating_add(other)
            }

            fn as_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_float_weight!(
    f32 => f32::EPSILON as f64,
    f64 => f64::EPSILON,
    OrderedFloat<f32> => f32::EPSILON as f64,
    OrderedFloat<f64> => f64::EPSILON
);
impl_integer_weight!(u32, u64, usize, i32, i64);

/// Trait representing a read-only weighted directed graph
///
/// Implementations are immutable once built, so a single graph can be shared
/// by any number of concurrent solves.
pub trait Graph<W>: Debug + Sync
where
    W: Weight,
{
    /// Returns the number of vertices in the graph
    fn vertex_count(&self) -> usize;

    /// Returns the number of edges in the graph
    fn edge_count(&self) -> usize;

    /// Returns an iterator over the outgoing edges from a vertex
    fn outgoing_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_>;

    /// Returns an iterator over the incoming edges to a vertex
    fn incoming_edges(&self, vertex: usize) -> Box<dyn Iterator<Item = (usize, W)> + '_>;

    /// Returns true if the vertex exists in the graph
    fn has_vertex(&self, vertex: usize) -> bool {
        vertex < self.vertex_count()
    }

    /// Returns true if there's an edge between the two vertices
    fn has_edge(&self, from: usize, to: usize) -> bool {
        self.outgoing_edges(from).any(|(target, _)| target == to)
    }

    /// Gets the weight of the lightest edge between two vertices, if any
    fn get_edge_weight(&self, from: usize, to: usize) -> Option<W> {
        self.outgoing_edges(from)
            .filter(|(target, _)| *target == to)
            .map(|(_, weight)| weight)
            .fold(None, |best, w| match best {
                Some(b) if b <= w => Some(b),
                _ => Some(w),
            })
    }

    /// True when every edge `(u, v, w)` has a twin `(v, u, w)`
    fn is_undirected(&self) -> bool {
        false
    }

    /// Largest edge weight, `None` for an edgeless graph
    fn max_edge_weight(&self) -> Option<W> {
        let mut max: Option<W> = None;
        for u in 0..self.vertex_count() {
            for (_, w) in self.outgoing_edges(u) {
                if max.map_or(true, |m| w > m) {
                    max = Some(w);
                }
            }
        }
        max
    }

    /// Mean of the finite, strictly positive edge weights
    fn mean_positive_edge_weight(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for u in 0..self.vertex_count() {
            for (_, w) in self.outgoing_edges(u) {
                let w = w.as_f64();
                if w > 0.0 && w.is_finite() {
                    sum += w;
                    count += 1;
                }
            }
        }
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }
}
