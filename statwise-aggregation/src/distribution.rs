//! Distribution aggregation: summarize measurements as a histogram.
//!
//! A [`DistributionAggregation`] owns an ordered list of bucket boundaries. `n` boundaries
//! define `n + 1` buckets that partition the real line:
//!
//! | boundaries | buckets |
//! |---|---|
//! | `[]` | `(-∞, +∞)` |
//! | `[b]` | `(-∞, b)`, `[b, +∞)` |
//! | `[b0, .., bn-1]` | `(-∞, b0)`, `[b(i-1), b(i))` for `0 < i < n`, `[bn-1, +∞)` |
//!
//! With a single boundary there is no finite-width bucket: the boundary is the shared edge
//! of the underflow and overflow buckets.
//!
//! # Boundary policy
//!
//! [`DistributionAggregation::new`] accepts any boundaries, including unsorted, duplicated or
//! non-finite ones. A sample always lands in the first bucket whose upper boundary is greater
//! than the sample (see [`DistributionAggregation::bucket_index`]), so malformed boundaries
//! produce empty buckets rather than errors. Use [`DistributionAggregation::try_new`] to reject
//! malformed boundaries or [`DistributionAggregation::normalized`] to repair them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ordered_float::OrderedFloat;
use statwise_core::ValidationError;

use crate::bounds;
use crate::value::DistributionData;

/// Aggregation that summarizes measurements as histogram bucket counts plus
/// count, sum, min and max statistics.
///
/// The boundaries are copied on construction and never change afterwards. Cloning a
/// `DistributionAggregation` is cheap: clones and the accumulators it produces share the
/// same immutable boundaries.
#[derive(Clone)]
pub struct DistributionAggregation {
    bounds: Arc<[f64]>,
}

impl DistributionAggregation {
    /// Create a distribution aggregation over the given bucket boundaries.
    ///
    /// The boundaries are copied, so the caller may reuse or mutate its buffer afterwards.
    /// No validation is performed.
    ///
    /// ```
    /// use statwise_aggregation::DistributionAggregation;
    ///
    /// let mut bounds = vec![1.0, 2.0, 3.0];
    /// let aggregation = DistributionAggregation::new(&bounds);
    /// bounds[0] = 100.0;
    /// assert_eq!(aggregation.bounds(), &[1.0, 2.0, 3.0]);
    /// assert_eq!(aggregation.num_buckets(), 4);
    /// ```
    pub fn new(bounds: impl AsRef<[f64]>) -> Self {
        Self {
            bounds: Arc::from(bounds.as_ref()),
        }
    }

    /// Create a distribution aggregation, rejecting boundaries that are not finite or not
    /// strictly increasing.
    ///
    /// Every offending boundary is reported in the returned error.
    pub fn try_new(bounds: impl AsRef<[f64]>) -> Result<Self, ValidationError> {
        let bounds = bounds.as_ref();
        bounds::validate(bounds)?;
        Ok(Self::new(bounds))
    }

    /// Create a distribution aggregation from repaired boundaries: non-finite values are
    /// dropped, the rest are sorted and deduplicated.
    pub fn normalized(bounds: impl AsRef<[f64]>) -> Self {
        Self::new(bounds::normalize(bounds.as_ref()))
    }

    /// The bucket boundaries, exactly as they were supplied.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    /// Number of buckets defined by the boundaries. Always `bounds().len() + 1`.
    pub fn num_buckets(&self) -> usize {
        self.bounds.len() + 1
    }

    /// The range covered by each bucket, in bucket index order.
    ///
    /// The first bucket starts at `-∞` and the last one ends at `+∞`.
    pub fn bucket_ranges(&self) -> impl ExactSizeIterator<Item = BucketRange> + '_ {
        let n = self.bounds.len();
        (0..n + 1).map(move |i| BucketRange {
            start: if i == 0 {
                f64::NEG_INFINITY
            } else {
                self.bounds[i - 1]
            },
            end: if i == n { f64::INFINITY } else { self.bounds[i] },
        })
    }

    /// Index of the bucket `value` is counted in.
    ///
    /// This is the first `i` such that `value < bounds[i]`, or `bounds.len()` (the overflow
    /// bucket) if there is none.
    pub fn bucket_index(&self, value: f64) -> usize {
        bucket_index(&self.bounds, value)
    }

    /// Create a fresh distribution accumulator over these boundaries.
    ///
    /// The accumulator has `num_buckets()` zeroed bucket counters, a count and sum of zero,
    /// `min = +∞` and `max = -∞`.
    pub fn new_value(&self) -> DistributionData {
        DistributionData::new(self.bounds.clone())
    }

    fn ordered_bounds(&self) -> impl Iterator<Item = OrderedFloat<f64>> + '_ {
        self.bounds.iter().copied().map(OrderedFloat)
    }
}

pub(crate) fn bucket_index(bounds: &[f64], value: f64) -> usize {
    // linear scan: bounds are not required to be sorted
    bounds
        .iter()
        .position(|bound| value < *bound)
        .unwrap_or(bounds.len())
}

/// Index of the first boundary where `a` and `b` disagree, `None` if they are the same.
///
/// When one is a prefix of the other, the first boundary past the shorter one differs.
pub(crate) fn first_difference(a: &Arc<[f64]>, b: &Arc<[f64]>) -> Option<usize> {
    if Arc::ptr_eq(a, b) {
        return None;
    }
    a.iter()
        .zip(b.iter())
        .position(|(x, y)| OrderedFloat(*x) != OrderedFloat(*y))
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

pub(crate) fn same_bounds(a: &Arc<[f64]>, b: &Arc<[f64]>) -> bool {
    first_difference(a, b).is_none()
}

/// Boundaries compare by value, treating `NaN` as equal to itself, so aggregations can be used
/// as keys when deduplicating view definitions.
impl PartialEq for DistributionAggregation {
    fn eq(&self, other: &Self) -> bool {
        same_bounds(&self.bounds, &other.bounds)
    }
}

impl Eq for DistributionAggregation {}

impl Hash for DistributionAggregation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bounds.len().hash(state);
        for bound in self.ordered_bounds() {
            bound.hash(state);
        }
    }
}

impl fmt::Debug for DistributionAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistributionAggregation")
            .field("bounds", &&*self.bounds)
            .finish()
    }
}

impl fmt::Display for DistributionAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("distribution(")?;
        for (i, bound) in self.bounds.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{bound}")?;
        }
        f.write_str(")")
    }
}

/// The half-open range `[start, end)` of values counted by one bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketRange {
    /// Inclusive lower edge, `-∞` for the first bucket
    pub start: f64,
    /// Exclusive upper edge, `+∞` for the last bucket
    pub end: f64,
}

impl BucketRange {
    /// Returns `true` if `value` falls in `[start, end)`.
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value < self.end
    }
}
