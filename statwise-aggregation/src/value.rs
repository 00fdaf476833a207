//! Accumulators produced by the aggregation kinds
//!
//! Each aggregation hands out zero-valued accumulators through its `new_value` method. The
//! pipeline keeps one accumulator per time series and feeds it every recorded measurement
//! through [`AggregationValue::add_sample`]. Closing an accumulator
//! ([`CloseValueRef::close_ref`]) yields a plain-data snapshot for whoever consumes it.

use std::sync::Arc;

use smallvec::SmallVec;
use statwise_core::{AggregationValue, CloseValueRef, MergeError};

use crate::aggregation::AggregationKind;
use crate::distribution::{bucket_index, first_difference};

/// Count accumulator: the number of recorded measurements, whatever their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountData {
    count: u64,
}

impl CountData {
    /// Create a count accumulator starting at `count`.
    pub const fn new(count: u64) -> Self {
        Self { count }
    }

    /// Number of measurements recorded.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl AggregationValue for CountData {
    fn add_sample(&mut self, _value: f64) {
        self.count += 1;
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        self.count += other.count;
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl CloseValueRef for CountData {
    type Closed = u64;

    fn close_ref(&self) -> Self::Closed {
        self.count
    }
}

/// Distribution accumulator: histogram bucket counts plus count, sum, min, max, mean and
/// sum of squared deviations.
///
/// Mean and squared deviations are maintained incrementally (Welford), so the variance stays
/// accurate for long streams of large, close values.
///
/// Until the first sample is recorded, `min` is `+∞` and `max` is `-∞`. `NaN` samples are
/// ignored. Infinite samples are counted, summed, bucketed and may become `min`/`max`, but
/// they are left out of the mean and squared deviations, which describe the finite samples
/// only.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionData {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    // samples behind `mean` and `sum_of_squared_deviation`
    finite_count: u64,
    mean: f64,
    sum_of_squared_deviation: f64,
    counts_per_bucket: SmallVec<[u64; 16]>,
    bounds: Arc<[f64]>,
}

impl DistributionData {
    pub(crate) fn new(bounds: Arc<[f64]>) -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            finite_count: 0,
            mean: 0.0,
            sum_of_squared_deviation: 0.0,
            counts_per_bucket: SmallVec::from_elem(0, bounds.len() + 1),
            bounds,
        }
    }

    /// Number of measurements recorded.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all recorded measurements.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Smallest recorded measurement, `+∞` if none was recorded.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest recorded measurement, `-∞` if none was recorded.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Mean of the finite recorded measurements, 0 if there are none.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviations of the finite measurements from the mean.
    pub fn sum_of_squared_deviation(&self) -> f64 {
        self.sum_of_squared_deviation
    }

    /// Sample variance of the finite measurements, 0 with fewer than two of them.
    pub fn variance(&self) -> f64 {
        if self.finite_count < 2 {
            0.0
        } else {
            self.sum_of_squared_deviation / (self.finite_count - 1) as f64
        }
    }

    /// Number of measurements counted in each bucket. Always `bounds().len() + 1` entries.
    pub fn counts_per_bucket(&self) -> &[u64] {
        &self.counts_per_bucket
    }

    /// The bucket boundaries this accumulator was created with.
    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }
}

impl AggregationValue for DistributionData {
    fn add_sample(&mut self, value: f64) {
        if value.is_nan() {
            tracing::trace!("ignoring NaN sample in distribution");
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        self.count += 1;
        self.sum += value;
        self.counts_per_bucket[bucket_index(&self.bounds, value)] += 1;

        if value.is_infinite() {
            return;
        }
        self.finite_count += 1;
        if self.finite_count == 1 {
            self.mean = value;
            return;
        }
        let old_mean = self.mean;
        self.mean += (value - old_mean) / self.finite_count as f64;
        self.sum_of_squared_deviation += (value - old_mean) * (value - self.mean);
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        if let Some(index) = first_difference(&self.bounds, &other.bounds) {
            return Err(MergeError::BoundsMismatch {
                index,
                expected: self.bounds.get(index).copied(),
                found: other.bounds.get(index).copied(),
            });
        }
        if other.count == 0 {
            return Ok(());
        }
        if self.count == 0 {
            let bounds = self.bounds.clone();
            *self = other.clone();
            self.bounds = bounds;
            return Ok(());
        }

        if self.finite_count == 0 {
            self.mean = other.mean;
            self.sum_of_squared_deviation = other.sum_of_squared_deviation;
        } else if other.finite_count > 0 {
            // parallel variance (Chan et al.)
            let n_a = self.finite_count as f64;
            let n_b = other.finite_count as f64;
            let n = n_a + n_b;
            let delta = other.mean - self.mean;
            self.mean += delta * n_b / n;
            self.sum_of_squared_deviation +=
                other.sum_of_squared_deviation + delta * delta * n_a * n_b / n;
        }

        self.finite_count += other.finite_count;
        self.count += other.count;
        self.sum += other.sum;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        for (mine, theirs) in self
            .counts_per_bucket
            .iter_mut()
            .zip(other.counts_per_bucket.iter())
        {
            *mine += theirs;
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl CloseValueRef for DistributionData {
    type Closed = DistributionSnapshot;

    fn close_ref(&self) -> Self::Closed {
        DistributionSnapshot {
            count: self.count,
            sum: self.sum,
            min: self.min,
            max: self.max,
            mean: self.mean,
            sum_of_squared_deviation: self.sum_of_squared_deviation,
            bounds: self.bounds.to_vec(),
            counts_per_bucket: self.counts_per_bucket.to_vec(),
        }
    }
}

/// Plain-data copy of a [`DistributionData`] at the time it was closed.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSnapshot {
    /// Number of measurements
    pub count: u64,
    /// Sum of measurements
    pub sum: f64,
    /// Smallest measurement, `+∞` if there were none
    pub min: f64,
    /// Largest measurement, `-∞` if there were none
    pub max: f64,
    /// Mean of the finite measurements
    pub mean: f64,
    /// Sum of squared deviations of the finite measurements from the mean
    pub sum_of_squared_deviation: f64,
    /// Bucket boundaries
    pub bounds: Vec<f64>,
    /// Measurements per bucket, `bounds.len() + 1` entries
    pub counts_per_bucket: Vec<u64>,
}

/// Accumulator for any [`Aggregation`](crate::Aggregation), as returned by
/// [`Aggregation::new_value`](crate::Aggregation::new_value).
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationData {
    /// Accumulator of a count aggregation
    Count(CountData),
    /// Accumulator of a distribution aggregation
    Distribution(DistributionData),
}

impl AggregationData {
    /// The aggregation kind this accumulator belongs to.
    pub fn kind(&self) -> AggregationKind {
        match self {
            AggregationData::Count(_) => AggregationKind::Count,
            AggregationData::Distribution(_) => AggregationKind::Distribution,
        }
    }

    /// The count accumulator, if this is one.
    pub fn as_count(&self) -> Option<&CountData> {
        match self {
            AggregationData::Count(count) => Some(count),
            AggregationData::Distribution(_) => None,
        }
    }

    /// The distribution accumulator, if this is one.
    pub fn as_distribution(&self) -> Option<&DistributionData> {
        match self {
            AggregationData::Distribution(distribution) => Some(distribution),
            AggregationData::Count(_) => None,
        }
    }
}

impl From<CountData> for AggregationData {
    fn from(value: CountData) -> Self {
        AggregationData::Count(value)
    }
}

impl From<DistributionData> for AggregationData {
    fn from(value: DistributionData) -> Self {
        AggregationData::Distribution(value)
    }
}

impl AggregationValue for AggregationData {
    fn add_sample(&mut self, value: f64) {
        match self {
            AggregationData::Count(count) => count.add_sample(value),
            AggregationData::Distribution(distribution) => distribution.add_sample(value),
        }
    }

    fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
        match (self, other) {
            (AggregationData::Count(a), AggregationData::Count(b)) => a.merge(b),
            (AggregationData::Distribution(a), AggregationData::Distribution(b)) => a.merge(b),
            (a, b) => Err(MergeError::KindMismatch {
                expected: a.kind().as_str(),
                found: b.kind().as_str(),
            }),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            AggregationData::Count(count) => count.is_empty(),
            AggregationData::Distribution(distribution) => distribution.is_empty(),
        }
    }
}

/// Closed form of an [`AggregationData`].
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationSnapshot {
    /// Number of measurements
    Count(u64),
    /// Distribution of measurements
    Distribution(DistributionSnapshot),
}

impl CloseValueRef for AggregationData {
    type Closed = AggregationSnapshot;

    fn close_ref(&self) -> Self::Closed {
        match self {
            AggregationData::Count(count) => AggregationSnapshot::Count(count.close_ref()),
            AggregationData::Distribution(distribution) => {
                AggregationSnapshot::Distribution(distribution.close_ref())
            }
        }
    }
}
