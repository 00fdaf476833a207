//! The closed set of aggregation kinds
//!
//! An [`Aggregation`] describes *how* a stream of measurements is summarized. It is chosen
//! once, when a view is defined, and is immutable afterwards. The metrics pipeline asks it
//! for a fresh accumulator ([`Aggregation::new_value`]) every time a new time series shows
//! up, and feeds that accumulator the measurements of the series.
//!
//! There are exactly two kinds, [`CountAggregation`] and [`DistributionAggregation`]. The set
//! is closed: [`Aggregation`] is an enum, and the [`AggregationStrategy`] trait that the kinds
//! share is sealed, so no other type can stand in for an aggregation.
//!
//! ```
//! use statwise_aggregation::{Aggregation, AggregationKind};
//! use statwise_core::AggregationValue;
//!
//! let latency = Aggregation::distribution([10.0, 50.0, 100.0]);
//! assert_eq!(latency.kind(), AggregationKind::Distribution);
//!
//! let mut series = latency.new_value();
//! series.add_sample(42.0);
//! assert_eq!(series.as_distribution().unwrap().counts_per_bucket(), &[0, 1, 0, 0]);
//! ```

use std::fmt;

use statwise_core::AggregationValue;

use crate::count::CountAggregation;
use crate::distribution::DistributionAggregation;
use crate::value::{AggregationData, CountData, DistributionData};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::CountAggregation {}
    impl Sealed for super::DistributionAggregation {}
    impl Sealed for super::Aggregation {}
}

/// Behavior shared by every aggregation kind.
///
/// This trait is sealed. It exists so that code generic over the aggregation kind can get a
/// concretely typed accumulator (`CountData` for a [`CountAggregation`]) instead of going
/// through [`AggregationData`].
pub trait AggregationStrategy: sealed::Sealed + Clone + Send + Sync + 'static {
    /// The accumulator this kind produces
    type Value: AggregationValue;

    /// The kind tag of this aggregation
    fn kind(&self) -> AggregationKind;

    /// Create a fresh, zero-valued accumulator.
    ///
    /// Every call returns an accumulator independent from all previous ones.
    fn new_value(&self) -> Self::Value;
}

impl AggregationStrategy for CountAggregation {
    type Value = CountData;

    fn kind(&self) -> AggregationKind {
        AggregationKind::Count
    }

    fn new_value(&self) -> CountData {
        CountAggregation::new_value(self)
    }
}

impl AggregationStrategy for DistributionAggregation {
    type Value = DistributionData;

    fn kind(&self) -> AggregationKind {
        AggregationKind::Distribution
    }

    fn new_value(&self) -> DistributionData {
        DistributionAggregation::new_value(self)
    }
}

impl AggregationStrategy for Aggregation {
    type Value = AggregationData;

    fn kind(&self) -> AggregationKind {
        Aggregation::kind(self)
    }

    fn new_value(&self) -> AggregationData {
        Aggregation::new_value(self)
    }
}

/// The tag identifying an aggregation kind, without its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    /// See [`CountAggregation`]
    Count,
    /// See [`DistributionAggregation`]
    Distribution,
}

impl AggregationKind {
    /// Lowercase name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            AggregationKind::Count => "count",
            AggregationKind::Distribution => "distribution",
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How measurements are summarized.
///
/// Immutable once constructed and cheap to clone; a single aggregation can be shared by any
/// number of views and threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Count the measurements
    Count(CountAggregation),
    /// Histogram of the measurements
    Distribution(DistributionAggregation),
}

impl Aggregation {
    /// Shorthand for a [`CountAggregation`].
    pub const fn count() -> Self {
        Aggregation::Count(CountAggregation::new())
    }

    /// Shorthand for a [`DistributionAggregation`] over a copy of `bounds`.
    pub fn distribution(bounds: impl AsRef<[f64]>) -> Self {
        Aggregation::Distribution(DistributionAggregation::new(bounds))
    }

    /// The kind tag of this aggregation.
    pub fn kind(&self) -> AggregationKind {
        match self {
            Aggregation::Count(_) => AggregationKind::Count,
            Aggregation::Distribution(_) => AggregationKind::Distribution,
        }
    }

    /// Returns `true` for a count aggregation.
    pub fn is_count(&self) -> bool {
        matches!(self, Aggregation::Count(_))
    }

    /// Returns `true` for a distribution aggregation.
    pub fn is_distribution(&self) -> bool {
        matches!(self, Aggregation::Distribution(_))
    }

    /// Create a fresh, zero-valued accumulator for this aggregation.
    pub fn new_value(&self) -> AggregationData {
        match self {
            Aggregation::Count(count) => AggregationData::Count(count.new_value()),
            Aggregation::Distribution(distribution) => {
                AggregationData::Distribution(distribution.new_value())
            }
        }
    }

    /// An owned factory producing fresh accumulators for this aggregation.
    ///
    /// Useful for pipelines that store the constructor rather than the aggregation. The
    /// factory keeps its own reference to the (immutable) bucket boundaries.
    pub fn value_constructor(&self) -> impl Fn() -> AggregationData + Send + Sync + 'static {
        let aggregation = self.clone();
        move || aggregation.new_value()
    }
}

impl Default for Aggregation {
    fn default() -> Self {
        Aggregation::count()
    }
}

impl From<CountAggregation> for Aggregation {
    fn from(value: CountAggregation) -> Self {
        Aggregation::Count(value)
    }
}

impl From<DistributionAggregation> for Aggregation {
    fn from(value: DistributionAggregation) -> Self {
        Aggregation::Distribution(value)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Count(count) => fmt::Display::fmt(count, f),
            Aggregation::Distribution(distribution) => fmt::Display::fmt(distribution, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::check;
    use statwise_core::AggregationValue;

    use super::*;

    #[test]
    fn kinds() {
        check!(Aggregation::count().kind() == AggregationKind::Count);
        check!(Aggregation::count().is_count());
        check!(Aggregation::distribution([1.0]).is_distribution());
        check!(AggregationKind::Distribution.to_string() == "distribution");
    }

    #[test]
    fn display() {
        check!(Aggregation::count().to_string() == "count");
        check!(Aggregation::distribution([1.0, 2.5]).to_string() == "distribution(1, 2.5)");
    }

    #[test]
    fn from_variants() {
        check!(Aggregation::from(CountAggregation::new()) == Aggregation::count());
        check!(
            Aggregation::from(DistributionAggregation::new([1.0]))
                == Aggregation::distribution(vec![1.0])
        );
    }

    #[test]
    fn usable_as_view_key() {
        let mut views = HashMap::new();
        views.insert(Aggregation::count(), "requests");
        views.insert(Aggregation::distribution([1.0, 2.0]), "latency");
        views.insert(Aggregation::distribution([1.0, 2.0]), "latency_v2");
        check!(views.len() == 2);
        check!(views[&Aggregation::distribution([1.0, 2.0])] == "latency_v2");
    }

    #[test]
    fn value_constructor_is_independent() {
        let make = Aggregation::distribution([0.0]).value_constructor();
        let mut a = make();
        let b = make();
        a.add_sample(1.0);
        check!(!a.is_empty());
        check!(b.is_empty());
    }

    #[test]
    fn generic_over_strategy() {
        fn fresh<S: AggregationStrategy>(strategy: &S) -> S::Value {
            strategy.new_value()
        }
        let count: CountData = fresh(&CountAggregation::new());
        check!(count.count() == 0);
        let distribution: DistributionData = fresh(&DistributionAggregation::new([1.0, 2.0]));
        check!(distribution.counts_per_bucket().len() == 3);
    }
}
