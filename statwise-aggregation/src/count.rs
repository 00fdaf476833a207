//! Count aggregation strategy.
//!
//! Counting ignores the measured value and tracks how many measurements were recorded,
//! making it the right choice for request counts and error counts.

use std::fmt;

use crate::value::CountData;

/// Aggregation that summarizes measurements by counting them.
///
/// Carries no configuration: every `CountAggregation` is interchangeable with every other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CountAggregation;

impl CountAggregation {
    /// Create a count aggregation.
    pub const fn new() -> Self {
        Self
    }

    /// Create a fresh count accumulator, starting at zero.
    pub fn new_value(&self) -> CountData {
        CountData::new(0)
    }
}

impl fmt::Display for CountAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("count")
    }
}
