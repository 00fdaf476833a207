// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]

//! This crate contains the traits shared by the `statwise` aggregation model. Generally you
//! should not depend on this crate directly. Instead, use `statwise-aggregation`.
//!
//! It defines the capabilities an accumulator must provide ([`AggregationValue`] and
//! [`CloseValue`]) without fixing any particular summary. The aggregation kinds and the
//! accumulators that implement these traits live in `statwise-aggregation`.

mod atomics;
mod close_value_impls;
mod merge;
mod validate;

pub use atomics::Counter;
pub use merge::MergeError;
pub use validate::{ValidationError, ValidationErrorBuilder};

/// Close a given value
///
/// Closing turns a live accumulator into plain data that can be handed to whatever
/// consumes the summary (an exporter, a test, a log line). Accumulators that must stay
/// usable after reading implement [`CloseValueRef`] instead and get this trait for free.
#[diagnostic::on_unimplemented(
    message = "CloseValue is not implemented for {Self}",
    note = "You may need to implement `CloseValue` or `CloseValueRef` for `{Self}`."
)]
pub trait CloseValue {
    /// The type produced by closing this value
    type Closed;

    /// Close the value
    fn close(self) -> Self::Closed;
}

/// Close a value without taking ownership
///
/// This trait is not meant to be *called directly*. It backs the blanket impl of
/// [`CloseValue`] for `T` and `&T`, as well as the impls for shared pointers such as
/// `Arc<T>`.
#[diagnostic::on_unimplemented(
    message = "CloseValueRef is not implemented for {Self}",
    note = "You may need to implement `CloseValueRef` for `{Self}`."
)]
pub trait CloseValueRef {
    /// The type produced by closing this value
    type Closed;
    /// Close the value
    fn close_ref(&self) -> Self::Closed;
}

#[diagnostic::do_not_recommend]
impl<T: CloseValueRef> CloseValue for T {
    type Closed = <Self as CloseValueRef>::Closed;

    /// Close the value
    fn close(self) -> Self::Closed {
        self.close_ref()
    }
}

/// A mutable accumulator fed one measurement at a time.
///
/// Every aggregation kind hands out fresh, zero-valued accumulators through its value
/// constructor. An accumulator belongs to exactly one time series; two accumulators
/// produced by the same aggregation never share mutable state.
///
/// Updates go through `&mut self`. Callers recording from several threads wrap the
/// accumulator in a lock, or use a type such as [`Counter`] that records through `&self`.
///
/// # Example
///
/// ```rust
/// use statwise_core::{AggregationValue, MergeError};
///
/// // Tracks the largest sample seen
/// #[derive(Clone)]
/// struct Peak(Option<f64>);
///
/// impl AggregationValue for Peak {
///     fn add_sample(&mut self, value: f64) {
///         self.0 = Some(self.0.map_or(value, |peak| peak.max(value)));
///     }
///
///     fn merge(&mut self, other: &Self) -> Result<(), MergeError> {
///         if let Some(v) = other.0 {
///             self.add_sample(v);
///         }
///         Ok(())
///     }
///
///     fn is_empty(&self) -> bool {
///         self.0.is_none()
///     }
/// }
///
/// let mut peak = Peak(None);
/// peak.add_sample(3.0);
/// peak.add_sample(1.0);
/// assert_eq!(peak.0, Some(3.0));
/// ```
pub trait AggregationValue: Clone + Send + Sync {
    /// Record a single measurement.
    fn add_sample(&mut self, value: f64);

    /// Record every measurement of `values`, in order.
    fn add_samples(&mut self, values: impl IntoIterator<Item = f64>) {
        for value in values {
            self.add_sample(value);
        }
    }

    /// Fold another accumulator of the same shape into this one.
    ///
    /// Fails without modifying `self` when the two accumulators cannot be combined.
    fn merge(&mut self, other: &Self) -> Result<(), MergeError>;

    /// Returns `true` if no measurement has been recorded yet.
    fn is_empty(&self) -> bool;
}
