//! Builders and checks for histogram bucket boundaries.
//!
//! Bucket boundaries are usually written out by hand, but regular layouts are easier to
//! generate:
//!
//! ```
//! use statwise_aggregation::{bounds, DistributionAggregation};
//!
//! // 0, 25, 50, 75
//! let linear = bounds::linear(0.0, 25.0, 4).unwrap();
//! // 1, 10, 100, 1000
//! let exponential = bounds::exponential(1.0, 10.0, 4).unwrap();
//!
//! let latency = DistributionAggregation::new(exponential);
//! assert_eq!(latency.num_buckets(), 5);
//! # assert_eq!(linear, vec![0.0, 25.0, 50.0, 75.0]);
//! ```
//!
//! Every builder produces finite, strictly increasing boundaries, so their output always
//! passes [`validate`].

use statwise_core::{ValidationError, ValidationErrorBuilder};

fn check_argument(
    errors: &mut ValidationErrorBuilder,
    name: &str,
    value: f64,
    ok: bool,
    requirement: &str,
) {
    if !ok {
        errors.extend_mut(
            ValidationError::invalid(format!("must be {requirement}, got {value}")).for_field(name),
        );
    }
}

/// `count` boundaries starting at `start`, `width` apart.
///
/// Fails if `start` or `width` is not finite, or if `width` is not positive.
pub fn linear(start: f64, width: f64, count: usize) -> Result<Vec<f64>, ValidationError> {
    let mut errors = ValidationError::builder();
    check_argument(&mut errors, "start", start, start.is_finite(), "finite");
    check_argument(
        &mut errors,
        "width",
        width,
        width.is_finite() && width > 0.0,
        "finite and positive",
    );
    errors.build()?;

    let bounds: Vec<f64> = (0..count).map(|i| start + width * i as f64).collect();
    validate(&bounds).map_err(|err| err.for_field("bounds"))?;
    Ok(bounds)
}

/// `count` boundaries starting at `start`, each `factor` times the previous one.
///
/// Fails if `start` is not finite and positive, or if `factor` is not finite and greater
/// than 1. Also fails if the last boundary would overflow to infinity.
pub fn exponential(start: f64, factor: f64, count: usize) -> Result<Vec<f64>, ValidationError> {
    let mut errors = ValidationError::builder();
    check_argument(
        &mut errors,
        "start",
        start,
        start.is_finite() && start > 0.0,
        "finite and positive",
    );
    check_argument(
        &mut errors,
        "factor",
        factor,
        factor.is_finite() && factor > 1.0,
        "finite and greater than 1",
    );
    errors.build()?;

    let bounds: Vec<f64> = std::iter::successors(Some(start), |prev| Some(prev * factor))
        .take(count)
        .collect();
    validate(&bounds).map_err(|err| err.for_field("bounds"))?;
    Ok(bounds)
}

/// The lower edge of every bucket of a [`histogram::Histogram`] built from `config`, except
/// the first one (which starts at 0).
///
/// A distribution over these boundaries counts integer samples in exactly the same buckets
/// as the `histogram` crate's exponential layout, which keeps relative error bounded by the
/// config's grouping power across the whole value range.
///
/// ```
/// use statwise_aggregation::bounds;
///
/// let config = histogram::Config::new(2, 10).unwrap();
/// let edges = bounds::from_histogram_config(&config);
/// assert_eq!(edges.len(), config.total_buckets() - 1);
/// assert!(bounds::validate(&edges).is_ok());
/// ```
pub fn from_histogram_config(config: &histogram::Config) -> Vec<f64> {
    histogram::Histogram::with_config(config)
        .iter()
        .skip(1)
        .map(|bucket| *bucket.range().start() as f64)
        .collect()
}

/// Check that every boundary is finite and greater than the previous finite boundary.
///
/// All failures are collected into a single [`ValidationError`], one reason per offending
/// boundary.
pub fn validate(bounds: &[f64]) -> Result<(), ValidationError> {
    let mut errors = ValidationError::builder();
    let mut previous: Option<(usize, f64)> = None;
    for (i, &bound) in bounds.iter().enumerate() {
        if !bound.is_finite() {
            errors.invalid_mut(format!("bound {i} is not finite ({bound})"));
            continue;
        }
        if let Some((j, prev)) = previous {
            if bound <= prev {
                errors.invalid_mut(format!(
                    "bound {i} ({bound}) is not greater than bound {j} ({prev})"
                ));
            }
        }
        previous = Some((i, bound));
    }
    errors.build()
}

/// Repair boundaries: drop non-finite values, sort the rest and remove duplicates.
pub fn normalize(bounds: &[f64]) -> Vec<f64> {
    let mut normalized: Vec<f64> = bounds.iter().copied().filter(|b| b.is_finite()).collect();
    normalized.sort_by(f64::total_cmp);
    normalized.dedup();
    if normalized.as_slice() != bounds {
        tracing::debug!(
            supplied = bounds.len(),
            kept = normalized.len(),
            "normalized distribution bounds"
        );
    }
    normalized
}
