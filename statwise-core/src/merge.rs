// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Why two accumulators could not be merged.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MergeError {
    /// The accumulators summarize different aggregation kinds (e.g. a count and a distribution).
    KindMismatch {
        /// Kind of the accumulator being merged into
        expected: &'static str,
        /// Kind of the accumulator being merged from
        found: &'static str,
    },
    /// Both accumulators are distributions, but their bucket boundaries differ.
    ///
    /// Describes the first boundary where they disagree. A side is `None` when its boundaries
    /// end before `index`.
    BoundsMismatch {
        /// Position of the first differing boundary
        index: usize,
        /// Boundary of the accumulator being merged into
        expected: Option<f64>,
        /// Boundary of the accumulator being merged from
        found: Option<f64>,
    },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::KindMismatch { expected, found } => {
                write!(f, "cannot merge a {found} accumulator into a {expected} accumulator")
            }
            MergeError::BoundsMismatch {
                index,
                expected,
                found,
            } => {
                write!(f, "cannot merge distributions with different bucket boundaries: ")?;
                match (expected, found) {
                    (Some(expected), Some(found)) => {
                        write!(f, "bound {index} is {found}, expected {expected}")
                    }
                    (Some(expected), None) => write!(f, "bound {index} ({expected}) is missing"),
                    (None, Some(found)) => write!(f, "unexpected bound {index} ({found})"),
                    (None, None) => write!(f, "bound {index} differs"),
                }
            }
        }
    }
}

impl std::error::Error for MergeError {}
