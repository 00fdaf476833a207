// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Why a set of bucket boundaries, or the arguments used to generate one, was rejected.
///
/// One error lists every failure found, e.g. two out-of-order boundaries and a `NaN`, so a
/// caller can fix their input in one go. Only the validating constructors produce it.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidationError(Vec<String>);

impl ValidationError {
    /// Start collecting failures. See [`ValidationErrorBuilder::build`].
    pub fn builder() -> ValidationErrorBuilder {
        ValidationErrorBuilder::default()
    }

    /// A single failure.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self(vec![reason.into()])
    }

    /// Prefix every failure with the argument or field it is about.
    pub fn for_field(mut self, name: &str) -> Self {
        for reason in &mut self.0 {
            *reason = format!("for `{name}`: {reason}");
        }
        self
    }

    /// The individual failures, in the order they were found.
    pub fn reasons(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Debug for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Collects failures while checking a whole input.
#[derive(Debug, Default)]
pub struct ValidationErrorBuilder(Vec<String>);

impl ValidationErrorBuilder {
    /// `Ok` if nothing was recorded, otherwise every recorded failure.
    pub fn build(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self.0))
        }
    }

    /// Record one failure.
    pub fn invalid_mut(&mut self, reason: impl Into<String>) -> &mut Self {
        self.0.push(reason.into());
        self
    }

    /// Record every failure of an error produced by a nested check.
    pub fn extend_mut(&mut self, error: ValidationError) -> &mut Self {
        self.0.extend(error.0);
        self
    }
}
