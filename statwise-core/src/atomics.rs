// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use core::sync::atomic::{AtomicU64, Ordering};

use crate::CloseValueRef;

/// A thin wrapper around `AtomicU64` that counts measurements through a shared reference.
///
/// This is the thread-safe counterpart of a count accumulator: it can be shared behind an
/// `Arc` and recorded into from many threads without a lock. Closing it yields the
/// current count.
#[derive(Default, Debug)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Create a new [`Counter`], initialized to a specific value
    pub const fn new(starting_count: u64) -> Self {
        Self(AtomicU64::new(starting_count))
    }

    /// Add 1 to this counter
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Increase the value of this counter by `i`
    pub fn add(&self, i: u64) {
        self.0.fetch_add(i, Ordering::Relaxed);
    }

    /// Read the current count
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Reset the counter to zero, returning the count it held
    pub fn take(&self) -> u64 {
        self.0.swap(0, Ordering::AcqRel)
    }
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl CloseValueRef for Counter {
    type Closed = u64;

    fn close_ref(&self) -> Self::Closed {
        self.get()
    }
}
