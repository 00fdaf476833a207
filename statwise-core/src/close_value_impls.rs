// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Closing accumulators through the shared-ownership wrappers they are recorded through:
//! `Arc` for lock-free values such as `Counter`, `Arc<Mutex<_>>` for everything else.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{CloseValue, CloseValueRef};

#[diagnostic::do_not_recommend]
impl<T, C> CloseValue for Arc<T>
where
    T: CloseValueRef<Closed = C>,
{
    type Closed = C;

    fn close(self) -> Self::Closed {
        T::close_ref(&self)
    }
}

#[diagnostic::do_not_recommend]
impl<T, C> CloseValue for MutexGuard<'_, T>
where
    T: CloseValueRef<Closed = C>,
{
    type Closed = C;

    fn close(self) -> Self::Closed {
        T::close_ref(&self)
    }
}

/// A poisoned mutex closes to `None`: the accumulator behind it may be half-updated.
impl<T, C> CloseValueRef for Mutex<T>
where
    T: CloseValueRef<Closed = C>,
{
    type Closed = Option<C>;

    fn close_ref(&self) -> Self::Closed {
        Some(self.lock().ok()?.close())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{CloseValue, CloseValueRef};

    struct Closeable;
    impl CloseValueRef for Closeable {
        type Closed = usize;

        fn close_ref(&self) -> Self::Closed {
            42
        }
    }

    #[test]
    fn close_arc() {
        let x = Arc::new(Closeable);
        assert_eq!(x.clone().close(), 42);
        assert_eq!(x.close(), 42);
    }

    #[test]
    fn close_mutex_guard() {
        let x = Mutex::new(Closeable);
        assert_eq!(x.lock().unwrap().close(), 42);
    }

    #[test]
    fn close_arc_mutex() {
        let x = Arc::new(Mutex::new(Closeable));
        assert_eq!(x.close(), Some(42));
    }

    #[test]
    fn close_arc_mutex_poisoned() {
        let x = Arc::new(Mutex::new(Closeable));
        let x_cloned = x.clone();
        let _ = std::thread::spawn(move || {
            let _guard = x_cloned.lock();
            panic!();
        })
        .join();
        assert_eq!(x.close(), None);
    }
}
