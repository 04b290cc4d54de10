//! Thread-safe flavor of [`DeferredValue`](super::DeferredValue).
//!
//! Concurrent first accesses are serialized: a single caller runs the initializer while the
//! others wait for it. When that attempt fails, its caller gets the error and one of the waiting
//! callers makes the next attempt.
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use super::{attempt, Fallible, Initializer};

/// A value produced by an [`Initializer`] the first time it is accessed, shareable between
/// threads
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use deferred_const::deferred::sync::DeferredValue;
///
/// let calls = AtomicUsize::new(0);
/// let value: DeferredValue<u64, _> = DeferredValue::new(|| {
///     calls.fetch_add(1, Ordering::SeqCst);
///     42
/// });
///
/// std::thread::scope(|s| {
///     for _ in 0..4 {
///         s.spawn(|| assert_eq!(*value, 42));
///     }
/// });
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct DeferredValue<V, I = Box<dyn FnMut() -> V + Send>> {
    slot: OnceCell<V>,
    init: Mutex<I>,
}

impl<V, I> DeferredValue<V, I>
where
    I: Initializer<V>,
{
    /// Stores the initializer without calling it
    pub fn new(init: I) -> Self {
        Self {
            slot: OnceCell::new(),
            init: Mutex::new(init),
        }
    }

    /// Stores a clone of the initializer without calling it
    pub fn from_ref(init: &I) -> Self
    where
        I: Clone,
    {
        Self::new(init.clone())
    }

    /// Returns the value, running the initializer if no attempt has succeeded yet
    ///
    /// Blocks while another thread is running the initializer. An initializer that accesses the
    /// container it belongs to deadlocks.
    ///
    /// # Errors
    ///
    /// Returns the error of the initializer, unchanged. Nothing is cached in that case.
    pub fn try_get(&self) -> Result<&V, I::Error> {
        self.slot.get_or_try_init(|| attempt(&mut *self.init.lock()))
    }

    /// Same as [`try_get`](Self::try_get), but returns an exclusive borrow of the value
    pub fn try_get_mut(&mut self) -> Result<&mut V, I::Error> {
        if self.slot.get().is_none() {
            let value = attempt(self.init.get_mut())?;
            self.slot = OnceCell::from(value);
        }

        match self.slot.get_mut() {
            Some(value) => Ok(value),
            None => unreachable!("the slot is filled right above"),
        }
    }
}

impl<V, E, F> DeferredValue<V, Fallible<F>>
where
    F: FnMut() -> Result<V, E>,
{
    /// Builds a container whose initializer may fail
    pub fn fallible(init: F) -> Self {
        Self::new(Fallible(init))
    }
}

impl<V> DeferredValue<V> {
    /// Builds a container over a type-erased initializer
    pub fn boxed(init: impl FnMut() -> V + Send + 'static) -> Self {
        Self::new(Box::new(init))
    }
}

impl<V, I> DeferredValue<V, I>
where
    I: Initializer<V, Error = Infallible>,
{
    /// Returns the value, running the initializer on first access
    pub fn get(&self) -> &V {
        match self.try_get() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Returns the value mutably, running the initializer on first access
    pub fn get_mut(&mut self) -> &mut V {
        match self.try_get_mut() {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<V, I> DeferredValue<V, I> {
    /// Returns the value if it has already been initialized, without running the initializer
    pub fn peek(&self) -> Option<&V> {
        self.slot.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Consumes the container, returning the value if it has been initialized
    pub fn into_inner(self) -> Option<V> {
        self.slot.into_inner()
    }
}

impl_value_traits!(DeferredValue);
