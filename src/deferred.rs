//! Values computed on first access, cached only once computed successfully.
//!
//! [`DeferredValue`] is meant for single-threaded use and the compiler enforces it: the type is
//! never [`Sync`]. When the value must be shared between threads, use
//! [`sync::DeferredValue`] instead, which guards the first initialization.
use std::cell::RefCell;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use once_cell::unsync::OnceCell;

mod init;

pub use self::init::{Fallible, Initializer};

/// Runs a single initialization attempt
fn attempt<V, I>(init: &mut I) -> Result<V, I::Error>
where
    I: Initializer<V>,
{
    trace!(value_type = std::any::type_name::<V>(), "initializing deferred value");
    let result = init.initialize();
    trace!(
        value_type = std::any::type_name::<V>(),
        success = result.is_ok(),
        "initialization attempt finished"
    );

    result
}

/// Implements the traits that only make sense when the value supports them.
///
/// Every bound sits on the impl, so a container over a value that is not comparable still
/// compiles and only comparing it fails.
macro_rules! impl_value_traits {
    ($container:ident) => {
        impl<V, I> Deref for $container<V, I>
        where
            I: Initializer<V, Error = Infallible>,
        {
            type Target = V;

            #[inline]
            fn deref(&self) -> &V {
                self.get()
            }
        }

        impl<V, I> DerefMut for $container<V, I>
        where
            I: Initializer<V, Error = Infallible>,
        {
            #[inline]
            fn deref_mut(&mut self) -> &mut V {
                self.get_mut()
            }
        }

        impl<V, I, J> PartialEq<$container<V, J>> for $container<V, I>
        where
            V: PartialEq,
            I: Initializer<V, Error = Infallible>,
            J: Initializer<V, Error = Infallible>,
        {
            fn eq(&self, other: &$container<V, J>) -> bool {
                self.get() == other.get()
            }
        }

        impl<V, I> Eq for $container<V, I>
        where
            V: Eq,
            I: Initializer<V, Error = Infallible>,
        {
        }

        impl<V, I, J> PartialOrd<$container<V, J>> for $container<V, I>
        where
            V: PartialOrd,
            I: Initializer<V, Error = Infallible>,
            J: Initializer<V, Error = Infallible>,
        {
            fn partial_cmp(&self, other: &$container<V, J>) -> Option<Ordering> {
                self.get().partial_cmp(other.get())
            }
        }

        impl<V, I> Ord for $container<V, I>
        where
            V: Ord,
            I: Initializer<V, Error = Infallible>,
        {
            fn cmp(&self, other: &Self) -> Ordering {
                self.get().cmp(other.get())
            }
        }

        impl<V, I> Hash for $container<V, I>
        where
            V: Hash,
            I: Initializer<V, Error = Infallible>,
        {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.get().hash(state);
            }
        }

        impl<V, I> fmt::Debug for $container<V, I>
        where
            V: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut tuple = f.debug_tuple(stringify!($container));
                match self.peek() {
                    Some(value) => tuple.field(value),
                    None => tuple.field(&format_args!("<uninit>")),
                };
                tuple.finish()
            }
        }

        impl<V> Default for $container<V, fn() -> V>
        where
            V: Default,
        {
            fn default() -> Self {
                Self::new(V::default)
            }
        }

        impl<V, I> From<I> for $container<V, I>
        where
            I: Initializer<V>,
        {
            fn from(init: I) -> Self {
                Self::new(init)
            }
        }
    };
}

#[cfg(feature = "sync")]
pub mod sync;

/// A value produced by an [`Initializer`] the first time it is accessed
///
/// The initializer runs when the value is first needed. A successful result is stored and every
/// later access returns it. A failed attempt stores nothing: the error goes back to the caller
/// and the next access tries again.
///
/// A shared borrow of the container gives a shared borrow of the value and an exclusive borrow
/// gives an exclusive one.
///
/// # Example
///
/// ```
/// use deferred_const::DeferredValue;
///
/// let mut greeting: DeferredValue<String, _> = DeferredValue::new(|| "hello".to_owned());
/// assert!(!greeting.is_initialized());
///
/// greeting.push_str(", world");
/// assert_eq!(greeting.as_str(), "hello, world");
/// ```
///
/// Comparing two containers requires the value to be comparable, and only where the comparison
/// is written:
///
/// ```compile_fail
/// use deferred_const::DeferredValue;
///
/// struct Opaque;
///
/// let a: DeferredValue<Opaque, _> = DeferredValue::new(|| Opaque);
/// let b: DeferredValue<Opaque, _> = DeferredValue::new(|| Opaque);
/// let _ = a == b;
/// ```
///
/// The container cannot be shared between threads:
///
/// ```compile_fail
/// use deferred_const::DeferredValue;
///
/// fn assert_sync<T: Sync>(_: &T) {}
///
/// let value: DeferredValue<u32, fn() -> u32> = DeferredValue::new(|| 1);
/// assert_sync(&value);
/// ```
pub struct DeferredValue<V, I = Box<dyn FnMut() -> V>> {
    slot: OnceCell<V>,
    init: RefCell<I>,
}

impl<V, I> DeferredValue<V, I>
where
    I: Initializer<V>,
{
    /// Stores the initializer without calling it
    pub fn new(init: I) -> Self {
        Self {
            slot: OnceCell::new(),
            init: RefCell::new(init),
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
    /// # Errors
    ///
    /// Returns the error of the initializer, unchanged. Nothing is cached in that case and the
    /// next call runs the initializer again.
    ///
    /// # Panics
    ///
    /// Panics if the initializer accesses the container it belongs to. A panic raised by the
    /// initializer itself propagates and, like an error, leaves the container empty.
    pub fn try_get(&self) -> Result<&V, I::Error> {
        self.slot.get_or_try_init(|| attempt(&mut *self.init.borrow_mut()))
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
    ///
    /// # Example
    ///
    /// ```
    /// use deferred_const::DeferredValue;
    ///
    /// let mut attempts = 0;
    /// let value = DeferredValue::fallible(|| {
    ///     attempts += 1;
    ///     if attempts == 1 {
    ///         Err("not yet")
    ///     } else {
    ///         Ok(5)
    ///     }
    /// });
    ///
    /// assert_eq!(value.try_get(), Err("not yet"));
    /// assert_eq!(value.try_get(), Ok(&5));
    /// ```
    pub fn fallible(init: F) -> Self {
        Self::new(Fallible(init))
    }
}

impl<V> DeferredValue<V> {
    /// Builds a container over a type-erased initializer
    ///
    /// All the containers built this way for a given `V` share the same type.
    pub fn boxed(init: impl FnMut() -> V + 'static) -> Self {
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
