use std::convert::Infallible;

/// Type that can be asked, possibly several times, to produce a value
///
/// A [`DeferredValue`](super::DeferredValue) calls [`initialize`](Initializer::initialize)
/// until one attempt succeeds. An attempt that returns an error leaves the initializer in place
/// for the next access.
///
/// Every `FnMut() -> V` closure is an infallible initializer. Closures returning a [`Result`]
/// are wrapped in [`Fallible`] so their error is reported instead of being stored as the value.
///
/// ```compile_fail
/// use deferred_const::DeferredValue;
///
/// let not_callable: DeferredValue<u32, u32> = DeferredValue::new(5);
/// ```
pub trait Initializer<V> {
    /// Error returned by a failed attempt
    type Error;

    /// Attempts to produce the value
    fn initialize(&mut self) -> Result<V, Self::Error>;
}

impl<V, F> Initializer<V> for F
where
    F: FnMut() -> V,
{
    type Error = Infallible;

    #[inline]
    fn initialize(&mut self) -> Result<V, Infallible> {
        Ok(self())
    }
}

/// Turns a closure returning a [`Result`] into an [`Initializer`] that can fail
///
/// # Example
///
/// ```
/// use deferred_const::deferred::{DeferredValue, Fallible};
///
/// let port: DeferredValue<u16, _> = DeferredValue::new(Fallible(|| "8080".parse::<u16>()));
/// assert_eq!(port.try_get(), Ok(&8080));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallible<F>(pub F);

impl<V, E, F> Initializer<V> for Fallible<F>
where
    F: FnMut() -> Result<V, E>,
{
    type Error = E;

    #[inline]
    fn initialize(&mut self) -> Result<V, E> {
        (self.0)()
    }
}
