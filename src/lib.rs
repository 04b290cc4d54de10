//! Two small value wrappers:
//!
//! - [`DeferredValue`] computes its value on first access and caches it, but only once an
//!   attempt succeeds. A failed attempt leaves nothing behind and the next access retries.
//! - [`PropagateConst`] holds a pointer-like handle and only lets its pointee be modified through
//!   an exclusive borrow of the wrapper, whatever the handle itself allows.
//!
//! The two are independent of each other.
//!
//! # Features
//!
//! - `sync` (default): [`deferred::sync::DeferredValue`], a container that can be shared between
//!   threads, and the [`propagate::Handle`] implementation for `Arc<parking_lot::RwLock<T>>`.
//! - `tracing`: emits `TRACE` events when a deferred value runs its initializer.

/// Emits a `TRACE` event when the `tracing` feature is enabled
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

pub mod deferred;
pub mod propagate;

pub use deferred::DeferredValue;
pub use propagate::PropagateConst;
