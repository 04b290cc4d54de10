use std::cell::{Ref, RefCell, RefMut};
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
#[cfg(feature = "sync")]
use std::sync::Arc;

#[cfg(feature = "sync")]
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Pointer-like value that leads to a pointee
///
/// A handle gives two views of its pointee: a read-only one through a shared borrow of the
/// handle and a mutable one through an exclusive borrow. For handles such as
/// `Rc<RefCell<T>>` the shared borrow would normally be enough to mutate the pointee; a
/// [`PropagateConst`](super::PropagateConst) only ever hands out the view matching its own
/// borrow.
pub trait Handle {
    /// Type of the pointee
    type Element: ?Sized;

    /// Read-only view of the pointee
    type Ref<'a>: Deref<Target = Self::Element>
    where
        Self: 'a;

    /// Mutable view of the pointee
    type Mut<'a>: DerefMut<Target = Self::Element>
    where
        Self: 'a;

    fn view(&self) -> Self::Ref<'_>;

    fn view_mut(&mut self) -> Self::Mut<'_>;
}

impl<T: ?Sized> Handle for &mut T {
    type Element = T;
    type Ref<'a> = &'a T where Self: 'a;
    type Mut<'a> = &'a mut T where Self: 'a;

    #[inline]
    fn view(&self) -> Self::Ref<'_> {
        &**self
    }

    #[inline]
    fn view_mut(&mut self) -> Self::Mut<'_> {
        &mut **self
    }
}

impl<T: ?Sized> Handle for Box<T> {
    type Element = T;
    type Ref<'a> = &'a T where Self: 'a;
    type Mut<'a> = &'a mut T where Self: 'a;

    #[inline]
    fn view(&self) -> Self::Ref<'_> {
        self
    }

    #[inline]
    fn view_mut(&mut self) -> Self::Mut<'_> {
        self
    }
}

/// # Panics
///
/// The views panic when another clone of the `Rc` currently holds a conflicting borrow, like
/// [`RefCell::borrow`] and [`RefCell::borrow_mut`].
impl<T: ?Sized> Handle for Rc<RefCell<T>> {
    type Element = T;
    type Ref<'a> = Ref<'a, T> where Self: 'a;
    type Mut<'a> = RefMut<'a, T> where Self: 'a;

    fn view(&self) -> Self::Ref<'_> {
        RefCell::borrow(self)
    }

    fn view_mut(&mut self) -> Self::Mut<'_> {
        RefCell::borrow_mut(self)
    }
}

/// The views block while another clone of the `Arc` holds a conflicting lock.
#[cfg(feature = "sync")]
impl<T: ?Sized> Handle for Arc<RwLock<T>> {
    type Element = T;
    type Ref<'a> = RwLockReadGuard<'a, T> where Self: 'a;
    type Mut<'a> = RwLockWriteGuard<'a, T> where Self: 'a;

    fn view(&self) -> Self::Ref<'_> {
        self.read()
    }

    fn view_mut(&mut self) -> Self::Mut<'_> {
        self.write()
    }
}
