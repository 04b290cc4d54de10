//! Handles whose pointee is only as mutable as the handle itself.
use std::ops::{Deref, DerefMut};

mod handle;

pub use self::handle::Handle;

/// Type of the pointee of a [`Handle`]
pub type ElementOf<H> = <H as Handle>::Element;

/// Wrapper around a [`Handle`] that propagates the borrow of the wrapper to the pointee
///
/// Through `&PropagateConst<H>` the pointee can only be read, through `&mut PropagateConst<H>`
/// it can be modified. This holds even for handles that allow mutation through a shared borrow,
/// like `Rc<RefCell<T>>`.
///
/// The wrapper is never [`Clone`], even when `H` is: two copies would give independent mutable
/// views of the same pointee. Handles that are [`DerefMut`], such as `Box<T>` and `&mut T`, can
/// be used directly through `*` and method calls.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use deferred_const::PropagateConst;
///
/// let shared = Rc::new(RefCell::new(vec![1, 2]));
/// let mut numbers = PropagateConst::new(Rc::clone(&shared));
///
/// numbers.get_mut().push(3);
/// assert_eq!(numbers.get().len(), 3);
/// assert_eq!(*shared.borrow(), [1, 2, 3]);
/// ```
///
/// A shared borrow of the wrapper does not give mutable access:
///
/// ```compile_fail
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use deferred_const::PropagateConst;
///
/// let numbers = PropagateConst::new(Rc::new(RefCell::new(vec![1, 2])));
/// let shared = &numbers;
/// shared.get_mut().push(3);
/// ```
///
/// Nor can the wrapper be copied:
///
/// ```compile_fail
/// use std::rc::Rc;
/// use std::cell::RefCell;
///
/// use deferred_const::PropagateConst;
///
/// let numbers = PropagateConst::new(Rc::new(RefCell::new(0)));
/// let copy = numbers.clone();
/// ```
#[derive(Debug, Default)]
pub struct PropagateConst<H> {
    handle: H,
}

impl<H> PropagateConst<H> {
    pub const fn new(handle: H) -> Self {
        Self { handle }
    }

    /// Builds the wrapper from any value that converts into the handle
    ///
    /// ```
    /// use deferred_const::PropagateConst;
    ///
    /// let name = PropagateConst::<Box<str>>::from_convertible("ferris");
    /// assert_eq!(&*name, "ferris");
    /// ```
    pub fn from_convertible<U>(value: U) -> Self
    where
        U: Into<H>,
    {
        Self::new(value.into())
    }

    /// Replaces the handle, returning the previous one
    pub fn replace(&mut self, handle: impl Into<H>) -> H {
        std::mem::replace(&mut self.handle, handle.into())
    }

    pub fn into_inner(self) -> H {
        self.handle
    }
}

impl<H> PropagateConst<H>
where
    H: Handle,
{
    /// Returns a read-only view of the pointee
    #[inline]
    pub fn get(&self) -> H::Ref<'_> {
        self.handle.view()
    }

    /// Returns a mutable view of the pointee
    #[inline]
    pub fn get_mut(&mut self) -> H::Mut<'_> {
        self.handle.view_mut()
    }
}

impl<H> From<H> for PropagateConst<H> {
    fn from(handle: H) -> Self {
        Self::new(handle)
    }
}

impl<H> Deref for PropagateConst<H>
where
    H: DerefMut,
{
    type Target = H::Target;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<H> DerefMut for PropagateConst<H>
where
    H: DerefMut,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.handle
    }
}

#[cfg(test)]
mod tests {
    use std::any::type_name;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    #[cfg(feature = "sync")]
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct CallTester {
        non_const_call: bool,
        const_call: Cell<bool>,
    }

    impl CallTester {
        fn calls(&self) -> (bool, bool) {
            (self.non_const_call, self.const_call.get())
        }
    }

    /// Same call, dispatched on the mutability of the receiver
    trait Call {
        fn call(self);
    }

    impl Call for &CallTester {
        fn call(self) {
            self.const_call.set(true);
        }
    }

    impl Call for &mut CallTester {
        fn call(self) {
            self.non_const_call = true;
        }
    }

    #[test]
    fn propagates_non_const_borrowed_pointer() {
        let mut ct = CallTester::default();
        let mut pc = PropagateConst::new(&mut ct);
        Call::call(&mut *pc);
        Call::call(&mut *pc.get_mut());
        assert_eq!(ct.calls(), (true, false));
    }

    #[test]
    fn propagates_const_borrowed_pointer() {
        let mut ct = CallTester::default();
        let pc = PropagateConst::new(&mut ct);
        Call::call(&*pc);
        Call::call(pc.get());
        assert_eq!(ct.calls(), (false, true));
    }

    #[test]
    fn propagates_non_const_unique_pointer() {
        let mut pc = PropagateConst::new(Box::<CallTester>::default());
        Call::call(&mut *pc);
        assert_eq!(pc.into_inner().calls(), (true, false));
    }

    #[test]
    fn propagates_const_unique_pointer() {
        let pc = PropagateConst::new(Box::<CallTester>::default());
        let shared = &pc;
        Call::call(&**shared);
        assert_eq!(pc.get().calls(), (false, true));
    }

    #[test]
    fn propagates_non_const_shared_pointer() {
        let underlying = Rc::new(RefCell::new(CallTester::default()));
        let mut pc = PropagateConst::new(Rc::clone(&underlying));
        Call::call(&mut *pc.get_mut());
        assert_eq!(underlying.borrow().calls(), (true, false));
    }

    #[test]
    fn propagates_const_shared_pointer() {
        let underlying = Rc::new(RefCell::new(CallTester::default()));
        let pc = PropagateConst::new(Rc::clone(&underlying));
        Call::call(&*pc.get());
        assert_eq!(underlying.borrow().calls(), (false, true));
    }

    #[cfg(feature = "sync")]
    #[test]
    fn propagates_thread_safe_shared_pointer() {
        let underlying = Arc::new(parking_lot::RwLock::new(CallTester::default()));
        let mut pc = PropagateConst::new(Arc::clone(&underlying));

        Call::call(&*pc.get());
        assert_eq!(underlying.read().calls(), (false, true));

        Call::call(&mut *pc.get_mut());
        assert_eq!(underlying.read().calls(), (true, true));
    }

    #[test]
    fn element_type() {
        assert_eq!(type_name::<ElementOf<Box<u8>>>(), "u8");
        assert_eq!(type_name::<ElementOf<&mut str>>(), "str");
        assert_eq!(
            type_name::<ElementOf<Rc<RefCell<String>>>>(),
            type_name::<String>()
        );
    }

    #[test]
    fn replace_handle() {
        let mut pc = PropagateConst::new(Box::new(1));
        let previous = pc.replace(Box::new(2));
        assert_eq!(*previous, 1);
        assert_eq!(*pc, 2);

        *pc += 1;
        assert_eq!(*pc.get(), 3);
    }

    #[test]
    fn from_handle() {
        let pc: PropagateConst<Box<str>> = Box::<str>::from("ferris").into();
        assert_eq!(pc.len(), 6);
    }

    #[test]
    fn default_handle() {
        let pc = PropagateConst::<Box<i32>>::default();
        assert_eq!(*pc, 0);
    }

    #[test]
    fn releases_shared_handle_on_drop() {
        let underlying = Rc::new(RefCell::new(0));
        let pc = PropagateConst::new(Rc::clone(&underlying));
        assert_eq!(Rc::strong_count(&underlying), 2);

        drop(pc);
        assert_eq!(Rc::strong_count(&underlying), 1);
    }
}
