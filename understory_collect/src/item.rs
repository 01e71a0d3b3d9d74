// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity-compared items.

use alloc::rc::Rc;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Deref;

/// A shared item compared by address rather than by value.
///
/// Collections deduplicate with `Eq`. When two descendants contribute values
/// that happen to be equal but are distinct contributions (two reducers with
/// the same body, say), wrap them in `ItemRef` so that only clones of the same
/// `Rc` count as the same item.
///
/// # Example
///
/// ```
/// use understory_collect::ItemRef;
///
/// let a = ItemRef::new("reducer");
/// let b = ItemRef::new("reducer");
///
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// assert_eq!(*a, *b);
/// ```
pub struct ItemRef<U: ?Sized>(Rc<U>);

impl<U> ItemRef<U> {
    /// Allocates a new item.
    #[must_use]
    pub fn new(value: U) -> Self {
        Self(Rc::new(value))
    }
}

impl<U: ?Sized> ItemRef<U> {
    /// Returns the underlying `Rc`.
    #[must_use]
    pub fn as_rc(&self) -> &Rc<U> {
        &self.0
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

impl<U: ?Sized> From<Rc<U>> for ItemRef<U> {
    fn from(rc: Rc<U>) -> Self {
        Self(rc)
    }
}

impl<U: ?Sized> Clone for ItemRef<U> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<U: ?Sized> PartialEq for ItemRef<U> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<U: ?Sized> Eq for ItemRef<U> {}

impl<U: ?Sized> Hash for ItemRef<U> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<U: ?Sized> Deref for ItemRef<U> {
    type Target = U;

    fn deref(&self) -> &U {
        &self.0
    }
}

impl<U: ?Sized + fmt::Debug> fmt::Debug for ItemRef<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ItemRef").field(&&*self.0).finish()
    }
}
