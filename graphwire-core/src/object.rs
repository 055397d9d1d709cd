// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Live handles for composite instances.
//!
//! [`Obj<T>`] is the identity-bearing handle every composite value lives behind:
//! two handles are "the same object" exactly when they share an allocation, and
//! that address is what the serializer keys its identity registry on.
//!
//! [`Link<T>`] is a field slot pointing at an `Obj<T>`. It starts unset when
//! its target is a forward reference and is filled exactly once by the patch
//! pass. Clones of a link share the same cell, so the patch reaches every copy.
//!
//! ## Example: self-referencing node
//!
//! ```rust
//! use graphwire_core::object::{Link, Obj};
//!
//! struct Node {
//!     label: String,
//!     next: Link<Node>,
//! }
//!
//! let node = Obj::new(Node { label: "a".into(), next: Link::unset() });
//! node.borrow_mut().unwrap().next = Link::new(&node);
//! assert!(node.borrow().next.points_to(&node));
//!
//! node.freeze();
//! assert!(node.borrow_mut().is_err());
//! ```
//!
//! ## Notes
//!
//! - Handles are reference counted. A cyclic graph keeps itself alive until one
//!   of its links is replaced (for example with [`Link::unset`]) through
//!   [`Obj::borrow_mut`].
//! - `Debug` never prints the pointee, so cyclic graphs can be logged safely.

use std::any::type_name;
use std::cell::{Cell, OnceCell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::error::Error;

struct Slot<T> {
    value: RefCell<T>,
    frozen: Cell<bool>,
}

/// Shared handle to a composite instance.
pub struct Obj<T> {
    inner: Rc<Slot<T>>,
}

impl<T> Obj<T> {
    pub fn new(value: T) -> Self {
        Obj {
            inner: Rc::new(Slot {
                value: RefCell::new(value),
                frozen: Cell::new(false),
            }),
        }
    }

    /// Immutably borrows the instance.
    ///
    /// # Panics
    ///
    /// Panics if the instance is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.value.borrow()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, T>, Error> {
        self.inner.value.try_borrow().map_err(|_| {
            Error::borrow_conflict(format!(
                "instance of `{}` is mutably borrowed",
                type_name::<T>()
            ))
        })
    }

    /// Mutably borrows the instance, failing once it has been frozen.
    pub fn borrow_mut(&self) -> Result<RefMut<'_, T>, Error> {
        if self.inner.frozen.get() {
            return Err(Error::frozen(format!(
                "instance of `{}` is frozen",
                type_name::<T>()
            )));
        }
        self.inner.value.try_borrow_mut().map_err(|_| {
            Error::borrow_conflict(format!(
                "instance of `{}` is already borrowed",
                type_name::<T>()
            ))
        })
    }

    pub fn update<R, F: FnOnce(&mut T) -> R>(&self, f: F) -> Result<R, Error> {
        let mut value = self.borrow_mut()?;
        Ok(f(&mut value))
    }

    /// Makes every later [`Obj::borrow_mut`] fail. There is no way back.
    pub fn freeze(&self) {
        self.inner.frozen.set(true);
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.get()
    }

    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.inner, &other.inner)
    }

    /// Allocation address, the identity key used during serialization.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }
}

impl<T> Clone for Obj<T> {
    fn clone(&self) -> Self {
        Obj {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Obj<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Obj")
            .field("type", &type_name::<T>())
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

/// Same allocation, or structurally equal contents.
///
/// Structural comparison recurses through links, so comparing two distinct
/// cyclic graphs does not terminate. Compare cyclic graphs by identity.
impl<T: PartialEq> PartialEq for Obj<T> {
    fn eq(&self, other: &Self) -> bool {
        Obj::ptr_eq(self, other) || *self.borrow() == *other.borrow()
    }
}

/// A field slot referencing an [`Obj<T>`], possibly not yet resolved.
pub struct Link<T> {
    cell: Rc<OnceCell<Obj<T>>>,
}

impl<T> Link<T> {
    pub fn new(target: &Obj<T>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(target.clone());
        Link {
            cell: Rc::new(cell),
        }
    }

    /// An empty slot. Serializes as `null`.
    pub fn unset() -> Self {
        Link {
            cell: Rc::new(OnceCell::new()),
        }
    }

    pub fn get(&self) -> Option<Obj<T>> {
        self.cell.get().cloned()
    }

    pub fn as_obj(&self) -> Option<&Obj<T>> {
        self.cell.get()
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Whether this slot holds exactly `target` (identity, not equality).
    pub fn points_to(&self, target: &Obj<T>) -> bool {
        self.cell
            .get()
            .is_some_and(|current| Obj::ptr_eq(current, target))
    }

    pub(crate) fn fill(&self, target: Obj<T>) -> Result<(), Error> {
        self.cell.set(target).map_err(|_| {
            Error::invalid_ref(format!(
                "link to `{}` was already resolved",
                type_name::<T>()
            ))
        })
    }
}

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        // Clone the Rc, not the cell, so clones observe the same patch.
        Link {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> From<&Obj<T>> for Link<T> {
    fn from(target: &Obj<T>) -> Self {
        Link::new(target)
    }
}

impl<T> From<Obj<T>> for Link<T> {
    fn from(target: Obj<T>) -> Self {
        Link::new(&target)
    }
}

impl<T> fmt::Debug for Link<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(target) => f.debug_tuple("Link").field(target).finish(),
            None => f.write_str("Link(unset)"),
        }
    }
}

impl<T: PartialEq> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.cell.get(), other.cell.get()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}

/// Type-erased access to an instance's frozen flag, used by the freeze set.
pub trait Freeze {
    fn freeze(&self);
    fn is_frozen(&self) -> bool;
}

impl<T> Freeze for Obj<T> {
    fn freeze(&self) {
        Obj::freeze(self)
    }

    fn is_frozen(&self) -> bool {
        Obj::is_frozen(self)
    }
}
