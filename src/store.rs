//! Storage disciplines for vector slots.
//!
//! A vector stores one *slot* per element. In [`ByValue`] mode the slot is
//! the element itself and the vector owns it for its whole residence; in
//! [`ByRef`] mode the slot is a borrowed pointer to caller-owned memory and
//! the vector never drops the pointee. The discipline is chosen at
//! construction through the vector's type parameter, so both modes share
//! one set of sequence, structural, and bulk operations.

use core::ptr::NonNull;

mod sealed {
    pub trait Sealed {}
}

/// A storage discipline for vector slots.
///
/// Implemented by the marker types [`ByValue`] and [`ByRef`]; not
/// implementable outside this crate.
pub trait StoreMode<T>: sealed::Sealed + 'static {
    /// The per-element storage unit held in the vector's buffer.
    type Slot;

    /// Whether slots own their element, implying the element is dropped
    /// when its slot is released.
    const OWNS: bool;

    /// Borrow the element held in a slot.
    ///
    /// For [`ByRef`] this dereferences the stored pointer; validity is
    /// guaranteed by the contract of the `unsafe` by-reference
    /// constructors.
    fn elem(slot: &Self::Slot) -> &T;

    /// Mutably borrow the element held in a slot.
    fn elem_mut(slot: &mut Self::Slot) -> &mut T;
}

/// An extension of [`StoreMode`] for disciplines whose slots can be
/// duplicated: cloning the element by value, or copying the borrowed
/// pointer.
///
/// Required by `get`, `copy_from`, and `insert_from`; operations which
/// only move slots (push, pop, merge, range moves) have no use for it.
pub trait StoreDup<T>: StoreMode<T> {
    /// Duplicate a slot.
    fn dup(slot: &Self::Slot) -> Self::Slot;
}

/// Marker for by-value storage: the vector owns a copy of every element.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByValue;

impl sealed::Sealed for ByValue {}

impl<T> StoreMode<T> for ByValue {
    type Slot = T;

    const OWNS: bool = true;

    #[inline]
    fn elem(slot: &T) -> &T {
        slot
    }

    #[inline]
    fn elem_mut(slot: &mut T) -> &mut T {
        slot
    }
}

impl<T: Clone> StoreDup<T> for ByValue {
    #[inline]
    fn dup(slot: &T) -> T {
        slot.clone()
    }
}

/// Marker for by-reference storage: slots hold borrowed pointers to
/// elements owned by the caller, which are never freed by the vector.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByRef;

impl sealed::Sealed for ByRef {}

impl<T> StoreMode<T> for ByRef {
    type Slot = NonNull<T>;

    const OWNS: bool = false;

    #[inline]
    fn elem(slot: &NonNull<T>) -> &T {
        // The by-reference constructors are unsafe, with the contract that
        // every inserted pointer outlives its residence in the vector.
        unsafe { slot.as_ref() }
    }

    #[inline]
    fn elem_mut(slot: &mut NonNull<T>) -> &mut T {
        unsafe { slot.as_mut() }
    }
}

impl<T> StoreDup<T> for ByRef {
    #[inline]
    fn dup(slot: &NonNull<T>) -> NonNull<T> {
        *slot
    }
}
