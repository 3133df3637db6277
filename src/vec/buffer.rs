//! Raw slot-array storage with independently sized left and right halves.
//!
//! The buffer is one contiguous allocation of `cap_left + cap_right`
//! slots. `cap_left` is headroom for front insertion and `cap_right` for
//! back insertion; either half may be grown or shrunk on its own. The
//! buffer tracks no element state itself: the vector's `begin`/`end`
//! describe which slots are live, and only those slots (plus every slot of
//! a circular vector) hold initialized values.

use core::alloc::Layout;
use core::mem::size_of;
use core::ptr::{self, NonNull};

use std::alloc::{alloc, dealloc, realloc};

use crate::error::Error;

pub(crate) struct RawBuf<S> {
    data: NonNull<S>,
    cap_left: usize,
    cap_right: usize,
}

impl<S> RawBuf<S> {
    #[inline]
    fn array_layout(count: usize) -> Result<Layout, Error> {
        Layout::array::<S>(count).map_err(|_| Error::Alloc)
    }

    /// Allocate an uninitialized buffer of `cap_left + cap_right` slots.
    pub fn new(cap_left: usize, cap_right: usize) -> Result<Self, Error> {
        let capacity = cap_left + cap_right;
        let data = if size_of::<S>() == 0 || capacity == 0 {
            NonNull::dangling()
        } else {
            let layout = Self::array_layout(capacity)?;
            NonNull::new(unsafe { alloc(layout) } as *mut S).ok_or(Error::Alloc)?
        };
        Ok(Self {
            data,
            cap_left,
            cap_right,
        })
    }

    /// Allocate a detached scratch buffer of `len` slots.
    pub fn scratch(len: usize) -> Result<Self, Error> {
        Self::new(0, len)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap_left + self.cap_right
    }

    #[inline]
    pub fn cap_left(&self) -> usize {
        self.cap_left
    }

    #[inline]
    pub fn cap_right(&self) -> usize {
        self.cap_right
    }

    /// Pointer to the slot at buffer index `i`.
    ///
    /// # Safety
    /// `i` must not exceed the buffer capacity.
    #[inline]
    pub unsafe fn slot(&self, i: usize) -> *mut S {
        self.data.as_ptr().add(i)
    }

    /// Copy `len` slots between non-overlapping locations.
    ///
    /// # Safety
    /// Both ranges must be in bounds of their buffers and must not alias.
    #[inline]
    pub unsafe fn move_slots(src: *const S, dst: *mut S, len: usize) {
        ptr::copy_nonoverlapping(src, dst, len);
    }

    /// Shift `len` slots within one buffer; the ranges may overlap.
    ///
    /// # Safety
    /// Both ranges must be in bounds of the buffer.
    #[inline]
    pub unsafe fn shift_slots(src: *const S, dst: *mut S, len: usize) {
        ptr::copy(src, dst, len);
    }

    /// Reallocate the buffer in place to `new_capacity` total slots,
    /// preserving slot contents up to the smaller capacity.
    fn realloc_to(&mut self, new_capacity: usize) -> Result<(), Error> {
        if size_of::<S>() == 0 {
            return Ok(());
        }
        let old_capacity = self.capacity();
        let new_layout = Self::array_layout(new_capacity)?;
        if old_capacity == 0 {
            self.data = NonNull::new(unsafe { alloc(new_layout) } as *mut S).ok_or(Error::Alloc)?;
        } else {
            let old_layout = Self::array_layout(old_capacity)?;
            let grown = unsafe {
                realloc(self.data.as_ptr() as *mut u8, old_layout, new_layout.size())
            };
            self.data = NonNull::new(grown as *mut S).ok_or(Error::Alloc)?;
        }
        Ok(())
    }

    /// Double the left capacity, relocating the live range `[begin, end)`
    /// into a fresh buffer re-based at the old `cap_left`. Returns the new
    /// live-range endpoints. On allocation failure the buffer is unchanged.
    pub fn grow_left(&mut self, begin: usize, end: usize) -> Result<(usize, usize), Error> {
        let new_left = self.cap_left << 1;
        let len = end - begin;
        let next = Self::new(new_left, self.cap_right)?;
        let nb = self.cap_left;
        unsafe {
            Self::move_slots(self.slot(begin), next.slot(nb), len);
        }
        // Frees the old allocation; slots were moved, not dropped.
        *self = next;
        Ok((nb, nb + len))
    }

    /// Double the right capacity by reallocating in place.
    pub fn grow_right(&mut self) -> Result<(), Error> {
        let new_right = self.cap_right << 1;
        self.realloc_to(self.cap_left + new_right)?;
        self.cap_right = new_right;
        Ok(())
    }

    /// Halve the left capacity, subject to the `init_capacity / 2` and
    /// `size / 2` floors. No-op when the total capacity is already at or
    /// below `init_capacity`.
    pub fn shrink_left(
        &mut self,
        begin: usize,
        end: usize,
        init_capacity: usize,
    ) -> Result<(usize, usize), Error> {
        if self.capacity() <= init_capacity {
            return Ok((begin, end));
        }
        let len = end - begin;
        let mut new_left = self.cap_left >> 1;
        if new_left < init_capacity >> 1 {
            new_left = init_capacity >> 1;
        }
        new_left = new_left.max(len >> 1);
        if new_left >= self.cap_left {
            return Ok((begin, end));
        }
        let next = Self::new(new_left, self.cap_right)?;
        let nb = new_left >> 1;
        debug_assert!(nb + len <= next.capacity());
        unsafe {
            Self::move_slots(self.slot(begin), next.slot(nb), len);
        }
        *self = next;
        Ok((nb, nb + len))
    }

    /// Halve the right capacity in place, subject to the same floors as
    /// [`Self::shrink_left`]. The live range must stay inside the shrunk
    /// buffer; otherwise the shrink is skipped.
    pub fn shrink_right(
        &mut self,
        begin: usize,
        end: usize,
        init_capacity: usize,
    ) -> Result<(), Error> {
        if self.capacity() <= init_capacity {
            return Ok(());
        }
        let len = end - begin;
        let mut new_right = self.cap_right >> 1;
        if new_right < init_capacity >> 1 {
            new_right = init_capacity >> 1;
        }
        new_right = new_right.max(len >> 1);
        if new_right >= self.cap_right || end > self.cap_left + new_right {
            return Ok(());
        }
        self.realloc_to(self.cap_left + new_right)?;
        self.cap_right = new_right;
        Ok(())
    }

    /// Compress the buffer to `max(init_capacity, len + 2)` slots,
    /// splitting the slack evenly between the two halves. Returns the new
    /// live-range endpoints.
    pub fn shrink_to_fit(
        &mut self,
        begin: usize,
        end: usize,
        init_capacity: usize,
    ) -> Result<(usize, usize), Error> {
        let init_capacity = init_capacity.max(2);
        let len = end - begin;
        if self.capacity() == init_capacity || self.capacity() <= len {
            return Ok((begin, end));
        }
        let new_capacity = if len < init_capacity {
            init_capacity
        } else {
            len + 2
        };
        let new_left = new_capacity >> 1;
        let next = Self::new(new_left, new_capacity - new_left)?;
        let nb = (new_capacity - len) >> 1;
        unsafe {
            Self::move_slots(self.slot(begin), next.slot(nb), len);
        }
        *self = next;
        Ok((nb, nb + len))
    }
}

impl<S> Drop for RawBuf<S> {
    fn drop(&mut self) {
        let capacity = self.capacity();
        if size_of::<S>() != 0 && capacity > 0 {
            if let Ok(layout) = Layout::array::<S>(capacity) {
                unsafe { dealloc(self.data.as_ptr() as *mut u8, layout) };
            }
        }
    }
}
