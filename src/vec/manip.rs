//! Structural operations: swapping and rotating slot handles.

use crate::error::Error;
use crate::lock::Level;
use crate::store::StoreMode;

use super::buffer::RawBuf;
use super::BiVec;

use core::ptr;

impl<T, M: StoreMode<T>> BiVec<T, M> {
    /// Exchange the elements at `i` and `j`.
    pub fn swap(&self, i: usize, j: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if i >= size || j >= size {
                return Err(Error::OutOfBounds);
            }
            if i != j {
                core.live_mut().swap(i, j);
            }
            Ok(())
        })
    }

    /// Pairwise swap the range `[s1, e1]` with the equal-length range
    /// starting at `s2`. The ranges must not overlap: `s2` may not precede
    /// `s1 + (e1 - s1)`.
    pub fn swap_range(&self, s1: usize, e1: usize, s2: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if e1 < s1 {
                return Err(Error::OutOfBounds);
            }
            let offset = e1 - s1;
            if s1 + offset >= size || s2 + offset >= size || s2 < s1 + offset {
                return Err(Error::OutOfBounds);
            }
            if s1 == s2 {
                return Ok(());
            }
            let live = core.live_mut();
            for k in 0..=offset {
                // A one-slot overlap at the boundary degenerates to a
                // self-swap, which is a no-op.
                if s1 + k != s2 + k {
                    live.swap(s1 + k, s2 + k);
                }
            }
            Ok(())
        })
    }

    /// Cyclically shift the live range left by `k` positions.
    pub fn rotate_left(&self, k: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if k == 0 || k == size {
                return Ok(());
            }
            if k > size {
                return Err(Error::OutOfBounds);
            }
            let base = core.begin;
            unsafe {
                if k == 1 {
                    let first = ptr::read(core.buf.slot(base));
                    RawBuf::shift_slots(core.buf.slot(base + 1), core.buf.slot(base), size - 1);
                    ptr::write(core.buf.slot(base + size - 1), first);
                } else {
                    // Stash the first k handles, close the gap, replay them
                    // at the tail.
                    let scratch = RawBuf::<M::Slot>::scratch(k)?;
                    RawBuf::move_slots(core.buf.slot(base), scratch.slot(0), k);
                    RawBuf::shift_slots(core.buf.slot(base + k), core.buf.slot(base), size - k);
                    RawBuf::move_slots(scratch.slot(0), core.buf.slot(base + size - k), k);
                }
            }
            Ok(())
        })
    }

    /// Cyclically shift the live range right by `k` positions.
    pub fn rotate_right(&self, k: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if k == 0 || k == size {
                return Ok(());
            }
            if k > size {
                return Err(Error::OutOfBounds);
            }
            let base = core.begin;
            unsafe {
                if k == 1 {
                    let last = ptr::read(core.buf.slot(base + size - 1));
                    RawBuf::shift_slots(core.buf.slot(base), core.buf.slot(base + 1), size - 1);
                    ptr::write(core.buf.slot(base), last);
                } else {
                    let scratch = RawBuf::<M::Slot>::scratch(k)?;
                    RawBuf::move_slots(core.buf.slot(base + size - k), scratch.slot(0), k);
                    RawBuf::shift_slots(core.buf.slot(base), core.buf.slot(base + k), size - k);
                    RawBuf::move_slots(scratch.slot(0), core.buf.slot(base), k);
                }
            }
            Ok(())
        })
    }
}
