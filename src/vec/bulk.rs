//! Bulk operations: element callbacks and cross-vector transfer.
//!
//! Cross-vector operations lock only the primary vector; the caller is
//! responsible for ensuring the other vector is not mutated concurrently,
//! typically by holding its user-level lock.

use core::ptr;

use crate::error::Error;
use crate::lock::Level;
use crate::store::{StoreDup, StoreMode};

use super::buffer::RawBuf;
use super::BiVec;

/// Whether two vectors share one core; cross-vector operations require
/// distinct vectors.
fn same_vector<T, M1, M2>(a: &BiVec<T, M1>, b: &BiVec<T, M2>) -> bool
where
    M1: StoreMode<T>,
    M2: StoreMode<T>,
{
    a.core.get() as *const () == b.core.get() as *const ()
}

/// Resolve a `(start, count)` range request against a source size, where a
/// zero count selects everything from `start` to the end.
fn resolve_range(start: usize, count: usize, size: usize) -> Result<usize, Error> {
    if start > size {
        return Err(Error::OutOfBounds);
    }
    let count = if count == 0 { size - start } else { count };
    if start + count > size {
        return Err(Error::OutOfBounds);
    }
    Ok(count)
}

impl<T, M: StoreMode<T>> BiVec<T, M> {
    /// Invoke `f` on every element, tail first.
    ///
    /// The callback runs while the vector's lock is held; it must not call
    /// back into the same vector.
    pub fn apply<F>(&self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        self.with(Level::Primitive, |core| {
            for slot in core.live_mut().iter_mut().rev() {
                f(M::elem_mut(slot));
            }
        });
    }

    /// Invoke `f` on the elements between indexes `x` and `y` inclusive,
    /// in forward order (the bounds may be given in either order).
    pub fn apply_range<F>(&self, mut f: F, x: usize, y: usize) -> Result<(), Error>
    where
        F: FnMut(&mut T),
    {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if x >= size || y >= size {
                return Err(Error::OutOfBounds);
            }
            let (start, end) = if x <= y { (x, y) } else { (y, x) };
            for slot in core.live_mut()[start..=end].iter_mut() {
                f(M::elem_mut(slot));
            }
            Ok(())
        })
    }

    /// For each index `i` of this vector, invoke `f` on `self[i]` when
    /// `pred(self[i], other[i])` holds. Fails with
    /// [`Error::DestTooSmall`] unless `other` is at least as large.
    pub fn apply_if<M2, F, P>(
        &self,
        other: &BiVec<T, M2>,
        mut f: F,
        mut pred: P,
    ) -> Result<(), Error>
    where
        M2: StoreMode<T>,
        F: FnMut(&mut T),
        P: FnMut(&T, &T) -> bool,
    {
        if same_vector(self, other) {
            return Err(Error::OutOfBounds);
        }
        let _guard = self.op_lock().acquire(Level::Primitive);
        // SAFETY: self's lock is held; `other` is a distinct vector whose
        // stability is the caller's responsibility.
        let core = unsafe { self.core_unlocked() };
        let ocore = unsafe { other.core_unlocked() };
        let size = core.size();
        if size > ocore.size() {
            return Err(Error::DestTooSmall);
        }
        for i in (0..size).rev() {
            let hit = {
                let a = &core.live()[i];
                let b = &ocore.live()[i];
                pred(M::elem(a), M2::elem(b))
            };
            if hit {
                f(M::elem_mut(&mut core.live_mut()[i]));
            }
        }
        Ok(())
    }

    /// Move `count` elements of `other` starting at `s2` (0 meaning "to
    /// the end") onto the tail of this vector, then delete the range from
    /// `other` in one geometric step. Slots transfer by move: no cloning,
    /// and nothing is wiped or dropped in the source.
    pub fn move_from(&self, other: &BiVec<T, M>, s2: usize, count: usize) -> Result<(), Error> {
        if same_vector(self, other) {
            return Err(Error::OutOfBounds);
        }
        let _guard = self.op_lock().acquire(Level::Composite);
        // SAFETY: self's lock is held; `other` is a distinct vector whose
        // stability is the caller's responsibility.
        let core = unsafe { self.core_unlocked() };
        let ocore = unsafe { other.core_unlocked() };
        let osize = ocore.size();
        let count = resolve_range(s2, count, osize)?;
        if count == 0 {
            return Ok(());
        }
        if ocore.circular {
            // Extract one at a time; the ring back-fills itself.
            for k in 0..count {
                let value = ocore.take_circular(s2 + k)?;
                core.append_slot(value)?;
            }
            return Ok(());
        }
        if core.circular {
            // A fixed ring has no tail to extend; feed its cursor.
            for k in 0..count {
                let value = unsafe { ptr::read(ocore.buf.slot(ocore.begin + s2 + k)) };
                core.append_slot(value)?;
            }
        } else {
            while core.end + count > core.capacity() {
                core.buf.grow_right()?;
            }
            unsafe {
                RawBuf::move_slots(
                    ocore.buf.slot(ocore.begin + s2),
                    core.buf.slot(core.end),
                    count,
                );
            }
            core.end += count;
        }
        // Close the source range without touching the moved elements.
        let obase = ocore.begin;
        ocore.prev_end = osize;
        if s2 != 0 {
            let tail = osize - (s2 + count);
            if tail > 0 {
                unsafe {
                    RawBuf::shift_slots(
                        ocore.buf.slot(obase + s2 + count),
                        ocore.buf.slot(obase + s2),
                        tail,
                    );
                }
            }
            if ocore.end - count > ocore.begin {
                ocore.end -= count;
            } else {
                ocore.end = ocore.begin;
            }
            ocore.scrub(ocore.end, count);
        } else {
            if ocore.begin + count < ocore.end {
                ocore.begin += count;
            } else {
                ocore.begin = ocore.end;
            }
            ocore.scrub(obase, count);
        }
        if 4 * osize < ocore.capacity() {
            let _ = ocore.shrink_side(s2);
        }
        Ok(())
    }

    /// Append all of `other`'s elements to this vector and destroy
    /// `other`. Ownership transfers wholesale: nothing is wiped, cloned,
    /// or dropped in the source beyond its empty shell.
    ///
    /// On allocation failure the source vector is dropped along with its
    /// elements.
    pub fn merge(&self, other: Self) -> Result<(), Error> {
        let mut other = other;
        let _guard = self.op_lock().acquire(Level::Composite);
        // SAFETY: self's lock is held; `other` is owned.
        let core = unsafe { self.core_unlocked() };
        let ocore = other.core.get_mut();
        let count = ocore.size();
        if count > 0 {
            if core.circular {
                for k in 0..count {
                    let value = unsafe { ptr::read(ocore.buf.slot(ocore.begin + k)) };
                    core.append_slot(value)?;
                }
            } else {
                while core.end + count > core.capacity() {
                    core.buf.grow_right()?;
                }
                unsafe {
                    RawBuf::move_slots(
                        ocore.buf.slot(ocore.begin),
                        core.buf.slot(core.end),
                        count,
                    );
                }
                core.end += count;
            }
        }
        if ocore.circular {
            if M::OWNS {
                // The ring's reserve slot is still initialized.
                unsafe { ptr::drop_in_place(ocore.buf.slot(ocore.init_capacity - 1)) };
            }
            ocore.circular = false;
        }
        // Neutered: the source drop releases only the buffer and mutex.
        ocore.begin = 0;
        ocore.end = 0;
        Ok(())
    }
}

impl<T, M: StoreDup<T>> BiVec<T, M> {
    /// Append `count` duplicated elements of `other` starting at `s2`
    /// (0 meaning "to the end") onto the tail of this vector, growing the
    /// right capacity as needed.
    pub fn copy_from(&self, other: &BiVec<T, M>, s2: usize, count: usize) -> Result<(), Error> {
        if same_vector(self, other) {
            return Err(Error::OutOfBounds);
        }
        let _guard = self.op_lock().acquire(Level::Composite);
        // SAFETY: self's lock is held; `other` is a distinct vector whose
        // stability is the caller's responsibility.
        let core = unsafe { self.core_unlocked() };
        let ocore = unsafe { other.core_unlocked() };
        let count = resolve_range(s2, count, ocore.size())?;
        if count == 0 {
            return Ok(());
        }
        if core.circular {
            for k in 0..count {
                let dup = M::dup(&ocore.live()[s2 + k]);
                core.append_slot(dup)?;
            }
            return Ok(());
        }
        while core.end + count > core.capacity() {
            core.buf.grow_right()?;
        }
        let at = core.end;
        for k in 0..count {
            let dup = M::dup(&ocore.live()[s2 + k]);
            unsafe { ptr::write(core.buf.slot(at + k), dup) };
        }
        core.end += count;
        Ok(())
    }

    /// Insert `count` duplicated elements of `other` starting at `s2`
    /// (0 meaning "to the end") into this vector at position `s1`, one
    /// element at a time.
    pub fn insert_from(
        &self,
        other: &BiVec<T, M>,
        s2: usize,
        count: usize,
        s1: usize,
    ) -> Result<(), Error> {
        if same_vector(self, other) {
            return Err(Error::OutOfBounds);
        }
        let _guard = self.op_lock().acquire(Level::Composite);
        let count = {
            // SAFETY: `other` is a distinct vector whose stability is the
            // caller's responsibility.
            let ocore = unsafe { other.core_unlocked() };
            resolve_range(s2, count, ocore.size())?
        };
        for k in 0..count {
            let dup = {
                let ocore = unsafe { other.core_unlocked() };
                M::dup(&ocore.live()[s2 + k])
            };
            self.add_at(dup, s1 + k)?;
        }
        Ok(())
    }
}
