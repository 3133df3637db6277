//! The vector type and its sequence operations.

use core::cell::UnsafeCell;
use core::fmt;
use core::mem::size_of;
use core::ops::Deref;
use core::ptr;
use core::slice;

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::error::Error;
use crate::lock::{Level, OpGuard, OpLock};
use crate::store::{ByRef, ByValue, StoreDup, StoreMode};

use self::buffer::RawBuf;

pub(crate) mod buffer;

mod bulk;
mod manip;
mod sort;

/// Capacity used when none is requested at creation.
const DEFAULT_CAPACITY: usize = 8;

/// Smallest accepted initial capacity.
const MIN_CAPACITY: usize = 4;

/// The unlocked state of a vector. All invariants are maintained here;
/// [`BiVec`] adds the critical-section discipline on top.
pub(crate) struct Core<T, M: StoreMode<T>> {
    buf: RawBuf<M::Slot>,
    // Live elements occupy buffer indices [begin, end).
    begin: usize,
    end: usize,
    // Size immediately before the last size-changing mutation.
    prev_end: usize,
    init_capacity: usize,
    circular: bool,
    secure: bool,
    custom_wipe: bool,
    wipe: Option<fn(&mut T)>,
    // Back-fill for extraction from a fixed ring.
    fill: Option<fn() -> M::Slot>,
    // Next overwrite position of a fixed ring.
    cursor: usize,
    // Positional hysteresis for the adaptive binary search.
    balance: usize,
    bottom: usize,
}

impl<T, M: StoreMode<T>> Core<T, M> {
    fn with_capacity(init_capacity: usize) -> Result<Self, Error> {
        let mut capacity = init_capacity;
        if capacity == 0 {
            capacity = DEFAULT_CAPACITY;
        } else if capacity < MIN_CAPACITY {
            capacity = MIN_CAPACITY;
        }
        let cap_left = capacity / 2;
        let buf = RawBuf::new(cap_left, capacity - cap_left)?;
        Ok(Self {
            buf,
            begin: 1,
            end: 1,
            prev_end: 0,
            init_capacity: capacity,
            circular: false,
            secure: false,
            custom_wipe: false,
            wipe: None,
            fill: None,
            cursor: 0,
            balance: 0,
            bottom: 0,
        })
    }

    #[inline]
    fn size(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    #[inline]
    fn live(&self) -> &[M::Slot] {
        unsafe { slice::from_raw_parts(self.buf.slot(self.begin), self.size()) }
    }

    #[inline]
    fn live_mut(&mut self) -> &mut [M::Slot] {
        unsafe { slice::from_raw_parts_mut(self.buf.slot(self.begin), self.size()) }
    }

    /// Run the wipe function over a live element when secure wiping is on.
    fn wipe_elem(&self, slot: *mut M::Slot) {
        if self.secure {
            if let Some(wipe) = self.wipe {
                wipe(M::elem_mut(unsafe { &mut *slot }));
            }
        }
    }

    /// Wipe (when secure) and discard an extracted slot.
    fn retire_value(&self, mut value: M::Slot) {
        if self.secure {
            if let Some(wipe) = self.wipe {
                wipe(M::elem_mut(&mut value));
            }
        }
        drop(value);
    }

    /// Zero the bytes of vacated owned slots. The region is logically
    /// uninitialized afterward, so raw zeroing is always sound here, while
    /// the user wipe function is reserved for values still alive.
    fn scrub(&self, at: usize, count: usize) {
        if self.secure && M::OWNS && size_of::<M::Slot>() != 0 {
            unsafe { ptr::write_bytes(self.buf.slot(at), 0, count) };
        }
    }

    /// Overwrite the slot at buffer index `at`, wiping the outgoing
    /// element first when secure wiping is on.
    fn replace_slot(&mut self, at: usize, value: M::Slot) {
        let slot = unsafe { self.buf.slot(at) };
        self.wipe_elem(slot);
        // By-value: drops the outgoing element. By-ref: the pointee was
        // wiped above (when secure) and stays owned by the caller.
        let _old = unsafe { ptr::replace(slot, value) };
    }

    /// Insert into a fixed ring: an explicit in-range index overwrites,
    /// anything else overwrites at the advancing cursor.
    fn put_circular(&mut self, value: M::Slot, i: usize) -> Result<(), Error> {
        let vsize = self.size();
        let idx = if i < vsize {
            i
        } else {
            let at = self.cursor % vsize;
            self.cursor = self.cursor.wrapping_add(1);
            at
        };
        self.replace_slot(self.begin + idx, value);
        Ok(())
    }

    /// Extract from a fixed ring, back-filling the slot so the geometry
    /// never moves.
    fn take_circular(&mut self, idx: usize) -> Result<M::Slot, Error> {
        let Some(fill) = self.fill else {
            return Err(Error::Corrupted);
        };
        let slot = unsafe { self.buf.slot(self.begin + idx) };
        Ok(unsafe { ptr::replace(slot, fill()) })
    }

    /// Append at the tail, or overwrite at the cursor for a fixed ring.
    fn append_slot(&mut self, value: M::Slot) -> Result<(), Error> {
        let size = self.size();
        self.add_at(value, size, true)
    }

    fn add_at(&mut self, value: M::Slot, i: usize, clamp: bool) -> Result<(), Error> {
        if self.circular {
            return self.put_circular(value, i);
        }
        let vsize = self.size();
        let mut idx = i;
        if idx > vsize {
            if !clamp {
                return Err(Error::OutOfBounds);
            }
            idx = vsize.saturating_sub(1);
        }
        if idx == 0 {
            if self.begin == 0 || self.buf.cap_left() == 1 {
                let (nb, ne) = self.buf.grow_left(self.begin, self.end)?;
                self.begin = nb;
                self.end = ne;
            }
        } else if self.end >= self.buf.cap_right() {
            self.buf.grow_right()?;
        }
        let base = self.begin;
        if idx == 0 {
            unsafe { ptr::write(self.buf.slot(base - 1), value) };
            self.begin = base - 1;
        } else if idx == vsize {
            unsafe { ptr::write(self.buf.slot(self.end), value) };
            self.end += 1;
        } else {
            self.insert_interior(value, idx, vsize)?;
            self.end += 1;
        }
        self.prev_end = vsize;
        Ok(())
    }

    #[cfg(not(feature = "full-reentrant"))]
    fn insert_interior(&mut self, value: M::Slot, idx: usize, vsize: usize) -> Result<(), Error> {
        let base = self.begin;
        unsafe {
            RawBuf::shift_slots(
                self.buf.slot(base + idx),
                self.buf.slot(base + idx + 1),
                vsize - idx,
            );
            ptr::write(self.buf.slot(base + idx), value);
        }
        Ok(())
    }

    #[cfg(feature = "full-reentrant")]
    fn insert_interior(&mut self, value: M::Slot, idx: usize, vsize: usize) -> Result<(), Error> {
        // Write the post-insert layout into a fresh buffer and swap it in
        // at the end; a reader holding the previous buffer observes the
        // pre-insert state throughout.
        let base = self.begin;
        let next = RawBuf::new(self.buf.cap_left(), self.buf.cap_right())?;
        unsafe {
            RawBuf::move_slots(self.buf.slot(base), next.slot(base), idx);
            RawBuf::move_slots(
                self.buf.slot(base + idx),
                next.slot(base + idx + 1),
                vsize - idx,
            );
            ptr::write(next.slot(base + idx), value);
        }
        self.buf = next;
        Ok(())
    }

    fn remove_at(&mut self, i: usize, clamp: bool) -> Result<Option<M::Slot>, Error> {
        let vsize = self.size();
        if vsize == 0 {
            return Ok(None);
        }
        let mut idx = i;
        if self.circular {
            if idx >= vsize {
                idx %= vsize;
            }
            return self.take_circular(idx).map(Some);
        }
        if idx >= vsize {
            if !clamp {
                return Err(Error::OutOfBounds);
            }
            idx = vsize - 1;
        }
        if self.begin > self.end {
            return Err(Error::Corrupted);
        }
        let base = self.begin;
        let value = unsafe { ptr::read(self.buf.slot(base + idx)) };
        if idx != 0 {
            if idx < vsize - 1 {
                if let Err(err) = self.close_gap(idx, vsize) {
                    // Undo the read so the vector is unchanged.
                    unsafe { ptr::write(self.buf.slot(base + idx), value) };
                    return Err(err);
                }
            }
            if self.end > self.begin {
                self.end -= 1;
            } else {
                self.end = self.begin;
            }
            self.scrub(self.end, 1);
        } else {
            if self.begin < self.end {
                self.begin += 1;
            } else {
                self.begin = self.end;
            }
            self.scrub(base, 1);
        }
        self.prev_end = vsize;
        // Best-effort shrink; failure to reallocate never fails the removal.
        if 4 * vsize < self.capacity() {
            let _ = self.shrink_side(idx);
        }
        Ok(Some(value))
    }

    #[cfg(not(feature = "full-reentrant"))]
    fn close_gap(&mut self, idx: usize, vsize: usize) -> Result<(), Error> {
        let base = self.begin;
        unsafe {
            RawBuf::shift_slots(
                self.buf.slot(base + idx + 1),
                self.buf.slot(base + idx),
                vsize - idx - 1,
            );
        }
        Ok(())
    }

    #[cfg(feature = "full-reentrant")]
    fn close_gap(&mut self, idx: usize, vsize: usize) -> Result<(), Error> {
        let base = self.begin;
        let next = RawBuf::new(self.buf.cap_left(), self.buf.cap_right())?;
        unsafe {
            RawBuf::move_slots(self.buf.slot(base), next.slot(base), idx);
            RawBuf::move_slots(
                self.buf.slot(base + idx + 1),
                next.slot(base + idx),
                vsize - idx - 1,
            );
        }
        self.buf = next;
        Ok(())
    }

    fn put_at(&mut self, value: M::Slot, i: usize) -> Result<(), Error> {
        let vsize = self.size();
        let mut idx = i;
        if !self.circular {
            if idx >= vsize {
                return Err(Error::OutOfBounds);
            }
        } else if idx >= vsize {
            // Fixed ring indexing folds over the live slots, never the
            // reserved one.
            idx = i % vsize;
        }
        self.replace_slot(self.begin + idx, value);
        Ok(())
    }

    fn delete_at(&mut self, start: usize, offset: usize) -> Result<(), Error> {
        let vsize = self.size();
        if vsize == 0 {
            return Err(Error::Empty);
        }
        if start + offset >= vsize {
            return Err(Error::OutOfBounds);
        }
        if self.circular {
            for k in start..=start + offset {
                let value = self.take_circular(k)?;
                self.retire_value(value);
            }
            return Ok(());
        }
        let removed = offset + 1;
        let base = self.begin;
        for j in (start..start + removed).rev() {
            let slot = unsafe { self.buf.slot(base + j) };
            self.wipe_elem(slot);
            if M::OWNS {
                unsafe { ptr::drop_in_place(slot) };
            }
        }
        self.prev_end = vsize;
        if start != 0 {
            let tail = vsize - (start + removed);
            if tail > 0 {
                unsafe {
                    RawBuf::shift_slots(
                        self.buf.slot(base + start + removed),
                        self.buf.slot(base + start),
                        tail,
                    );
                }
            }
            if self.end - removed > self.begin {
                self.end -= removed;
            } else {
                self.end = self.begin;
            }
            self.scrub(self.end, removed);
        } else {
            if self.begin + removed < self.end {
                self.begin += removed;
            } else {
                self.begin = self.end;
            }
            self.scrub(base, removed);
        }
        if 4 * vsize < self.capacity() {
            let _ = self.shrink_side(start);
        }
        Ok(())
    }

    fn shrink_side(&mut self, direction_idx: usize) -> Result<(), Error> {
        if direction_idx == 0 {
            let (nb, ne) = self.buf.shrink_left(self.begin, self.end, self.init_capacity)?;
            self.begin = nb;
            self.end = ne;
        } else {
            self.buf
                .shrink_right(self.begin, self.end, self.init_capacity)?;
        }
        Ok(())
    }

    fn clear(&mut self) {
        let vsize = self.size();
        if self.circular {
            // A ring keeps its geometry; wipe contents and reset the cursor.
            if self.secure {
                if let Some(wipe) = self.wipe {
                    for slot in self.live_mut() {
                        wipe(M::elem_mut(slot));
                    }
                }
            }
            self.cursor = 0;
            self.prev_end = vsize;
            return;
        }
        if vsize > 0 {
            let base = self.begin;
            for j in (0..vsize).rev() {
                let slot = unsafe { self.buf.slot(base + j) };
                self.wipe_elem(slot);
                if M::OWNS {
                    unsafe { ptr::drop_in_place(slot) };
                }
            }
            self.scrub(base, vsize);
        }
        self.prev_end = vsize;
        // Re-center on one slot so either end can grow without moving.
        self.begin = 1;
        self.end = 1;
    }
}

impl<T, M: StoreDup<T>> Core<T, M> {
    fn get_at(&self, i: usize) -> Result<M::Slot, Error> {
        if i >= self.size() {
            return Err(Error::OutOfBounds);
        }
        let slot = unsafe { &*self.buf.slot(self.begin + i) };
        Ok(M::dup(slot))
    }
}

impl<T, M: StoreMode<T>> Drop for Core<T, M> {
    fn drop(&mut self) {
        let (first, count) = if self.circular {
            // Every slot of a ring is initialized, including the reserve.
            (0, self.capacity())
        } else {
            (self.begin, self.size())
        };
        for j in (0..count).rev() {
            let slot = unsafe { self.buf.slot(first + j) };
            self.wipe_elem(slot);
            if M::OWNS {
                unsafe { ptr::drop_in_place(slot) };
            }
        }
    }
}

/// A dynamic array with bidirectional growth, three-tier priority locking,
/// and per-construction storage and wiping disciplines.
///
/// All operations take `&self`: the vector owns a recursive mutex and every
/// public operation runs as its own critical section, so a `BiVec` behind an
/// `Arc` may be driven from multiple threads. Operations on one vector are
/// linearizable; cross-vector operations lock only the primary vector, and
/// the caller is responsible for the other (typically by holding its
/// [`lock`](BiVec::lock)).
///
/// The second type parameter selects the storage discipline: [`ByValue`]
/// vectors own their elements (`Slot = T`), while [`ByRef`] vectors hold
/// borrowed `NonNull<T>` handles and are constructed through `unsafe`
/// constructors carrying the pointer-validity contract.
pub struct BiVec<T, M: StoreMode<T> = ByValue> {
    core: UnsafeCell<Core<T, M>>,
    lock: OpLock,
}

// The lock serializes all access to the core, making the container behave
// like a mutex around its elements.
unsafe impl<T: Send, M: StoreMode<T>> Send for BiVec<T, M> {}
unsafe impl<T: Send, M: StoreMode<T>> Sync for BiVec<T, M> {}

impl<T, M: StoreMode<T>> BiVec<T, M> {
    fn from_core(core: Core<T, M>) -> Self {
        Self {
            core: UnsafeCell::new(core),
            lock: OpLock::new(),
        }
    }

    /// Enter a critical section at `level` and run `op` on the core.
    fn with<R>(&self, level: Level, op: impl FnOnce(&mut Core<T, M>) -> R) -> R {
        let _guard = self.lock.acquire(level);
        // SAFETY: the priority lock serializes access to the core.
        let core = unsafe { &mut *self.core.get() };
        op(core)
    }

    /// Access the core without acquiring the lock.
    ///
    /// # Safety
    /// The caller must hold this vector's lock, or otherwise guarantee
    /// exclusive access for the lifetime of the returned reference.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn core_unlocked(&self) -> &mut Core<T, M> {
        &mut *self.core.get()
    }

    #[inline]
    pub(crate) fn op_lock(&self) -> &OpLock {
        &self.lock
    }

    /// The number of live elements.
    pub fn size(&self) -> usize {
        self.with(Level::Primitive, |core| core.size())
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Total slot capacity, left and right halves combined.
    pub fn capacity(&self) -> usize {
        self.with(Level::Primitive, |core| core.capacity())
    }

    /// Headroom reserved for front insertion.
    pub fn left_capacity(&self) -> usize {
        self.with(Level::Primitive, |core| core.buf.cap_left())
    }

    /// Headroom reserved for back insertion.
    pub fn right_capacity(&self) -> usize {
        self.with(Level::Primitive, |core| core.buf.cap_right())
    }

    /// The capacity requested at creation; the shrink floor.
    pub fn init_capacity(&self) -> usize {
        self.with(Level::Primitive, |core| core.init_capacity)
    }

    /// The size immediately before the last size-changing mutation.
    pub fn prev_size(&self) -> usize {
        self.with(Level::Primitive, |core| core.prev_end)
    }

    /// The one-past-the-end sentinel index of the live range.
    pub fn end_index(&self) -> usize {
        self.size()
    }

    /// The largest size any vector can reach.
    pub fn max_size(&self) -> usize {
        usize::MAX
    }

    /// The priority the vector's lock is currently held at; 0 when free.
    pub fn lock_level(&self) -> u8 {
        self.lock.level()
    }

    /// Freeze the vector for a sequence of operations. Operations made
    /// through `&self` on this thread proceed normally while the guard is
    /// held; other threads block.
    pub fn lock(&self) -> LockGuard<'_, T, M> {
        LockGuard {
            vec: self,
            _guard: self.lock.acquire(Level::User),
        }
    }

    /// Attempt to freeze the vector without blocking.
    pub fn try_lock(&self) -> Result<LockGuard<'_, T, M>, Error> {
        match self.lock.try_acquire(Level::User) {
            Some(guard) => Ok(LockGuard {
                vec: self,
                _guard: guard,
            }),
            None => Err(Error::Race),
        }
    }

    /// Install a custom secure-wipe function, replacing the default wipe.
    ///
    /// The callback must leave the value valid, in the manner of
    /// `zeroize`. Wiping remains inert unless the vector was constructed
    /// with secure wiping enabled.
    pub fn set_wipe_fn(&self, wipe: fn(&mut T)) {
        self.with(Level::Primitive, |core| {
            core.wipe = Some(wipe);
            core.custom_wipe = true;
        });
    }

    /// Whether a custom wipe function has been installed.
    pub fn has_custom_wipe(&self) -> bool {
        self.with(Level::Primitive, |core| core.custom_wipe)
    }

    /// Append an element at the tail.
    pub fn push(&self, value: M::Slot) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            core.add_at(value, size, true)
        })
    }

    /// Insert an element at the front.
    pub fn add_front(&self, value: M::Slot) -> Result<(), Error> {
        self.with(Level::Primitive, |core| core.add_at(value, 0, true))
    }

    /// Insert an element at `index`, shifting later elements right.
    pub fn add_at(&self, value: M::Slot, index: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| core.add_at(value, index, false))
    }

    /// Remove and return the tail element, or `None` when empty.
    pub fn pop(&self) -> Result<Option<M::Slot>, Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if size == 0 {
                Ok(None)
            } else {
                core.remove_at(size - 1, true)
            }
        })
    }

    /// Remove and return the front element, or `None` when empty.
    pub fn remove_front(&self) -> Result<Option<M::Slot>, Error> {
        self.with(Level::Primitive, |core| core.remove_at(0, false))
    }

    /// Remove and return the element at `index`, or `None` when empty.
    pub fn remove_at(&self, index: usize) -> Result<Option<M::Slot>, Error> {
        self.with(Level::Primitive, |core| core.remove_at(index, false))
    }

    /// Overwrite the tail element.
    pub fn put(&self, value: M::Slot) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if size == 0 {
                Err(Error::OutOfBounds)
            } else {
                core.put_at(value, size - 1)
            }
        })
    }

    /// Overwrite the front element.
    pub fn put_front(&self, value: M::Slot) -> Result<(), Error> {
        self.with(Level::Primitive, |core| core.put_at(value, 0))
    }

    /// Overwrite the element at `index` without changing the size.
    pub fn put_at(&self, value: M::Slot, index: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| core.put_at(value, index))
    }

    /// Delete the tail element, wiping and releasing it in place.
    pub fn delete(&self) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if size == 0 {
                return Err(Error::Empty);
            }
            core.delete_at(size - 1, 0)
        })
    }

    /// Delete the front element.
    pub fn delete_front(&self) -> Result<(), Error> {
        self.with(Level::Primitive, |core| core.delete_at(0, 0))
    }

    /// Delete the element at `index`.
    pub fn delete_at(&self, index: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| core.delete_at(index, 0))
    }

    /// Delete the elements from `first` through `last`, inclusive.
    pub fn delete_range(&self, first: usize, last: usize) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            if last < first {
                return Err(Error::OutOfBounds);
            }
            core.delete_at(first, last - first)
        })
    }

    /// Remove every element. Capacity is retained; the live range is
    /// re-centered so both ends can grow without reallocating.
    pub fn clear(&self) {
        self.with(Level::Primitive, |core| core.clear());
    }

    /// Compress the buffer to `max(init_capacity, size + 2)` slots,
    /// splitting the slack evenly between the two halves.
    pub fn shrink(&self) -> Result<(), Error> {
        self.with(Level::Primitive, |core| {
            let (nb, ne) = core
                .buf
                .shrink_to_fit(core.begin, core.end, core.init_capacity)?;
            core.begin = nb;
            core.end = ne;
            Ok(())
        })
    }
}

impl<T, M: StoreDup<T>> BiVec<T, M> {
    /// Fetch the element at `index`: a clone for by-value vectors, the
    /// stored pointer for by-reference vectors.
    pub fn get_at(&self, index: usize) -> Result<M::Slot, Error> {
        self.with(Level::Primitive, |core| core.get_at(index))
    }

    /// Fetch the front element.
    pub fn get_front(&self) -> Result<M::Slot, Error> {
        self.get_at(0)
    }

    /// Fetch the tail element.
    pub fn get_back(&self) -> Result<M::Slot, Error> {
        self.with(Level::Primitive, |core| {
            let size = core.size();
            if size == 0 {
                Err(Error::OutOfBounds)
            } else {
                core.get_at(size - 1)
            }
        })
    }
}

impl<T> BiVec<T, ByValue> {
    /// Create a by-value vector with the given initial capacity
    /// (0 selects the default), failing on allocation errors.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self::from_core(Core::with_capacity(capacity)?))
    }

    /// Create a by-value vector with the given initial capacity
    /// (0 selects the default).
    ///
    /// Panics on allocation failure.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(vec) => vec,
            Err(err) => err.panic(),
        }
    }

    #[cfg(feature = "zeroize")]
    /// Create a by-value vector which zeroizes element memory before every
    /// release or overwrite.
    pub fn secure(capacity: usize) -> Self
    where
        T: Zeroize,
    {
        let mut vec = Self::with_capacity(capacity);
        let core = vec.core.get_mut();
        core.secure = true;
        core.wipe = Some(<T as Zeroize>::zeroize as fn(&mut T));
        vec
    }

    /// Create a by-value vector which runs `wipe` over element memory
    /// before every release or overwrite. The callback must leave the
    /// value valid.
    pub fn secure_with(capacity: usize, wipe: fn(&mut T)) -> Self {
        let mut vec = Self::with_capacity(capacity);
        let core = vec.core.get_mut();
        core.secure = true;
        core.custom_wipe = true;
        core.wipe = Some(wipe);
        vec
    }

    /// Create a fixed-capacity circular vector. All slots are pre-filled
    /// with `T::default()`; the usable size is pinned at `capacity - 1`
    /// and every insertion overwrites at the advancing cursor.
    pub fn circular(capacity: usize) -> Self
    where
        T: Default,
    {
        let mut vec = Self::with_capacity(capacity);
        let core = vec.core.get_mut();
        let cap = core.init_capacity;
        for i in 0..cap {
            unsafe { ptr::write(core.buf.slot(i), T::default()) };
        }
        core.circular = true;
        core.begin = 0;
        core.end = cap - 1;
        core.fill = Some(T::default as fn() -> T);
        vec
    }
}

impl<T> BiVec<T, ByRef> {
    /// Create a by-reference vector, failing on allocation errors.
    ///
    /// # Safety
    /// Every pointer subsequently inserted must reference memory that
    /// stays valid until the pointer is removed or the vector is dropped,
    /// and that is not mutated elsewhere while element callbacks
    /// (`apply`, comparators, wiping) may run.
    pub unsafe fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Ok(Self::from_core(Core::with_capacity(capacity)?))
    }

    /// Create a by-reference vector.
    ///
    /// Panics on allocation failure.
    ///
    /// # Safety
    /// As for [`BiVec::<T, ByRef>::try_with_capacity`].
    pub unsafe fn with_capacity(capacity: usize) -> Self {
        match unsafe { Self::try_with_capacity(capacity) } {
            Ok(vec) => vec,
            Err(err) => err.panic(),
        }
    }

    #[cfg(feature = "zeroize")]
    /// Create a by-reference vector which zeroizes pointees on deletion
    /// and overwrite (removal returns the pointer unwiped).
    ///
    /// # Safety
    /// As for [`BiVec::<T, ByRef>::try_with_capacity`].
    pub unsafe fn secure(capacity: usize) -> Self
    where
        T: Zeroize,
    {
        let mut vec = unsafe { Self::with_capacity(capacity) };
        let core = vec.core.get_mut();
        core.secure = true;
        core.wipe = Some(<T as Zeroize>::zeroize as fn(&mut T));
        vec
    }

    /// Create a by-reference vector wiping pointees with `wipe`.
    ///
    /// # Safety
    /// As for [`BiVec::<T, ByRef>::try_with_capacity`].
    pub unsafe fn secure_with(capacity: usize, wipe: fn(&mut T)) -> Self {
        let mut vec = unsafe { Self::with_capacity(capacity) };
        let core = vec.core.get_mut();
        core.secure = true;
        core.custom_wipe = true;
        core.wipe = Some(wipe);
        vec
    }
}

impl<T> Default for BiVec<T, ByValue> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: fmt::Debug, M: StoreMode<T>> fmt::Debug for BiVec<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(Level::Primitive, |core| {
            f.debug_list().entries(core.live().iter().map(M::elem)).finish()
        })
    }
}

/// RAII handle for a user-level (priority 3) lock on a vector.
///
/// While held, internal acquisitions from the same thread nest beneath it
/// and never release it; other threads block. Dereferences to the vector
/// for convenience.
pub struct LockGuard<'a, T, M: StoreMode<T>> {
    vec: &'a BiVec<T, M>,
    _guard: OpGuard<'a>,
}

impl<'a, T, M: StoreMode<T>> Deref for LockGuard<'a, T, M> {
    type Target = BiVec<T, M>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_centers_live_range() {
        let vec = BiVec::<u32>::with_capacity(8);
        let core = unsafe { vec.core_unlocked() };
        assert_eq!(core.begin, 1);
        assert_eq!(core.end, 1);
        assert_eq!(core.init_capacity, 8);
        assert_eq!(core.capacity(), 8);
    }

    #[test]
    fn clear_recenters_on_one() {
        let vec = BiVec::<u32>::with_capacity(4);
        for i in 0..6 {
            vec.push(i).unwrap();
        }
        vec.clear();
        let core = unsafe { vec.core_unlocked() };
        assert_eq!(core.begin, 1);
        assert_eq!(core.end, 1);
        assert_eq!(core.prev_end, 6);
    }

    #[test]
    fn tiny_capacity_is_clamped() {
        let vec = BiVec::<u8>::with_capacity(1);
        assert_eq!(vec.init_capacity(), 4);
        let vec = BiVec::<u8>::with_capacity(0);
        assert_eq!(vec.init_capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn begin_end_stay_ordered() {
        let vec = BiVec::<i64>::with_capacity(4);
        for i in 0..32 {
            if i % 3 == 0 {
                vec.add_front(i).unwrap();
            } else {
                vec.push(i).unwrap();
            }
            let core = unsafe { vec.core_unlocked() };
            assert!(core.begin <= core.end);
            assert!(core.end <= core.capacity());
        }
        for _ in 0..32 {
            vec.pop().unwrap();
            let core = unsafe { vec.core_unlocked() };
            assert!(core.begin <= core.end);
            assert!(core.end <= core.capacity());
        }
    }
}
