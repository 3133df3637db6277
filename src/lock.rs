//! Priority-gated reentrant locking.
//!
//! Every public vector operation runs inside a critical section acquired at
//! one of three priorities: primitives at [`Level::Primitive`], composite
//! operations (which call primitives internally) at [`Level::Composite`],
//! and user-requested freezes at [`Level::User`]. An acquisition *engages*
//! only when its priority is at least the currently recorded level, so a
//! primitive nested under a composite or user lock neither re-records the
//! level nor clears it on release. The underlying mutex is reentrant:
//! same-thread nesting never deadlocks, while callers on other threads
//! always serialize.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

/// Process-wide switch for all vector locking.
static LOCKING: AtomicBool = AtomicBool::new(true);

/// Enable locking for all vectors (the default).
pub fn locking_enable() {
    LOCKING.store(true, Ordering::Release);
}

/// Disable locking for all vectors.
///
/// Intended for single-threaded use; with locking disabled no operation
/// takes the mutex and no lock level is recorded.
pub fn locking_disable() {
    LOCKING.store(false, Ordering::Release);
}

#[inline]
pub(crate) fn locking_on() -> bool {
    LOCKING.load(Ordering::Acquire)
}

/// Acquisition priority for a vector critical section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub(crate) enum Level {
    /// Single-step operations: push, pop, put, get, swap, rotate, apply.
    Primitive = 1,
    /// Operations which internally invoke primitives: ordered insertion,
    /// copies, range moves, merges.
    Composite = 2,
    /// The user-facing "freeze this vector" lock.
    User = 3,
}

/// A recursive mutex gated by a monotonic acquirer priority.
pub(crate) struct OpLock {
    mutex: ReentrantMutex<()>,
    // The priority the lock is currently held at; 0 when free.
    held: AtomicU8,
}

impl OpLock {
    pub fn new() -> Self {
        Self {
            mutex: ReentrantMutex::new(()),
            held: AtomicU8::new(0),
        }
    }

    /// Enter the critical section at `level`.
    ///
    /// Blocks while another thread holds the mutex. The returned guard is
    /// engaged (owns the recorded level) only when `level` admits against
    /// the current level; a disengaged guard still holds the reentrant
    /// mutex for the duration but leaves level management to its outer
    /// acquirer.
    pub fn acquire(&self, level: Level) -> OpGuard<'_> {
        if !locking_on() {
            return OpGuard {
                lock: self,
                _inner: None,
                engaged: false,
            };
        }
        let inner = self.mutex.lock();
        let engaged = level as u8 >= self.held.load(Ordering::Relaxed);
        if engaged {
            self.held.store(level as u8, Ordering::Relaxed);
        }
        OpGuard {
            lock: self,
            _inner: Some(inner),
            engaged,
        }
    }

    /// Enter the critical section at `level` without blocking.
    pub fn try_acquire(&self, level: Level) -> Option<OpGuard<'_>> {
        if !locking_on() {
            return Some(OpGuard {
                lock: self,
                _inner: None,
                engaged: false,
            });
        }
        let inner = self.mutex.try_lock()?;
        let engaged = level as u8 >= self.held.load(Ordering::Relaxed);
        if engaged {
            self.held.store(level as u8, Ordering::Relaxed);
        }
        Some(OpGuard {
            lock: self,
            _inner: Some(inner),
            engaged,
        })
    }

    /// The priority the lock is currently held at; 0 when free.
    #[inline]
    pub fn level(&self) -> u8 {
        self.held.load(Ordering::Relaxed)
    }
}

/// Scoped acquisition of an [`OpLock`]; releases on all exit paths.
pub(crate) struct OpGuard<'a> {
    lock: &'a OpLock,
    _inner: Option<ReentrantMutexGuard<'a, ()>>,
    engaged: bool,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        // Clear the recorded level before the mutex itself is released.
        if self.engaged {
            self.lock.held.store(0, Ordering::Relaxed);
        }
    }
}
