//! Dynamic arrays with bidirectional growth and priority locking.
//!
//! A [`BiVec`] is a homogeneous, index-addressable sequence backed by a
//! buffer with independent front and back headroom, giving amortized O(1)
//! insertion at both ends. Beyond the usual sequence operations it offers:
//!
//! - a fixed-capacity **circular** mode where insertions overwrite,
//! - optional **secure wiping** of element memory on removal or overwrite
//!   (via `zeroize` or a custom callback),
//! - a **by-reference** storage discipline holding borrowed pointers,
//! - thread-safe micro-transactions under a three-tier priority lock, and
//! - data-manipulation operations: three-way quicksort, adaptive binary
//!   search with positional memory, rotation, swapping, bulk apply,
//!   copying, moving, and merging.
//!
//! ```
//! use bivec::BiVec;
//!
//! let v = BiVec::<u32>::with_capacity(8);
//! v.push(2)?;
//! v.push(3)?;
//! v.add_front(1)?;
//! assert_eq!(v.size(), 3);
//! assert_eq!(v.get_at(0)?, 1);
//! v.sort(u32::cmp);
//! assert_eq!(v.bsearch(&3, u32::cmp), Ok(2));
//! # Ok::<(), bivec::Error>(())
//! ```

#![warn(missing_docs)]

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
struct _ReadmeDoctests;

pub(crate) mod error;

pub(crate) mod lock;

pub mod store;

pub mod vec;

pub use self::error::Error;
pub use self::lock::{locking_disable, locking_enable};
pub use self::store::{ByRef, ByValue, StoreDup, StoreMode};
pub use self::vec::{BiVec, LockGuard};
