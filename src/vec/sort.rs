//! Sorting and adaptive searching over the live range.

use core::cmp::Ordering;
use core::mem;

use crate::error::Error;
use crate::lock::Level;
use crate::store::StoreMode;

use super::BiVec;

/// Three-way-partition quicksort over slot handles.
///
/// Partitions around the high element into `<`, `==`, and `>` regions and
/// recurses only into the non-equal regions, so duplicate-heavy inputs do
/// not degrade. Recursion takes the smaller side; the larger side is
/// handled iteratively to bound stack depth.
fn sort_three_way<S, F>(mut live: &mut [S], cmp: &mut F)
where
    F: FnMut(&S, &S) -> Ordering,
{
    loop {
        let n = live.len();
        if n < 2 {
            return;
        }
        let pivot = n - 1;
        let mut lt = 0;
        let mut gt = pivot;
        let mut k = 0;
        while k < gt {
            match cmp(&live[k], &live[pivot]) {
                Ordering::Less => {
                    live.swap(lt, k);
                    lt += 1;
                    k += 1;
                }
                Ordering::Greater => {
                    gt -= 1;
                    live.swap(k, gt);
                }
                Ordering::Equal => {
                    k += 1;
                }
            }
        }
        // Move the pivot into the equal region: [0, lt) < p, [lt, gt] == p,
        // (gt, n) > p.
        live.swap(gt, pivot);
        let gt = gt + 1;

        let rest = mem::take(&mut live);
        let (left, mid_right) = rest.split_at_mut(lt);
        let (_equal, right) = mid_right.split_at_mut(gt - lt);
        if left.len() < right.len() {
            sort_three_way(left, cmp);
            live = right;
        } else {
            sort_three_way(right, cmp);
            live = left;
        }
    }
}

/// Adaptive binary search with positional hysteresis.
///
/// `against` reports the ordering of the search key relative to a slot.
/// Unless the drift estimator or the size rules it out, probing starts at
/// the previous result (`bottom`) and expands outward in doubling steps,
/// then finishes with a monobound binary search inside the bracketed
/// window. Returns the matching index, or the insertion index on a miss.
fn adaptive_search<S, F>(
    live: &[S],
    mut against: F,
    balance: &mut usize,
    bottom: &mut usize,
) -> Result<usize, usize>
where
    F: FnMut(&S) -> Ordering,
{
    let size = live.len();
    let mut bot;
    let mut top;
    if *balance >= 32 || size <= 64 || *bottom >= size {
        bot = 0;
        top = size;
    } else {
        bot = *bottom;
        top = 32;
        if against(&live[bot]) != Ordering::Less {
            // Key at or above the last position: expand toward the tail.
            loop {
                if bot + top >= size {
                    top = size - bot;
                    break;
                }
                bot += top;
                if against(&live[bot]) == Ordering::Less {
                    bot -= top;
                    break;
                }
                top *= 2;
            }
        } else {
            loop {
                if bot < top {
                    top = bot;
                    bot = 0;
                    break;
                }
                bot -= top;
                if against(&live[bot]) != Ordering::Less {
                    break;
                }
                top *= 2;
            }
        }
    }
    while top > 3 {
        let mid = top / 2;
        if against(&live[bot + mid]) != Ordering::Less {
            bot += mid;
        }
        top -= mid;
    }
    *balance = bottom.abs_diff(bot);
    *bottom = bot;
    while top > 0 {
        top -= 1;
        match against(&live[bot + top]) {
            Ordering::Equal => return Ok(bot + top),
            Ordering::Greater => return Err(bot + top + 1),
            Ordering::Less => (),
        }
    }
    Err(bot)
}

impl<T, M: StoreMode<T>> BiVec<T, M> {
    /// Sort the elements with the given comparator.
    pub fn sort<F>(&self, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.with(Level::Primitive, |core| {
            if core.size() <= 1 {
                return;
            }
            let mut slot_cmp = |a: &M::Slot, b: &M::Slot| cmp(M::elem(a), M::elem(b));
            sort_three_way(core.live_mut(), &mut slot_cmp);
        });
    }

    /// Binary-search a sorted vector for `key` with the comparator used to
    /// sort it. Returns `Ok(index)` of a matching element (any match, for
    /// ties), or `Err(index)` with the position where the key would be
    /// inserted to preserve the order.
    ///
    /// The search is adaptive: the vector remembers the last result and
    /// localizes the next probe around it, which also makes this a
    /// mutating operation internally (it runs under the vector's lock).
    pub fn bsearch<F>(&self, key: &T, mut cmp: F) -> Result<usize, usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.with(Level::Primitive, |core| {
            if core.size() == 0 {
                return Err(0);
            }
            let mut balance = core.balance;
            let mut bottom = core.bottom;
            let result = {
                let live = core.live();
                adaptive_search(
                    live,
                    |slot| cmp(key, M::elem(slot)),
                    &mut balance,
                    &mut bottom,
                )
            };
            core.balance = balance;
            core.bottom = bottom;
            result
        })
    }

    /// Insert `value` into a vector kept sorted under `cmp`.
    ///
    /// Appends directly when the vector is empty or the value sorts after
    /// the current tail; otherwise the insertion point is located with the
    /// adaptive search.
    pub fn add_ordered<F>(&self, value: M::Slot, mut cmp: F) -> Result<(), Error>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let _guard = self.op_lock().acquire(Level::Composite);
        // SAFETY: the composite lock is held for the whole operation; the
        // nested primitives re-enter it without releasing.
        let append = {
            let core = unsafe { self.core_unlocked() };
            let size = core.size();
            size == 0
                || cmp(M::elem(&value), M::elem(&core.live()[size - 1])) == Ordering::Greater
        };
        if append {
            return self.push(value);
        }
        let index = {
            let core = unsafe { self.core_unlocked() };
            let mut balance = core.balance;
            let mut bottom = core.bottom;
            let found = {
                let live = core.live();
                adaptive_search(
                    live,
                    |slot| cmp(M::elem(&value), M::elem(slot)),
                    &mut balance,
                    &mut bottom,
                )
            };
            core.balance = balance;
            core.bottom = bottom;
            match found {
                Ok(index) | Err(index) => index,
            }
        };
        self.add_at(value, index)
    }
}
