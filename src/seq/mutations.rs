//! Mutating operations on [`Sequence`]: push/pop, positional insertion and
//! erasure, match removal, container swap, merge and reverse.
//!
//! Growth policy: a full rear insertion doubles the capacity; bulk
//! insertions that would overflow grow to `2 * (capacity + delta)`. Every
//! cursor handed in is validated against the receiving container before
//! anything moves; a cursor minted elsewhere is an
//! [`InconsistentCursorPair`](Error::InconsistentCursorPair) at the boundary.

use std::cmp::Ordering;
use std::ptr;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::policy::Element;

use super::cursor::{Cursor, RawCursor};
use super::Sequence;

impl<T: Element> Sequence<T> {
    /// Append `value`, doubling the capacity when the reserved storage is
    /// exhausted.
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity() {
            let doubled = self.capacity() * 2;
            self.grow_to(doubled);
        }
        unsafe { ptr::write(self.as_mut_ptr().add(self.len), value) };
        self.len += 1;
    }

    /// Retire the rear element. `None` on an empty sequence; otherwise the
    /// element comes back to the caller, whose drop runs the policy destroy.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(unsafe { ptr::read(self.as_ptr().add(self.len)) })
    }

    /// Insert `value` at `pos`, shifting `[pos, len)` one slot right.
    /// Returns a cursor to the inserted position.
    pub fn insert(&mut self, pos: RawCursor<T>, value: T) -> Result<RawCursor<T>> {
        let at = self.position_of(&pos, true)?;
        if self.len == self.capacity() {
            let doubled = self.capacity() * 2;
            self.grow_to(doubled);
        }
        unsafe {
            let base = self.as_mut_ptr();
            ptr::copy(base.add(at), base.add(at + 1), self.len - at);
            ptr::write(base.add(at), value);
        }
        self.len += 1;
        Ok(RawCursor::new(self, at))
    }

    /// Insert `n` clones of `value` at `pos`. Returns a cursor to the first
    /// inserted slot.
    pub fn insert_fill(&mut self, pos: RawCursor<T>, n: usize, value: &T) -> Result<RawCursor<T>> {
        let at = self.position_of(&pos, true)?;
        // Stage the clones first: the container is only reshaped once every
        // policy copy has already succeeded.
        let staged: SmallVec<[T; 8]> = (0..n).map(|_| value.clone()).collect();
        self.splice_in(at, staged);
        Ok(RawCursor::new(self, at))
    }

    /// Insert clones of the half-open range `[first, last)` at `pos`. The
    /// range cursors must agree on a source container; the borrow rules keep
    /// that source distinct from the receiver.
    pub fn insert_range(
        &mut self,
        pos: RawCursor<T>,
        first: Cursor<'_, T>,
        last: Cursor<'_, T>,
    ) -> Result<RawCursor<T>> {
        let at = self.position_of(&pos, true)?;
        let span = first.distance_to(&last)?;
        if span < 0 || last.index() > first.container().len() {
            return Err(Error::OutOfRange);
        }
        let src = &first.container().as_slice()[first.index()..last.index()];
        let staged: SmallVec<[T; 8]> = src.iter().cloned().collect();
        self.splice_in(at, staged);
        Ok(RawCursor::new(self, at))
    }

    /// Erase the element at `pos`, shifting the tail left. Returns a cursor
    /// to the slot now holding the former successor. The rear element
    /// delegates to [`pop`](Sequence::pop).
    pub fn erase(&mut self, pos: RawCursor<T>) -> Result<RawCursor<T>> {
        let at = self.position_of(&pos, false)?;
        if at == self.len - 1 {
            let _ = self.pop();
        } else {
            unsafe {
                let base = self.as_mut_ptr();
                ptr::drop_in_place(base.add(at));
                ptr::copy(base.add(at + 1), base.add(at), self.len - at - 1);
            }
            self.len -= 1;
        }
        Ok(RawCursor::new(self, at))
    }

    /// Erase the half-open range `[pos, last)`. Returns a cursor to where the
    /// range began.
    pub fn erase_range(&mut self, pos: RawCursor<T>, last: RawCursor<T>) -> Result<RawCursor<T>> {
        if !pos.same_container(&last) {
            return Err(Error::InconsistentCursorPair);
        }
        let lo = self.position_of(&pos, true)?;
        let hi = self.position_of(&last, true)?;
        if hi < lo {
            return Err(Error::OutOfRange);
        }
        let delta = hi - lo;
        if delta > 0 {
            unsafe {
                let base = self.as_mut_ptr();
                if T::NEEDS_DROP {
                    for i in lo..hi {
                        ptr::drop_in_place(base.add(i));
                    }
                }
                ptr::copy(base.add(hi), base.add(lo), self.len - hi);
            }
            self.len -= delta;
        }
        Ok(RawCursor::new(self, lo))
    }

    /// Index-keyed insertion.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<()> {
        if index > self.len {
            return Err(Error::IndexOutOfBounds { index, size: self.len });
        }
        let pos = RawCursor::new(self, index);
        self.insert(pos, value)?;
        Ok(())
    }

    /// Index-keyed erasure; the retired element comes back out.
    pub fn erase_at(&mut self, index: usize) -> Result<T> {
        if index >= self.len {
            return Err(Error::IndexOutOfBounds { index, size: self.len });
        }
        let value = unsafe { ptr::read(self.as_ptr().add(index)) };
        unsafe {
            let base = self.as_mut_ptr();
            ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
        }
        self.len -= 1;
        Ok(value)
    }

    /// Replace the element at `index`, returning the displaced value.
    pub fn replace_at(&mut self, index: usize, value: T) -> Result<T> {
        let slot = self.at_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Exchange the elements at `i` and `j` in place.
    pub fn swap_elements(&mut self, i: usize, j: usize) -> Result<()> {
        let size = self.len;
        if i >= size {
            return Err(Error::IndexOutOfBounds { index: i, size });
        }
        if j >= size {
            return Err(Error::IndexOutOfBounds { index: j, size });
        }
        self.as_mut_slice().swap(i, j);
        Ok(())
    }

    /// Erase every element comparing equal to `value`; returns how many went.
    pub fn remove(&mut self, value: &T) -> usize {
        self.remove_if(|e| e.cmp(value) == Ordering::Equal)
    }

    /// Erase every element the predicate holds for; returns how many went.
    pub fn remove_if<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        // Single back-shifting pass. The length is poisoned to zero while
        // holes exist; the guard repairs it, so a panicking predicate leaves
        // a shorter-but-valid sequence instead of double-dropping.
        struct Backshift<'a, T: Element> {
            seq: &'a mut Sequence<T>,
            processed: usize,
            kept: usize,
            old_len: usize,
        }

        impl<T: Element> Drop for Backshift<'_, T> {
            fn drop(&mut self) {
                unsafe {
                    let base = self.seq.as_mut_ptr();
                    let unprocessed = self.old_len - self.processed;
                    if unprocessed > 0 && self.kept != self.processed {
                        ptr::copy(base.add(self.processed), base.add(self.kept), unprocessed);
                    }
                    self.seq.len = self.kept + unprocessed;
                }
            }
        }

        let old_len = self.len;
        self.len = 0;
        let mut g = Backshift { seq: self, processed: 0, kept: 0, old_len };
        while g.processed < g.old_len {
            unsafe {
                let base = g.seq.as_mut_ptr();
                let slot = base.add(g.processed);
                if pred(&*slot) {
                    g.processed += 1;
                    ptr::drop_in_place(slot);
                } else {
                    if g.kept != g.processed {
                        ptr::copy_nonoverlapping(slot, base.add(g.kept), 1);
                    }
                    g.processed += 1;
                    g.kept += 1;
                }
            }
        }
        drop(g);
        old_len - self.len
    }

    /// Exchange storage, length and capacity with `other` in one step.
    pub fn swap_with(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Destroy every live element (rear first), scrub the reserved storage
    /// to zero bytes, and reset the length. Capacity is untouched.
    pub fn clear(&mut self) {
        unsafe {
            self.destroy_tail(0);
            ptr::write_bytes(self.as_mut_ptr() as *mut u8, 0, self.capacity() * T::WIDTH);
        }
        self.len = 0;
    }

    /// Append everything in `other` onto the rear of `self`. `other` ends up
    /// empty but keeps its capacity; ownership of its elements moves here.
    pub fn merge(&mut self, other: &mut Self) {
        let delta = other.len;
        if delta == 0 {
            return;
        }
        if self.len + delta > self.capacity() {
            let target = 2 * (self.capacity() + delta);
            self.grow_to(target);
        }
        unsafe {
            ptr::copy_nonoverlapping(other.as_ptr(), self.as_mut_ptr().add(self.len), delta);
        }
        self.len += delta;
        other.len = 0;
    }

    /// In-place reversal by pairwise exchange from both ends.
    pub fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    /// Replace the contents with `n` clones of `value`. Capacity only
    /// changes when the new contents would not fit.
    pub fn assign_fill(&mut self, n: usize, value: &T) {
        unsafe { self.destroy_tail(0) };
        self.len = 0;
        if n > self.capacity() {
            self.grow_to(n);
        }
        for _ in 0..n {
            unsafe { ptr::write(self.as_mut_ptr().add(self.len), value.clone()) };
            self.len += 1;
        }
    }

    /// Replace the contents with clones of `[first, last)`.
    pub fn assign_range(&mut self, first: Cursor<'_, T>, last: Cursor<'_, T>) -> Result<()> {
        let span = first.distance_to(&last)?;
        if span < 0 || last.index() > first.container().len() {
            return Err(Error::OutOfRange);
        }
        unsafe { self.destroy_tail(0) };
        self.len = 0;
        let src = &first.container().as_slice()[first.index()..last.index()];
        if src.len() > self.capacity() {
            self.grow_to(src.len());
        }
        for v in src {
            unsafe { ptr::write(self.as_mut_ptr().add(self.len), v.clone()) };
            self.len += 1;
        }
        Ok(())
    }

    /// Check a cursor against this container and return its slot. With
    /// `sentinel_ok` the one-past-the-end position is accepted.
    fn position_of(&self, pos: &RawCursor<T>, sentinel_ok: bool) -> Result<usize> {
        if !pos.belongs_to(self) {
            return Err(Error::InconsistentCursorPair);
        }
        let at = pos.index();
        let limit = if sentinel_ok { self.len } else { self.len.wrapping_sub(1) };
        if self.len == 0 && !sentinel_ok {
            return Err(Error::OutOfRange);
        }
        if at > limit {
            return Err(Error::OutOfRange);
        }
        Ok(at)
    }

    /// Shift `[at, len)` right and move the staged elements into the gap,
    /// growing by the bulk rule (`2 * (capacity + delta)`) if the reserved
    /// tail is too small. Nothing here can unwind, so the gap never leaks
    /// out.
    fn splice_in(&mut self, at: usize, staged: SmallVec<[T; 8]>) {
        let delta = staged.len();
        if delta == 0 {
            return;
        }
        if self.len + delta > self.capacity() {
            let target = 2 * (self.capacity() + delta);
            self.grow_to(target);
        }
        unsafe {
            let base = self.as_mut_ptr();
            ptr::copy(base.add(at), base.add(at + delta), self.len - at);
        }
        for (i, v) in staged.into_iter().enumerate() {
            unsafe { ptr::write(self.as_mut_ptr().add(at + i), v) };
        }
        self.len += delta;
    }
}
