//! The cursor protocol over [`Sequence`] storage.
//!
//! Two layers, split the same way as the containers' own safe/raw APIs:
//! [`RawCursor`] is a detached `Copy` value carrying the container address
//! and an element slot in `[0, len]` (the end sentinel is `len`); anything
//! that reads through the container pointer is `unsafe`. [`Cursor`] wraps a
//! raw cursor together with a borrow of the sequence, which makes the whole
//! protocol safe and doubles as an iterator.
//!
//! Detached cursors do not survive mutation: any insert, erase, resize,
//! reserve, shrink or clear invalidates every cursor previously minted from
//! the container. Operations consuming a cursor re-validate it against the
//! receiving container, so a stale cursor surfaces as
//! [`OutOfRange`](Error::OutOfRange) or
//! [`InconsistentCursorPair`](Error::InconsistentCursorPair) rather than
//! anything worse, but the position it names after surviving validation is
//! whatever now lives in that slot.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;

use crate::error::{Error, Result};
use crate::policy::Element;

use super::Sequence;

/// Detached cursor: container address plus element slot.
pub struct RawCursor<T: Element> {
    seq: NonNull<Sequence<T>>,
    at: usize,
}

impl<T: Element> RawCursor<T> {
    pub(crate) fn new(seq: &Sequence<T>, at: usize) -> Self {
        RawCursor { seq: NonNull::from(seq), at }
    }

    /// The slot this cursor names, counted from the container's start. This
    /// is the "distance from a lone cursor" query: the numeric index.
    #[inline]
    pub fn index(&self) -> usize {
        self.at
    }

    /// Byte width of the elements being iterated, from the policy.
    pub fn element_width(&self) -> usize {
        T::WIDTH
    }

    /// Whether `other` addresses the same container as `self`.
    pub fn same_container(&self, other: &Self) -> bool {
        self.seq == other.seq
    }

    pub(crate) fn belongs_to(&self, seq: &Sequence<T>) -> bool {
        std::ptr::eq(self.seq.as_ptr(), seq)
    }

    /// Signed element-count difference `last − first`. The pair must address
    /// a single container.
    pub fn distance(first: &Self, last: &Self) -> Result<isize> {
        if !first.same_container(last) {
            return Err(Error::InconsistentCursorPair);
        }
        Ok(last.at as isize - first.at as isize)
    }

    /// Cursor at the container's first slot.
    pub fn start(&self) -> Self {
        RawCursor { seq: self.seq, at: 0 }
    }

    /// The container this cursor points into.
    ///
    /// # Safety
    ///
    /// The container must still be live at its original address.
    pub unsafe fn container(&self) -> &Sequence<T> {
        &*self.seq.as_ptr()
    }

    /// Cursor at the container's end sentinel.
    ///
    /// # Safety
    ///
    /// As [`container`](Self::container).
    pub unsafe fn finish(&self) -> Self {
        RawCursor { seq: self.seq, at: self.container().len() }
    }

    /// Element under the cursor, or `None` at the end sentinel.
    ///
    /// # Safety
    ///
    /// As [`container`](Self::container), and the borrow must not outlive
    /// the next mutation.
    pub unsafe fn current(&self) -> Option<&T> {
        self.container().as_slice().get(self.at)
    }

    /// Whether one forward step stays inside `[0, len]`.
    ///
    /// # Safety
    ///
    /// As [`container`](Self::container).
    pub unsafe fn has_next(&self) -> bool {
        self.at < self.container().len()
    }

    pub fn has_prev(&self) -> bool {
        self.at > 0
    }

    /// A new cursor one step forward.
    ///
    /// # Safety
    ///
    /// As [`container`](Self::container).
    pub unsafe fn forward(&self) -> Result<Self> {
        self.forward_by(1)
    }

    /// A new cursor `n` steps forward; [`OutOfRange`](Error::OutOfRange)
    /// past the end sentinel.
    ///
    /// # Safety
    ///
    /// As [`container`](Self::container).
    pub unsafe fn forward_by(&self, n: usize) -> Result<Self> {
        let len = self.container().len();
        match self.at.checked_add(n) {
            Some(at) if at <= len => Ok(RawCursor { seq: self.seq, at }),
            _ => Err(Error::OutOfRange),
        }
    }

    /// A new cursor one step back; [`OutOfRange`](Error::OutOfRange) before
    /// the first slot.
    pub fn back(&self) -> Result<Self> {
        self.back_by(1)
    }

    /// A new cursor `n` steps back.
    pub fn back_by(&self, n: usize) -> Result<Self> {
        if n > self.at {
            return Err(Error::OutOfRange);
        }
        Ok(RawCursor { seq: self.seq, at: self.at - n })
    }

    /// Shift this cursor in place by a signed element count.
    ///
    /// # Safety
    ///
    /// As [`container`](Self::container).
    pub unsafe fn advance(&mut self, delta: isize) -> Result<()> {
        *self = if delta >= 0 {
            self.forward_by(delta as usize)?
        } else {
            self.back_by(delta.unsigned_abs())?
        };
        Ok(())
    }

    /// In-place single forward step.
    ///
    /// # Safety
    ///
    /// As [`container`](Self::container).
    pub unsafe fn step_forward(&mut self) -> Result<()> {
        *self = self.forward()?;
        Ok(())
    }

    /// In-place single backward step.
    pub fn step_back(&mut self) -> Result<()> {
        *self = self.back()?;
        Ok(())
    }
}

impl<T: Element> Clone for RawCursor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Element> Copy for RawCursor<T> {}

impl<T: Element> PartialEq for RawCursor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq && self.at == other.at
    }
}

impl<T: Element> Eq for RawCursor<T> {}

impl<T: Element> fmt::Debug for RawCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawCursor")
            .field("container", &self.seq.as_ptr())
            .field("at", &self.at)
            .finish()
    }
}

/// Borrow-carrying cursor: the safe face of the protocol. While one of these
/// is alive the container cannot be mutated, so every raw operation becomes
/// safe, and the cursor itself iterates the remaining elements.
pub struct Cursor<'a, T: Element> {
    inner: RawCursor<T>,
    _marker: PhantomData<&'a Sequence<T>>,
}

impl<'a, T: Element> Cursor<'a, T> {
    pub(crate) fn new(seq: &'a Sequence<T>, at: usize) -> Self {
        Cursor { inner: RawCursor::new(seq, at), _marker: PhantomData }
    }

    fn wrap(&self, inner: RawCursor<T>) -> Self {
        Cursor { inner, _marker: PhantomData }
    }

    /// Detach into a [`RawCursor`], e.g. to hand a position to a mutating
    /// operation once this borrow ends.
    pub fn raw(&self) -> RawCursor<T> {
        self.inner
    }

    /// The sequence this cursor walks.
    pub fn container(&self) -> &'a Sequence<T> {
        // The PhantomData borrow keeps the container alive and frozen for
        // 'a, so the unbounded deref is anchored correctly.
        unsafe { &*self.inner.seq.as_ptr() }
    }

    /// Element under the cursor, or `None` at the end sentinel.
    pub fn current(&self) -> Option<&'a T> {
        self.container().as_slice().get(self.inner.at)
    }

    pub fn has_next(&self) -> bool {
        unsafe { self.inner.has_next() }
    }

    pub fn has_prev(&self) -> bool {
        self.inner.has_prev()
    }

    pub fn forward(&self) -> Result<Self> {
        unsafe { self.inner.forward() }.map(|c| self.wrap(c))
    }

    pub fn forward_by(&self, n: usize) -> Result<Self> {
        unsafe { self.inner.forward_by(n) }.map(|c| self.wrap(c))
    }

    pub fn back(&self) -> Result<Self> {
        self.inner.back().map(|c| self.wrap(c))
    }

    pub fn back_by(&self, n: usize) -> Result<Self> {
        self.inner.back_by(n).map(|c| self.wrap(c))
    }

    pub fn advance(&mut self, delta: isize) -> Result<()> {
        unsafe { self.inner.advance(delta) }
    }

    pub fn step_forward(&mut self) -> Result<()> {
        unsafe { self.inner.step_forward() }
    }

    pub fn step_back(&mut self) -> Result<()> {
        self.inner.step_back()
    }

    /// Cursor at the container's first slot.
    pub fn start(&self) -> Self {
        self.wrap(self.inner.start())
    }

    /// Cursor at the container's end sentinel.
    pub fn finish(&self) -> Self {
        self.wrap(unsafe { self.inner.finish() })
    }

    /// Signed element-count difference `other − self`.
    pub fn distance_to(&self, other: &Cursor<'_, T>) -> Result<isize> {
        RawCursor::distance(&self.inner, &other.inner)
    }
}

impl<'a, T: Element> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Element> Copy for Cursor<'a, T> {}

impl<'a, T: Element> Deref for Cursor<'a, T> {
    type Target = RawCursor<T>;

    fn deref(&self) -> &RawCursor<T> {
        &self.inner
    }
}

impl<'a, T: Element> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.inner).finish()
    }
}

impl<'a, T: Element> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let v = self.current()?;
        self.inner.at += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.container().len().saturating_sub(self.inner.at);
        (remaining, Some(remaining))
    }
}
