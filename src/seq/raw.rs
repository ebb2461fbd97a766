use std::alloc::{self, handle_alloc_error, Layout};
use std::marker::PhantomData;
use std::mem::size_of;
use std::ptr::NonNull;

use crate::error::Error;

/// Owns the sequence's backing allocation: a base pointer plus a reserved
/// element count. This is the `start` / `end_of_storage` half of the classic
/// pointer trio; the live length rides along in [`Sequence`] itself.
///
/// `RawBuf` never looks at the memory it manages. Dropping it releases the
/// allocation without running any element destructors; element lifecycles
/// are entirely the owner's problem. Capacity is at least 1 from the moment
/// of construction, so there is no dangling state to special-case.
///
/// [`Sequence`]: crate::Sequence
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

impl<T> RawBuf<T> {
    fn layout(cap: usize) -> Layout {
        // The element policy requires a positive width.
        assert!(
            size_of::<T>() != 0,
            "zero-width element types are not supported"
        );
        Layout::array::<T>(cap).unwrap_or_else(|_| {
            panic!("{}", Error::AllocationFailure(size_of::<T>().saturating_mul(cap)))
        })
    }

    pub fn allocate(cap: usize) -> Self {
        debug_assert!(cap >= 1);
        let layout = Self::layout(cap);
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = match NonNull::new(raw as *mut T) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        };
        RawBuf { ptr, cap, _marker: PhantomData }
    }

    /// Like [`allocate`](Self::allocate), but the reserved bytes start out
    /// zeroed (the shrink path of `resize_fill` wants fresh storage).
    pub fn allocate_zeroed(cap: usize) -> Self {
        debug_assert!(cap >= 1);
        let layout = Self::layout(cap);
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = match NonNull::new(raw as *mut T) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        };
        RawBuf { ptr, cap, _marker: PhantomData }
    }

    /// Grow or shrink the reservation to exactly `new_cap` elements. Bytes of
    /// the surviving prefix are preserved; anything past it is gone. The
    /// caller must already have destroyed elements that fall off the end.
    pub fn reallocate(&mut self, new_cap: usize) {
        debug_assert!(new_cap >= 1);
        if new_cap == self.cap {
            return;
        }
        let old_layout = Self::layout(self.cap);
        let new_layout = Self::layout(new_cap);
        let raw = unsafe {
            alloc::realloc(self.ptr.as_ptr() as *mut u8, old_layout, new_layout.size())
        };
        match NonNull::new(raw as *mut T) {
            Some(p) => {
                self.ptr = p;
                self.cap = new_cap;
            }
            None => handle_alloc_error(new_layout),
        }
    }

    /// Adopt a caller-provided allocation of `cap` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and must have been allocated by the global
    /// allocator with the layout of `[T; cap]`. Ownership transfers here; the
    /// caller must not free it independently afterwards.
    pub unsafe fn adopt(ptr: *mut T, cap: usize) -> Self {
        debug_assert!(!ptr.is_null() && cap >= 1);
        RawBuf {
            ptr: NonNull::new_unchecked(ptr),
            cap,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        let layout = Self::layout(self.cap);
        unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) }
    }
}
