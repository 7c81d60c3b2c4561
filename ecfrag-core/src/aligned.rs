//! Zeroed allocations on a 16-byte boundary
//!
//! Erasure-coding backends load fragment data into 128-bit registers, so
//! every buffer they touch must start on a [`FRAGMENT_ALIGNMENT`] boundary.
//! Allocation failure is reported as `None`; it never aborts the process.

use crate::constants::FRAGMENT_ALIGNMENT;
use alloc::alloc::{alloc_zeroed, dealloc, Layout};
use core::fmt;
use core::ptr::NonNull;

/// Owned, zero-initialised, 16-byte aligned byte buffer
pub struct AlignedBuf {
    ptr: NonNull<u8>,
    len: usize,
    layout: Layout,
}

// SAFETY: `AlignedBuf` uniquely owns its allocation, like `Box<[u8]>`.
unsafe impl Send for AlignedBuf {}
// SAFETY: shared access only hands out `&[u8]`.
unsafe impl Sync for AlignedBuf {}

/// Allocate `size` zeroed bytes aligned to [`FRAGMENT_ALIGNMENT`]
///
/// Returns `None` if the allocator refuses the request or `size` cannot be
/// described by a [`Layout`]. A zero-size request yields an empty buffer.
pub fn allocate_aligned(size: usize) -> Option<AlignedBuf> {
    // Zero-size allocations are not allowed through the global allocator.
    let layout = Layout::from_size_align(size.max(1), FRAGMENT_ALIGNMENT).ok()?;

    // SAFETY: `layout` has a non-zero size.
    let raw = unsafe { alloc_zeroed(layout) };
    let ptr = NonNull::new(raw)?;

    Some(AlignedBuf {
        ptr,
        len: size,
        layout,
    })
}

impl AlignedBuf {
    /// Number of usable bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Start address of the buffer
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Borrow the buffer contents
    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: `ptr` is valid for `len` initialised bytes for the lifetime of `self`.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Mutably borrow the buffer contents
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for AlignedBuf {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc_zeroed` with exactly `layout`.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

impl AsRef<[u8]> for AlignedBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for AlignedBuf {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl fmt::Debug for AlignedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}
