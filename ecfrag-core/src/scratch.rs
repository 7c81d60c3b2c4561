//! Plain scratch buffers
//!
//! For working memory that is not a fragment: no header, no alignment
//! beyond what `Vec` provides. Failure to allocate is reported as `None`.

use alloc::vec::Vec;

/// Allocate a zeroed buffer of `size` bytes
pub fn allocate_zeroed(size: usize) -> Option<Vec<u8>> {
    allocate_filled(size, 0)
}

/// Allocate a buffer of `size` bytes with every byte set to `value`
pub fn allocate_filled(size: usize, value: u8) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(size).ok()?;
    buf.resize(size, value);
    Some(buf)
}

/// Free a buffer if present and leave the slot empty
///
/// ```
/// use ecfrag_core::scratch::{allocate_zeroed, release};
///
/// let mut scratch = allocate_zeroed(64);
/// release(&mut scratch);
/// assert!(scratch.is_none());
///
/// // Releasing an empty slot is a no-op
/// release(&mut scratch);
/// ```
pub fn release(buffer: &mut Option<Vec<u8>>) {
    drop(buffer.take());
}
