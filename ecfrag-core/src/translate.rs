//! Moving between fragment and payload views
//!
//! The payload always starts `HEADER_SIZE` bytes after the fragment. These
//! helpers do that step with slicing instead of pointer arithmetic, in both
//! directions, with and without a magic check.

use crate::constants::HEADER_SIZE;
use crate::error::FragmentError;
use crate::header::{as_fragment_view, as_fragment_view_mut, FragmentView};
use alloc::vec::Vec;

fn too_short(actual: usize) -> FragmentError {
    FragmentError::BufferTooShort {
        expected: HEADER_SIZE,
        actual,
    }
}

/// Payload region of a validated fragment
pub fn payload_of(fragment: &[u8]) -> Result<&[u8], FragmentError> {
    Ok(as_fragment_view(fragment)?.payload())
}

/// Writable payload region of a validated fragment
pub fn payload_of_mut(fragment: &mut [u8]) -> Result<&mut [u8], FragmentError> {
    Ok(as_fragment_view_mut(fragment)?.into_payload_mut())
}

/// Payload region without looking at the magic
pub fn payload_of_novalidate(fragment: &[u8]) -> Result<&[u8], FragmentError> {
    fragment
        .get(HEADER_SIZE..)
        .ok_or_else(|| too_short(fragment.len()))
}

/// Writable payload region without looking at the magic
pub fn payload_of_novalidate_mut(fragment: &mut [u8]) -> Result<&mut [u8], FragmentError> {
    let len = fragment.len();
    fragment.get_mut(HEADER_SIZE..).ok_or_else(|| too_short(len))
}

/// Validated fragment whose payload starts at `payload_offset` inside `arena`
///
/// The fragment runs to the end of `arena`. Nothing is logged here; use
/// [`crate::FragmentCodec::fragment_at_payload`] to report a bad magic.
pub fn fragment_at_payload(
    arena: &[u8],
    payload_offset: usize,
) -> Result<FragmentView<'_>, FragmentError> {
    as_fragment_view(fragment_at_payload_novalidate(arena, payload_offset)?)
}

/// Bytes of the fragment whose payload starts at `payload_offset`, unchecked magic
pub fn fragment_at_payload_novalidate(
    arena: &[u8],
    payload_offset: usize,
) -> Result<&[u8], FragmentError> {
    let start = payload_offset
        .checked_sub(HEADER_SIZE)
        .ok_or_else(|| too_short(payload_offset))?;
    arena.get(start..).ok_or(FragmentError::BufferTooShort {
        expected: start,
        actual: arena.len(),
    })
}

/// Map a sparse fragment array to payloads
///
/// Missing fragments stay missing. Returns the payloads and how many were
/// present. The magic is not checked.
///
/// A fragment too short to hold a header is treated as missing and left out
/// of the count. liberasurecode counts every non-null fragment and steps
/// past the header regardless; slicing cannot do that without reading out
/// of bounds, so this deliberately differs.
pub fn payloads_of<'a>(fragments: &[Option<&'a [u8]>]) -> (Vec<Option<&'a [u8]>>, usize) {
    let payloads: Vec<Option<&'a [u8]>> = fragments
        .iter()
        .map(|f| f.and_then(|bytes| payload_of_novalidate(bytes).ok()))
        .collect();
    let present = payloads.iter().filter(|p| p.is_some()).count();
    (payloads, present)
}
