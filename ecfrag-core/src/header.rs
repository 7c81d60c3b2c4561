//! Typed views over the fragment header
//!
//! A fragment buffer starts with a 32-byte little-endian header:
//!
//! ```text
//! offset  0: magic           u32  (0x0b0c5ecc)
//! offset  4: idx             u32
//! offset  8: size            u32  payload bytes carried
//! offset 12: orig_data_size  u64  length of the original object
//! offset 20: chksum          u32
//! offset 24: reserved        [u8; 8]
//! offset 32: payload
//! ```
//!
//! [`FragmentView`] and [`FragmentViewMut`] can only be built from bytes
//! whose magic has been checked, so their accessors never check again.

use crate::constants::{
    CHKSUM_OFFSET, FRAGMENT_HEADER_MAGIC, HEADER_SIZE, IDX_OFFSET, MAGIC_OFFSET,
    ORIG_DATA_SIZE_OFFSET, SIZE_OFFSET,
};
use crate::error::FragmentError;
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

/// Decoded copy of the mutable header fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentHeader {
    /// Position of the fragment in its encoded set (0-based)
    pub idx: u32,

    /// Payload bytes carried by the fragment
    pub size: u32,

    /// Length of the original object the set reconstructs to
    pub orig_data_size: u64,

    /// Payload checksum, opaque to this crate
    pub chksum: u32,
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    (&bytes[at..]).get_u32_le()
}

fn read_u64(bytes: &[u8], at: usize) -> u64 {
    (&bytes[at..]).get_u64_le()
}

fn write_u32(bytes: &mut [u8], at: usize, value: u32) {
    (&mut bytes[at..]).put_u32_le(value);
}

fn write_u64(bytes: &mut [u8], at: usize, value: u64) {
    (&mut bytes[at..]).put_u64_le(value);
}

/// Read the magic field without judging it
///
/// Returns `None` if `bytes` is too short to hold one.
pub fn magic_of(bytes: &[u8]) -> Option<u32> {
    (bytes.len() >= MAGIC_OFFSET + 4).then(|| read_u32(bytes, MAGIC_OFFSET))
}

/// Read the payload size field without checking the magic
pub(crate) fn raw_payload_size(bytes: &[u8]) -> Result<u32, FragmentError> {
    if bytes.len() < HEADER_SIZE {
        return Err(FragmentError::BufferTooShort {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }
    Ok(read_u32(bytes, SIZE_OFFSET))
}

fn check_header(bytes: &[u8]) -> Result<(), FragmentError> {
    if bytes.len() < HEADER_SIZE {
        return Err(FragmentError::BufferTooShort {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    let magic = read_u32(bytes, MAGIC_OFFSET);
    if magic != FRAGMENT_HEADER_MAGIC {
        return Err(FragmentError::InvalidHeader { found: magic });
    }

    Ok(())
}

/// Validate `bytes` as a fragment and borrow it as a read-only view
pub fn as_fragment_view(bytes: &[u8]) -> Result<FragmentView<'_>, FragmentError> {
    check_header(bytes)?;
    Ok(FragmentView { bytes })
}

/// Validate `bytes` as a fragment and borrow it as a writable view
pub fn as_fragment_view_mut(bytes: &mut [u8]) -> Result<FragmentViewMut<'_>, FragmentError> {
    check_header(bytes)?;
    Ok(FragmentViewMut { bytes })
}

/// Write a fresh header at the start of `bytes`
///
/// Sets the magic and zeroes every other header field. The payload region
/// is left untouched.
pub fn stamp(bytes: &mut [u8]) -> Result<FragmentViewMut<'_>, FragmentError> {
    if bytes.len() < HEADER_SIZE {
        return Err(FragmentError::BufferTooShort {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        });
    }

    bytes[..HEADER_SIZE].fill(0);
    write_u32(bytes, MAGIC_OFFSET, FRAGMENT_HEADER_MAGIC);

    Ok(FragmentViewMut { bytes })
}

/// Read-only view of a validated fragment
#[derive(Debug, Clone, Copy)]
pub struct FragmentView<'a> {
    bytes: &'a [u8],
}

impl<'a> FragmentView<'a> {
    /// Fragment index
    pub fn index(&self) -> u32 {
        read_u32(self.bytes, IDX_OFFSET)
    }

    /// Payload size recorded in the header
    pub fn payload_size(&self) -> u32 {
        read_u32(self.bytes, SIZE_OFFSET)
    }

    /// Original object size recorded in the header
    pub fn orig_data_size(&self) -> u64 {
        read_u64(self.bytes, ORIG_DATA_SIZE_OFFSET)
    }

    /// Payload checksum
    pub fn checksum(&self) -> u32 {
        read_u32(self.bytes, CHKSUM_OFFSET)
    }

    /// Snapshot of all header fields
    pub fn header(&self) -> FragmentHeader {
        FragmentHeader {
            idx: self.index(),
            size: self.payload_size(),
            orig_data_size: self.orig_data_size(),
            chksum: self.checksum(),
        }
    }

    /// Bytes the fragment occupies on disk or on the wire: header plus recorded payload
    ///
    /// Fails with [`FragmentError::SizeOverflow`] when the recorded size does
    /// not fit the address space.
    pub fn wire_size(&self) -> Result<usize, FragmentError> {
        usize::try_from(self.payload_size())
            .ok()
            .and_then(|size| size.checked_add(HEADER_SIZE))
            .ok_or(FragmentError::SizeOverflow)
    }

    /// The whole payload region, regardless of the recorded size
    pub fn payload(&self) -> &'a [u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// Bytes available for payload
    pub fn payload_capacity(&self) -> usize {
        self.bytes.len() - HEADER_SIZE
    }

    /// The first `size` bytes of the payload region
    pub fn carried_payload(&self) -> Result<&'a [u8], FragmentError> {
        let size = self.payload_size() as usize;
        let capacity = self.payload_capacity();
        if size > capacity {
            return Err(FragmentError::PayloadExceedsCapacity { size, capacity });
        }
        Ok(&self.payload()[..size])
    }

    /// The header and the recorded payload, exactly as they go on the wire
    pub fn wire_slice(&self) -> Result<&'a [u8], FragmentError> {
        let payload = self.carried_payload()?;
        Ok(&self.bytes[..HEADER_SIZE + payload.len()])
    }

    /// The underlying bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// Writable view of a validated fragment
#[derive(Debug)]
pub struct FragmentViewMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> FragmentViewMut<'a> {
    /// Reborrow as a read-only view
    pub fn as_view(&self) -> FragmentView<'_> {
        FragmentView { bytes: self.bytes }
    }

    /// Fragment index
    pub fn index(&self) -> u32 {
        self.as_view().index()
    }

    /// Payload size recorded in the header
    pub fn payload_size(&self) -> u32 {
        self.as_view().payload_size()
    }

    /// Original object size recorded in the header
    pub fn orig_data_size(&self) -> u64 {
        self.as_view().orig_data_size()
    }

    /// Payload checksum
    pub fn checksum(&self) -> u32 {
        self.as_view().checksum()
    }

    /// Snapshot of all header fields
    pub fn header(&self) -> FragmentHeader {
        self.as_view().header()
    }

    /// Set the fragment index
    pub fn set_index(&mut self, idx: u32) {
        write_u32(self.bytes, IDX_OFFSET, idx);
    }

    /// Set the payload size
    pub fn set_payload_size(&mut self, size: u32) {
        write_u32(self.bytes, SIZE_OFFSET, size);
    }

    /// Set the original object size
    pub fn set_orig_data_size(&mut self, orig_data_size: u64) {
        write_u64(self.bytes, ORIG_DATA_SIZE_OFFSET, orig_data_size);
    }

    /// Set the payload checksum
    pub fn set_checksum(&mut self, chksum: u32) {
        write_u32(self.bytes, CHKSUM_OFFSET, chksum);
    }

    /// Write every field of `header` at once
    pub fn set_header(&mut self, header: &FragmentHeader) {
        self.set_index(header.idx);
        self.set_payload_size(header.size);
        self.set_orig_data_size(header.orig_data_size);
        self.set_checksum(header.chksum);
    }

    /// Mutable access to the whole payload region
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[HEADER_SIZE..]
    }

    /// Give up the header and keep the payload borrow
    pub fn into_payload_mut(self) -> &'a mut [u8] {
        let bytes = self.bytes;
        &mut bytes[HEADER_SIZE..]
    }

    /// Bytes available for payload
    pub fn payload_capacity(&self) -> usize {
        self.bytes.len() - HEADER_SIZE
    }
}
