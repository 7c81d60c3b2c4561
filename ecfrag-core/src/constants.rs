//! Constants for the fragment header layout

/// Sentinel stamped at offset 0 of every fragment buffer
pub const FRAGMENT_HEADER_MAGIC: u32 = 0x0b0c_5ecc;

/// Alignment of every fragment buffer, wide enough for 128-bit register loads
pub const FRAGMENT_ALIGNMENT: usize = 16;

/// Size of the fragment header in bytes
///
/// 4 (magic) + 4 (idx) + 4 (size) + 8 (orig_data_size) + 4 (chksum) + 8 (reserved) = 32 bytes.
/// Kept a multiple of [`FRAGMENT_ALIGNMENT`] so the payload of an aligned buffer is aligned too.
pub const HEADER_SIZE: usize = 32;

/// Byte offset of the magic field
pub const MAGIC_OFFSET: usize = 0;

/// Byte offset of the fragment index field
pub const IDX_OFFSET: usize = 4;

/// Byte offset of the payload size field
pub const SIZE_OFFSET: usize = 8;

/// Byte offset of the original data size field
pub const ORIG_DATA_SIZE_OFFSET: usize = 12;

/// Byte offset of the checksum field
pub const CHKSUM_OFFSET: usize = 20;

/// Byte offset of the reserved tail of the header
pub const RESERVED_OFFSET: usize = 24;

/// Packetization granularity of Cauchy Reed-Solomon backends:
/// the C `long` width in bytes times 128 (1024 on LP64 targets)
pub const PACKET_UNIT: usize = core::mem::size_of::<core::ffi::c_long>() * 128;

const _: () = assert!(HEADER_SIZE % FRAGMENT_ALIGNMENT == 0);
const _: () = assert!(RESERVED_OFFSET + 8 == HEADER_SIZE);
