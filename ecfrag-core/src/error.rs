//! Error types for fragment operations

use crate::buffer::FragmentBuffer;
use alloc::string::String;

/// Errors that can occur while reading, writing or sizing fragments
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// Magic number at offset 0 does not match the fragment sentinel
    #[cfg_attr(feature = "std", error("Invalid fragment header: bad magic {found:#010x}"))]
    InvalidHeader {
        /// The value found where the magic should be.
        found: u32,
    },

    /// Buffer cannot hold what the operation needs to read
    #[cfg_attr(feature = "std", error("Buffer too short: expected {expected} bytes, got {actual}"))]
    BufferTooShort {
        /// The number of bytes required.
        expected: usize,
        /// The number of bytes available.
        actual: usize,
    },

    /// No buffer was supplied where one is required
    #[cfg_attr(feature = "std", error("No fragment buffer supplied"))]
    AbsentBuffer,

    /// Header claims more payload than the buffer holds
    #[cfg_attr(feature = "std", error("Payload size {size} exceeds buffer capacity {capacity}"))]
    PayloadExceedsCapacity {
        /// The payload size recorded in the header.
        size: usize,
        /// The payload capacity of the buffer.
        capacity: usize,
    },

    /// Backend parameters cannot produce a usable alignment
    #[cfg_attr(feature = "std", error("Invalid backend arguments: {0}"))]
    InvalidBackendArgs(String),

    /// Size arithmetic overflowed
    #[cfg_attr(feature = "std", error("Size computation overflowed"))]
    SizeOverflow,

    /// Backend name is not recognised
    #[cfg_attr(feature = "std", error("Unknown backend: {0}"))]
    UnknownBackend(String),
}

/// Errors returned by [`crate::buffer::free_fragment`]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug)]
pub enum FreeError {
    /// Nothing to free
    #[cfg_attr(feature = "std", error("No fragment buffer supplied"))]
    Absent,

    /// Buffer no longer carries the magic; it is handed back unreleased
    #[cfg_attr(feature = "std", error("Invalid fragment header: bad magic {found:#010x}"))]
    InvalidHeader {
        /// The value found where the magic should be.
        found: u32,
        /// The rejected buffer.
        buffer: FragmentBuffer,
    },
}

impl FreeError {
    /// Take back the buffer that was refused, if any
    pub fn into_buffer(self) -> Option<FragmentBuffer> {
        match self {
            FreeError::Absent => None,
            FreeError::InvalidHeader { buffer, .. } => Some(buffer),
        }
    }
}
