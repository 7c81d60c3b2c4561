//! # Ecfrag Core
//!
//! Self-describing fragment buffers for erasure-coded data.
//!
//! Every fragment produced by an erasure-coding backend is carried in a
//! buffer that starts with a fixed 32-byte header (magic, index, payload
//! size, original object size, checksum) followed by the payload. This crate
//! owns that layout: it allocates aligned buffers, stamps and validates the
//! header, and hands out typed views so callers never poke raw bytes.
//!
//! ## Modules
//!
//! - `constants`: Header layout, magic and alignment constants
//! - `aligned`: 16-byte aligned zeroed allocations
//! - `scratch`: Plain scratch buffer allocation
//! - `header`: Typed header views over byte slices
//! - `codec`: Checked header accessors with an injectable error sink
//! - `buffer`: Fragment buffer allocation and release
//! - `alignment`: Backend-dependent data alignment
//! - `translate`: Moving between fragment and payload views
//! - `wire`: Iterating concatenated on-wire fragments

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod aligned;
pub mod alignment;
pub mod buffer;
pub mod codec;
pub mod constants;
pub mod error;
pub mod header;
pub mod scratch;
pub mod translate;
pub mod wire;

// Re-export commonly used types
pub use alignment::{aligned_data_size, BackendArgs, BackendId};
pub use buffer::{allocate_fragment, free_fragment, FragmentBuffer};
pub use codec::{validate_fragment, ErrorSink, FragmentCodec, NullSink, TracingSink};
pub use error::{FragmentError, FreeError};
pub use header::{as_fragment_view, as_fragment_view_mut, FragmentHeader, FragmentView, FragmentViewMut};

/// Result type alias for fragment operations
pub type Result<T> = core::result::Result<T, FragmentError>;
