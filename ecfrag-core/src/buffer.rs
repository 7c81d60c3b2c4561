//! Fragment buffer allocation and release

use crate::aligned::{allocate_aligned, AlignedBuf};
use crate::codec::{ErrorSink, TracingSink};
use crate::constants::{FRAGMENT_HEADER_MAGIC, HEADER_SIZE};
use crate::error::{FragmentError, FreeError};
use crate::header::{as_fragment_view, as_fragment_view_mut, magic_of, stamp, FragmentView, FragmentViewMut};
use bytes::Bytes;
use core::fmt;
#[cfg(feature = "logging")]
use tracing::debug;

/// An aligned buffer holding a fragment header followed by its payload
///
/// Created by [`allocate_fragment`], which stamps the header. The bytes are
/// freely writable, so the header can be clobbered; the typed accessors
/// report that instead of trusting it.
pub struct FragmentBuffer {
    buf: AlignedBuf,
}

/// Allocate a stamped fragment buffer with room for `payload_size` bytes
///
/// The buffer starts on a 16-byte boundary and is zeroed apart from the
/// magic. Returns `None` if the allocation fails or the total size overflows.
pub fn allocate_fragment(payload_size: usize) -> Option<FragmentBuffer> {
    let total = HEADER_SIZE.checked_add(payload_size)?;
    let mut buf = allocate_aligned(total)?;

    // Cannot fail: `total >= HEADER_SIZE`.
    stamp(buf.as_mut_slice()).ok()?;

    #[cfg(feature = "logging")]
    debug!("Allocated fragment buffer with {} payload bytes", payload_size);

    Some(FragmentBuffer { buf })
}

/// Release a fragment buffer after checking its header
///
/// `None` is an error: freeing is expected to act on a real buffer. A buffer
/// whose magic has been overwritten is logged and handed back inside
/// [`FreeError::InvalidHeader`] rather than released.
pub fn free_fragment(buffer: Option<FragmentBuffer>) -> Result<(), FreeError> {
    free_fragment_with(buffer, &TracingSink)
}

pub(crate) fn free_fragment_with<S: ErrorSink + ?Sized>(
    buffer: Option<FragmentBuffer>,
    sink: &S,
) -> Result<(), FreeError> {
    let buffer = buffer.ok_or(FreeError::Absent)?;

    let magic = magic_of(buffer.as_bytes()).unwrap_or_default();
    if magic != FRAGMENT_HEADER_MAGIC {
        sink.log_error("invalid fragment header (free fragment)");
        return Err(FreeError::InvalidHeader {
            found: magic,
            buffer,
        });
    }

    #[cfg(feature = "logging")]
    debug!("Releasing fragment buffer of {} bytes", buffer.len());

    drop(buffer);
    Ok(())
}

impl FragmentBuffer {
    /// Total bytes: header plus payload capacity
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Always false: a fragment buffer holds at least a header
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Start address of the buffer
    pub fn as_ptr(&self) -> *const u8 {
        self.buf.as_ptr()
    }

    /// Raw bytes, header included
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Raw mutable bytes, header included
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut_slice()
    }

    /// Validated read-only view
    pub fn view(&self) -> Result<FragmentView<'_>, FragmentError> {
        as_fragment_view(self.as_bytes())
    }

    /// Validated writable view
    pub fn view_mut(&mut self) -> Result<FragmentViewMut<'_>, FragmentError> {
        as_fragment_view_mut(self.as_bytes_mut())
    }

    /// Bytes available for payload
    pub fn payload_capacity(&self) -> usize {
        self.len() - HEADER_SIZE
    }

    /// The payload region
    pub fn payload(&self) -> &[u8] {
        &self.as_bytes()[HEADER_SIZE..]
    }

    /// The payload region, writable
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.as_bytes_mut()[HEADER_SIZE..]
    }

    /// Copy out the header and the recorded payload for storage or transport
    pub fn wire_bytes(&self) -> Result<Bytes, FragmentError> {
        let view = self.view()?;
        Ok(Bytes::copy_from_slice(view.wire_slice()?))
    }
}

impl AsRef<[u8]> for FragmentBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsMut<[u8]> for FragmentBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_bytes_mut()
    }
}

impl fmt::Debug for FragmentBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentBuffer")
            .field("len", &self.len())
            .field("magic", &magic_of(self.as_bytes()))
            .finish()
    }
}
