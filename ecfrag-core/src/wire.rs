//! Iterating concatenated on-wire fragments
//!
//! Storage and transport write each fragment as exactly
//! `total_on_wire_size` bytes, back to back. [`fragments`] walks such a
//! stream and yields one validated view per fragment.

use crate::error::FragmentError;
use crate::header::{as_fragment_view, FragmentView};
#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Iterate the fragments in `data`
pub fn fragments(data: &[u8]) -> WireFragments<'_> {
    #[cfg(feature = "logging")]
    debug!("Walking fragment stream of {} bytes", data.len());

    WireFragments {
        data,
        offset: 0,
        failed: false,
    }
}

/// Iterator over a fragment stream
///
/// Stops after the first error: once a header is unreadable there is no
/// way to know where the next fragment starts.
#[derive(Debug, Clone)]
pub struct WireFragments<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> WireFragments<'a> {
    /// Offset of the next fragment in the stream
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_fragment(&mut self) -> Result<FragmentView<'a>, FragmentError> {
        let data = self.data;
        let rest = &data[self.offset..];
        let view = as_fragment_view(rest)?;
        let wire_size = view.wire_size()?;

        if wire_size > rest.len() {
            return Err(FragmentError::BufferTooShort {
                expected: wire_size,
                actual: rest.len(),
            });
        }

        let view = as_fragment_view(&rest[..wire_size])?;
        self.offset += wire_size;
        Ok(view)
    }
}

impl<'a> Iterator for WireFragments<'a> {
    type Item = Result<FragmentView<'a>, FragmentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let result = self.next_fragment();
        if let Err(_e) = &result {
            #[cfg(feature = "logging")]
            warn!("Bad fragment at offset {}: {:?}", self.offset, _e);
            self.failed = true;
        }
        Some(result)
    }
}
