//! Checked header accessors
//!
//! [`FragmentCodec`] is the entry point for code that holds bytes it
//! believes to be a fragment. Every accessor validates the magic first and,
//! on failure, reports through an [`ErrorSink`] and returns the error
//! without reading any other field.

use crate::buffer::{free_fragment_with, FragmentBuffer};
use crate::constants::HEADER_SIZE;
use crate::error::{FragmentError, FreeError};
use crate::header::{as_fragment_view, as_fragment_view_mut, raw_payload_size, FragmentView, FragmentViewMut};
use crate::translate::fragment_at_payload_novalidate;
use alloc::format;

/// Destination for error reports
pub trait ErrorSink {
    /// Record an error message
    fn log_error(&self, message: &str);
}

impl<S: ErrorSink + ?Sized> ErrorSink for &S {
    fn log_error(&self, message: &str) {
        (**self).log_error(message);
    }
}

/// Sink that forwards to `tracing::error!`
///
/// Messages are dropped when the `logging` feature is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn log_error(&self, message: &str) {
        #[cfg(feature = "logging")]
        tracing::error!("{}", message);
        #[cfg(not(feature = "logging"))]
        let _ = message;
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ErrorSink for NullSink {
    fn log_error(&self, _message: &str) {}
}

/// Quick check: does `buf` start with a valid fragment header?
pub fn validate_fragment(buf: &[u8]) -> bool {
    as_fragment_view(buf).is_ok()
}

/// Header accessors that validate on every call
#[derive(Debug, Clone, Default)]
pub struct FragmentCodec<S = TracingSink> {
    sink: S,
}

impl FragmentCodec<TracingSink> {
    /// Codec reporting through `tracing`
    pub fn new() -> Self {
        Self { sink: TracingSink }
    }
}

impl<S: ErrorSink> FragmentCodec<S> {
    /// Codec reporting through `sink`
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    /// The sink this codec reports to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn report(&self, op: &str, err: &FragmentError) {
        self.sink
            .log_error(&format!("invalid fragment header ({}): {:?}", op, err));
    }

    fn view<'a>(&self, buf: &'a [u8], op: &str) -> Result<FragmentView<'a>, FragmentError> {
        as_fragment_view(buf).map_err(|e| {
            self.report(op, &e);
            e
        })
    }

    fn view_mut<'a>(
        &self,
        buf: &'a mut [u8],
        op: &str,
    ) -> Result<FragmentViewMut<'a>, FragmentError> {
        as_fragment_view_mut(buf).map_err(|e| {
            self.report(op, &e);
            e
        })
    }

    /// Validate the header and return a typed view
    ///
    /// Unlike the field accessors this does not report to the sink: a
    /// failed validation is an answer, not a fault.
    pub fn validate<'a, B>(&self, buf: &'a B) -> Result<FragmentView<'a>, FragmentError>
    where
        B: AsRef<[u8]> + ?Sized,
    {
        as_fragment_view(buf.as_ref())
    }

    /// Read the fragment index
    pub fn get_index<B: AsRef<[u8]> + ?Sized>(&self, buf: &B) -> Result<u32, FragmentError> {
        Ok(self.view(buf.as_ref(), "get idx")?.index())
    }

    /// Write the fragment index
    pub fn set_index<B: AsMut<[u8]> + ?Sized>(
        &self,
        buf: &mut B,
        idx: u32,
    ) -> Result<(), FragmentError> {
        self.view_mut(buf.as_mut(), "set idx")?.set_index(idx);
        Ok(())
    }

    /// Read the payload size
    pub fn get_payload_size<B: AsRef<[u8]> + ?Sized>(
        &self,
        buf: &B,
    ) -> Result<u32, FragmentError> {
        Ok(self.view(buf.as_ref(), "get size")?.payload_size())
    }

    /// Write the payload size
    pub fn set_payload_size<B: AsMut<[u8]> + ?Sized>(
        &self,
        buf: &mut B,
        size: u32,
    ) -> Result<(), FragmentError> {
        self.view_mut(buf.as_mut(), "set size")?
            .set_payload_size(size);
        Ok(())
    }

    /// Read the original object size
    pub fn get_orig_data_size<B: AsRef<[u8]> + ?Sized>(
        &self,
        buf: &B,
    ) -> Result<u64, FragmentError> {
        Ok(self.view(buf.as_ref(), "get orig data size")?.orig_data_size())
    }

    /// Write the original object size
    pub fn set_orig_data_size<B: AsMut<[u8]> + ?Sized>(
        &self,
        buf: &mut B,
        orig_data_size: u64,
    ) -> Result<(), FragmentError> {
        self.view_mut(buf.as_mut(), "set orig data size")?
            .set_orig_data_size(orig_data_size);
        Ok(())
    }

    /// Read the payload checksum
    pub fn get_checksum<B: AsRef<[u8]> + ?Sized>(&self, buf: &B) -> Result<u32, FragmentError> {
        Ok(self.view(buf.as_ref(), "get chksum")?.checksum())
    }

    /// Write the payload checksum
    pub fn set_checksum<B: AsMut<[u8]> + ?Sized>(
        &self,
        buf: &mut B,
        chksum: u32,
    ) -> Result<(), FragmentError> {
        self.view_mut(buf.as_mut(), "set chksum")?
            .set_checksum(chksum);
        Ok(())
    }

    /// Header size plus the recorded payload size
    ///
    /// Reads the size field as stored; the magic is not consulted.
    pub fn total_on_wire_size(&self, buf: Option<&[u8]>) -> Result<u64, FragmentError> {
        let buf = buf.ok_or(FragmentError::AbsentBuffer)?;
        let size = raw_payload_size(buf)?;
        Ok(HEADER_SIZE as u64 + u64::from(size))
    }

    /// Validated fragment whose payload starts at `payload_offset` inside `arena`
    ///
    /// Same as [`crate::translate::fragment_at_payload`], but a bad magic is
    /// reported to the sink.
    pub fn fragment_at_payload<'a>(
        &self,
        arena: &'a [u8],
        payload_offset: usize,
    ) -> Result<FragmentView<'a>, FragmentError> {
        self.view(
            fragment_at_payload_novalidate(arena, payload_offset)?,
            "get header ptr",
        )
    }

    /// Release a fragment buffer after checking its header
    ///
    /// See [`crate::buffer::free_fragment`].
    pub fn free_fragment(&self, buffer: Option<FragmentBuffer>) -> Result<(), FreeError> {
        free_fragment_with(buffer, &self.sink)
    }
}
