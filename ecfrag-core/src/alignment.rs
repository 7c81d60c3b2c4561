//! Backend-dependent data alignment
//!
//! Before striping an object into `k` data fragments, callers pad it to a
//! multiple of the backend's block shape:
//!
//! - Cauchy Reed-Solomon (Jerasure): `k * w * PACKET_UNIT`
//! - everything else: `k * (w / 8)`
//!
//! `w` is the word size in bits. The Cauchy rule multiplies by the bit
//! width, not the byte width; that matches what the backend expects on the
//! wire and must not be normalised.

use crate::constants::PACKET_UNIT;
use crate::error::FragmentError;
use alloc::format;
use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Erasure-coding backend identifiers, numbered as liberasurecode numbers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendId {
    /// Pass-through backend with no coding
    Null,
    /// Jerasure Vandermonde Reed-Solomon
    JerasureRsVand,
    /// Jerasure Cauchy Reed-Solomon
    JerasureRsCauchy,
    /// Flat XOR with Hamming distance guarantees
    FlatXorHd,
    /// Intel ISA-L Vandermonde Reed-Solomon
    IsaLRsVand,
    /// NTT Shift-Shift
    Shss,
    /// Built-in Vandermonde Reed-Solomon
    LiberasurecodeRsVand,
    /// Intel ISA-L Cauchy Reed-Solomon
    IsaLRsCauchy,
    /// Phazr.IO
    Libphazr,
}

impl BackendId {
    /// Every known backend
    pub const ALL: [BackendId; 9] = [
        BackendId::Null,
        BackendId::JerasureRsVand,
        BackendId::JerasureRsCauchy,
        BackendId::FlatXorHd,
        BackendId::IsaLRsVand,
        BackendId::Shss,
        BackendId::LiberasurecodeRsVand,
        BackendId::IsaLRsCauchy,
        BackendId::Libphazr,
    ];

    /// Numeric backend id
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Look up a backend by numeric id
    pub fn from_u8(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Canonical backend name
    pub const fn name(&self) -> &'static str {
        match self {
            BackendId::Null => "null",
            BackendId::JerasureRsVand => "jerasure_rs_vand",
            BackendId::JerasureRsCauchy => "jerasure_rs_cauchy",
            BackendId::FlatXorHd => "flat_xor_hd",
            BackendId::IsaLRsVand => "isa_l_rs_vand",
            BackendId::Shss => "shss",
            BackendId::LiberasurecodeRsVand => "liberasurecode_rs_vand",
            BackendId::IsaLRsCauchy => "isa_l_rs_cauchy",
            BackendId::Libphazr => "libphazr",
        }
    }

    /// Whether data must be padded to whole Cauchy packets
    pub const fn uses_cauchy_packets(&self) -> bool {
        matches!(self, BackendId::JerasureRsCauchy)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendId {
    type Err = FragmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name() == s)
            .ok_or_else(|| FragmentError::UnknownBackend(s.to_string()))
    }
}

/// Coding parameters supplied by the backend configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendArgs {
    /// Data fragments
    pub k: usize,
    /// Parity fragments
    pub m: usize,
    /// Word size in bits
    pub w: usize,
}

impl BackendArgs {
    /// Create backend arguments
    pub const fn new(k: usize, m: usize, w: usize) -> Self {
        Self { k, m, w }
    }
}

/// Size of the block an object must be padded to
pub fn alignment_unit(backend: BackendId, args: &BackendArgs) -> Result<usize, FragmentError> {
    if args.k == 0 || args.w == 0 {
        return Err(FragmentError::InvalidBackendArgs(format!(
            "k and w must be non-zero (k={}, w={})",
            args.k, args.w
        )));
    }

    let unit = if backend.uses_cauchy_packets() {
        args.k
            .checked_mul(args.w)
            .and_then(|n| n.checked_mul(PACKET_UNIT))
    } else {
        args.k.checked_mul(args.w / 8)
    };
    let unit = unit.ok_or(FragmentError::SizeOverflow)?;

    if unit == 0 {
        return Err(FragmentError::InvalidBackendArgs(format!(
            "word size of {} bits is smaller than a byte",
            args.w
        )));
    }

    Ok(unit)
}

/// Smallest multiple of the backend's alignment unit that holds `data_len` bytes
///
/// ```
/// use ecfrag_core::alignment::{aligned_data_size, BackendArgs, BackendId};
///
/// let args = BackendArgs::new(4, 2, 8);
/// assert_eq!(aligned_data_size(BackendId::JerasureRsVand, &args, 10).unwrap(), 12);
/// assert_eq!(aligned_data_size(BackendId::JerasureRsVand, &args, 12).unwrap(), 12);
/// ```
pub fn aligned_data_size(
    backend: BackendId,
    args: &BackendArgs,
    data_len: usize,
) -> Result<usize, FragmentError> {
    let unit = alignment_unit(backend, args)?;
    data_len
        .div_ceil(unit)
        .checked_mul(unit)
        .ok_or(FragmentError::SizeOverflow)
}

/// Payload bytes per data fragment once `data_len` is aligned and split across `k`
pub fn fragment_payload_size(
    backend: BackendId,
    args: &BackendArgs,
    data_len: usize,
) -> Result<usize, FragmentError> {
    Ok(aligned_data_size(backend, args, data_len)? / args.k)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RS_4_2_8: BackendArgs = BackendArgs::new(4, 2, 8);

    #[test]
    fn test_vandermonde_alignment() {
        let b = BackendId::JerasureRsVand;
        assert_eq!(alignment_unit(b, &RS_4_2_8).unwrap(), 4);
        assert_eq!(aligned_data_size(b, &RS_4_2_8, 10).unwrap(), 12);
        assert_eq!(aligned_data_size(b, &RS_4_2_8, 12).unwrap(), 12);
        assert_eq!(aligned_data_size(b, &RS_4_2_8, 0).unwrap(), 0);
    }

    #[test]
    fn test_cauchy_alignment() {
        let b = BackendId::JerasureRsCauchy;
        let unit = 4 * 8 * PACKET_UNIT;
        assert_eq!(alignment_unit(b, &RS_4_2_8).unwrap(), unit);
        assert_eq!(aligned_data_size(b, &RS_4_2_8, 1).unwrap(), unit);
        assert_eq!(aligned_data_size(b, &RS_4_2_8, unit + 1).unwrap(), 2 * unit);
    }

    #[cfg(all(unix, target_pointer_width = "64"))]
    #[test]
    fn test_cauchy_unit_on_lp64() {
        let size = aligned_data_size(BackendId::JerasureRsCauchy, &RS_4_2_8, 1).unwrap();
        assert_eq!(size, 32768);
    }

    #[test]
    fn test_isa_l_cauchy_uses_word_alignment() {
        let args = BackendArgs::new(10, 4, 8);
        assert_eq!(alignment_unit(BackendId::IsaLRsCauchy, &args).unwrap(), 10);
    }

    #[test]
    fn test_wide_words() {
        let args = BackendArgs::new(6, 3, 32);
        assert_eq!(alignment_unit(BackendId::FlatXorHd, &args).unwrap(), 24);
        assert_eq!(aligned_data_size(BackendId::FlatXorHd, &args, 25).unwrap(), 48);
    }

    #[test]
    fn test_invalid_args() {
        for args in [
            BackendArgs::new(0, 2, 8),
            BackendArgs::new(4, 2, 0),
            BackendArgs::new(4, 2, 4),
        ] {
            assert!(matches!(
                aligned_data_size(BackendId::JerasureRsVand, &args, 10),
                Err(FragmentError::InvalidBackendArgs(_))
            ));
        }
        // Sub-byte words are fine for Cauchy packets
        let args = BackendArgs::new(4, 2, 4);
        assert!(aligned_data_size(BackendId::JerasureRsCauchy, &args, 10).is_ok());
    }

    #[test]
    fn test_overflow() {
        let args = BackendArgs::new(usize::MAX, 1, 16);
        assert_eq!(
            alignment_unit(BackendId::JerasureRsVand, &args).unwrap_err(),
            FragmentError::SizeOverflow
        );
        let args = BackendArgs::new(4, 2, 8);
        assert_eq!(
            aligned_data_size(BackendId::JerasureRsVand, &args, usize::MAX).unwrap_err(),
            FragmentError::SizeOverflow
        );
    }

    #[test]
    fn test_fragment_payload_size() {
        assert_eq!(
            fragment_payload_size(BackendId::JerasureRsVand, &RS_4_2_8, 10).unwrap(),
            3
        );
    }

    #[test]
    fn test_backend_names() {
        for (i, backend) in BackendId::ALL.iter().enumerate() {
            assert_eq!(backend.as_u8() as usize, i);
            assert_eq!(BackendId::from_u8(i as u8), Some(*backend));
            assert_eq!(backend.name().parse::<BackendId>().unwrap(), *backend);
        }
        assert_eq!(BackendId::from_u8(9), None);
        assert_eq!(
            "reed_solomon".parse::<BackendId>().unwrap_err(),
            FragmentError::UnknownBackend("reed_solomon".to_string())
        );
    }
}
