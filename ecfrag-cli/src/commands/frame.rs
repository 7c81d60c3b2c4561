use crate::CodingArgs;
use anyhow::{bail, Context, Result};
use bytes::{BufMut, BytesMut};
use ecfrag_core::alignment::fragment_payload_size;
use ecfrag_core::constants::HEADER_SIZE;
use ecfrag_core::{allocate_fragment, free_fragment, FragmentCodec, FragmentHeader};
use std::fs;
use tracing::{debug, info};

use super::read_input;

/// Stripe `data` into `k` stamped data fragments and concatenate their wire bytes
///
/// Parity is left to the coding backend; only the systematic fragments are
/// produced. Each payload carries a CRC32C checksum.
pub fn frame_bytes(data: &[u8], coding: &CodingArgs) -> Result<BytesMut> {
    let backend = coding.backend_id();
    let args = coding.backend_args();
    let codec = FragmentCodec::new();

    let per_fragment = fragment_payload_size(backend, &args, data.len())
        .with_context(|| format!("Cannot align {} bytes for {}", data.len(), backend))?;
    let size = u32::try_from(per_fragment)
        .with_context(|| format!("Fragment payload of {} bytes is too large", per_fragment))?;

    if u32::try_from(args.k).is_err() {
        bail!("k={} exceeds the fragment index range", args.k);
    }
    let total = HEADER_SIZE
        .checked_add(per_fragment)
        .and_then(|n| n.checked_mul(args.k))
        .with_context(|| format!("Fragment stream for k={} does not fit in memory", args.k))?;

    debug!("Fragment stream will hold {} bytes", total);

    let mut out = BytesMut::new();

    for i in 0..args.k {
        let Some(mut buf) = allocate_fragment(per_fragment) else {
            bail!("Failed to allocate fragment {} ({} bytes)", i, per_fragment);
        };

        // Bounded by `total`, so these cannot overflow
        let start = (i * per_fragment).min(data.len());
        let end = ((i + 1) * per_fragment).min(data.len());
        buf.payload_mut()[..end - start].copy_from_slice(&data[start..end]);

        let header = FragmentHeader {
            idx: u32::try_from(i)?,
            size,
            orig_data_size: data.len() as u64,
            chksum: crc32c::crc32c(buf.payload()),
        };
        buf.view_mut()?.set_header(&header);

        let wire_size = codec.total_on_wire_size(Some(buf.as_bytes()))?;
        out.put_slice(&buf.wire_bytes()?);
        info!("Framed fragment {} ({} bytes)", i, wire_size);

        free_fragment(Some(buf)).with_context(|| format!("Failed to free fragment {}", i))?;
    }

    Ok(out)
}

pub fn execute(input: &str, output: &str, coding: &CodingArgs) -> Result<()> {
    info!("Framing {} into {}", input, output);

    let data = read_input(input)?;
    let out = frame_bytes(&data, coding)?;

    fs::write(output, &out).with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Successfully framed {} bytes into {} fragments ({} bytes total)",
        data.len(),
        coding.k,
        out.len()
    );

    Ok(())
}
