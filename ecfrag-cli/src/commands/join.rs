use anyhow::{bail, Context, Result};
use ecfrag_core::wire::fragments;
use std::collections::BTreeMap;
use std::fs;
use tracing::{debug, info};

use super::read_input;

/// Reassemble the original object from its data fragments
///
/// Fragments may appear in any order. Every index from 0 to the highest
/// must be present exactly once, all must agree on the original size, and
/// every payload must match its checksum. Alignment padding is dropped.
pub fn join_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut by_index = BTreeMap::new();
    let mut orig_data_size = None;

    for item in fragments(data) {
        let view = item.context("Unreadable fragment in stream")?;
        let idx = view.index();
        let payload = view.carried_payload()?;

        if crc32c::crc32c(payload) != view.checksum() {
            bail!("Fragment {} fails its checksum", idx);
        }

        match orig_data_size {
            None => orig_data_size = Some(view.orig_data_size()),
            Some(size) if size != view.orig_data_size() => bail!(
                "Fragment {} claims original size {}, expected {}",
                idx,
                view.orig_data_size(),
                size
            ),
            Some(_) => {}
        }

        if by_index.insert(idx, payload).is_some() {
            bail!("Duplicate fragment index {}", idx);
        }
        debug!("Collected fragment {} ({} bytes)", idx, payload.len());
    }

    let Some(orig_data_size) = orig_data_size else {
        bail!("No fragments found");
    };

    for (expected, idx) in by_index.keys().enumerate() {
        if *idx as usize != expected {
            bail!("Missing fragment index {}", expected);
        }
    }

    let mut out: Vec<u8> = by_index.values().flat_map(|p| p.iter().copied()).collect();
    let orig_len = usize::try_from(orig_data_size)?;
    if out.len() < orig_len {
        bail!(
            "Fragments hold {} bytes but the original object is {} bytes",
            out.len(),
            orig_len
        );
    }
    out.truncate(orig_len);

    Ok(out)
}

pub fn execute(input: &str, output: &str) -> Result<()> {
    info!("Joining fragments from {} into {}", input, output);

    let data = read_input(input)?;
    let joined = join_bytes(&data)?;

    fs::write(output, &joined).with_context(|| format!("Failed to write output file: {}", output))?;

    info!("Successfully joined {} bytes", joined.len());
    Ok(())
}
