use anyhow::{Context, Result};
use colored::*;
use ecfrag_core::wire::fragments;
use ecfrag_core::FragmentHeader;
use serde::Serialize;
use std::fs;
use tracing::{info, warn};

use super::read_input;

/// What one fragment in a stream looks like
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentReport {
    /// Byte offset of the fragment in the stream
    pub offset: usize,
    #[serde(flatten)]
    pub header: FragmentHeader,
    pub wire_size: usize,
    pub checksum_ok: bool,
}

/// Walk a fragment stream and check every payload checksum
pub fn inspect_bytes(data: &[u8]) -> Result<Vec<FragmentReport>> {
    let mut reports = Vec::new();
    let mut walker = fragments(data);

    loop {
        let offset = walker.offset();
        let Some(item) = walker.next() else {
            break;
        };
        let view = item.with_context(|| format!("Unreadable fragment at offset {}", offset))?;
        let payload = view.carried_payload()?;

        let checksum_ok = crc32c::crc32c(payload) == view.checksum();
        if !checksum_ok {
            warn!("Fragment {} at offset {} fails its checksum", view.index(), offset);
        }

        reports.push(FragmentReport {
            offset,
            header: view.header(),
            wire_size: view.wire_size()?,
            checksum_ok,
        });
    }

    Ok(reports)
}

pub fn execute(input: &str, json_out: Option<&str>) -> Result<()> {
    info!("Inspecting fragments in {}", input);

    let data = read_input(input)?;
    let reports = inspect_bytes(&data)?;

    if reports.is_empty() {
        println!("{} No fragments found", "✗".red());
        return Ok(());
    }

    println!("\n=== Fragments ===");
    for r in &reports {
        let status = if r.checksum_ok { "✓".green() } else { "✗".red() };
        println!(
            "{} idx={:<4} offset={:<10} size={:<10} orig={:<12} chksum={:08x}",
            status,
            r.header.idx,
            r.offset,
            r.header.size,
            r.header.orig_data_size,
            r.header.chksum
        );
    }

    let bad = reports.iter().filter(|r| !r.checksum_ok).count();
    println!("\n=== Summary ===");
    println!("Total fragments:    {}", reports.len());
    if bad > 0 {
        println!("Checksum failures:  {}", bad.to_string().red());
    } else {
        println!("Checksum failures:  {}", bad.to_string().green());
    }

    if let Some(path) = json_out {
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(path, json).with_context(|| format!("Failed to write JSON report: {}", path))?;
        info!("Wrote report to {}", path);
    }

    Ok(())
}
