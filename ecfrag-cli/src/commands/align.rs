use crate::CodingArgs;
use anyhow::{Context, Result};
use ecfrag_core::alignment::{aligned_data_size, alignment_unit};
use ecfrag_core::{BackendArgs, BackendId};
use serde::Serialize;
use tracing::debug;

/// Alignment figures for one object size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignReport {
    pub backend: BackendId,
    pub args: BackendArgs,
    pub data_len: usize,
    pub alignment_unit: usize,
    pub aligned_len: usize,
    pub fragment_payload: usize,
    pub padding: usize,
}

pub fn compute(coding: &CodingArgs, data_len: usize) -> Result<AlignReport> {
    let backend = coding.backend_id();
    let args = coding.backend_args();

    let unit = alignment_unit(backend, &args)
        .with_context(|| format!("Cannot align for backend {}", backend))?;
    let aligned_len = aligned_data_size(backend, &args, data_len)
        .with_context(|| format!("Cannot align {} bytes", data_len))?;

    debug!(
        "{}: unit {} aligns {} bytes to {}",
        backend, unit, data_len, aligned_len
    );

    Ok(AlignReport {
        backend,
        args,
        data_len,
        alignment_unit: unit,
        aligned_len,
        fragment_payload: aligned_len / args.k,
        padding: aligned_len - data_len,
    })
}

pub fn execute(coding: &CodingArgs, data_len: usize, json: bool) -> Result<()> {
    let report = compute(coding, data_len)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Backend:            {}", report.backend);
    println!(
        "Parameters:         k={} m={} w={}",
        report.args.k, report.args.m, report.args.w
    );
    println!("Alignment unit:     {}", report.alignment_unit);
    println!("Data length:        {}", report.data_len);
    println!("Aligned length:     {}", report.aligned_len);
    println!("Padding:            {}", report.padding);
    println!("Fragment payload:   {}", report.fragment_payload);

    Ok(())
}
