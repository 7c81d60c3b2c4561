//! Library entry for ecfrag-cli used by integration tests and embedding.

pub mod commands;

// Re-export commands for convenience
pub use commands::*;

use ecfrag_core::{BackendArgs, BackendId};

/// Backend choice on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// No coding
    #[value(name = "null")]
    Null,
    /// Jerasure Vandermonde Reed-Solomon
    #[value(name = "jerasure_rs_vand")]
    JerasureRsVand,
    /// Jerasure Cauchy Reed-Solomon
    #[value(name = "jerasure_rs_cauchy")]
    JerasureRsCauchy,
    /// Flat XOR
    #[value(name = "flat_xor_hd")]
    FlatXorHd,
    /// ISA-L Vandermonde Reed-Solomon
    #[value(name = "isa_l_rs_vand")]
    IsaLRsVand,
    /// NTT Shift-Shift
    #[value(name = "shss")]
    Shss,
    /// Built-in Vandermonde Reed-Solomon
    #[value(name = "liberasurecode_rs_vand")]
    LiberasurecodeRsVand,
    /// ISA-L Cauchy Reed-Solomon
    #[value(name = "isa_l_rs_cauchy")]
    IsaLRsCauchy,
    /// Phazr.IO
    #[value(name = "libphazr")]
    Libphazr,
}

impl From<BackendArg> for BackendId {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Null => BackendId::Null,
            BackendArg::JerasureRsVand => BackendId::JerasureRsVand,
            BackendArg::JerasureRsCauchy => BackendId::JerasureRsCauchy,
            BackendArg::FlatXorHd => BackendId::FlatXorHd,
            BackendArg::IsaLRsVand => BackendId::IsaLRsVand,
            BackendArg::Shss => BackendId::Shss,
            BackendArg::LiberasurecodeRsVand => BackendId::LiberasurecodeRsVand,
            BackendArg::IsaLRsCauchy => BackendId::IsaLRsCauchy,
            BackendArg::Libphazr => BackendId::Libphazr,
        }
    }
}

/// Coding parameters shared by commands that size or stripe data
#[derive(Copy, Clone, Debug, clap::Args)]
pub struct CodingArgs {
    /// Erasure-coding backend
    #[arg(long, value_enum, default_value_t = BackendArg::JerasureRsVand)]
    pub backend: BackendArg,

    /// Number of data fragments
    #[arg(short, default_value_t = 4)]
    pub k: usize,

    /// Number of parity fragments
    #[arg(short, default_value_t = 2)]
    pub m: usize,

    /// Word size in bits
    #[arg(short, default_value_t = 8)]
    pub w: usize,
}

impl CodingArgs {
    /// Backend identity
    pub fn backend_id(&self) -> BackendId {
        self.backend.into()
    }

    /// Backend parameters
    pub fn backend_args(&self) -> BackendArgs {
        BackendArgs::new(self.k, self.m, self.w)
    }
}
