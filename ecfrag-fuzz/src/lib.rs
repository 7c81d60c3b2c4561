//! Fuzzing entry points for ecfrag-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_parse

use ecfrag_core::{FragmentCodec, NullSink};

pub fn fuzz_parse(data: &[u8]) {
    use ecfrag_core::{as_fragment_view, translate::payload_of};

    // Parsing arbitrary bytes must never panic
    if let Ok(view) = as_fragment_view(data) {
        let _ = view.header();
        let _ = view.carried_payload();
        let _ = view.wire_slice();
    }
    let _ = payload_of(data);
}

pub fn fuzz_walk(data: &[u8]) {
    use ecfrag_core::wire::fragments;

    // Walking a stream must terminate without panicking
    for view in fragments(data).flatten() {
        let _ = view.carried_payload();
    }
}

pub fn fuzz_accessors(data: &[u8]) {
    let codec = FragmentCodec::with_sink(NullSink);
    let mut bytes = data.to_vec();

    let _ = codec.get_index(bytes.as_slice());
    let _ = codec.set_checksum(bytes.as_mut_slice(), 0);
    let _ = codec.total_on_wire_size(Some(&bytes));
}
