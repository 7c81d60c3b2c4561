use std::fs;
use tempfile::tempdir;

use ecfrag_cli::{
    commands::{frame, join},
    BackendArg, CodingArgs,
};
use ecfrag_core::{constants::HEADER_SIZE, wire::fragments};

const VAND_4_2_8: CodingArgs = CodingArgs {
    backend: BackendArg::JerasureRsVand,
    k: 4,
    m: 2,
    w: 8,
};

#[test]
fn frame_then_join_round_trip() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("in.bin");
    let frag_path = td.path().join("in.ecf");
    let out_path = td.path().join("out.bin");

    let data = b"Erasure coding spreads an object over k data fragments.".to_vec();
    fs::write(&in_path, &data).unwrap();

    frame::execute(
        in_path.to_str().unwrap(),
        frag_path.to_str().unwrap(),
        &VAND_4_2_8,
    )
    .unwrap();
    join::execute(frag_path.to_str().unwrap(), out_path.to_str().unwrap()).unwrap();

    assert_eq!(fs::read(&out_path).unwrap(), data);
}

#[test]
fn join_accepts_any_order() {
    let stream = frame::frame_bytes(b"abcdefgh", &VAND_4_2_8).unwrap();
    let mut pieces: Vec<Vec<u8>> = fragments(&stream)
        .map(|v| v.unwrap().wire_slice().unwrap().to_vec())
        .collect();
    pieces.reverse();

    assert_eq!(join::join_bytes(&pieces.concat()).unwrap(), b"abcdefgh");
}

#[test]
fn join_detects_missing_fragment() {
    let stream = frame::frame_bytes(b"abcdefgh", &VAND_4_2_8).unwrap();
    let pieces: Vec<Vec<u8>> = fragments(&stream)
        .map(|v| v.unwrap().wire_slice().unwrap().to_vec())
        .collect();
    let without_second = [&pieces[0][..], &pieces[2][..], &pieces[3][..]].concat();

    let err = join::join_bytes(&without_second).unwrap_err();
    assert!(err.to_string().contains("Missing fragment index 1"));
}

#[test]
fn join_detects_duplicate_fragment() {
    let stream = frame::frame_bytes(b"abcdefgh", &VAND_4_2_8).unwrap();
    let first = HEADER_SIZE + 2;
    let doubled = [&stream[..], &stream[..first]].concat();

    let err = join::join_bytes(&doubled).unwrap_err();
    assert!(err.to_string().contains("Duplicate fragment index 0"));
}

#[test]
fn join_detects_checksum_mismatch() {
    let mut stream = frame::frame_bytes(b"abcdefgh", &VAND_4_2_8).unwrap().to_vec();
    stream[HEADER_SIZE] ^= 1;

    let err = join::join_bytes(&stream).unwrap_err();
    assert!(err.to_string().contains("checksum"));
}

#[test]
fn join_empty_stream() {
    let err = join::join_bytes(&[]).unwrap_err();
    assert!(err.to_string().contains("No fragments"));
}

#[test]
fn join_detects_orig_size_mismatch() {
    let short = frame::frame_bytes(b"abcd", &VAND_4_2_8).unwrap();
    let long = frame::frame_bytes(b"abcdef", &VAND_4_2_8).unwrap();
    let first = fragments(&short).next().unwrap().unwrap();
    let second = fragments(&long).nth(1).unwrap().unwrap();
    let spliced = [first.wire_slice().unwrap(), second.wire_slice().unwrap()].concat();

    let err = join::join_bytes(&spliced).unwrap_err();
    assert!(err
        .to_string()
        .contains("Fragment 1 claims original size 6, expected 4"));
}

#[test]
fn join_detects_short_payloads() {
    let stream = frame::frame_bytes(b"abcdefgh", &VAND_4_2_8).unwrap();
    let pieces: Vec<Vec<u8>> = fragments(&stream)
        .map(|v| v.unwrap().wire_slice().unwrap().to_vec())
        .collect();
    let without_last = pieces[..3].concat();

    let err = join::join_bytes(&without_last).unwrap_err();
    assert!(err
        .to_string()
        .contains("Fragments hold 6 bytes but the original object is 8 bytes"));
}
