use std::fs;
use tempfile::tempdir;

use ecfrag_cli::{commands::frame, BackendArg, CodingArgs};
use ecfrag_core::{constants::HEADER_SIZE, wire::fragments};

fn coding(backend: BackendArg, k: usize, m: usize, w: usize) -> CodingArgs {
    CodingArgs { backend, k, m, w }
}

#[test]
fn frame_file_into_four_fragments() {
    let td = tempdir().unwrap();
    let in_path = td.path().join("object.bin");
    let out_path = td.path().join("object.ecf");

    let data: Vec<u8> = (0..=255u8).cycle().take(1001).collect();
    fs::write(&in_path, &data).unwrap();

    frame::execute(
        in_path.to_str().unwrap(),
        out_path.to_str().unwrap(),
        &coding(BackendArg::JerasureRsVand, 4, 2, 8),
    )
    .unwrap();

    let bytes = fs::read(&out_path).unwrap();
    let views: Vec<_> = fragments(&bytes).collect::<Result<_, _>>().unwrap();

    // 1001 aligns to 1004 for k=4, w=8
    assert_eq!(views.len(), 4);
    assert_eq!(bytes.len(), 4 * (HEADER_SIZE + 251));
    for (i, view) in views.iter().enumerate() {
        assert_eq!(view.index() as usize, i);
        assert_eq!(view.payload_size(), 251);
        assert_eq!(view.orig_data_size(), 1001);
        assert_eq!(crc32c::crc32c(view.carried_payload().unwrap()), view.checksum());
    }

    // Padding is zero
    assert_eq!(&views[3].payload()[248..], &[0, 0, 0]);
}

#[test]
fn frame_cauchy_pads_to_packets() {
    let data = b"tiny";
    let out = frame::frame_bytes(data, &coding(BackendArg::JerasureRsCauchy, 2, 1, 8)).unwrap();

    let unit = 2 * 8 * ecfrag_core::constants::PACKET_UNIT;
    assert_eq!(out.len(), 2 * HEADER_SIZE + unit);

    let first = fragments(&out).next().unwrap().unwrap();
    assert_eq!(first.payload_size() as usize, unit / 2);
    assert_eq!(&first.carried_payload().unwrap()[..4], b"tiny");
}

#[test]
fn frame_empty_input() {
    let out = frame::frame_bytes(&[], &coding(BackendArg::FlatXorHd, 3, 3, 32)).unwrap();

    let views: Vec<_> = fragments(&out).collect::<Result<_, _>>().unwrap();
    assert_eq!(views.len(), 3);
    assert!(views.iter().all(|v| v.payload_size() == 0 && v.orig_data_size() == 0));
}

#[test]
fn frame_rejects_sub_byte_words() {
    let err = frame::frame_bytes(b"abc", &coding(BackendArg::JerasureRsVand, 4, 2, 4)).unwrap_err();
    assert!(err.to_string().contains("Cannot align"));
}

#[test]
fn frame_rejects_huge_k() {
    for k in [1usize << 62, u32::MAX as usize + 1] {
        let err = frame::frame_bytes(b"x", &coding(BackendArg::JerasureRsVand, k, 2, 8)).unwrap_err();
        assert!(err.to_string().contains("exceeds the fragment index range"));
    }
}

#[test]
fn frame_more_fragments_than_bytes() {
    let out = frame::frame_bytes(b"ab", &coding(BackendArg::JerasureRsVand, 5, 2, 8)).unwrap();

    let views: Vec<_> = fragments(&out).collect::<Result<_, _>>().unwrap();
    assert_eq!(views.len(), 5);
    assert_eq!(out.len(), 5 * (HEADER_SIZE + 1));
    assert_eq!(views[1].carried_payload().unwrap(), b"b");
    assert_eq!(views[4].carried_payload().unwrap(), &[0]);
}

#[test]
fn frame_missing_input_file() {
    let td = tempdir().unwrap();
    let result = frame::execute(
        td.path().join("nope.bin").to_str().unwrap(),
        td.path().join("out.ecf").to_str().unwrap(),
        &coding(BackendArg::JerasureRsVand, 4, 2, 8),
    );
    assert!(result.is_err());
}
