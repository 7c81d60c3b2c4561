//! Property-based tests using proptest

use ecfrag_core::{
    aligned_data_size, allocate_fragment, as_fragment_view,
    alignment::alignment_unit,
    constants::{FRAGMENT_ALIGNMENT, HEADER_SIZE},
    free_fragment, validate_fragment,
    wire::fragments,
    BackendArgs, BackendId, FragmentCodec, NullSink,
};
use proptest::prelude::*;

fn backend() -> impl Strategy<Value = BackendId> {
    prop::sample::select(BackendId::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_allocated_fragments_are_aligned_and_valid(size in 0usize..65536) {
        let buf = allocate_fragment(size).unwrap();

        prop_assert_eq!(buf.as_ptr() as usize % FRAGMENT_ALIGNMENT, 0);
        prop_assert!(validate_fragment(buf.as_bytes()));
        prop_assert_eq!(buf.payload_capacity(), size);
        prop_assert!(free_fragment(Some(buf)).is_ok());
    }

    #[test]
    fn prop_header_fields_round_trip(
        idx in any::<u32>(),
        size in any::<u32>(),
        orig in any::<u64>(),
        chksum in any::<u32>(),
    ) {
        let codec = FragmentCodec::with_sink(NullSink);
        let mut buf = allocate_fragment(0).unwrap();

        codec.set_index(&mut buf, idx).unwrap();
        codec.set_payload_size(&mut buf, size).unwrap();
        codec.set_orig_data_size(&mut buf, orig).unwrap();
        codec.set_checksum(&mut buf, chksum).unwrap();

        prop_assert_eq!(codec.get_index(&buf).unwrap(), idx);
        prop_assert_eq!(codec.get_payload_size(&buf).unwrap(), size);
        prop_assert_eq!(codec.get_orig_data_size(&buf).unwrap(), orig);
        prop_assert_eq!(codec.get_checksum(&buf).unwrap(), chksum);
        prop_assert_eq!(
            codec.total_on_wire_size(Some(buf.as_bytes())).unwrap(),
            HEADER_SIZE as u64 + u64::from(size)
        );
    }

    #[test]
    fn prop_aligned_size_is_minimal_multiple(
        backend in backend(),
        k in 1usize..32,
        m in 0usize..16,
        w in prop::sample::select(vec![8usize, 16, 32]),
        data_len in 0usize..1_000_000,
    ) {
        let args = BackendArgs::new(k, m, w);
        let unit = alignment_unit(backend, &args).unwrap();
        let aligned = aligned_data_size(backend, &args, data_len).unwrap();

        prop_assert!(aligned >= data_len);
        prop_assert_eq!(aligned % unit, 0);
        prop_assert!(aligned < data_len + unit);
    }

    #[test]
    fn prop_parse_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = as_fragment_view(&data);
        for item in fragments(&data) {
            let _ = item.map(|v| v.carried_payload());
        }
    }
}
