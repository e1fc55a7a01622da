use crate::descriptor::Layout;
use crate::error::PackError;
use crate::packer::*;

/// Lay out `(f32, f32, i32)` records the way a C struct would sit in memory.
fn native_2f1i(records: &[(f32, f32, i32)]) -> Vec<u8> {
    let mut out = Vec::new();
    for &(a, b, c) in records {
        out.extend_from_slice(&a.to_ne_bytes());
        out.extend_from_slice(&b.to_ne_bytes());
        out.extend_from_slice(&c.to_ne_bytes());
    }
    out
}

fn drain(packer: &mut RawDataPacker<'_>, chunk: usize) -> Vec<u8> {
    let mut buf = vec![0u8; chunk];
    let mut out = Vec::new();
    while packer.has_next() {
        let n = packer.next_chunk(&mut buf);
        assert!(n > 0);
        out.extend_from_slice(&buf[..n]);
    }
    out
}

#[test]
fn test_pack_dense_records() {
    let layout = Layout::parse("2f1i").unwrap();
    let src = native_2f1i(&[(1.5, -2.0, 7), (0.0, 3.25, -1)]);
    let mut packer = RawDataPacker::new(&src, &layout).unwrap();
    assert_eq!(packer.remaining_records(), 2);

    let packed = drain(&mut packer, 1024);
    let mut expected = Vec::new();
    for (a, b, c) in [(1.5f32, -2.0f32, 7i32), (0.0, 3.25, -1)] {
        expected.extend_from_slice(&a.to_bits().to_le_bytes());
        expected.extend_from_slice(&b.to_bits().to_le_bytes());
        expected.extend_from_slice(&c.to_le_bytes());
    }
    assert_eq!(packed, expected);
    assert!(!packer.has_next());
    assert_eq!(packer.remaining_records(), 0);
}

#[test]
fn test_pack_drops_native_padding() {
    // Native record "ud": u at 0, 7 bytes padding, d at 8 -> 16 bytes.
    let layout = Layout::parse("ud").unwrap();
    let mut src = vec![0xEEu8; 16];
    src[0] = 0x42;
    src[8..16].copy_from_slice(&2.0f64.to_ne_bytes());

    let mut packer = RawDataPacker::new(&src, &layout).unwrap();
    let packed = drain(&mut packer, 64);
    assert_eq!(packed.len(), 9);
    assert_eq!(packed[0], 0x42);
    assert_eq!(&packed[1..], &2.0f64.to_bits().to_le_bytes());
}

#[test]
fn test_pack_chunk_stops_on_element_boundary() {
    let layout = Layout::parse("3u").unwrap();
    let src: Vec<u8> = (0..30).collect();
    let mut packer = RawDataPacker::new(&src, &layout).unwrap();

    let mut buf = [0u8; 8];
    assert_eq!(packer.next_chunk(&mut buf), 8);
    assert_eq!(&buf, &[0, 1, 2, 3, 4, 5, 6, 7]);
    // Record 2 is only partly packed.
    assert_eq!(packer.remaining_records(), 8);

    let rest = drain(&mut packer, 8);
    assert_eq!(rest, (8..30).collect::<Vec<u8>>());
}

#[test]
fn test_pack_never_splits_an_element() {
    let layout = Layout::parse("d").unwrap();
    let src: Vec<u8> = 1.25f64.to_ne_bytes().repeat(3);
    let mut packer = RawDataPacker::new(&src, &layout).unwrap();

    let mut buf = [0u8; 12];
    assert_eq!(packer.next_chunk(&mut buf), 8);
    assert_eq!(&buf[..8], &1.25f64.to_bits().to_le_bytes());
    assert_eq!(packer.remaining_records(), 2);
}

#[test]
fn test_pack_record_wider_than_chunk() {
    let layout = Layout::parse("300d").unwrap();
    let values: Vec<f64> = (0..600).map(|i| i as f64 / 3.0).collect();
    let src: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
    let mut packer = RawDataPacker::new(&src, &layout).unwrap();
    assert_eq!(packer.remaining_records(), 2);

    let packed = drain(&mut packer, 1024);
    let expected: Vec<u8> = values.iter().flat_map(|v| v.to_bits().to_le_bytes()).collect();
    assert_eq!(packed, expected);
}

#[test]
fn test_pack_chunk_size_does_not_change_output() {
    let layout = Layout::parse("c2ws").unwrap();
    let src: Vec<u8> = (0..=255u8).cycle().take(layout.record_size() * 50).collect();

    let mut a = RawDataPacker::new(&src, &layout).unwrap();
    let mut b = RawDataPacker::new(&src, &layout).unwrap();
    let mut c = RawDataPacker::new(&src, &layout).unwrap();
    let whole = drain(&mut b, 1024);
    assert_eq!(drain(&mut a, 7), whole);
    assert_eq!(drain(&mut c, 3), whole);
}

#[test]
fn test_pack_empty_source() {
    let layout = Layout::parse("f").unwrap();
    let mut packer = RawDataPacker::new(&[], &layout).unwrap();
    assert!(!packer.has_next());
    let mut buf = [0u8; 16];
    assert_eq!(packer.next_chunk(&mut buf), 0);
}

#[test]
fn test_pack_rejects_partial_record() {
    let layout = Layout::parse("2f1i").unwrap();
    let src = vec![0u8; 13];
    match RawDataPacker::new(&src, &layout) {
        Err(PackError::PartialRecord { len, record_size }) => {
            assert_eq!(len, 13);
            assert_eq!(record_size, 12);
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_record_len_is_widest_element() {
    let layout = Layout::parse("ud").unwrap();
    let src = vec![0u8; 32];
    let packer = RawDataPacker::new(&src, &layout).unwrap();
    assert_eq!(packer.record_len(), 8);
}
