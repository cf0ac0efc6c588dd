#![allow(clippy::unwrap_used)]

use typed_cbor::{to_vec, Config, Decoder, Encode, ErrorCode, SliceSource};

fn cfg() -> Config {
    Config::new()
}

fn skip_len(bytes: &[u8]) -> usize {
    let mut d = Decoder::new(SliceSource::new(bytes), cfg());
    d.skip_value().unwrap();
    d.position()
}

fn assert_skips_whole<T: Encode>(value: &T) {
    let bytes = to_vec(value, &cfg()).unwrap();
    assert_eq!(skip_len(&bytes), bytes.len());
}

#[test]
fn skip_consumes_exactly_one_item() {
    assert_skips_whole(&0u8);
    assert_skips_whole(&1_000_000u32);
    assert_skips_whole(&-65_537i64);
    assert_skips_whole(&true);
    assert_skips_whole(&());
    assert_skips_whole(&1.5f64);
    assert_skips_whole(&typed_cbor::f16::from_f32(2.0));
    assert_skips_whole(&"a text string");
    assert_skips_whole(&&b"some bytes"[..]);
    assert_skips_whole(&vec![1u32, 2, 3]);
    assert_skips_whole(&vec![vec!["a"], vec!["b", "c"]]);
}

#[test]
fn skip_stops_at_item_boundary() {
    let mut bytes = to_vec(&vec![1u32, 2, 3], &cfg()).unwrap();
    let first = bytes.len();
    bytes.extend(to_vec("next", &cfg()).unwrap());
    assert_eq!(skip_len(&bytes), first);
}

#[test]
fn skip_indefinite_items() {
    assert_eq!(skip_len(&[0x9f, 0x01, 0x02, 0x03, 0xff]), 5);
    // (_ "he" "llo")
    assert_eq!(
        skip_len(&[0x7f, 0x62, 0x68, 0x65, 0x63, 0x6c, 0x6c, 0x6f, 0xff]),
        9
    );
    // {_ "a": 1}
    assert_eq!(skip_len(&[0xbf, 0x61, 0x61, 0x01, 0xff]), 5);
    // Nested: [_ [_ ] ]
    assert_eq!(skip_len(&[0x9f, 0x9f, 0xff, 0xff]), 4);
}

#[test]
fn skip_traverses_tags() {
    // 1(1363896240) — tags are skipped, never decoded.
    let bytes = [0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0];
    assert_eq!(skip_len(&bytes), bytes.len());

    // Chained tags over a text string.
    let bytes = [0xc0, 0xc0, 0x62, 0x68, 0x69];
    assert_eq!(skip_len(&bytes), bytes.len());
}

#[test]
fn skip_rejects_missing_break() {
    let mut d = Decoder::new(SliceSource::new(&[0x9f, 0x01, 0x02]), cfg());
    let err = d.skip_value().unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferUnderflow);
}

#[test]
fn skip_rejects_stray_break() {
    let mut d = Decoder::new(SliceSource::new(&[0xff]), cfg());
    let err = d.skip_value().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidBreakCode);
}

#[test]
fn skip_rejects_break_between_key_and_value() {
    // {_ "a": <break>} — a key with no value.
    let mut d = Decoder::new(SliceSource::new(&[0xbf, 0x61, 0x61, 0xff]), cfg());
    let err = d.skip_value().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidBreakCode);
}

#[test]
fn skip_honors_depth_limit() {
    let mut config = Config::new();
    config.max_depth = 2;
    let mut d = Decoder::new(SliceSource::new(&[0x81, 0x81, 0x80]), config);
    let err = d.skip_value().unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthExceeded);
}

#[test]
fn skip_honors_indefinite_toggle() {
    let mut config = Config::new();
    config.enable_indefinite_length = false;
    let mut d = Decoder::new(SliceSource::new(&[0x9f, 0x01, 0xff]), config);
    let err = d.skip_value().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidIndefiniteLength);
}

#[test]
fn skip_rejects_unassigned_simple_values() {
    let mut d = Decoder::new(SliceSource::new(&[0xe0]), cfg());
    let err = d.skip_value().unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidAdditionalInfo);
}

#[test]
fn skip_matches_decode_position() {
    let values: Vec<Vec<u8>> = vec![
        to_vec(&42u64, &cfg()).unwrap(),
        to_vec("hello", &cfg()).unwrap(),
        to_vec(&vec![vec![1u32], vec![2, 3]], &cfg()).unwrap(),
        to_vec(&Some(-9i32), &cfg()).unwrap(),
    ];
    for bytes in values {
        let mut skipper = Decoder::new(SliceSource::new(&bytes), cfg());
        skipper.skip_value().unwrap();
        assert_eq!(skipper.position(), bytes.len());
    }
}
