#![allow(clippy::unwrap_used)]

use typed_cbor::{to_vec, Config, Encoder, ErrorCode, VecSink};

fn cfg() -> Config {
    Config::new()
}

#[test]
fn encode_uint_boundaries() {
    assert_eq!(to_vec(&0u8, &cfg()).unwrap(), vec![0x00]);
    assert_eq!(to_vec(&23u64, &cfg()).unwrap(), vec![0x17]);
    assert_eq!(to_vec(&24u64, &cfg()).unwrap(), vec![0x18, 0x18]);
    assert_eq!(to_vec(&255u64, &cfg()).unwrap(), vec![0x18, 0xff]);
    assert_eq!(to_vec(&256u64, &cfg()).unwrap(), vec![0x19, 0x01, 0x00]);
    assert_eq!(to_vec(&65_535u64, &cfg()).unwrap(), vec![0x19, 0xff, 0xff]);
    assert_eq!(
        to_vec(&65_536u64, &cfg()).unwrap(),
        vec![0x1a, 0x00, 0x01, 0x00, 0x00]
    );
    assert_eq!(
        to_vec(&u64::from(u32::MAX), &cfg()).unwrap(),
        vec![0x1a, 0xff, 0xff, 0xff, 0xff]
    );
    assert_eq!(
        to_vec(&(u64::from(u32::MAX) + 1), &cfg()).unwrap(),
        vec![0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        to_vec(&u64::MAX, &cfg()).unwrap(),
        vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_uint_million() {
    assert_eq!(
        to_vec(&1_000_000u32, &cfg()).unwrap(),
        vec![0x1a, 0x00, 0x0f, 0x42, 0x40]
    );
}

#[test]
fn encode_nint_boundaries() {
    assert_eq!(to_vec(&-1i8, &cfg()).unwrap(), vec![0x20]);
    assert_eq!(to_vec(&-24i8, &cfg()).unwrap(), vec![0x37]);
    assert_eq!(to_vec(&-25i8, &cfg()).unwrap(), vec![0x38, 0x18]);
    assert_eq!(to_vec(&-256i64, &cfg()).unwrap(), vec![0x38, 0xff]);
    assert_eq!(to_vec(&-257i64, &cfg()).unwrap(), vec![0x39, 0x01, 0x00]);
    assert_eq!(to_vec(&-65_536i64, &cfg()).unwrap(), vec![0x39, 0xff, 0xff]);
    assert_eq!(
        to_vec(&-65_537i64, &cfg()).unwrap(),
        vec![0x3a, 0x00, 0x01, 0x00, 0x00]
    );
    assert_eq!(
        to_vec(&i64::MIN, &cfg()).unwrap(),
        vec![0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_simple_values() {
    assert_eq!(to_vec(&false, &cfg()).unwrap(), vec![0xf4]);
    assert_eq!(to_vec(&true, &cfg()).unwrap(), vec![0xf5]);
    assert_eq!(to_vec(&(), &cfg()).unwrap(), vec![0xf6]);
    assert_eq!(to_vec(&None::<u32>, &cfg()).unwrap(), vec![0xf6]);
    assert_eq!(to_vec(&Some(7u32), &cfg()).unwrap(), vec![0x07]);
}

#[test]
fn encode_floats_by_width() {
    assert_eq!(
        to_vec(&typed_cbor::f16::from_f32(1.0), &cfg()).unwrap(),
        vec![0xf9, 0x3c, 0x00]
    );
    assert_eq!(
        to_vec(&1.0f32, &cfg()).unwrap(),
        vec![0xfa, 0x3f, 0x80, 0x00, 0x00]
    );
    assert_eq!(
        to_vec(&1.1f64, &cfg()).unwrap(),
        vec![0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]
    );
}

#[test]
fn encode_text_and_bytes() {
    assert_eq!(
        to_vec("hello", &cfg()).unwrap(),
        vec![0x65, 0x68, 0x65, 0x6c, 0x6c, 0x6f]
    );
    assert_eq!(to_vec("", &cfg()).unwrap(), vec![0x60]);
    assert_eq!(
        to_vec(&[0xde_u8, 0xad, 0xbe, 0xef][..], &cfg()).unwrap(),
        vec![0x44, 0xde, 0xad, 0xbe, 0xef]
    );
}

#[test]
fn encode_array_of_uints() {
    assert_eq!(
        to_vec(&[1u32, 2, 3, 4, 5], &cfg()).unwrap(),
        vec![0x85, 0x01, 0x02, 0x03, 0x04, 0x05]
    );
    assert_eq!(to_vec(&Vec::<u32>::new(), &cfg()).unwrap(), vec![0x80]);
}

#[test]
fn encode_string_over_limit_errors() {
    let mut config = Config::new();
    config.max_string_length = 4;
    let err = to_vec("hello", &config).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidLength);
}

#[test]
fn encode_collection_over_limit_errors() {
    let mut config = Config::new();
    config.max_collection_size = 2;
    let err = to_vec(&[1u32, 2, 3][..], &config).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidLength);
}

#[test]
fn encode_indefinite_array() {
    let mut e = Encoder::new(VecSink::new(), cfg());
    e.array_indefinite(|a| {
        a.value(&1u32)?;
        a.value(&2u32)?;
        a.value(&3u32)
    })
    .unwrap();
    assert_eq!(e.into_sink().into_vec(), vec![0x9f, 0x01, 0x02, 0x03, 0xff]);
}

#[test]
fn encode_indefinite_refused_when_disabled() {
    let mut config = Config::new();
    config.enable_indefinite_length = false;
    let mut e = Encoder::new(VecSink::new(), config);
    let err = e.array_indefinite(|_| Ok(())).unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedValue);
}

#[test]
fn builder_length_mismatch_errors() {
    let mut e = Encoder::new(VecSink::new(), cfg());
    let err = e.array(2, |a| a.value(&1u32)).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidLength);

    let mut e = Encoder::new(VecSink::new(), cfg());
    let err = e
        .array(1, |a| {
            a.value(&1u32)?;
            a.value(&2u32)
        })
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidLength);
}

#[test]
fn encode_depth_limit() {
    let mut config = Config::new();
    config.max_depth = 1;
    let mut e = Encoder::new(VecSink::new(), config);
    let err = e
        .array(1, |a| a.value_with(|e| e.array(0, |_| Ok(()))))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthExceeded);
}

#[test]
fn encode_into_fixed_buffer() {
    let mut buf = [0u8; 8];
    let n = typed_cbor::to_slice(&1_000_000u32, &mut buf, &cfg()).unwrap();
    assert_eq!(&buf[..n], &[0x1a, 0x00, 0x0f, 0x42, 0x40]);

    let mut tiny = [0u8; 2];
    let err = typed_cbor::to_slice(&1_000_000u32, &mut tiny, &cfg()).unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferOverflow);
}

#[test]
fn encode_map_in_declared_order() {
    let mut e = Encoder::new(VecSink::new(), cfg());
    e.map(2, |m| {
        m.entry("b", |e| e.uint(1))?;
        m.entry("a", |e| e.uint(2))
    })
    .unwrap();
    // Entries keep call order; no canonical re-sorting.
    assert_eq!(
        e.into_sink().into_vec(),
        vec![0xa2, 0x61, 0x62, 0x01, 0x61, 0x61, 0x02]
    );
}

#[test]
fn encode_text_bytes_validates() {
    let mut e = Encoder::new(VecSink::new(), cfg());
    let err = e.text_bytes(&[0xff, 0xfe]).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidUtf8);

    let mut config = Config::new();
    config.validate_utf8 = false;
    let mut e = Encoder::new(VecSink::new(), config);
    e.text_bytes(&[0xff, 0xfe]).unwrap();
    assert_eq!(e.into_sink().into_vec(), vec![0x62, 0xff, 0xfe]);
}
