#![allow(clippy::unwrap_used)]

use typed_cbor::{to_vec, Config, Decoder, Error, ErrorCode, SliceSource};

#[test]
fn sequential_items_decode_one_per_call() {
    let cfg = Config::new();
    let mut bytes = to_vec(&1u32, &cfg).unwrap();
    bytes.extend(to_vec("two", &cfg).unwrap());
    bytes.extend(to_vec(&true, &cfg).unwrap());

    let mut d = Decoder::new(SliceSource::new(&bytes), cfg);
    assert_eq!(d.decode::<u32>().unwrap(), 1);
    assert_eq!(d.decode::<&str>().unwrap(), "two");
    assert!(d.decode::<bool>().unwrap());
    assert_eq!(d.position(), bytes.len());
}

#[test]
fn error_reports_position() {
    let cfg = Config::new();
    // Array of two, second element truncated mid-argument.
    let bytes = [0x82, 0x01, 0x19, 0x00];
    let mut d = Decoder::new(SliceSource::new(&bytes), cfg);
    let err = d.decode::<Vec<u64>>().unwrap_err();
    assert_eq!(err.code, ErrorCode::BufferUnderflow);
    assert!(err.position >= 2);
}

#[test]
fn error_display_is_stable() {
    let err = Error::new(ErrorCode::DepthExceeded, 17);
    assert_eq!(err.to_string(), "cbor error at 17: nesting depth limit exceeded");
}

#[test]
fn config_caps_follow_message_bytes() {
    let cfg = Config::for_message_bytes(512);
    assert_eq!(cfg.max_string_length, 512);
    assert_eq!(cfg.max_collection_size, 512);

    let cfg = Config::for_message_bytes(1 << 30);
    assert_eq!(cfg.max_string_length, typed_cbor::DEFAULT_MAX_STRING_LENGTH);
    assert_eq!(
        cfg.max_collection_size,
        typed_cbor::DEFAULT_MAX_COLLECTION_SIZE
    );
}

#[test]
fn default_config_matches_new() {
    assert_eq!(Config::default(), Config::new());
}
