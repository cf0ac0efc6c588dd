#![allow(clippy::unwrap_used)]

use typed_cbor::{extract_field, from_slice, to_vec, Config, Decode, Encode, ErrorCode};

fn cfg() -> Config {
    Config::new()
}

#[derive(Debug, PartialEq, Encode, Decode)]
struct Person {
    name: String,
    age: u32,
    active: bool,
}

const PERSON_BYTES: &[u8] = &[
    0xa3, // map(3)
    0x64, 0x6e, 0x61, 0x6d, 0x65, // "name"
    0x65, 0x41, 0x6c, 0x69, 0x63, 0x65, // "Alice"
    0x63, 0x61, 0x67, 0x65, // "age"
    0x18, 0x1e, // 30
    0x66, 0x61, 0x63, 0x74, 0x69, 0x76, 0x65, // "active"
    0xf5, // true
];

#[test]
fn record_encodes_fields_in_declared_order() {
    let p = Person {
        name: "Alice".to_owned(),
        age: 30,
        active: true,
    };
    assert_eq!(to_vec(&p, &cfg()).unwrap(), PERSON_BYTES);
}

#[test]
fn record_roundtrip() {
    let p = Person {
        name: "Alice".to_owned(),
        age: 30,
        active: true,
    };
    let bytes = to_vec(&p, &cfg()).unwrap();
    let back: Person = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(back, p);
}

#[test]
fn record_field_order_is_irrelevant_on_decode() {
    // active first, then age, then name.
    let bytes = [
        0xa3, 0x66, 0x61, 0x63, 0x74, 0x69, 0x76, 0x65, 0xf4, 0x63, 0x61, 0x67, 0x65, 0x01, 0x64,
        0x6e, 0x61, 0x6d, 0x65, 0x61, 0x78,
    ];
    let p: Person = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(
        p,
        Person {
            name: "x".to_owned(),
            age: 1,
            active: false,
        }
    );
}

#[test]
fn record_unknown_fields_are_skipped() {
    // {"extra": [1, 2], "name": "x", "age": 1, "active": true}
    let bytes = [
        0xa4, 0x65, 0x65, 0x78, 0x74, 0x72, 0x61, 0x82, 0x01, 0x02, 0x64, 0x6e, 0x61, 0x6d, 0x65,
        0x61, 0x78, 0x63, 0x61, 0x67, 0x65, 0x01, 0x66, 0x61, 0x63, 0x74, 0x69, 0x76, 0x65, 0xf5,
    ];
    let p: Person = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(p.name, "x");
}

#[test]
fn record_missing_required_field_errors() {
    // {"name": "x"}
    let bytes = [0xa1, 0x64, 0x6e, 0x61, 0x6d, 0x65, 0x61, 0x78];
    let err = from_slice::<Person>(&bytes, &cfg()).unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}

#[test]
fn record_duplicate_key_last_wins() {
    // {"age": 1, "age": 2, "name": "x", "active": true}
    let bytes = [
        0xa4, 0x63, 0x61, 0x67, 0x65, 0x01, 0x63, 0x61, 0x67, 0x65, 0x02, 0x64, 0x6e, 0x61, 0x6d,
        0x65, 0x61, 0x78, 0x66, 0x61, 0x63, 0x74, 0x69, 0x76, 0x65, 0xf5,
    ];
    let p: Person = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(p.age, 2);

    let mut strict = Config::new();
    strict.allow_duplicate_keys = false;
    let err = from_slice::<Person>(&bytes, &strict).unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedInput);
}

#[test]
fn record_decodes_from_indefinite_map() {
    let mut bytes = vec![0xbf];
    bytes.extend_from_slice(&PERSON_BYTES[1..]);
    bytes.push(0xff);
    let p: Person = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(p.age, 30);
}

#[derive(Debug, PartialEq, Encode, Decode)]
struct Sparse {
    id: u64,
    label: Option<String>,
    #[cbor(rename = "n")]
    count: u32,
    #[cbor(default)]
    retries: u8,
    #[cbor(skip)]
    cached: bool,
}

#[test]
fn optional_fields_default_to_absent() {
    // {"id": 9, "n": 4}
    let bytes = [0xa2, 0x62, 0x69, 0x64, 0x09, 0x61, 0x6e, 0x04];
    let s: Sparse = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(
        s,
        Sparse {
            id: 9,
            label: None,
            count: 4,
            retries: 0,
            cached: false,
        }
    );
}

#[test]
fn renamed_and_skipped_fields_encode() {
    let s = Sparse {
        id: 1,
        label: Some("a".to_owned()),
        count: 2,
        retries: 3,
        cached: true,
    };
    // {"id": 1, "label": "a", "n": 2, "retries": 3} — `cached` never hits the wire.
    let bytes = to_vec(&s, &cfg()).unwrap();
    assert_eq!(
        bytes,
        [
            0xa4, 0x62, 0x69, 0x64, 0x01, 0x65, 0x6c, 0x61, 0x62, 0x65, 0x6c, 0x61, 0x61, 0x61,
            0x6e, 0x02, 0x67, 0x72, 0x65, 0x74, 0x72, 0x69, 0x65, 0x73, 0x03,
        ]
    );
    let back: Sparse = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(back.cached, false);
    assert_eq!(back.label.as_deref(), Some("a"));
}

#[test]
fn nested_records() {
    #[derive(Debug, PartialEq, Encode, Decode)]
    struct Inner {
        x: i32,
    }

    #[derive(Debug, PartialEq, Encode, Decode)]
    struct Outer {
        inner: Inner,
        items: Vec<Inner>,
    }

    let v = Outer {
        inner: Inner { x: -1 },
        items: vec![Inner { x: 1 }, Inner { x: 2 }],
    };
    let bytes = to_vec(&v, &cfg()).unwrap();
    let back: Outer = from_slice(&bytes, &cfg()).unwrap();
    assert_eq!(back, v);
}

#[test]
fn extract_field_returns_one_value() {
    let age: Option<u32> = extract_field(PERSON_BYTES, "age", &cfg()).unwrap();
    assert_eq!(age, Some(30));

    let name: Option<&str> = extract_field(PERSON_BYTES, "name", &cfg()).unwrap();
    assert_eq!(name, Some("Alice"));

    let missing: Option<u32> = extract_field(PERSON_BYTES, "height", &cfg()).unwrap();
    assert_eq!(missing, None);
}

#[test]
fn extract_field_is_repeatable() {
    for _ in 0..3 {
        let age: Option<u32> = extract_field(PERSON_BYTES, "age", &cfg()).unwrap();
        assert_eq!(age, Some(30));
    }
}

#[test]
fn extract_field_duplicate_key_first_match() {
    // {"age": 1, "age": 2, "name": "x", "active": true} — record decode lets
    // the later entry win, but extraction stops at the first matching key.
    let bytes = [
        0xa4, 0x63, 0x61, 0x67, 0x65, 0x01, 0x63, 0x61, 0x67, 0x65, 0x02, 0x64, 0x6e, 0x61, 0x6d,
        0x65, 0x61, 0x78, 0x66, 0x61, 0x63, 0x74, 0x69, 0x76, 0x65, 0xf5,
    ];
    let age: Option<u32> = extract_field(&bytes, "age", &cfg()).unwrap();
    assert_eq!(age, Some(1));
}

#[test]
fn extract_field_from_indefinite_map() {
    let mut bytes = vec![0xbf];
    bytes.extend_from_slice(&PERSON_BYTES[1..]);
    bytes.push(0xff);
    let age: Option<u32> = extract_field(&bytes, "age", &cfg()).unwrap();
    assert_eq!(age, Some(30));
}

#[test]
fn extract_field_type_mismatch_surfaces() {
    let err = extract_field::<u32>(PERSON_BYTES, "name", &cfg()).unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeMismatch);
}

#[test]
fn extract_field_on_non_map_errors() {
    let err = extract_field::<u32>(&[0x82, 0x01, 0x02], "k", &cfg()).unwrap_err();
    assert_eq!(err.code, ErrorCode::TypeMismatch);
}
