#![no_main]

use libfuzzer_sys::fuzz_target;

use typed_cbor::{extract_field, Config};

fuzz_target!(|data: &[u8]| {
    let mut cfg = Config::new();
    cfg.max_depth = 64;
    cfg.max_collection_size = 1 << 12;
    let _: Result<Option<u64>, _> = extract_field(data, "id", &cfg);
    let _: Result<Option<&str>, _> = extract_field(data, "name", &cfg);
});
