#![no_main]

use libfuzzer_sys::fuzz_target;

use typed_cbor::{Config, Decoder, SliceSource};

fn fuzz_config(input_len: usize) -> Config {
    let mut cfg = Config::new();
    cfg.max_string_length = input_len.min(1 << 20);
    cfg.max_collection_size = 1 << 12;
    cfg.max_depth = 64;
    cfg
}

fuzz_target!(|data: &[u8]| {
    let cfg = fuzz_config(data.len());
    let mut d = Decoder::new(SliceSource::new(data), cfg);
    let _ = d.skip_value();
});
