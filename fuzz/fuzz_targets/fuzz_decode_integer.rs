#![no_main]

use libfuzzer_sys::fuzz_target;

use mpnum_codec::{decode_integer, encode_integer};

fuzz_target!(|data: &[u8]| {
    // Any input decodes; the canonical re-encoding must decode to the same value
    if let Ok(value) = decode_integer(data) {
        let bytes = encode_integer(&value);
        assert_eq!(decode_integer(&bytes).ok(), Some(value));
    }
});
