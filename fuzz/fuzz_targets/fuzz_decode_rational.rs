#![no_main]

use libfuzzer_sys::fuzz_target;

use mpnum_codec::{decode_rational, encode_rational};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = decode_rational(data) {
        let bytes = encode_rational(&value).expect("decoded rationals have a denominator");
        assert_eq!(decode_rational(&bytes).ok(), Some(value));
    }
});
