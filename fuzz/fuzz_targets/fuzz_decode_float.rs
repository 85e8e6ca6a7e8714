#![no_main]

use libfuzzer_sys::fuzz_target;

use mpnum_codec::{decode_float, encode_float, FloatCode};

fuzz_target!(|data: &[u8]| {
    // Cap an included precision at 2^20 bits to keep iterations fast
    if let Some(&code) = data.first() {
        if FloatCode::from_byte(code).is_ok_and(|c| c.precision_included)
            && data.len() >= 5
            && u32::from_le_bytes([data[1], data[2], data[3], data[4]]) > 1 << 20
        {
            return;
        }
    }

    let Ok(value) = decode_float(data) else {
        return;
    };
    // Leading zero bytes can push the exponent past the field on re-encode
    if let Ok(bytes) = encode_float(&value, true) {
        let back = decode_float(&bytes).expect("re-encoded float decodes");
        if !value.is_nan() {
            assert_eq!(back, value);
            assert_eq!(back.prec(), value.prec());
        }
    }
});
