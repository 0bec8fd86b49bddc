//! Fuzz target for the checksum.
//!
//! The validator must never panic and the slice and string entry points
//! must agree on digit-only input.

#![no_main]

use cardflow::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();
    let text: String = digits.iter().map(|&d| (b'0' + d) as char).collect();

    let from_slice = luhn::validate(&digits);
    let from_str = luhn::is_valid(&text);
    assert_eq!(from_slice, from_str, "slice and string validation mismatch");

    // Arbitrary bytes as a string must not panic either
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = luhn::is_valid(raw);
    }
});
