//! Fuzz target for formatting and the placeholder overlay.

#![no_main]

use cardflow::format;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, usize, usize, usize)| {
    let (text, cursor, interval, spacing) = input;
    let interval = interval % 8 + 1;
    let spacing = spacing % 4 + 1;

    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).take(19).collect();

    let (formatted, adjusted) = format::format_with_cursor(&digits, cursor, interval, spacing);
    assert!(adjusted <= formatted.len());

    let stripped: String = formatted.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(stripped, digits, "round trip must reproduce the digits");

    let overlay = format::placeholder_overlay(digits.len(), interval, spacing, cursor % 25);
    let mask = format::placeholder_mask(digits.len(), interval, spacing);
    assert_eq!(format!("{}{}", overlay.hidden, overlay.visible), mask);
});
