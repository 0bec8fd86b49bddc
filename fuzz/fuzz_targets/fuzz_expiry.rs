//! Fuzz target for expiry normalization and validation.

#![no_main]

use cardflow::{expiry, Validity};
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: String| {
    let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

    let normalized = expiry::normalize(&text);
    let _ = expiry::validity_at(&normalized, today);

    // Digit content survives normalization
    let before: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    let after: String = normalized.chars().filter(|c| c.is_ascii_digit()).collect();
    assert_eq!(before, after);

    // Underfull digit-only input never reports an error
    if text.len() < 3 && text.chars().all(|c| c.is_ascii_digit()) {
        assert_ne!(expiry::validity_at(&expiry::normalize(&text), today), Validity::Invalid);
    }
});
