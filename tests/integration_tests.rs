//! End-to-end scenarios over the widget facade.
//!
//! These tests drive the public surface the way a host form would: raw
//! keystrokes in, rendered state and callbacks out.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cardflow::{
    format, luhn, Affordance, BrandSpec, Cardflow, Config, ConfigError, FieldKind, FocusHint,
    Step, Validity,
};
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
}

#[derive(Default)]
struct Counters {
    valid: AtomicUsize,
    incomplete: AtomicUsize,
    invalid: AtomicUsize,
    brand: AtomicUsize,
}

fn counting_config() -> (Config, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let (v, i, n, b) = (
        counters.clone(),
        counters.clone(),
        counters.clone(),
        counters.clone(),
    );
    let config = Config::builder()
        .on_valid(move || {
            v.valid.fetch_add(1, Ordering::SeqCst);
        })
        .on_incomplete(move || {
            i.incomplete.fetch_add(1, Ordering::SeqCst);
        })
        .on_invalid(move || {
            n.invalid.fetch_add(1, Ordering::SeqCst);
        })
        .on_change_card_type(move |_| {
            b.brand.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();
    (config, counters)
}

// =============================================================================
// NUMBER STEP
// =============================================================================

#[test]
fn test_typing_a_visa_number_keystroke_by_keystroke() {
    let mut form = Cardflow::new(Config::default());
    let number = "4242424242424242";

    let mut field_text = String::new();
    for (i, ch) in number.chars().enumerate() {
        field_text.push(ch);
        let cursor = field_text.len();
        let out = form.number_input(&field_text, cursor).unwrap();

        if i + 1 < number.len() {
            assert_eq!(
                out.state.validity,
                Validity::Incomplete,
                "no error while typing digit {}",
                i + 1
            );
            assert!(out.transition.is_none());
        } else {
            assert_eq!(out.state.validity, Validity::Valid);
            assert!(out.transition.is_some());
        }
        // The host writes the formatted text back into the field
        field_text = out.state.formatted;
    }
}

#[test]
fn test_incomplete_prefix_is_not_an_error() {
    let (config, counters) = counting_config();
    let mut form = Cardflow::new(config);

    let out = form.number_input("4111111111", 10).unwrap();
    assert_eq!(out.state.validity, Validity::Incomplete);
    assert_eq!(counters.invalid.load(Ordering::SeqCst), 0);
}

#[test]
fn test_full_length_failing_checksum_is_invalid() {
    let (config, counters) = counting_config();
    let mut form = Cardflow::new(config);

    let out = form.number_input("4111111111111112", 16).unwrap();
    assert_eq!(out.state.validity, Validity::Invalid);
    assert!(out.state.attention);
    assert!(out.transition.is_none());
    assert_eq!(counters.invalid.load(Ordering::SeqCst), 1);
}

#[test]
fn test_thirteen_digit_visa_is_valid_without_advancing() {
    let mut form = Cardflow::new(Config::default());
    let out = form.number_input("4222222222222", 13).unwrap();
    assert_eq!(out.state.validity, Validity::Valid);
    // Valid but short of the maximum: no automatic hand-off
    assert!(out.transition.is_none());
    assert_eq!(form.card_number(), Some("4222222222222"));
}

#[test]
fn test_formatted_input_round_trips() {
    let mut form = Cardflow::new(Config::default());
    // Host sends the previously formatted text back with a new digit
    let out = form.number_input("4242  4242  4", 13).unwrap();
    assert_eq!(out.state.formatted, "4242  4242  4");
}

#[test]
fn test_brand_detection_vectors() {
    let cases = [
        ("4", Some("visa")),
        ("5105", Some("mastercard")),
        ("340000000000000", Some("amex")),
        ("6011000000000000", Some("discover")),
        ("1234", None),
    ];
    for (input, expected) in cases {
        let mut form = Cardflow::new(Config::default());
        let out = form.number_input(input, input.len()).unwrap();
        assert_eq!(out.state.brand.as_deref(), expected, "input {input}");
    }
}

#[test]
fn test_unmatched_prefix_uses_default_length() {
    let mut form = Cardflow::new(Config::default());
    let out = form.number_input("1234", 4).unwrap();
    assert_eq!(out.state.brand, None);
    // Fallback maximum of 16 governs display length: 16 digits + 3 runs of 2
    assert_eq!(out.state.max_display_length, 22);
}

// =============================================================================
// STEP TRANSITIONS
// =============================================================================

#[test]
fn test_second_transition_request_not_performed_while_animating() {
    let mut form = Cardflow::new(Config::default());
    let out = form.number_input("4242424242424242", 16).unwrap();
    assert!(out.transition.is_some());

    // The first sequence is still playing
    assert!(form.request_forward().is_none());
    assert!(form.request_backward().is_none());

    form.complete_transition_at(today()).unwrap();
    // Settled: a new request succeeds
    assert!(form.request_backward().is_some());
}

#[test]
fn test_forward_transition_contract() {
    let mut form = Cardflow::new(Config::default());
    form.number_input("378282246310005", 15).unwrap();
    let done = form.complete_transition_at(today()).unwrap();

    assert_eq!(done.step, Step::EnteringMetadata);
    assert_eq!(done.affordance, Affordance::Confirm);
    assert_eq!(done.last_four.as_deref(), Some("0005"));
    // Amex: expiry 5, code 4, postal 5
    assert_eq!(done.metadata_max_lengths, Some([5, 4, 5]));
    // The first metadata field was re-validated on entry
    assert_eq!(done.metadata.unwrap().validity, Validity::Incomplete);
}

#[test]
fn test_backward_transition_restores_number_entry() {
    let mut form = Cardflow::new(Config::default());
    form.number_input("4242424242424242", 16).unwrap();
    form.complete_transition_at(today()).unwrap();

    form.request_backward().unwrap();
    let done = form.complete_transition_at(today()).unwrap();
    assert_eq!(done.step, Step::EnteringNumber);
    assert_eq!(done.affordance, Affordance::Forward);
    let number = done.number.unwrap();
    assert_eq!(number.formatted, "4242  4242  4242  4242");
    assert_eq!(number.validity, Validity::Valid);
}

#[test]
fn test_hold_prevents_auto_advance_until_explicit_forward() {
    let mut form = Cardflow::new(Config::default());
    form.number_input("4242424242424242", 16).unwrap();
    form.complete_transition_at(today()).unwrap();
    form.request_backward().unwrap();
    form.complete_transition_at(today()).unwrap();
    assert!(form.is_held());

    // Editing and completing the number again stays in step one
    let out = form.number_input("5105105105105100", 16).unwrap();
    assert_eq!(out.state.validity, Validity::Valid);
    assert!(out.transition.is_none());
    assert_eq!(form.step(), Step::EnteringNumber);

    form.request_forward().unwrap();
    form.complete_transition_at(today()).unwrap();
    assert!(!form.is_held());
    assert_eq!(form.step(), Step::EnteringMetadata);
}

#[test]
fn test_brand_change_mid_entry_updates_metadata_lengths() {
    let mut form = Cardflow::new(Config::default());
    // Start typing an amex, then go back and switch to a visa
    form.number_input("378282246310005", 15).unwrap();
    form.complete_transition_at(today()).unwrap();
    form.request_backward().unwrap();
    form.complete_transition_at(today()).unwrap();

    form.number_input("4242424242424242", 16).unwrap();
    form.request_forward().unwrap();
    let done = form.complete_transition_at(today()).unwrap();
    // Code length follows the new brand
    assert_eq!(done.metadata_max_lengths, Some([5, 3, 5]));
}

// =============================================================================
// METADATA STEP
// =============================================================================

fn form_in_metadata_step() -> Cardflow {
    let mut form = Cardflow::new(Config::default());
    form.number_input("4242424242424242", 16).unwrap();
    form.complete_transition_at(today()).unwrap();
    form
}

#[test]
fn test_expiry_vectors() {
    let mut form = form_in_metadata_step();
    let cases = [
        ("0130", "01/30", Validity::Valid),
        ("1325", "13/25", Validity::Invalid),
        ("0122", "01/22", Validity::Invalid),
        ("01", "01", Validity::Incomplete),
        ("12/30", "12/30", Validity::Valid),
    ];
    for (input, normalized, expected) in cases {
        let out = form.metadata_input_at(FieldKind::Expiry, input, today()).unwrap();
        assert_eq!(out.value, normalized, "input {input}");
        assert_eq!(out.validity, expected, "input {input}");
    }
}

#[test]
fn test_code_and_postal_incomplete_vs_invalid() {
    let (config, counters) = counting_config();
    let mut form = Cardflow::new(config);
    form.number_input("4242424242424242", 16).unwrap();
    form.complete_transition_at(today()).unwrap();

    let before = counters.invalid.load(Ordering::SeqCst);
    let out = form.metadata_input_at(FieldKind::Code, "12", today()).unwrap();
    assert_eq!(out.validity, Validity::Incomplete);
    assert_eq!(counters.invalid.load(Ordering::SeqCst), before);

    let out = form.metadata_input_at(FieldKind::Code, "12a", today()).unwrap();
    assert_eq!(out.validity, Validity::Invalid);
    assert!(out.attention);
    assert_eq!(counters.invalid.load(Ordering::SeqCst), before + 1);

    let out = form.metadata_input_at(FieldKind::Postal, "9021", today()).unwrap();
    assert_eq!(out.validity, Validity::Incomplete);
    let out = form.metadata_input_at(FieldKind::Postal, "90210", today()).unwrap();
    assert_eq!(out.validity, Validity::Valid);
}

#[test]
fn test_focus_advances_through_completed_fields() {
    let mut form = form_in_metadata_step();

    let out = form.metadata_input_at(FieldKind::Expiry, "1230", today()).unwrap();
    assert_eq!(out.focus, Some(FocusHint::Next));

    let out = form.metadata_input_at(FieldKind::Code, "123", today()).unwrap();
    assert_eq!(out.focus, Some(FocusHint::Next));

    // The last field never advances
    let out = form.metadata_input_at(FieldKind::Postal, "90210", today()).unwrap();
    assert_eq!(out.focus, None);
}

#[test]
fn test_aggregate_callbacks() {
    let (config, counters) = counting_config();
    let mut form = Cardflow::new(config);
    form.number_input("4242424242424242", 16).unwrap();
    form.complete_transition_at(today()).unwrap();

    form.metadata_input_at(FieldKind::Expiry, "1230", today()).unwrap();
    form.metadata_input_at(FieldKind::Code, "123", today()).unwrap();
    assert_eq!(counters.valid.load(Ordering::SeqCst), 0);

    form.metadata_input_at(FieldKind::Postal, "90210", today()).unwrap();
    assert_eq!(counters.valid.load(Ordering::SeqCst), 1);

    // Re-touching a valid field does not re-fire on_valid
    form.metadata_input_at(FieldKind::Code, "123", today()).unwrap();
    assert_eq!(counters.valid.load(Ordering::SeqCst), 1);

    // A field turning invalid flips the form back to incomplete
    let before = counters.incomplete.load(Ordering::SeqCst);
    form.metadata_input_at(FieldKind::Expiry, "1325", today()).unwrap();
    assert!(counters.incomplete.load(Ordering::SeqCst) > before);
    assert!(!form.is_complete());

    // Fixing it fires on_valid again: a fresh transition into the state
    form.metadata_input_at(FieldKind::Expiry, "1230", today()).unwrap();
    assert_eq!(counters.valid.load(Ordering::SeqCst), 2);
}

#[test]
fn test_complete_form_emits_all_values() {
    let mut form = form_in_metadata_step();
    form.metadata_input_at(FieldKind::Expiry, "1230", today()).unwrap();
    form.metadata_input_at(FieldKind::Code, "123", today()).unwrap();
    form.metadata_input_at(FieldKind::Postal, "90210", today()).unwrap();

    let values: Vec<(String, String)> = form.form_values();
    assert_eq!(
        values,
        vec![
            ("credit-card-number".to_string(), "4242424242424242".to_string()),
            ("credit-card-expiry".to_string(), "12/30".to_string()),
            ("credit-card-cvv".to_string(), "123".to_string()),
            ("credit-card-zip".to_string(), "90210".to_string()),
        ]
    );
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[test]
fn test_custom_grouping() {
    let config = Config::builder()
        .grouping_interval(4)
        .grouping_width(1)
        .build()
        .unwrap();
    let mut form = Cardflow::new(config);
    let out = form.number_input("424242424242", 12).unwrap();
    assert_eq!(out.state.formatted, "4242 4242 4242");
}

#[test]
fn test_custom_brand_governs_entry() {
    let config = Config::builder()
        .brand(
            "housecard",
            BrandSpec {
                pattern: Some(r"^78[0-9]*$".into()),
                max_length: Some(12),
                code_length: Some(6),
                ..BrandSpec::default()
            },
        )
        .build()
        .unwrap();
    let mut form = Cardflow::new(config);
    // 782222222229 carries a valid checksum
    let out = form.number_input("782222222229", 12).unwrap();
    assert_eq!(out.state.brand.as_deref(), Some("housecard"));
    assert_eq!(out.state.validity, Validity::Valid);
    assert!(out.transition.is_some());
    let done = form.complete_transition_at(today()).unwrap();
    assert_eq!(done.metadata_max_lengths, Some([5, 6, 5]));
}

#[test]
fn test_malformed_configuration_fails_fast() {
    assert!(matches!(
        Config::builder().grouping_interval(0).build(),
        Err(ConfigError::InvalidGroupingInterval)
    ));
    assert!(matches!(
        Config::builder().code_field_name("").build(),
        Err(ConfigError::EmptyFieldName { .. })
    ));
}

// =============================================================================
// PURE HELPERS
// =============================================================================

#[test]
fn test_format_matches_placeholder_alignment() {
    // The live value and the placeholder mask group identically, including
    // a short trailing group.
    let digits = "378282246310005";
    let formatted = format::format(digits, 4, 2);
    let mask = format::placeholder_mask(digits.len(), 4, 2);
    assert_eq!(formatted.len(), mask.len());
    for (a, b) in formatted.chars().zip(mask.chars()) {
        assert_eq!(a.is_ascii_digit(), b.is_ascii_digit());
    }
}

#[test]
fn test_luhn_known_vectors() {
    for card in [
        "4111111111111111",
        "4242424242424242",
        "5500000000000004",
        "378282246310005",
        "6011111111111117",
    ] {
        assert!(luhn::is_valid(card), "{card} should pass");
    }
    assert!(!luhn::is_valid("4111111111111121"));
}
