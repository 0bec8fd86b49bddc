//! Fuzz target for the widget facade: arbitrary keystroke sequences must
//! never panic and never corrupt the held state.

#![no_main]

use cardflow::{Cardflow, Config, FieldKind, Validity};
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|inputs: Vec<(u8, String)>| {
    let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    let mut form = Cardflow::new(Config::default());

    for (op, text) in inputs.iter().take(64) {
        match op % 6 {
            0 | 1 => {
                if let Some(out) = form.number_input(text, text.len()) {
                    if out.state.validity == Validity::Valid {
                        assert!(form.card_number().is_some());
                    }
                }
            }
            2 => {
                if let Some(kind) = FieldKind::from_index((*op as usize / 6) % 3) {
                    let _ = form.metadata_input_at(kind, text, today);
                }
            }
            3 => {
                let _ = form.request_forward();
            }
            4 => {
                let _ = form.request_backward();
            }
            _ => {
                let _ = form.complete_transition_at(today);
            }
        }
    }
});
