//! Expiry (MM/YY) normalization and validation.
//!
//! Input arrives as raw digits or digits already containing one separator.
//! [`normalize`] inserts the separator after the first two digits when the
//! user did not type one; validation then requires both halves to resolve
//! to exactly two digits, a month in 1-12, and an end-of-month date
//! strictly in the future. The two-digit year is read as 2000+YY.
//!
//! Evaluation time is injectable so results are deterministic under test:
//!
//! ```
//! use cardflow::expiry;
//! use cardflow::field::Validity;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
//! assert_eq!(expiry::validity_at("01/30", today), Validity::Valid);
//! assert_eq!(expiry::validity_at("13/25", today), Validity::Invalid);
//! assert_eq!(expiry::validity_at("01/22", today), Validity::Invalid);
//! assert_eq!(expiry::validity_at("01/3", today), Validity::Incomplete);
//! ```

use chrono::{Local, NaiveDate};

use crate::field::Validity;

/// Separator between month and year.
pub const SEPARATOR: char = '/';

/// Inserts the separator into a run of raw digits.
///
/// A value that already contains a separator is returned unchanged; the
/// user's own separator always wins. Otherwise digits are chunked in twos,
/// so the separator appears only once a third character exists.
///
/// ```
/// use cardflow::expiry::normalize;
///
/// assert_eq!(normalize("01"), "01");
/// assert_eq!(normalize("013"), "01/3");
/// assert_eq!(normalize("0130"), "01/30");
/// assert_eq!(normalize("01/30"), "01/30");
/// ```
pub fn normalize(input: &str) -> String {
    if input.contains(SEPARATOR) {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len() + 2);
    for (i, ch) in input.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            out.push(SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Validates a (normalized) expiry value against an explicit evaluation
/// date.
///
/// Underfull halves are [`Validity::Incomplete`], never an error; a
/// completed-but-malformed value (bad month, past date, stray characters)
/// is [`Validity::Invalid`].
pub fn validity_at(value: &str, today: NaiveDate) -> Validity {
    if value.is_empty() {
        return Validity::Incomplete;
    }
    if value
        .chars()
        .any(|c| !c.is_ascii_digit() && c != SEPARATOR)
    {
        return Validity::Invalid;
    }

    let mut halves = value.split(SEPARATOR);
    let (month, year) = match (halves.next(), halves.next(), halves.next()) {
        (Some(m), Some(y), None) => (m, y),
        // No separator yet, or a surplus one: not checked further
        _ => return Validity::Incomplete,
    };
    if month.len() != 2 || year.len() != 2 {
        return Validity::Incomplete;
    }

    let month: u32 = match month.parse() {
        Ok(m) => m,
        Err(_) => return Validity::Invalid,
    };
    if !(1..=12).contains(&month) {
        return Validity::Invalid;
    }
    let year: i32 = match year.parse::<i32>() {
        Ok(y) => 2000 + y,
        Err(_) => return Validity::Invalid,
    };

    // The card is usable through the end of its expiry month.
    match end_of_month(year, month) {
        Some(end) if end > today => Validity::Valid,
        _ => Validity::Invalid,
    }
}

/// Validates against the current local date.
pub fn validity(value: &str) -> Validity {
    validity_at(value, Local::now().date_naive())
}

fn end_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
