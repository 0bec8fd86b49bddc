//! Digit grouping, cursor preservation, and the placeholder overlay.
//!
//! Formatting splits a digit string into fixed-size chunks joined by a run
//! of spaces, recomputed from scratch on every keystroke. The cursor rule
//! keeps the caret stable relative to digit content: separators are
//! transparent to cursor arithmetic, and only a caret sitting at the end of
//! the value is nudged forward when formatting grows the text.
//!
//! ```
//! use cardflow::format::{format, format_with_cursor};
//!
//! assert_eq!(format("424242424242", 4, 2), "4242  4242  4242");
//!
//! let (text, cursor) = format_with_cursor("42424", 5, 4, 2);
//! assert_eq!(text, "4242  4");
//! assert_eq!(cursor, 7);
//! ```

/// Formats a digit string into groups of `interval` characters joined by
/// `spacing` spaces. The last group may be shorter.
///
/// `interval` must be non-zero; the configuration enforces this before any
/// formatting happens.
pub fn format(digits: &str, interval: usize, spacing: usize) -> String {
    let mut out = String::with_capacity(digits.len() + formatted_overhead(digits.len(), interval, spacing));
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && i % interval == 0 {
            for _ in 0..spacing {
                out.push(' ');
            }
        }
        out.push(ch);
    }
    out
}

/// Formats a digit string and adjusts the caret.
///
/// `cursor` is the caret offset reported by the host field. When the caret
/// sat at or past the end of the unformatted value and formatting grew the
/// text, it advances by `spacing` so it lands after the freshly inserted
/// separator run; anywhere else it is preserved relative to digit content.
/// The result is clamped to the formatted length.
pub fn format_with_cursor(
    digits: &str,
    cursor: usize,
    interval: usize,
    spacing: usize,
) -> (String, usize) {
    let formatted = format(digits, interval, spacing);
    let grew = formatted.len() > digits.len();
    let adjusted = if cursor >= digits.len() && grew {
        cursor + spacing
    } else {
        cursor
    };
    let adjusted = adjusted.min(formatted.len());
    (formatted, adjusted)
}

/// Display length of `digit_len` digits once grouped: the digits plus the
/// separator runs between full groups.
///
/// Used for host-side maximum-length attributes on the input field.
pub fn formatted_length(digit_len: usize, interval: usize, spacing: usize) -> usize {
    digit_len + formatted_overhead(digit_len, interval, spacing)
}

fn formatted_overhead(digit_len: usize, interval: usize, spacing: usize) -> usize {
    if digit_len == 0 {
        return 0;
    }
    (digit_len.div_ceil(interval) - 1) * spacing
}

/// Zero-filled placeholder mask for a brand's maximum length, grouped
/// identically to the live value. A maximum length the interval does not
/// evenly divide leaves a shorter trailing group, exactly as [`format`]
/// would produce it.
pub fn placeholder_mask(max_length: usize, interval: usize, spacing: usize) -> String {
    format(&"0".repeat(max_length), interval, spacing)
}

/// The placeholder mask split around the typed digits.
///
/// `hidden` sits beneath the real input and is rendered invisible; `visible`
/// is the zero-filled remainder. Concatenated they reproduce the full mask,
/// so the overlay lines up character-for-character under the live value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Prefix covering the typed digits (rendered invisible).
    pub hidden: String,
    /// Unfilled remainder of the mask, starting with any separator run.
    pub visible: String,
}

/// Splits the placeholder mask after the first `filled` placeholder digits.
pub fn placeholder_overlay(
    max_length: usize,
    interval: usize,
    spacing: usize,
    filled: usize,
) -> Overlay {
    let mask = placeholder_mask(max_length, interval, spacing);
    let filled = filled.min(max_length);
    let mut split = 0usize;
    if filled > 0 {
        let mut seen = 0usize;
        for (i, ch) in mask.char_indices() {
            if ch == '0' {
                seen += 1;
                if seen == filled {
                    split = i + 1;
                    break;
                }
            }
        }
    }
    Overlay {
        hidden: mask[..split].to_string(),
        visible: mask[split..].to_string(),
    }
}
