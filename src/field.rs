//! Per-field validation policies and the metadata field set.
//!
//! Validation is tri-state: incomplete input is neither valid nor flagged
//! invalid, so nothing is shown as an error while the user is still typing.
//! A field turns [`Validity::Invalid`] only once it cannot become valid by
//! typing more (non-numeric content, or the number reaching its brand
//! maximum without passing the checksum).

use std::fmt;

use chrono::NaiveDate;
use zeroize::Zeroize;

use crate::brand::BrandRule;
use crate::expiry;
use crate::luhn;

/// Display length of the expiry field ("MM/YY").
pub const EXPIRY_LENGTH: usize = 5;

/// Display length of the postal code field.
pub const POSTAL_LENGTH: usize = 5;

/// Tri-state validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// Definitively wrong; cannot become valid by further typing.
    Invalid,
    /// Not yet decidable; no error is surfaced.
    #[default]
    Incomplete,
    /// Accepted as a final value.
    Valid,
}

impl Validity {
    /// True for [`Validity::Valid`].
    #[inline]
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }

    /// True for [`Validity::Invalid`].
    #[inline]
    pub fn is_invalid(self) -> bool {
        matches!(self, Validity::Invalid)
    }
}

/// The three secondary fields collected after the number is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Expiry date, MM/YY.
    Expiry,
    /// Security code; length depends on the detected brand.
    Code,
    /// Postal code.
    Postal,
}

impl FieldKind {
    /// All kinds in tab order.
    pub const ALL: [FieldKind; 3] = [FieldKind::Expiry, FieldKind::Code, FieldKind::Postal];

    /// Position of the field in tab order.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            FieldKind::Expiry => 0,
            FieldKind::Code => 1,
            FieldKind::Postal => 2,
        }
    }

    /// Inverse of [`FieldKind::index`].
    pub fn from_index(index: usize) -> Option<FieldKind> {
        FieldKind::ALL.get(index).copied()
    }

    /// Maximum length of the field given the brand's code length.
    pub fn max_length(self, code_length: usize) -> usize {
        match self {
            FieldKind::Expiry => EXPIRY_LENGTH,
            FieldKind::Code => code_length,
            FieldKind::Postal => POSTAL_LENGTH,
        }
    }

    /// Placeholder text the host shows while the field is empty.
    pub fn placeholder_text(self) -> &'static str {
        match self {
            FieldKind::Expiry => "MM/YY",
            FieldKind::Code => "CVV",
            FieldKind::Postal => "ZIP",
        }
    }
}

/// Validity of the primary number under a brand rule.
///
/// Valid once the length reaches the rule's minimum (or maximum when no
/// minimum is declared) with a passing checksum. Invalid only for
/// non-numeric content or a full-length value that still fails; anything
/// shorter stays incomplete.
pub fn number_validity(digits: &str, rule: &BrandRule) -> Validity {
    if digits.is_empty() {
        return Validity::Incomplete;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Validity::Invalid;
    }
    if digits.len() >= rule.required_length() && luhn::is_valid(digits) {
        return Validity::Valid;
    }
    if digits.len() >= rule.max_length() {
        Validity::Invalid
    } else {
        Validity::Incomplete
    }
}

/// Validity of a fixed-length numeric field (code, postal).
///
/// Non-numeric content is immediately invalid at any length; numeric
/// content is valid exactly when it fills the field.
pub fn numeric_validity(value: &str, max_length: usize) -> Validity {
    if value.is_empty() {
        return Validity::Incomplete;
    }
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Validity::Invalid;
    }
    if value.len() >= max_length {
        Validity::Valid
    } else {
        Validity::Incomplete
    }
}

/// Validity of a metadata field value at an explicit evaluation date.
pub fn metadata_validity_at(
    kind: FieldKind,
    value: &str,
    max_length: usize,
    today: NaiveDate,
) -> Validity {
    match kind {
        FieldKind::Expiry => expiry::validity_at(value, today),
        FieldKind::Code | FieldKind::Postal => numeric_validity(value, max_length),
    }
}

/// State of one metadata field.
#[derive(Clone)]
pub struct MetadataFieldState {
    kind: FieldKind,
    value: String,
    validity: Validity,
    max_length: usize,
}

impl MetadataFieldState {
    fn new(kind: FieldKind, code_length: usize) -> Self {
        Self {
            kind,
            value: String::new(),
            validity: Validity::Incomplete,
            max_length: kind.max_length(code_length),
        }
    }

    /// Which field this is.
    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Current (normalized) field content.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Last computed validity.
    #[inline]
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Maximum length under the currently detected brand.
    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub(crate) fn set_value(&mut self, value: String, validity: Validity) {
        self.value = value;
        self.validity = validity;
    }
}

impl fmt::Debug for MetadataFieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The security code never reaches debug output
        let shown: &str = match self.kind {
            FieldKind::Code if !self.value.is_empty() => "***",
            _ => &self.value,
        };
        f.debug_struct("MetadataFieldState")
            .field("kind", &self.kind)
            .field("value", &shown)
            .field("validity", &self.validity)
            .field("max_length", &self.max_length)
            .finish()
    }
}

/// The three metadata fields of one widget instance.
#[derive(Debug, Clone)]
pub struct MetadataSet {
    fields: [MetadataFieldState; 3],
}

impl MetadataSet {
    /// Fresh set sized for the given brand code length.
    pub fn new(code_length: usize) -> Self {
        Self {
            fields: [
                MetadataFieldState::new(FieldKind::Expiry, code_length),
                MetadataFieldState::new(FieldKind::Code, code_length),
                MetadataFieldState::new(FieldKind::Postal, code_length),
            ],
        }
    }

    /// Recomputes each field's maximum length for a newly known brand.
    pub fn resize_for(&mut self, code_length: usize) {
        for field in &mut self.fields {
            field.max_length = field.kind.max_length(code_length);
        }
    }

    /// The state of one field.
    pub fn field(&self, kind: FieldKind) -> &MetadataFieldState {
        &self.fields[kind.index()]
    }

    pub(crate) fn field_mut(&mut self, kind: FieldKind) -> &mut MetadataFieldState {
        &mut self.fields[kind.index()]
    }

    /// Maximum lengths in tab order.
    pub fn max_lengths(&self) -> [usize; 3] {
        [
            self.fields[0].max_length,
            self.fields[1].max_length,
            self.fields[2].max_length,
        ]
    }

    /// True once every field is valid; gates the form-complete callback.
    pub fn all_valid(&self) -> bool {
        self.fields.iter().all(|f| f.validity.is_valid())
    }

    /// Clears values and validity, keeping lengths.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
            field.value.clear();
            field.validity = Validity::Incomplete;
        }
    }
}

impl Drop for MetadataSet {
    fn drop(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
        }
    }
}
