//! The widget facade: binds the number pipeline, metadata fields, and step
//! controller to a host form.
//!
//! The facade owns the only long-lived mutable state (the digit string, the
//! step controller, the metadata set) and recomputes everything else from
//! scratch on every keystroke. The host feeds it raw field text plus the
//! caret position and renders whatever comes back; the four configured
//! callbacks report validity changes outward.
//!
//! Stored card data is wiped on drop, and no `Debug` output ever contains
//! the full number.

use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::config::Config;
use crate::expiry;
use crate::field::{self, FieldKind, MetadataSet, Validity};
use crate::format::{self, Overlay};
use crate::step::{Affordance, Step, StepController, TransitionPlan};

/// Result of one number-field keystroke cycle.
///
/// Everything here is recomputed per cycle and owned by the host once
/// returned; nothing is carried over to the next keystroke.
#[derive(Clone)]
pub struct InputState {
    /// Grouped text to push back into the field.
    pub formatted: String,
    /// Caret offset to restore, adjusted for separator insertion.
    pub cursor: usize,
    /// Detected brand id, `None` when no rule matches.
    pub brand: Option<String>,
    /// Validity of the number this cycle.
    pub validity: Validity,
    /// Placeholder overlay, when enabled in the configuration.
    pub placeholder: Option<Overlay>,
    /// Display length cap for the field under the effective brand.
    pub max_display_length: usize,
    /// True when the host should play the attention animation.
    pub attention: bool,
}

impl fmt::Debug for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the typed number
        f.debug_struct("InputState")
            .field("len", &self.formatted.len())
            .field("cursor", &self.cursor)
            .field("brand", &self.brand)
            .field("validity", &self.validity)
            .field("attention", &self.attention)
            .finish_non_exhaustive()
    }
}

/// A processed number keystroke: the new field state plus, when the number
/// just completed, the transition sequence to play.
#[derive(Debug, Clone)]
pub struct NumberOutcome {
    /// State to render.
    pub state: InputState,
    /// Auto-started forward transition, if the number completed this cycle.
    pub transition: Option<TransitionPlan>,
}

/// Where focus should move after a metadata keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusHint {
    /// The field emptied; move back one field.
    Previous,
    /// The field filled and validated; move forward one field.
    Next,
}

/// What should hold focus once a transition settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The primary number field.
    NumberField,
    /// One of the metadata fields.
    MetadataField(FieldKind),
}

/// Result of one metadata-field keystroke cycle.
#[derive(Clone)]
pub struct MetadataOutcome {
    /// Which field was processed.
    pub kind: FieldKind,
    /// Normalized value to push back into the field.
    pub value: String,
    /// Validity of this field.
    pub validity: Validity,
    /// Current maximum length of this field.
    pub max_length: usize,
    /// Whether the field's placeholder text should show.
    pub show_placeholder: bool,
    /// Focus movement, if any.
    pub focus: Option<FocusHint>,
    /// True when the host should play the attention animation.
    pub attention: bool,
    /// True when all three metadata fields are valid.
    pub form_complete: bool,
}

impl fmt::Debug for MetadataOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: &str = match self.kind {
            FieldKind::Code if !self.value.is_empty() => "***",
            _ => &self.value,
        };
        f.debug_struct("MetadataOutcome")
            .field("kind", &self.kind)
            .field("value", &shown)
            .field("validity", &self.validity)
            .field("focus", &self.focus)
            .field("form_complete", &self.form_complete)
            .finish_non_exhaustive()
    }
}

/// Everything the host must apply once a transition sequence settles.
#[derive(Debug, Clone)]
pub struct TransitionCompleted {
    /// The step just entered.
    pub step: Step,
    /// Icon the step affordance should now show.
    pub affordance: Affordance,
    /// Field to focus.
    pub focus: FocusTarget,
    /// Truncated display replacing the full number (metadata step only).
    pub last_four: Option<String>,
    /// Recomputed metadata field lengths (metadata step only).
    pub metadata_max_lengths: Option<[usize; 3]>,
    /// Re-run number state (number step only).
    pub number: Option<InputState>,
    /// Re-validated first metadata field (metadata step only).
    pub metadata: Option<MetadataOutcome>,
}

/// A card-entry widget instance.
///
/// ```
/// use cardflow::{Cardflow, Config, Step, Validity};
///
/// let mut form = Cardflow::new(Config::default());
/// let out = form.number_input("4242424242424242", 16).unwrap();
/// assert_eq!(out.state.brand.as_deref(), Some("visa"));
/// assert_eq!(out.state.validity, Validity::Valid);
///
/// // A complete, checksum-passing number starts the forward transition.
/// assert!(out.transition.is_some());
/// form.complete_transition();
/// assert_eq!(form.step(), Step::EnteringMetadata);
/// ```
pub struct Cardflow {
    config: Config,
    controller: StepController,
    digits: Zeroizing<String>,
    committed: Option<Zeroizing<String>>,
    detected: Option<String>,
    number_validity: Validity,
    metadata: MetadataSet,
    aggregate_valid: bool,
}

impl Cardflow {
    /// Creates a widget over a validated configuration.
    pub fn new(config: Config) -> Self {
        let code_length = config.brands.fallback().code_length();
        Self {
            controller: StepController::new(),
            digits: Zeroizing::new(String::new()),
            committed: None,
            detected: None,
            number_validity: Validity::Incomplete,
            metadata: MetadataSet::new(code_length),
            aggregate_valid: false,
            config,
        }
    }

    /// The active configuration snapshot.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current step.
    #[inline]
    pub fn step(&self) -> Step {
        self.controller.step()
    }

    /// True while a transition sequence is outstanding.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// True while automatic forward progression is suppressed.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.controller.is_held()
    }

    /// Validity of the primary number as of the last keystroke.
    #[inline]
    pub fn number_validity(&self) -> Validity {
        self.number_validity
    }

    /// Currently detected brand id.
    #[inline]
    pub fn detected_brand(&self) -> Option<&str> {
        self.detected.as_deref()
    }

    /// True once all three metadata fields are valid.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.aggregate_valid
    }

    /// The metadata field states.
    #[inline]
    pub fn metadata(&self) -> &MetadataSet {
        &self.metadata
    }

    /// The canonical (unspaced) card number, present only while the number
    /// is valid.
    ///
    /// # Security Warning
    ///
    /// This exposes the full number for the host's own submission logic.
    /// Never log the result.
    pub fn card_number(&self) -> Option<&str> {
        self.committed.as_deref().map(String::as_str)
    }

    /// Processes a number-field keystroke.
    ///
    /// Returns `None` while a transition is in flight or outside the
    /// number step (the keystroke is silently ignored). A keystroke that
    /// introduces a non-card character leaves the held digits untouched
    /// and reports an invalid, attention-flagged cycle.
    pub fn number_input(&mut self, text: &str, cursor: usize) -> Option<NumberOutcome> {
        if self.controller.is_busy() || self.controller.step() != Step::EnteringNumber {
            return None;
        }

        let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if !stripped.chars().all(|c| c.is_ascii_digit()) {
            trace!("non-numeric keystroke rejected");
            (self.config.callbacks.on_invalid)();
            self.number_validity = Validity::Invalid;
            self.committed = None;
            let mut state = self.render_number_state(cursor);
            state.validity = Validity::Invalid;
            state.attention = true;
            return Some(NumberOutcome {
                state,
                transition: None,
            });
        }

        let interval = self.config.grouping_interval;
        let width = self.config.grouping_width;

        // Detection runs on the full candidate so an overlong paste still
        // resolves its brand before truncation.
        let detected = self.config.brands.detect(&stripped);
        let rule = self.config.brands.effective(detected);
        let rule_id = detected.map(|r| r.id().to_string());
        let rule_max = rule.max_length();

        let mut digits = stripped;
        digits.truncate(rule_max);

        let validity = field::number_validity(&digits, rule);
        let (formatted, cursor) = format::format_with_cursor(&digits, cursor, interval, width);
        let placeholder = self
            .config
            .enable_placeholder
            .then(|| format::placeholder_overlay(rule_max, interval, width, digits.len()));
        let max_display_length = format::formatted_length(rule_max, interval, width);

        if rule_id != self.detected {
            debug!(brand = ?rule_id, "card brand changed");
            (self.config.callbacks.on_change_card_type)(rule_id.as_deref());
            self.detected = rule_id;
        }

        self.number_validity = validity;
        self.committed = if validity.is_valid() {
            Some(Zeroizing::new(digits.clone()))
        } else {
            None
        };
        let len = digits.len();
        self.digits = Zeroizing::new(digits);

        if validity.is_invalid() {
            (self.config.callbacks.on_invalid)();
        }

        let transition = if validity.is_valid() && len == rule_max && !self.controller.is_held() {
            self.controller.request(Step::EnteringMetadata)
        } else {
            None
        };

        trace!(len, ?validity, "number keystroke processed");
        Some(NumberOutcome {
            state: InputState {
                formatted,
                cursor,
                brand: self.detected.clone(),
                validity,
                placeholder,
                max_display_length,
                attention: validity.is_invalid(),
            },
            transition,
        })
    }

    /// Processes a metadata-field keystroke against the current local date.
    pub fn metadata_input(&mut self, kind: FieldKind, text: &str) -> Option<MetadataOutcome> {
        self.metadata_input_at(kind, text, Local::now().date_naive())
    }

    /// Processes a metadata-field keystroke at an explicit evaluation date.
    ///
    /// Returns `None` outside the metadata step. The expiry value is
    /// normalized (separator auto-inserted) before validation; the
    /// normalized text is what the host pushes back into the field.
    pub fn metadata_input_at(
        &mut self,
        kind: FieldKind,
        text: &str,
        today: NaiveDate,
    ) -> Option<MetadataOutcome> {
        if self.controller.step() != Step::EnteringMetadata {
            return None;
        }

        let value = match kind {
            FieldKind::Expiry => expiry::normalize(text),
            FieldKind::Code | FieldKind::Postal => text.to_string(),
        };
        let max_length = self.metadata.field(kind).max_length();
        let validity = field::metadata_validity_at(kind, &value, max_length, today);
        self.metadata
            .field_mut(kind)
            .set_value(value.clone(), validity);

        if validity.is_invalid() {
            (self.config.callbacks.on_invalid)();
        }

        let focus = if value.is_empty() && kind != FieldKind::Expiry {
            Some(FocusHint::Previous)
        } else if validity.is_valid() && kind != FieldKind::Postal && value.len() >= max_length {
            Some(FocusHint::Next)
        } else {
            None
        };

        let all_valid = self.metadata.all_valid();
        if all_valid {
            if !self.aggregate_valid {
                debug!("metadata complete");
                (self.config.callbacks.on_valid)();
            }
        } else {
            (self.config.callbacks.on_incomplete)();
        }
        self.aggregate_valid = all_valid;

        trace!(?kind, ?validity, "metadata keystroke processed");
        Some(MetadataOutcome {
            kind,
            show_placeholder: value.is_empty(),
            value,
            validity,
            max_length,
            focus,
            attention: validity.is_invalid(),
            form_complete: all_valid,
        })
    }

    /// Explicit forward affordance: requests the transition into the
    /// metadata step. `None` when not performed.
    pub fn request_forward(&mut self) -> Option<TransitionPlan> {
        self.controller.request(Step::EnteringMetadata)
    }

    /// Explicit backward affordance (clicking the truncated number
    /// display): requests the transition back to the number step. `None`
    /// when not performed.
    pub fn request_backward(&mut self) -> Option<TransitionPlan> {
        self.controller.request(Step::EnteringNumber)
    }

    /// Reports the outstanding transition sequence settled, against the
    /// current local date.
    pub fn complete_transition(&mut self) -> Option<TransitionCompleted> {
        self.complete_transition_at(Local::now().date_naive())
    }

    /// Reports the outstanding transition sequence settled.
    ///
    /// Applies the step mutation and returns what the host must render:
    /// entering the metadata step recomputes field lengths from the brand,
    /// reveals the last four digits, and re-validates the first metadata
    /// field; returning to the number step re-runs number validation and
    /// formatting with progression held.
    pub fn complete_transition_at(&mut self, today: NaiveDate) -> Option<TransitionCompleted> {
        let step = self.controller.complete()?;
        match step {
            Step::EnteringMetadata => {
                let code_length = {
                    let brands = &self.config.brands;
                    let detected = self.detected.as_deref().and_then(|id| brands.get(id));
                    brands.effective(detected).code_length()
                };
                self.metadata.resize_for(code_length);

                let last_four = {
                    let digits: &str = &self.digits;
                    digits[digits.len().saturating_sub(4)..].to_string()
                };
                let expiry_value = self.metadata.field(FieldKind::Expiry).value().to_string();
                let metadata = self.metadata_input_at(FieldKind::Expiry, &expiry_value, today);

                Some(TransitionCompleted {
                    step,
                    affordance: Affordance::Confirm,
                    focus: FocusTarget::MetadataField(FieldKind::Expiry),
                    last_four: Some(last_four),
                    metadata_max_lengths: Some(self.metadata.max_lengths()),
                    number: None,
                    metadata,
                })
            }
            Step::EnteringNumber => {
                let text = (*self.digits).clone();
                let cursor = text.len();
                let number = self.number_input(&text, cursor).map(|o| o.state);
                Some(TransitionCompleted {
                    step,
                    affordance: Affordance::Forward,
                    focus: FocusTarget::NumberField,
                    last_four: None,
                    metadata_max_lengths: None,
                    number,
                    metadata: None,
                })
            }
        }
    }

    /// Replaces the configuration snapshot, optionally resetting the
    /// widget to its initial state.
    pub fn update(&mut self, config: Config, reinitialize: bool) {
        self.config = config;
        if reinitialize {
            self.controller = StepController::new();
            self.digits = Zeroizing::new(String::new());
            self.committed = None;
            self.detected = None;
            self.number_validity = Validity::Incomplete;
            self.metadata.reset();
            self.metadata
                .resize_for(self.config.brands.fallback().code_length());
            self.aggregate_valid = false;
        }
    }

    /// The output values under their configured field names, in order:
    /// card number (canonical, empty while not valid), expiry, code,
    /// postal.
    pub fn form_values(&self) -> Vec<(String, String)> {
        let number = self
            .committed
            .as_ref()
            .map(|c| (**c).clone())
            .unwrap_or_default();
        vec![
            (self.config.card_number_field_name.clone(), number),
            (
                self.config.expiry_field_name.clone(),
                self.metadata.field(FieldKind::Expiry).value().to_string(),
            ),
            (
                self.config.code_field_name.clone(),
                self.metadata.field(FieldKind::Code).value().to_string(),
            ),
            (
                self.config.postal_field_name.clone(),
                self.metadata.field(FieldKind::Postal).value().to_string(),
            ),
        ]
    }

    fn render_number_state(&self, cursor: usize) -> InputState {
        let interval = self.config.grouping_interval;
        let width = self.config.grouping_width;
        let brands = &self.config.brands;
        let detected = self.detected.as_deref().and_then(|id| brands.get(id));
        let rule = brands.effective(detected);
        let (formatted, cursor) = format::format_with_cursor(&self.digits, cursor, interval, width);
        InputState {
            formatted,
            cursor,
            brand: self.detected.clone(),
            validity: self.number_validity,
            placeholder: self.config.enable_placeholder.then(|| {
                format::placeholder_overlay(rule.max_length(), interval, width, self.digits.len())
            }),
            max_display_length: format::formatted_length(rule.max_length(), interval, width),
            attention: false,
        }
    }
}

impl fmt::Debug for Cardflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Card data never reaches debug output
        f.debug_struct("Cardflow")
            .field("step", &self.controller.step())
            .field("busy", &self.controller.is_busy())
            .field("digits", &format_args!("[{} digits]", self.digits.len()))
            .field("brand", &self.detected)
            .field("validity", &self.number_validity)
            .finish_non_exhaustive()
    }
}
