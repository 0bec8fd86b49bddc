//! # cardflow
//!
//! Two-step payment-card input core. The crate owns the incremental-input
//! state machine behind a card entry form: it masks and validates the card
//! number as it is typed, detects the brand from partial input, formats
//! grouped digits with live cursor preservation, and, once the number is
//! complete and passes its checksum, transitions to a second step
//! collecting expiry, security code, and postal code, validating each
//! incrementally.
//!
//! Page layout, styling, and submission are external collaborators: the
//! host feeds raw field text in, renders the returned state, and reads
//! validated values back out. The core never performs I/O.
//!
//! ## Quick Start
//!
//! ```rust
//! use cardflow::{Cardflow, Config, FieldKind, Step, Validity};
//! use chrono::NaiveDate;
//!
//! let mut form = Cardflow::new(Config::default());
//!
//! // Keystrokes flow through the number pipeline
//! let out = form.number_input("4242424242", 10).unwrap();
//! assert_eq!(out.state.brand.as_deref(), Some("visa"));
//! assert_eq!(out.state.formatted, "4242  4242  42");
//! // Ten digits are neither valid nor flagged invalid
//! assert_eq!(out.state.validity, Validity::Incomplete);
//!
//! // A complete number with a passing checksum starts the hand-off
//! let out = form.number_input("4242424242424242", 16).unwrap();
//! assert!(out.transition.is_some());
//! form.complete_transition();
//! assert_eq!(form.step(), Step::EnteringMetadata);
//!
//! // Metadata fields validate incrementally too
//! let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
//! let out = form.metadata_input_at(FieldKind::Expiry, "1230", today).unwrap();
//! assert_eq!(out.value, "12/30");
//! assert_eq!(out.validity, Validity::Valid);
//! ```
//!
//! ## Validation callbacks
//!
//! The widget emits exactly four callback kinds, configured on the
//! [`Config`] builder: `on_valid` (all metadata fields complete),
//! `on_incomplete`, `on_invalid` (a field turned definitively wrong,
//! paired with an attention signal in the returned outcome), and
//! `on_change_card_type`.
//!
//! ```rust
//! use cardflow::Config;
//!
//! let config = Config::builder()
//!     .on_valid(|| println!("enable the submit button"))
//!     .on_incomplete(|| println!("disable the submit button"))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Brand rules
//!
//! Built-in rules cover amex, discover, mastercard, and visa, with a
//! fallback supplying lengths when nothing matches. User rules deep-merge
//! over the built-ins:
//!
//! ```rust
//! use cardflow::{BrandSpec, Config};
//!
//! let config = Config::builder()
//!     .brand("storecard", BrandSpec {
//!         pattern: Some(r"^78[0-9]*$".into()),
//!         max_length: Some(19),
//!         ..BrandSpec::default()
//!     })
//!     .build()
//!     .unwrap();
//! assert!(config.brands().get("visa").is_some());
//! ```
//!
//! ## Security
//!
//! Stored card data follows the usual hygiene for payment fields:
//!
//! - The held digit string and committed number are zeroed on drop
//! - `Debug` output never contains the full number or the security code
//! - The canonical number is exposed through one documented accessor only

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod brand;
pub mod config;
pub mod error;
pub mod expiry;
pub mod field;
pub mod format;
pub mod luhn;
pub mod step;
pub mod widget;

// Re-export main types at crate root
pub use brand::{BrandRule, BrandSpec, BrandTable, FALLBACK_BRAND};
pub use config::{Callbacks, Config, ConfigBuilder, ERROR_HINT};
pub use error::ConfigError;
pub use field::{FieldKind, MetadataFieldState, MetadataSet, Validity};
pub use format::Overlay;
pub use step::{Affordance, Effect, Step, StepController, TransitionPlan};
pub use widget::{
    Cardflow, FocusHint, FocusTarget, InputState, MetadataOutcome, NumberOutcome,
    TransitionCompleted,
};
