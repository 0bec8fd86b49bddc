//! Construction-time configuration errors.
//!
//! Runtime invalidity (a bad card number, an expired date) is never an error;
//! it is reported as [`Validity`](crate::field::Validity) state. The variants
//! here cover contract violations in the configuration itself, which fail
//! fast when the configuration is built.

use thiserror::Error;

/// A malformed widget configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The digit-grouping interval was zero.
    #[error("grouping interval must be at least 1")]
    InvalidGroupingInterval,

    /// The spacer repetition count was zero.
    #[error("grouping width must be at least 1")]
    InvalidGroupingWidth,

    /// One of the output field name bindings was empty.
    #[error("{field} field name must not be empty")]
    EmptyFieldName {
        /// Which binding was empty.
        field: &'static str,
    },

    /// A brand rule's match pattern failed to compile.
    #[error("brand rule `{id}`: invalid match pattern: {source}")]
    InvalidBrandPattern {
        /// The offending rule id.
        id: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A brand rule declared a minimum length above its maximum.
    #[error("brand rule `{id}`: minimum length {min} exceeds maximum length {max}")]
    InvalidBrandLengths {
        /// The offending rule id.
        id: String,
        /// Declared minimum.
        min: usize,
        /// Declared maximum.
        max: usize,
    },

    /// A brand rule declared a zero maximum length.
    #[error("brand rule `{id}`: maximum length must be at least 1")]
    ZeroBrandLength {
        /// The offending rule id.
        id: String,
    },
}
