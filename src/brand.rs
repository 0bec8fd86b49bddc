//! Card brand rules and prefix detection.
//!
//! A [`BrandTable`] holds an ordered list of [`BrandRule`]s. Detection
//! evaluates each rule's match pattern against the current digit string in
//! declaration order; the first match wins. A special fallback rule (id
//! `"default"`) is always present at the end of the table: it never matches
//! positively and only supplies length and code-length defaults when no
//! brand is detected.
//!
//! Built-in rules cover amex, discover, mastercard, and visa. Patterns are
//! prefix-shaped so a brand locks in from a short prefix and is retracted
//! again when edits make the prefix match nothing:
//!
//! ```
//! use cardflow::brand::BrandTable;
//!
//! let table = BrandTable::builtin();
//! assert_eq!(table.detect("4").map(|r| r.id()), Some("visa"));
//! assert_eq!(table.detect("5105").map(|r| r.id()), Some("mastercard"));
//! assert_eq!(table.detect("37").map(|r| r.id()), Some("amex"));
//! assert!(table.detect("1234").is_none());
//! ```

use regex::Regex;

use crate::error::ConfigError;

/// Id of the fallback rule, always present in a table.
pub const FALLBACK_BRAND: &str = "default";

/// A single brand's numbering scheme: match pattern, length bounds, and
/// security code length.
///
/// Immutable once constructed; tables replace rules wholesale on merge.
#[derive(Debug, Clone)]
pub struct BrandRule {
    id: String,
    pattern_source: Option<String>,
    pattern: Option<Regex>,
    min_length: Option<usize>,
    max_length: usize,
    code_length: usize,
}

impl BrandRule {
    /// Builds a rule, compiling its match pattern.
    ///
    /// `pattern: None` produces a rule that never matches (the fallback
    /// shape). Fails fast on a malformed pattern or inconsistent length
    /// bounds.
    pub fn new(
        id: &str,
        pattern: Option<&str>,
        min_length: Option<usize>,
        max_length: usize,
        code_length: usize,
    ) -> Result<Self, ConfigError> {
        if max_length == 0 {
            return Err(ConfigError::ZeroBrandLength { id: id.to_string() });
        }
        if let Some(min) = min_length {
            if min > max_length {
                return Err(ConfigError::InvalidBrandLengths {
                    id: id.to_string(),
                    min,
                    max: max_length,
                });
            }
        }
        let compiled = match pattern {
            Some(src) => Some(Regex::new(src).map_err(|source| {
                ConfigError::InvalidBrandPattern {
                    id: id.to_string(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(Self {
            id: id.to_string(),
            pattern_source: pattern.map(str::to_string),
            pattern: compiled,
            min_length,
            max_length,
            code_length,
        })
    }

    /// The rule's id (e.g. `"visa"`).
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The source text of the match pattern, if the rule has one.
    #[inline]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern_source.as_deref()
    }

    /// Minimum accepted digit count, when the brand allows a range.
    #[inline]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Maximum digit count for this brand.
    #[inline]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Security code length for this brand.
    #[inline]
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Digit count at which the number may first validate: the minimum
    /// when one is declared, the maximum otherwise.
    #[inline]
    pub fn required_length(&self) -> usize {
        self.min_length.unwrap_or(self.max_length)
    }

    /// Whether this rule positively matches the given digit string.
    ///
    /// A rule without a pattern (the fallback) matches nothing.
    #[inline]
    pub fn matches(&self, digits: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| re.is_match(digits))
    }
}

/// Per-field override used when merging a rule into a table.
///
/// Unset fields keep the current value (or the fallback's defaults for a
/// brand new id). This mirrors the deep-merge the configuration performs
/// over the built-in table.
#[derive(Debug, Clone, Default)]
pub struct BrandSpec {
    /// Replacement match pattern.
    pub pattern: Option<String>,
    /// Replacement minimum length.
    pub min_length: Option<usize>,
    /// Replacement maximum length.
    pub max_length: Option<usize>,
    /// Replacement security code length.
    pub code_length: Option<usize>,
}

/// An ordered brand rule table with a guaranteed fallback rule.
#[derive(Debug, Clone)]
pub struct BrandTable {
    // Fallback rule is maintained in the last slot by construction.
    rules: Vec<BrandRule>,
}

impl BrandTable {
    /// The built-in table: amex, discover, mastercard, visa, fallback.
    pub fn builtin() -> Self {
        let specs: [(&str, Option<&str>, Option<usize>, usize, usize); 5] = [
            ("amex", Some(r"^3[47][0-9]*$"), None, 15, 4),
            ("discover", Some(r"^6(?:011|5[0-9]{2})[0-9]*$"), None, 16, 3),
            ("mastercard", Some(r"^5[1-5][0-9]*$"), None, 16, 3),
            ("visa", Some(r"^4[0-9]*$"), Some(13), 16, 3),
            (FALLBACK_BRAND, None, Some(16), 16, 3),
        ];
        let rules = specs
            .iter()
            .map(|&(id, pattern, min, max, code)| BrandRule::new(id, pattern, min, max, code))
            .collect::<Result<Vec<_>, _>>()
            .expect("built-in brand rules are well formed");
        Self { rules }
    }

    /// Removes every rule except the fallback.
    pub fn clear(&mut self) {
        self.rules.retain(|r| r.id == FALLBACK_BRAND);
    }

    /// Merges a rule into the table by id.
    ///
    /// An existing rule keeps any field left unset; an unknown id
    /// is appended ahead of the fallback, borrowing the fallback's lengths
    /// for unset fields. A pattern supplied for the fallback id is ignored:
    /// the fallback never matches, only its lengths are adjustable.
    pub fn merge(&mut self, id: &str, spec: BrandSpec) -> Result<(), ConfigError> {
        if let Some(pos) = self.rules.iter().position(|r| r.id == id) {
            let current = &self.rules[pos];
            let pattern = if id == FALLBACK_BRAND {
                None
            } else {
                spec.pattern
                    .as_deref()
                    .or(current.pattern_source.as_deref())
            };
            let merged = BrandRule::new(
                id,
                pattern,
                spec.min_length.or(current.min_length),
                spec.max_length.unwrap_or(current.max_length),
                spec.code_length.unwrap_or(current.code_length),
            )?;
            self.rules[pos] = merged;
        } else {
            let fallback = self.fallback();
            let rule = BrandRule::new(
                id,
                spec.pattern.as_deref(),
                spec.min_length,
                spec.max_length.unwrap_or(fallback.max_length),
                spec.code_length.unwrap_or(fallback.code_length),
            )?;
            let at = self.rules.len() - 1;
            self.rules.insert(at, rule);
        }
        Ok(())
    }

    /// First rule whose pattern matches the digit string, in table order.
    ///
    /// `None` when nothing matches; the fallback never matches positively.
    pub fn detect(&self, digits: &str) -> Option<&BrandRule> {
        if digits.is_empty() {
            return None;
        }
        self.rules.iter().find(|r| r.matches(digits))
    }

    /// The rule governing length and format: the detected brand when there
    /// is one, the fallback otherwise.
    #[inline]
    pub fn effective<'a>(&'a self, detected: Option<&'a BrandRule>) -> &'a BrandRule {
        detected.unwrap_or_else(|| self.fallback())
    }

    /// The fallback rule.
    #[inline]
    pub fn fallback(&self) -> &BrandRule {
        // Last slot by construction; clear() and merge() preserve this.
        &self.rules[self.rules.len() - 1]
    }

    /// Looks a rule up by id.
    pub fn get(&self, id: &str) -> Option<&BrandRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Iterates over the rules in evaluation order, fallback last.
    pub fn iter(&self) -> impl Iterator<Item = &BrandRule> {
        self.rules.iter()
    }

    /// Number of rules, including the fallback.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false; the fallback rule is never removed.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for BrandTable {
    fn default() -> Self {
        Self::builtin()
    }
}
