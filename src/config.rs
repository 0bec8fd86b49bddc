//! Widget configuration: an immutable snapshot built once per instance.
//!
//! Options merge over documented defaults; the brand rule table deep-merges
//! user-supplied rules over the built-ins unless explicitly cleared. The
//! snapshot is captured at construction and replaced atomically on update,
//! never mutated in place.
//!
//! ```
//! use cardflow::config::Config;
//! use cardflow::brand::BrandSpec;
//!
//! let config = Config::builder()
//!     .grouping_interval(4)
//!     .grouping_width(1)
//!     .brand("visa", BrandSpec { code_length: Some(4), ..BrandSpec::default() })
//!     .on_valid(|| println!("ready to submit"))
//!     .build()
//!     .unwrap();
//! assert_eq!(config.grouping_width(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::brand::{BrandSpec, BrandTable};
use crate::error::ConfigError;

/// Static validation hint the host renders when
/// [`Config::show_error_message`] is set.
pub const ERROR_HINT: &str = "Please enter a valid card number.";

/// Hook fired without arguments (`on_valid`, `on_incomplete`, `on_invalid`).
pub type EventHook = Arc<dyn Fn() + Send + Sync>;

/// Hook fired with the newly detected brand id, `None` when detection was
/// retracted.
pub type BrandHook = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// The four callback kinds the widget emits. All default to no-ops.
#[derive(Clone)]
pub struct Callbacks {
    pub(crate) on_valid: EventHook,
    pub(crate) on_incomplete: EventHook,
    pub(crate) on_invalid: EventHook,
    pub(crate) on_change_card_type: BrandHook,
}

impl Default for Callbacks {
    fn default() -> Self {
        Self {
            on_valid: Arc::new(|| {}),
            on_incomplete: Arc::new(|| {}),
            on_invalid: Arc::new(|| {}),
            on_change_card_type: Arc::new(|_| {}),
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callbacks { .. }")
    }
}

/// Immutable configuration snapshot.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) grouping_interval: usize,
    pub(crate) grouping_width: usize,
    pub(crate) field_selector: String,
    pub(crate) container_class_extra: String,
    pub(crate) card_number_field_name: String,
    pub(crate) expiry_field_name: String,
    pub(crate) code_field_name: String,
    pub(crate) postal_field_name: String,
    pub(crate) brands: BrandTable,
    pub(crate) callbacks: Callbacks,
    pub(crate) show_error_message: bool,
    pub(crate) enable_placeholder: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grouping_interval: 4,
            grouping_width: 2,
            field_selector: r#"input[type="text"]"#.to_string(),
            container_class_extra: String::new(),
            card_number_field_name: "credit-card-number".to_string(),
            expiry_field_name: "credit-card-expiry".to_string(),
            code_field_name: "credit-card-cvv".to_string(),
            postal_field_name: "credit-card-zip".to_string(),
            brands: BrandTable::builtin(),
            callbacks: Callbacks::default(),
            show_error_message: false,
            enable_placeholder: true,
        }
    }
}

impl Config {
    /// Starts a builder over the documented defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Digit count per formatted group.
    #[inline]
    pub fn grouping_interval(&self) -> usize {
        self.grouping_interval
    }

    /// Spacer repetitions between groups.
    #[inline]
    pub fn grouping_width(&self) -> usize {
        self.grouping_width
    }

    /// How the host locates target input elements.
    #[inline]
    pub fn field_selector(&self) -> &str {
        &self.field_selector
    }

    /// Extra styling class the host applies to the generated wrapper.
    #[inline]
    pub fn container_class_extra(&self) -> &str {
        &self.container_class_extra
    }

    /// Output field name for the canonical card number.
    #[inline]
    pub fn card_number_field_name(&self) -> &str {
        &self.card_number_field_name
    }

    /// Output field name for the expiry value.
    #[inline]
    pub fn expiry_field_name(&self) -> &str {
        &self.expiry_field_name
    }

    /// Output field name for the security code.
    #[inline]
    pub fn code_field_name(&self) -> &str {
        &self.code_field_name
    }

    /// Output field name for the postal code.
    #[inline]
    pub fn postal_field_name(&self) -> &str {
        &self.postal_field_name
    }

    /// The brand rule table.
    #[inline]
    pub fn brands(&self) -> &BrandTable {
        &self.brands
    }

    /// Whether the host renders a static validation hint.
    #[inline]
    pub fn show_error_message(&self) -> bool {
        self.show_error_message
    }

    /// Whether the zero-filled placeholder overlay is produced.
    #[inline]
    pub fn enable_placeholder(&self) -> bool {
        self.enable_placeholder
    }
}

enum BrandOp {
    Clear,
    Merge(String, BrandSpec),
}

/// Builds a validated [`Config`].
///
/// Every option is optional; unset options keep their defaults. Brand
/// operations are applied in call order against the built-in table (or an
/// empty one after [`ConfigBuilder::clear_brands`]).
#[derive(Default)]
pub struct ConfigBuilder {
    grouping_interval: Option<usize>,
    grouping_width: Option<usize>,
    field_selector: Option<String>,
    container_class_extra: Option<String>,
    card_number_field_name: Option<String>,
    expiry_field_name: Option<String>,
    code_field_name: Option<String>,
    postal_field_name: Option<String>,
    brand_ops: Vec<BrandOp>,
    callbacks: Callbacks,
    show_error_message: Option<bool>,
    enable_placeholder: Option<bool>,
}

impl ConfigBuilder {
    /// Digit count per formatted group (default 4).
    pub fn grouping_interval(mut self, interval: usize) -> Self {
        self.grouping_interval = Some(interval);
        self
    }

    /// Spacer repetitions between groups (default 2).
    pub fn grouping_width(mut self, width: usize) -> Self {
        self.grouping_width = Some(width);
        self
    }

    /// How the host locates target input elements.
    pub fn field_selector(mut self, selector: impl Into<String>) -> Self {
        self.field_selector = Some(selector.into());
        self
    }

    /// Extra styling class for the generated wrapper.
    pub fn container_class_extra(mut self, class: impl Into<String>) -> Self {
        self.container_class_extra = Some(class.into());
        self
    }

    /// Output field name for the canonical card number.
    pub fn card_number_field_name(mut self, name: impl Into<String>) -> Self {
        self.card_number_field_name = Some(name.into());
        self
    }

    /// Output field name for the expiry value.
    pub fn expiry_field_name(mut self, name: impl Into<String>) -> Self {
        self.expiry_field_name = Some(name.into());
        self
    }

    /// Output field name for the security code.
    pub fn code_field_name(mut self, name: impl Into<String>) -> Self {
        self.code_field_name = Some(name.into());
        self
    }

    /// Output field name for the postal code.
    pub fn postal_field_name(mut self, name: impl Into<String>) -> Self {
        self.postal_field_name = Some(name.into());
        self
    }

    /// Drops the built-in brand rules, keeping only the fallback.
    pub fn clear_brands(mut self) -> Self {
        self.brand_ops.push(BrandOp::Clear);
        self
    }

    /// Deep-merges a brand rule over the table by id.
    pub fn brand(mut self, id: impl Into<String>, spec: BrandSpec) -> Self {
        self.brand_ops.push(BrandOp::Merge(id.into(), spec));
        self
    }

    /// Hook fired when the metadata fields first all become valid.
    pub fn on_valid(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_valid = Arc::new(hook);
        self
    }

    /// Hook fired after a metadata keystroke that leaves the form
    /// incomplete.
    pub fn on_incomplete(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_incomplete = Arc::new(hook);
        self
    }

    /// Hook fired when a field turns definitively invalid.
    pub fn on_invalid(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.callbacks.on_invalid = Arc::new(hook);
        self
    }

    /// Hook fired when the detected brand changes.
    pub fn on_change_card_type(
        mut self,
        hook: impl Fn(Option<&str>) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_change_card_type = Arc::new(hook);
        self
    }

    /// Whether the host renders a static validation hint (default false).
    pub fn show_error_message(mut self, show: bool) -> Self {
        self.show_error_message = Some(show);
        self
    }

    /// Whether the placeholder overlay is produced (default true).
    pub fn enable_placeholder(mut self, enable: bool) -> Self {
        self.enable_placeholder = Some(enable);
        self
    }

    /// Validates and assembles the snapshot.
    ///
    /// Fails fast on a zero grouping interval or width, an empty field
    /// name, or a malformed brand rule.
    pub fn build(self) -> Result<Config, ConfigError> {
        let defaults = Config::default();

        let grouping_interval = self.grouping_interval.unwrap_or(defaults.grouping_interval);
        if grouping_interval == 0 {
            return Err(ConfigError::InvalidGroupingInterval);
        }
        let grouping_width = self.grouping_width.unwrap_or(defaults.grouping_width);
        if grouping_width == 0 {
            return Err(ConfigError::InvalidGroupingWidth);
        }

        let card_number_field_name = self
            .card_number_field_name
            .unwrap_or(defaults.card_number_field_name);
        let expiry_field_name = self.expiry_field_name.unwrap_or(defaults.expiry_field_name);
        let code_field_name = self.code_field_name.unwrap_or(defaults.code_field_name);
        let postal_field_name = self.postal_field_name.unwrap_or(defaults.postal_field_name);
        for (field, name) in [
            ("card number", card_number_field_name.as_str()),
            ("expiry", expiry_field_name.as_str()),
            ("code", code_field_name.as_str()),
            ("postal", postal_field_name.as_str()),
        ] {
            if name.is_empty() {
                return Err(ConfigError::EmptyFieldName { field });
            }
        }

        let mut brands = defaults.brands;
        for op in self.brand_ops {
            match op {
                BrandOp::Clear => brands.clear(),
                BrandOp::Merge(id, spec) => brands.merge(&id, spec)?,
            }
        }

        Ok(Config {
            grouping_interval,
            grouping_width,
            field_selector: self.field_selector.unwrap_or(defaults.field_selector),
            container_class_extra: self
                .container_class_extra
                .unwrap_or(defaults.container_class_extra),
            card_number_field_name,
            expiry_field_name,
            code_field_name,
            postal_field_name,
            brands,
            callbacks: self.callbacks,
            show_error_message: self.show_error_message.unwrap_or(defaults.show_error_message),
            enable_placeholder: self.enable_placeholder.unwrap_or(defaults.enable_placeholder),
        })
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigBuilder { .. }")
    }
}
