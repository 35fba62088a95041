//! Scalar property definitions.

use crate::entity::EntityCore;
use crate::error::{CoreError, CoreResult};
use crate::property::{commit_value, PropertyMeta};
use propdb_document::Value;

/// A text-valued property.
#[derive(Debug, Clone)]
pub struct StringProperty {
    meta: PropertyMeta,
    default: Option<String>,
}

impl StringProperty {
    /// Creates a string property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self {
            meta,
            default: None,
        }
    }

    /// Declares the default returned while the field is absent.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the bound field name.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the property metadata.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Returns the current value, or the declared default while absent.
    pub fn get(&self, core: &EntityCore) -> Option<String> {
        core.document()
            .get_text(self.meta.name())
            .map(str::to_string)
            .or_else(|| self.default.clone())
    }

    /// Writes the value; `None` removes the field.
    pub fn set(&self, core: &mut EntityCore, value: Option<impl Into<String>>) {
        self.set_with_audit(core, value, false);
    }

    /// Writes the value, forcing the audit hook when requested.
    pub fn set_with_audit(
        &self,
        core: &mut EntityCore,
        value: Option<impl Into<String>>,
        force_audit: bool,
    ) {
        commit_value(
            core,
            &self.meta,
            value.map(|v| Value::Text(v.into())),
            force_audit,
        );
    }

    /// Parses the string form; blank text clears the field.
    ///
    /// # Errors
    ///
    /// Never fails for strings; the signature matches the rest of the
    /// family.
    pub fn set_from_string(
        &self,
        core: &mut EntityCore,
        text: &str,
        force_audit: bool,
    ) -> CoreResult<()> {
        let trimmed = text.trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.set_with_audit(core, value, force_audit);
        Ok(())
    }
}

/// A boolean-valued property.
#[derive(Debug, Clone)]
pub struct BoolProperty {
    meta: PropertyMeta,
    default: Option<bool>,
}

impl BoolProperty {
    /// Creates a boolean property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self {
            meta,
            default: None,
        }
    }

    /// Declares the default returned while the field is absent.
    #[must_use]
    pub fn with_default(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns the bound field name.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the property metadata.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Returns the current value, or the declared default while absent.
    pub fn get(&self, core: &EntityCore) -> Option<bool> {
        core.document().get_bool(self.meta.name()).or(self.default)
    }

    /// Writes the value; `None` removes the field.
    pub fn set(&self, core: &mut EntityCore, value: Option<bool>) {
        self.set_with_audit(core, value, false);
    }

    /// Writes the value, forcing the audit hook when requested.
    pub fn set_with_audit(&self, core: &mut EntityCore, value: Option<bool>, force_audit: bool) {
        commit_value(core, &self.meta, value.map(Value::Bool), force_audit);
    }

    /// Parses the string form (`true`/`false`); blank text clears the
    /// field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the text is not a boolean.
    pub fn set_from_string(
        &self,
        core: &mut EntityCore,
        text: &str,
        force_audit: bool,
    ) -> CoreResult<()> {
        let trimmed = text.trim();
        let value = if trimmed.is_empty() {
            None
        } else {
            Some(
                trimmed
                    .parse::<bool>()
                    .map_err(|e| CoreError::parse(self.meta.name(), e.to_string()))?,
            )
        };
        self.set_with_audit(core, value, force_audit);
        Ok(())
    }
}

/// A long-integer property with counter arithmetic.
#[derive(Debug, Clone)]
pub struct LongProperty {
    meta: PropertyMeta,
    default: Option<i64>,
}

impl LongProperty {
    /// Creates a long property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self {
            meta,
            default: None,
        }
    }

    /// Declares the default returned while the field is absent.
    #[must_use]
    pub fn with_default(mut self, value: i64) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns the bound field name.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the property metadata.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Returns the current value, or the declared default while absent.
    pub fn get(&self, core: &EntityCore) -> Option<i64> {
        core.document().get_i64(self.meta.name()).or(self.default)
    }

    /// Writes the value; `None` removes the field.
    pub fn set(&self, core: &mut EntityCore, value: Option<i64>) {
        self.set_with_audit(core, value, false);
    }

    /// Writes the value, forcing the audit hook when requested.
    pub fn set_with_audit(&self, core: &mut EntityCore, value: Option<i64>, force_audit: bool) {
        commit_value(core, &self.meta, value.map(Value::Int), force_audit);
    }

    /// Parses the string form; blank text clears the field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the text is not an integer.
    pub fn set_from_string(
        &self,
        core: &mut EntityCore,
        text: &str,
        force_audit: bool,
    ) -> CoreResult<()> {
        let trimmed = text.trim();
        let value = if trimmed.is_empty() {
            None
        } else {
            Some(
                trimmed
                    .parse::<i64>()
                    .map_err(|e| CoreError::parse(self.meta.name(), e.to_string()))?,
            )
        };
        self.set_with_audit(core, value, force_audit);
        Ok(())
    }

    /// Adds `delta` to the stored value, treating absent as zero.
    /// Overflow wraps as two's-complement arithmetic.
    pub fn add(&self, core: &mut EntityCore, delta: i64) {
        let current = self.get(core).unwrap_or(0);
        self.set(core, Some(current.wrapping_add(delta)));
    }

    /// Subtracts `value` from the stored value, wrapping on overflow.
    pub fn subtract(&self, core: &mut EntityCore, value: i64) {
        let current = self.get(core).unwrap_or(0);
        self.set(core, Some(current.wrapping_sub(value)));
    }

    /// Adds one.
    pub fn increment(&self, core: &mut EntityCore) {
        self.add(core, 1);
    }

    /// Subtracts one.
    pub fn decrement(&self, core: &mut EntityCore) {
        self.subtract(core, 1);
    }

    /// Returns true while the value is absent or zero.
    pub fn is_null_or_zero(&self, core: &EntityCore) -> bool {
        matches!(self.get(core), None | Some(0))
    }
}

/// A double-precision property.
#[derive(Debug, Clone)]
pub struct DoubleProperty {
    meta: PropertyMeta,
    default: Option<f64>,
}

impl DoubleProperty {
    /// Creates a double property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self {
            meta,
            default: None,
        }
    }

    /// Declares the default returned while the field is absent.
    #[must_use]
    pub fn with_default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    /// Returns the bound field name.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the property metadata.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Returns the current value, or the declared default while absent.
    pub fn get(&self, core: &EntityCore) -> Option<f64> {
        core.document().get_f64(self.meta.name()).or(self.default)
    }

    /// Writes the value; `None` removes the field.
    pub fn set(&self, core: &mut EntityCore, value: Option<f64>) {
        self.set_with_audit(core, value, false);
    }

    /// Writes the value, forcing the audit hook when requested.
    pub fn set_with_audit(&self, core: &mut EntityCore, value: Option<f64>, force_audit: bool) {
        commit_value(core, &self.meta, value.map(Value::Float), force_audit);
    }

    /// Parses the string form with locale-independent numeric parsing;
    /// blank text clears the field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if the text is not a number.
    pub fn set_from_string(
        &self,
        core: &mut EntityCore,
        text: &str,
        force_audit: bool,
    ) -> CoreResult<()> {
        let trimmed = text.trim();
        let value = if trimmed.is_empty() {
            None
        } else {
            Some(
                trimmed
                    .parse::<f64>()
                    .map_err(|e| CoreError::parse(self.meta.name(), e.to_string()))?,
            )
        };
        self.set_with_audit(core, value, force_audit);
        Ok(())
    }
}
