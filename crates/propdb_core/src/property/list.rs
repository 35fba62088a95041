//! List-valued property definition.

use crate::entity::EntityCore;
use crate::error::CoreResult;
use crate::property::{commit_value, PropertyMeta};
use propdb_document::{ListView, Value};

/// An ordered-list property backed by a write-through view.
///
/// When constructed with [`ListProperty::keep_unique`], every mutating
/// operation on the view silently rejects values already present.
///
/// The string form is comma-separated elements; an element containing
/// the delimiter itself is not representable (documented limitation of
/// the format).
#[derive(Debug, Clone)]
pub struct ListProperty {
    meta: PropertyMeta,
    unique: bool,
}

impl ListProperty {
    /// Creates a list property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self {
            meta,
            unique: false,
        }
    }

    /// Enables uniqueness enforcement on every mutating view operation.
    #[must_use]
    pub fn keep_unique(mut self) -> Self {
        self.unique = true;
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

    /// Returns a live view over the list.
    ///
    /// An absent field is materialized as an empty list; mutations
    /// through the view land in the document directly.
    ///
    /// # Errors
    ///
    /// Fails if the field holds a non-list value.
    pub fn view<'a>(&self, core: &'a mut EntityCore) -> CoreResult<ListView<'a>> {
        let view = core.document_mut().list_view(self.meta.name())?;
        Ok(view.with_unique(self.unique))
    }

    /// Returns the current elements without materializing an absent
    /// field.
    pub fn get<'a>(&self, core: &'a EntityCore) -> Option<&'a [Value]> {
        core.document().get_list(self.meta.name())
    }

    /// Returns true if the list currently contains `value`.
    pub fn contains(&self, core: &EntityCore, value: &Value) -> bool {
        self.get(core).is_some_and(|items| items.contains(value))
    }

    /// Appends a value through a fresh view.
    ///
    /// Returns false if uniqueness is enabled and the value is already
    /// present.
    ///
    /// # Errors
    ///
    /// Fails if the field holds a non-list value.
    pub fn push(&self, core: &mut EntityCore, value: Value) -> CoreResult<bool> {
        Ok(self.view(core)?.push(value))
    }

    /// Replaces the whole list; `None` or an empty list removes the
    /// field.
    pub fn set(&self, core: &mut EntityCore, value: Option<Vec<Value>>) {
        self.set_with_audit(core, value, false);
    }

    /// Replaces the whole list, forcing the audit hook when requested.
    pub fn set_with_audit(
        &self,
        core: &mut EntityCore,
        value: Option<Vec<Value>>,
        force_audit: bool,
    ) {
        let value = value.filter(|items| !items.is_empty()).map(Value::List);
        commit_value(core, &self.meta, value, force_audit);
    }

    /// Parses the comma-separated string form into a list of text
    /// elements; blank text clears the field.
    ///
    /// # Errors
    ///
    /// Never fails for the text list form; the signature matches the
    /// rest of the family.
    pub fn set_from_string(
        &self,
        core: &mut EntityCore,
        text: &str,
        force_audit: bool,
    ) -> CoreResult<()> {
        let items: Vec<Value> = text
            .split(',')
            .map(str::trim)
            .filter(|element| !element.is_empty())
            .map(|element| Value::Text(element.to_string()))
            .collect();
        self.set_with_audit(core, Some(items), force_audit);
        Ok(())
    }
}
