//! Nested typed-object properties.

use crate::entity::EntityCore;
use crate::error::{CoreError, CoreResult};
use crate::property::{commit_value, PropertyMeta};
use propdb_document::{Document, Value};
use std::marker::PhantomData;

/// A typed value stored as a nested document.
///
/// Implementors are built explicitly: construction via [`Default`], then
/// a fallible [`ComplexValue::merge_from`] that absorbs a raw document.
/// A merge failure means a fixed programming contract was violated, so
/// it surfaces as [`CoreError::Construction`] and is treated as fatal by
/// callers.
pub trait ComplexValue: Default + Clone + Send + 'static {
    /// Absorbs the raw document form into this value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Construction`] when the document does not
    /// satisfy the type's contract.
    fn merge_from(&mut self, document: &Document) -> CoreResult<()>;

    /// Renders this value back into its document form.
    fn to_document(&self) -> Document;

    /// Builds a fresh value from a raw document.
    ///
    /// # Errors
    ///
    /// Propagates the [`ComplexValue::merge_from`] failure.
    fn from_document(document: &Document) -> CoreResult<Self> {
        let mut value = Self::default();
        value.merge_from(document)?;
        Ok(value)
    }
}

/// A property holding one nested typed object.
#[derive(Debug, Clone)]
pub struct ComplexProperty<V> {
    meta: PropertyMeta,
    _value: PhantomData<fn() -> V>,
}

impl<V: ComplexValue> ComplexProperty<V> {
    /// Creates a complex property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self {
            meta,
            _value: PhantomData,
        }
    }

    /// Returns the bound field name.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the property metadata.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Reads and reconstructs the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Construction`] if the stored document does
    /// not satisfy the value type's contract.
    pub fn get(&self, core: &EntityCore) -> CoreResult<Option<V>> {
        match core.document().get_doc(self.meta.name()) {
            Some(document) => Ok(Some(V::from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Stores a value in its document form; `None` removes the field.
    pub fn set(&self, core: &mut EntityCore, value: Option<&V>) {
        self.set_with_audit(core, value, false);
    }

    /// Stores a value, forcing the audit hook when requested.
    pub fn set_with_audit(&self, core: &mut EntityCore, value: Option<&V>, force_audit: bool) {
        let value = value.map(|v| Value::Doc(v.to_document()));
        commit_value(core, &self.meta, value, force_audit);
    }
}

/// A property holding a string-keyed map of nested typed objects.
///
/// Entries may predate the value type's registration and exist as plain
/// raw documents. The first read through `V` upgrades them lazily:
/// [`ComplexMapProperty::get`] runs [`ComplexMapProperty::materialize`]
/// before looking up the entry, so every raw document in the map is
/// normalized through `V` in place (parse then re-render),
/// idempotently, with the change visible only inside the owning
/// document.
#[derive(Debug, Clone)]
pub struct ComplexMapProperty<V> {
    meta: PropertyMeta,
    _value: PhantomData<fn() -> V>,
}

impl<V: ComplexValue> ComplexMapProperty<V> {
    /// Creates a complex-map property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self {
            meta,
            _value: PhantomData,
        }
    }

    /// Returns the bound field name.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the property metadata.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Normalizes every stored entry through `V` in place.
    ///
    /// Safe to call repeatedly; an already-normalized map is rewritten
    /// to an identical form. An absent field is left absent.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Construction`] if any entry is not a
    /// document or does not satisfy the value type's contract; the map
    /// is left untouched in that case.
    pub fn materialize(&self, core: &mut EntityCore) -> CoreResult<()> {
        let Some(map) = core.document().get_doc(self.meta.name()) else {
            return Ok(());
        };
        let mut normalized = Document::new();
        for (key, raw) in map.iter() {
            let Some(document) = raw.as_doc() else {
                return Err(CoreError::construction(
                    std::any::type_name::<V>(),
                    format!("entry '{key}' is {}, not a document", raw.kind()),
                ));
            };
            let value = V::from_document(document)?;
            normalized.set(key, Value::Doc(value.to_document()));
        }
        core.document_mut()
            .set(self.meta.name(), Value::Doc(normalized));
        Ok(())
    }

    /// Reads one entry, normalizing the whole map in place first.
    ///
    /// Raw entries written before `V` existed are upgraded on the first
    /// read; later reads see the normalized form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Construction`] if any stored entry does not
    /// satisfy the value type's contract; the map is left untouched in
    /// that case.
    pub fn get(&self, core: &mut EntityCore, key: &str) -> CoreResult<Option<V>> {
        self.materialize(core)?;
        let Some(map) = core.document().get_doc(self.meta.name()) else {
            return Ok(None);
        };
        match map.get_doc(key) {
            Some(document) => Ok(Some(V::from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Stores one entry in its document form.
    ///
    /// # Errors
    ///
    /// Fails if the field holds a non-document value.
    pub fn insert(&self, core: &mut EntityCore, key: impl Into<String>, value: &V) -> CoreResult<()> {
        let mut view = core.document_mut().map_view(self.meta.name())?;
        view.insert(key, Value::Doc(value.to_document()));
        Ok(())
    }

    /// Removes one entry, reporting whether it was present.
    pub fn remove(&self, core: &mut EntityCore, key: &str) -> bool {
        core.document_mut()
            .get_mut(self.meta.name())
            .and_then(Value::as_doc_mut)
            .is_some_and(|map| map.remove(key).is_some())
    }

    /// Returns the number of stored entries.
    pub fn len(&self, core: &EntityCore) -> usize {
        core.document()
            .get_doc(self.meta.name())
            .map_or(0, Document::len)
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self, core: &EntityCore) -> bool {
        self.len(core) == 0
    }

    /// Returns the stored keys in insertion order.
    pub fn keys(&self, core: &EntityCore) -> Vec<String> {
        core.document()
            .get_doc(self.meta.name())
            .map(|map| map.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
