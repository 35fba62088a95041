//! Map-valued property definition.

use crate::entity::EntityCore;
use crate::error::{CoreError, CoreResult};
use crate::property::{commit_value, PropertyMeta};
use propdb_document::{Document, MapView, Value};

/// A string-keyed map property backed by a write-through view.
///
/// Map-shaped fields are stored as nested documents. The string form is
/// `key,value;key,value` with string values only; keys or values
/// containing a delimiter are not representable (documented limitation
/// of the format).
#[derive(Debug, Clone)]
pub struct MapProperty {
    meta: PropertyMeta,
}

impl MapProperty {
    /// Creates a map property.
    #[must_use]
    pub fn new(meta: PropertyMeta) -> Self {
        Self { meta }
    }

    /// Returns the bound field name.
    pub fn name(&self) -> &'static str {
        self.meta.name()
    }

    /// Returns the property metadata.
    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    /// Returns a live view over the map.
    ///
    /// An absent field is materialized as an empty map; mutations
    /// through the view land in the document directly.
    ///
    /// # Errors
    ///
    /// Fails if the field holds a non-document value.
    pub fn view<'a>(&self, core: &'a mut EntityCore) -> CoreResult<MapView<'a>> {
        Ok(core.document_mut().map_view(self.meta.name())?)
    }

    /// Returns the current entries without materializing an absent
    /// field.
    pub fn get<'a>(&self, core: &'a EntityCore) -> Option<&'a Document> {
        core.document().get_doc(self.meta.name())
    }

    /// Inserts an entry through a fresh view, returning any previous
    /// value.
    ///
    /// # Errors
    ///
    /// Fails if the field holds a non-document value.
    pub fn insert(
        &self,
        core: &mut EntityCore,
        key: impl Into<String>,
        value: Value,
    ) -> CoreResult<Option<Value>> {
        Ok(self.view(core)?.insert(key, value))
    }

    /// Replaces the whole map; `None` or an empty map removes the
    /// field.
    pub fn set(&self, core: &mut EntityCore, value: Option<Document>) {
        self.set_with_audit(core, value, false);
    }

    /// Replaces the whole map, forcing the audit hook when requested.
    pub fn set_with_audit(
        &self,
        core: &mut EntityCore,
        value: Option<Document>,
        force_audit: bool,
    ) {
        let value = value.filter(|map| !map.is_empty()).map(Value::Doc);
        commit_value(core, &self.meta, value, force_audit);
    }

    /// Parses the `key,value;key,value` string form (string keys and
    /// values only); blank text clears the field.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`] if any pair lacks its `,` separator.
    pub fn set_from_string(
        &self,
        core: &mut EntityCore,
        text: &str,
        force_audit: bool,
    ) -> CoreResult<()> {
        let mut map = Document::new();
        for pair in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once(',').ok_or_else(|| {
                CoreError::parse(
                    self.meta.name(),
                    format!("expected 'key,value' pair, got '{pair}'"),
                )
            })?;
            map.set(key.trim(), value.trim());
        }
        self.set_with_audit(core, Some(map), force_audit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_writes_through() {
        let prop = MapProperty::new(PropertyMeta::new("scores"));
        let mut core = EntityCore::new();

        prop.insert(&mut core, "ada", Value::Int(10)).unwrap();
        prop.insert(&mut core, "bob", Value::Int(5)).unwrap();

        let map = prop.get(&core).unwrap();
        assert_eq!(map.get_i64("ada"), Some(10));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn set_empty_removes_field() {
        let prop = MapProperty::new(PropertyMeta::new("scores"));
        let mut core = EntityCore::new();

        let mut map = Document::new();
        map.set("k", "v");
        prop.set(&mut core, Some(map));
        assert!(core.document().has("scores"));

        prop.set(&mut core, Some(Document::new()));
        assert!(!core.document().has("scores"));
    }

    #[test]
    fn from_string_parses_pairs() {
        let prop = MapProperty::new(PropertyMeta::new("scores"));
        let mut core = EntityCore::new();

        prop.set_from_string(&mut core, "ada,10; bob , 5 ;", false)
            .unwrap();
        let map = prop.get(&core).unwrap();
        assert_eq!(map.get_text("ada"), Some("10"));
        assert_eq!(map.get_text("bob"), Some("5"));
    }

    #[test]
    fn from_string_rejects_malformed_pair() {
        let prop = MapProperty::new(PropertyMeta::new("scores"));
        let mut core = EntityCore::new();

        let err = prop
            .set_from_string(&mut core, "ada:10", false)
            .unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
        assert!(!core.document().has("scores"));
    }

    #[test]
    fn from_string_blank_clears() {
        let prop = MapProperty::new(PropertyMeta::new("scores"));
        let mut core = EntityCore::new();
        prop.insert(&mut core, "k", Value::Int(1)).unwrap();
        prop.set_from_string(&mut core, " ", false).unwrap();
        assert!(!core.document().has("scores"));
    }
}
