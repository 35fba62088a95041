//! The ordered document container.

use crate::error::{DocumentError, DocumentResult};
use crate::value::Value;
use crate::views::{ListView, MapView};

/// A mutable, insertion-ordered, string-keyed container of dynamic values.
///
/// A document is the single backing store for one entity's state. Field
/// names are unique; `set` replaces an existing field in place, keeping
/// its original position.
///
/// Equality is structural and independent of insertion order: two
/// documents are equal iff they have the same set of field names with
/// recursively equal values.
#[derive(Debug, Clone, Default)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    /// Creates a new empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true if the field is present.
    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == field)
    }

    /// Gets a field's value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Gets a mutable reference to a field's value.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Sets a field, replacing any existing value in place.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Removes a field, returning its value if present.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let index = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(index).1)
    }

    /// Removes all fields.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Iterates over field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Merges another document into this one.
    ///
    /// Fields present in `other` overwrite or create fields here; fields
    /// absent from `other` are left untouched.
    pub fn merge(&mut self, other: &Document) {
        for (name, value) in &other.fields {
            self.set(name.clone(), value.clone());
        }
    }

    /// Gets a text field as a string slice.
    pub fn get_text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    /// Gets an integer field.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// Gets a float field.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Gets a boolean field.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Gets a nested document field.
    pub fn get_doc(&self, field: &str) -> Option<&Document> {
        self.get(field).and_then(Value::as_doc)
    }

    /// Gets a list field.
    pub fn get_list(&self, field: &str) -> Option<&[Value]> {
        self.get(field).and_then(Value::as_list)
    }

    /// Returns a write-through view over a list-valued field.
    ///
    /// An absent field is materialized as an empty list on first access;
    /// the view mutates the document's own storage, so the two can never
    /// diverge.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::TypeMismatch`] if the field holds a
    /// non-list value.
    pub fn list_view(&mut self, field: &str) -> DocumentResult<ListView<'_>> {
        let index = self.materialize(field, || Value::List(Vec::new()));
        let value = &mut self.fields[index].1;
        let actual = value.kind();
        match value.as_list_mut() {
            Some(items) => Ok(ListView::new(items)),
            None => Err(DocumentError::type_mismatch(field, "list", actual)),
        }
    }

    /// Returns a write-through view over a map-valued field.
    ///
    /// Map-shaped fields are stored as nested documents. An absent field
    /// is materialized as an empty map on first access.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::TypeMismatch`] if the field holds a
    /// non-document value.
    pub fn map_view(&mut self, field: &str) -> DocumentResult<MapView<'_>> {
        let index = self.materialize(field, || Value::Doc(Document::new()));
        let value = &mut self.fields[index].1;
        let actual = value.kind();
        match value.as_doc_mut() {
            Some(doc) => Ok(MapView::new(doc)),
            None => Err(DocumentError::type_mismatch(field, "document", actual)),
        }
    }

    /// Returns the slot index for `field`, creating it with `empty` if
    /// absent.
    fn materialize(&mut self, field: &str, empty: impl FnOnce() -> Value) -> usize {
        match self.fields.iter().position(|(name, _)| name == field) {
            Some(index) => index,
            None => {
                self.fields.push((field.to_string(), empty()));
                self.fields.len() - 1
            }
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (name, value) in iter {
            doc.set(name, value);
        }
        doc
    }
}
