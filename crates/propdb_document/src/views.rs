//! Write-through views over list- and map-valued fields.

use crate::document::Document;
use crate::value::Value;

/// A write-through view over a list-valued field.
///
/// The view borrows the document's own storage: every mutation lands in
/// the document directly, so the view and the document can never
/// diverge. Constructed via [`Document::list_view`].
///
/// With uniqueness enabled, every mutating operation silently rejects
/// values already present instead of appending them twice.
#[derive(Debug)]
pub struct ListView<'a> {
    items: &'a mut Vec<Value>,
    unique: bool,
}

impl<'a> ListView<'a> {
    pub(crate) fn new(items: &'a mut Vec<Value>) -> Self {
        Self {
            items,
            unique: false,
        }
    }

    /// Enables or disables uniqueness enforcement on this view.
    #[must_use]
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns the first element.
    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    /// Returns the last element.
    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    /// Returns true if the list contains `value`.
    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains(value)
    }

    /// Returns the index of the first occurrence of `value`.
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.items.iter().position(|item| item == value)
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Returns the whole list as a slice.
    pub fn as_slice(&self) -> &[Value] {
        self.items
    }

    /// Returns the sub-range `[from, to)`, clamped to the list bounds.
    pub fn range(&self, from: usize, to: usize) -> &[Value] {
        let to = to.min(self.items.len());
        let from = from.min(to);
        &self.items[from..to]
    }

    /// Appends a value.
    ///
    /// Returns false if uniqueness is enabled and the value is already
    /// present.
    pub fn push(&mut self, value: Value) -> bool {
        if self.unique && self.items.contains(&value) {
            return false;
        }
        self.items.push(value);
        true
    }

    /// Inserts a value at `index`, shifting later elements.
    ///
    /// Returns false if uniqueness is enabled and the value is already
    /// present. An out-of-bounds index appends instead.
    pub fn insert(&mut self, index: usize, value: Value) -> bool {
        if self.unique && self.items.contains(&value) {
            return false;
        }
        let index = index.min(self.items.len());
        self.items.insert(index, value);
        true
    }

    /// Replaces the element at `index`, returning the previous value.
    ///
    /// Returns `None` without modifying the list if the index is out of
    /// bounds, or if uniqueness is enabled and the value already occurs
    /// elsewhere in the list.
    pub fn set(&mut self, index: usize, value: Value) -> Option<Value> {
        let slot = self.items.get(index)?;
        if self.unique && *slot != value && self.items.contains(&value) {
            return None;
        }
        Some(std::mem::replace(&mut self.items[index], value))
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Removes the first occurrence of `value`.
    ///
    /// Returns true if an element was removed.
    pub fn remove_item(&mut self, value: &Value) -> bool {
        match self.index_of(value) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Keeps only the elements for which the predicate returns true.
    pub fn retain(&mut self, predicate: impl FnMut(&Value) -> bool) {
        self.items.retain(predicate);
    }

    /// Appends every value from the iterator.
    ///
    /// Returns the number of elements actually added (duplicates are
    /// rejected when uniqueness is enabled).
    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) -> usize {
        let mut added = 0;
        for value in values {
            if self.push(value) {
                added += 1;
            }
        }
        added
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// A write-through view over a map-valued field.
///
/// Map-shaped fields are stored as nested documents with string keys.
/// Constructed via [`Document::map_view`].
#[derive(Debug)]
pub struct MapView<'a> {
    doc: &'a mut Document,
}

impl<'a> MapView<'a> {
    pub(crate) fn new(doc: &'a mut Document) -> Self {
        Self { doc }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.doc.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.doc.has(key)
    }

    /// Gets the value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.doc.get(key)
    }

    /// Gets a mutable reference to the value for a key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.doc.get_mut(key)
    }

    /// Inserts a key-value pair, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        let previous = self.doc.get(&key).cloned();
        self.doc.set(key, value);
        previous
    }

    /// Removes a key, returning its value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.doc.remove(key)
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.doc.keys()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.doc.iter()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.doc.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_doc() -> Document {
        let mut doc = Document::new();
        doc.set(
            "items",
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
        );
        doc
    }

    #[test]
    fn read_operations() {
        let mut doc = list_doc();
        let view = doc.list_view("items").unwrap();

        assert_eq!(view.len(), 3);
        assert_eq!(view.get(1), Some(&Value::Int(2)));
        assert_eq!(view.first(), Some(&Value::Int(1)));
        assert_eq!(view.last(), Some(&Value::Int(3)));
        assert!(view.contains(&Value::Int(2)));
        assert_eq!(view.index_of(&Value::Int(3)), Some(2));
        assert_eq!(view.range(1, 3), &[Value::Int(2), Value::Int(3)]);
        assert_eq!(view.range(2, 100), &[Value::Int(3)]);
    }

    #[test]
    fn mutations_write_through() {
        let mut doc = list_doc();
        {
            let mut view = doc.list_view("items").unwrap();
            view.push(Value::Int(4));
            view.remove(0);
            view.insert(0, Value::Int(0));
        }
        let items = doc.get_list("items").unwrap();
        assert_eq!(
            items,
            &[Value::Int(0), Value::Int(2), Value::Int(3), Value::Int(4)]
        );
    }

    #[test]
    fn unique_rejects_duplicates() {
        let mut doc = list_doc();
        let mut view = doc.list_view("items").unwrap().with_unique(true);

        assert!(!view.push(Value::Int(2)));
        assert_eq!(view.len(), 3);

        assert!(view.push(Value::Int(9)));
        assert_eq!(view.len(), 4);

        assert!(!view.insert(0, Value::Int(9)));
        assert_eq!(view.extend(vec![Value::Int(9), Value::Int(10)]), 1);
    }

    #[test]
    fn unique_set_rejects_existing_elsewhere() {
        let mut doc = list_doc();
        let mut view = doc.list_view("items").unwrap().with_unique(true);

        // Replacing an element with itself is allowed.
        assert_eq!(view.set(0, Value::Int(1)), Some(Value::Int(1)));
        // Replacing with a value that occurs elsewhere is not.
        assert_eq!(view.set(0, Value::Int(2)), None);
        assert_eq!(view.get(0), Some(&Value::Int(1)));
    }

    #[test]
    fn remove_item_and_retain() {
        let mut doc = list_doc();
        let mut view = doc.list_view("items").unwrap();

        assert!(view.remove_item(&Value::Int(2)));
        assert!(!view.remove_item(&Value::Int(42)));

        view.retain(|v| v.as_i64() != Some(3));
        assert_eq!(view.as_slice(), &[Value::Int(1)]);
    }

    #[test]
    fn map_view_operations() {
        let mut doc = Document::new();
        let mut view = doc.map_view("scores").unwrap();

        assert!(view.is_empty());
        assert_eq!(view.insert("ada", Value::Int(1)), None);
        assert_eq!(view.insert("ada", Value::Int(2)), Some(Value::Int(1)));
        view.insert("bob", Value::Int(3));

        assert_eq!(view.len(), 2);
        assert!(view.contains_key("ada"));
        assert_eq!(view.get("ada"), Some(&Value::Int(2)));
        assert_eq!(view.remove("bob"), Some(Value::Int(3)));
        assert_eq!(view.remove("bob"), None);

        view.clear();
        assert!(view.is_empty());
        // The cleared map is still materialized in the document.
        assert!(doc.has("scores"));
    }
}
