//! In-memory document backend for testing.

use crate::backend::DocumentBackend;
use crate::error::BackendResult;
use parking_lot::RwLock;
use propdb_document::{Document, Value};
use std::collections::HashMap;

/// An in-memory document backend.
///
/// This backend stores all documents in memory and is suitable for:
/// - Unit and integration tests
/// - Ephemeral deployments that don't need persistence
///
/// Entries are kept per kind in write order: a re-put moves the entry to
/// the back, so recency queries observe the most recently written
/// documents last. Index queries match a property's canonical string
/// form; list-valued properties match when any element matches.
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    kinds: RwLock<HashMap<String, Vec<(String, Document)>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents stored for a kind.
    pub fn len(&self, kind: &str) -> usize {
        self.kinds.read().get(kind).map_or(0, Vec::len)
    }

    /// Returns true if no documents are stored for a kind.
    pub fn is_empty(&self, kind: &str) -> bool {
        self.len(kind) == 0
    }

    /// Clears all stored documents.
    pub fn clear(&self) {
        self.kinds.write().clear();
    }

    fn matches(doc: &Document, property: &str, value: &str) -> bool {
        match doc.get(property) {
            Some(Value::List(items)) => items
                .iter()
                .any(|item| item.index_form().as_deref() == Some(value)),
            Some(stored) => stored.index_form().as_deref() == Some(value),
            None => false,
        }
    }

    fn matching(&self, kind: &str, property: &str, value: &str) -> Vec<(String, Document)> {
        self.kinds.read().get(kind).map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .filter(|(_, doc)| Self::matches(doc, property, value))
                .cloned()
                .collect()
        })
    }
}

impl DocumentBackend for InMemoryBackend {
    fn get(&self, kind: &str, id: &str) -> BackendResult<Option<Document>> {
        Ok(self.kinds.read().get(kind).and_then(|entries| {
            entries
                .iter()
                .find(|(entry_id, _)| entry_id == id)
                .map(|(_, doc)| doc.clone())
        }))
    }

    fn get_multiple(&self, kind: &str, ids: &[String]) -> BackendResult<HashMap<String, Document>> {
        let kinds = self.kinds.read();
        let mut result = HashMap::new();
        if let Some(entries) = kinds.get(kind) {
            for (entry_id, doc) in entries {
                if ids.contains(entry_id) {
                    result.insert(entry_id.clone(), doc.clone());
                }
            }
        }
        Ok(result)
    }

    fn get_all(&self, kind: &str) -> BackendResult<Vec<Document>> {
        Ok(self.kinds.read().get(kind).map_or_else(Vec::new, |entries| {
            entries.iter().map(|(_, doc)| doc.clone()).collect()
        }))
    }

    fn put(&self, kind: &str, id: &str, doc: &Document) -> BackendResult<()> {
        let mut kinds = self.kinds.write();
        let entries = kinds.entry(kind.to_string()).or_default();
        entries.retain(|(entry_id, _)| entry_id != id);
        entries.push((id.to_string(), doc.clone()));
        Ok(())
    }

    fn put_multiple(&self, kind: &str, batch: &[(String, Document)]) -> BackendResult<()> {
        for (id, doc) in batch {
            self.put(kind, id, doc)?;
        }
        Ok(())
    }

    fn delete(&self, kind: &str, id: &str) -> BackendResult<()> {
        if let Some(entries) = self.kinds.write().get_mut(kind) {
            entries.retain(|(entry_id, _)| entry_id != id);
        }
        Ok(())
    }

    fn delete_multiple(&self, kind: &str, ids: &[String]) -> BackendResult<()> {
        if let Some(entries) = self.kinds.write().get_mut(kind) {
            entries.retain(|(entry_id, _)| !ids.contains(entry_id));
        }
        Ok(())
    }

    fn query_by_property(
        &self,
        kind: &str,
        property: &str,
        value: &str,
    ) -> BackendResult<Vec<Document>> {
        Ok(self
            .matching(kind, property, value)
            .into_iter()
            .map(|(_, doc)| doc)
            .collect())
    }

    fn query_last_occurrences(
        &self,
        kind: &str,
        property: &str,
        value: &str,
        count: usize,
    ) -> BackendResult<Vec<Document>> {
        let matches = self.matching(kind, property, value);
        Ok(matches
            .into_iter()
            .rev()
            .take(count)
            .map(|(_, doc)| doc)
            .collect())
    }

    fn query_range(
        &self,
        kind: &str,
        property: &str,
        value: &str,
        from: usize,
        to: usize,
    ) -> BackendResult<Vec<Document>> {
        let matches = self.matching(kind, property, value);
        let to = to.min(matches.len());
        let from = from.min(to);
        Ok(matches[from..to].iter().map(|(_, doc)| doc.clone()).collect())
    }

    fn query_intersection(
        &self,
        kind: &str,
        constraints: &[(String, String)],
    ) -> BackendResult<Vec<Document>> {
        if constraints.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .kinds
            .read()
            .get(kind)
            .map_or_else(Vec::new, |entries| {
                entries
                    .iter()
                    .filter(|(_, doc)| {
                        constraints
                            .iter()
                            .all(|(property, value)| Self::matches(doc, property, value))
                    })
                    .map(|(_, doc)| doc.clone())
                    .collect()
            }))
    }

    fn query_union(
        &self,
        kind: &str,
        constraints: &[(String, String)],
    ) -> BackendResult<Vec<Document>> {
        let mut seen: Vec<String> = Vec::new();
        let mut result = Vec::new();
        for (property, value) in constraints {
            for (id, doc) in self.matching(kind, property, value) {
                if !seen.contains(&id) {
                    seen.push(id);
                    result.push(doc);
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, age: i64) -> Document {
        let mut doc = Document::new();
        doc.set("name", name);
        doc.set("age", age);
        doc
    }

    #[test]
    fn put_get_delete() {
        let backend = InMemoryBackend::new();
        backend.put("user", "u1", &doc("Ada", 36)).unwrap();

        let found = backend.get("user", "u1").unwrap().unwrap();
        assert_eq!(found.get_text("name"), Some("Ada"));
        assert!(backend.get("user", "missing").unwrap().is_none());
        assert!(backend.get("other", "u1").unwrap().is_none());

        backend.delete("user", "u1").unwrap();
        assert!(backend.get("user", "u1").unwrap().is_none());
    }

    #[test]
    fn put_replaces_and_moves_to_back() {
        let backend = InMemoryBackend::new();
        backend.put("user", "u1", &doc("Ada", 36)).unwrap();
        backend.put("user", "u2", &doc("Bob", 30)).unwrap();
        backend.put("user", "u1", &doc("Ada", 37)).unwrap();

        assert_eq!(backend.len("user"), 2);
        let all = backend.get_all("user").unwrap();
        assert_eq!(all[0].get_text("name"), Some("Bob"));
        assert_eq!(all[1].get_i64("age"), Some(37));
    }

    #[test]
    fn get_multiple_skips_unresolved() {
        let backend = InMemoryBackend::new();
        backend.put("user", "u1", &doc("Ada", 36)).unwrap();
        backend.put("user", "u2", &doc("Bob", 30)).unwrap();

        let found = backend
            .get_multiple("user", &["u1".into(), "u3".into()])
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key("u1"));
    }

    #[test]
    fn batch_put_and_delete() {
        let backend = InMemoryBackend::new();
        backend
            .put_multiple(
                "user",
                &[("u1".into(), doc("Ada", 36)), ("u2".into(), doc("Bob", 30))],
            )
            .unwrap();
        assert_eq!(backend.len("user"), 2);

        backend
            .delete_multiple("user", &["u1".into(), "u2".into()])
            .unwrap();
        assert!(backend.is_empty("user"));
    }

    #[test]
    fn query_by_property_matches_string_form() {
        let backend = InMemoryBackend::new();
        backend.put("user", "u1", &doc("Ada", 36)).unwrap();
        backend.put("user", "u2", &doc("Bob", 36)).unwrap();
        backend.put("user", "u3", &doc("Cyd", 20)).unwrap();

        let found = backend.query_by_property("user", "age", "36").unwrap();
        assert_eq!(found.len(), 2);
        assert!(backend
            .query_by_property("user", "age", "99")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn query_matches_list_elements() {
        let backend = InMemoryBackend::new();
        let mut d = doc("Ada", 36);
        d.set(
            "tags",
            vec![Value::Text("math".into()), Value::Text("engines".into())],
        );
        backend.put("user", "u1", &d).unwrap();

        let found = backend.query_by_property("user", "tags", "math").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn last_occurrences_most_recent_first() {
        let backend = InMemoryBackend::new();
        for i in 0..5 {
            backend
                .put("user", &format!("u{i}"), &doc(&format!("n{i}"), 36))
                .unwrap();
        }

        let found = backend
            .query_last_occurrences("user", "age", "36", 2)
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].get_text("name"), Some("n4"));
        assert_eq!(found[1].get_text("name"), Some("n3"));
    }

    #[test]
    fn range_window_is_half_open_and_clamped() {
        let backend = InMemoryBackend::new();
        for i in 0..4 {
            backend
                .put("user", &format!("u{i}"), &doc(&format!("n{i}"), 36))
                .unwrap();
        }

        let window = backend.query_range("user", "age", "36", 1, 3).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].get_text("name"), Some("n1"));

        let clamped = backend.query_range("user", "age", "36", 2, 100).unwrap();
        assert_eq!(clamped.len(), 2);
    }

    #[test]
    fn intersection_requires_all_constraints() {
        let backend = InMemoryBackend::new();
        backend.put("user", "u1", &doc("Ada", 36)).unwrap();
        backend.put("user", "u2", &doc("Ada", 30)).unwrap();

        let found = backend
            .query_intersection(
                "user",
                &[("name".into(), "Ada".into()), ("age".into(), "36".into())],
            )
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_i64("age"), Some(36));

        assert!(backend.query_intersection("user", &[]).unwrap().is_empty());
    }

    #[test]
    fn union_preserves_constraint_order_and_dedups() {
        let backend = InMemoryBackend::new();
        backend.put("user", "u1", &doc("Ada", 36)).unwrap();
        backend.put("user", "u2", &doc("Bob", 30)).unwrap();

        let found = backend
            .query_union(
                "user",
                &[
                    ("name".into(), "Bob".into()),
                    ("age".into(), "36".into()),
                    // Matches u2 again; deduplicated.
                    ("age".into(), "30".into()),
                ],
            )
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].get_text("name"), Some("Bob"));
        assert_eq!(found[1].get_text("name"), Some("Ada"));
    }
}
