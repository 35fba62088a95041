//! Storage backend trait definition.

use crate::error::BackendResult;
use propdb_document::Document;
use std::collections::HashMap;

/// The storage collaborator behind every DAO.
///
/// A backend stores raw documents keyed by `(kind, id)` and answers
/// secondary-index queries against indexable properties. Query results
/// are ordered sequences of raw documents; the order of recency and
/// range queries is backend-defined.
///
/// # Invariants
///
/// - `get` returns exactly the document previously `put` for that id
/// - Index queries match a property's canonical string form
/// - Every operation may raise a timeout-class or other error; the two
///   remain distinguishable via [`BackendError::is_timeout`]
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
///
/// [`BackendError::is_timeout`]: crate::BackendError::is_timeout
pub trait DocumentBackend: Send + Sync {
    /// Fetches the document stored for `id`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn get(&self, kind: &str, id: &str) -> BackendResult<Option<Document>>;

    /// Fetches many documents at once.
    ///
    /// The result maps every id that resolved; unresolved ids are simply
    /// absent from the mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn get_multiple(&self, kind: &str, ids: &[String]) -> BackendResult<HashMap<String, Document>>;

    /// Returns every stored document of the given kind, in
    /// backend-defined order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn get_all(&self, kind: &str) -> BackendResult<Vec<Document>>;

    /// Stores a document under `id`, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn put(&self, kind: &str, id: &str, doc: &Document) -> BackendResult<()>;

    /// Stores a batch of documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn put_multiple(&self, kind: &str, batch: &[(String, Document)]) -> BackendResult<()>;

    /// Deletes the document stored for `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn delete(&self, kind: &str, id: &str) -> BackendResult<()>;

    /// Deletes a batch of documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn delete_multiple(&self, kind: &str, ids: &[String]) -> BackendResult<()>;

    /// Returns every document whose indexable property equals `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn query_by_property(
        &self,
        kind: &str,
        property: &str,
        value: &str,
    ) -> BackendResult<Vec<Document>>;

    /// Returns the most recent `count` matches, most recent first.
    ///
    /// Recency order is backend-defined.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn query_last_occurrences(
        &self,
        kind: &str,
        property: &str,
        value: &str,
        count: usize,
    ) -> BackendResult<Vec<Document>>;

    /// Returns the window `[from, to)` of matches over the
    /// backend-defined sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn query_range(
        &self,
        kind: &str,
        property: &str,
        value: &str,
        from: usize,
        to: usize,
    ) -> BackendResult<Vec<Document>>;

    /// Returns documents matching all of the given
    /// `(property, value)` constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn query_intersection(
        &self,
        kind: &str,
        constraints: &[(String, String)],
    ) -> BackendResult<Vec<Document>>;

    /// Returns documents matching any of the given
    /// `(property, value)` constraints, in constraint order, without
    /// duplicates.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend call fails.
    fn query_union(
        &self,
        kind: &str,
        constraints: &[(String, String)],
    ) -> BackendResult<Vec<Document>>;
}
