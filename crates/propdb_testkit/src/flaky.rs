//! A fault-injecting backend for exercising the retry path.

use parking_lot::Mutex;
use propdb_backend::{BackendError, BackendResult, DocumentBackend, InMemoryBackend};
use propdb_document::Document;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which failure class injected faults belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Timeout-class: grows the executor's backoff.
    Timeout,
    /// Connection-class: retried at a flat backoff.
    Connection,
}

/// An in-memory backend that fails the first `n` calls, then recovers.
///
/// Every operation counts against the same fault budget, so a DAO call
/// that reaches the backend `n + 1` times observes `n` failures and one
/// success.
pub struct FlakyBackend {
    inner: InMemoryBackend,
    remaining_faults: Mutex<usize>,
    fault_kind: FaultKind,
    calls: AtomicUsize,
}

impl FlakyBackend {
    /// Creates a backend that fails its first `faults` calls.
    #[must_use]
    pub fn new(faults: usize, fault_kind: FaultKind) -> Self {
        Self {
            inner: InMemoryBackend::new(),
            remaining_faults: Mutex::new(faults),
            fault_kind,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a backend that never fails.
    #[must_use]
    pub fn reliable() -> Self {
        Self::new(0, FaultKind::Timeout)
    }

    /// Total backend calls observed, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Rearms the fault budget.
    pub fn inject_faults(&self, faults: usize) {
        *self.remaining_faults.lock() = faults;
    }

    /// Direct access to the underlying store, bypassing fault injection.
    pub fn inner(&self) -> &InMemoryBackend {
        &self.inner
    }

    fn admit(&self) -> BackendResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut remaining = self.remaining_faults.lock();
        if *remaining == 0 {
            return Ok(());
        }
        *remaining -= 1;
        Err(match self.fault_kind {
            FaultKind::Timeout => BackendError::timeout("injected timeout"),
            FaultKind::Connection => BackendError::connection("injected connection failure"),
        })
    }
}

impl DocumentBackend for FlakyBackend {
    fn get(&self, kind: &str, id: &str) -> BackendResult<Option<Document>> {
        self.admit()?;
        self.inner.get(kind, id)
    }

    fn get_multiple(&self, kind: &str, ids: &[String]) -> BackendResult<HashMap<String, Document>> {
        self.admit()?;
        self.inner.get_multiple(kind, ids)
    }

    fn get_all(&self, kind: &str) -> BackendResult<Vec<Document>> {
        self.admit()?;
        self.inner.get_all(kind)
    }

    fn put(&self, kind: &str, id: &str, doc: &Document) -> BackendResult<()> {
        self.admit()?;
        self.inner.put(kind, id, doc)
    }

    fn put_multiple(&self, kind: &str, batch: &[(String, Document)]) -> BackendResult<()> {
        self.admit()?;
        self.inner.put_multiple(kind, batch)
    }

    fn delete(&self, kind: &str, id: &str) -> BackendResult<()> {
        self.admit()?;
        self.inner.delete(kind, id)
    }

    fn delete_multiple(&self, kind: &str, ids: &[String]) -> BackendResult<()> {
        self.admit()?;
        self.inner.delete_multiple(kind, ids)
    }

    fn query_by_property(
        &self,
        kind: &str,
        property: &str,
        value: &str,
    ) -> BackendResult<Vec<Document>> {
        self.admit()?;
        self.inner.query_by_property(kind, property, value)
    }

    fn query_last_occurrences(
        &self,
        kind: &str,
        property: &str,
        value: &str,
        count: usize,
    ) -> BackendResult<Vec<Document>> {
        self.admit()?;
        self.inner.query_last_occurrences(kind, property, value, count)
    }

    fn query_range(
        &self,
        kind: &str,
        property: &str,
        value: &str,
        from: usize,
        to: usize,
    ) -> BackendResult<Vec<Document>> {
        self.admit()?;
        self.inner.query_range(kind, property, value, from, to)
    }

    fn query_intersection(
        &self,
        kind: &str,
        constraints: &[(String, String)],
    ) -> BackendResult<Vec<Document>> {
        self.admit()?;
        self.inner.query_intersection(kind, constraints)
    }

    fn query_union(
        &self,
        kind: &str,
        constraints: &[(String, String)],
    ) -> BackendResult<Vec<Document>> {
        self.admit()?;
        self.inner.query_union(kind, constraints)
    }
}
