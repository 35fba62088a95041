//! The per-entity-type data access façade.
//!
//! A [`Dao`] composes the storage backend, the retry executor and an
//! optional cache into the CRUD and indexed-query surface for one
//! entity type. Every backend round trip runs through the executor;
//! exhaustion surfaces to the caller as fatal. Blank ids and query
//! parameters short-circuit before any backend call.

use crate::cache::{CacheLookup, EntityCache, IndexKey};
use crate::entity::{Entity, FIELD_ID, FIELD_KIND};
use crate::error::{CoreError, CoreResult};
use crate::retry::{PendingResult, RetryExecutor};
use propdb_backend::DocumentBackend;
use propdb_document::Document;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Factory producing a blank entity, injected at construction.
pub type EntityFactory<E> = Arc<dyn Fn() -> E + Send + Sync>;

/// Data access object for one entity type.
///
/// Cheap to clone; all handles share the same backend, executor and
/// cache.
pub struct Dao<E: Entity> {
    backend: Arc<dyn DocumentBackend>,
    retry: Arc<RetryExecutor>,
    cache: Option<Arc<dyn EntityCache<E>>>,
    factory: EntityFactory<E>,
}

impl<E: Entity> Clone for Dao<E> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            retry: self.retry.clone(),
            cache: self.cache.clone(),
            factory: self.factory.clone(),
        }
    }
}

impl<E: Entity> Dao<E> {
    /// Creates an uncached DAO.
    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        retry: Arc<RetryExecutor>,
        factory: EntityFactory<E>,
    ) -> Self {
        Self {
            backend,
            retry,
            cache: None,
            factory,
        }
    }

    /// Installs a cache strategy.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn EntityCache<E>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the entity kind this DAO is bound to.
    pub fn kind(&self) -> &'static str {
        E::kind()
    }

    /// Looks up one entity by identity.
    ///
    /// A blank id answers `Ok(None)` without touching the backend. A
    /// cache hit, including a cached absence, is served directly; a
    /// miss goes to the backend and populates the cache either way.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_by_id(&self, id: &str) -> CoreResult<Option<E>> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        if let Some(cache) = &self.cache {
            if let CacheLookup::Hit(entry) = cache.get_by_id(id) {
                debug!(kind = E::kind(), id, "id cache hit");
                return Ok(entry);
            }
        }
        let document = self.retry.execute(|| self.backend.get(E::kind(), id))?;
        let entity = document.map(|doc| self.document_to_entity(doc)).transpose()?;
        if let Some(cache) = &self.cache {
            cache.put_by_id(id, entity.clone());
        }
        Ok(entity)
    }

    /// [`Dao::find_by_id`] delivering its value through a
    /// [`PendingResult`].
    ///
    /// # Errors
    ///
    /// Same as [`Dao::find_by_id`].
    pub fn find_by_id_async(&self, id: &str) -> CoreResult<PendingResult<Option<E>>> {
        self.find_by_id(id).map(PendingResult::ready)
    }

    /// Batch identity lookup mapping every id that resolved.
    ///
    /// Always goes to the backend; the per-id cache is bypassed. Blank
    /// ids in the input are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_unique_id_multiple(&self, ids: &[String]) -> CoreResult<HashMap<String, E>> {
        let ids: Vec<String> = ids
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let documents = self
            .retry
            .execute(|| self.backend.get_multiple(E::kind(), &ids))?;
        let mut resolved = HashMap::with_capacity(documents.len());
        for (id, document) in documents {
            resolved.insert(id, self.document_to_entity(document)?);
        }
        Ok(resolved)
    }

    /// Returns every stored entity of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn get_all(&self) -> CoreResult<Vec<E>> {
        let documents = self.retry.execute(|| self.backend.get_all(E::kind()))?;
        documents
            .into_iter()
            .map(|doc| self.document_to_entity(doc))
            .collect()
    }

    /// Persists one entity.
    ///
    /// Calls `set_modified()` first. A configured cache is then offered
    /// the alternative-save short-circuit; when it reports the save as
    /// handled, the backend write is skipped entirely. Either way the
    /// entity ends up marked persisted.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn save(&self, entity: &mut E) -> CoreResult<()> {
        entity.set_modified();
        if let Some(cache) = &self.cache {
            if cache.try_alternative_save(entity) {
                debug!(kind = E::kind(), id = entity.id(), "alternative save handled");
                entity.core_mut().set_persisted(true);
                return Ok(());
            }
        }
        let document = self.entity_to_document(entity);
        let id = entity.id().to_string();
        self.retry
            .execute(|| self.backend.put(E::kind(), &id, &document))?;
        entity.core_mut().set_persisted(true);
        Ok(())
    }

    /// [`Dao::save`] delivering completion through a [`PendingResult`].
    ///
    /// # Errors
    ///
    /// Same as [`Dao::save`].
    pub fn save_async(&self, entity: &mut E) -> CoreResult<PendingResult<()>> {
        self.save(entity).map(PendingResult::ready)
    }

    /// Deletes one entity, then evicts its identity from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn remove(&self, entity: &E) -> CoreResult<()> {
        let id = entity.id().to_string();
        self.retry.execute(|| self.backend.delete(E::kind(), &id))?;
        if let Some(cache) = &self.cache {
            cache.evict(&id);
        }
        Ok(())
    }

    /// Deletes a batch of entities, then evicts their identities.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn remove_multiple(&self, entities: &[E]) -> CoreResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = entities.iter().map(|e| e.id().to_string()).collect();
        self.retry
            .execute(|| self.backend.delete_multiple(E::kind(), &ids))?;
        if let Some(cache) = &self.cache {
            for id in &ids {
                cache.evict(id);
            }
        }
        Ok(())
    }

    /// Batch persist. No-op on empty input; bypasses the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn massive_upload(&self, entities: &mut [E]) -> CoreResult<()> {
        if entities.is_empty() {
            return Ok(());
        }
        let mut batch = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            entity.set_modified();
            batch.push((entity.id().to_string(), self.entity_to_document(entity)));
        }
        self.retry
            .execute(|| self.backend.put_multiple(E::kind(), &batch))?;
        for entity in entities.iter_mut() {
            entity.core_mut().set_persisted(true);
        }
        Ok(())
    }

    /// Returns the single entity whose indexable property equals
    /// `value`, or `None`.
    ///
    /// Shares the cached result set with
    /// [`Dao::find_multiple_by_indexable_property`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_unique_by_indexable_property(
        &self,
        property: &str,
        value: &str,
    ) -> CoreResult<Option<E>> {
        let matches = self.find_multiple_by_indexable_property(property, value)?;
        Ok(matches.into_iter().next())
    }

    /// Returns every entity whose indexable property equals `value`.
    ///
    /// Blank parameters answer an empty vector without a backend call.
    /// The secondary-index cache is keyed by the exact parameter pair;
    /// empty result sets are returned but never cached.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_multiple_by_indexable_property(
        &self,
        property: &str,
        value: &str,
    ) -> CoreResult<Vec<E>> {
        let (property, value) = (property.trim(), value.trim());
        if property.is_empty() || value.is_empty() {
            return Ok(Vec::new());
        }
        let key = IndexKey::single(property, value);
        if let Some(hit) = self.probe_params_cache(&key) {
            return Ok(hit);
        }
        let documents = self
            .retry
            .execute(|| self.backend.query_by_property(E::kind(), property, value))?;
        let entities = self.documents_to_entities(documents)?;
        self.populate_params_cache(&key, &entities);
        Ok(entities)
    }

    /// Returns the most recent `count` matches, most recent first.
    ///
    /// Goes straight to the backend; recency results are never cached.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_multiple_last_occurrences_by_indexable_property(
        &self,
        property: &str,
        value: &str,
        count: usize,
    ) -> CoreResult<Vec<E>> {
        let (property, value) = (property.trim(), value.trim());
        if property.is_empty() || value.is_empty() || count == 0 {
            return Ok(Vec::new());
        }
        let documents = self.retry.execute(|| {
            self.backend
                .query_last_occurrences(E::kind(), property, value, count)
        })?;
        self.documents_to_entities(documents)
    }

    /// Returns the `[from, to)` window of matches over the
    /// backend-defined sort order.
    ///
    /// Goes straight to the backend; windows are never cached.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_multiple_sorted_from_to_by_indexable_property(
        &self,
        property: &str,
        value: &str,
        from: usize,
        to: usize,
    ) -> CoreResult<Vec<E>> {
        let (property, value) = (property.trim(), value.trim());
        if property.is_empty() || value.is_empty() || from >= to {
            return Ok(Vec::new());
        }
        let documents = self.retry.execute(|| {
            self.backend
                .query_range(E::kind(), property, value, from, to)
        })?;
        self.documents_to_entities(documents)
    }

    /// Returns entities matching all of the given constraints.
    ///
    /// The cache key is the exact ordered constraint tuple. Blank or
    /// empty constraints answer an empty vector immediately.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_multiple_intersection_of_indexable_property(
        &self,
        constraints: &[(String, String)],
    ) -> CoreResult<Vec<E>> {
        let constraints = trimmed_constraints(constraints);
        if constraints.is_empty() {
            return Ok(Vec::new());
        }
        let key = IndexKey::new(constraints.iter().cloned());
        if let Some(hit) = self.probe_params_cache(&key) {
            return Ok(hit);
        }
        let documents = self
            .retry
            .execute(|| self.backend.query_intersection(E::kind(), &constraints))?;
        let entities = self.documents_to_entities(documents)?;
        self.populate_params_cache(&key, &entities);
        Ok(entities)
    }

    /// Returns entities matching any of the given constraints, in
    /// constraint order, without duplicates.
    ///
    /// Goes straight to the backend; union results are never cached.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] if the backend stays
    /// unavailable for the whole retry budget.
    pub fn find_multiple_union_of_indexable_property(
        &self,
        constraints: &[(String, String)],
    ) -> CoreResult<Vec<E>> {
        let constraints = trimmed_constraints(constraints);
        if constraints.is_empty() {
            return Ok(Vec::new());
        }
        let documents = self
            .retry
            .execute(|| self.backend.query_union(E::kind(), &constraints))?;
        self.documents_to_entities(documents)
    }

    /// Rehydrates an entity from its persisted text form.
    ///
    /// Builds a fresh instance from the factory and merges the parsed
    /// document into it, treating the text as authoritative. The result
    /// is marked persisted.
    ///
    /// # Errors
    ///
    /// Fails on malformed text or a missing identity field.
    pub fn from_persisted_text(&self, text: &str) -> CoreResult<E> {
        let document = Document::from_text(text)?;
        self.document_to_entity(document)
    }

    /// Renders the persisted form: the entity's document plus the
    /// reserved identity and kind fields.
    pub fn entity_to_document(&self, entity: &E) -> Document {
        let mut document = entity.document().clone();
        document.set(FIELD_ID, entity.id());
        document.set(FIELD_KIND, E::kind());
        document
    }

    /// Rebuilds an entity from its persisted form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Construction`] when the identity field is
    /// missing.
    pub fn document_to_entity(&self, mut document: Document) -> CoreResult<E> {
        let id = document
            .get_text(FIELD_ID)
            .map(str::to_string)
            .ok_or_else(|| {
                CoreError::construction(E::kind(), format!("persisted form lacks '{FIELD_ID}'"))
            })?;
        document.remove(FIELD_ID);
        document.remove(FIELD_KIND);

        let mut entity = (self.factory)();
        let core = entity.core_mut();
        core.set_id(id);
        core.document_mut().merge(&document);
        core.set_persisted(true);
        Ok(entity)
    }

    fn documents_to_entities(&self, documents: Vec<Document>) -> CoreResult<Vec<E>> {
        documents
            .into_iter()
            .map(|doc| self.document_to_entity(doc))
            .collect()
    }

    fn probe_params_cache(&self, key: &IndexKey) -> Option<Vec<E>> {
        let cache = self.cache.as_ref()?;
        match cache.get_by_params(key) {
            CacheLookup::Hit(entities) => {
                debug!(kind = E::kind(), ?key, "index cache hit");
                Some(entities)
            }
            CacheLookup::Miss => None,
        }
    }

    // Empty result sets are never cached so data arriving after a miss
    // stays visible.
    fn populate_params_cache(&self, key: &IndexKey, entities: &[E]) {
        if entities.is_empty() {
            return;
        }
        if let Some(cache) = &self.cache {
            cache.put_by_params(key, entities.to_vec());
        }
    }
}

fn trimmed_constraints(constraints: &[(String, String)]) -> Vec<(String, String)> {
    constraints
        .iter()
        .map(|(p, v)| (p.trim().to_string(), v.trim().to_string()))
        .filter(|(p, v)| !p.is_empty() && !v.is_empty())
        .collect()
}
