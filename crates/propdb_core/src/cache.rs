//! Pluggable per-entity-type lookup caches.
//!
//! A cache is optional and injected at DAO construction. Two keyed
//! spaces are covered: identity lookups (zero or one entity) and
//! secondary-index lookups (an ordered tuple of property/value pairs
//! mapping to a list of entities). Identity entries are evicted
//! synchronously on removal; index entries are not proactively
//! invalidated by unrelated writes, an accepted staleness trade-off.

use crate::entity::Entity;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Cache key for a secondary-index query: an ordered tuple of
/// (property name, value) pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey(Vec<(String, String)>);

impl IndexKey {
    /// Builds a key from (property, value) pairs, keeping their order.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds a key for a single-property equality query.
    pub fn single(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self(vec![(property.into(), value.into())])
    }

    /// Returns the pairs in key order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// Outcome of a cache probe.
///
/// `Hit(None)` is a cached absence: the backend was already asked for
/// this identity and had nothing, so the DAO can answer without another
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    /// The cache has no entry for this key.
    Miss,
    /// The cache has an entry, possibly recording absence.
    Hit(T),
}

/// Lookup cache for one entity type.
///
/// Implementations must be safe for concurrent use; a single instance
/// is shared by every handle to the owning DAO.
pub trait EntityCache<E: Entity>: Send + Sync {
    /// Probes the identity space.
    fn get_by_id(&self, id: &str) -> CacheLookup<Option<E>>;

    /// Records an identity lookup result, including absence.
    fn put_by_id(&self, id: &str, entity: Option<E>);

    /// Drops the identity entry for `id`.
    fn evict(&self, id: &str);

    /// Probes the secondary-index space.
    fn get_by_params(&self, key: &IndexKey) -> CacheLookup<Vec<E>>;

    /// Records a secondary-index query result.
    fn put_by_params(&self, key: &IndexKey, entities: Vec<E>);

    /// Offers the cache a chance to fully absorb a save.
    ///
    /// Returning true means the entity was handled here and the DAO
    /// must skip the backend write. The default declines.
    fn try_alternative_save(&self, _entity: &E) -> bool {
        false
    }
}

/// A process-wide in-memory cache over two hash maps.
pub struct InMemoryEntityCache<E> {
    by_id: RwLock<HashMap<String, Option<E>>>,
    by_params: RwLock<HashMap<IndexKey, Vec<E>>>,
}

impl<E> InMemoryEntityCache<E> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_id: RwLock::new(HashMap::new()),
            by_params: RwLock::new(HashMap::new()),
        }
    }

    /// Drops every entry in both spaces.
    pub fn clear(&self) {
        self.by_id.write().clear();
        self.by_params.write().clear();
    }
}

impl<E> Default for InMemoryEntityCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> EntityCache<E> for InMemoryEntityCache<E> {
    fn get_by_id(&self, id: &str) -> CacheLookup<Option<E>> {
        match self.by_id.read().get(id) {
            Some(entry) => CacheLookup::Hit(entry.clone()),
            None => CacheLookup::Miss,
        }
    }

    fn put_by_id(&self, id: &str, entity: Option<E>) {
        self.by_id.write().insert(id.to_string(), entity);
    }

    fn evict(&self, id: &str) {
        self.by_id.write().remove(id);
    }

    fn get_by_params(&self, key: &IndexKey) -> CacheLookup<Vec<E>> {
        match self.by_params.read().get(key) {
            Some(entities) => CacheLookup::Hit(entities.clone()),
            None => CacheLookup::Miss,
        }
    }

    fn put_by_params(&self, key: &IndexKey, entities: Vec<E>) {
        self.by_params.write().insert(key.clone(), entities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityCore;

    #[derive(Clone, Debug, PartialEq)]
    struct Widget {
        core: EntityCore,
    }

    impl Widget {
        fn fresh() -> Self {
            Self {
                core: EntityCore::new(),
            }
        }
    }

    impl Entity for Widget {
        fn kind() -> &'static str {
            "Widget"
        }

        fn core(&self) -> &EntityCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut EntityCore {
            &mut self.core
        }

        fn set_modified(&mut self) {}
    }

    #[test]
    fn miss_then_hit_by_id() {
        let cache = InMemoryEntityCache::new();
        let widget = Widget::fresh();
        let id = widget.id().to_string();

        assert_eq!(cache.get_by_id(&id), CacheLookup::Miss);
        cache.put_by_id(&id, Some(widget.clone()));
        assert_eq!(cache.get_by_id(&id), CacheLookup::Hit(Some(widget)));
    }

    #[test]
    fn cached_absence_is_a_hit() {
        let cache: InMemoryEntityCache<Widget> = InMemoryEntityCache::new();
        cache.put_by_id("missing0123456789abc", None);
        assert_eq!(
            cache.get_by_id("missing0123456789abc"),
            CacheLookup::Hit(None)
        );
    }

    #[test]
    fn evict_drops_identity_entry_only() {
        let cache = InMemoryEntityCache::new();
        let widget = Widget::fresh();
        let id = widget.id().to_string();
        let key = IndexKey::single("name", "ada");

        cache.put_by_id(&id, Some(widget.clone()));
        cache.put_by_params(&key, vec![widget]);
        cache.evict(&id);

        assert_eq!(cache.get_by_id(&id), CacheLookup::Miss);
        assert!(matches!(cache.get_by_params(&key), CacheLookup::Hit(_)));
    }

    #[test]
    fn index_key_order_matters() {
        let a = IndexKey::new([("x", "1"), ("y", "2")]);
        let b = IndexKey::new([("y", "2"), ("x", "1")]);
        assert_ne!(a, b);
    }

    #[test]
    fn cache_handle_is_shared_across_threads() {
        let cache = std::sync::Arc::new(InMemoryEntityCache::new());
        let widget = Widget::fresh();
        let id = widget.id().to_string();
        cache.put_by_id(&id, Some(widget));

        let handle = {
            let shared: std::sync::Arc<dyn EntityCache<Widget>> = cache.clone();
            let id = id.clone();
            std::thread::spawn(move || matches!(shared.get_by_id(&id), CacheLookup::Hit(Some(_))))
        };
        assert!(handle.join().unwrap());
        assert!(matches!(cache.get_by_id(&id), CacheLookup::Hit(Some(_))));
    }

    #[test]
    fn alternative_save_declines_by_default() {
        let cache = InMemoryEntityCache::new();
        assert!(!cache.try_alternative_save(&Widget::fresh()));
    }

    #[test]
    fn clear_empties_both_spaces() {
        let cache = InMemoryEntityCache::new();
        let widget = Widget::fresh();
        let id = widget.id().to_string();
        cache.put_by_id(&id, Some(widget.clone()));
        cache.put_by_params(&IndexKey::single("name", "ada"), vec![widget]);

        cache.clear();
        assert_eq!(cache.get_by_id(&id), CacheLookup::Miss);
        assert_eq!(
            cache.get_by_params(&IndexKey::single("name", "ada")),
            CacheLookup::Miss
        );
    }
}
