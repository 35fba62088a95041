//! Test fixtures and DAO harness helpers.
//!
//! Provides a sample entity with a full property schema and convenience
//! constructors wiring a DAO against the in-memory backend.

use propdb_backend::InMemoryBackend;
use propdb_core::property::{
    BoolProperty, ListProperty, LongProperty, MapProperty, PropertyMeta, StringProperty,
};
use propdb_core::{
    Dao, Entity, EntityCore, InMemoryEntityCache, RetryExecutor, RetryPolicy, Sleeper,
};
use std::sync::Arc;
use std::time::Duration;

/// A sample entity covering the whole property family.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleUser {
    /// The embedded entity core.
    pub core: EntityCore,
}

impl SampleUser {
    /// Creates a fresh user with the given name.
    pub fn new(name: &str) -> Self {
        let mut user = Self {
            core: EntityCore::new(),
        };
        Self::name().set(&mut user.core, Some(name));
        user
    }

    /// Display name; indexable and audited.
    pub fn name() -> StringProperty {
        StringProperty::new(PropertyMeta::new("name").indexable().audited())
    }

    /// Age in years; indexable.
    pub fn age() -> LongProperty {
        LongProperty::new(PropertyMeta::new("age").indexable())
    }

    /// Login counter, absent treated as zero.
    pub fn login_count() -> LongProperty {
        LongProperty::new(PropertyMeta::new("login_count"))
    }

    /// Unique tags.
    pub fn tags() -> ListProperty {
        ListProperty::new(PropertyMeta::new("tags")).keep_unique()
    }

    /// Free-form settings map.
    pub fn settings() -> MapProperty {
        MapProperty::new(PropertyMeta::new("settings"))
    }

    /// Active flag, defaulting to true when unset.
    pub fn active() -> BoolProperty {
        BoolProperty::new(PropertyMeta::new("active")).with_default(true)
    }

    /// Revision counter bumped on every persist.
    pub fn revision() -> LongProperty {
        LongProperty::new(PropertyMeta::new("revision"))
    }
}

impl Entity for SampleUser {
    fn kind() -> &'static str {
        "SampleUser"
    }

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn set_modified(&mut self) {
        Self::revision().increment(&mut self.core);
    }
}

/// A wired DAO plus its collaborators, for integration tests.
pub struct DaoHarness {
    /// The in-memory backend behind the DAO.
    pub backend: Arc<InMemoryBackend>,
    /// The cache, when the harness was built with one.
    pub cache: Option<Arc<InMemoryEntityCache<SampleUser>>>,
    /// The DAO under test.
    pub dao: Dao<SampleUser>,
}

impl DaoHarness {
    /// Builds an uncached harness with an instant test sleeper.
    pub fn uncached() -> Self {
        Self::build(false)
    }

    /// Builds a harness with an in-memory cache installed.
    pub fn cached() -> Self {
        Self::build(true)
    }

    fn build(with_cache: bool) -> Self {
        let backend = Arc::new(InMemoryBackend::new());
        let retry = Arc::new(RetryExecutor::with_sleeper(
            RetryPolicy::new(3, Duration::from_millis(1)),
            Arc::new(InstantSleeper),
        ));
        let mut dao = Dao::new(
            backend.clone(),
            retry,
            Arc::new(|| SampleUser {
                core: EntityCore::new(),
            }),
        );
        let cache = with_cache.then(|| Arc::new(InMemoryEntityCache::new()));
        if let Some(cache) = &cache {
            dao = dao.with_cache(cache.clone());
        }
        Self {
            backend,
            cache,
            dao,
        }
    }
}

/// A sleeper that returns immediately, keeping retry tests fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    fn sleep(&self, _duration: Duration) {}
}

/// Initializes tracing output for a test run. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_user_schema_round_trips() {
        let mut user = SampleUser::new("Ada");
        assert_eq!(SampleUser::name().get(&user.core), Some("Ada".to_string()));
        assert_eq!(SampleUser::active().get(&user.core), Some(true));

        SampleUser::tags().push(&mut user.core, "admin".into()).unwrap();
        assert!(SampleUser::tags()
            .contains(&user.core, &"admin".into()));
    }

    #[test]
    fn set_modified_bumps_revision() {
        let mut user = SampleUser::new("Ada");
        user.set_modified();
        user.set_modified();
        assert_eq!(SampleUser::revision().get(&user.core), Some(2));
    }
}
