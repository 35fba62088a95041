//! Entities: identity, document ownership and the property schema.

use crate::audit::AuditHandler;
use propdb_document::Document;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Length of a generated entity identity token.
pub const ID_LENGTH: usize = 20;

/// Reserved document field carrying the entity identity in persisted form.
pub const FIELD_ID: &str = "_id";

/// Reserved document field carrying the entity kind in persisted form.
pub const FIELD_KIND: &str = "_t";

/// Shared state embedded by every concrete entity type.
///
/// Holds the identity token, the single owned [`Document`] backing all
/// typed properties, the persisted marker, and the optional audit hook
/// that property writes report to.
///
/// The identity is a 20-character random alphanumeric token generated at
/// construction. It is immutable in normal use; only rehydration from a
/// persisted form reassigns it.
#[derive(Clone)]
pub struct EntityCore {
    id: String,
    document: Document,
    persisted: bool,
    audit: Option<Arc<dyn AuditHandler>>,
}

impl EntityCore {
    /// Creates a fresh entity core with a new random identity and an
    /// empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: random_id(),
            document: Document::new(),
            persisted: false,
            audit: None,
        }
    }

    /// Returns the identity token.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reassigns the identity.
    ///
    /// Only rehydration paths should call this.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Returns the backing document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the backing document mutably.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Returns true if this entity has been loaded from or written to
    /// the backend.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Sets the persisted marker.
    pub fn set_persisted(&mut self, persisted: bool) {
        self.persisted = persisted;
    }

    /// Installs the audit hook that audited property writes report to.
    pub fn set_audit_handler(&mut self, handler: Arc<dyn AuditHandler>) {
        self.audit = Some(handler);
    }

    /// Returns the installed audit hook, if any.
    pub fn audit_handler(&self) -> Option<&Arc<dyn AuditHandler>> {
        self.audit.as_ref()
    }
}

impl Default for EntityCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Entities compare by identity alone, so a concrete entity type that
/// derives `PartialEq` over its `EntityCore` gets the intended
/// "same type, same identity" equality.
impl PartialEq for EntityCore {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityCore {}

impl fmt::Debug for EntityCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCore")
            .field("id", &self.id)
            .field("persisted", &self.persisted)
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

/// A persistent entity: one owned document plus a fixed schema of typed
/// properties declared by the concrete type.
///
/// Implementors embed an [`EntityCore`] and declare their property
/// schema as associated functions returning property definitions.
/// Entities are shared through caches and DAO handles across threads,
/// hence the `Send + Sync` bounds.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The entity kind name used as the backend namespace.
    fn kind() -> &'static str
    where
        Self: Sized;

    /// Returns the embedded core.
    fn core(&self) -> &EntityCore;

    /// Returns the embedded core mutably.
    fn core_mut(&mut self) -> &mut EntityCore;

    /// Refreshes entity-specific derived fields.
    ///
    /// Called by the DAO before every persist.
    fn set_modified(&mut self);

    /// Returns the identity token.
    fn id(&self) -> &str {
        self.core().id()
    }

    /// Returns the backing document.
    fn document(&self) -> &Document {
        self.core().document()
    }

    /// Returns the backing document mutably.
    fn document_mut(&mut self) -> &mut Document {
        self.core_mut().document_mut()
    }

    /// Returns true if this entity has been loaded from or written to
    /// the backend.
    fn is_persisted(&self) -> bool {
        self.core().is_persisted()
    }
}

fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}
