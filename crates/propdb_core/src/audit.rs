//! Audit hook invoked on committed property changes.

use propdb_document::Value;

/// Callback invoked synchronously after every committed write to an
/// audited property.
///
/// A common use is shipping the change to an external analytics store.
/// The callback is infallible by signature: failures are the
/// collaborator's own responsibility and are never retried here.
pub trait AuditHandler: Send + Sync {
    /// Called with the property name, the newly committed value
    /// (`Value::Null` for a removal) and the owning entity's identity.
    fn on_property_changed(&self, property: &str, new_value: &Value, owner_id: &str);
}
