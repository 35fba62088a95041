//! The typed property family.
//!
//! A property is a typed accessor bound to one field name of an owning
//! entity's document. Properties are stateless descriptors: reading
//! always reflects the current document, writing updates the document
//! immediately and reports to the audit hook when requested.
//!
//! Entity types declare their schema as associated functions returning
//! property definitions:
//!
//! ```rust,ignore
//! impl User {
//!     fn name() -> StringProperty {
//!         StringProperty::new(PropertyMeta::new("name").indexable().audited())
//!     }
//!     fn login_count() -> LongProperty {
//!         LongProperty::new(PropertyMeta::new("login_count"))
//!     }
//! }
//! ```

mod complex;
mod list;
mod map;
mod scalar;

pub use complex::{ComplexMapProperty, ComplexProperty, ComplexValue};
pub use list::ListProperty;
pub use map::MapProperty;
pub use scalar::{BoolProperty, DoubleProperty, LongProperty, StringProperty};

use crate::entity::EntityCore;
use propdb_document::Value;

/// Static metadata shared by every property definition: the field name
/// plus the indexable and audited flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMeta {
    name: &'static str,
    indexable: bool,
    audited: bool,
}

impl PropertyMeta {
    /// Creates metadata for a plain, unindexed, unaudited property.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            indexable: false,
            audited: false,
        }
    }

    /// Marks the property as usable as a secondary-index query key.
    #[must_use]
    pub const fn indexable(mut self) -> Self {
        self.indexable = true;
        self
    }

    /// Marks the property as audited: committed changes are reported to
    /// the owning entity's audit hook.
    #[must_use]
    pub const fn audited(mut self) -> Self {
        self.audited = true;
        self
    }

    /// Returns the bound field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if the property may be used as an index query key.
    pub const fn is_indexable(&self) -> bool {
        self.indexable
    }

    /// Returns true if committed changes are audited.
    pub const fn is_audited(&self) -> bool {
        self.audited
    }
}

/// Commits a value into the entity's document slot and fires the audit
/// hook when the property is audited and the write is forced or actually
/// changed the stored value. `None` removes the field.
pub(crate) fn commit_value(
    core: &mut EntityCore,
    meta: &PropertyMeta,
    new_value: Option<Value>,
    force_audit: bool,
) {
    let changed = core.document().get(meta.name()) != new_value.as_ref();
    match &new_value {
        Some(value) => core.document_mut().set(meta.name(), value.clone()),
        None => {
            core.document_mut().remove(meta.name());
        }
    }
    if meta.is_audited() && (force_audit || changed) {
        if let Some(handler) = core.audit_handler().cloned() {
            let committed = new_value.unwrap_or(Value::Null);
            handler.on_property_changed(meta.name(), &committed, core.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditHandler;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, Value)>>,
    }

    impl AuditHandler for Recorder {
        fn on_property_changed(&self, property: &str, new_value: &Value, _owner_id: &str) {
            self.events
                .lock()
                .push((property.to_string(), new_value.clone()));
        }
    }

    #[test]
    fn meta_flags() {
        let meta = PropertyMeta::new("age").indexable().audited();
        assert_eq!(meta.name(), "age");
        assert!(meta.is_indexable());
        assert!(meta.is_audited());

        let plain = PropertyMeta::new("age");
        assert!(!plain.is_indexable());
        assert!(!plain.is_audited());
    }

    #[test]
    fn audit_fires_on_change_only() {
        let recorder = Arc::new(Recorder::default());
        let mut core = EntityCore::new();
        core.set_audit_handler(recorder.clone());

        let meta = PropertyMeta::new("name").audited();
        commit_value(&mut core, &meta, Some(Value::Text("Ada".into())), false);
        commit_value(&mut core, &meta, Some(Value::Text("Ada".into())), false);
        commit_value(&mut core, &meta, Some(Value::Text("Bob".into())), false);

        assert_eq!(recorder.events.lock().len(), 2);
    }

    #[test]
    fn force_audit_fires_even_without_change() {
        let recorder = Arc::new(Recorder::default());
        let mut core = EntityCore::new();
        core.set_audit_handler(recorder.clone());

        let meta = PropertyMeta::new("name").audited();
        commit_value(&mut core, &meta, Some(Value::Text("Ada".into())), false);
        commit_value(&mut core, &meta, Some(Value::Text("Ada".into())), true);

        assert_eq!(recorder.events.lock().len(), 2);
    }

    #[test]
    fn unaudited_property_never_fires() {
        let recorder = Arc::new(Recorder::default());
        let mut core = EntityCore::new();
        core.set_audit_handler(recorder.clone());

        let meta = PropertyMeta::new("name");
        commit_value(&mut core, &meta, Some(Value::Text("Ada".into())), true);
        assert!(recorder.events.lock().is_empty());
    }

    #[test]
    fn removal_audits_null() {
        let recorder = Arc::new(Recorder::default());
        let mut core = EntityCore::new();
        core.set_audit_handler(recorder.clone());

        let meta = PropertyMeta::new("name").audited();
        commit_value(&mut core, &meta, Some(Value::Text("Ada".into())), false);
        commit_value(&mut core, &meta, None, false);

        let events = recorder.events.lock();
        assert_eq!(events[1].1, Value::Null);
        assert!(!core.document().has("name"));
    }
}
