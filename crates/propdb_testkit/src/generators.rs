//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random documents and entities
//! that maintain required invariants. Floats are excluded from value
//! strategies so structural-equality assertions stay total.

use crate::fixtures::SampleUser;
use propdb_core::ID_LENGTH;
use propdb_document::{Document, Value};
use proptest::prelude::*;

/// Strategy for valid field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,15}").expect("Invalid regex")
}

/// Strategy for entity identity tokens.
pub fn identity_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[a-zA-Z0-9]{{{ID_LENGTH}}}")).expect("Invalid regex")
}

/// Strategy for scalar values (no floats, no containers).
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9 ]{0,24}".prop_map(Value::Text),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ]
}

/// Strategy for arbitrary values, nesting up to two levels deep.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec((field_name_strategy(), inner), 0..4)
                .prop_map(|pairs| Value::Doc(pairs.into_iter().collect())),
        ]
    })
}

/// Strategy for documents with up to eight fields.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::vec((field_name_strategy(), value_strategy()), 0..8)
        .prop_map(|pairs| pairs.into_iter().collect())
}

/// Strategy for sample users with a randomized schema payload.
pub fn sample_user_strategy() -> impl Strategy<Value = SampleUser> {
    (
        "[a-zA-Z]{1,12}",
        prop::option::of(0i64..120),
        prop::collection::vec("[a-z]{1,8}".prop_map(Value::Text), 0..4),
    )
        .prop_map(|(name, age, tags)| {
            let mut user = SampleUser::new(&name);
            SampleUser::age().set(&mut user.core, age);
            for tag in tags {
                let _ = SampleUser::tags().push(&mut user.core, tag);
            }
            user
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use propdb_core::Entity;

    proptest! {
        #[test]
        fn generated_documents_round_trip(doc in document_strategy()) {
            let text = doc.to_text().unwrap();
            let back = Document::from_text(&text).unwrap();
            prop_assert_eq!(doc, back);
        }

        #[test]
        fn generated_users_survive_persisted_form(user in sample_user_strategy()) {
            let harness = crate::fixtures::DaoHarness::uncached();
            let text = harness.dao.entity_to_document(&user).to_text().unwrap();
            let restored = harness.dao.from_persisted_text(&text).unwrap();
            prop_assert_eq!(restored.id(), user.id());
            prop_assert_eq!(restored.document(), user.document());
        }
    }
}
