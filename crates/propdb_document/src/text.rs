//! Text serialization for documents.
//!
//! A document serializes to a single self-describing JSON blob. Nested
//! documents, lists and maps nest using the same grammar, and the text
//! form is the persisted contract: rehydration merges the parsed text
//! back into a fresh document and treats it as authoritative.

use crate::document::Document;
use crate::error::{DocumentError, DocumentResult};
use crate::value::Value;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

impl Document {
    /// Serializes this document to its text form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DocumentError::UnsupportedValue`] for values the
    /// text form cannot represent faithfully (non-finite floats), or
    /// [`crate::DocumentError::Text`] if rendering fails.
    pub fn to_text(&self) -> DocumentResult<String> {
        for (name, value) in self.iter() {
            check_marshalable(name, value)?;
        }
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a document from its text form.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DocumentError::Text`] if the text does not match
    /// the document grammar.
    pub fn from_text(text: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// The JSON writer would silently render non-finite floats as null,
// breaking the round-trip contract; reject them up front instead.
fn check_marshalable(field: &str, value: &Value) -> DocumentResult<()> {
    match value {
        Value::Float(f) if !f.is_finite() => {
            Err(DocumentError::unsupported_value(field, "non-finite float"))
        }
        Value::List(items) => items
            .iter()
            .try_for_each(|item| check_marshalable(field, item)),
        Value::Doc(doc) => doc
            .iter()
            .try_for_each(|(name, nested)| check_marshalable(name, nested)),
        _ => Ok(()),
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of field names to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Document, A::Error> {
        let mut doc = Document::new();
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            // Duplicate field names in the text form: last one wins.
            doc.set(name, value);
        }
        Ok(doc)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Document {
        let mut address = Document::new();
        address.set("city", "London");
        address.set("zip", "NW1");

        let mut doc = Document::new();
        doc.set("name", "Ada");
        doc.set("age", 36i64);
        doc.set("ratio", 0.5f64);
        doc.set("active", true);
        doc.set("nothing", ());
        doc.set("raw", vec![1u8, 2, 3]);
        doc.set(
            "tags",
            vec![Value::Text("math".into()), Value::Text("engines".into())],
        );
        doc.set("address", address);
        doc
    }

    #[test]
    fn round_trip() {
        let doc = sample();
        let text = doc.to_text().unwrap();
        let restored = Document::from_text(&text).unwrap();
        assert_eq!(doc, restored);
    }

    #[test]
    fn empty_round_trip() {
        let doc = Document::new();
        let restored = Document::from_text(&doc.to_text().unwrap()).unwrap();
        assert_eq!(doc, restored);
    }

    #[test]
    fn text_is_self_describing() {
        let mut doc = Document::new();
        doc.set("n", 1i64);
        let text = doc.to_text().unwrap();
        // Kind tags survive in the text so ints and floats stay distinct.
        assert!(text.contains("Int"));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let mut doc = Document::new();
        doc.set("ratio", f64::NAN);
        assert!(matches!(
            doc.to_text(),
            Err(DocumentError::UnsupportedValue { .. })
        ));

        let mut nested = Document::new();
        nested.set("inner", f64::INFINITY);
        let mut doc = Document::new();
        doc.set("outer", nested);
        assert!(doc.to_text().is_err());
    }

    #[test]
    fn garbage_fails_to_parse() {
        assert!(Document::from_text("not a document").is_err());
        assert!(Document::from_text("[1,2,3]").is_err());
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            "[a-z ]{0,12}".prop_map(Value::Text),
            prop::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
                prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                    .prop_map(|pairs| Value::Doc(pairs.into_iter().collect())),
            ]
        })
    }

    fn document_strategy() -> impl Strategy<Value = Document> {
        prop::collection::vec(("[a-z]{1,8}", value_strategy()), 0..6)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_round_trip(doc in document_strategy()) {
            let text = doc.to_text().unwrap();
            let restored = Document::from_text(&text).unwrap();
            prop_assert_eq!(doc, restored);
        }

        #[test]
        fn prop_equality_ignores_order(doc in document_strategy()) {
            let mut reversed = Document::new();
            let pairs: Vec<(String, Value)> = doc
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
            for (name, value) in pairs.into_iter().rev() {
                reversed.set(name, value);
            }
            prop_assert_eq!(doc, reversed);
        }
    }
}
