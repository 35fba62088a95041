//! # PropDB Document
//!
//! Schemaless document container for PropDB.
//!
//! A [`Document`] is a mutable, insertion-ordered mapping from field names
//! to dynamically-typed [`Value`]s (scalars, byte strings, lists, nested
//! documents). It is the single backing store for one entity's state.
//!
//! ## Design Principles
//!
//! - The document **owns** its backing storage; list- and map-valued
//!   fields are exposed through write-through views ([`ListView`],
//!   [`MapView`]) that mutate the document in place, never a detached
//!   copy.
//! - Equality is structural and independent of insertion order.
//! - Documents round-trip through a self-describing text form:
//!   `Document::from_text(doc.to_text())` is structurally equal to `doc`.
//!
//! ## Example
//!
//! ```rust
//! use propdb_document::{Document, Value};
//!
//! let mut doc = Document::new();
//! doc.set("name", "Ada");
//! doc.set("age", 36i64);
//!
//! let text = doc.to_text().unwrap();
//! let restored = Document::from_text(&text).unwrap();
//! assert_eq!(doc, restored);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod text;
mod value;
mod views;

pub use document::Document;
pub use error::{DocumentError, DocumentResult};
pub use value::Value;
pub use views::{ListView, MapView};
