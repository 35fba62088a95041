//! # PropDB Backend
//!
//! Storage backend boundary for PropDB.
//!
//! This crate defines the collaborator interface to the remote
//! key-value/document service. Backends store raw [`Document`]s keyed by
//! entity kind and identity and answer simple secondary-index queries
//! (equality, range window, intersection, union) against pre-declared
//! indexable properties. They are not a query engine.
//!
//! ## Design Principles
//!
//! - Backends are dumb document stores; the typed overlay, caching and
//!   retrying all live above this boundary.
//! - Every operation may fail with a timeout-class error or any other
//!   error, and the two classes stay distinguishable so the retry layer
//!   can grow or hold its backoff accordingly.
//! - Implementations must be `Send + Sync`; the process shares one
//!   backend handle across all DAOs.
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral deployments
//!
//! [`Document`]: propdb_document::Document

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;

pub use backend::DocumentBackend;
pub use error::{BackendError, BackendResult};
pub use memory::InMemoryBackend;
