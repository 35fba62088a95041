//! # PropDB Core
//!
//! Typed, schema-aware access to schemaless documents.
//!
//! This crate provides:
//! - Entities: identity + one owned [`Document`] + a typed property
//!   schema declared by the entity type
//! - The typed property family (scalars, lists, maps, nested objects)
//!   with write-through views and audit hooks
//! - [`RetryExecutor`]: bounded retries with backoff that grows on
//!   timeout-class backend failures
//! - [`EntityCache`]: pluggable per-DAO identity and secondary-index
//!   caching with an alternative-save short-circuit
//! - [`Dao`]: the per-entity-type façade composing cache, retry executor
//!   and storage backend
//!
//! [`Document`]: propdb_document::Document

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod audit;
mod cache;
mod dao;
mod entity;
mod error;
pub mod property;
mod retry;

pub use audit::AuditHandler;
pub use cache::{CacheLookup, EntityCache, InMemoryEntityCache, IndexKey};
pub use dao::{Dao, EntityFactory};
pub use entity::{Entity, EntityCore, FIELD_ID, FIELD_KIND, ID_LENGTH};
pub use error::{CoreError, CoreResult};
pub use retry::{PendingResult, RetryExecutor, RetryPolicy, Sleeper, ThreadSleeper};
