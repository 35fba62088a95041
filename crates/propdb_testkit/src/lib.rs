//! # PropDB Testkit
//!
//! Test utilities for PropDB.
//!
//! This crate provides:
//! - A sample entity fixture with a full property schema
//! - A fault-injecting backend for exercising the retry path
//! - Recording doubles for the sleeper and audit collaborators
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use propdb_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_dao() {
//!     let harness = DaoHarness::cached();
//!     let mut user = SampleUser::new("Ada");
//!     harness.dao.save(&mut user).unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod flaky;
pub mod generators;
pub mod integration;
pub mod recording;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::flaky::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::recording::*;
}

pub use fixtures::*;
pub use flaky::*;
pub use generators::*;
pub use integration::*;
pub use recording::*;
