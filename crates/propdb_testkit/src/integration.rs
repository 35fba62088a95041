//! Cross-crate integration scenarios.
//!
//! Exercises the full stack: entities and their property schema, the
//! retry executor against a fault-injecting backend, and the DAO's
//! cache interplay.

use crate::fixtures::SampleUser;
use crate::flaky::{FaultKind, FlakyBackend};
use crate::recording::RecordingSleeper;
use propdb_core::{Dao, EntityCore, RetryExecutor, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;

/// Builds a DAO over a fault-injecting backend with a recording
/// sleeper, so tests can observe both the call count and the backoff
/// schedule.
pub fn flaky_dao(
    faults: usize,
    fault_kind: FaultKind,
    attempts: u32,
    initial_backoff: Duration,
) -> (Dao<SampleUser>, Arc<FlakyBackend>, Arc<RecordingSleeper>) {
    let backend = Arc::new(FlakyBackend::new(faults, fault_kind));
    let sleeper = Arc::new(RecordingSleeper::new());
    let retry = Arc::new(RetryExecutor::with_sleeper(
        RetryPolicy::new(attempts, initial_backoff),
        sleeper.clone(),
    ));
    let dao = Dao::new(
        backend.clone(),
        retry,
        Arc::new(|| SampleUser {
            core: EntityCore::new(),
        }),
    );
    (dao, backend, sleeper)
}
