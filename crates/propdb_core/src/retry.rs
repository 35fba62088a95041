//! Bounded retries with growing backoff for backend calls.
//!
//! Every backend-touching operation runs through a [`RetryExecutor`].
//! Timeout-class failures grow the backoff delay between attempts;
//! every other failure retries at the current delay. When the attempt
//! budget is exhausted the last cause is wrapped in
//! [`CoreError::RetriesExhausted`] and surfaced to the caller as fatal.

use crate::error::{CoreError, CoreResult};
use propdb_backend::BackendError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

/// Backoff growth factor applied after a timeout-class failure.
pub const BACKOFF_FACTOR: u32 = 3;

/// Retry budget and backoff configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    initial_backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy with an explicit budget and initial delay.
    #[must_use]
    pub const fn new(attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            attempts,
            initial_backoff,
        }
    }

    /// Overrides the attempt budget.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Overrides the initial backoff delay.
    #[must_use]
    pub const fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Returns the attempt budget.
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns the initial backoff delay.
    pub const fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }
}

impl Default for RetryPolicy {
    /// Six attempts starting at 800ms between retries.
    fn default() -> Self {
        Self::new(6, Duration::from_millis(800))
    }
}

/// Injectable sleep, so tests can observe backoff without waiting.
pub trait Sleeper: Send + Sync {
    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The production sleeper; parks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A unit of work whose result is already available.
///
/// The "async" DAO variants complete their work before returning and
/// hand back the value wrapped in a `PendingResult`, preserving the
/// deferred-looking call shape without a runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingResult<T> {
    value: T,
}

impl<T> PendingResult<T> {
    /// Wraps an already-computed value.
    pub fn ready(value: T) -> Self {
        Self { value }
    }

    /// Returns the value. Never blocks.
    pub fn wait(self) -> T {
        self.value
    }
}

/// Runs closures against the backend under a [`RetryPolicy`].
///
/// Stateless across calls: one executor is shared process-wide and
/// injected into every DAO.
pub struct RetryExecutor {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryExecutor {
    /// Creates an executor with the default policy and real sleeping.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    /// Creates an executor with an explicit policy and real sleeping.
    #[must_use]
    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self::with_sleeper(policy, Arc::new(ThreadSleeper))
    }

    /// Creates an executor with an explicit policy and sleeper.
    #[must_use]
    pub fn with_sleeper(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    /// Returns the configured policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs `work` until it succeeds or the attempt budget runs out.
    ///
    /// After a timeout-class failure the executor sleeps the current
    /// backoff delay and multiplies it by [`BACKOFF_FACTOR`]; after any
    /// other failure it sleeps the current delay unchanged. No sleep
    /// follows the final failed attempt.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] wrapping the last
    /// failure once the budget is spent.
    pub fn execute<T>(
        &self,
        mut work: impl FnMut() -> Result<T, BackendError>,
    ) -> CoreResult<T> {
        let mut remaining = self.policy.attempts;
        let mut backoff = self.policy.initial_backoff;

        loop {
            match work() {
                Ok(value) => return Ok(value),
                Err(cause) => {
                    remaining = remaining.saturating_sub(1);
                    if remaining == 0 {
                        error!(
                            attempts = self.policy.attempts,
                            %cause,
                            "backend call failed, retries exhausted"
                        );
                        return Err(CoreError::retries_exhausted(self.policy.attempts, cause));
                    }
                    warn!(
                        remaining,
                        backoff_ms = backoff.as_millis() as u64,
                        %cause,
                        "backend call failed, retrying"
                    );
                    self.sleeper.sleep(backoff);
                    if cause.is_timeout() {
                        backoff *= BACKOFF_FACTOR;
                    }
                }
            }
        }
    }

    /// Like [`RetryExecutor::execute`], completing the work before
    /// returning it wrapped in a [`PendingResult`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RetriesExhausted`] wrapping the last
    /// failure once the budget is spent.
    pub fn execute_async<T>(
        &self,
        work: impl FnMut() -> Result<T, BackendError>,
    ) -> CoreResult<PendingResult<T>> {
        self.execute(work).map(PendingResult::ready)
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        naps: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.naps.lock().push(duration);
        }
    }

    fn executor(attempts: u32, initial_ms: u64) -> (RetryExecutor, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        let policy = RetryPolicy::new(attempts, Duration::from_millis(initial_ms));
        (
            RetryExecutor::with_sleeper(policy, sleeper.clone()),
            sleeper,
        )
    }

    #[test]
    fn success_on_first_attempt_never_sleeps() {
        let (executor, sleeper) = executor(6, 800);
        let result = executor.execute(|| Ok::<_, BackendError>(42)).unwrap();
        assert_eq!(result, 42);
        assert!(sleeper.naps.lock().is_empty());
    }

    #[test]
    fn timeout_grows_backoff_threefold() {
        let (executor, sleeper) = executor(3, 100);
        let mut calls = 0;
        let err = executor
            .execute(|| -> Result<(), BackendError> {
                calls += 1;
                Err(BackendError::timeout("deadline"))
            })
            .unwrap_err();

        assert_eq!(calls, 3);
        assert_eq!(
            *sleeper.naps.lock(),
            vec![Duration::from_millis(100), Duration::from_millis(300)]
        );
        assert!(matches!(
            err,
            CoreError::RetriesExhausted { attempts: 3, .. }
        ));
    }

    #[test]
    fn non_timeout_keeps_backoff_flat() {
        let (executor, sleeper) = executor(3, 100);
        let _ = executor
            .execute(|| -> Result<(), BackendError> {
                Err(BackendError::connection("refused"))
            })
            .unwrap_err();

        assert_eq!(
            *sleeper.naps.lock(),
            vec![Duration::from_millis(100), Duration::from_millis(100)]
        );
    }

    #[test]
    fn recovers_midway_through_budget() {
        let (executor, sleeper) = executor(6, 100);
        let mut calls = 0;
        let value = executor
            .execute(|| {
                calls += 1;
                if calls < 3 {
                    Err(BackendError::timeout("deadline"))
                } else {
                    Ok("done")
                }
            })
            .unwrap();

        assert_eq!(value, "done");
        assert_eq!(calls, 3);
        assert_eq!(sleeper.naps.lock().len(), 2);
    }

    #[test]
    fn no_sleep_after_final_attempt() {
        let (executor, sleeper) = executor(1, 100);
        let _ = executor
            .execute(|| -> Result<(), BackendError> { Err(BackendError::timeout("deadline")) })
            .unwrap_err();
        assert!(sleeper.naps.lock().is_empty());
    }

    #[test]
    fn exhaustion_preserves_last_cause() {
        let (executor, _) = executor(2, 100);
        let mut calls = 0;
        let err = executor
            .execute(|| -> Result<(), BackendError> {
                calls += 1;
                if calls == 1 {
                    Err(BackendError::timeout("first"))
                } else {
                    Err(BackendError::connection("second"))
                }
            })
            .unwrap_err();

        match err {
            CoreError::RetriesExhausted { cause, .. } => {
                assert!(cause.to_string().contains("second"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn async_variant_completes_before_returning() {
        let (executor, _) = executor(6, 100);
        let pending = executor
            .execute_async(|| Ok::<_, BackendError>(7))
            .unwrap();
        assert_eq!(pending.wait(), 7);
    }

    #[test]
    fn default_policy_matches_production_settings() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 6);
        assert_eq!(policy.initial_backoff(), Duration::from_millis(800));
    }
}
