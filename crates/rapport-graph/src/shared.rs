//! State shared by the relationship graph and the engagement ledger

use crate::locks::EntityLocks;
use crate::metrics::{GraphMetrics, Operation};
use crate::{GraphConfig, GraphError};
use rapport_domain::traits::RetryableError;
use rapport_domain::Outcome;
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Store, lock table, configuration and counters behind one handle
pub(crate) struct Shared<S> {
    store: Mutex<S>,
    pub(crate) locks: EntityLocks,
    pub(crate) config: GraphConfig,
    metrics: Mutex<GraphMetrics>,
}

impl<S> Shared<S> {
    pub(crate) fn new(store: S, config: GraphConfig) -> Result<Self, GraphError> {
        config.validate()?;
        Ok(Self {
            store: Mutex::new(store),
            locks: EntityLocks::new(),
            config,
            metrics: Mutex::new(GraphMetrics::new()),
        })
    }

    fn store(&self) -> MutexGuard<'_, S> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn metrics(&self) -> MutexGuard<'_, GraphMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a read against the store
    pub(crate) fn read<T, E: Display>(
        &self,
        f: impl FnOnce(&S) -> Result<T, E>,
    ) -> Result<T, GraphError> {
        let store = self.store();
        f(&store).map_err(|e| GraphError::StorageFailure(e.to_string()))
    }

    /// Run a write against the store, retrying up to `storage_attempts` times
    ///
    /// Only retryable errors are tried again; anything else fails at once.
    /// The write closure must be all-or-nothing: a failed attempt leaves the
    /// store as it was, so it can simply be run again.
    pub(crate) fn persist<E: RetryableError>(
        &self,
        op: Operation,
        mut write: impl FnMut(&mut S) -> Result<(), E>,
    ) -> Result<(), GraphError> {
        let attempts = self.config.storage_attempts.max(1);
        let mut attempt = 1;
        loop {
            let result = {
                let mut store = self.store();
                write(&mut store)
            };
            match result {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts && e.is_retryable() => {
                    tracing::warn!(
                        operation = %op,
                        attempt,
                        error = %e,
                        "Store write failed, retrying"
                    );
                    self.metrics().record_retry();
                    std::thread::sleep(self.config.retry_backoff());
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(operation = %op, attempt, error = %e, "Store write failed");
                    return Err(GraphError::StorageFailure(if attempt > 1 {
                        format!("{} (after {} attempts)", e, attempt)
                    } else {
                        e.to_string()
                    }));
                }
            }
        }
    }

    /// Count the result of a mutating operation
    pub(crate) fn record<T>(&self, op: Operation, result: &Result<Outcome<T>, GraphError>) {
        let mut metrics = self.metrics();
        match result {
            Ok(outcome) if outcome.is_success() => metrics.record_applied(op),
            Ok(_) => metrics.record_noop(op),
            Err(_) => metrics.record_failure(op),
        }
    }

    /// Exclusive access to the store, outside any entity lock
    pub(crate) fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut store = self.store();
        f(&mut store)
    }
}
