use std::{future::Future, time::Duration};

use opentelemetry::KeyValue;
use tracing::warn;

use crate::{config::StorageSettings, storage::StorageError, utils::metrics};

pub(crate) const MAX_BACKOFF_MS: u64 = 2_000;

/// Retry policy for idempotent reads. Writes never go through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReadRetryPolicy {
    retries: u32,
    initial_backoff_ms: u64,
}

impl ReadRetryPolicy {
    pub(crate) fn new(retries: u32, initial_backoff_ms: u64) -> Self {
        Self {
            retries,
            initial_backoff_ms,
        }
    }

    pub(crate) fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(settings.read_retries, settings.retry_backoff_ms)
    }

    fn backoff_ms(&self, retry: u32) -> u64 {
        self.initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(retry))
            .min(MAX_BACKOFF_MS)
    }

    pub(crate) async fn run<T, F, Fut>(
        &self,
        operation: &'static str,
        mut attempt: F,
    ) -> Result<T, StorageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StorageError>>,
    {
        let mut retry = 0;
        loop {
            match attempt().await {
                Err(e) if is_transient(&e) && retry < self.retries => {
                    let backoff = self.backoff_ms(retry);
                    retry += 1;
                    warn!(
                        error = %e,
                        operation,
                        retry,
                        backoff_ms = backoff,
                        "store read failed, retrying"
                    );
                    metrics::STORE_READ_RETRY_COUNTER
                        .add(1, &[KeyValue::new("operation", operation)]);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                result => return result,
            }
        }
    }
}

fn is_transient(error: &StorageError) -> bool {
    matches!(error, StorageError::Internal(_) | StorageError::JoinError(_))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::storage::SledStorageError;

    fn store_failure() -> StorageError {
        StorageError::Internal(SledStorageError::InvalidKey("post".into()))
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let policy = ReadRetryPolicy::new(10, 100);

        assert_eq!(policy.backoff_ms(0), 100);
        assert_eq!(policy.backoff_ms(1), 200);
        assert_eq!(policy.backoff_ms(3), 800);
        assert_eq!(policy.backoff_ms(5), MAX_BACKOFF_MS);
        assert_eq!(policy.backoff_ms(64), MAX_BACKOFF_MS);
    }

    #[tokio::test]
    async fn retries_store_failures_until_success() {
        let calls = AtomicU32::new(0);
        let policy = ReadRetryPolicy::new(2, 1);

        let result = policy
            .run("test", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(store_failure())
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_configured_retries() {
        let calls = AtomicU32::new(0);
        let policy = ReadRetryPolicy::new(1, 1);

        let result: Result<(), _> = policy
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(store_failure())
            })
            .await;

        assert!(matches!(result, Err(StorageError::Internal(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn not_found_is_never_retried() {
        let calls = AtomicU32::new(0);
        let policy = ReadRetryPolicy::new(3, 1);

        let result: Result<(), _> = policy
            .run("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(StorageError::NotFound)
            })
            .await;

        assert!(matches!(result, Err(StorageError::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
