use opentelemetry::KeyValue;

use super::APP_NAME;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicI64, Ordering};

static BLOCKING_TASKS: Lazy<DashMap<&'static str, AtomicI64>> = Lazy::new(DashMap::new);

/// Counts in-flight `spawn_blocking` work per operation for the
/// `blocking_tasks_count` gauge.
pub struct BlockingTaskGuard {
    operation: &'static str,
}

impl BlockingTaskGuard {
    pub fn new(operation: &'static str) -> Self {
        BLOCKING_TASKS
            .entry(operation)
            .or_default()
            .fetch_add(1, Ordering::Relaxed);

        Self { operation }
    }
}

impl Drop for BlockingTaskGuard {
    fn drop(&mut self) {
        if let Some(count) = BLOCKING_TASKS.get(self.operation) {
            count.fetch_sub(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
pub(crate) fn in_flight(operation: &str) -> i64 {
    BLOCKING_TASKS
        .get(operation)
        .map_or(0, |count| count.load(Ordering::Relaxed))
}

pub(crate) fn init_blocking_tasks_metric() {
    opentelemetry::global::meter(APP_NAME)
        .i64_observable_gauge("blocking_tasks_count")
        .with_callback(|observer| {
            for entry in BLOCKING_TASKS.iter() {
                observer.observe(
                    entry.load(Ordering::Relaxed),
                    &[KeyValue::new("operation", *entry.key())],
                );
            }
        })
        .build();
}
