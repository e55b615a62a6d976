//! Bounded group of spawned tasks whose results are collected by submission index.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::EvalError;

/// A batch of independent units of work.
///
/// Every spawned future is tagged with its submission index and [`TaskGroup::join`]
/// writes each output into the slot for that index, so the returned vector is in
/// submission order whatever order the tasks finish in. A group is consumed by
/// `join` and never reused across batches.
pub struct TaskGroup<T> {
    tasks: JoinSet<(usize, Result<T, EvalError>)>,
    permits: Option<Arc<Semaphore>>,
    len: usize,
}

impl<T: Send + 'static> TaskGroup<T> {
    /// Creates a group with no concurrency limit.
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    /// Creates a group running at most `limit` units at once.
    ///
    /// `None` and `Some(0)` both mean unbounded.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            tasks: JoinSet::new(),
            permits: limit
                .filter(|n| *n > 0)
                .map(|n| Arc::new(Semaphore::new(n))),
            len: 0,
        }
    }

    /// Spawns one unit of work and returns its index.
    pub fn spawn<F>(&mut self, work: F) -> usize
    where
        F: Future<Output = Result<T, EvalError>> + Send + 'static,
    {
        let index = self.len;
        self.len += 1;
        let permits = self.permits.clone();
        self.tasks.spawn(async move {
            let _permit = match permits {
                Some(permits) => match permits.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(err) => return (index, Err(EvalError::TaskError(err.to_string()))),
                },
                None => None,
            };
            (index, work.await)
        });
        index
    }

    /// Number of units spawned so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Waits for every unit and returns the outputs in submission order.
    ///
    /// The first failure fails the whole batch; units still running are aborted
    /// when the group is dropped.
    pub async fn join(mut self) -> Result<Vec<T>, EvalError> {
        let mut slots: Vec<Option<T>> = (0..self.len).map(|_| None).collect();
        while let Some(joined) = self.tasks.join_next().await {
            let (index, result) = joined?;
            slots[index] = Some(result?);
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| EvalError::TaskError(format!("task {index} produced no result")))
            })
            .collect()
    }
}

impl<T: Send + 'static> Default for TaskGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `work` once per item in its own task and collects outputs in item order.
pub(crate) async fn run_indexed<I, T, F, Fut>(
    items: I,
    limit: Option<usize>,
    mut work: F,
) -> Result<Vec<T>, EvalError>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, EvalError>> + Send + 'static,
    T: Send + 'static,
{
    let mut group = TaskGroup::with_limit(limit);
    for item in items {
        group.spawn(work(item));
    }
    log::debug!("dispatching batch of {} tasks", group.len());
    group.join().await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn results_follow_submission_order_not_completion_order() {
        let mut group = TaskGroup::new();
        for i in 0..5u64 {
            group.spawn(async move {
                tokio::time::sleep(Duration::from_millis(100 - i * 20)).await;
                Ok(i)
            });
        }
        assert_eq!(group.join().await.unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn empty_group_joins_to_empty_vec() {
        let group: TaskGroup<u8> = TaskGroup::new();
        assert!(group.is_empty());
        assert!(group.join().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch() {
        let mut group = TaskGroup::new();
        group.spawn(async { Ok(1) });
        group.spawn(async { Err(EvalError::ProviderError("boom".into())) });
        group.spawn(async { Ok(3) });
        let err = group.join().await.unwrap_err();
        assert!(matches!(err, EvalError::ProviderError(msg) if msg == "boom"));
    }

    #[tokio::test]
    async fn panicking_unit_surfaces_as_task_error() {
        let mut group: TaskGroup<u8> = TaskGroup::new();
        group.spawn(async {
            let value: Option<u8> = None;
            Ok(value.expect("unit exploded"))
        });
        let err = group.join().await.unwrap_err();
        assert!(matches!(err, EvalError::TaskError(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn limit_caps_units_in_flight() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut group = TaskGroup::with_limit(Some(2));
        for i in 0..6usize {
            let running = running.clone();
            let peak = peak.clone();
            group.spawn(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(i)
            });
        }
        assert_eq!(group.join().await.unwrap(), (0..6).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn zero_limit_means_unbounded() {
        let out = run_indexed(0..3u8, Some(0), |i| async move { Ok(i * 2) })
            .await
            .unwrap();
        assert_eq!(out, vec![0, 2, 4]);
    }
}
