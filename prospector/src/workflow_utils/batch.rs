//! Deadline and fan-out helpers for pipeline stages

use futures::{stream::FuturesUnordered, Future, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::error::{ProspectorError, Result};

/// Context provided to each task in a fan-out
#[derive(Debug, Clone, Copy)]
pub struct TaskContext {
    /// Task number (1-indexed for display)
    pub task_number: usize,
    /// Total number of tasks in this fan-out
    pub total_tasks: usize,
}

/// Race `fut` against `deadline`
///
/// When the deadline wins the batch fails with [`ProspectorError::BatchTimeout`]
/// and `fut` is dropped, which cancels it at its next suspension point.
pub async fn run_with_deadline<F, T>(batch: usize, deadline: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(batch, timeout_secs = deadline.as_secs(), "batch deadline reached");
            Err(ProspectorError::BatchTimeout {
                batch,
                timeout: deadline,
            })
        }
    }
}

/// Execute items concurrently with at most `max_concurrent` in flight
///
/// # Returns
/// Vector of results in order of completion (not input order)
///
/// # Error Handling
/// Fails fast: the first error is returned and pending tasks are dropped
pub async fn execute_concurrent<T, F, Fut, R>(
    items: Vec<T>,
    max_concurrent: usize,
    task_executor: F,
) -> Result<Vec<R>>
where
    F: Fn(T, TaskContext) -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let total = items.len();
    let sem = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let executor = &task_executor;
    let mut tasks = FuturesUnordered::new();

    for (idx, item) in items.into_iter().enumerate() {
        let sem = sem.clone();
        let ctx = TaskContext {
            task_number: idx + 1,
            total_tasks: total,
        };

        tasks.push(async move {
            // The semaphore is never closed, so a permit is always granted
            let _permit = sem.acquire().await.ok();
            executor(item, ctx).await
        });
    }

    let mut results = Vec::with_capacity(total);
    while let Some(result) = tasks.next().await {
        results.push(result?);
    }

    Ok(results)
}
