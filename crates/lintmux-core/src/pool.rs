//! Fixed-size worker pool over a shared job list.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;
use tracing::error;

/// Runs `work` over every item with at most `width` jobs in flight.
///
/// Workers pull the next job from a shared index counter and run it to
/// completion before pulling another, so jobs start in list order but may
/// finish in any order. Results come back in list order. A job that panics
/// yields `None` in its slot.
pub async fn run_pool<T, R, F, Fut>(items: Vec<T>, width: usize, work: F) -> Vec<Option<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let total = items.len();
    if total == 0 {
        return Vec::new();
    }

    let jobs: Arc<Vec<Mutex<Option<T>>>> =
        Arc::new(items.into_iter().map(|i| Mutex::new(Some(i))).collect());
    let next = Arc::new(AtomicUsize::new(0));
    let work = Arc::new(work);

    let mut workers = JoinSet::new();
    for _ in 0..width.clamp(1, total) {
        let jobs = Arc::clone(&jobs);
        let next = Arc::clone(&next);
        let work = Arc::clone(&work);
        workers.spawn(async move {
            let mut done = Vec::new();
            loop {
                let index = next.fetch_add(1, Ordering::SeqCst);
                let Some(slot) = jobs.get(index) else {
                    break;
                };
                let Some(item) = slot.lock().ok().and_then(|mut s| s.take()) else {
                    continue;
                };
                match tokio::spawn(work(item)).await {
                    Ok(result) => done.push((index, result)),
                    Err(e) => error!("Job {} did not complete: {}", index, e),
                }
            }
            done
        });
    }

    let mut results: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(done) => {
                for (index, result) in done {
                    results[index] = Some(result);
                }
            }
            Err(e) => error!("Worker did not complete: {}", e),
        }
    }
    results
}
