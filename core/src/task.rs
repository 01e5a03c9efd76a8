//! Boundaries for futures, backed by the ambient tokio runtime.
//!
//! The spawning functions must be called from within a tokio runtime.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tokio::task::{JoinError, JoinHandle};

use bulwark_types::{Fault, FaultSet};

/// Await `future`, returning its output or the fault it raised while polled.
pub async fn catching_future<F: Future>(future: F) -> Result<F::Output, Fault> {
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(Fault::from_panic)
}

/// Spawn `future` as a detached task whose fault is absorbed.
///
/// Returns immediately; a fault is reported only as a `tracing` debug event.
pub fn spawn_catching_task<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(fault) = catching_future(future).await {
            tracing::debug!(
                fault = %fault,
                location = ?fault.location(),
                "Detached task faulted"
            );
        }
    });
}

/// Spawn every future as its own task and wait for all of them.
///
/// Same result shape as [`crate::run_all_catching`]: every fault, ordered by
/// launch index. A task cancelled by runtime shutdown is reported as a
/// `"task cancelled"` fault. If the returned future is dropped early the
/// remaining tasks keep running detached.
pub async fn run_all_catching_tasks<I, F>(futures: I) -> Result<(), FaultSet>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = ()> + Send + 'static,
{
    let handles: Vec<JoinHandle<()>> = futures.into_iter().map(tokio::spawn).collect();

    let mut faults = Vec::new();
    for (index, handle) in handles.into_iter().enumerate() {
        if let Err(err) = handle.await {
            faults.push((index, fault_from_join_error(err)));
        }
    }

    match FaultSet::from_indexed(faults) {
        Some(set) => Err(set),
        None => Ok(()),
    }
}

fn fault_from_join_error(err: JoinError) -> Fault {
    match err.try_into_panic() {
        Ok(payload) => Fault::from_panic(payload),
        Err(_) => Fault::message("task cancelled"),
    }
}
