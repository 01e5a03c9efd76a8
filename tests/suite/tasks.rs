//! Async boundary tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use bulwark_core::task::{catching_future, run_all_catching_tasks, spawn_catching_task};
use bulwark_core::{FaultKind, assert, val};
use tokio::sync::oneshot;
use tokio::time::sleep;

use crate::common::init_tracing;

#[tokio::test]
async fn guard_inside_future_is_caught() {
    let fault = catching_future(async {
        let parsed: u16 = val("70000".parse::<u16>());
        parsed
    })
    .await
    .unwrap_err();
    assert!(matches!(fault.kind(), FaultKind::Error(_)));
    assert!(fault.location().unwrap().file().ends_with("tasks.rs"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn task_fan_out_joins_all_and_keeps_every_fault() {
    init_tracing();
    let completed = Arc::new(AtomicUsize::new(0));
    let started = Instant::now();

    let futures = (0..4_u64).map(|i| {
        let completed = Arc::clone(&completed);
        async move {
            sleep(Duration::from_millis(10 * i)).await;
            completed.fetch_add(1, Ordering::SeqCst);
            assert(i % 2 == 0, format!("task {i} rejected"));
        }
    });
    let faults = run_all_catching_tasks(futures).await.unwrap_err();

    assert!(started.elapsed() >= Duration::from_millis(30));
    assert_eq!(completed.load(Ordering::SeqCst), 4);
    assert_eq!(faults.indices().collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(faults.to_string(), "task 1 rejected\ntask 3 rejected");
}

#[tokio::test]
async fn detached_task_fault_is_absorbed() {
    init_tracing();
    let (done_tx, done_rx) = oneshot::channel();
    spawn_catching_task(async move {
        let _ = done_tx.send(());
        assert(false, "background refresh failed");
    });
    done_rx.await.unwrap();

    // The runtime keeps serving work after the detached fault.
    let value = catching_future(async { 5 }).await.unwrap();
    assert_eq!(value, 5);
}
