//! Tracing output of boundaries

use bulwark_core::{assert, mute, run_catching};
use tracing::dispatcher;

use crate::common::CapturedLogs;

#[test]
fn mute_reports_the_swallowed_fault() {
    let logs = CapturedLogs::default();
    dispatcher::with_default(&logs.dispatch(), || {
        mute(|| assert(false, "cache warmup failed"));
    });

    let output = logs.contents();
    assert!(output.contains("Muted fault"), "{output}");
    assert!(output.contains("cache warmup failed"), "{output}");
}

#[test]
fn run_catching_emits_nothing() {
    let logs = CapturedLogs::default();
    dispatcher::with_default(&logs.dispatch(), || {
        let fault = run_catching(|| assert(false, "returned, not logged")).unwrap_err();
        assert_eq!(fault.to_string(), "returned, not logged");
    });

    assert!(logs.contents().is_empty());
}
