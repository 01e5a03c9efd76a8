//! Same-thread boundary and guard tests

use std::io;
use std::panic;

use bulwark_core::{
    BoxError, FaultKind, abort, assert, catching, ensure, mute, ok, run_catching, val,
};

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("ledger {0} is locked")]
struct LedgerLocked(u32);

fn open_ledger(id: u32) -> Result<u32, LedgerLocked> {
    if id == 0 { Err(LedgerLocked(id)) } else { Ok(id) }
}

#[test]
fn normal_completion_returns_ok() {
    assert!(run_catching(|| {}).is_ok());
}

#[test]
fn error_payload_unwraps_to_original() {
    let fault = run_catching(|| ok(Err(LedgerLocked(9)))).unwrap_err();
    assert!(fault.is_error());
    assert_eq!(fault.to_string(), "ledger 9 is locked");
    assert_eq!(fault.downcast_ref::<LedgerLocked>(), Some(&LedgerLocked(9)));

    let boxed: BoxError = fault.into_error();
    assert_eq!(boxed.downcast_ref::<LedgerLocked>(), Some(&LedgerLocked(9)));
}

#[test]
fn non_error_payload_formats_as_text() {
    let fault = run_catching(|| panic!("{} of {}", 3, 4)).unwrap_err();
    assert_eq!(fault.to_string(), "3 of 4");
    assert!(matches!(fault.kind(), FaultKind::Message(_)));
}

#[test]
fn assert_true_is_a_no_op() {
    assert!(run_catching(|| assert(true, LedgerLocked(1))).is_ok());
}

#[test]
fn assert_false_yields_its_payload() {
    let fault = run_catching(|| assert(false, LedgerLocked(2))).unwrap_err();
    assert_eq!(fault.downcast::<LedgerLocked>().unwrap(), LedgerLocked(2));
}

#[test]
fn guard_location_points_at_call_site() {
    let fault = run_catching(|| assert(false, "here")).unwrap_err();
    let location = fault.location().unwrap();
    assert!(location.file().ends_with("boundaries.rs"));
    assert_eq!(format!("{fault:#}"), format!("here\n\t{location}"));
    assert_eq!(fault.to_string(), "here");
}

#[test]
fn abort_deep_in_call_chain_surfaces_at_boundary() {
    fn load(id: u32) -> u32 {
        val(open_ledger(id)) * 10
    }
    fn total(ids: &[u32]) -> u32 {
        ids.iter().map(|id| load(*id)).sum()
    }

    assert_eq!(catching(|| total(&[1, 2])).unwrap(), 30);
    let fault = catching(|| total(&[1, 0])).unwrap_err();
    assert_eq!(fault.downcast_ref::<LedgerLocked>(), Some(&LedgerLocked(0)));
}

#[test]
fn anyhow_errors_are_accepted_by_guards() {
    let fault = run_catching(|| {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("upstream refused"));
        ok(result);
    })
    .unwrap_err();
    assert_eq!(fault.to_string(), "upstream refused");
}

#[test]
fn io_errors_keep_their_kind() {
    let fault = run_catching(|| {
        abort(io::Error::new(io::ErrorKind::NotFound, "missing"));
    })
    .unwrap_err();
    assert_eq!(
        fault.downcast_ref::<io::Error>().map(io::Error::kind),
        Some(io::ErrorKind::NotFound)
    );
}

#[test]
fn ensure_macro_formats_message() {
    let depth = 4;
    let fault = run_catching(|| ensure!(depth < 3, "depth {depth} exceeds 3")).unwrap_err();
    assert_eq!(fault.to_string(), "depth 4 exceeds 3");
    assert!(fault.location().is_some());
}

#[test]
fn mute_keeps_the_caller_running() {
    let mut steps = Vec::new();
    mute(|| {
        steps.push("before");
        assert(false, "stop");
        steps.push("after");
    });
    assert_eq!(steps, vec!["before"]);
}

#[test]
fn raw_io_error_panic_keeps_its_cause() {
    let fault = run_catching(|| {
        panic::panic_any(io::Error::new(io::ErrorKind::TimedOut, "peer silent"));
    })
    .unwrap_err();
    assert!(fault.is_error());
    let err = fault.downcast::<io::Error>().unwrap();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);
}
