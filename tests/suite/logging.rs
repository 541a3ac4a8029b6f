//! Tracing output of the panic boundary

use vessel::prelude::*;

use crate::common::{boom, capture_logs};

#[test]
fn swallowed_callback_panics_are_logged() {
    let (logs, _guard) = capture_logs();

    let mapped = present(1).map(|_| -> i32 { panic!("boom-for-logs") });
    assert_eq!(mapped, absent());

    let contents = logs.contents();
    assert!(contents.contains("Callback panicked; degrading"), "{contents}");
    assert!(contents.contains("boom-for-logs"), "{contents}");
    assert!(contents.contains("DEBUG"), "{contents}");
}

#[test]
fn signals_are_logged_before_unwinding() {
    let (logs, _guard) = capture_logs();

    let result = std::panic::catch_unwind(|| absent::<u8>().expect("listener port"));
    assert!(result.is_err());

    let contents = logs.contents();
    assert!(contents.contains("Signalling: listener port"), "{contents}");
    assert!(contents.contains("expect-called-on-absent"), "{contents}");
}

#[tokio::test]
async fn pending_rejections_are_logged() {
    let (logs, _guard) = capture_logs();

    let pending: PendingOutcome<u8, String> = PendingOutcome::from_value_future(boom("socket reset"));
    assert!(pending.is_failure().await);

    let contents = logs.contents();
    assert!(contents.contains("Pending outcome rejected"), "{contents}");
    assert!(contents.contains("socket reset"), "{contents}");
}

#[test]
fn clean_runs_log_nothing() {
    let (logs, _guard) = capture_logs();

    let value = present(2).map(|n| n * 2).filter(|n| *n > 1).unwrap_or(0);
    assert_eq!(value, 4);
    assert_eq!(logs.contents(), "");
}
