//! Outcome behavior through the public surface

use std::cell::Cell;

use vessel::prelude::*;
use vessel::{ErrorKind, PanicError, WrapperError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookup {
    NotFound(String),
}

fn find(key: &str) -> Outcome<u32, Lookup> {
    match key {
        "alpha" => success(1),
        "beta" => success(2),
        other => failure(Lookup::NotFound(other.to_string())),
    }
}

#[test]
fn map_err_never_sees_success_or_unexpected() {
    let calls = Cell::new(0);
    let count = |err: Lookup| {
        calls.set(calls.get() + 1);
        err
    };

    let _ = success::<i32, Lookup>(5).map_err(count);
    let unexpected: Outcome<i32, Lookup> =
        Outcome::unexpected(WrapperError::new(ErrorKind::Unexpected));
    let _ = unexpected.map_err(count);
    assert_eq!(calls.get(), 0);

    let _ = failure::<i32, Lookup>(Lookup::NotFound("x".into())).map_err(count);
    assert_eq!(calls.get(), 1);
}

#[test]
fn panicking_map_keeps_the_payload_as_cause() {
    let outcome = find("alpha").map(|_| -> u32 { panic!("division by zero") });

    let err = outcome.unwrap_err().into_unexpected().expect("unexpected arm");
    assert_eq!(err.kind(), ErrorKind::PredicateException);
    let panic = err
        .root_cause()
        .and_then(|cause| cause.downcast_ref::<PanicError>())
        .expect("panic cause");
    assert_eq!(panic.message(), "division by zero");
}

#[test]
fn lookups_chain_and_recover() {
    let total = find("alpha").and_then(|a| find("beta").map(|b| a + b));
    assert_eq!(total, success(3));

    let missing = find("alpha").and_then(|_| find("gamma"));
    assert_eq!(missing.clone().err(), present(Lookup::NotFound("gamma".into())));

    let recovered = missing.or_else(|Lookup::NotFound(_)| success::<u32, Lookup>(0));
    assert_eq!(recovered, success(0));
}

#[test]
fn handle_dispatches_on_the_failure_arm() {
    let describe = |outcome: Outcome<u32, Lookup>| {
        outcome
            .match_with(
                |value| format!("found {value}"),
                |err| {
                    err.handle(
                        |wrapped| format!("broken: {}", wrapped.kind()),
                        |Lookup::NotFound(key)| format!("no {key}"),
                    )
                },
            )
            .expect("arms do not panic")
    };

    assert_eq!(describe(find("beta")), "found 2");
    assert_eq!(describe(find("zeta")), "no zeta");
    assert_eq!(
        describe(Outcome::unexpected(WrapperError::new(ErrorKind::PendingRejection))),
        "broken: pending-rejection"
    );
}

#[test]
fn match_with_reports_a_panicking_arm() {
    let err = find("alpha")
        .match_with(|_| -> u32 { panic!("arm") }, |_| 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PredicateException);
    assert_eq!(err.message(), "`match_with`: callback panicked: arm");
}

#[test]
fn attempt_lifts_std_results() {
    let parsed: Outcome<u8, String> =
        Outcome::attempt(|| "300".parse::<u8>().map_err(|err| err.to_string()));
    assert!(parsed.is_failure_and(|err| err.is_expected()));

    let result: Result<u8, CheckedError<String>> = success::<u8, String>(3).into();
    assert_eq!(result, Ok(3));
}

#[test]
fn expect_signals_with_the_caller_message() {
    let payload = std::panic::catch_unwind(|| find("cfg").expect("config must load")).unwrap_err();
    let signalled = payload.downcast_ref::<WrapperError>().expect("structured payload");
    assert_eq!(signalled.kind(), ErrorKind::ExpectCalledOnFailure);
    assert_eq!(signalled.message(), "config must load: NotFound(\"cfg\")");
}
