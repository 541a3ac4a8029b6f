//! Optional behavior through the public surface

use std::cell::Cell;

use vessel::prelude::*;
use vessel::{ErrorKind, WrapperError};

#[test]
fn discriminant_predicates() {
    assert!(present(1).is_present());
    assert!(!present(1).is_absent());
    assert!(absent::<i32>().is_absent());
    assert!(!absent::<i32>().is_present());
}

#[test]
fn map_calls_the_callback_only_when_present() {
    let calls = Cell::new(0);
    let count = |n: i32| {
        calls.set(calls.get() + 1);
        n
    };

    let _ = absent::<i32>().map(count);
    assert_eq!(calls.get(), 0);
    let _ = present(1).map(count);
    assert_eq!(calls.get(), 1);
}

#[test]
fn xor_is_present_iff_exactly_one_side_is() {
    let cases = [
        (present(1), absent(), present(1)),
        (absent(), present(2), present(2)),
        (present(1), present(2), absent()),
        (absent(), absent(), absent()),
    ];
    for (left, right, expected) in cases {
        assert_eq!(left.xor(right), expected, "{left:?} xor {right:?}");
    }
}

#[test]
fn and_returns_the_right_side_when_left_is_present() {
    assert_eq!(present(2).and(present(3)), present(3));
    assert_eq!(absent::<i32>().and(present(3)), absent());
}

#[test]
fn take_extracts_once() {
    let mut slot = present("v");
    assert_eq!(slot.take(), present("v"));
    assert_eq!(slot, absent());
    assert_eq!(slot.take(), absent());
}

#[test]
fn filter_degrades_on_panic() {
    assert_eq!(present(11).filter(|n| *n > 0), present(11));
    assert_eq!(present(11).filter(|_| panic!("predicate")), absent());
}

#[test]
fn unwrap_on_absent_reports_its_kind() {
    let err: WrapperError = absent::<i32>().try_unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnwrapCalledOnAbsent);
    assert_eq!(err.message(), "`unwrap`: called on `Absent`");

    let payload = std::panic::catch_unwind(|| absent::<i32>().unwrap()).unwrap_err();
    let signalled = payload.downcast_ref::<WrapperError>().expect("structured payload");
    assert_eq!(signalled.kind(), ErrorKind::UnwrapCalledOnAbsent);
    assert_eq!(signalled.message(), "`unwrap`: called on `Absent`");
}

#[test]
fn signals_raised_inside_a_callback_keep_their_kind() {
    let err = success::<i32, String>(1)
        .map(|_| absent::<i32>().unwrap())
        .unwrap_err()
        .into_unexpected()
        .expect("unexpected failure");
    let kinds: Vec<_> = err.chain().map(WrapperError::kind).collect();
    assert_eq!(
        kinds,
        vec![ErrorKind::PredicateException, ErrorKind::UnwrapCalledOnAbsent]
    );
}

#[test]
fn chained_pipeline_survives_a_panicking_stage() {
    let parsed = present("42")
        .map(str::parse::<i32>)
        .and_then(|parsed| parsed.ok().into())
        .map(|n: i32| n.checked_mul(1_000_000_000).expect("overflow"))
        .or(present(-1));
    assert_eq!(parsed, present(-1));
}

#[test]
fn conversion_to_outcome() {
    assert_eq!(present(1).ok_or("missing"), success::<i32, &str>(1));
    assert_eq!(absent::<i32>().ok_or_else(|| "missing"), failure::<i32, &str>("missing"));

    let converted: Outcome<i32, &str> = absent().ok_or_else(|| panic!("factory"));
    assert_eq!(
        converted.error().into_option().and_then(|err| err.unexpected_kind()),
        Some(ErrorKind::FromOptionalConversion)
    );
}

#[test]
fn transpose_round_trips_with_outcome() {
    let nested: Optional<Outcome<i32, &str>> = present(success(4));
    let flipped = nested.clone().transpose();
    assert_eq!(flipped, success(present(4)));
    assert_eq!(flipped.transpose(), nested);
}
