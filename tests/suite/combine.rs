//! Fan-in across pending containers

use std::time::{Duration, Instant};

use vessel::prelude::*;

use crate::common::later;

async fn delayed<T>(millis: u64, value: T) -> T {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    value
}

#[tokio::test]
async fn combine_three_present_handles_in_argument_order() {
    let joined = combine((
        PendingOptional::from_value_future(delayed(20, "host")),
        PendingOptional::from_value_future(delayed(5, 443_u16)),
        PendingOptional::present(true),
    ));
    assert_eq!(joined.await, present(("host", 443, true)));
}

#[tokio::test]
async fn constituents_run_concurrently() {
    let started = Instant::now();
    let joined = combine((
        PendingOutcome::<u8, String>::from_value_future(delayed(60, 1)),
        PendingOutcome::<u8, String>::from_value_future(delayed(60, 2)),
        PendingOutcome::<u8, String>::from_value_future(delayed(60, 3)),
    ));
    assert_eq!(joined.await, success((1, 2, 3)));
    assert!(started.elapsed() < Duration::from_millis(170));
}

#[tokio::test]
async fn any_empty_constituent_empties_the_result() {
    let optional = combine((
        PendingOptional::present(1),
        PendingOptional::from_value_future(later(2)).filter(|n| *n > 5),
        PendingOptional::present(3),
    ));
    assert_eq!(optional.await, absent());

    let outcome = combine((
        PendingOutcome::<i32, &str>::success(1),
        PendingOutcome::<i32, &str>::from_result_future(later(Err("quota"))),
        PendingOutcome::success(3),
    ));
    assert_eq!(outcome.await, failure("quota"));
}

#[tokio::test]
async fn all_over_an_iterator() {
    let handles = (1..=4).map(|n| PendingOptional::from_value_future(delayed(5 * n, n)));
    assert_eq!(PendingOptional::all(handles).await, present(vec![1, 2, 3, 4]));

    let outcomes = vec![
        PendingOutcome::<u64, String>::success(1),
        PendingOutcome::failure("down".to_string()),
    ];
    assert_eq!(PendingOutcome::all(outcomes).await, failure("down".to_string()));
}
