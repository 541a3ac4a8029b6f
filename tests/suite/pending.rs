//! Pending containers driven on a real runtime

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use vessel::prelude::*;
use vessel::{ErrorKind, is_pending_optional};

use crate::common::{boom, later};

#[tokio::test]
async fn rejecting_futures_resolve_to_the_empty_state() {
    let optional: PendingOptional<u16> =
        PendingOptional::from_try_future(later(Err::<u16, _>("no route")));
    assert_eq!(optional.await, absent());

    let refused = later(Err::<u16, _>(io::Error::other("no route")));
    let outcome: PendingOutcome<u16, String> = PendingOutcome::from_try_future(refused);
    let err = outcome.unwrap_err().await;
    assert_eq!(err.unexpected_kind(), Some(ErrorKind::PendingRejection));
    assert_eq!(err.to_string(), "pending future rejected: no route");
}

#[tokio::test]
async fn panicking_futures_resolve_to_the_empty_state() {
    let optional: PendingOptional<u16> = PendingOptional::from_value_future(boom("poll"));
    assert!(optional.is_absent().await);

    let outcome: PendingOutcome<u16, String> = PendingOutcome::from_value_future(boom("poll"));
    assert_eq!(
        outcome.error().await.into_option().and_then(|err| err.unexpected_kind()),
        Some(ErrorKind::PendingRejection)
    );
}

#[tokio::test]
async fn work_runs_once_for_every_consumer() {
    let fetches = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fetches);
    let user = PendingOutcome::<String, String>::from_fn_async(move || {
        counter.set(counter.get() + 1);
        async { success(later("ada".to_string()).await) }
    });

    let greeting = user.map(|name| format!("hello {name}"));
    let length = user.map(|name| name.len());
    let upper = user.map_async(|name| later(name.to_uppercase()));

    assert_eq!(greeting.await, success("hello ada".to_string()));
    assert_eq!(length.await, success(3));
    assert_eq!(upper.await, success("ADA".to_string()));
    assert_eq!(fetches.get(), 1);
}

#[tokio::test]
async fn chained_handles_resolve_in_dependency_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let first = Rc::clone(&order);
    let second = Rc::clone(&order);

    let pipeline = PendingOptional::from_value_future(later(1))
        .inspect(move |n| first.borrow_mut().push(*n))
        .map_async(|n| later(n + 1))
        .inspect(move |n| second.borrow_mut().push(*n));

    assert_eq!(pipeline.await, present(2));
    assert_eq!(*order.borrow(), vec![1, 2]);
}

#[tokio::test]
async fn async_callbacks_can_return_pending_handles() {
    let base = PendingOptional::present(2);
    let doubled = base.and_then_async(|n| PendingOptional::from_value_future(later(n * 2)));
    assert_eq!(doubled.await, present(4));

    let outcome = PendingOutcome::<i32, String>::success(3);
    let chained = outcome.and_then_async(|n| PendingOutcome::from_value_future(later(n + 1)));
    assert_eq!(chained.await, success(4));
}

#[tokio::test]
async fn swap_operations_return_the_prior_handle() {
    let mut slot = PendingOptional::from_value_future(later("old"));
    let previous = slot.replace("new");
    assert_eq!(previous.await, present("old"));

    let mut taken_from = slot.clone();
    let taken = taken_from.take();
    assert_eq!(taken.await, present("new"));
    assert_eq!(taken_from.await, absent());
    assert_eq!(slot.await, present("new"));
}

#[tokio::test]
async fn take_if_leaves_state_alone_on_false_or_panic() {
    let mut slot = PendingOptional::present(3);
    assert_eq!(slot.take_if(|n| *n > 5).await, absent());
    assert_eq!(slot.take_if(|_| panic!("predicate")).await, absent());
    assert_eq!((&slot).await, present(3));

    assert_eq!(slot.take_if(|n| *n == 3).await, present(3));
    assert_eq!(slot.await, absent());
}

#[tokio::test]
async fn settled_containers_lift_into_pending_ones() {
    let pending = present(5).to_pending();
    assert!(is_pending_optional::<i32>(&pending));
    assert_eq!(pending.await, present(5));

    let resolved = present(later(6)).resolve_payload();
    assert_eq!(resolved.await, present(6));

    let lifted = success::<_, String>(later(7)).resolve_payload();
    assert_eq!(lifted.await, success(7));
}

#[tokio::test]
async fn peek_reports_resolution() {
    let pending = PendingOutcome::<i32, String>::from_value_future(later(1));
    assert!(!pending.is_resolved());
    assert_eq!(pending.peek(), None);

    assert!(pending.is_success().await);
    assert!(pending.is_resolved());
    assert_eq!(pending.peek(), Some(success(1)));
}
