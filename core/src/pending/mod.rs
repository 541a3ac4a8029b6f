//! Pending containers: an [`Optional`] or [`Outcome`] that is not resolved
//! yet.
//!
//! Each handle wraps a memoized, single-threaded future. The work behind it
//! runs at most once; every clone of the handle, and every container derived
//! from it, observes the same resolution. Awaiting a handle never panics:
//! a panic while polling resolves to `Absent` (optional) or to an unexpected
//! `pending-rejection` failure (outcome).
//!
//! Nothing runs until a handle is first polled. Factory closures passed to
//! `from_fn` / `from_fn_async` are the exception: they are called at
//! construction.
//!
//! Combinators come in pairs. The plain form takes a synchronous callback,
//! the `_async` form takes a callback returning anything [`IntoFuture`],
//! including another pending handle.
//!
//! [`Optional`]: crate::Optional
//! [`Outcome`]: crate::Outcome

use std::fmt;
use std::future::IntoFuture;

use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Shared};
use vessel_types::{PENDING_PLACEHOLDER, write_variant};

mod combine;
mod optional;
mod outcome;

pub use combine::{Combine, combine};
pub use optional::PendingOptional;
pub use outcome::PendingOutcome;

/// Anything a pending combinator can await: an [`IntoFuture`] whose future
/// owns its data.
pub trait Deferred<T>: IntoFuture<Output = T, IntoFuture: 'static> + 'static {}

impl<T, F> Deferred<T> for F
where
    F: IntoFuture<Output = T> + 'static,
    F::IntoFuture: 'static,
{
}

type Slot<T> = Shared<LocalBoxFuture<'static, T>>;

fn slot<T: Clone + 'static>(future: impl Future<Output = T> + 'static) -> Slot<T> {
    future.boxed_local().shared()
}

/// `Name { <settled> }` once resolved, `Name { <pending> }` before.
fn render<T: fmt::Display + Clone>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    slot: &Slot<T>,
) -> fmt::Result {
    match slot.peek() {
        Some(settled) => write_variant(f, name, settled),
        None => write_variant(f, name, &PENDING_PLACEHOLDER),
    }
}
