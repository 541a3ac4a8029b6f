//! Fan-in over pending containers.
//!
//! [`combine`] drives every constituent concurrently and resolves to a tuple
//! in argument order. The first constituent to resolve empty (or failed)
//! ends the join; the others are dropped without being polled further.

use vessel_types::CheckedError;

use super::{PendingOptional, PendingOutcome};
use crate::outcome::Outcome;

/// A tuple of pending handles that can be joined into one.
pub trait Combine {
    type Combined;

    fn combine(self) -> Self::Combined;
}

/// Join a tuple of pending optionals (or of pending outcomes sharing an error
/// type).
///
/// ```
/// use vessel_core::{Optional, PendingOptional, combine};
///
/// # futures_util::FutureExt::now_or_never(async {
/// let joined = combine((PendingOptional::present(1), PendingOptional::present("one")));
/// assert_eq!(joined.await, Optional::Present((1, "one")));
/// # });
/// ```
pub fn combine<C: Combine>(parts: C) -> C::Combined {
    parts.combine()
}

#[derive(Debug)]
struct ShortCircuit;

async fn present_or_stop<T: Clone + 'static>(
    handle: PendingOptional<T>,
) -> Result<T, ShortCircuit> {
    handle.await.into_option().ok_or(ShortCircuit)
}

async fn success_or_stop<T: Clone + 'static, E: Clone + 'static>(
    handle: PendingOutcome<T, E>,
) -> Result<T, CheckedError<E>> {
    handle.await.into_result()
}

macro_rules! impl_combine {
    ($($name:ident: $ty:ident),+) => {
        impl<$($ty: Clone + 'static),+> Combine for ($(PendingOptional<$ty>,)+) {
            type Combined = PendingOptional<($($ty,)+)>;

            fn combine(self) -> Self::Combined {
                let ($($name,)+) = self;
                PendingOptional::wrap(async move {
                    futures_util::try_join!($(present_or_stop($name)),+).ok().into()
                })
            }
        }

        impl<$($ty: Clone + 'static,)+ E: Clone + 'static> Combine for ($(PendingOutcome<$ty, E>,)+) {
            type Combined = PendingOutcome<($($ty,)+), E>;

            fn combine(self) -> Self::Combined {
                let ($($name,)+) = self;
                PendingOutcome::wrap(async move {
                    Outcome::from_checked(futures_util::try_join!($(success_or_stop($name)),+))
                })
            }
        }
    };
}

impl_combine!(a: A, b: B);
impl_combine!(a: A, b: B, c: C);
impl_combine!(a: A, b: B, c: C, d: D);
impl_combine!(a: A, b: B, c: C, d: D, e: F);
