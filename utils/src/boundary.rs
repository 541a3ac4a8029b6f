//! Panic boundary shared by every callback-taking combinator.
//!
//! Safe combinators never let a callback panic cross their boundary. They run
//! the callback through [`catch`] (or [`catch_future`] / [`catch_async`] for
//! futures) and degrade to the empty or unexpected variant on `Err`. The
//! signalling family (`unwrap`, `expect`, ...) goes through [`signal`]
//! instead, so the policy for both tiers lives in this one module.

use std::cell::Cell;
use std::future::{Future, IntoFuture, poll_fn};
use std::panic::{self, AssertUnwindSafe};
use std::pin::pin;
use std::sync::Once;
use std::task::Poll;
use std::thread;

use vessel_types::{Cause, ErrorKind, PanicError, WrapperError};

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

static QUIET_HOOK: Once = Once::new();

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// A callback panic intercepted by the boundary.
///
/// A panic raised by [`signal`] keeps its [`WrapperError`], so the kind
/// survives into the chain of whatever error the boundary builds from it.
#[derive(Debug, Clone)]
pub struct Caught {
    operation: &'static str,
    panic: PanicError,
    signalled: Option<WrapperError>,
}

impl Caught {
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    #[must_use]
    pub fn panic(&self) -> &PanicError {
        &self.panic
    }

    /// The error carried by a signalling panic, if that is what was caught.
    #[must_use]
    pub fn signalled(&self) -> Option<&WrapperError> {
        self.signalled.as_ref()
    }

    #[must_use]
    pub fn into_cause(self) -> Cause {
        match self.signalled {
            Some(err) => Cause::from(err),
            None => Cause::from(self.panic),
        }
    }

    /// Wrap as `` `<operation>`: callback panicked: <payload> ``.
    #[must_use]
    pub fn into_error(self, kind: ErrorKind) -> WrapperError {
        let message = format!("`{}`: callback panicked", self.operation);
        WrapperError::with_message_and_cause(kind, message, self.into_cause())
    }
}

/// Run `f`, converting a panic into [`Caught`].
pub fn catch<R>(operation: &'static str, f: impl FnOnce() -> R) -> Result<R, Caught> {
    let result = {
        let _depth = DepthGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(f))
    };

    result.map_err(|payload| {
        let caught = Caught {
            operation,
            panic: PanicError::from_payload(&*payload),
            signalled: payload.downcast_ref::<WrapperError>().cloned(),
        };
        if vessel_config::current().boundary.log_caught_panics {
            tracing::debug!(operation, panic = %caught.panic, "Callback panicked; degrading");
        }
        caught
    })
}

/// Drive `future` to completion, converting a panic during any poll into
/// [`Caught`]. The future is not polled again after it panics. A panicking
/// `into_future` is caught the same way.
pub async fn catch_future<F: IntoFuture>(
    operation: &'static str,
    future: F,
) -> Result<F::Output, Caught> {
    let mut future = pin!(catch(operation, || future.into_future())?);
    poll_fn(|cx| match catch(operation, || future.as_mut().poll(cx)) {
        Ok(Poll::Ready(output)) => Poll::Ready(Ok(output)),
        Ok(Poll::Pending) => Poll::Pending,
        Err(caught) => Poll::Ready(Err(caught)),
    })
    .await
}

/// Call a future-returning callback and await its result, catching a panic at
/// either step.
pub async fn catch_async<Fut: IntoFuture>(
    operation: &'static str,
    f: impl FnOnce() -> Fut,
) -> Result<Fut::Output, Caught> {
    let future = catch(operation, f)?;
    catch_future(operation, future).await
}

/// Raise `err` as a panic whose payload is the [`WrapperError`] itself.
/// Used by the `unwrap`/`expect` family only.
#[track_caller]
pub fn signal(err: WrapperError) -> ! {
    tracing::debug!(kind = %err.kind(), "Signalling: {err}");
    panic::panic_any(err)
}

/// Whether the current thread is running a callback behind the boundary.
#[must_use]
pub fn is_inside_boundary() -> bool {
    DEPTH.with(Cell::get) > 0
}

/// Install a panic hook that stays silent for panics the boundary will catch,
/// when `boundary.silence_caught_panics` is enabled, and that prints the
/// message of an uncaught [`signal`]. Other panics reach the previously
/// installed hook unchanged. Idempotent.
pub fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if is_inside_boundary() && vessel_config::current().boundary.silence_caught_panics {
                return;
            }
            if let Some(err) = info.payload().downcast_ref::<WrapperError>() {
                let current = thread::current();
                let location = info
                    .location()
                    .map_or_else(String::new, |location| format!(" at {location}"));
                eprintln!(
                    "thread '{}' panicked{location}:\n{err}",
                    current.name().unwrap_or("<unnamed>")
                );
                return;
            }
            previous(info);
        }));
        tracing::debug!("Quiet panic hook installed");
    });
}
