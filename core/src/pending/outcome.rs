use std::error::Error;
use std::fmt;
use std::future::{self, IntoFuture};

use vessel_types::{Cause, CheckedError, ErrorKind, WrapperError};
use vessel_utils::boundary::{self, Caught};

use super::{Deferred, PendingOptional, Slot, render, slot};
use crate::optional::Optional;
use crate::outcome::Outcome;

/// An [`Outcome`] that resolves later.
///
/// Awaiting never rejects. A backing future that panics, or that fails with
/// an error the caller did not model, resolves to an unexpected
/// `pending-rejection` failure carrying the original error as its cause.
///
/// Starts on first poll, like [`PendingOptional`]: only the closure given to
/// `from_fn` / `from_fn_async` runs inside the constructor.
pub struct PendingOutcome<T: 'static, E: 'static> {
    slot: Slot<Outcome<T, E>>,
}

fn rejection(caught: Caught) -> WrapperError {
    tracing::debug!(
        operation = caught.operation(),
        panic = %caught.panic(),
        "Pending outcome rejected"
    );
    WrapperError::caused_by(ErrorKind::PendingRejection, caught.into_cause())
}

fn callback_failure(caught: Caught) -> WrapperError {
    caught.into_error(ErrorKind::PredicateException)
}

impl<T: Clone + 'static, E: Clone + 'static> PendingOutcome<T, E> {
    pub fn new(settled: Outcome<T, E>) -> Self {
        Self::wrap(future::ready(settled))
    }

    pub fn success(value: T) -> Self {
        Self::new(Outcome::Success(value))
    }

    pub fn failure(err: E) -> Self {
        Self::new(Outcome::failure(err))
    }

    pub fn unexpected(err: WrapperError) -> Self {
        Self::new(Outcome::unexpected(err))
    }

    /// Await a future that yields a container.
    pub fn from_future(future: impl Deferred<Outcome<T, E>>) -> Self {
        Self::wrap(async move {
            boundary::catch_future("from_future", future)
                .await
                .unwrap_or_else(|caught| Outcome::unexpected(rejection(caught)))
        })
    }

    /// Await a future that yields a bare success value.
    pub fn from_value_future(future: impl Deferred<T>) -> Self {
        Self::wrap(async move {
            match boundary::catch_future("from_value_future", future).await {
                Ok(value) => Outcome::Success(value),
                Err(caught) => Outcome::unexpected(rejection(caught)),
            }
        })
    }

    /// Await a fallible future whose error is not part of the modeled
    /// domain. `Err(x)` resolves to `pending-rejection` with `x` as cause.
    pub fn from_try_future<X>(future: impl Deferred<Result<T, X>>) -> Self
    where
        X: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::wrap(async move {
            match boundary::catch_future("from_try_future", future).await {
                Ok(Ok(value)) => Outcome::Success(value),
                Ok(Err(err)) => {
                    let cause = Cause::from_boxed(err.into());
                    tracing::debug!(error = %cause, "Pending outcome rejected");
                    Outcome::unexpected(WrapperError::caused_by(ErrorKind::PendingRejection, cause))
                }
                Err(caught) => Outcome::unexpected(rejection(caught)),
            }
        })
    }

    /// Await a future whose `Err` is an expected failure.
    pub fn from_result_future(future: impl Deferred<Result<T, E>>) -> Self {
        Self::wrap(async move {
            match boundary::catch_future("from_result_future", future).await {
                Ok(result) => result.into(),
                Err(caught) => Outcome::unexpected(rejection(caught)),
            }
        })
    }

    /// Run `f` now. A panicking factory yields an unexpected failure.
    pub fn from_fn(f: impl FnOnce() -> Outcome<T, E>) -> Self {
        Self::new(
            boundary::catch("from_fn", f)
                .unwrap_or_else(|caught| Outcome::unexpected(callback_failure(caught))),
        )
    }

    /// Call `f` now and await the future it returns.
    pub fn from_fn_async<Fut>(f: impl FnOnce() -> Fut) -> Self
    where
        Fut: Deferred<Outcome<T, E>>,
    {
        match boundary::catch("from_fn_async", f) {
            Ok(future) => Self::from_future(future),
            Err(caught) => Self::unexpected(callback_failure(caught)),
        }
    }

    pub(crate) fn wrap(future: impl Future<Output = Outcome<T, E>> + 'static) -> Self {
        Self { slot: slot(future) }
    }

    fn chain<U, F, Fut>(&self, f: impl FnOnce(Outcome<T, E>) -> Fut + 'static) -> PendingOutcome<U, F>
    where
        U: Clone + 'static,
        F: Clone + 'static,
        Fut: Future<Output = Outcome<U, F>> + 'static,
    {
        let source = self.slot.clone();
        PendingOutcome::wrap(async move { f(source.await).await })
    }

    fn chain_ready<U, F>(
        &self,
        f: impl FnOnce(Outcome<T, E>) -> Outcome<U, F> + 'static,
    ) -> PendingOutcome<U, F>
    where
        U: Clone + 'static,
        F: Clone + 'static,
    {
        self.chain(move |settled| future::ready(f(settled)))
    }

    pub fn peek(&self) -> Option<Outcome<T, E>> {
        self.slot.peek().cloned()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.peek().is_some()
    }

    pub async fn is_success(&self) -> bool {
        self.slot.clone().await.is_success()
    }

    pub async fn is_failure(&self) -> bool {
        self.slot.clone().await.is_failure()
    }

    pub async fn is_success_and(&self, predicate: impl FnOnce(T) -> bool) -> bool {
        self.slot.clone().await.is_success_and(predicate)
    }

    pub async fn is_success_and_async<Fut>(&self, predicate: impl FnOnce(T) -> Fut) -> bool
    where
        Fut: IntoFuture<Output = bool>,
    {
        match self.slot.clone().await {
            Outcome::Success(value) => {
                boundary::catch_async("is_success_and_async", move || predicate(value))
                    .await
                    .unwrap_or(false)
            }
            Outcome::Failure(_) => false,
        }
    }

    pub async fn is_failure_and(&self, predicate: impl FnOnce(CheckedError<E>) -> bool) -> bool {
        self.slot.clone().await.is_failure_and(predicate)
    }

    pub async fn is_failure_and_async<Fut>(
        &self,
        predicate: impl FnOnce(CheckedError<E>) -> Fut,
    ) -> bool
    where
        Fut: IntoFuture<Output = bool>,
    {
        match self.slot.clone().await {
            Outcome::Success(_) => false,
            Outcome::Failure(err) => {
                boundary::catch_async("is_failure_and_async", move || predicate(err))
                    .await
                    .unwrap_or(false)
            }
        }
    }

    pub fn ok(&self) -> PendingOptional<T> {
        let source = self.slot.clone();
        PendingOptional::wrap(async move { source.await.ok() })
    }

    /// Resolves to the expected error only; unexpected failures are `Absent`.
    pub fn err(&self) -> PendingOptional<E> {
        let source = self.slot.clone();
        PendingOptional::wrap(async move { source.await.err() })
    }

    pub fn error(&self) -> PendingOptional<CheckedError<E>> {
        let source = self.slot.clone();
        PendingOptional::wrap(async move { source.await.error() })
    }

    pub async fn unwrap_or(&self, default: T) -> T {
        self.slot.clone().await.unwrap_or(default)
    }

    pub async fn unwrap_or_else(&self, f: impl FnOnce(CheckedError<E>) -> T) -> T {
        self.slot.clone().await.unwrap_or_else(f)
    }

    pub async fn unwrap_or_else_async<Fut>(&self, f: impl FnOnce(CheckedError<E>) -> Fut) -> T
    where
        Fut: IntoFuture<Output = T>,
    {
        match self.slot.clone().await {
            Outcome::Success(value) => value,
            Outcome::Failure(err) => f(err).await,
        }
    }

    pub async fn unwrap_or_default(&self) -> T
    where
        T: Default,
    {
        self.slot.clone().await.unwrap_or_default()
    }

    pub fn map<U: Clone + 'static>(&self, f: impl FnOnce(T) -> U + 'static) -> PendingOutcome<U, E> {
        self.chain_ready(move |settled| settled.map(f))
    }

    /// A panic from `f` or its future yields an unexpected failure.
    pub fn map_async<U, Fut>(&self, f: impl FnOnce(T) -> Fut + 'static) -> PendingOutcome<U, E>
    where
        U: Clone + 'static,
        Fut: Deferred<U>,
    {
        self.chain(move |settled| async move {
            match settled {
                Outcome::Success(value) => {
                    match boundary::catch_async("map_async", move || f(value)).await {
                        Ok(mapped) => Outcome::Success(mapped),
                        Err(caught) => Outcome::unexpected(callback_failure(caught)),
                    }
                }
                Outcome::Failure(err) => Outcome::Failure(err),
            }
        })
    }

    pub fn map_err<F: Clone + 'static>(
        &self,
        f: impl FnOnce(E) -> F + 'static,
    ) -> PendingOutcome<T, F> {
        self.chain_ready(move |settled| settled.map_err(f))
    }

    /// Only expected errors reach `f`.
    pub fn map_err_async<F, Fut>(&self, f: impl FnOnce(E) -> Fut + 'static) -> PendingOutcome<T, F>
    where
        F: Clone + 'static,
        Fut: Deferred<F>,
    {
        self.chain(move |settled| async move {
            match settled {
                Outcome::Success(value) => Outcome::Success(value),
                Outcome::Failure(CheckedError::Expected(err)) => {
                    match boundary::catch_async("map_err_async", move || f(err)).await {
                        Ok(mapped) => Outcome::failure(mapped),
                        Err(caught) => Outcome::unexpected(callback_failure(caught)),
                    }
                }
                Outcome::Failure(CheckedError::Unexpected(err)) => Outcome::unexpected(err),
            }
        })
    }

    pub async fn map_or<U>(&self, default: U, f: impl FnOnce(T) -> U) -> U {
        self.slot.clone().await.map_or(default, f)
    }

    pub async fn map_or_else<U>(
        &self,
        default: impl FnOnce(CheckedError<E>) -> U,
        f: impl FnOnce(T) -> U,
    ) -> Result<U, WrapperError> {
        self.slot.clone().await.map_or_else(default, f)
    }

    pub async fn map_or_async<U, Fut>(&self, default: U, f: impl FnOnce(T) -> Fut) -> U
    where
        Fut: IntoFuture<Output = U>,
    {
        match self.slot.clone().await {
            Outcome::Success(value) => boundary::catch_async("map_or_async", move || f(value))
                .await
                .unwrap_or(default),
            Outcome::Failure(_) => default,
        }
    }

    /// When `f` or its future panics, `default` receives an unexpected
    /// failure describing the panic. A panic from `default` or its future is
    /// returned as a `predicate-exception` error.
    pub async fn map_or_else_async<U, DefaultFut, MapFut>(
        &self,
        default: impl FnOnce(CheckedError<E>) -> DefaultFut,
        f: impl FnOnce(T) -> MapFut,
    ) -> Result<U, WrapperError>
    where
        DefaultFut: IntoFuture<Output = U>,
        MapFut: IntoFuture<Output = U>,
    {
        let err = match self.slot.clone().await {
            Outcome::Success(value) => {
                match boundary::catch_async("map_or_else_async", move || f(value)).await {
                    Ok(mapped) => return Ok(mapped),
                    Err(caught) => CheckedError::Unexpected(callback_failure(caught)),
                }
            }
            Outcome::Failure(err) => err,
        };
        boundary::catch_async("map_or_else_async", move || default(err))
            .await
            .map_err(callback_failure)
    }

    pub fn and<U: Clone + 'static>(&self, other: &PendingOutcome<U, E>) -> PendingOutcome<U, E> {
        let other = other.clone();
        self.chain(move |settled| async move {
            match settled {
                Outcome::Success(_) => other.await,
                Outcome::Failure(err) => Outcome::Failure(err),
            }
        })
    }

    pub fn and_then<U: Clone + 'static>(
        &self,
        f: impl FnOnce(T) -> Outcome<U, E> + 'static,
    ) -> PendingOutcome<U, E> {
        self.chain_ready(move |settled| settled.and_then(f))
    }

    /// `f` may return another pending outcome. A panic from `f` or its future
    /// yields an unexpected failure.
    pub fn and_then_async<U, Fut>(&self, f: impl FnOnce(T) -> Fut + 'static) -> PendingOutcome<U, E>
    where
        U: Clone + 'static,
        Fut: Deferred<Outcome<U, E>>,
    {
        self.chain(move |settled| async move {
            match settled {
                Outcome::Success(value) => boundary::catch_async("and_then_async", move || f(value))
                    .await
                    .unwrap_or_else(|caught| Outcome::unexpected(callback_failure(caught))),
                Outcome::Failure(err) => Outcome::Failure(err),
            }
        })
    }

    pub fn or<F: Clone + 'static>(&self, other: &PendingOutcome<T, F>) -> PendingOutcome<T, F> {
        let other = other.clone();
        self.chain(move |settled| async move {
            match settled {
                Outcome::Success(value) => Outcome::Success(value),
                Outcome::Failure(_) => other.await,
            }
        })
    }

    pub fn or_else<F: Clone + 'static>(
        &self,
        f: impl FnOnce(E) -> Outcome<T, F> + 'static,
    ) -> PendingOutcome<T, F> {
        self.chain_ready(move |settled| settled.or_else(f))
    }

    /// Only expected errors reach `f`.
    pub fn or_else_async<F, Fut>(&self, f: impl FnOnce(E) -> Fut + 'static) -> PendingOutcome<T, F>
    where
        F: Clone + 'static,
        Fut: Deferred<Outcome<T, F>>,
    {
        self.chain(move |settled| async move {
            match settled {
                Outcome::Success(value) => Outcome::Success(value),
                Outcome::Failure(CheckedError::Expected(err)) => {
                    boundary::catch_async("or_else_async", move || f(err))
                        .await
                        .unwrap_or_else(|caught| Outcome::unexpected(callback_failure(caught)))
                }
                Outcome::Failure(CheckedError::Unexpected(err)) => Outcome::unexpected(err),
            }
        })
    }

    pub fn inspect(&self, f: impl FnOnce(&T) + 'static) -> Self {
        self.chain_ready(move |settled| settled.inspect(f))
    }

    pub fn inspect_async<Fut>(&self, f: impl FnOnce(T) -> Fut + 'static) -> Self
    where
        Fut: IntoFuture + 'static,
        Fut::IntoFuture: 'static,
    {
        self.chain(move |settled| async move {
            if let Outcome::Success(value) = &settled {
                let copy = value.clone();
                let _ = boundary::catch_async("inspect_async", move || f(copy)).await;
            }
            settled
        })
    }

    pub fn inspect_err(&self, f: impl FnOnce(&E) + 'static) -> Self {
        self.chain_ready(move |settled| settled.inspect_err(f))
    }

    /// Await a side effect on a clone of an expected error. Unexpected
    /// failures skip `f`; its panics are discarded.
    pub fn inspect_err_async<Fut>(&self, f: impl FnOnce(E) -> Fut + 'static) -> Self
    where
        Fut: IntoFuture + 'static,
        Fut::IntoFuture: 'static,
    {
        self.chain(move |settled| async move {
            if let Outcome::Failure(CheckedError::Expected(err)) = &settled {
                let copy = err.clone();
                let _ = boundary::catch_async("inspect_err_async", move || f(copy)).await;
            }
            settled
        })
    }

    pub fn tap(&self, f: impl FnOnce(&Outcome<T, E>) + 'static) -> Self {
        self.chain_ready(move |settled| settled.tap(f))
    }

    /// Await a side effect on a clone of the whole resolution. Its panics are
    /// discarded.
    pub fn tap_async<Fut>(&self, f: impl FnOnce(Outcome<T, E>) -> Fut + 'static) -> Self
    where
        Fut: IntoFuture + 'static,
        Fut::IntoFuture: 'static,
    {
        self.chain(move |settled| async move {
            let copy = settled.clone();
            let _ = boundary::catch_async("tap_async", move || f(copy)).await;
            settled
        })
    }

    pub async fn match_with<U>(
        &self,
        on_success: impl FnOnce(T) -> U,
        on_failure: impl FnOnce(CheckedError<E>) -> U,
    ) -> Result<U, WrapperError> {
        self.slot.clone().await.match_with(on_success, on_failure)
    }

    pub async fn match_with_async<U, SuccessFut, FailureFut>(
        &self,
        on_success: impl FnOnce(T) -> SuccessFut,
        on_failure: impl FnOnce(CheckedError<E>) -> FailureFut,
    ) -> Result<U, WrapperError>
    where
        SuccessFut: IntoFuture<Output = U>,
        FailureFut: IntoFuture<Output = U>,
    {
        let result = match self.slot.clone().await {
            Outcome::Success(value) => {
                boundary::catch_async("match_with_async", move || on_success(value)).await
            }
            Outcome::Failure(err) => {
                boundary::catch_async("match_with_async", move || on_failure(err)).await
            }
        };
        result.map_err(callback_failure)
    }

    /// Wait for every handle. Resolves to the first failure in completion
    /// order.
    pub fn all(handles: impl IntoIterator<Item = Self>) -> PendingOutcome<Vec<T>, E> {
        let handles: Vec<_> = handles.into_iter().collect();
        PendingOutcome::wrap(async move {
            let joined = futures_util::future::try_join_all(
                handles
                    .into_iter()
                    .map(|handle| async move { handle.await.into_result() }),
            )
            .await;
            Outcome::from_checked(joined)
        })
    }
}

impl<T: Clone + 'static, E: Clone + fmt::Debug + 'static> PendingOutcome<T, E> {
    pub async fn unwrap(&self) -> T {
        self.slot.clone().await.unwrap()
    }

    pub async fn try_unwrap(&self) -> Result<T, WrapperError> {
        self.slot.clone().await.try_unwrap()
    }

    pub async fn expect(&self, message: &str) -> T {
        match self.try_expect(message).await {
            Ok(value) => value,
            Err(err) => boundary::signal(err),
        }
    }

    pub async fn try_expect(&self, message: &str) -> Result<T, WrapperError> {
        self.slot.clone().await.try_expect(message)
    }
}

impl<T: Clone + fmt::Debug + 'static, E: Clone + 'static> PendingOutcome<T, E> {
    pub async fn unwrap_err(&self) -> CheckedError<E> {
        self.slot.clone().await.unwrap_err()
    }

    pub async fn try_unwrap_err(&self) -> Result<CheckedError<E>, WrapperError> {
        self.slot.clone().await.try_unwrap_err()
    }

    pub async fn expect_err(&self, message: &str) -> CheckedError<E> {
        match self.try_expect_err(message).await {
            Ok(err) => err,
            Err(err) => boundary::signal(err),
        }
    }

    pub async fn try_expect_err(&self, message: &str) -> Result<CheckedError<E>, WrapperError> {
        self.slot.clone().await.try_expect_err(message)
    }
}

impl<T: Clone + 'static, E: Clone + 'static> PendingOutcome<Outcome<T, E>, E> {
    pub fn flatten(&self) -> PendingOutcome<T, E> {
        self.chain_ready(Outcome::flatten)
    }
}

impl<T: Clone + 'static, E: Clone + 'static> PendingOutcome<Optional<T>, E> {
    pub fn transpose(&self) -> PendingOptional<Outcome<T, E>> {
        let source = self.slot.clone();
        PendingOptional::wrap(async move { source.await.transpose() })
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Clone for PendingOutcome<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> From<Outcome<T, E>> for PendingOutcome<T, E> {
    fn from(settled: Outcome<T, E>) -> Self {
        Self::new(settled)
    }
}

impl<T: Clone + 'static, E: Clone + 'static> IntoFuture for PendingOutcome<T, E> {
    type Output = Outcome<T, E>;
    type IntoFuture = Slot<Outcome<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.slot
    }
}

impl<T: Clone + 'static, E: Clone + 'static> IntoFuture for &PendingOutcome<T, E> {
    type Output = Outcome<T, E>;
    type IntoFuture = Slot<Outcome<T, E>>;

    fn into_future(self) -> Self::IntoFuture {
        self.slot.clone()
    }
}

impl<T, E> fmt::Display for PendingOutcome<T, E>
where
    T: Clone + fmt::Display + 'static,
    E: Clone + fmt::Display + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, "PendingOutcome", &self.slot)
    }
}

impl<T, E> fmt::Debug for PendingOutcome<T, E>
where
    T: Clone + fmt::Debug + 'static,
    E: Clone + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOutcome")
            .field("settled", &self.peek())
            .finish()
    }
}
