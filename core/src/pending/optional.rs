use std::fmt;
use std::future::{self, IntoFuture};
use std::mem;

use vessel_types::{ErrorKind, WrapperError};
use vessel_utils::boundary;

use super::{Deferred, PendingOutcome, Slot, render, slot};
use crate::optional::Optional;
use crate::outcome::Outcome;

/// An [`Optional`] that resolves later.
///
/// Work starts on first poll. A future handed to a constructor, and every
/// container derived through a combinator, does nothing until some clone of
/// the handle is awaited. The one eager step is calling the closure given to
/// [`from_fn`](Self::from_fn) or [`from_fn_async`](Self::from_fn_async): it
/// runs inside the constructor, but the future it returns is still driven
/// lazily.
///
/// ```
/// use vessel_core::PendingOptional;
///
/// # futures_util::FutureExt::now_or_never(async {
/// let port = PendingOptional::present(8080).map(|port| port + 1);
/// assert_eq!(port.await.unwrap(), 8081);
/// # });
/// ```
pub struct PendingOptional<T: 'static> {
    slot: Slot<Optional<T>>,
}

impl<T: Clone + 'static> PendingOptional<T> {
    /// Wrap an already settled container.
    pub fn new(settled: Optional<T>) -> Self {
        Self::wrap(future::ready(settled))
    }

    pub fn present(value: T) -> Self {
        Self::new(Optional::Present(value))
    }

    pub fn absent() -> Self {
        Self::new(Optional::Absent)
    }

    /// Await a future that yields a container. A panic while polling resolves
    /// to `Absent`.
    pub fn from_future(future: impl Deferred<Optional<T>>) -> Self {
        Self::wrap(async move {
            boundary::catch_future("from_future", future)
                .await
                .unwrap_or_default()
        })
    }

    /// Await a future that yields a bare value. A panic while polling resolves
    /// to `Absent`.
    pub fn from_value_future(future: impl Deferred<T>) -> Self {
        Self::wrap(async move {
            boundary::catch_future("from_value_future", future)
                .await
                .ok()
                .into()
        })
    }

    /// Await a fallible future. `Err` and panics both resolve to `Absent`.
    pub fn from_try_future<X>(future: impl Deferred<Result<T, X>>) -> Self
    where
        X: fmt::Display,
    {
        Self::wrap(async move {
            match boundary::catch_future("from_try_future", future).await {
                Ok(Ok(value)) => Optional::Present(value),
                Ok(Err(err)) => {
                    tracing::debug!(error = %err, "Pending optional rejected; resolving to Absent");
                    Optional::Absent
                }
                Err(_) => Optional::Absent,
            }
        })
    }

    /// Run `f` now. A panicking factory yields `Absent`.
    pub fn from_fn(f: impl FnOnce() -> Optional<T>) -> Self {
        Self::new(boundary::catch("from_fn", f).unwrap_or_default())
    }

    /// Call `f` now and await the future it returns.
    pub fn from_fn_async<Fut>(f: impl FnOnce() -> Fut) -> Self
    where
        Fut: Deferred<Optional<T>>,
    {
        match boundary::catch("from_fn_async", f) {
            Ok(future) => Self::from_future(future),
            Err(_) => Self::absent(),
        }
    }

    pub(crate) fn wrap(future: impl Future<Output = Optional<T>> + 'static) -> Self {
        Self { slot: slot(future) }
    }

    /// Derive a container from this one's resolution.
    fn chain<U, Fut>(&self, f: impl FnOnce(Optional<T>) -> Fut + 'static) -> PendingOptional<U>
    where
        U: Clone + 'static,
        Fut: Future<Output = Optional<U>> + 'static,
    {
        let source = self.slot.clone();
        PendingOptional::wrap(async move { f(source.await).await })
    }

    fn chain_ready<U: Clone + 'static>(
        &self,
        f: impl FnOnce(Optional<T>) -> Optional<U> + 'static,
    ) -> PendingOptional<U> {
        self.chain(move |settled| future::ready(f(settled)))
    }

    /// The resolution, once some consumer has driven the future to completion.
    pub fn peek(&self) -> Option<Optional<T>> {
        self.slot.peek().cloned()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.peek().is_some()
    }

    pub async fn is_present(&self) -> bool {
        self.slot.clone().await.is_present()
    }

    pub async fn is_absent(&self) -> bool {
        self.slot.clone().await.is_absent()
    }

    pub async fn is_present_and(&self, predicate: impl FnOnce(T) -> bool) -> bool {
        self.slot.clone().await.is_present_and(predicate)
    }

    /// A predicate that panics, or whose future panics, counts as `false`.
    pub async fn is_present_and_async<Fut>(&self, predicate: impl FnOnce(T) -> Fut) -> bool
    where
        Fut: IntoFuture<Output = bool>,
    {
        match self.slot.clone().await {
            Optional::Present(value) => {
                boundary::catch_async("is_present_and_async", move || predicate(value))
                    .await
                    .unwrap_or(false)
            }
            Optional::Absent => false,
        }
    }

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

    pub async fn unwrap_or(&self, default: T) -> T {
        self.slot.clone().await.unwrap_or(default)
    }

    pub async fn unwrap_or_else(&self, f: impl FnOnce() -> T) -> T {
        self.slot.clone().await.unwrap_or_else(f)
    }

    pub async fn unwrap_or_else_async<Fut>(&self, f: impl FnOnce() -> Fut) -> T
    where
        Fut: IntoFuture<Output = T>,
    {
        match self.slot.clone().await {
            Optional::Present(value) => value,
            Optional::Absent => f().await,
        }
    }

    pub async fn unwrap_or_default(&self) -> T
    where
        T: Default,
    {
        self.slot.clone().await.unwrap_or_default()
    }

    pub fn map<U: Clone + 'static>(&self, f: impl FnOnce(T) -> U + 'static) -> PendingOptional<U> {
        self.chain_ready(move |settled| settled.map(f))
    }

    /// A panic from `f` or from the future it returns yields `Absent`.
    pub fn map_async<U, Fut>(&self, f: impl FnOnce(T) -> Fut + 'static) -> PendingOptional<U>
    where
        U: Clone + 'static,
        Fut: Deferred<U>,
    {
        self.chain(move |settled| async move {
            match settled {
                Optional::Present(value) => boundary::catch_async("map_async", move || f(value))
                    .await
                    .ok()
                    .into(),
                Optional::Absent => Optional::Absent,
            }
        })
    }

    pub async fn map_or<U>(&self, default: U, f: impl FnOnce(T) -> U) -> U {
        self.slot.clone().await.map_or(default, f)
    }

    pub async fn map_or_else<U>(
        &self,
        default: impl FnOnce() -> U,
        f: impl FnOnce(T) -> U,
    ) -> Result<U, WrapperError> {
        self.slot.clone().await.map_or_else(default, f)
    }

    pub async fn map_or_async<U, Fut>(&self, default: U, f: impl FnOnce(T) -> Fut) -> U
    where
        Fut: IntoFuture<Output = U>,
    {
        match self.slot.clone().await {
            Optional::Present(value) => boundary::catch_async("map_or_async", move || f(value))
                .await
                .unwrap_or(default),
            Optional::Absent => default,
        }
    }

    /// A panic from `f` or its future falls back to `default`. A panic from
    /// `default` or its future is returned as a `predicate-exception` error.
    pub async fn map_or_else_async<U, DefaultFut, MapFut>(
        &self,
        default: impl FnOnce() -> DefaultFut,
        f: impl FnOnce(T) -> MapFut,
    ) -> Result<U, WrapperError>
    where
        DefaultFut: IntoFuture<Output = U>,
        MapFut: IntoFuture<Output = U>,
    {
        if let Optional::Present(value) = self.slot.clone().await
            && let Ok(mapped) = boundary::catch_async("map_or_else_async", move || f(value)).await
        {
            return Ok(mapped);
        }
        boundary::catch_async("map_or_else_async", default)
            .await
            .map_err(|caught| caught.into_error(ErrorKind::PredicateException))
    }

    pub fn and_then<U: Clone + 'static>(
        &self,
        f: impl FnOnce(T) -> Optional<U> + 'static,
    ) -> PendingOptional<U> {
        self.chain_ready(move |settled| settled.and_then(f))
    }

    /// `f` may return another pending optional. A panic from `f` or from the
    /// awaited result yields `Absent`.
    pub fn and_then_async<U, Fut>(&self, f: impl FnOnce(T) -> Fut + 'static) -> PendingOptional<U>
    where
        U: Clone + 'static,
        Fut: Deferred<Optional<U>>,
    {
        self.chain(move |settled| async move {
            match settled {
                Optional::Present(value) => {
                    boundary::catch_async("and_then_async", move || f(value))
                        .await
                        .unwrap_or_default()
                }
                Optional::Absent => Optional::Absent,
            }
        })
    }

    pub fn filter(&self, predicate: impl FnOnce(&T) -> bool + 'static) -> Self {
        self.chain_ready(move |settled| settled.filter(predicate))
    }

    /// The predicate receives a clone of the value.
    pub fn filter_async<Fut>(&self, predicate: impl FnOnce(T) -> Fut + 'static) -> Self
    where
        Fut: Deferred<bool>,
    {
        self.chain(move |settled| async move {
            let Optional::Present(value) = settled else {
                return Optional::Absent;
            };
            let copy = value.clone();
            match boundary::catch_async("filter_async", move || predicate(copy)).await {
                Ok(true) => Optional::Present(value),
                Ok(false) | Err(_) => Optional::Absent,
            }
        })
    }

    pub fn and<U: Clone + 'static>(&self, other: &PendingOptional<U>) -> PendingOptional<U> {
        let other = other.clone();
        self.chain(move |settled| async move {
            match settled {
                Optional::Present(_) => other.await,
                Optional::Absent => Optional::Absent,
            }
        })
    }

    /// `other` is only awaited when this one resolves to `Absent`.
    pub fn or(&self, other: &Self) -> Self {
        let other = other.clone();
        self.chain(move |settled| async move {
            match settled {
                Optional::Present(_) => settled,
                Optional::Absent => other.await,
            }
        })
    }

    pub fn or_else(&self, f: impl FnOnce() -> Optional<T> + 'static) -> Self {
        self.chain_ready(move |settled| settled.or_else(f))
    }

    pub fn or_else_async<Fut>(&self, f: impl FnOnce() -> Fut + 'static) -> Self
    where
        Fut: Deferred<Optional<T>>,
    {
        self.chain(move |settled| async move {
            match settled {
                Optional::Present(_) => settled,
                Optional::Absent => boundary::catch_async("or_else_async", f)
                    .await
                    .unwrap_or_default(),
            }
        })
    }

    pub fn xor(&self, other: &Self) -> Self {
        let other = other.clone();
        self.chain(move |settled| async move { settled.xor(other.await) })
    }

    pub fn zip<U: Clone + 'static>(&self, other: &PendingOptional<U>) -> PendingOptional<(T, U)> {
        let other = other.clone();
        self.chain(move |settled| async move { settled.zip(other.await) })
    }

    /// Side effect on the resolved value. The returned handle resolves like
    /// this one.
    pub fn inspect(&self, f: impl FnOnce(&T) + 'static) -> Self {
        self.chain_ready(move |settled| settled.inspect(f))
    }

    /// Await a side effect on a clone of the value. Its panics are discarded.
    pub fn inspect_async<Fut>(&self, f: impl FnOnce(T) -> Fut + 'static) -> Self
    where
        Fut: IntoFuture + 'static,
        Fut::IntoFuture: 'static,
    {
        self.chain(move |settled| async move {
            if let Optional::Present(value) = &settled {
                let copy = value.clone();
                let _ = boundary::catch_async("inspect_async", move || f(copy)).await;
            }
            settled
        })
    }

    pub fn tap(&self, f: impl FnOnce(&Optional<T>) + 'static) -> Self {
        self.chain_ready(move |settled| settled.tap(f))
    }

    /// Await a side effect on a clone of the whole resolution. Its panics are
    /// discarded.
    pub fn tap_async<Fut>(&self, f: impl FnOnce(Optional<T>) -> Fut + 'static) -> Self
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

    pub fn ok_or<E: Clone + 'static>(&self, err: E) -> PendingOutcome<T, E> {
        let source = self.slot.clone();
        PendingOutcome::wrap(async move { source.await.ok_or(err) })
    }

    pub fn ok_or_else<E: Clone + 'static>(
        &self,
        err: impl FnOnce() -> E + 'static,
    ) -> PendingOutcome<T, E> {
        let source = self.slot.clone();
        PendingOutcome::wrap(async move { source.await.ok_or_else(err) })
    }

    /// A panicking factory, or a factory future that panics while polled,
    /// yields an unexpected `from-optional-conversion` failure.
    pub fn ok_or_else_async<E, Fut>(&self, err: impl FnOnce() -> Fut + 'static) -> PendingOutcome<T, E>
    where
        E: Clone + 'static,
        Fut: Deferred<E>,
    {
        let source = self.slot.clone();
        PendingOutcome::wrap(async move {
            match source.await {
                Optional::Present(value) => Outcome::Success(value),
                Optional::Absent => match boundary::catch_async("ok_or_else_async", err).await {
                    Ok(err) => Outcome::failure(err),
                    Err(caught) => Outcome::unexpected(WrapperError::caused_by(
                        ErrorKind::FromOptionalConversion,
                        caught.into_cause(),
                    )),
                },
            }
        })
    }

    pub async fn match_with<U>(
        &self,
        on_present: impl FnOnce(T) -> U,
        on_absent: impl FnOnce() -> U,
    ) -> Result<U, WrapperError> {
        self.slot.clone().await.match_with(on_present, on_absent)
    }

    /// Arms return futures. A panic from an arm or its future is returned as
    /// a `predicate-exception` error.
    pub async fn match_with_async<U, PresentFut, AbsentFut>(
        &self,
        on_present: impl FnOnce(T) -> PresentFut,
        on_absent: impl FnOnce() -> AbsentFut,
    ) -> Result<U, WrapperError>
    where
        PresentFut: IntoFuture<Output = U>,
        AbsentFut: IntoFuture<Output = U>,
    {
        let result = match self.slot.clone().await {
            Optional::Present(value) => {
                boundary::catch_async("match_with_async", move || on_present(value)).await
            }
            Optional::Absent => boundary::catch_async("match_with_async", on_absent).await,
        };
        result.map_err(|caught| caught.into_error(ErrorKind::PredicateException))
    }

    /// Detach the current resolution, leaving this handle `Absent`.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::absent())
    }

    /// Take the resolved value only if `predicate` holds.
    ///
    /// Both handles share one evaluation of the predicate: the returned one
    /// resolves to the taken value, `self` to what was left behind.
    pub fn take_if(&mut self, predicate: impl FnOnce(&T) -> bool + 'static) -> Self {
        let source = self.slot.clone();
        self.split(async move {
            let mut current = source.await;
            let taken = current.take_if(predicate);
            (current, taken)
        })
    }

    /// Like [`take_if`](Self::take_if), with a predicate that receives a clone
    /// of the value and returns a future.
    pub fn take_if_async<Fut>(&mut self, predicate: impl FnOnce(T) -> Fut + 'static) -> Self
    where
        Fut: Deferred<bool>,
    {
        let source = self.slot.clone();
        self.split(async move {
            let Optional::Present(value) = source.await else {
                return (Optional::Absent, Optional::Absent);
            };
            let copy = value.clone();
            match boundary::catch_async("take_if_async", move || predicate(copy)).await {
                Ok(true) => (Optional::Absent, Optional::Present(value)),
                Ok(false) | Err(_) => (Optional::Present(value), Optional::Absent),
            }
        })
    }

    fn split(
        &mut self,
        decision: impl Future<Output = (Optional<T>, Optional<T>)> + 'static,
    ) -> Self {
        let decision = super::slot(decision);
        let remaining = decision.clone();
        *self = Self::wrap(async move { remaining.await.0 });
        Self::wrap(async move { decision.await.1 })
    }

    /// Install a present value, returning the previous handle untouched.
    pub fn replace(&mut self, value: T) -> Self {
        mem::replace(self, Self::present(value))
    }

    pub fn insert(&mut self, value: T) {
        *self = Self::present(value);
    }

    /// Resolve to the current value, or to `value` if absent.
    pub fn get_or_insert(&mut self, value: T) {
        *self = self.chain_ready(move |settled| settled.or(Optional::Present(value)));
    }

    /// Wait for every handle. Resolves to `Absent` as soon as one does.
    pub fn all(handles: impl IntoIterator<Item = Self>) -> PendingOptional<Vec<T>> {
        let handles: Vec<_> = handles.into_iter().collect();
        PendingOptional::wrap(async move {
            futures_util::future::try_join_all(handles.into_iter().map(|handle| async move {
                handle.await.into_option().ok_or(())
            }))
            .await
            .ok()
            .into()
        })
    }
}

impl<T: Clone + 'static> PendingOptional<Optional<T>> {
    pub fn flatten(&self) -> PendingOptional<T> {
        self.chain_ready(Optional::flatten)
    }
}

impl<T: Clone + 'static, E: Clone + 'static> PendingOptional<Outcome<T, E>> {
    pub fn transpose(&self) -> PendingOutcome<Optional<T>, E> {
        let source = self.slot.clone();
        PendingOutcome::wrap(async move { source.await.transpose() })
    }
}

impl<T: Clone + 'static> Clone for PendingOptional<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for PendingOptional<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T: Clone + 'static> From<Optional<T>> for PendingOptional<T> {
    fn from(settled: Optional<T>) -> Self {
        Self::new(settled)
    }
}

impl<T: Clone + 'static> IntoFuture for PendingOptional<T> {
    type Output = Optional<T>;
    type IntoFuture = Slot<Optional<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.slot
    }
}

impl<T: Clone + 'static> IntoFuture for &PendingOptional<T> {
    type Output = Optional<T>;
    type IntoFuture = Slot<Optional<T>>;

    fn into_future(self) -> Self::IntoFuture {
        self.slot.clone()
    }
}

impl<T: Clone + fmt::Display + 'static> fmt::Display for PendingOptional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, "PendingOptional", &self.slot)
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for PendingOptional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOptional")
            .field("settled", &self.peek())
            .finish()
    }
}
