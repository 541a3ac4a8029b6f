//! Success/failure container.
//!
//! An [`Outcome`] fails with a [`CheckedError`]: either an error value the
//! caller modeled (`Expected`) or a [`WrapperError`] the container synthesized
//! after a callback panicked (`Unexpected`). Combinators that take a callback
//! never unwind; they turn the panic into an `Unexpected` failure with kind
//! `predicate-exception`. Error-side combinators (`map_err`, `or_else`,
//! `inspect_err`) only ever see `Expected` values.

use std::fmt;
use std::future::IntoFuture;

use vessel_types::{CheckedError, ErrorKind, WrapperError, write_variant};
use vessel_utils::boundary;

use crate::optional::Optional;
use crate::pending::PendingOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Success(T),
    Failure(CheckedError<E>),
}

impl<T, E> Outcome<T, E> {
    #[must_use]
    pub const fn success(value: T) -> Self {
        Self::Success(value)
    }

    /// Failure carrying an expected error value.
    #[must_use]
    pub const fn failure(err: E) -> Self {
        Self::Failure(CheckedError::Expected(err))
    }

    #[must_use]
    pub const fn unexpected(err: WrapperError) -> Self {
        Self::Failure(CheckedError::Unexpected(err))
    }

    /// Run `f` and lift its result. A panic becomes an `unexpected` failure.
    pub fn attempt(f: impl FnOnce() -> Result<T, E>) -> Self {
        match boundary::catch("attempt", f) {
            Ok(result) => result.into(),
            Err(caught) => Self::unexpected(caught.into_error(ErrorKind::Unexpected)),
        }
    }

    /// Lift a result whose error already distinguishes expected from
    /// unexpected failures.
    pub fn from_checked(result: Result<T, CheckedError<E>>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// A panicking predicate counts as `false`.
    pub fn is_success_and(self, predicate: impl FnOnce(T) -> bool) -> bool {
        match self {
            Self::Success(value) => {
                boundary::catch("is_success_and", || predicate(value)).unwrap_or(false)
            }
            Self::Failure(_) => false,
        }
    }

    /// A panicking predicate counts as `false`.
    pub fn is_failure_and(self, predicate: impl FnOnce(CheckedError<E>) -> bool) -> bool {
        match self {
            Self::Success(_) => false,
            Self::Failure(err) => {
                boundary::catch("is_failure_and", || predicate(err)).unwrap_or(false)
            }
        }
    }

    /// Borrow the payload. An unexpected failure is cloned into the view.
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(err) => Outcome::Failure(err.as_ref()),
        }
    }

    pub fn as_mut(&mut self) -> Outcome<&mut T, &mut E> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(CheckedError::Expected(err)) => Outcome::failure(err),
            Self::Failure(CheckedError::Unexpected(err)) => Outcome::unexpected(err.clone()),
        }
    }

    pub fn iter(&self) -> std::option::IntoIter<&T> {
        self.as_ref().ok().into_option().into_iter()
    }

    /// Project the success value.
    pub fn ok(self) -> Optional<T> {
        match self {
            Self::Success(value) => Optional::Present(value),
            Self::Failure(_) => Optional::Absent,
        }
    }

    /// Project the expected error. Success and unexpected failures are both
    /// `Absent`.
    pub fn err(self) -> Optional<E> {
        match self {
            Self::Failure(CheckedError::Expected(err)) => Optional::Present(err),
            Self::Success(_) | Self::Failure(CheckedError::Unexpected(_)) => Optional::Absent,
        }
    }

    /// Project the whole failure, expected or not.
    pub fn error(self) -> Optional<CheckedError<E>> {
        match self {
            Self::Success(_) => Optional::Absent,
            Self::Failure(err) => Optional::Present(err),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    /// A panic raised by `f` belongs to the caller and is not intercepted.
    pub fn unwrap_or_else(self, f: impl FnOnce(CheckedError<E>) -> T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(err) => f(err),
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.unwrap_or_else(|_| T::default())
    }

    /// Map the success value. A panicking `f` yields an unexpected failure.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Self::Success(value) => match boundary::catch("map", || f(value)) {
                Ok(mapped) => Outcome::Success(mapped),
                Err(caught) => Outcome::unexpected(caught.into_error(ErrorKind::PredicateException)),
            },
            Self::Failure(err) => Outcome::Failure(err),
        }
    }

    /// Map an expected error. Successes and unexpected failures pass through
    /// without calling `f`.
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(CheckedError::Expected(err)) => {
                match boundary::catch("map_err", || f(err)) {
                    Ok(mapped) => Outcome::failure(mapped),
                    Err(caught) => {
                        Outcome::unexpected(caught.into_error(ErrorKind::PredicateException))
                    }
                }
            }
            Self::Failure(CheckedError::Unexpected(err)) => Outcome::unexpected(err),
        }
    }

    /// A panicking `f` yields `default`.
    pub fn map_or<U>(self, default: U, f: impl FnOnce(T) -> U) -> U {
        match self {
            Self::Success(value) => boundary::catch("map_or", || f(value)).unwrap_or(default),
            Self::Failure(_) => default,
        }
    }

    /// Map the success value or derive a value from the failure.
    ///
    /// When `f` panics, `default` receives an unexpected failure describing
    /// the panic. A panicking `default` is returned as a
    /// `predicate-exception` error.
    pub fn map_or_else<U>(
        self,
        default: impl FnOnce(CheckedError<E>) -> U,
        f: impl FnOnce(T) -> U,
    ) -> Result<U, WrapperError> {
        let err = match self {
            Self::Success(value) => match boundary::catch("map_or_else", || f(value)) {
                Ok(mapped) => return Ok(mapped),
                Err(caught) => {
                    CheckedError::Unexpected(caught.into_error(ErrorKind::PredicateException))
                }
            },
            Self::Failure(err) => err,
        };
        boundary::catch("map_or_else", || default(err))
            .map_err(|caught| caught.into_error(ErrorKind::PredicateException))
    }

    pub fn inspect(self, f: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            let _ = boundary::catch("inspect", || f(value));
        }
        self
    }

    /// Side effect on an expected error only.
    pub fn inspect_err(self, f: impl FnOnce(&E)) -> Self {
        if let Self::Failure(CheckedError::Expected(err)) = &self {
            let _ = boundary::catch("inspect_err", || f(err));
        }
        self
    }

    pub fn tap(self, f: impl FnOnce(&Self)) -> Self {
        let _ = boundary::catch("tap", || f(&self));
        self
    }

    pub fn and<U>(self, other: Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Self::Success(_) => other,
            Self::Failure(err) => Outcome::Failure(err),
        }
    }

    /// Chain on success. A panicking `f` yields an unexpected failure.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Self::Success(value) => boundary::catch("and_then", || f(value))
                .unwrap_or_else(|caught| {
                    Outcome::unexpected(caught.into_error(ErrorKind::PredicateException))
                }),
            Self::Failure(err) => Outcome::Failure(err),
        }
    }

    pub fn or<F>(self, other: Outcome<T, F>) -> Outcome<T, F> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(_) => other,
        }
    }

    /// Recover from an expected error. Unexpected failures are carried
    /// through without calling `f`.
    pub fn or_else<F>(self, f: impl FnOnce(E) -> Outcome<T, F>) -> Outcome<T, F> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(CheckedError::Expected(err)) => boundary::catch("or_else", || f(err))
                .unwrap_or_else(|caught| {
                    Outcome::unexpected(caught.into_error(ErrorKind::PredicateException))
                }),
            Self::Failure(CheckedError::Unexpected(err)) => Outcome::unexpected(err),
        }
    }

    /// Exhaustive match. A panicking arm is returned as a
    /// `predicate-exception` error.
    pub fn match_with<U>(
        self,
        on_success: impl FnOnce(T) -> U,
        on_failure: impl FnOnce(CheckedError<E>) -> U,
    ) -> Result<U, WrapperError> {
        let result = match self {
            Self::Success(value) => boundary::catch("match_with", || on_success(value)),
            Self::Failure(err) => boundary::catch("match_with", || on_failure(err)),
        };
        result.map_err(|caught| caught.into_error(ErrorKind::PredicateException))
    }

    pub fn into_result(self) -> Result<T, CheckedError<E>> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(err) => Err(err),
        }
    }
}

impl<T, E: fmt::Debug> Outcome<T, E> {
    /// Signals `unwrap-called-on-failure`.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.try_unwrap() {
            Ok(value) => value,
            Err(err) => boundary::signal(err),
        }
    }

    pub fn try_unwrap(self) -> Result<T, WrapperError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(err) => Err(failure_error(ErrorKind::UnwrapCalledOnFailure, None, err)),
        }
    }

    /// Signals `expect-called-on-failure` prefixed with `message`.
    #[track_caller]
    pub fn expect(self, message: &str) -> T {
        match self.try_expect(message) {
            Ok(value) => value,
            Err(err) => boundary::signal(err),
        }
    }

    pub fn try_expect(self, message: &str) -> Result<T, WrapperError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(err) => Err(failure_error(
                ErrorKind::ExpectCalledOnFailure,
                Some(message),
                err,
            )),
        }
    }
}

impl<T: fmt::Debug, E> Outcome<T, E> {
    /// Signals `unwrap-err-called-on-success`.
    #[track_caller]
    pub fn unwrap_err(self) -> CheckedError<E> {
        match self.try_unwrap_err() {
            Ok(err) => err,
            Err(err) => boundary::signal(err),
        }
    }

    pub fn try_unwrap_err(self) -> Result<CheckedError<E>, WrapperError> {
        match self {
            Self::Success(value) => Err(WrapperError::with_message(
                ErrorKind::UnwrapErrCalledOnSuccess,
                format!(
                    "{}: {value:?}",
                    ErrorKind::UnwrapErrCalledOnSuccess.default_message()
                ),
            )),
            Self::Failure(err) => Ok(err),
        }
    }

    /// Signals `expect-err-called-on-success` prefixed with `message`.
    #[track_caller]
    pub fn expect_err(self, message: &str) -> CheckedError<E> {
        match self.try_expect_err(message) {
            Ok(err) => err,
            Err(err) => boundary::signal(err),
        }
    }

    pub fn try_expect_err(self, message: &str) -> Result<CheckedError<E>, WrapperError> {
        match self {
            Self::Success(value) => Err(WrapperError::with_message(
                ErrorKind::ExpectErrCalledOnSuccess,
                format!("{message}: {value:?}"),
            )),
            Self::Failure(err) => Ok(err),
        }
    }
}

fn failure_error<E: fmt::Debug>(
    kind: ErrorKind,
    message: Option<&str>,
    err: CheckedError<E>,
) -> WrapperError {
    let base = message.unwrap_or(kind.default_message());
    match err {
        CheckedError::Expected(err) => WrapperError::with_message(kind, format!("{base}: {err:?}")),
        CheckedError::Unexpected(err) => WrapperError::with_message_and_cause(kind, base, err),
    }
}

impl<T, E> Outcome<Outcome<T, E>, E> {
    pub fn flatten(self) -> Outcome<T, E> {
        match self {
            Self::Success(inner) => inner,
            Self::Failure(err) => Outcome::Failure(err),
        }
    }
}

impl<T, E> Outcome<Optional<T>, E> {
    /// `Success(Absent)` becomes `Absent`, `Success(Present(v))` becomes
    /// `Present(Success(v))`, and `Failure(e)` becomes `Present(Failure(e))`.
    pub fn transpose(self) -> Optional<Outcome<T, E>> {
        match self {
            Self::Success(Optional::Present(value)) => Optional::Present(Outcome::Success(value)),
            Self::Success(Optional::Absent) => Optional::Absent,
            Self::Failure(err) => Optional::Present(Outcome::Failure(err)),
        }
    }
}

impl<T: Clone, E> Outcome<&T, E> {
    pub fn cloned(self) -> Outcome<T, E> {
        self.map_infallible(Clone::clone)
    }
}

impl<T: Copy, E> Outcome<&T, E> {
    pub fn copied(self) -> Outcome<T, E> {
        self.map_infallible(|value| *value)
    }
}

impl<T, E> Outcome<T, E> {
    fn map_infallible<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(err) => Outcome::Failure(err),
        }
    }
}

impl<T: Clone + 'static, E: Clone + 'static> Outcome<T, E> {
    pub fn to_pending(self) -> PendingOutcome<T, E> {
        PendingOutcome::new(self)
    }
}

impl<F, E> Outcome<F, E>
where
    F: IntoFuture + 'static,
    F::IntoFuture: 'static,
    F::Output: Clone + 'static,
    E: Clone + 'static,
{
    /// Wrap a future-valued success into a pending outcome resolving to the
    /// future's output. A panicking future resolves to a `pending-rejection`
    /// failure.
    pub fn resolve_payload(self) -> PendingOutcome<F::Output, E> {
        match self {
            Self::Success(future) => PendingOutcome::from_value_future(future),
            Self::Failure(err) => PendingOutcome::new(Outcome::Failure(err)),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::failure(err),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, CheckedError<E>> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

impl<T, E> IntoIterator for Outcome<T, E> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.ok().into_option().into_iter()
    }
}

impl<T: fmt::Display, E: fmt::Display> fmt::Display for Outcome<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write_variant(f, "Success", value),
            Self::Failure(err) => write_variant(f, "Failure", err),
        }
    }
}
