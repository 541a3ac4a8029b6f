//! Present/absent container.
//!
//! [`Optional`] mirrors `Option` but routes every callback through the panic
//! boundary: a panicking `map`, `filter`, `and_then`, ... degrades to
//! [`Optional::Absent`] instead of unwinding into the caller. Only the
//! `unwrap`/`expect`/`value` family signals, and each has a `try_*` twin that
//! returns the [`WrapperError`] instead.
//!
//! Read-only combinators consume `self` and return a new container. The only
//! operations that move the slot between variants after construction are
//! [`insert`](Optional::insert), [`replace`](Optional::replace),
//! [`take`](Optional::take), [`take_if`](Optional::take_if),
//! [`get_or_insert`](Optional::get_or_insert) and
//! [`get_or_insert_with`](Optional::get_or_insert_with).

use std::fmt;
use std::future::IntoFuture;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use vessel_types::{ErrorKind, WrapperError, write_variant};
use vessel_utils::boundary;

use crate::outcome::Outcome;
use crate::pending::PendingOptional;

/// A value that is either present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optional<T> {
    Present(T),
    Absent,
}

impl<T> Optional<T> {
    #[must_use]
    pub const fn present(value: T) -> Self {
        Self::Present(value)
    }

    #[must_use]
    pub const fn absent() -> Self {
        Self::Absent
    }

    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// `true` if present and the predicate holds. A panicking predicate counts
    /// as `false`.
    pub fn is_present_and(self, predicate: impl FnOnce(T) -> bool) -> bool {
        match self {
            Self::Present(value) => {
                boundary::catch("is_present_and", || predicate(value)).unwrap_or(false)
            }
            Self::Absent => false,
        }
    }

    /// `true` if absent, or present and the predicate holds. A panicking
    /// predicate counts as `false`.
    pub fn is_absent_or(self, predicate: impl FnOnce(T) -> bool) -> bool {
        match self {
            Self::Present(value) => {
                boundary::catch("is_absent_or", || predicate(value)).unwrap_or(false)
            }
            Self::Absent => true,
        }
    }

    #[must_use]
    pub const fn as_ref(&self) -> Optional<&T> {
        match self {
            Self::Present(value) => Optional::Present(value),
            Self::Absent => Optional::Absent,
        }
    }

    pub fn as_mut(&mut self) -> Optional<&mut T> {
        match self {
            Self::Present(value) => Optional::Present(value),
            Self::Absent => Optional::Absent,
        }
    }

    pub fn iter(&self) -> std::option::IntoIter<&T> {
        self.as_ref().into_option().into_iter()
    }

    /// Borrow the held value. Signals `value-accessed-on-absent` when absent.
    #[track_caller]
    pub fn value(&self) -> &T {
        match self.try_value() {
            Ok(value) => value,
            Err(err) => boundary::signal(err),
        }
    }

    pub fn try_value(&self) -> Result<&T, WrapperError> {
        match self {
            Self::Present(value) => Ok(value),
            Self::Absent => Err(WrapperError::new(ErrorKind::ValueAccessedOnAbsent)),
        }
    }

    /// Signals `unwrap-called-on-absent` when absent.
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self.try_unwrap() {
            Ok(value) => value,
            Err(err) => boundary::signal(err),
        }
    }

    pub fn try_unwrap(self) -> Result<T, WrapperError> {
        match self {
            Self::Present(value) => Ok(value),
            Self::Absent => Err(WrapperError::new(ErrorKind::UnwrapCalledOnAbsent)),
        }
    }

    /// Signals `expect-called-on-absent` carrying `message` when absent.
    #[track_caller]
    pub fn expect(self, message: &str) -> T {
        match self.try_expect(message) {
            Ok(value) => value,
            Err(err) => boundary::signal(err),
        }
    }

    pub fn try_expect(self, message: &str) -> Result<T, WrapperError> {
        match self {
            Self::Present(value) => Ok(value),
            Self::Absent => Err(WrapperError::with_message(
                ErrorKind::ExpectCalledOnAbsent,
                message,
            )),
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Present(value) => value,
            Self::Absent => default,
        }
    }

    /// A panic raised by `f` belongs to the caller and is not intercepted.
    pub fn unwrap_or_else(self, f: impl FnOnce() -> T) -> T {
        match self {
            Self::Present(value) => value,
            Self::Absent => f(),
        }
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.unwrap_or_else(T::default)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
        match self {
            Self::Present(value) => boundary::catch("map", || f(value)).ok().into(),
            Self::Absent => Optional::Absent,
        }
    }

    /// Map the held value, or return `default`. A panicking `f` yields `default`.
    pub fn map_or<U>(self, default: U, f: impl FnOnce(T) -> U) -> U {
        match self {
            Self::Present(value) => boundary::catch("map_or", || f(value)).unwrap_or(default),
            Self::Absent => default,
        }
    }

    /// Map the held value, or compute a default.
    ///
    /// A panicking `f` falls back to `default`. A panicking `default` has no
    /// value left to fall back to, so it is returned as a
    /// `predicate-exception` error.
    pub fn map_or_else<U>(
        self,
        default: impl FnOnce() -> U,
        f: impl FnOnce(T) -> U,
    ) -> Result<U, WrapperError> {
        if let Self::Present(value) = self
            && let Ok(mapped) = boundary::catch("map_or_else", || f(value))
        {
            return Ok(mapped);
        }
        boundary::catch("map_or_else", default)
            .map_err(|caught| caught.into_error(ErrorKind::PredicateException))
    }

    /// Run a side effect on the held value. The effect's panics are discarded.
    pub fn inspect(self, f: impl FnOnce(&T)) -> Self {
        if let Self::Present(value) = &self {
            let _ = boundary::catch("inspect", || f(value));
        }
        self
    }

    /// Run a side effect on the whole container. The effect's panics are
    /// discarded.
    pub fn tap(self, f: impl FnOnce(&Self)) -> Self {
        let _ = boundary::catch("tap", || f(&self));
        self
    }

    pub fn ok_or<E>(self, err: E) -> Outcome<T, E> {
        match self {
            Self::Present(value) => Outcome::Success(value),
            Self::Absent => Outcome::failure(err),
        }
    }

    /// Convert to an outcome, building the error lazily. A panicking factory
    /// yields an unexpected `from-optional-conversion` failure.
    pub fn ok_or_else<E>(self, err: impl FnOnce() -> E) -> Outcome<T, E> {
        match self {
            Self::Present(value) => Outcome::Success(value),
            Self::Absent => match boundary::catch("ok_or_else", err) {
                Ok(err) => Outcome::failure(err),
                Err(caught) => Outcome::unexpected(WrapperError::caused_by(
                    ErrorKind::FromOptionalConversion,
                    caught.into_cause(),
                )),
            },
        }
    }

    pub fn and<U>(self, other: Optional<U>) -> Optional<U> {
        match self {
            Self::Present(_) => other,
            Self::Absent => Optional::Absent,
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Optional<U>) -> Optional<U> {
        match self {
            Self::Present(value) => boundary::catch("and_then", || f(value)).unwrap_or_default(),
            Self::Absent => Optional::Absent,
        }
    }

    /// Keep the value only if the predicate holds. A panicking predicate
    /// yields `Absent`.
    pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
        match self {
            Self::Present(value) => match boundary::catch("filter", || predicate(&value)) {
                Ok(true) => Self::Present(value),
                Ok(false) | Err(_) => Self::Absent,
            },
            Self::Absent => Self::Absent,
        }
    }

    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Present(_) => self,
            Self::Absent => other,
        }
    }

    pub fn or_else(self, f: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Present(_) => self,
            Self::Absent => boundary::catch("or_else", f).unwrap_or_default(),
        }
    }

    /// `Present` iff exactly one side is present.
    pub fn xor(self, other: Self) -> Self {
        match (self, other) {
            (Self::Present(value), Self::Absent) | (Self::Absent, Self::Present(value)) => {
                Self::Present(value)
            }
            _ => Self::Absent,
        }
    }

    pub fn zip<U>(self, other: Optional<U>) -> Optional<(T, U)> {
        match (self, other) {
            (Self::Present(left), Optional::Present(right)) => Optional::Present((left, right)),
            _ => Optional::Absent,
        }
    }

    /// Overwrite the slot unconditionally.
    pub fn insert(&mut self, value: T) -> &mut T {
        *self = Self::Present(value);
        self.slot_mut()
    }

    /// Write `value` only if the slot is absent.
    pub fn get_or_insert(&mut self, value: T) -> &mut T {
        if self.is_absent() {
            *self = Self::Present(value);
        }
        self.slot_mut()
    }

    /// Fill an absent slot from `f`.
    ///
    /// There is no reference to return after a panicking `f`, so the panic is
    /// re-raised as a `predicate-exception` signal; the slot stays absent.
    #[track_caller]
    pub fn get_or_insert_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        if self.is_absent() {
            match boundary::catch("get_or_insert_with", f) {
                Ok(value) => *self = Self::Present(value),
                Err(caught) => boundary::signal(caught.into_error(ErrorKind::PredicateException)),
            }
        }
        self.slot_mut()
    }

    /// Move the value out, leaving `Absent`.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Take the value only if the predicate holds. On `false` or a panic the
    /// slot is left as it was and `Absent` is returned. The predicate only
    /// gets a shared reference, so it cannot change the value it rejects.
    pub fn take_if(&mut self, predicate: impl FnOnce(&T) -> bool) -> Self {
        let Self::Present(value) = &*self else {
            return Self::Absent;
        };
        match boundary::catch("take_if", || predicate(value)) {
            Ok(true) => self.take(),
            Ok(false) | Err(_) => Self::Absent,
        }
    }

    /// Install `value`, returning what was there before.
    pub fn replace(&mut self, value: T) -> Self {
        std::mem::replace(self, Self::Present(value))
    }

    /// Exhaustive match over both variants. A panicking arm is returned as a
    /// `predicate-exception` error rather than swallowed.
    pub fn match_with<U>(
        self,
        on_present: impl FnOnce(T) -> U,
        on_absent: impl FnOnce() -> U,
    ) -> Result<U, WrapperError> {
        let result = match self {
            Self::Present(value) => boundary::catch("match_with", || on_present(value)),
            Self::Absent => boundary::catch("match_with", on_absent),
        };
        result.map_err(|caught| caught.into_error(ErrorKind::PredicateException))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    fn slot_mut(&mut self) -> &mut T {
        match self {
            Self::Present(value) => value,
            Self::Absent => unreachable!("slot was filled before borrowing"),
        }
    }
}

impl<T> Optional<Optional<T>> {
    pub fn flatten(self) -> Optional<T> {
        match self {
            Self::Present(inner) => inner,
            Self::Absent => Optional::Absent,
        }
    }
}

impl<T, E> Optional<Outcome<T, E>> {
    /// `Absent` becomes `Success(Absent)`, `Present(Success(v))` becomes
    /// `Success(Present(v))`, and `Present(Failure(e))` becomes `Failure(e)`.
    pub fn transpose(self) -> Outcome<Optional<T>, E> {
        match self {
            Self::Present(Outcome::Success(value)) => Outcome::Success(Optional::Present(value)),
            Self::Present(Outcome::Failure(err)) => Outcome::Failure(err),
            Self::Absent => Outcome::Success(Optional::Absent),
        }
    }
}

impl<T, U> Optional<(T, U)> {
    pub fn unzip(self) -> (Optional<T>, Optional<U>) {
        match self {
            Self::Present((left, right)) => (Optional::Present(left), Optional::Present(right)),
            Self::Absent => (Optional::Absent, Optional::Absent),
        }
    }
}

impl<T: Clone> Optional<&T> {
    /// Deep copy of a borrowed payload.
    #[must_use]
    pub fn cloned(self) -> Optional<T> {
        match self {
            Self::Present(value) => Optional::Present(value.clone()),
            Self::Absent => Optional::Absent,
        }
    }
}

impl<T: Copy> Optional<&T> {
    #[must_use]
    pub fn copied(self) -> Optional<T> {
        match self {
            Self::Present(value) => Optional::Present(*value),
            Self::Absent => Optional::Absent,
        }
    }
}

impl<T: Clone + 'static> Optional<T> {
    pub fn to_pending(self) -> PendingOptional<T> {
        PendingOptional::new(self)
    }
}

impl<F> Optional<F>
where
    F: IntoFuture + 'static,
    F::IntoFuture: 'static,
    F::Output: Clone + 'static,
{
    /// Wrap a future-valued payload into a pending optional that resolves to
    /// the future's output. A panicking future resolves to `Absent`.
    pub fn resolve_payload(self) -> PendingOptional<F::Output> {
        match self {
            Self::Present(future) => PendingOptional::from_value_future(future),
            Self::Absent => PendingOptional::absent(),
        }
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T> IntoIterator for Optional<T> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_option().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Optional<T> {
    type Item = &'a T;
    type IntoIter = std::option::IntoIter<&'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Optional<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(value) => write_variant(f, "Present", value),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

// Serialized as a nullable value, the same as `Option`.
impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ref().into_option().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
