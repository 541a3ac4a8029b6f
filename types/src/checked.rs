//! Checked error: a caller-modeled error value or a wrapped unexpected failure.

use std::error::Error;
use std::fmt;

use crate::error::{ErrorKind, WrapperError};

/// The failure payload of an outcome.
///
/// `Expected` holds an error value the caller chose to model. `Unexpected`
/// holds a [`WrapperError`] synthesized from a panic, a rejected future, or a
/// failed conversion. Accessors return `Option` so reading the wrong arm is not
/// expressible:
///
/// ```compile_fail
/// use vessel_types::{CheckedError, WrapperError};
///
/// let err: CheckedError<&str> = CheckedError::Expected("nope");
/// let wrapped: WrapperError = err.into_unexpected();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckedError<E> {
    Expected(E),
    Unexpected(WrapperError),
}

impl<E> CheckedError<E> {
    #[must_use]
    pub fn unexpected(kind: ErrorKind) -> Self {
        Self::Unexpected(WrapperError::new(kind))
    }

    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::Expected(_))
    }

    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(self, Self::Unexpected(_))
    }

    /// Double dispatch over both arms.
    pub fn handle<R>(
        self,
        on_unexpected: impl FnOnce(WrapperError) -> R,
        on_expected: impl FnOnce(E) -> R,
    ) -> R {
        match self {
            Self::Expected(err) => on_expected(err),
            Self::Unexpected(err) => on_unexpected(err),
        }
    }

    #[must_use]
    pub fn into_expected(self) -> Option<E> {
        match self {
            Self::Expected(err) => Some(err),
            Self::Unexpected(_) => None,
        }
    }

    #[must_use]
    pub fn into_unexpected(self) -> Option<WrapperError> {
        match self {
            Self::Expected(_) => None,
            Self::Unexpected(err) => Some(err),
        }
    }

    /// Borrow the expected arm; an unexpected arm is cloned.
    #[must_use]
    pub fn as_ref(&self) -> CheckedError<&E> {
        match self {
            Self::Expected(err) => CheckedError::Expected(err),
            Self::Unexpected(err) => CheckedError::Unexpected(err.clone()),
        }
    }

    /// Map the expected arm. An unexpected failure is carried through as-is.
    pub fn map_expected<F>(self, f: impl FnOnce(E) -> F) -> CheckedError<F> {
        match self {
            Self::Expected(err) => CheckedError::Expected(f(err)),
            Self::Unexpected(err) => CheckedError::Unexpected(err),
        }
    }

    /// Kind of the unexpected arm, if any.
    #[must_use]
    pub fn unexpected_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Expected(_) => None,
            Self::Unexpected(err) => Some(err.kind()),
        }
    }
}

impl<E> From<WrapperError> for CheckedError<E> {
    fn from(err: WrapperError) -> Self {
        Self::Unexpected(err)
    }
}

impl<E: fmt::Display> fmt::Display for CheckedError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(err) => err.fmt(f),
            Self::Unexpected(err) => err.fmt(f),
        }
    }
}

impl<E: Error + 'static> Error for CheckedError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Expected(err) => err.source(),
            Self::Unexpected(err) => err.source(),
        }
    }
}
