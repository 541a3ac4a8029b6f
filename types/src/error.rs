//! Wrapped error taxonomy.
//!
//! Every failure that Vessel synthesizes on its own (as opposed to an error
//! value supplied by the caller) is a [`WrapperError`]. The message is
//! formatted exactly once, in the constructor, so repeated `Display` calls
//! never re-render the cause chain.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable discriminant of a [`WrapperError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    // Optional side
    ValueAccessedOnAbsent,
    ExpectCalledOnAbsent,
    UnwrapCalledOnAbsent,
    PredicateException,

    // Outcome side
    UnwrapCalledOnFailure,
    ExpectCalledOnFailure,
    UnwrapErrCalledOnSuccess,
    ExpectErrCalledOnSuccess,
    PendingRejection,
    FromOptionalConversion,
    Unexpected,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValueAccessedOnAbsent => "value-accessed-on-absent",
            Self::ExpectCalledOnAbsent => "expect-called-on-absent",
            Self::UnwrapCalledOnAbsent => "unwrap-called-on-absent",
            Self::PredicateException => "predicate-exception",
            Self::UnwrapCalledOnFailure => "unwrap-called-on-failure",
            Self::ExpectCalledOnFailure => "expect-called-on-failure",
            Self::UnwrapErrCalledOnSuccess => "unwrap-err-called-on-success",
            Self::ExpectErrCalledOnSuccess => "expect-err-called-on-success",
            Self::PendingRejection => "pending-rejection",
            Self::FromOptionalConversion => "from-optional-conversion",
            Self::Unexpected => "unexpected",
        }
    }

    /// Message used when the caller does not supply one.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ValueAccessedOnAbsent => "`value`: accessed on `Absent`",
            Self::ExpectCalledOnAbsent => "`expect`: called on `Absent`",
            Self::UnwrapCalledOnAbsent => "`unwrap`: called on `Absent`",
            Self::PredicateException => "callback panicked",
            Self::UnwrapCalledOnFailure => "`unwrap`: called on `Failure`",
            Self::ExpectCalledOnFailure => "`expect`: called on `Failure`",
            Self::UnwrapErrCalledOnSuccess => "`unwrap_err`: called on `Success`",
            Self::ExpectErrCalledOnSuccess => "`expect_err`: called on `Success`",
            Self::PendingRejection => "pending future rejected",
            Self::FromOptionalConversion => "`ok_or_else`: error factory panicked",
            Self::Unexpected => "unexpected failure",
        }
    }

    /// Whether this kind is raised by the optional container.
    #[must_use]
    pub const fn is_optional_side(self) -> bool {
        matches!(
            self,
            Self::ValueAccessedOnAbsent
                | Self::ExpectCalledOnAbsent
                | Self::UnwrapCalledOnAbsent
                | Self::PredicateException
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured panic payload.
///
/// Panics carry `&'static str` or `String` payloads in practice; anything else
/// is recorded with a fixed placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PanicError {
    message: String,
}

impl PanicError {
    pub const NON_STRING_PAYLOAD: &'static str = "non-string panic payload";

    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        if let Some(message) = payload.downcast_ref::<&'static str>() {
            Self::new(*message)
        } else if let Some(message) = payload.downcast_ref::<String>() {
            Self::new(message.clone())
        } else if let Some(wrapped) = payload.downcast_ref::<WrapperError>() {
            Self::new(wrapped.message())
        } else {
            Self::new(Self::NON_STRING_PAYLOAD)
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The reason attached to a [`WrapperError`].
#[derive(Debug, Clone, Error)]
pub enum Cause {
    /// Another Vessel error, cloned into the chain.
    #[error(transparent)]
    Wrapped(Box<WrapperError>),
    /// Any other error object.
    #[error(transparent)]
    Foreign(Arc<dyn Error + Send + Sync + 'static>),
}

impl Cause {
    #[must_use]
    pub fn foreign(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Foreign(Arc::new(err))
    }

    #[must_use]
    pub fn from_boxed(err: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self::Foreign(Arc::from(err))
    }

    #[must_use]
    pub fn as_wrapped(&self) -> Option<&WrapperError> {
        match self {
            Self::Wrapped(inner) => Some(&**inner),
            Self::Foreign(_) => None,
        }
    }

    /// Downcast a foreign cause to a concrete error type.
    #[must_use]
    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        match self {
            Self::Wrapped(_) => None,
            Self::Foreign(inner) => inner.downcast_ref::<T>(),
        }
    }
}

impl From<WrapperError> for Cause {
    fn from(err: WrapperError) -> Self {
        Self::Wrapped(Box::new(err))
    }
}

impl From<PanicError> for Cause {
    fn from(err: PanicError) -> Self {
        Self::foreign(err)
    }
}

/// Error synthesized by the containers themselves.
///
/// # Invariants
///
/// - `message` already embeds the cause text, if any
/// - `kind` never changes after construction
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct WrapperError {
    kind: ErrorKind,
    message: String,
    #[source]
    reason: Option<Cause>,
}

impl WrapperError {
    /// Error with the kind's default message and no cause.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self::build(kind, kind.default_message().to_string(), None)
    }

    #[must_use]
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::build(kind, message.into(), None)
    }

    /// Error with the kind's default message followed by the cause.
    #[must_use]
    pub fn caused_by(kind: ErrorKind, cause: impl Into<Cause>) -> Self {
        Self::build(kind, kind.default_message().to_string(), Some(cause.into()))
    }

    #[must_use]
    pub fn with_message_and_cause(
        kind: ErrorKind,
        message: impl Into<String>,
        cause: impl Into<Cause>,
    ) -> Self {
        Self::build(kind, message.into(), Some(cause.into()))
    }

    fn build(kind: ErrorKind, base: String, reason: Option<Cause>) -> Self {
        let message = match &reason {
            Some(cause) => format!("{base}: {cause}"),
            None => base,
        };
        Self {
            kind,
            message,
            reason,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn reason(&self) -> Option<&Cause> {
        self.reason.as_ref()
    }

    /// Walk the chain of wrapped causes, starting with `self`.
    pub fn chain(&self) -> impl Iterator<Item = &WrapperError> {
        std::iter::successors(Some(self), |err| {
            err.reason.as_ref().and_then(Cause::as_wrapped)
        })
    }

    /// Innermost cause that is not itself a [`WrapperError`].
    #[must_use]
    pub fn root_cause(&self) -> Option<&Cause> {
        self.chain()
            .last()
            .and_then(|innermost| innermost.reason.as_ref())
            .filter(|cause| cause.as_wrapped().is_none())
    }
}

impl PartialEq for WrapperError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message
    }
}

impl Eq for WrapperError {}
