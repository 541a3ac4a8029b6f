//! Containers for Vessel.
//!
//! - [`Optional`]: present or absent
//! - [`Outcome`]: success, or failure with a [`CheckedError`]
//! - [`PendingOptional`] / [`PendingOutcome`]: the same, resolved later
//!
//! Callbacks handed to the safe combinators never unwind into the caller.
//! See `vessel_utils::boundary` for the policy.

mod identity;
mod optional;
mod outcome;
pub mod pending;

pub use identity::{is_optional, is_outcome, is_pending_optional, is_pending_outcome};
pub use optional::Optional;
pub use outcome::Outcome;
pub use pending::{Combine, Deferred, PendingOptional, PendingOutcome, combine};
pub use vessel_types::{CheckedError, ErrorKind, WrapperError};

pub fn present<T>(value: T) -> Optional<T> {
    Optional::Present(value)
}

pub fn absent<T>() -> Optional<T> {
    Optional::Absent
}

pub fn success<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Success(value)
}

pub fn failure<T, E>(err: E) -> Outcome<T, E> {
    Outcome::failure(err)
}
