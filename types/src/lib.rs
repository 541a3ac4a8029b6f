//! Core value types for Vessel.
//!
//! This crate holds the error taxonomy shared by every container and the
//! rendering helpers their `Display` implementations use. No IO, no async.

mod checked;
mod error;
mod stringify;

pub use checked::CheckedError;
pub use error::{Cause, ErrorKind, PanicError, WrapperError};
pub use stringify::{Json, PENDING_PLACEHOLDER, UNSERIALIZABLE, stringify, write_variant};
