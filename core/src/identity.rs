//! Runtime identity checks for type-erased values.

use std::any::Any;

use crate::optional::Optional;
use crate::outcome::Outcome;
use crate::pending::{PendingOptional, PendingOutcome};

pub fn is_optional<T: 'static>(value: &dyn Any) -> bool {
    value.is::<Optional<T>>()
}

pub fn is_outcome<T: 'static, E: 'static>(value: &dyn Any) -> bool {
    value.is::<Outcome<T, E>>()
}

pub fn is_pending_optional<T: 'static>(value: &dyn Any) -> bool {
    value.is::<PendingOptional<T>>()
}

pub fn is_pending_outcome<T: 'static, E: 'static>(value: &dyn Any) -> bool {
    value.is::<PendingOutcome<T, E>>()
}
