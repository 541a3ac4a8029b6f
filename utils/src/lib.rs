//! Shared infrastructure utilities for Vessel.
//!
//! This crate provides the cross-cutting pieces the container crate needs but
//! that don't belong in the domain-pure `vessel-types` crate:
//!
//! - **`boundary`**: the panic boundary behind every safe combinator, and the
//!   signalling path for the `unwrap`/`expect` family

pub mod boundary;

pub use boundary::{Caught, catch, catch_async, catch_future, install_quiet_hook, signal};
