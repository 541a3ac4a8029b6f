//! Vessel: panic-safe `Optional` and `Outcome` containers.
//!
//! ```
//! use vessel::prelude::*;
//!
//! let port = present("8080")
//!     .map(|raw| raw.parse::<u16>().unwrap())
//!     .filter(|port| *port >= 1024);
//! assert_eq!(port, Optional::Present(8080));
//!
//! // A panicking callback degrades instead of unwinding.
//! let broken = present("http").map(|raw| raw.parse::<u16>().unwrap());
//! assert!(broken.is_absent());
//! ```
//!
//! Call [`init`] once at startup to load the boundary configuration. Without
//! it every knob keeps its default.

pub use vessel_config::{BoundaryConfig, ConfigError, VesselConfig, current as current_config};
pub use vessel_core::{
    Combine, Deferred, Optional, Outcome, PendingOptional, PendingOutcome, absent, combine,
    failure, is_optional, is_outcome, is_pending_optional, is_pending_outcome, pending, present,
    success,
};
pub use vessel_types::{
    Cause, CheckedError, ErrorKind, Json, PENDING_PLACEHOLDER, PanicError, UNSERIALIZABLE,
    WrapperError, stringify,
};
pub use vessel_utils::boundary;

pub mod prelude {
    pub use vessel_core::{
        CheckedError, Combine, Optional, Outcome, PendingOptional, PendingOutcome, absent,
        combine, failure, present, success,
    };
}

/// Load the config from disk and the environment, then install it.
pub fn init() -> Result<(), ConfigError> {
    init_with(VesselConfig::load()?);
    Ok(())
}

/// Install `config` as the process-wide configuration, along with the panic
/// hook that prints uncaught signals and honours `silence_caught_panics`.
/// Only the first installation takes effect.
pub fn init_with(config: VesselConfig) {
    let silence = config.boundary.silence_caught_panics;
    if vessel_config::install(config).is_err() {
        tracing::debug!("Vessel config already installed; keeping the first");
        return;
    }
    boundary::install_quiet_hook();
    tracing::debug!(
        silence_caught_panics = silence,
        log_caught_panics = vessel_config::current().boundary.log_caught_panics,
        "Vessel initialized"
    );
}
