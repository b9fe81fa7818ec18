//! Devfeat Telemetry - logging setup for the devfeat toolchain.
//!
//! Library crates emit `tracing` events; front ends call [`setup_logging`]
//! once at startup. Logs go to stderr by default so stdout stays free for
//! command output.
//!
//! # Example
//!
//! ```rust,no_run
//! use devfeat_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), devfeat_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("devfeat_package=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("Packaging started");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

#[cfg(feature = "config")]
mod bridge;
mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileRotation, LogConfig, LogFormat, LogTarget, setup_logging,
};
