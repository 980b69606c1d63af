//! Configuration errors surfaced to the caller.
//!
//! Device-level failures live in [`crate::playback::DeviceError`]; they are
//! absorbed by the playback controller and never reach this type.

use thiserror::Error;

/// Errors returned when a breathing session is configured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Every phase duration is zero, so no phase can ever be entered.
    #[error("breathing pattern has no phase with a positive duration")]
    EmptyPattern,

    /// A phase duration is negative, NaN or infinite.
    #[error("invalid duration {value} for phase {phase}")]
    InvalidPhaseDuration {
        /// Label of the offending phase
        phase: &'static str,
        /// The rejected value in seconds
        value: f64,
    },

    /// The session length is not a positive, finite number of minutes.
    #[error("session duration must be a positive number of minutes, got {0}")]
    InvalidDuration(f64),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
