//! Ambient sound playback.
//!
//! [`PlaybackController`] owns at most one looping source and drives its
//! fades. Audio output sits behind the [`AudioHost`] / [`AudioDevice`]
//! traits:
//!
//! - [`OfflineHost`] renders into memory and is what tests use
//! - `CpalHost` (feature `cpal`) plays through the default output device
//!
//! Nothing here spawns timers. Fades and deferred releases advance only when
//! the owner calls [`PlaybackController::update`].

mod controller;
mod device;
mod envelope;
mod mixer;
mod offline;
mod scheduler;

#[cfg(feature = "cpal")]
mod cpal_device;

pub use controller::{
    DEFAULT_FADE_IN, DEFAULT_FADE_OUT, PLAYBACK_GAIN, PlaybackController, PlaybackHandle,
    PlaybackStatus,
};
pub use device::{AudioDevice, AudioHost, DeviceError, DeviceState, SourceId};
pub use envelope::{GainEnvelope, GainRamp};
pub use mixer::Mixer;
pub use offline::{OfflineDevice, OfflineHost};
pub use scheduler::{Scheduler, TaskId};

#[cfg(feature = "cpal")]
pub use cpal_device::{CpalDevice, CpalHost};
