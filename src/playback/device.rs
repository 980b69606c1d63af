//! The seam between the playback controller and an audio output.
//!
//! An [`AudioHost`] opens devices; an [`AudioDevice`] plays looped sources
//! through per-source gain. The controller only talks to these traits, so the
//! same logic drives a real output stream, the headless
//! [`OfflineDevice`](super::OfflineDevice) or a test double.

use super::GainRamp;
use crate::synthesis::SampleBuffer;
use std::sync::Arc;
use thiserror::Error;

/// Lifecycle of an opened device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Open but not rendering; must be resumed before it is audible.
    Suspended,
    Running,
    /// Released; the device cannot be used again.
    Closed,
}

/// Identifies a source started on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Failures reported by hosts and devices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("no audio output device available")]
    Unavailable,

    #[error("audio stream error: {0}")]
    Stream(String),

    #[error("audio device could not be resumed: {0}")]
    Resume(String),

    #[error("audio device is closed")]
    Closed,

    #[error("no source with id {}", .0.raw())]
    UnknownSource(SourceId),
}

/// Opens audio devices.
pub trait AudioHost {
    type Device: AudioDevice;

    /// Opens the default output. Devices may come back [`DeviceState::Suspended`].
    fn open(&mut self) -> Result<Self::Device, DeviceError>;
}

/// An opened audio output.
pub trait AudioDevice {
    fn state(&self) -> DeviceState;

    /// Moves a suspended device to [`DeviceState::Running`].
    fn resume(&mut self) -> Result<(), DeviceError>;

    /// Output sample rate; buffers should be synthesized at this rate.
    fn sample_rate(&self) -> u32;

    /// Starts playing `buffer` at gain `initial_gain`, then applies `ramp`.
    fn start_source(
        &mut self,
        buffer: Arc<SampleBuffer>,
        looping: bool,
        initial_gain: f32,
        ramp: GainRamp,
    ) -> Result<SourceId, DeviceError>;

    /// Ramps the gain of a playing source from its current level.
    fn ramp_gain(&mut self, source: SourceId, ramp: GainRamp) -> Result<(), DeviceError>;

    /// Stops a source immediately.
    fn stop_source(&mut self, source: SourceId) -> Result<(), DeviceError>;

    /// Releases the device. Further calls fail with [`DeviceError::Closed`].
    fn close(&mut self) -> Result<(), DeviceError>;
}
