//! A headless device that renders only when asked.

use super::{AudioDevice, AudioHost, DeviceError, DeviceState, GainRamp, Mixer, SourceId};
use crate::synthesis::SampleBuffer;
use std::sync::Arc;

const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Opens [`OfflineDevice`]s.
///
/// Devices start suspended by default, like an output that waits for a user
/// gesture before it may play.
#[derive(Debug, Clone)]
pub struct OfflineHost {
    sample_rate: u32,
    start_suspended: bool,
    opened: usize,
}

impl Default for OfflineHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OfflineHost {
    pub fn new() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            start_suspended: true,
            opened: 0,
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Opens devices already running.
    pub fn starting_running(mut self) -> Self {
        self.start_suspended = false;
        self
    }

    /// Number of devices opened so far.
    pub fn opened(&self) -> usize {
        self.opened
    }
}

impl AudioHost for OfflineHost {
    type Device = OfflineDevice;

    fn open(&mut self) -> Result<OfflineDevice, DeviceError> {
        self.opened += 1;
        let state = if self.start_suspended {
            DeviceState::Suspended
        } else {
            DeviceState::Running
        };
        Ok(OfflineDevice {
            mixer: Mixer::new(self.sample_rate),
            state,
        })
    }
}

/// Device backed by a [`Mixer`] that is pulled with [`render`](Self::render).
pub struct OfflineDevice {
    mixer: Mixer,
    state: DeviceState,
}

impl OfflineDevice {
    /// Renders `frames` interleaved frames. A device that is not running
    /// produces silence and does not advance its sources.
    pub fn render(&mut self, frames: usize, channels: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * channels];
        if self.state == DeviceState::Running {
            self.mixer.render_interleaved(&mut out, channels);
        }
        out
    }

    pub fn source_count(&self) -> usize {
        self.mixer.source_count()
    }

    pub fn contains(&self, source: SourceId) -> bool {
        self.mixer.contains(source)
    }

    pub fn gain(&self, source: SourceId) -> Option<f32> {
        self.mixer.gain(source)
    }

    fn ensure_open(&self) -> Result<(), DeviceError> {
        match self.state {
            DeviceState::Closed => Err(DeviceError::Closed),
            _ => Ok(()),
        }
    }
}

impl AudioDevice for OfflineDevice {
    fn state(&self) -> DeviceState {
        self.state
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        self.ensure_open()?;
        self.state = DeviceState::Running;
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.mixer.sample_rate()
    }

    fn start_source(
        &mut self,
        buffer: Arc<SampleBuffer>,
        looping: bool,
        initial_gain: f32,
        ramp: GainRamp,
    ) -> Result<SourceId, DeviceError> {
        self.ensure_open()?;
        Ok(self.mixer.add(buffer, looping, initial_gain, ramp))
    }

    fn ramp_gain(&mut self, source: SourceId, ramp: GainRamp) -> Result<(), DeviceError> {
        self.ensure_open()?;
        self.mixer.ramp(source, ramp)
    }

    fn stop_source(&mut self, source: SourceId) -> Result<(), DeviceError> {
        self.ensure_open()?;
        self.mixer.remove(source)
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        self.ensure_open()?;
        self.mixer.clear();
        self.state = DeviceState::Closed;
        Ok(())
    }
}
