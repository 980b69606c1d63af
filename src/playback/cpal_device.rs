//! Real output through the system's default device, via cpal.

use super::{AudioDevice, AudioHost, DeviceError, DeviceState, GainRamp, Mixer, SourceId};
use crate::synthesis::SampleBuffer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Opens the default cpal output device.
pub struct CpalHost {
    host: cpal::Host,
}

impl Default for CpalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl CpalHost {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }
}

impl AudioHost for CpalHost {
    type Device = CpalDevice;

    fn open(&mut self) -> Result<CpalDevice, DeviceError> {
        let device = self
            .host
            .default_output_device()
            .ok_or(DeviceError::Unavailable)?;
        let supported = device
            .default_output_config()
            .map_err(|e| DeviceError::Stream(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;
        let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate)));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer.clone())?,
            other => {
                return Err(DeviceError::Stream(format!(
                    "unsupported sample format: {other}"
                )));
            }
        };
        // Some backends start streams on creation; hold it until resumed.
        stream
            .pause()
            .map_err(|e| DeviceError::Stream(e.to_string()))?;

        log::debug!(
            "opened cpal output: {} Hz, {} channels, {:?}",
            sample_rate,
            config.channels,
            sample_format
        );
        Ok(CpalDevice {
            stream: Some(stream),
            mixer,
            sample_rate,
            state: DeviceState::Suspended,
        })
    }
}

/// A cpal output stream fed by a shared [`Mixer`].
pub struct CpalDevice {
    stream: Option<cpal::Stream>,
    mixer: Arc<Mutex<Mixer>>,
    sample_rate: u32,
    state: DeviceState,
}

impl CpalDevice {
    fn mixer(&self) -> Result<MutexGuard<'_, Mixer>, DeviceError> {
        if self.state == DeviceState::Closed {
            return Err(DeviceError::Closed);
        }
        // The render thread may have panicked while holding the lock.
        Ok(self.mixer.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl AudioDevice for CpalDevice {
    fn state(&self) -> DeviceState {
        self.state
    }

    fn resume(&mut self) -> Result<(), DeviceError> {
        let stream = self.stream.as_ref().ok_or(DeviceError::Closed)?;
        stream
            .play()
            .map_err(|e| DeviceError::Resume(e.to_string()))?;
        self.state = DeviceState::Running;
        Ok(())
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn start_source(
        &mut self,
        buffer: Arc<SampleBuffer>,
        looping: bool,
        initial_gain: f32,
        ramp: GainRamp,
    ) -> Result<SourceId, DeviceError> {
        Ok(self.mixer()?.add(buffer, looping, initial_gain, ramp))
    }

    fn ramp_gain(&mut self, source: SourceId, ramp: GainRamp) -> Result<(), DeviceError> {
        self.mixer()?.ramp(source, ramp)
    }

    fn stop_source(&mut self, source: SourceId) -> Result<(), DeviceError> {
        self.mixer()?.remove(source)
    }

    fn close(&mut self) -> Result<(), DeviceError> {
        self.mixer()?.clear();
        let stream = self.stream.take().ok_or(DeviceError::Closed)?;
        let paused = stream.pause();
        drop(stream);
        self.state = DeviceState::Closed;
        paused.map_err(|e| DeviceError::Stream(e.to_string()))
    }
}

/// Creates an output stream that pulls frames from the mixer.
fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<cpal::Stream, DeviceError>
where
    T: Sample + FromSample<f32> + cpal::SizedSample,
{
    let channels = config.channels as usize;
    let mut scratch: Vec<f32> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                {
                    let mut mixer = mixer.lock().unwrap_or_else(PoisonError::into_inner);
                    mixer.render_interleaved(&mut scratch, channels);
                }
                for (out, &sample) in data.iter_mut().zip(scratch.iter()) {
                    *out = T::from_sample(sample);
                }
            },
            |err| log::warn!("audio stream error: {}", err),
            None,
        )
        .map_err(|e| DeviceError::Stream(e.to_string()))
}
