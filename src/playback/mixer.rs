//! Sums playing sources into interleaved output frames.

use super::{DeviceError, GainEnvelope, GainRamp, SourceId};
use crate::synthesis::SampleBuffer;
use std::sync::Arc;

struct Voice {
    id: SourceId,
    buffer: Arc<SampleBuffer>,
    position: usize,
    looping: bool,
    gain: GainEnvelope,
}

impl Voice {
    fn finished(&self) -> bool {
        !self.looping && self.position >= self.buffer.frame_count()
    }
}

/// Software mixer shared by the offline and cpal devices.
///
/// Each source is a [`SampleBuffer`] read frame by frame through its own
/// [`GainEnvelope`]. Stereo buffers are mapped onto any output channel count
/// by wrapping the channel index. One-shot sources are dropped once they run
/// out; looping sources wrap to frame zero.
pub struct Mixer {
    sample_rate: u32,
    voices: Vec<Voice>,
    next_id: u64,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            voices: Vec::new(),
            next_id: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Adds a source and returns its id.
    pub fn add(
        &mut self,
        buffer: Arc<SampleBuffer>,
        looping: bool,
        initial_gain: f32,
        ramp: GainRamp,
    ) -> SourceId {
        let id = SourceId::new(self.next_id);
        self.next_id += 1;
        let mut gain = GainEnvelope::new(initial_gain);
        gain.ramp(ramp);
        self.voices.push(Voice {
            id,
            buffer,
            position: 0,
            looping,
            gain,
        });
        id
    }

    pub fn ramp(&mut self, id: SourceId, ramp: GainRamp) -> Result<(), DeviceError> {
        let voice = self
            .voices
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(DeviceError::UnknownSource(id))?;
        voice.gain.ramp(ramp);
        Ok(())
    }

    pub fn remove(&mut self, id: SourceId) -> Result<(), DeviceError> {
        let index = self
            .voices
            .iter()
            .position(|v| v.id == id)
            .ok_or(DeviceError::UnknownSource(id))?;
        self.voices.remove(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.voices.clear();
    }

    pub fn contains(&self, id: SourceId) -> bool {
        self.voices.iter().any(|v| v.id == id)
    }

    pub fn source_count(&self) -> usize {
        self.voices.len()
    }

    /// Current gain of a source.
    pub fn gain(&self, id: SourceId) -> Option<f32> {
        self.voices.iter().find(|v| v.id == id).map(|v| v.gain.level())
    }

    /// Overwrites `out` with `out.len() / channels` mixed frames.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        out.fill(0.0);
        if channels == 0 {
            return;
        }
        let step = 1.0 / self.sample_rate.max(1) as f64;
        for frame in out.chunks_mut(channels) {
            for voice in self.voices.iter_mut().filter(|v| !v.finished()) {
                let level = voice.gain.level();
                for (channel, sample) in frame.iter_mut().enumerate() {
                    *sample += voice.buffer.sample_wrapped(channel, voice.position) * level;
                }
                voice.position += 1;
                if voice.looping && voice.position >= voice.buffer.frame_count() {
                    voice.position = 0;
                }
                voice.gain.advance_secs(step);
            }
        }
        self.voices.retain(|v| !v.finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::{loop_frames, render_channel};
    use std::time::Duration;

    const SAMPLE_RATE: u32 = 10;

    fn constant(value: f64) -> Arc<SampleBuffer> {
        let frames = loop_frames(SAMPLE_RATE);
        Arc::new(SampleBuffer::from_channels(
            SAMPLE_RATE,
            vec![render_channel(value, frames), render_channel(-value, frames)],
        ))
    }

    fn hold(level: f32) -> GainRamp {
        GainRamp::new(level, Duration::ZERO)
    }

    #[test]
    fn test_render_applies_gain_per_channel() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        mixer.add(constant(1.0), true, 0.5, hold(0.5));
        let mut out = vec![0.0; 6];
        mixer.render_interleaved(&mut out, 2);
        assert_eq!(out, vec![0.5, -0.5, 0.5, -0.5, 0.5, -0.5]);
    }

    #[test]
    fn test_sources_are_summed() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        mixer.add(constant(0.5), true, 1.0, hold(1.0));
        mixer.add(constant(0.25), true, 1.0, hold(1.0));
        let mut out = vec![0.0; 2];
        mixer.render_interleaved(&mut out, 2);
        assert_eq!(out, vec![0.75, -0.75]);
    }

    #[test]
    fn test_fade_in_ramps_over_frames() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let id = mixer.add(constant(1.0), true, 0.0, GainRamp::new(1.0, Duration::from_secs(1)));
        let mut out = vec![0.0; 5];
        mixer.render_interleaved(&mut out, 1);
        assert_eq!(out[0], 0.0);
        assert!(out.windows(2).all(|w| w[1] > w[0]));
        assert!((mixer.gain(id).unwrap() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_looping_source_survives_wrap() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let id = mixer.add(constant(1.0), true, 1.0, hold(1.0));
        let mut out = vec![0.0; 250];
        mixer.render_interleaved(&mut out, 1);
        assert!(mixer.contains(id));
        assert!(out.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_one_shot_source_is_dropped_at_end() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let id = mixer.add(constant(1.0), false, 1.0, hold(1.0));
        let mut out = vec![0.0; 120];
        mixer.render_interleaved(&mut out, 1);
        assert!(!mixer.contains(id));
        assert!(out[..100].iter().all(|&s| s == 1.0));
        assert!(out[100..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_unknown_source() {
        let mut mixer = Mixer::new(SAMPLE_RATE);
        let id = mixer.add(constant(1.0), true, 1.0, hold(1.0));
        mixer.remove(id).unwrap();
        assert_eq!(mixer.remove(id), Err(DeviceError::UnknownSource(id)));
        assert_eq!(
            mixer.ramp(id, hold(0.0)),
            Err(DeviceError::UnknownSource(id))
        );
    }
}
