//! Fixed-length multi-channel sample storage.

use crate::Signal;
use std::time::Duration;

/// Length of every synthesized loop, in seconds.
pub const LOOP_SECONDS: u32 = 10;

/// Channel count of every synthesized buffer.
pub const CHANNELS: usize = 2;

/// Number of frames in one loop at `sample_rate`.
pub fn loop_frames(sample_rate: u32) -> usize {
    sample_rate as usize * LOOP_SECONDS as usize
}

/// Pulls `frame_count` samples from `signal` into one channel.
pub fn render_channel<S: Signal>(mut signal: S, frame_count: usize) -> Vec<f32> {
    (0..frame_count).map(|_| signal.next_sample() as f32).collect()
}

/// An immutable block of de-interleaved samples.
///
/// Buffers are produced once by the synthesizer and then only read, so they
/// are shared between the controller and a device's render thread behind an
/// `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    frame_count: usize,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Wraps already rendered channels.
    ///
    /// Every channel is truncated or zero-padded to the loop length.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        let frame_count = loop_frames(sample_rate);
        let channels = channels
            .into_iter()
            .map(|mut data| {
                data.resize(frame_count, 0.0);
                data
            })
            .collect();
        Self {
            sample_rate,
            frame_count,
            channels,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples of one channel, or `None` if the index is out of range.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Sample at `frame` of `channel`, wrapping both indices.
    ///
    /// Used by renderers that map a stereo buffer onto any output layout.
    pub fn sample_wrapped(&self, channel: usize, frame: usize) -> f32 {
        if self.channels.is_empty() || self.frame_count == 0 {
            return 0.0;
        }
        let data = &self.channels[channel % self.channels.len()];
        data[frame % self.frame_count]
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count as f64 / self.sample_rate as f64)
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flatten()
            .fold(0.0_f32, |peak, s| peak.max(s.abs()))
    }

    /// Root-mean-square level of one channel.
    pub fn rms(&self, channel: usize) -> f64 {
        match self.channel(channel) {
            Some(data) if !data.is_empty() => {
                let sum: f64 = data.iter().map(|&s| (s as f64) * (s as f64)).sum();
                (sum / data.len() as f64).sqrt()
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_buffer(sample_rate: u32, left: f64, right: f64) -> SampleBuffer {
        let frames = loop_frames(sample_rate);
        SampleBuffer::from_channels(
            sample_rate,
            vec![render_channel(left, frames), render_channel(right, frames)],
        )
    }

    #[test]
    fn test_loop_shape() {
        let buffer = constant_buffer(100, 0.0, 1.0);
        assert_eq!(buffer.frame_count(), 1000);
        assert_eq!(buffer.channel_count(), 2);
        assert!(buffer.channel(0).unwrap().iter().all(|&s| s == 0.0));
        assert!(buffer.channel(1).unwrap().iter().all(|&s| s == 1.0));
        assert_eq!(buffer.duration(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_channels_pads_and_truncates() {
        let buffer = SampleBuffer::from_channels(10, vec![vec![0.5; 3], vec![0.25; 500]]);
        assert_eq!(buffer.channel(0).unwrap().len(), 100);
        assert_eq!(buffer.channel(0).unwrap()[2], 0.5);
        assert_eq!(buffer.channel(0).unwrap()[3], 0.0);
        assert_eq!(buffer.channel(1).unwrap().len(), 100);
    }

    #[test]
    fn test_sample_wrapped() {
        let buffer = SampleBuffer::from_channels(1, vec![(0..10).map(|i| i as f32).collect()]);
        assert_eq!(buffer.sample_wrapped(0, 12), 2.0);
        assert_eq!(buffer.sample_wrapped(1, 3), 3.0);
    }

    #[test]
    fn test_peak_and_rms() {
        let buffer = constant_buffer(10, 0.5, -0.75);
        assert_eq!(buffer.peak(), 0.75);
        assert!((buffer.rms(0) - 0.5).abs() < 1e-9);
        assert_eq!(buffer.rms(5), 0.0);
    }
}
