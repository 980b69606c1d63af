//! Wind chime: randomly timed strikes of bell-like pentatonic tones.

use rand::Rng;
use std::f64::consts::TAU;

/// Strikes per loop.
pub const STRIKES: usize = 15;

/// Pitches a strike can pick from (C5 pentatonic up to C6), in Hz.
pub const CHIME_FREQUENCIES: [f64; 6] = [523.25, 587.33, 659.25, 783.99, 880.0, 1046.5];

const MIN_RING_SECONDS: f64 = 0.8;
const MAX_RING_SECONDS: f64 = 2.3;
const DECAY_RATE: f64 = 3.0;
const PARTIALS: [(f64, f64); 3] = [(1.0, 0.5), (2.0, 0.2), (3.0, 0.1)];
const OUTPUT_GAIN: f64 = 0.15;

/// A single chime strike within a loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChimeStrike {
    /// First frame of the strike
    pub offset: usize,
    /// Fundamental frequency in Hz
    pub frequency: f64,
    /// Ring time in seconds
    pub duration: f64,
}

/// Picks [`STRIKES`] strikes for a loop of `frame_count` frames.
///
/// Offsets leave room for the longest possible ring, so every strike decays
/// completely before the loop wraps.
pub fn plan_strikes<R: Rng>(rng: &mut R, sample_rate: u32, frame_count: usize) -> Vec<ChimeStrike> {
    let longest = (MAX_RING_SECONDS * sample_rate as f64).ceil() as usize;
    let latest_offset = frame_count.saturating_sub(longest);
    (0..STRIKES)
        .map(|_| {
            let frequency = CHIME_FREQUENCIES[rng.gen_range(0..CHIME_FREQUENCIES.len())];
            ChimeStrike {
                offset: rng.gen_range(0..=latest_offset),
                frequency,
                duration: rng.gen_range(MIN_RING_SECONDS..MAX_RING_SECONDS),
            }
        })
        .collect()
}

/// Adds one strike into `out`, unscaled.
pub fn render_strike(strike: &ChimeStrike, sample_rate: u32, out: &mut [f64]) {
    let sr = sample_rate as f64;
    let length = (strike.duration * sr) as usize;
    let end = (strike.offset + length).min(out.len());
    for (j, sample) in out[strike.offset.min(end)..end].iter_mut().enumerate() {
        let t = j as f64 / sr;
        let tone: f64 = PARTIALS
            .iter()
            .map(|&(ratio, weight)| (TAU * strike.frequency * ratio * t).sin() * weight)
            .sum();
        *sample += tone * (-DECAY_RATE * t).exp();
    }
}

/// Renders one channel of wind chimes.
pub fn render_wind_chime<R: Rng>(rng: &mut R, sample_rate: u32, frame_count: usize) -> Vec<f32> {
    let mut mix = vec![0.0; frame_count];
    for strike in plan_strikes(rng, sample_rate, frame_count) {
        render_strike(&strike, sample_rate, &mut mix);
    }
    mix.into_iter().map(|s| (s * OUTPUT_GAIN) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SAMPLE_RATE: u32 = 8000;
    const FRAMES: usize = SAMPLE_RATE as usize * 10;

    #[test]
    fn test_plan_fits_in_loop() {
        let mut rng = StdRng::seed_from_u64(21);
        let strikes = plan_strikes(&mut rng, SAMPLE_RATE, FRAMES);
        assert_eq!(strikes.len(), STRIKES);
        for strike in &strikes {
            assert!(CHIME_FREQUENCIES.contains(&strike.frequency));
            assert!((MIN_RING_SECONDS..MAX_RING_SECONDS).contains(&strike.duration));
            let end = strike.offset + (strike.duration * SAMPLE_RATE as f64) as usize;
            assert!(end <= FRAMES);
        }
    }

    #[test]
    fn test_strike_decays() {
        let strike = ChimeStrike {
            offset: 100,
            frequency: 880.0,
            duration: 2.0,
        };
        let mut out = vec![0.0; FRAMES];
        render_strike(&strike, SAMPLE_RATE, &mut out);

        assert!(out[..100].iter().all(|&s| s == 0.0));
        let head = out[100..900].iter().fold(0.0_f64, |m, s| m.max(s.abs()));
        let tail = out[100 + 15000..100 + 16000]
            .iter()
            .fold(0.0_f64, |m, s| m.max(s.abs()));
        assert!(head > 0.3);
        // exp(-3 * 1.875) is about 0.0036
        assert!(tail < head * 0.01);
        assert!(out[100 + 16000..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_strike_truncated_at_buffer_end() {
        let strike = ChimeStrike {
            offset: 90,
            frequency: 523.25,
            duration: 1.0,
        };
        let mut out = vec![0.0; 100];
        render_strike(&strike, SAMPLE_RATE, &mut out);
        assert!(out[91..].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_rendered_channel_bounds() {
        let mut rng = StdRng::seed_from_u64(8);
        let channel = render_wind_chime(&mut rng, SAMPLE_RATE, FRAMES);
        assert_eq!(channel.len(), FRAMES);
        let peak = channel.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.0);
        // 15 strikes at most 0.8 each, scaled by 0.15
        assert!(peak <= (STRIKES as f32) * 0.8 * 0.15);
    }
}
