//! Singing bowl: a sustained inharmonic tone with slow beating.

use crate::Signal;
use std::f64::consts::TAU;

/// Fundamental frequency in Hz (G3).
pub const BOWL_FUNDAMENTAL: f64 = 196.0;

const HARMONICS: [(f64, f64); 5] = [
    (1.0, 0.4),
    (2.0, 0.25),
    (3.0, 0.15),
    (4.2, 0.1),
    (5.4, 0.05),
];
const AMPLITUDE_RATE: f64 = 0.5;
const AMPLITUDE_DEPTH: f64 = 0.2;
const PITCH_RATE: f64 = 0.3;
const PITCH_DEPTH: f64 = 0.002;
const OUTPUT_GAIN: f64 = 0.4;

/// Singing bowl tone generator.
///
/// Five partials at ratios `1, 2, 3, 4.2, 5.4` share a pitch wobble of
/// `1 + 0.002 * sin(2π * 0.3 * t)`; the sum swells with
/// `0.8 + 0.2 * sin(2π * 0.5 * t)` and is scaled by 0.4. Each partial keeps
/// its own phase accumulator so the wobble bends pitch without phase jumps.
///
/// The generator is fully deterministic.
pub struct SingingBowl {
    sample_rate: f64,
    index: u64,
    phases: [f64; HARMONICS.len()],
}

impl SingingBowl {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate as f64,
            index: 0,
            phases: [0.0; HARMONICS.len()],
        }
    }
}

impl Signal for SingingBowl {
    fn next_sample(&mut self) -> f64 {
        let t = self.index as f64 / self.sample_rate;
        let pitch = 1.0 + PITCH_DEPTH * (TAU * PITCH_RATE * t).sin();
        let swell = 1.0 - AMPLITUDE_DEPTH + AMPLITUDE_DEPTH * (TAU * AMPLITUDE_RATE * t).sin();

        let mut tone = 0.0;
        for ((ratio, weight), phase) in HARMONICS.iter().zip(self.phases.iter_mut()) {
            tone += (TAU * *phase).sin() * weight;
            *phase += BOWL_FUNDAMENTAL * ratio * pitch / self.sample_rate;
            // upper partials can step more than a cycle at low sample rates
            *phase -= phase.floor();
        }

        self.index += 1;
        tone * swell * OUTPUT_GAIN
    }
}
