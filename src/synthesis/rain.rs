//! Rain: a soft noise bed with occasional droplet clicks and a slow swell.

use crate::Signal;
use rand::Rng;

const BED_LEVEL: f64 = 0.3;
const DROP_PROBABILITY: f64 = 0.003;
const DROP_MAX: f64 = 0.5;
const SWELL_DEPTH: f64 = 0.2;
const OUTPUT_GAIN: f64 = 0.5;

/// Rain generator.
///
/// Each sample is `(0.3 * white + drop) * 0.5`, where a droplet of amplitude
/// `U(0, 0.5)` appears with probability 0.003, then scaled by
/// `0.8 + 0.2 * sin(i / (sample_rate * 0.5))`. Output is bounded by 0.4.
pub struct Rain<R: Rng> {
    rng: R,
    sample_rate: f64,
    index: u64,
}

impl<R: Rng> Rain<R> {
    pub fn new(sample_rate: u32, rng: R) -> Self {
        Self {
            rng,
            sample_rate: sample_rate as f64,
            index: 0,
        }
    }

    fn swell(&self) -> f64 {
        let base = 1.0 - SWELL_DEPTH;
        base + SWELL_DEPTH * (self.index as f64 / (self.sample_rate * 0.5)).sin()
    }
}

impl<R: Rng> Signal for Rain<R> {
    fn next_sample(&mut self) -> f64 {
        let noise = self.rng.gen_range(-1.0..1.0);
        let drop = if self.rng.gen_bool(DROP_PROBABILITY) {
            self.rng.gen_range(0.0..DROP_MAX)
        } else {
            0.0
        };
        let sample = (noise * BED_LEVEL + drop) * OUTPUT_GAIN * self.swell();
        self.index += 1;
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SAMPLE_RATE: u32 = 8000;

    #[test]
    fn test_bounded() {
        let mut rain = Rain::new(SAMPLE_RATE, StdRng::seed_from_u64(3));
        for _ in 0..SAMPLE_RATE * 10 {
            let s = rain.next_sample();
            assert!(s.abs() <= 0.4, "sample {s} out of range");
        }
    }

    #[test]
    fn test_droplets_are_sparse_peaks() {
        // Without droplets the bed never exceeds 0.15; droplets push past it.
        let mut rain = Rain::new(SAMPLE_RATE, StdRng::seed_from_u64(11));
        let samples: Vec<f64> = (0..SAMPLE_RATE * 10).map(|_| rain.next_sample()).collect();
        let loud = samples.iter().filter(|s| s.abs() > 0.15).count();
        assert!(loud > 0, "expected some droplets");
        assert!(loud < samples.len() / 100, "droplets should be rare, got {loud}");
    }

    #[test]
    fn test_swell_follows_slow_sine() {
        let mut rain = Rain::new(SAMPLE_RATE, StdRng::seed_from_u64(5));
        assert!((rain.swell() - 0.8).abs() < 1e-12);
        // Quarter period of sin(i / (sr/2)) is at i = (pi/2) * sr/2.
        rain.index = (std::f64::consts::FRAC_PI_2 * SAMPLE_RATE as f64 * 0.5) as u64;
        assert!((rain.swell() - 1.0).abs() < 1e-6);
    }
}
