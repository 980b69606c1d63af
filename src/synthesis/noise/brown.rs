//! Brown (red) noise: white noise through a leaky one-pole integrator.

use crate::Signal;

const LEAK: f64 = 0.02;
const NORMALIZE: f64 = 1.0 + LEAK;
const OUTPUT_GAIN: f64 = 3.5;

/// Low-pass filters any noise source into brown noise.
///
/// Computes `y[i] = (y[i-1] + 0.02 * x[i]) / 1.02` starting from `y[-1] = 0`
/// and outputs `3.5 * y[i]`. For inputs in `[-1, 1]` the filter state never
/// leaves `[-1, 1]`, so the output stays within `[-3.5, 3.5]`.
///
/// # Examples
///
/// ```
/// use stillwater::{Signal, synthesis::BrownNoise};
///
/// // A constant input makes the output creep toward 3.5.
/// let mut brown = BrownNoise::new(1.0_f64);
/// let first = brown.next_sample();
/// let second = brown.next_sample();
/// assert!(first > 0.0 && second > first && second < 3.5);
/// ```
pub struct BrownNoise<S: Signal> {
    source: S,
    last: f64,
}

impl<S: Signal> BrownNoise<S> {
    /// Wraps `source`, usually a [`WhiteNoise`](super::WhiteNoise).
    pub fn new(source: S) -> Self {
        Self { source, last: 0.0 }
    }
}

impl<S: Signal> Signal for BrownNoise<S> {
    fn next_sample(&mut self) -> f64 {
        let white = self.source.next_sample();
        self.last = (self.last + LEAK * white) / NORMALIZE;
        self.last * OUTPUT_GAIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::from_fn;
    use crate::synthesis::WhiteNoise;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn run(inputs: &[f64]) -> Vec<f64> {
        let mut iter = inputs.to_vec().into_iter();
        let mut brown = BrownNoise::new(from_fn(move || iter.next().unwrap_or(0.0)));
        (0..inputs.len()).map(|_| brown.next_sample()).collect()
    }

    #[test]
    fn test_matches_recurrence() {
        let inputs = [0.5, -1.0, 0.25, 1.0];
        let outputs = run(&inputs);
        let mut y = 0.0;
        for (input, output) in inputs.iter().zip(&outputs) {
            y = (y + 0.02 * input) / 1.02;
            assert!(approx_eq(*output, y * 3.5));
        }
    }

    #[test]
    fn test_deterministic_for_fixed_input() {
        let inputs: Vec<f64> = (0..500).map(|i| ((i * 37) % 17) as f64 / 8.5 - 1.0).collect();
        assert_eq!(run(&inputs), run(&inputs));
    }

    #[test]
    fn test_first_sample() {
        let outputs = run(&[1.0]);
        assert!(approx_eq(outputs[0], 0.02 / 1.02 * 3.5));
    }

    #[test]
    fn test_saturating_input_stays_bounded() {
        let inputs = vec![1.0; 5000];
        let outputs = run(&inputs);
        assert!(outputs.windows(2).all(|w| w[1] >= w[0]));
        assert!(outputs.iter().all(|&s| s <= 3.5));
        // After thousands of samples at full scale the level is close to the bound.
        assert!(outputs[4999] > 3.49);
    }

    #[test]
    fn test_random_input_bounded() {
        let mut brown = BrownNoise::new(WhiteNoise::new());
        for _ in 0..44100 {
            let s = brown.next_sample();
            assert!((-3.5..=3.5).contains(&s));
        }
    }

    #[test]
    fn test_mostly_low_frequency() {
        // Brown noise changes slowly: consecutive samples differ far less than
        // the signal itself swings.
        let mut brown = BrownNoise::new(WhiteNoise::new());
        let samples: Vec<f64> = (0..44100).map(|_| brown.next_sample()).collect();
        let max_step = samples
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0, f64::max);
        assert!(max_step <= 2.0 * 0.02 / 1.02 * 3.5 + EPSILON);
    }
}
