//! Linear gain ramps used for fade in and fade out.

use std::time::Duration;

/// A request to move a gain linearly to `target` over `duration`, starting
/// from whatever level the gain currently has.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainRamp {
    pub target: f32,
    pub duration: Duration,
}

impl GainRamp {
    pub fn new(target: f32, duration: Duration) -> Self {
        Self { target, duration }
    }
}

/// Time-varying gain multiplier.
///
/// Holds a single linear segment from the level at which the last ramp was
/// requested to its target. Advancing past the end of the segment holds the
/// target.
///
/// # Examples
///
/// ```
/// use stillwater::playback::{GainEnvelope, GainRamp};
/// use std::time::Duration;
///
/// let mut env = GainEnvelope::new(0.0);
/// env.ramp(GainRamp::new(0.3, Duration::from_secs(2)));
/// env.advance(Duration::from_secs(1));
/// assert!((env.level() - 0.15).abs() < 1e-6);
///
/// env.advance(Duration::from_secs(5));
/// assert_eq!(env.level(), 0.3);
/// assert!(env.is_settled());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GainEnvelope {
    start_level: f32,
    target_level: f32,
    duration_secs: f64,
    elapsed_secs: f64,
}

impl GainEnvelope {
    /// Creates an envelope holding `level`.
    pub fn new(level: f32) -> Self {
        Self {
            start_level: level,
            target_level: level,
            duration_secs: 0.0,
            elapsed_secs: 0.0,
        }
    }

    /// Starts a new segment from the current level.
    pub fn ramp(&mut self, ramp: GainRamp) {
        self.start_level = self.level();
        self.target_level = ramp.target;
        self.duration_secs = ramp.duration.as_secs_f64();
        self.elapsed_secs = 0.0;
    }

    /// Moves time forward.
    pub fn advance(&mut self, delta: Duration) {
        self.advance_secs(delta.as_secs_f64());
    }

    /// Moves time forward by a fractional number of seconds.
    ///
    /// Renderers call this once per frame with `1 / sample_rate`.
    pub fn advance_secs(&mut self, secs: f64) {
        if !self.is_settled() {
            self.elapsed_secs += secs;
        }
    }

    /// Current gain.
    pub fn level(&self) -> f32 {
        if self.is_settled() {
            return self.target_level;
        }
        let t = (self.elapsed_secs / self.duration_secs) as f32;
        self.start_level + (self.target_level - self.start_level) * t
    }

    /// Level the current segment ends at.
    pub fn target(&self) -> f32 {
        self.target_level
    }

    /// True once the current segment has finished.
    pub fn is_settled(&self) -> bool {
        self.elapsed_secs >= self.duration_secs
    }
}
