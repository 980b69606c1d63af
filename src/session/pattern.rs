//! Breathing phases, per-phase timing patterns and the named styles built on them.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One of the four breathing states, in their fixed cyclic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Phase {
    Inhale,
    HoldIn,
    Exhale,
    HoldOut,
}

impl Phase {
    /// Cyclic rotation order.
    pub const ORDER: [Phase; 4] = [Phase::Inhale, Phase::HoldIn, Phase::Exhale, Phase::HoldOut];

    /// The phase that follows this one, ignoring durations.
    pub fn successor(self) -> Phase {
        match self {
            Phase::Inhale => Phase::HoldIn,
            Phase::HoldIn => Phase::Exhale,
            Phase::Exhale => Phase::HoldOut,
            Phase::HoldOut => Phase::Inhale,
        }
    }

    /// Prompt shown to the user during this phase.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in",
            Phase::HoldIn => "Hold",
            Phase::Exhale => "Breathe out",
            Phase::HoldOut => "Rest",
        }
    }

    fn field_name(self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::HoldIn => "hold-in",
            Phase::Exhale => "exhale",
            Phase::HoldOut => "hold-out",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Per-phase durations in seconds.
///
/// A zero duration removes the phase from the rotation. At least one phase
/// must be positive; [`Pattern::validate`] enforces this before a session
/// starts.
///
/// # Examples
///
/// ```
/// use stillwater::{Pattern, Phase};
///
/// let pattern = Pattern::LONG_EXHALE;
/// assert_eq!(pattern.next_phase(Phase::Exhale), Phase::Inhale);
/// assert_eq!(pattern.ticks(Phase::Exhale), 80);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Pattern {
    pub inhale: f64,
    pub hold_in: f64,
    pub exhale: f64,
    pub hold_out: f64,
}

impl Pattern {
    /// 4-4-4-4 box breathing.
    pub const BOX: Pattern = Pattern::new(4.0, 4.0, 4.0, 4.0);

    /// 4-2-8 breathing with no rest after the exhale.
    pub const LONG_EXHALE: Pattern = Pattern::new(4.0, 2.0, 8.0, 0.0);

    /// Creates a pattern from its four durations in seconds.
    pub const fn new(inhale: f64, hold_in: f64, exhale: f64, hold_out: f64) -> Self {
        Self {
            inhale,
            hold_in,
            exhale,
            hold_out,
        }
    }

    /// Configured duration of `phase` in seconds.
    pub fn duration(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::HoldIn => self.hold_in,
            Phase::Exhale => self.exhale,
            Phase::HoldOut => self.hold_out,
        }
    }

    /// Total length of one full cycle in seconds.
    pub fn cycle_seconds(&self) -> f64 {
        Phase::ORDER.iter().map(|&p| self.duration(p)).sum()
    }

    /// Checks that every duration is finite and non-negative and that at
    /// least one is positive.
    pub fn validate(&self) -> Result<()> {
        for phase in Phase::ORDER {
            let value = self.duration(phase);
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidPhaseDuration {
                    phase: phase.field_name(),
                    value,
                });
            }
        }
        if Phase::ORDER.iter().all(|&p| self.duration(p) == 0.0) {
            return Err(Error::EmptyPattern);
        }
        Ok(())
    }

    /// The phase entered after `phase`, skipping zero-length phases.
    ///
    /// The search visits each phase at most once. If every other phase is
    /// empty the rotation stays on `phase`.
    pub fn next_phase(&self, phase: Phase) -> Phase {
        let mut candidate = phase.successor();
        for _ in 0..Phase::ORDER.len() {
            if self.duration(candidate) > 0.0 {
                return candidate;
            }
            candidate = candidate.successor();
        }
        phase
    }

    /// Number of 100 ms ticks spent in `phase`.
    ///
    /// Each tick adds `100 / (duration × 10)` percent of progress, so a phase
    /// completes after `duration × 10` ticks (rounded up, at least one).
    pub fn ticks(&self, phase: Phase) -> u32 {
        let exact = self.duration(phase) * 10.0;
        // Tolerate representation error in values such as 0.3 s.
        (exact - 1e-9).ceil().max(1.0) as u32
    }
}

/// Haptic feedback flavour emitted on every phase transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HapticMode {
    /// A single short tap
    #[default]
    Normal,
    /// Three taps, used when the session runs without sound or visuals
    Silent,
}

impl HapticMode {
    /// Vibration pattern in milliseconds (alternating on/off).
    pub fn pulse(self) -> &'static [u32] {
        match self {
            HapticMode::Normal => &[30],
            HapticMode::Silent => &[50, 50, 50],
        }
    }
}

/// Named breathing styles offered by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BreathingStyle {
    #[default]
    Box,
    LongExhale,
    /// Box timing, vibration-only cues
    Silent,
}

impl BreathingStyle {
    /// All styles in display order.
    pub const ALL: [BreathingStyle; 3] = [
        BreathingStyle::Box,
        BreathingStyle::LongExhale,
        BreathingStyle::Silent,
    ];

    pub fn pattern(self) -> Pattern {
        match self {
            BreathingStyle::Box | BreathingStyle::Silent => Pattern::BOX,
            BreathingStyle::LongExhale => Pattern::LONG_EXHALE,
        }
    }

    pub fn haptic_mode(self) -> HapticMode {
        match self {
            BreathingStyle::Silent => HapticMode::Silent,
            BreathingStyle::Box | BreathingStyle::LongExhale => HapticMode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BreathingStyle::Box => "Box Calm",
            BreathingStyle::LongExhale => "Long Exhale",
            BreathingStyle::Silent => "Silent Mode",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BreathingStyle::Box => "4-4-4-4 pattern",
            BreathingStyle::LongExhale => "Extended out-breath",
            BreathingStyle::Silent => "Vibration only",
        }
    }

    /// Identifier used in deep links such as `?pattern=long-exhale`.
    pub fn as_str(self) -> &'static str {
        match self {
            BreathingStyle::Box => "box",
            BreathingStyle::LongExhale => "long-exhale",
            BreathingStyle::Silent => "silent",
        }
    }
}

impl fmt::Display for BreathingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown style identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown breathing style `{0}`")]
pub struct UnknownStyle(pub String);

impl FromStr for BreathingStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BreathingStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}
