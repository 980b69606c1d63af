//! Fixed-rate breathing phase state machine.

use super::{HapticMode, Pattern, Phase};
use crate::{Error, Result};
use std::time::Duration;

/// Interval between two engine ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

const TICKS_PER_SECOND: f64 = 10.0;
const DEFAULT_DURATION_MINUTES: f64 = 3.0;
// Largest progress ever reported, so a phase never reads as finished early.
const PROGRESS_CEILING: f64 = 99.999_999;

/// Notifications produced by [`SessionEngine::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Emitted on every tick with the phase and its progress in `[0, 100)`.
    PhaseChange { phase: Phase, progress: f64 },
    /// Emitted when a new phase begins; the slice is a vibration pattern in ms.
    HapticPulse(&'static [u32]),
    /// Emitted once, on the tick where the remaining time reaches zero.
    Complete,
}

/// Read-only snapshot of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    /// Percentage of the current phase elapsed, in `[0, 100)`
    pub phase_progress: f64,
    pub seconds_remaining: f64,
    pub active: bool,
}

/// Breathing session state machine driven by 100 ms ticks.
///
/// Phases and the session end on whole tick counts so a 4 s phase always
/// lasts exactly 40 ticks and a 2 minute session exactly 1200. Reported
/// progress and remaining time use the exact configured durations.
///
/// # Examples
///
/// ```
/// use stillwater::{Pattern, Phase, SessionEngine, SessionEvent};
/// use std::time::Duration;
///
/// let mut engine = SessionEngine::new();
/// engine.start(Pattern::BOX, 2.0).unwrap();
///
/// let mut events = Vec::new();
/// engine.update(Duration::from_secs(4), &mut events);
///
/// assert_eq!(engine.phase(), Phase::HoldIn);
/// assert!(events.contains(&SessionEvent::HapticPulse(&[30])));
/// assert_eq!(engine.seconds_remaining(), 116.0);
/// ```
#[derive(Debug, Clone)]
pub struct SessionEngine {
    pattern: Pattern,
    duration_minutes: f64,
    haptic_mode: HapticMode,

    phase: Phase,
    phase_ticks: u32,
    session_seconds: f64,
    elapsed_ticks: u64,
    total_ticks: u64,
    active: bool,
    completed: bool,

    // time handed to `update` that has not yet filled a tick
    pending: Duration,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEngine {
    /// Creates an idle engine configured for a 3 minute box session.
    pub fn new() -> Self {
        let duration_minutes = DEFAULT_DURATION_MINUTES;
        Self {
            pattern: Pattern::BOX,
            duration_minutes,
            haptic_mode: HapticMode::Normal,
            phase: Phase::Inhale,
            phase_ticks: 0,
            session_seconds: duration_minutes * 60.0,
            elapsed_ticks: 0,
            total_ticks: total_ticks(duration_minutes),
            active: false,
            completed: false,
            pending: Duration::ZERO,
        }
    }

    /// Sets the haptic pulse flavour.
    pub fn with_haptic_mode(mut self, mode: HapticMode) -> Self {
        self.haptic_mode = mode;
        self
    }

    /// Changes the haptic pulse flavour; takes effect at the next transition.
    pub fn set_haptic_mode(&mut self, mode: HapticMode) {
        self.haptic_mode = mode;
    }

    /// Starts (or resumes) a session.
    ///
    /// Calling `start` on an active engine does nothing. After a
    /// [`pause`](Self::pause), starting with the same pattern and duration
    /// resumes from where the session stopped; any other configuration, or a
    /// completed session, begins again from the first inhale.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern has no positive phase, contains an
    /// invalid duration, or if `duration_minutes` is not positive and finite.
    pub fn start(&mut self, pattern: Pattern, duration_minutes: f64) -> Result<()> {
        check_config(&pattern, duration_minutes)?;
        if self.active {
            return Ok(());
        }

        let same_session = self.pattern == pattern && self.duration_minutes == duration_minutes;
        if !same_session || self.completed {
            self.pattern = pattern;
            self.duration_minutes = duration_minutes;
            self.reset();
        }
        log::debug!(
            "breathing session started: {:?}, {} min, {:.1}s left",
            self.pattern,
            self.duration_minutes,
            self.seconds_remaining()
        );
        self.active = true;
        Ok(())
    }

    /// Replaces the pattern and duration and returns to the first inhale,
    /// stopping the session if it was running.
    ///
    /// # Errors
    ///
    /// Fails on the same inputs as [`start`](Self::start); the engine is left
    /// untouched in that case.
    pub fn configure(&mut self, pattern: Pattern, duration_minutes: f64) -> Result<()> {
        check_config(&pattern, duration_minutes)?;
        self.pattern = pattern;
        self.duration_minutes = duration_minutes;
        self.reset();
        Ok(())
    }

    /// Advances the session by one 100 ms step.
    ///
    /// Does nothing unless the session is active.
    pub fn tick(&mut self, events: &mut Vec<SessionEvent>) {
        if !self.active {
            return;
        }

        self.phase_ticks += 1;
        if self.phase_ticks >= self.pattern.ticks(self.phase) {
            self.phase = self.pattern.next_phase(self.phase);
            self.phase_ticks = 0;
            events.push(SessionEvent::HapticPulse(self.haptic_mode.pulse()));
        }

        self.elapsed_ticks += 1;
        events.push(SessionEvent::PhaseChange {
            phase: self.phase,
            progress: self.phase_progress(),
        });

        if self.elapsed_ticks >= self.total_ticks {
            self.active = false;
            self.completed = true;
            self.pending = Duration::ZERO;
            log::debug!("breathing session complete");
            events.push(SessionEvent::Complete);
        }
    }

    /// Runs as many ticks as fit in the elapsed time plus any carried remainder.
    pub fn update(&mut self, delta: Duration, events: &mut Vec<SessionEvent>) {
        if !self.active {
            return;
        }
        self.pending += delta;
        while self.active && self.pending >= TICK_INTERVAL {
            self.pending -= TICK_INTERVAL;
            self.tick(events);
        }
    }

    /// Stops ticking without losing the current position.
    pub fn pause(&mut self) {
        self.active = false;
        self.pending = Duration::ZERO;
    }

    /// Returns to the initial state for the configured duration.
    pub fn reset(&mut self) {
        self.phase = Phase::Inhale;
        self.phase_ticks = 0;
        self.session_seconds = self.duration_minutes * 60.0;
        self.elapsed_ticks = 0;
        self.total_ticks = total_ticks(self.duration_minutes);
        self.active = false;
        self.completed = false;
        self.pending = Duration::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True once the remaining time has reached zero.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    pub fn haptic_mode(&self) -> HapticMode {
        self.haptic_mode
    }

    /// Percentage of the current phase elapsed, in `[0, 100)`.
    pub fn phase_progress(&self) -> f64 {
        let exact = self.pattern.duration(self.phase) * TICKS_PER_SECOND;
        if exact <= 0.0 {
            return 0.0;
        }
        (self.phase_ticks as f64 * 100.0 / exact).min(PROGRESS_CEILING)
    }

    /// Configured session length minus the ticks run so far; zero once complete.
    pub fn seconds_remaining(&self) -> f64 {
        if self.elapsed_ticks >= self.total_ticks {
            return 0.0;
        }
        (self.session_seconds - self.elapsed_ticks as f64 / TICKS_PER_SECOND).max(0.0)
    }

    /// Whole seconds left in the current phase, rounded up.
    pub fn phase_seconds_left(&self) -> u32 {
        let duration = self.pattern.duration(self.phase);
        (duration * (1.0 - self.phase_progress() / 100.0)).ceil() as u32
    }

    /// Scale factor of the breathing circle for the current state.
    pub fn scale(&self) -> f64 {
        visual_scale(self.phase, self.phase_progress())
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            phase: self.phase,
            phase_progress: self.phase_progress(),
            seconds_remaining: self.seconds_remaining(),
            active: self.active,
        }
    }
}

fn check_config(pattern: &Pattern, duration_minutes: f64) -> Result<()> {
    pattern.validate()?;
    if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
        return Err(Error::InvalidDuration(duration_minutes));
    }
    Ok(())
}

// Tick on which the session completes: the first one at or past its end.
fn total_ticks(duration_minutes: f64) -> u64 {
    (duration_minutes * 60.0 * TICKS_PER_SECOND - 1e-9)
        .ceil()
        .max(1.0) as u64
}

/// Maps a phase and its progress (0–100) to the breathing circle's scale.
///
/// The circle grows from 1.0 to 1.3 while inhaling, holds at 1.3, shrinks back
/// while exhaling and rests at 1.0.
///
/// # Examples
///
/// ```
/// use stillwater::{visual_scale, Phase};
///
/// assert!((visual_scale(Phase::Inhale, 50.0) - 1.15).abs() < 1e-12);
/// assert_eq!(visual_scale(Phase::HoldOut, 75.0), 1.0);
/// ```
pub fn visual_scale(phase: Phase, progress: f64) -> f64 {
    let t = progress / 100.0;
    match phase {
        Phase::Inhale => 1.0 + 0.3 * t,
        Phase::HoldIn => 1.3,
        Phase::Exhale => 1.3 - 0.3 * t,
        Phase::HoldOut => 1.0,
    }
}

/// Formats a countdown as `m:ss`.
///
/// # Examples
///
/// ```
/// use stillwater::format_clock;
///
/// assert_eq!(format_clock(125.7), "2:05");
/// assert_eq!(format_clock(0.0), "0:00");
/// ```
pub fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}
