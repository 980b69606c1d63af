//! Breathing session coordinator: ties the phase engine to ambient playback.

use crate::playback::{AudioHost, PlaybackController};
use crate::session::{BreathingStyle, SessionEngine, SessionEvent, SessionState};
use crate::{AmbientVariant, Preferences, Result};
use std::time::Duration;

/// A breathing session with its ambient soundtrack.
///
/// Starting the session plays the selected ambient sound; pausing, resetting
/// or finishing it fades the sound out. Haptic pulses are filtered through the
/// vibration preference before they reach the caller.
///
/// # Examples
///
/// ```
/// use stillwater::playback::OfflineHost;
/// use stillwater::{AmbientVariant, BreathingSession, Preferences, SessionEvent};
/// use std::time::Duration;
///
/// let prefs = Preferences::default()
///     .with_ambient_sound(AmbientVariant::Rain)
///     .with_preferred_duration(2);
/// let mut session = BreathingSession::new(OfflineHost::new().with_sample_rate(8000), prefs);
/// session.start().unwrap();
/// assert!(session.audio().is_playing());
///
/// let mut events = Vec::new();
/// session.update(Duration::from_secs(120), &mut events);
/// assert_eq!(events.last(), Some(&SessionEvent::Complete));
/// assert!(!session.is_active());
/// session.dispose();
/// ```
pub struct BreathingSession<H: AudioHost> {
    engine: SessionEngine,
    audio: PlaybackController<H>,
    preferences: Preferences,
    style: BreathingStyle,
    duration_minutes: u32,
    ambient: AmbientVariant,
}

impl<H: AudioHost> BreathingSession<H> {
    /// Creates an idle box-breathing session using the preferred duration and
    /// ambient sound.
    pub fn new(host: H, preferences: Preferences) -> Self {
        let style = BreathingStyle::Box;
        let mut engine = SessionEngine::new().with_haptic_mode(style.haptic_mode());
        let preferred = preferences.preferred_duration_minutes as f64;
        if let Err(err) = engine.configure(style.pattern(), preferred) {
            log::warn!("preferred duration rejected, keeping default: {}", err);
        }
        let duration_minutes = engine.duration_minutes() as u32;
        Self {
            engine,
            audio: PlaybackController::new(host).with_sound_enabled(preferences.sound_enabled),
            ambient: preferences.ambient_sound,
            duration_minutes,
            preferences,
            style,
        }
    }

    /// Selects the breathing style.
    pub fn with_style(mut self, style: BreathingStyle) -> Self {
        self.style = style;
        self.reconfigure();
        self
    }

    /// Selects the session length in minutes.
    pub fn with_duration(mut self, minutes: u32) -> Result<Self> {
        self.set_duration(minutes)?;
        Ok(self)
    }

    /// Switches style; a running session starts over.
    pub fn set_style(&mut self, style: BreathingStyle) {
        self.style = style;
        self.reconfigure();
    }

    /// Changes the session length; a running session starts over.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDuration`](crate::Error::InvalidDuration) for a
    /// zero length, leaving the session unchanged.
    pub fn set_duration(&mut self, minutes: u32) -> Result<()> {
        self.engine.configure(self.style.pattern(), minutes as f64)?;
        self.duration_minutes = minutes;
        self.engine.set_haptic_mode(self.style.haptic_mode());
        self.audio.stop();
        Ok(())
    }

    fn reconfigure(&mut self) {
        self.engine.set_haptic_mode(self.style.haptic_mode());
        if let Err(err) = self
            .engine
            .configure(self.style.pattern(), self.engine.duration_minutes())
        {
            log::warn!("could not apply {}: {}", self.style, err);
        }
        self.audio.stop();
    }

    /// Starts or resumes the session.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from [`SessionEngine::start`].
    pub fn start(&mut self) -> Result<()> {
        let was_active = self.engine.is_active();
        self.engine.set_haptic_mode(self.style.haptic_mode());
        self.engine
            .start(self.style.pattern(), self.engine.duration_minutes())?;
        if !was_active {
            self.audio.play(self.ambient);
        }
        Ok(())
    }

    /// Pauses the session and fades the sound out.
    pub fn pause(&mut self) {
        self.engine.pause();
        self.audio.stop();
    }

    /// Returns to the beginning and fades the sound out.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.audio.stop();
    }

    /// Changes the ambient sound, switching immediately if the session runs.
    pub fn set_ambient(&mut self, variant: AmbientVariant) {
        self.ambient = variant;
        if !self.engine.is_active() {
            return;
        }
        if variant.is_silent() {
            self.audio.stop();
        } else {
            self.audio.play(variant);
        }
    }

    /// Applies updated preferences.
    ///
    /// The ambient selection and session length of a session already open are
    /// left alone.
    pub fn set_preferences(&mut self, preferences: Preferences) {
        let was_enabled = self.audio.sound_enabled();
        self.audio.set_sound_enabled(preferences.sound_enabled);
        if preferences.sound_enabled && !was_enabled && self.engine.is_active() {
            self.audio.play(self.ambient);
        }
        self.preferences = preferences;
    }

    /// Advances audio fades and the breathing engine by `delta`.
    pub fn update(&mut self, delta: Duration, events: &mut Vec<SessionEvent>) {
        self.audio.update(delta);

        let mut fresh = Vec::new();
        self.engine.update(delta, &mut fresh);
        for event in fresh {
            match event {
                SessionEvent::HapticPulse(_) if !self.preferences.vibration_enabled => continue,
                SessionEvent::Complete => self.audio.stop(),
                _ => {}
            }
            events.push(event);
        }
    }

    /// Ends the session and releases the audio device.
    pub fn dispose(self) {
        self.audio.dispose();
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn audio(&self) -> &PlaybackController<H> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut PlaybackController<H> {
        &mut self.audio
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn style(&self) -> BreathingStyle {
        self.style
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn ambient(&self) -> AmbientVariant {
        self.ambient
    }

    pub fn state(&self) -> SessionState {
        self.engine.state()
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{OfflineHost, PlaybackStatus};
    use crate::{Error, HapticMode, Pattern, Phase};

    fn session(prefs: Preferences) -> BreathingSession<OfflineHost> {
        BreathingSession::new(OfflineHost::new().with_sample_rate(2000), prefs)
    }

    fn rain() -> Preferences {
        Preferences::default().with_ambient_sound(AmbientVariant::Rain)
    }

    #[test]
    fn test_new_uses_preferences() {
        let s = session(rain().with_preferred_duration(5));
        assert_eq!(s.duration_minutes(), 5);
        assert_eq!(s.state().seconds_remaining, 300.0);
        assert_eq!(s.ambient(), AmbientVariant::Rain);
        assert_eq!(s.style(), BreathingStyle::Box);
        assert!(s.audio().device().is_none());
    }

    #[test]
    fn test_zero_preferred_duration_keeps_default() {
        let s = session(rain().with_preferred_duration(0));
        assert_eq!(s.duration_minutes(), 3);
        assert_eq!(s.state().seconds_remaining, 180.0);
    }

    #[test]
    fn test_start_plays_ambient_once() {
        let mut s = session(rain());
        s.start().unwrap();
        assert_eq!(s.audio().active_variant(), Some(AmbientVariant::Rain));
        let first = s.audio().handle().unwrap().source();
        s.start().unwrap();
        assert_eq!(s.audio().handle().unwrap().source(), first);
    }

    #[test]
    fn test_silence_never_opens_device() {
        let mut s = session(Preferences::default());
        s.start().unwrap();
        assert!(s.is_active());
        assert!(s.audio().device().is_none());
    }

    #[test]
    fn test_pause_fades_sound_and_resume_restarts_it() {
        let mut s = session(rain());
        s.start().unwrap();
        let mut events = Vec::new();
        s.update(Duration::from_secs(5), &mut events);
        s.pause();
        assert_eq!(s.audio().status(), Some(PlaybackStatus::FadingOut));
        assert!((s.state().seconds_remaining - 175.0).abs() < 1e-9);

        s.start().unwrap();
        assert_eq!(s.audio().status(), Some(PlaybackStatus::FadingIn));
        assert!((s.state().seconds_remaining - 175.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_stops_sound() {
        let mut s = session(rain().with_preferred_duration(2));
        s.start().unwrap();
        let mut events = Vec::new();
        s.update(Duration::from_secs(120), &mut events);
        assert!(s.is_complete());
        assert_eq!(s.audio().status(), Some(PlaybackStatus::FadingOut));
        let completions = events
            .iter()
            .filter(|e| **e == SessionEvent::Complete)
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_vibration_disabled_drops_pulses() {
        let mut s = session(Preferences::default().with_vibration_enabled(false));
        s.start().unwrap();
        let mut events = Vec::new();
        s.update(Duration::from_secs(8), &mut events);
        assert_eq!(s.engine().phase(), Phase::Exhale);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, SessionEvent::HapticPulse(_)))
        );
        assert_eq!(events.len(), 80);
    }

    #[test]
    fn test_silent_style_uses_silent_haptics() {
        let mut s = session(Preferences::default()).with_style(BreathingStyle::Silent);
        s.start().unwrap();
        assert_eq!(s.engine().haptic_mode(), HapticMode::Silent);
        let mut events = Vec::new();
        s.update(Duration::from_secs(4), &mut events);
        assert!(events.contains(&SessionEvent::HapticPulse(&[50, 50, 50])));
    }

    #[test]
    fn test_set_style_restarts_session() {
        let mut s = session(rain());
        s.start().unwrap();
        let mut events = Vec::new();
        s.update(Duration::from_secs(3), &mut events);
        s.set_style(BreathingStyle::LongExhale);
        assert!(!s.is_active());
        assert_eq!(s.engine().pattern(), &Pattern::LONG_EXHALE);
        assert_eq!(s.state().seconds_remaining, 180.0);
        assert_eq!(s.audio().status(), Some(PlaybackStatus::FadingOut));
    }

    #[test]
    fn test_set_duration_rejects_zero() {
        let mut s = session(rain());
        assert_eq!(s.set_duration(0), Err(Error::InvalidDuration(0.0)));
        assert_eq!(s.duration_minutes(), 3);
        s.set_duration(2).unwrap();
        assert_eq!(s.state().seconds_remaining, 120.0);
        assert!(session(rain()).with_duration(0).is_err());
    }

    #[test]
    fn test_set_ambient_while_running() {
        let mut s = session(rain());
        s.start().unwrap();
        s.set_ambient(AmbientVariant::SingingBowl);
        assert_eq!(s.audio().active_variant(), Some(AmbientVariant::SingingBowl));
        s.set_ambient(AmbientVariant::Silence);
        assert_eq!(s.audio().status(), Some(PlaybackStatus::FadingOut));
    }

    #[test]
    fn test_set_ambient_while_idle_only_remembers() {
        let mut s = session(Preferences::default());
        s.set_ambient(AmbientVariant::WindChime);
        assert!(s.audio().device().is_none());
        s.start().unwrap();
        assert_eq!(s.audio().active_variant(), Some(AmbientVariant::WindChime));
    }

    #[test]
    fn test_toggling_sound_preference() {
        let mut s = session(rain());
        s.start().unwrap();
        s.set_preferences(rain().with_sound_enabled(false));
        assert_eq!(s.audio().status(), Some(PlaybackStatus::FadingOut));
        s.set_preferences(rain());
        assert_eq!(s.audio().status(), Some(PlaybackStatus::FadingIn));
    }
}
