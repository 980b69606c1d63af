//! Ambient playback: one looped source, faded in and out, on a lazily opened device.

use super::{
    AudioDevice, AudioHost, DeviceError, DeviceState, GainEnvelope, GainRamp, Scheduler, SourceId,
    TaskId,
};
use crate::AmbientVariant;
use crate::synthesis::{self, SampleBuffer};
use std::sync::Arc;
use std::time::Duration;

/// Fade-in length used by [`PlaybackController::play`].
pub const DEFAULT_FADE_IN: Duration = Duration::from_secs(2);

/// Fade-out length used by [`PlaybackController::stop`].
pub const DEFAULT_FADE_OUT: Duration = Duration::from_millis(1500);

/// Gain the ambient loop settles at after fading in.
pub const PLAYBACK_GAIN: f32 = 0.3;

/// Where a handle is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Buffer chosen, source not yet started
    Idle,
    FadingIn,
    Playing,
    /// Fading to silence; the source is released when the fade ends
    FadingOut,
    Stopped,
}

/// Bookkeeping for the source a controller is playing.
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    variant: AmbientVariant,
    buffer: Arc<SampleBuffer>,
    source: Option<SourceId>,
    envelope: GainEnvelope,
    looping: bool,
    status: PlaybackStatus,
    release: Option<TaskId>,
}

impl PlaybackHandle {
    fn new(variant: AmbientVariant, buffer: Arc<SampleBuffer>) -> Self {
        Self {
            variant,
            buffer,
            source: None,
            envelope: GainEnvelope::new(0.0),
            looping: true,
            status: PlaybackStatus::Idle,
            release: None,
        }
    }

    fn begin(&mut self, source: SourceId, fade_in: Duration) {
        self.source = Some(source);
        self.envelope.ramp(GainRamp::new(PLAYBACK_GAIN, fade_in));
        self.status = if self.envelope.is_settled() {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::FadingIn
        };
    }

    pub fn variant(&self) -> AmbientVariant {
        self.variant
    }

    pub fn buffer(&self) -> &Arc<SampleBuffer> {
        &self.buffer
    }

    pub fn source(&self) -> Option<SourceId> {
        self.source
    }

    /// Gain the controller expects the device to be applying right now.
    pub fn gain(&self) -> f32 {
        self.envelope.level()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// True unless the handle has reached [`PlaybackStatus::Stopped`].
    pub fn is_live(&self) -> bool {
        self.status != PlaybackStatus::Stopped
    }
}

#[derive(Debug)]
enum Deferred {
    Release(SourceId),
}

/// Plays ambient loops on a device opened from `H`.
///
/// The controller keeps at most one live [`PlaybackHandle`]: starting a new
/// sound stops the previous one first. The device is opened on the first
/// audible `play` and closed by [`dispose`](Self::dispose) (or on drop).
/// Device failures never escape; they are logged and kept as
/// [`last_error`](Self::last_error).
///
/// Time advances only through [`update`](Self::update), which completes
/// fades and fires the deferred release scheduled by [`stop`](Self::stop).
///
/// # Examples
///
/// ```
/// use stillwater::AmbientVariant;
/// use stillwater::playback::{OfflineHost, PlaybackController, PlaybackStatus};
/// use std::time::Duration;
///
/// let mut audio = PlaybackController::new(OfflineHost::new().with_sample_rate(8000));
/// audio.play(AmbientVariant::SingingBowl);
/// assert_eq!(audio.status(), Some(PlaybackStatus::FadingIn));
///
/// audio.update(Duration::from_secs(2));
/// assert_eq!(audio.status(), Some(PlaybackStatus::Playing));
///
/// audio.stop();
/// audio.update(Duration::from_millis(1500));
/// assert_eq!(audio.status(), Some(PlaybackStatus::Stopped));
/// audio.dispose();
/// ```
pub struct PlaybackController<H: AudioHost> {
    host: H,
    device: Option<H::Device>,
    sound_enabled: bool,
    handle: Option<PlaybackHandle>,
    brown_noise: Option<Arc<SampleBuffer>>,
    scheduler: Scheduler<Deferred>,
    last_error: Option<DeviceError>,
}

impl<H: AudioHost> PlaybackController<H> {
    /// Creates a controller; no device is opened until something is played.
    pub fn new(host: H) -> Self {
        Self {
            host,
            device: None,
            sound_enabled: true,
            handle: None,
            brown_noise: None,
            scheduler: Scheduler::new(),
            last_error: None,
        }
    }

    /// Sets the sound preference.
    pub fn with_sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Updates the sound preference; disabling it fades out the current sound.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        if !enabled {
            self.stop();
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Plays `variant` with the default two second fade-in.
    pub fn play(&mut self, variant: AmbientVariant) {
        self.play_with_fade(variant, DEFAULT_FADE_IN);
    }

    /// Plays `variant` in a loop, fading from silence to [`PLAYBACK_GAIN`].
    ///
    /// Does nothing when sound is disabled or `variant` is silence.
    pub fn play_with_fade(&mut self, variant: AmbientVariant, fade_in: Duration) {
        if !self.sound_enabled || variant.is_silent() {
            return;
        }
        if let Err(err) = self.try_play(variant, fade_in) {
            self.report("play", err);
        }
    }

    fn try_play(&mut self, variant: AmbientVariant, fade_in: Duration) -> Result<(), DeviceError> {
        let sample_rate = self.ensure_device()?;
        self.force_stop();

        let Some(buffer) = self.buffer_for(variant, sample_rate) else {
            return Ok(());
        };
        let mut handle = PlaybackHandle::new(variant, buffer.clone());
        let device = self.device.as_mut().ok_or(DeviceError::Closed)?;
        let source = device.start_source(
            buffer,
            handle.looping,
            0.0,
            GainRamp::new(PLAYBACK_GAIN, fade_in),
        )?;
        handle.begin(source, fade_in);
        log::debug!("playing {} as source {}", variant, source.raw());
        self.handle = Some(handle);
        Ok(())
    }

    /// Stops with the default 1.5 second fade-out.
    pub fn stop(&mut self) {
        self.stop_with_fade(DEFAULT_FADE_OUT);
    }

    /// Fades the current sound to silence and releases it afterwards.
    ///
    /// Does nothing if nothing is playing or a fade-out is already under way.
    pub fn stop_with_fade(&mut self, fade_out: Duration) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        let (PlaybackStatus::FadingIn | PlaybackStatus::Playing) = handle.status else {
            return;
        };
        let Some(source) = handle.source else {
            return;
        };

        let ramp = GainRamp::new(0.0, fade_out);
        let outcome = match self.device.as_mut() {
            Some(device) => device.ramp_gain(source, ramp),
            None => Err(DeviceError::Closed),
        };
        match outcome {
            Ok(()) => {
                handle.envelope.ramp(ramp);
                handle.status = PlaybackStatus::FadingOut;
                handle.release =
                    Some(self.scheduler.schedule_after(fade_out, Deferred::Release(source)));
            }
            Err(err) => {
                self.report("stop", err);
                self.force_stop();
            }
        }
    }

    /// Advances fades and runs deferred releases that have come due.
    pub fn update(&mut self, delta: Duration) {
        if let Some(handle) = self.handle.as_mut() {
            handle.envelope.advance(delta);
            if handle.status == PlaybackStatus::FadingIn && handle.envelope.is_settled() {
                handle.status = PlaybackStatus::Playing;
            }
        }
        for task in self.scheduler.advance(delta) {
            match task {
                Deferred::Release(source) => self.release(source),
            }
        }
    }

    /// Stops immediately, cancels pending work and closes the device.
    pub fn dispose(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let cancelled = self.scheduler.clear();
        if let Some(handle) = self.handle.as_mut() {
            handle.release = None;
        }
        self.force_stop();
        if let Some(mut device) = self.device.take() {
            if let Err(err) = device.close() {
                self.report("close", err);
            }
            log::debug!("audio device closed ({} pending task(s) cancelled)", cancelled);
        }
    }

    /// Opens and resumes the device if needed, returning its sample rate.
    fn ensure_device(&mut self) -> Result<u32, DeviceError> {
        if self
            .device
            .as_ref()
            .is_some_and(|d| d.state() == DeviceState::Closed)
        {
            log::debug!("audio device was closed externally; reopening");
            self.device = None;
        }
        if self.device.is_none() {
            self.device = Some(self.host.open()?);
            log::debug!("audio device opened");
        }
        let device = self.device.as_mut().ok_or(DeviceError::Closed)?;
        if device.state() == DeviceState::Suspended {
            device.resume()?;
            log::debug!("audio device resumed");
        }
        Ok(device.sample_rate())
    }

    fn buffer_for(&mut self, variant: AmbientVariant, sample_rate: u32) -> Option<Arc<SampleBuffer>> {
        if variant == AmbientVariant::BrownNoise {
            if let Some(cached) = &self.brown_noise {
                if cached.sample_rate() == sample_rate {
                    log::debug!("reusing cached brown noise loop");
                    return Some(cached.clone());
                }
            }
        }
        let buffer = Arc::new(synthesis::synthesize(variant, sample_rate)?);
        if variant == AmbientVariant::BrownNoise {
            self.brown_noise = Some(buffer.clone());
        }
        Some(buffer)
    }

    /// Silences the live handle at once, cancelling its deferred release.
    fn force_stop(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if let Some(task) = handle.release.take() {
            self.scheduler.cancel(task);
        }
        if !handle.is_live() {
            return;
        }
        if let (Some(source), Some(device)) = (handle.source, self.device.as_mut()) {
            if let Err(err) = device.stop_source(source) {
                log::debug!("source {} already released: {}", source.raw(), err);
            }
        }
        handle.envelope = GainEnvelope::new(0.0);
        handle.status = PlaybackStatus::Stopped;
    }

    fn release(&mut self, source: SourceId) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if handle.source != Some(source) || handle.status != PlaybackStatus::FadingOut {
            return;
        }
        handle.release = None;
        if let Some(device) = self.device.as_mut() {
            if let Err(err) = device.stop_source(source) {
                log::debug!("source {} already released: {}", source.raw(), err);
            }
        }
        handle.status = PlaybackStatus::Stopped;
        log::debug!("released source {} after fade-out", source.raw());
    }

    fn report(&mut self, operation: &str, err: DeviceError) {
        log::warn!("ambient sound {} failed: {}", operation, err);
        self.last_error = Some(err);
    }

    /// The current (or most recently stopped) handle.
    pub fn handle(&self) -> Option<&PlaybackHandle> {
        self.handle.as_ref()
    }

    pub fn status(&self) -> Option<PlaybackStatus> {
        self.handle.as_ref().map(PlaybackHandle::status)
    }

    /// True while a handle is fading in, playing or fading out.
    pub fn is_playing(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| {
            matches!(
                h.status,
                PlaybackStatus::FadingIn | PlaybackStatus::Playing | PlaybackStatus::FadingOut
            )
        })
    }

    /// Variant of the live handle, if any.
    pub fn active_variant(&self) -> Option<AmbientVariant> {
        self.handle
            .as_ref()
            .filter(|h| h.is_live())
            .map(PlaybackHandle::variant)
    }

    pub fn device(&self) -> Option<&H::Device> {
        self.device.as_ref()
    }

    /// True once a device has been opened and not yet closed.
    pub fn is_device_open(&self) -> bool {
        self.device
            .as_ref()
            .is_some_and(|d| d.state() != DeviceState::Closed)
    }

    pub fn device_mut(&mut self) -> Option<&mut H::Device> {
        self.device.as_mut()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Most recent device failure swallowed by the controller.
    pub fn last_error(&self) -> Option<&DeviceError> {
        self.last_error.as_ref()
    }

    /// Number of deferred releases waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }
}

impl<H: AudioHost> Drop for PlaybackController<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
