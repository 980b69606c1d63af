//! User preferences consumed (read-only) by the session and playback layers.

use crate::AmbientVariant;

/// Snapshot of the preference values this crate reads.
///
/// Storage belongs to the host application; it hands a copy in when a session
/// is created and re-applies changes through the session's setters.
///
/// # Examples
///
/// ```
/// use stillwater::{AmbientVariant, Preferences};
///
/// let prefs = Preferences::default()
///     .with_ambient_sound(AmbientVariant::Rain)
///     .with_vibration_enabled(false);
/// assert!(prefs.sound_enabled);
/// assert_eq!(prefs.preferred_duration_minutes, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Preferences {
    /// Master switch for ambient audio
    pub sound_enabled: bool,
    /// Whether haptic pulses reach the device
    pub vibration_enabled: bool,
    /// Ambient sound selected when a session opens
    pub ambient_sound: AmbientVariant,
    /// Default session length offered to the user
    #[cfg_attr(feature = "serde", serde(rename = "preferredDuration"))]
    pub preferred_duration_minutes: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            vibration_enabled: true,
            ambient_sound: AmbientVariant::Silence,
            preferred_duration_minutes: 3,
        }
    }
}

impl Preferences {
    /// Session lengths, in minutes, the app offers.
    pub const DURATION_CHOICES: [u32; 3] = [2, 3, 5];

    /// Sets the sound switch.
    pub fn with_sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = enabled;
        self
    }

    /// Sets the vibration switch.
    pub fn with_vibration_enabled(mut self, enabled: bool) -> Self {
        self.vibration_enabled = enabled;
        self
    }

    /// Sets the initial ambient sound.
    pub fn with_ambient_sound(mut self, variant: AmbientVariant) -> Self {
        self.ambient_sound = variant;
        self
    }

    /// Sets the default session length.
    pub fn with_preferred_duration(mut self, minutes: u32) -> Self {
        self.preferred_duration_minutes = minutes;
        self
    }
}
