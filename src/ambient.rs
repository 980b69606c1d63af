//! The closed set of ambient sounds a session can play.

use std::fmt;
use std::str::FromStr;

/// Ambient sound selection.
///
/// The string forms (`"brown-noise"`, `"wind-chime"`, ...) match the identifiers
/// stored by the preference layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AmbientVariant {
    /// No sound; playback of this variant is a no-op
    #[default]
    Silence,
    /// Soft noise bed with sparse droplets
    Rain,
    /// Low-passed (red) noise
    BrownNoise,
    /// Randomly struck pentatonic chimes
    WindChime,
    /// Sustained bowl tone with slow shimmer
    SingingBowl,
}

impl AmbientVariant {
    /// All variants in display order.
    pub const ALL: [AmbientVariant; 5] = [
        AmbientVariant::Silence,
        AmbientVariant::Rain,
        AmbientVariant::BrownNoise,
        AmbientVariant::WindChime,
        AmbientVariant::SingingBowl,
    ];

    /// Identifier used by the preference layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbientVariant::Silence => "silence",
            AmbientVariant::Rain => "rain",
            AmbientVariant::BrownNoise => "brown-noise",
            AmbientVariant::WindChime => "wind-chime",
            AmbientVariant::SingingBowl => "singing-bowl",
        }
    }

    /// Returns true for [`AmbientVariant::Silence`].
    pub fn is_silent(&self) -> bool {
        matches!(self, AmbientVariant::Silence)
    }
}

impl fmt::Display for AmbientVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown ambient sound identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ambient sound `{0}`")]
pub struct UnknownVariant(pub String);

impl FromStr for AmbientVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AmbientVariant::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for variant in AmbientVariant::ALL {
            assert_eq!(variant.as_str().parse::<AmbientVariant>(), Ok(variant));
        }
    }

    #[test]
    fn test_unknown_identifier() {
        let err = "thunder".parse::<AmbientVariant>().unwrap_err();
        assert_eq!(err.to_string(), "unknown ambient sound `thunder`");
    }

    #[test]
    fn test_default_is_silence() {
        assert!(AmbientVariant::default().is_silent());
        assert!(!AmbientVariant::Rain.is_silent());
    }
}
