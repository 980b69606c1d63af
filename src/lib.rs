//! Stillwater - guided breathing sessions with procedural ambient sound
//!
//! The crate is split into three layers:
//!
//! - [`session`]: the breathing phase state machine, ticked every 100 ms
//! - [`synthesis`]: 10 second stereo loops of rain, brown noise, wind chimes
//!   and a singing bowl, built from small [`Signal`] sources
//! - [`playback`]: fades those loops in and out on an audio device
//!
//! [`BreathingSession`] wires the three together. Nothing in the crate owns a
//! timer: the host calls `update` with the elapsed time from its own loop.
//!
//! # Features
//!
//! - `synth` (default): synthesis, playback and [`BreathingSession`]
//! - `cpal`: real audio output through `playback::CpalHost`
//! - `serde`: serialization of [`Preferences`], [`AmbientVariant`] and
//!   [`Pattern`]

mod ambient;
mod error;
mod preferences;
pub mod session;
pub mod signal;

#[cfg(feature = "synth")]
mod breathing;
#[cfg(feature = "synth")]
pub mod playback;
#[cfg(feature = "synth")]
pub mod synthesis;

// Re-export commonly used types at the crate root
pub use ambient::{AmbientVariant, UnknownVariant};
pub use error::{Error, Result};
pub use preferences::Preferences;
pub use session::{
    BreathingStyle, HapticMode, Pattern, Phase, SessionEngine, SessionEvent, SessionState,
    TICK_INTERVAL, format_clock, visual_scale,
};
pub use signal::Signal;

#[cfg(feature = "synth")]
pub use breathing::BreathingSession;
#[cfg(feature = "synth")]
pub use playback::{OfflineHost, PlaybackController};
#[cfg(feature = "synth")]
pub use synthesis::SampleBuffer;
