//! Guided breathing session state machine.
//!
//! - [`Pattern`] and [`Phase`] describe the breathing rhythm
//! - [`BreathingStyle`] names the presets offered by the app
//! - [`SessionEngine`] advances the rhythm in fixed 100 ms ticks and reports
//!   [`SessionEvent`]s

mod engine;
mod pattern;

pub use engine::{
    SessionEngine, SessionEvent, SessionState, TICK_INTERVAL, format_clock, visual_scale,
};
pub use pattern::{BreathingStyle, HapticMode, Pattern, Phase, UnknownStyle};
