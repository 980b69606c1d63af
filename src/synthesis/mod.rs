//! Procedural ambient sound synthesis.
//!
//! Every audible [`AmbientVariant`] is rendered into a 10 second, two channel
//! [`SampleBuffer`] that the playback layer loops. Channels are generated
//! independently so noise-based variants do not collapse to mono.
//!
//! Synthesis draws from a random source, so buffers are not reproducible
//! between calls unless a seeded RNG is passed to [`synthesize_with_rng`].

mod bowl;
mod buffer;
pub mod chime;
pub mod noise;
mod rain;

pub use bowl::{BOWL_FUNDAMENTAL, SingingBowl};
pub use buffer::{CHANNELS, LOOP_SECONDS, SampleBuffer, loop_frames, render_channel};
pub use chime::{ChimeStrike, render_wind_chime};
pub use noise::{BrownNoise, WhiteNoise};
pub use rain::Rain;

use crate::AmbientVariant;
use rand::Rng;

/// Renders the loop for `variant` using the thread-local RNG.
///
/// Returns `None` for [`AmbientVariant::Silence`].
///
/// # Examples
///
/// ```
/// use stillwater::{AmbientVariant, synthesis};
///
/// let buffer = synthesis::synthesize(AmbientVariant::Rain, 8000).unwrap();
/// assert_eq!(buffer.frame_count(), 80_000);
/// assert_eq!(buffer.channel_count(), 2);
///
/// assert!(synthesis::synthesize(AmbientVariant::Silence, 8000).is_none());
/// ```
pub fn synthesize(variant: AmbientVariant, sample_rate: u32) -> Option<SampleBuffer> {
    synthesize_with_rng(variant, sample_rate, &mut rand::thread_rng())
}

/// Renders the loop for `variant` drawing randomness from `rng`.
pub fn synthesize_with_rng<R: Rng>(
    variant: AmbientVariant,
    sample_rate: u32,
    rng: &mut R,
) -> Option<SampleBuffer> {
    if variant.is_silent() {
        return None;
    }
    let frames = loop_frames(sample_rate);
    let channels = (0..CHANNELS)
        .map(|_| match variant {
            AmbientVariant::BrownNoise => {
                render_channel(BrownNoise::new(WhiteNoise::with_rng(&mut *rng)), frames)
            }
            AmbientVariant::Rain => render_channel(Rain::new(sample_rate, &mut *rng), frames),
            AmbientVariant::WindChime => render_wind_chime(&mut *rng, sample_rate, frames),
            AmbientVariant::SingingBowl => render_channel(SingingBowl::new(sample_rate), frames),
            AmbientVariant::Silence => Vec::new(),
        })
        .collect();
    let buffer = SampleBuffer::from_channels(sample_rate, channels);
    log::debug!(
        "synthesized {} loop: {} frames at {} Hz, peak {:.3}",
        variant,
        buffer.frame_count(),
        sample_rate,
        buffer.peak()
    );
    Some(buffer)
}
