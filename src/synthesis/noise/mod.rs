//! Noise sources for the ambient generators.

mod brown;
mod white;

pub use brown::BrownNoise;
pub use white::WhiteNoise;
