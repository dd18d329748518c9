use serde::{Deserialize, Serialize};

/// Frame countdown backing a single timed effect.
///
/// Activity is derived from the countdown and never stored. The countdown
/// drops by exactly one per tick and stops at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTimer {
    remaining: u32,
}

impl EffectTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the countdown. Re-collecting an active effect resets it to the
    /// full duration rather than stacking.
    pub fn set(&mut self, frames: u32) {
        self.remaining = frames;
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Convert an effect duration in seconds to whole frames at `frame_rate`.
pub fn secs_to_frames(secs: f32, frame_rate: f32) -> u32 {
    if !secs.is_finite() || !frame_rate.is_finite() || secs <= 0.0 || frame_rate <= 0.0 {
        return 0;
    }
    (secs * frame_rate).round() as u32
}
