/// Scale in `[0, 1]` for an overlay that grows in, holds, then shrinks out.
///
/// `total` is the full effect length and `time_left` how much of it remains,
/// both in seconds. The first and last `ramp` seconds interpolate linearly.
pub fn in_out_scale(total: f32, time_left: f32, ramp: f32) -> f32 {
    if ramp <= 0.0 {
        return if time_left > 0.0 { 1.0 } else { 0.0 };
    }
    let elapsed = total - time_left;
    let scale = if elapsed < ramp {
        elapsed / ramp
    } else if elapsed > total - ramp {
        (total - elapsed) / ramp
    } else {
        1.0
    };
    scale.clamp(0.0, 1.0)
}

/// Parameters of one grow/shrink overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InOut {
    pub initial: f32,
    pub max: f32,
    pub max_alpha: u8,
    pub total_secs: f32,
    pub ramp_secs: f32,
}

impl InOut {
    /// Interpolated size and alpha for the given remaining time.
    pub fn sample(&self, time_left: f32) -> (f32, u8) {
        let scale = in_out_scale(self.total_secs, time_left, self.ramp_secs);
        let size = self.initial + (self.max - self.initial) * scale;
        let alpha = ((255.0 * scale) as u32).min(self.max_alpha as u32) as u8;
        (size, alpha)
    }
}
