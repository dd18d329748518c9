use crate::platform::Platform;
use crate::powerups::{EffectKind, Effects};

/// Points for one newly scored platform: 2 with double points active, else 1.
pub fn platform_points(double_points: bool) -> u32 {
    if double_points { 2 } else { 1 }
}

/// Credit every touched, not-yet-scored platform. Returns the points earned.
pub fn credit_platforms(platforms: &mut [Platform], effects: &Effects) -> u32 {
    let per_platform = platform_points(effects.is_active(EffectKind::DoublePoints));
    platforms
        .iter_mut()
        .filter_map(|p| p.credit_score().then_some(per_platform))
        .sum()
}

/// High score as shown during a run: the stored best or the live score,
/// whichever is larger.
pub fn display_high_score(high_score: u32, score: u32) -> u32 {
    high_score.max(score)
}

pub fn is_new_record(high_score: u32, score: u32) -> bool {
    score > high_score
}
