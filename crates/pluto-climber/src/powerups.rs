use serde::{Deserialize, Serialize};

use pluto_core::effect::{EffectTimer, secs_to_frames};
use pluto_core::geometry::Rect;

use crate::config::{EffectsConfig, PlutoConfig};
use crate::entity::{Entity, Hitbox, TickContext};
use crate::platform::Platform;

/// Climber effect types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Invincibility,
    DoublePoints,
    ScoreBoost,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [
        EffectKind::Invincibility,
        EffectKind::DoublePoints,
        EffectKind::ScoreBoost,
    ];

    /// Configured duration, in seconds.
    pub fn duration_secs(self, cfg: &EffectsConfig) -> f32 {
        match self {
            EffectKind::Invincibility => cfg.invincibility_secs,
            EffectKind::DoublePoints => cfg.double_points_secs,
            EffectKind::ScoreBoost => cfg.score_boost_secs,
        }
    }

    /// Configured duration converted to frames at `frame_rate`.
    pub fn duration_frames(self, cfg: &EffectsConfig, frame_rate: f32) -> u32 {
        secs_to_frames(self.duration_secs(cfg), frame_rate)
    }
}

/// Power-up resting on a platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub kind: EffectKind,
    pub consumed: bool,
    /// Frames since spawn, scaled by the frame-rate factor. Drives the bob.
    pub bob_phase: f32,
}

/// Bob amplitude in px and angular speed in radians per frame.
const BOB_AMPLITUDE: f32 = 3.0;
const BOB_SPEED: f32 = 0.1;

impl PowerUp {
    pub fn on_platform(platform: &Platform, x: f32, kind: EffectKind, cfg: &PlutoConfig) -> Self {
        let size = cfg.world.power_up_size;
        let max_x = (platform.x + platform.width - size).max(platform.x);
        Self {
            x: x.clamp(platform.x, max_x),
            y: platform.hitbox().top() - size - cfg.world.power_up_hover,
            size,
            kind,
            consumed: false,
            bob_phase: 0.0,
        }
    }

    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Vertical draw offset for the idle bob. Presentation only; the hitbox
    /// does not move.
    pub fn bob_offset(&self) -> f32 {
        (self.bob_phase * BOB_SPEED).sin() * BOB_AMPLITUDE
    }
}

impl Hitbox for PowerUp {
    fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

impl Entity for PowerUp {
    fn y(&self) -> f32 {
        self.y
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.bob_phase += ctx.frame_rate_factor;
    }

    fn is_expired(&self) -> bool {
        self.consumed
    }
}

/// On-screen cue shown next to the player. Only one is drawn at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    ScoreBoost,
    DoublePoints,
}

/// One countdown per effect kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effects {
    pub invincibility: EffectTimer,
    pub double_points: EffectTimer,
    pub score_boost: EffectTimer,
}

impl Effects {
    pub fn get(&self, kind: EffectKind) -> &EffectTimer {
        match kind {
            EffectKind::Invincibility => &self.invincibility,
            EffectKind::DoublePoints => &self.double_points,
            EffectKind::ScoreBoost => &self.score_boost,
        }
    }

    pub fn get_mut(&mut self, kind: EffectKind) -> &mut EffectTimer {
        match kind {
            EffectKind::Invincibility => &mut self.invincibility,
            EffectKind::DoublePoints => &mut self.double_points,
            EffectKind::ScoreBoost => &mut self.score_boost,
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.get(kind).is_active()
    }

    /// Start or restart `kind`. An active effect is reset, not extended.
    pub fn activate(&mut self, kind: EffectKind, frames: u32) {
        self.get_mut(kind).set(frames);
    }

    pub fn tick_all(&mut self) {
        for kind in EffectKind::ALL {
            self.get_mut(kind).tick();
        }
    }

    /// The boost cue wins when both scoring effects are active.
    pub fn cue(&self) -> Option<Cue> {
        if self.score_boost.is_active() {
            Some(Cue::ScoreBoost)
        } else if self.double_points.is_active() {
            Some(Cue::DoublePoints)
        } else {
            None
        }
    }
}
