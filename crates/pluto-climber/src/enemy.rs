use serde::{Deserialize, Serialize};

use pluto_core::effect::EffectTimer;
use pluto_core::geometry::Rect;

use crate::config::PlutoConfig;
use crate::entity::{Entity, Facing, Heading, Hitbox, TickContext, bounce_within};
use crate::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPattern {
    /// Walks back and forth across its platform.
    Patrol,
    /// Sits still.
    Spike,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyLife {
    Alive,
    /// Playing the kill burst at `anchor` (world space).
    Dying {
        timer: EffectTimer,
        anchor: (f32, f32),
    },
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub heading: Heading,
    pub pattern: EnemyPattern,
    pub life: EnemyLife,
    /// Travel span inherited from the parent platform.
    pub min_x: f32,
    pub max_x: f32,
}

impl Enemy {
    /// Place an enemy standing on `platform` with its left edge near `x`.
    pub fn on_platform(
        platform: &Platform,
        x: f32,
        pattern: EnemyPattern,
        heading: Heading,
        cfg: &PlutoConfig,
    ) -> Self {
        let width = cfg.world.enemy_width;
        let height = cfg.world.enemy_height;
        let min_x = platform.x;
        let max_x = (platform.x + platform.width - width).max(min_x);
        Self {
            x: x.clamp(min_x, max_x),
            y: platform.hitbox().top() - height,
            width,
            height,
            speed: cfg.world.enemy_speed,
            heading,
            pattern,
            life: EnemyLife::Alive,
            min_x,
            max_x,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.life, EnemyLife::Alive)
    }

    /// Start the kill burst. Only a living enemy can die.
    pub fn die(&mut self, anchor: (f32, f32), animation_frames: u32) {
        if !self.is_alive() {
            return;
        }
        self.life = if animation_frames == 0 {
            EnemyLife::Dead
        } else {
            let mut timer = EffectTimer::new();
            timer.set(animation_frames);
            EnemyLife::Dying { timer, anchor }
        };
    }

    pub fn facing(&self) -> Facing {
        match self.pattern {
            EnemyPattern::Patrol => self.heading.into(),
            EnemyPattern::Spike => Facing::Idle,
        }
    }

    pub fn sprite(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Hitbox for Enemy {
    fn hitbox(&self) -> Rect {
        self.sprite()
    }
}

impl Entity for Enemy {
    fn y(&self) -> f32 {
        self.y
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        match &mut self.life {
            EnemyLife::Alive => {
                if self.pattern == EnemyPattern::Patrol {
                    let step = self.speed * ctx.frame_rate_factor;
                    let (x, heading) =
                        bounce_within(self.x, step, self.heading, self.min_x, self.max_x);
                    self.x = x;
                    self.heading = heading;
                }
            },
            EnemyLife::Dying { timer, .. } => {
                timer.tick();
                if !timer.is_active() {
                    self.life = EnemyLife::Dead;
                }
            },
            EnemyLife::Dead => {},
        }
    }

    fn is_expired(&self) -> bool {
        matches!(self.life, EnemyLife::Dead)
    }
}
