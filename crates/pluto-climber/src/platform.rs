use serde::{Deserialize, Serialize};

use pluto_core::geometry::Rect;

use crate::config::PlutoConfig;
use crate::entity::{Entity, Heading, Hitbox, TickContext, bounce_within};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    Moving,
}

/// What a platform carries. A single field so a platform can never hold both
/// an enemy and a power-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    None,
    Enemy,
    PowerUp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
    /// Horizontal speed in px/frame; only used by moving platforms.
    pub speed: f32,
    pub heading: Heading,
    pub min_x: f32,
    pub max_x: f32,
    pub occupant: Occupant,
    touched: bool,
    score_counted: bool,
    hitbox_trim_top: f32,
    hitbox_height: f32,
    hitbox: Rect,
}

impl Platform {
    pub fn new(
        x: f32,
        y: f32,
        kind: PlatformKind,
        speed: f32,
        heading: Heading,
        cfg: &PlutoConfig,
    ) -> Self {
        let (min_x, max_x) = cfg.platform_x_range();
        let mut platform = Self {
            x: x.clamp(min_x, max_x.max(min_x)),
            y,
            width: cfg.world.platform_width,
            height: cfg.world.platform_height,
            kind,
            speed,
            heading,
            min_x,
            max_x: max_x.max(min_x),
            occupant: Occupant::None,
            touched: false,
            score_counted: false,
            hitbox_trim_top: cfg.world.hitbox_trim_top,
            hitbox_height: cfg.world.hitbox_height,
            hitbox: Rect::default(),
        };
        platform.refresh_hitbox();
        platform
    }

    /// Platform the player starts on: centred, static, empty and already
    /// scored so the first landing is worth nothing.
    pub fn launch_pad(cfg: &PlutoConfig) -> Self {
        let x = (cfg.window.width - cfg.world.platform_width) / 2.0;
        let y = cfg.window.height - cfg.world.padding;
        let mut pad = Self::new(x, y, PlatformKind::Normal, 0.0, Heading::Right, cfg);
        pad.touched = true;
        pad.score_counted = true;
        pad
    }

    pub fn has_enemy(&self) -> bool {
        self.occupant == Occupant::Enemy
    }

    pub fn has_power_up(&self) -> bool {
        self.occupant == Occupant::PowerUp
    }

    pub fn touched(&self) -> bool {
        self.touched
    }

    pub fn score_counted(&self) -> bool {
        self.score_counted
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    /// Flip `score_counted` once the platform has been touched. Returns true
    /// only on the frame the credit is granted.
    pub fn credit_score(&mut self) -> bool {
        if self.touched && !self.score_counted {
            self.score_counted = true;
            true
        } else {
            false
        }
    }

    /// Full sprite bounds, for rendering.
    pub fn sprite(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn refresh_hitbox(&mut self) {
        self.hitbox.update(
            self.x,
            self.y + self.hitbox_trim_top,
            self.width,
            self.hitbox_height,
        );
    }
}

impl Hitbox for Platform {
    fn hitbox(&self) -> Rect {
        self.hitbox
    }
}

impl Entity for Platform {
    fn y(&self) -> f32 {
        self.y
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.refresh_hitbox();
        if self.kind != PlatformKind::Moving {
            return;
        }

        let carrying = ctx.player.alive && ctx.player.feet().intersects(&self.hitbox);
        let step = self.speed * ctx.frame_rate_factor;
        let (x, heading) = bounce_within(self.x, step, self.heading, self.min_x, self.max_x);
        if carrying {
            ctx.player.carry(x - self.x);
        }
        self.x = x;
        self.heading = heading;
        self.refresh_hitbox();
    }
}
