use serde::{Deserialize, Serialize};

use pluto_core::geometry::Rect;
use pluto_core::input::{Key, KeySnapshot};

use crate::config::PlayerPhysicsConfig;
use crate::entity::{Facing, Hitbox};
use crate::platform::Platform;

/// Feet may start this far below a platform top and still land on it.
const LANDING_TOLERANCE: f32 = 0.5;
/// Height of the probe strip straddling the player's feet.
const FEET_PROBE_HEIGHT: f32 = 2.0;
/// Kill bursts are drawn this far above the bottom of the sprite.
const FEET_ANCHOR_RAISE: f32 = 10.0;

/// The player-controlled climber. `y` grows downward, so climbing lowers it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    /// Vertical speed in px/frame; negative while rising.
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub side_trim: f32,
    pub grounded: bool,
    pub facing: Facing,
    pub anim_frame: f32,
    pub animation_frames: u32,
    /// Smallest y reached this run. The camera follows this, never the
    /// current y, so falling does not scroll the world back down.
    pub peak_y: f32,
    pub alive: bool,
}

impl PlayerState {
    pub fn new(x: f32, y: f32, cfg: &PlayerPhysicsConfig) -> Self {
        Self {
            x,
            y,
            vy: 0.0,
            width: cfg.width,
            height: cfg.height,
            side_trim: cfg.hitbox_side_trim,
            grounded: false,
            facing: Facing::Idle,
            anim_frame: 0.0,
            animation_frames: cfg.animation_frames.max(1),
            peak_y: y,
            alive: true,
        }
    }

    /// Thin strip around the bottom edge of the hitbox, used for "standing on"
    /// checks where the feet rest exactly on a platform top.
    pub fn feet(&self) -> Rect {
        let hb = self.hitbox();
        Rect::new(
            hb.x,
            hb.bottom() - FEET_PROBE_HEIGHT / 2.0,
            hb.w,
            FEET_PROBE_HEIGHT,
        )
    }

    pub fn feet_anchor(&self) -> (f32, f32) {
        (
            self.x + self.width / 2.0,
            self.y + self.height - FEET_ANCHOR_RAISE,
        )
    }

    /// Shift horizontally with a platform.
    pub fn carry(&mut self, dx: f32) {
        self.x += dx;
    }

    pub fn clamp_to_window(&mut self, window_width: f32) {
        self.x = self.x.clamp(0.0, (window_width - self.width).max(0.0));
    }

    pub fn animation_index(&self) -> usize {
        (self.anim_frame.max(0.0) as usize) % self.animation_frames as usize
    }

    pub fn die(&mut self) {
        self.alive = false;
        self.vy = 0.0;
        self.grounded = false;
    }
}

impl Hitbox for PlayerState {
    fn hitbox(&self) -> Rect {
        Rect::new(
            self.x + self.side_trim,
            self.y,
            (self.width - 2.0 * self.side_trim).max(1.0),
            self.height,
        )
    }
}

/// Movement intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// -1 (left), 0, +1 (right).
    pub move_dir: f32,
    pub jump: bool,
}

impl PlayerInput {
    /// Left wins when both directions are held.
    pub fn from_keys(keys: &KeySnapshot) -> Self {
        let move_dir = if keys.is_pressed(Key::Left) {
            -1.0
        } else if keys.is_pressed(Key::Right) {
            1.0
        } else {
            0.0
        };
        Self {
            move_dir,
            jump: keys.is_pressed(Key::Jump),
        }
    }
}

/// Advance the player one frame: run, jump, gravity, and landing on any
/// platform the feet crossed while descending. Returns the index of the
/// platform landed on, if any.
pub fn step_player(
    player: &mut PlayerState,
    input: &PlayerInput,
    platforms: &[Platform],
    cfg: &PlayerPhysicsConfig,
    window_width: f32,
    frame_rate_factor: f32,
) -> Option<usize> {
    if !player.alive {
        return None;
    }

    // Horizontal movement (sanitize NaN/Inf)
    let move_dir = if input.move_dir.is_finite() {
        input.move_dir.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    player.facing = if move_dir < 0.0 {
        Facing::Left
    } else if move_dir > 0.0 {
        Facing::Right
    } else {
        Facing::Idle
    };
    player.x += move_dir * cfg.run_speed * frame_rate_factor;
    player.clamp_to_window(window_width);

    player.anim_frame = (player.anim_frame + cfg.animation_speed * frame_rate_factor)
        % player.animation_frames as f32;

    if input.jump && player.grounded {
        player.vy = -cfg.jump_velocity;
        player.grounded = false;
    }

    let prev_bottom = player.hitbox().bottom();
    player.vy = (player.vy + cfg.gravity * frame_rate_factor).min(cfg.max_fall_speed);
    player.y += player.vy * frame_rate_factor;

    let landed = if player.vy >= 0.0 {
        find_landing(player, prev_bottom, platforms)
    } else {
        None
    };

    match landed {
        Some(index) => {
            let top = platforms[index].hitbox().top();
            player.y = top - player.height;
            player.vy = 0.0;
            player.grounded = true;
        },
        None => player.grounded = false,
    }

    player.peak_y = player.peak_y.min(player.y);
    landed
}

/// Highest platform whose top the feet crossed between `prev_bottom` and now.
fn find_landing(player: &PlayerState, prev_bottom: f32, platforms: &[Platform]) -> Option<usize> {
    let hb = player.hitbox();
    platforms
        .iter()
        .enumerate()
        .filter(|(_, p)| {
            let top = p.hitbox().top();
            hb.overlaps_x(&p.hitbox())
                && prev_bottom <= top + LANDING_TOLERANCE
                && hb.bottom() >= top
        })
        .min_by(|(_, a), (_, b)| a.hitbox().top().total_cmp(&b.hitbox().top()))
        .map(|(i, _)| i)
}
