use serde::{Deserialize, Serialize};

use pluto_core::geometry::Rect;

use crate::camera::CameraView;
use crate::physics::PlayerState;

/// Horizontal travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn sign(self) -> f32 {
        match self {
            Heading::Left => -1.0,
            Heading::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// Which sprite set an actor is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
    #[default]
    Idle,
}

impl From<Heading> for Facing {
    fn from(h: Heading) -> Self {
        match h {
            Heading::Left => Facing::Left,
            Heading::Right => Facing::Right,
        }
    }
}

/// Anything with a collision box.
pub trait Hitbox {
    fn hitbox(&self) -> Rect;
}

/// Per-frame inputs shared by every entity tick.
pub struct TickContext<'a> {
    /// Scales per-frame motion so gameplay speed is independent of tick rate.
    pub frame_rate_factor: f32,
    /// Mutable only so a moving platform can carry the player.
    pub player: &'a mut PlayerState,
}

/// Common lifecycle of platforms, enemies and power-ups.
pub trait Entity: Hitbox {
    /// World y of the entity's top edge, compared against the camera's lower bound.
    fn y(&self) -> f32;

    fn tick(&mut self, ctx: &mut TickContext<'_>);

    /// Whether the entity has finished its life independent of scrolling
    /// (consumed, or done playing a death animation).
    fn is_expired(&self) -> bool {
        false
    }
}

/// Move a horizontal coordinate by `step`, bouncing off `[min, max]`.
///
/// When the step would leave the range the position lands exactly on the
/// bound and the heading reverses. Returns the new position and heading.
pub fn bounce_within(x: f32, step: f32, heading: Heading, min: f32, max: f32) -> (f32, Heading) {
    let next = x + step * heading.sign();
    if next < min {
        (min, Heading::Right)
    } else if next > max {
        (max, Heading::Left)
    } else {
        (next, heading)
    }
}

/// Drop entities that scrolled out of `camera` or expired. Returns how many
/// were removed. Running it twice in a row removes nothing the second time.
pub fn prune<E: Entity>(items: &mut Vec<E>, camera: &CameraView) -> usize {
    let before = items.len();
    items.retain(|e| camera.is_visible(e.y()) && !e.is_expired());
    before - items.len()
}
