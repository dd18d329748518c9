use rand::Rng;

use crate::camera::CameraView;
use crate::config::{DifficultyConfig, PlutoConfig};
use crate::enemy::{Enemy, EnemyPattern};
use crate::entity::Heading;
use crate::platform::{Occupant, Platform, PlatformKind};
use crate::powerups::{EffectKind, PowerUp};

/// A freshly generated platform and whatever it carries.
#[derive(Debug, Clone)]
pub struct Spawn {
    pub platform: Platform,
    pub enemy: Option<Enemy>,
    pub power_up: Option<PowerUp>,
}

fn ramp(score: u32, floor: f32, cap: f32, saturation: f32) -> f32 {
    if saturation <= 0.0 || score as f32 >= saturation {
        return cap.clamp(0.0, 1.0);
    }
    let t = score as f32 / saturation;
    (floor + (cap - floor) * t).min(cap).clamp(0.0, 1.0)
}

/// Chance of an enemy on a normal platform. Rises linearly with score from
/// the floor and saturates at the cap.
pub fn enemy_probability(score: u32, cfg: &DifficultyConfig) -> f32 {
    ramp(score, cfg.enemy_floor, cfg.enemy_cap, cfg.saturation_score)
}

/// Chance of a power-up, drawn only when the enemy draw failed.
pub fn power_up_probability(score: u32, cfg: &DifficultyConfig) -> f32 {
    ramp(score, cfg.power_up_floor, cfg.power_up_cap, cfg.saturation_score)
}

/// Spawn when there is nothing yet or the newest platform has come into view.
pub fn should_spawn(last_y: Option<f32>, camera: &CameraView) -> bool {
    match last_y {
        None => true,
        Some(y) => y > camera.upper_bound,
    }
}

/// One fixed gap above the newest platform, or above the launch line when
/// the world is empty.
pub fn next_platform_y(last_y: Option<f32>, cfg: &PlutoConfig) -> f32 {
    last_y.unwrap_or(cfg.window.height - cfg.world.padding) - cfg.world.platform_gap
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Heading {
    if rng.random_bool(0.5) {
        Heading::Right
    } else {
        Heading::Left
    }
}

/// Generate the next platform above `last_y` if the camera has reached it.
///
/// At most one platform per call, so the vertical spacing stays exactly one
/// gap no matter how fast the camera scrolls.
pub fn maybe_spawn_platform<R: Rng + ?Sized>(
    last_y: Option<f32>,
    camera: &CameraView,
    score: u32,
    cfg: &PlutoConfig,
    rng: &mut R,
) -> Option<Spawn> {
    if !should_spawn(last_y, camera) {
        return None;
    }

    let y = next_platform_y(last_y, cfg);
    let (min_x, max_x) = cfg.platform_x_range();
    let x = uniform(rng, min_x, max_x);
    let world = &cfg.world;

    let kind = if rng.random_bool(world.moving_chance.clamp(0.0, 1.0) as f64) {
        PlatformKind::Moving
    } else {
        PlatformKind::Normal
    };
    let (speed, heading) = match kind {
        PlatformKind::Moving => {
            let speed = if world.moving_speed_max > world.moving_speed_min {
                rng.random_range(world.moving_speed_min..world.moving_speed_max)
            } else {
                world.moving_speed_min
            };
            (speed, random_heading(rng))
        },
        PlatformKind::Normal => (0.0, Heading::Right),
    };
    let mut platform = Platform::new(x, y, kind, speed, heading, cfg);

    // Occupants only on normal platforms; enemy first, power-up as fallback
    if kind == PlatformKind::Normal {
        if rng.random_bool(enemy_probability(score, &cfg.difficulty) as f64) {
            platform.occupant = Occupant::Enemy;
        } else if rng.random_bool(power_up_probability(score, &cfg.difficulty) as f64) {
            platform.occupant = Occupant::PowerUp;
        }
    }

    let enemy = platform.has_enemy().then(|| {
        let pattern = if rng.random_bool(world.spike_chance.clamp(0.0, 1.0) as f64) {
            EnemyPattern::Spike
        } else {
            EnemyPattern::Patrol
        };
        let ex = uniform(rng, platform.x, platform.x + platform.width - world.enemy_width);
        Enemy::on_platform(&platform, ex, pattern, random_heading(rng), cfg)
    });

    let power_up = platform.has_power_up().then(|| {
        let kind = EffectKind::ALL[rng.random_range(0..EffectKind::ALL.len())];
        let px = uniform(rng, platform.x, platform.x + platform.width - world.power_up_size);
        PowerUp::on_platform(&platform, px, kind, cfg)
    });

    tracing::debug!(
        y,
        x = platform.x,
        ?kind,
        occupant = ?platform.occupant,
        score,
        "Spawned platform"
    );

    Some(Spawn {
        platform,
        enemy,
        power_up,
    })
}
