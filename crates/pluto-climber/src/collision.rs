use crate::config::PlutoConfig;
use crate::enemy::Enemy;
use crate::entity::Hitbox;
use crate::physics::PlayerState;
use crate::platform::Platform;
use crate::powerups::{EffectKind, Effects, PowerUp};

/// What a collision pass changed. Collisions only trigger state transitions;
/// nothing is pushed apart here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collision {
    /// First landing on the platform at this index.
    PlatformTouched { index: usize },
    EnemyKilled { anchor: (f32, f32) },
    PlayerKilled,
    PowerUpCollected { kind: EffectKind },
}

/// Axis-aligned hitbox intersection.
pub fn collided_with(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    a.hitbox().intersects(&b.hitbox())
}

/// Player resting on or descending into the platform top.
pub fn stands_on(player: &PlayerState, platform: &Platform) -> bool {
    player.vy >= 0.0 && player.feet().intersects(&platform.hitbox())
}

/// Outcome of touching a live enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyOutcome {
    EnemyKilled,
    PlayerKilled,
}

/// Invincibility turns a deadly touch into a kill anchored at the player's feet.
pub fn resolve_enemy(
    player: &mut PlayerState,
    enemy: &mut Enemy,
    effects: &Effects,
    cfg: &PlutoConfig,
) -> EnemyOutcome {
    if effects.is_active(EffectKind::Invincibility) {
        enemy.die(player.feet_anchor(), cfg.world.kill_animation_frames);
        EnemyOutcome::EnemyKilled
    } else {
        player.die();
        EnemyOutcome::PlayerKilled
    }
}

/// Resolve every player collision for this frame: enemies, then power-ups,
/// then platforms. Stops as soon as the player dies.
///
/// `frame_rate` is the rate in effect this frame; collected effects get
/// their duration converted with it.
pub fn resolve(
    player: &mut PlayerState,
    platforms: &mut [Platform],
    enemies: &mut [Enemy],
    power_ups: &mut [PowerUp],
    effects: &mut Effects,
    cfg: &PlutoConfig,
    frame_rate: f32,
) -> Vec<Collision> {
    let mut out = Vec::new();
    if !player.alive {
        return out;
    }

    for enemy in enemies.iter_mut() {
        if !enemy.is_alive() || !collided_with(&*player, &*enemy) {
            continue;
        }
        match resolve_enemy(player, enemy, effects, cfg) {
            EnemyOutcome::EnemyKilled => {
                tracing::debug!(x = enemy.x, y = enemy.y, "Enemy killed");
                out.push(Collision::EnemyKilled {
                    anchor: player.feet_anchor(),
                });
            },
            EnemyOutcome::PlayerKilled => {
                tracing::debug!(x = enemy.x, y = enemy.y, "Player killed by enemy");
                out.push(Collision::PlayerKilled);
                return out;
            },
        }
    }

    for pu in power_ups.iter_mut() {
        if pu.consumed || !collided_with(&*player, &*pu) {
            continue;
        }
        let frames = pu.kind.duration_frames(&cfg.effects, frame_rate);
        effects.activate(pu.kind, frames);
        pu.consume();
        tracing::debug!(kind = ?pu.kind, frames, "Power-up collected");
        out.push(Collision::PowerUpCollected { kind: pu.kind });
    }

    for (index, platform) in platforms.iter_mut().enumerate() {
        if !platform.touched() && stands_on(player, platform) {
            platform.touch();
            out.push(Collision::PlatformTouched { index });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyPattern;
    use crate::entity::Heading;
    use crate::platform::PlatformKind;

    struct World {
        cfg: PlutoConfig,
        player: PlayerState,
        platforms: Vec<Platform>,
        enemies: Vec<Enemy>,
        power_ups: Vec<PowerUp>,
        effects: Effects,
    }

    impl World {
        /// Player standing on a single platform at y=400.
        fn new() -> Self {
            let cfg = PlutoConfig::default();
            let platform =
                Platform::new(150.0, 400.0, PlatformKind::Normal, 0.0, Heading::Right, &cfg);
            let mut player = PlayerState::new(
                175.0,
                platform.hitbox().top() - cfg.player.height,
                &cfg.player,
            );
            player.grounded = true;
            Self {
                cfg,
                player,
                platforms: vec![platform],
                enemies: Vec::new(),
                power_ups: Vec::new(),
                effects: Effects::default(),
            }
        }

        fn enemy_on_player(&mut self) {
            let e = Enemy::on_platform(
                &self.platforms[0],
                self.player.x,
                EnemyPattern::Spike,
                Heading::Left,
                &self.cfg,
            );
            self.enemies.push(e);
        }

        fn resolve(&mut self) -> Vec<Collision> {
            resolve(
                &mut self.player,
                &mut self.platforms,
                &mut self.enemies,
                &mut self.power_ups,
                &mut self.effects,
                &self.cfg,
                self.cfg.timing.frame_rate,
            )
        }
    }

    #[test]
    fn landing_touches_platform_once() {
        let mut w = World::new();
        assert_eq!(w.resolve(), vec![Collision::PlatformTouched { index: 0 }]);
        assert!(w.platforms[0].touched());
        assert!(w.resolve().is_empty());
    }

    #[test]
    fn rising_player_does_not_touch() {
        let mut w = World::new();
        w.player.vy = -5.0;
        assert!(w.resolve().is_empty());
        assert!(!w.platforms[0].touched());
    }

    #[test]
    fn enemy_kills_unprotected_player() {
        let mut w = World::new();
        w.enemy_on_player();
        let out = w.resolve();
        assert_eq!(out, vec![Collision::PlayerKilled]);
        assert!(!w.player.alive);
        assert!(w.enemies[0].is_alive());
        assert!(!w.platforms[0].touched(), "Resolution stops on death");
    }

    #[test]
    fn invincible_player_kills_enemy() {
        let mut w = World::new();
        w.enemy_on_player();
        w.effects.activate(EffectKind::Invincibility, 10);
        let out = w.resolve();
        assert!(matches!(out[0], Collision::EnemyKilled { .. }));
        assert!(w.player.alive);
        assert!(!w.enemies[0].is_alive());

        // A dying enemy never hurts
        w.effects = Effects::default();
        let out = w.resolve();
        assert!(!out.contains(&Collision::PlayerKilled));
        assert!(w.player.alive);
    }

    #[test]
    fn power_up_applies_effect_and_is_consumed() {
        let mut w = World::new();
        let pu = PowerUp::on_platform(&w.platforms[0], w.player.x, EffectKind::DoublePoints, &w.cfg);
        w.power_ups.push(pu);
        let out = w.resolve();
        assert!(out.contains(&Collision::PowerUpCollected {
            kind: EffectKind::DoublePoints
        }));
        assert!(w.power_ups[0].consumed);
        assert_eq!(w.effects.double_points.remaining(), 225);

        let again = w.resolve();
        assert!(again.iter().all(|c| !matches!(c, Collision::PowerUpCollected { .. })));
    }

    #[test]
    fn power_up_duration_uses_current_rate() {
        let mut w = World::new();
        let pu = PowerUp::on_platform(&w.platforms[0], w.player.x, EffectKind::Invincibility, &w.cfg);
        w.power_ups.push(pu);
        resolve(
            &mut w.player,
            &mut w.platforms,
            &mut w.enemies,
            &mut w.power_ups,
            &mut w.effects,
            &w.cfg,
            90.0,
        );
        assert_eq!(w.effects.invincibility.remaining(), 270);
    }

    #[test]
    fn dead_player_collides_with_nothing() {
        let mut w = World::new();
        w.player.die();
        assert!(w.resolve().is_empty());
    }

    #[test]
    fn collided_with_is_strict() {
        let w = World::new();
        // Player rests exactly on the platform top; hitboxes only share an edge
        assert!(!collided_with(&w.player, &w.platforms[0]));
        assert!(stands_on(&w.player, &w.platforms[0]));
    }
}
