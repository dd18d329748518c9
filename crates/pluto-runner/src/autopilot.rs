use pluto_climber::GameState;
use pluto_climber::config::PlutoConfig;
use pluto_climber::entity::Hitbox;
use pluto_climber::platform::Platform;
use pluto_climber::powerups::EffectKind;
use pluto_core::input::{Key, KeySnapshot};

/// Horizontal slack, in px, inside which the autopilot stops steering.
const STEER_DEADZONE: f32 = 4.0;

/// Platform the current jump should end on. Grounded: the next one up.
/// Airborne: the first platform top below the apex of this jump.
fn target_platform<'a>(state: &'a GameState, config: &PlutoConfig) -> Option<&'a Platform> {
    let player = &state.player;
    let feet = player.hitbox().bottom();
    let top = |p: &&Platform| p.hitbox().top();

    if player.grounded {
        return state
            .platforms
            .iter()
            .filter(|p| top(p) < feet - 1.0)
            .max_by(|a, b| top(a).total_cmp(&top(b)));
    }

    let apex = if player.vy < 0.0 && config.player.gravity > 0.0 {
        feet - player.vy * player.vy / (2.0 * config.player.gravity)
    } else {
        feet
    };
    state
        .platforms
        .iter()
        .filter(|p| top(p) >= apex)
        .min_by(|a, b| top(a).total_cmp(&top(b)))
}

/// x the player's centre should aim for on `target`: the middle, or the end
/// farthest from a live enemy unless invincible.
fn landing_x(state: &GameState, target: &Platform) -> f32 {
    let centre = target.x + target.width / 2.0;
    if state.effects.is_active(EffectKind::Invincibility) {
        return centre;
    }
    let half = state.player.width / 2.0;
    let guard = state.enemies.iter().find(|e| {
        e.is_alive()
            && e.min_x == target.x
            && (e.hitbox().bottom() - target.hitbox().top()).abs() < 0.5
    });
    match guard {
        Some(e) if e.x + e.width / 2.0 < centre => target.x + target.width - half,
        Some(_) => target.x + half,
        None => centre,
    }
}

/// Generate the autopilot's keys for this frame: jump whenever grounded and
/// steer toward the platform this jump should land on.
pub fn generate_autopilot_input(state: &GameState, config: &PlutoConfig) -> KeySnapshot {
    let player = &state.player;
    if !player.alive || state.run_over {
        return KeySnapshot::empty();
    }

    let mut keys = KeySnapshot::empty();
    if player.grounded {
        keys = keys.with(Key::Jump);
    }

    let Some(target) = target_platform(state, config) else {
        return keys;
    };
    let aim = landing_x(state, target).clamp(0.0, config.window.width);
    let centre = player.x + player.width / 2.0;
    if aim < centre - STEER_DEADZONE {
        keys = keys.with(Key::Left);
    } else if aim > centre + STEER_DEADZONE {
        keys = keys.with(Key::Right);
    }
    keys
}
