use pluto_climber::PlutoClimber;
use pluto_climber::config::PlutoConfig;
use pluto_climber::entity::{Heading, Hitbox};
use pluto_climber::platform::{Platform, PlatformKind};

/// Config whose generator never places enemies or power-ups.
pub fn peaceful_config() -> PlutoConfig {
    let mut cfg = PlutoConfig::default();
    cfg.difficulty.enemy_floor = 0.0;
    cfg.difficulty.enemy_cap = 0.0;
    cfg.difficulty.power_up_floor = 0.0;
    cfg.difficulty.power_up_cap = 0.0;
    cfg
}

pub fn peaceful_game() -> PlutoClimber {
    game_with(peaceful_config())
}

pub fn game_with(cfg: PlutoConfig) -> PlutoClimber {
    PlutoClimber::with_seed(cfg, 1234).expect("test config is valid")
}

/// A fresh, untouched copy of the launch pad placed right under the player.
pub fn fresh_pad_under_player(game: &PlutoClimber) -> Platform {
    let pad = &game.state().platforms[0];
    Platform::new(
        pad.x,
        pad.y,
        PlatformKind::Normal,
        0.0,
        Heading::Right,
        game.config(),
    )
}

/// Whether the player currently rests on the launch pad.
pub fn on_launch_pad(game: &PlutoClimber) -> bool {
    let s = game.state();
    s.player.grounded && s.player.hitbox().bottom() == s.platforms[0].hitbox().top()
}
