pub mod camera;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod entity;
pub mod error;
pub mod physics;
pub mod platform;
pub mod platform_gen;
pub mod powerups;
pub mod render;
pub mod scoring;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use pluto_core::audio::AudioEvent;
use pluto_core::effect::secs_to_frames;
use pluto_core::frame_game_boilerplate;
use pluto_core::game_trait::{FrameGame, GameMetadata};
use pluto_core::input::{Key, KeyEdges, KeySnapshot};

use camera::CameraView;
use collision::Collision;
use config::{PlutoConfig, TimingConfig};
use enemy::Enemy;
use entity::{Entity, Hitbox, TickContext, prune};
use error::ConfigError;
use physics::{PlayerInput, PlayerState, step_player};
use platform::{Platform, PlatformKind};
use platform_gen::maybe_spawn_platform;
use powerups::{EffectKind, Effects, PowerUp};
use render::FrameView;

/// Debug tick-rate override, chosen from held keys each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedMode {
    #[default]
    Normal,
    FastForward,
    SlowMotion,
}

impl SpeedMode {
    pub fn multiplier(self, timing: &TimingConfig) -> f32 {
        match self {
            SpeedMode::Normal => 1.0,
            SpeedMode::FastForward => timing.fast_forward_multiplier,
            SpeedMode::SlowMotion => timing.slow_motion_multiplier,
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEnd {
    Fell,
    Killed,
    Quit,
}

/// Everything that changes during a run. Serializable for snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub frame: u64,
    pub player: PlayerState,
    /// Ordered by spawn, so the last one is always the highest.
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub effects: Effects,
    pub score: u32,
    /// Best score loaded at start, raised when a run ends above it.
    pub high_score: u32,
    pub speed: SpeedMode,
    pub muted: bool,
    pub run_over: bool,
    pub end_reason: Option<RunEnd>,
}

/// Events emitted by `PlutoClimber::update`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClimbEvent {
    ScoreChanged { score: u32 },
    PlatformSpawned { y: f32, kind: PlatformKind },
    /// First landing on the platform at world `y`.
    PlatformTouched { y: f32 },
    EnemyKilled { anchor: (f32, f32) },
    PowerUpCollected { kind: EffectKind },
    PlayerDied,
    Audio(AudioEvent),
    RunOver {
        reason: RunEnd,
        score: u32,
        high_score: u32,
    },
}

/// The endless climber.
pub struct PlutoClimber {
    config: PlutoConfig,
    state: GameState,
    rng: StdRng,
    previous_keys: KeySnapshot,
    paused: bool,
}

impl PlutoClimber {
    /// Default configuration with a random seed.
    pub fn new() -> Self {
        let config = PlutoConfig::default();
        let rng = StdRng::seed_from_u64(rand::random());
        let state = fresh_state(&config, 0);
        let mut game = Self {
            config,
            state,
            rng,
            previous_keys: KeySnapshot::empty(),
            paused: false,
        };
        game.populate();
        game
    }

    /// Validate `config` and start a run. Uses `config.seed` when present.
    pub fn with_config(config: PlutoConfig) -> Result<Self, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    /// Validate `config` and start a run with a fixed world seed.
    pub fn with_seed(config: PlutoConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = fresh_state(&config, 0);
        let mut game = Self {
            config,
            state,
            rng: StdRng::seed_from_u64(seed),
            previous_keys: KeySnapshot::empty(),
            paused: false,
        };
        game.populate();
        tracing::info!(seed, "Run started");
        Ok(game)
    }

    pub fn config(&self) -> &PlutoConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seed the best score from the persistence collaborator.
    pub fn set_high_score(&mut self, high_score: u32) {
        self.state.high_score = high_score;
    }

    /// Start a new run, keeping the best score.
    pub fn restart(&mut self) {
        let high_score = scoring::display_high_score(self.state.high_score, self.state.score);
        self.state = fresh_state(&self.config, high_score);
        self.previous_keys = KeySnapshot::empty();
        self.paused = false;
        self.populate();
        tracing::info!(high_score, "Run restarted");
    }

    /// Tick rate for the current speed mode, in Hz.
    pub fn frame_rate(&self) -> f32 {
        self.config.timing.frame_rate * self.state.speed.multiplier(&self.config.timing)
    }

    /// Per-frame motion scale that keeps gameplay speed independent of the
    /// tick rate.
    pub fn frame_rate_factor(&self) -> f32 {
        self.config.timing.frame_rate / self.frame_rate()
    }

    pub fn camera(&self) -> CameraView {
        CameraView::compute(
            self.state.player.peak_y,
            self.state.player.height,
            &self.config,
        )
    }

    pub fn frame_view(&self) -> FrameView {
        render::build_frame_view(&self.state, &self.camera(), &self.config, self.frame_rate())
    }

    /// Spawn platforms until the newest one is above the view.
    fn populate(&mut self) {
        let camera = self.camera();
        while self.spawn_next(&camera).is_some() {}
    }

    fn spawn_next(&mut self, camera: &CameraView) -> Option<(f32, PlatformKind)> {
        let last_y = self.state.platforms.last().map(|p| p.y);
        let spawn = maybe_spawn_platform(
            last_y,
            camera,
            self.state.score,
            &self.config,
            &mut self.rng,
        )?;
        let placed = (spawn.platform.y, spawn.platform.kind);
        self.state.platforms.push(spawn.platform);
        self.state.enemies.extend(spawn.enemy);
        self.state.power_ups.extend(spawn.power_up);
        Some(placed)
    }

    fn end_run(&mut self, reason: RunEnd, events: &mut Vec<ClimbEvent>) {
        if self.state.run_over {
            return;
        }
        let previous_best = self.state.high_score;
        self.state.run_over = true;
        self.state.end_reason = Some(reason);
        self.state.high_score = scoring::display_high_score(previous_best, self.state.score);
        if scoring::is_new_record(previous_best, self.state.score) {
            tracing::info!(score = self.state.score, previous_best, "New high score");
        }
        tracing::info!(
            ?reason,
            score = self.state.score,
            frame = self.state.frame,
            "Run over"
        );
        events.push(ClimbEvent::Audio(AudioEvent::FadeOut));
        events.push(ClimbEvent::RunOver {
            reason,
            score: self.state.score,
            high_score: self.state.high_score,
        });
    }

    fn add_score(&mut self, points: u32, events: &mut Vec<ClimbEvent>) {
        if points == 0 {
            return;
        }
        self.state.score = self.state.score.saturating_add(points);
        events.push(ClimbEvent::ScoreChanged {
            score: self.state.score,
        });
    }

    fn apply_cheats(&mut self, edges: &KeyEdges, events: &mut Vec<ClimbEvent>) {
        let fx = &self.config.effects;
        let (boost_points, boost_secs) = (fx.score_boost_points, fx.score_boost_secs);
        let (inv_frames, dp_frames) = (fx.cheat_invincibility_frames, fx.cheat_double_points_frames);

        if edges.just_pressed(Key::CheatScoreBoost) {
            let frames = secs_to_frames(boost_secs, self.frame_rate());
            self.state.effects.activate(EffectKind::ScoreBoost, frames);
            self.add_score(boost_points, events);
            tracing::debug!(score = self.state.score, "Cheat: score boost");
        }
        if edges.held(Key::CheatInvincibility) {
            self.state.effects.activate(EffectKind::Invincibility, inv_frames);
        }
        if edges.held(Key::CheatDoublePoints) {
            self.state.effects.activate(EffectKind::DoublePoints, dp_frames);
        }
    }

    fn step(&mut self, keys: &KeySnapshot) -> Vec<ClimbEvent> {
        if self.paused || self.state.run_over {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.state.frame += 1;
        let edges = KeyEdges::new(self.previous_keys, *keys);
        self.previous_keys = *keys;

        if self.state.frame == 1 {
            events.push(ClimbEvent::Audio(AudioEvent::PlayMusic));
        }
        if edges.held(Key::Quit) {
            self.end_run(RunEnd::Quit, &mut events);
            return events;
        }
        if edges.just_pressed(Key::ToggleMute) {
            self.state.muted = !self.state.muted;
            events.push(ClimbEvent::Audio(AudioEvent::ToggleMute));
        }

        if self.config.cheats_enabled {
            self.state.speed = if edges.held(Key::FastForward) {
                SpeedMode::FastForward
            } else if edges.held(Key::SlowMotion) {
                SpeedMode::SlowMotion
            } else {
                SpeedMode::Normal
            };
        }
        let factor = self.frame_rate_factor();
        let frame_rate = self.frame_rate();

        // Player motion, then the camera follows the new peak
        let input = PlayerInput::from_keys(keys);
        step_player(
            &mut self.state.player,
            &input,
            &self.state.platforms,
            &self.config.player,
            self.config.window.width,
            factor,
        );
        let camera = self.camera();

        // Spawn above, prune below
        if let Some((y, kind)) = self.spawn_next(&camera) {
            events.push(ClimbEvent::PlatformSpawned { y, kind });
        }
        let pruned = prune(&mut self.state.platforms, &camera)
            + prune(&mut self.state.enemies, &camera)
            + prune(&mut self.state.power_ups, &camera);
        if pruned > 0 {
            tracing::debug!(pruned, lower = camera.lower_bound, "Pruned off-screen entities");
        }

        self.state.effects.tick_all();
        // Cheat timers start after the tick so they last their full count
        if self.config.cheats_enabled {
            self.apply_cheats(&edges, &mut events);
        }

        // Entity ticks; moving platforms may carry the player
        {
            let state = &mut self.state;
            let mut ctx = TickContext {
                frame_rate_factor: factor,
                player: &mut state.player,
            };
            for p in &mut state.platforms {
                p.tick(&mut ctx);
            }
            for e in &mut state.enemies {
                e.tick(&mut ctx);
            }
            for pu in &mut state.power_ups {
                pu.tick(&mut ctx);
            }
            ctx.player.clamp_to_window(self.config.window.width);
        }

        let collisions = collision::resolve(
            &mut self.state.player,
            &mut self.state.platforms,
            &mut self.state.enemies,
            &mut self.state.power_ups,
            &mut self.state.effects,
            &self.config,
            frame_rate,
        );
        let mut killed = false;
        for c in collisions {
            match c {
                Collision::PlatformTouched { index } => {
                    if let Some(p) = self.state.platforms.get(index) {
                        events.push(ClimbEvent::PlatformTouched { y: p.y });
                    }
                },
                Collision::EnemyKilled { anchor } => events.push(ClimbEvent::EnemyKilled { anchor }),
                Collision::PlayerKilled => {
                    killed = true;
                    events.push(ClimbEvent::PlayerDied);
                },
                Collision::PowerUpCollected { kind } => {
                    events.push(ClimbEvent::PowerUpCollected { kind });
                    if kind == EffectKind::ScoreBoost {
                        self.add_score(self.config.effects.score_boost_points, &mut events);
                    }
                },
            }
        }

        let points = scoring::credit_platforms(&mut self.state.platforms, &self.state.effects);
        self.add_score(points, &mut events);

        if killed {
            self.end_run(RunEnd::Killed, &mut events);
        } else if camera.player_fell(&self.state.player.hitbox()) {
            events.push(ClimbEvent::PlayerDied);
            self.end_run(RunEnd::Fell, &mut events);
        }

        events
    }
}

impl Default for PlutoClimber {
    fn default() -> Self {
        Self::new()
    }
}

/// New run: the player standing on a centred launch pad.
fn fresh_state(config: &PlutoConfig, high_score: u32) -> GameState {
    let pad = Platform::launch_pad(config);
    let player_x = pad.x + pad.width / 2.0 - config.player.width / 2.0;
    let player_y = pad.hitbox().top() - config.player.height;
    let mut player = PlayerState::new(player_x, player_y, &config.player);
    player.grounded = true;

    GameState {
        frame: 0,
        player,
        platforms: vec![pad],
        enemies: Vec::new(),
        power_ups: Vec::new(),
        effects: Effects::default(),
        score: 0,
        high_score,
        speed: SpeedMode::Normal,
        muted: false,
        run_over: false,
        end_reason: None,
    }
}

impl FrameGame for PlutoClimber {
    type Event = ClimbEvent;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Pluto".to_string(),
            description: "Climb an endless column of platforms without falling.".to_string(),
            window_width: self.config.window.width as u32,
            window_height: self.config.window.height as u32,
        }
    }

    fn tick_rate(&self) -> f32 {
        self.frame_rate()
    }

    fn update(&mut self, keys: &KeySnapshot) -> Vec<ClimbEvent> {
        self.step(keys)
    }

    fn score(&self) -> u32 {
        self.state.score
    }

    frame_game_boilerplate!(state_type: GameState);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pluto_core::test_helpers::*;

    fn game() -> PlutoClimber {
        PlutoClimber::with_seed(PlutoConfig::default(), 42).expect("default config is valid")
    }

    /// Remove every occupant so runs are not ended by random enemies.
    fn peaceful() -> PlutoClimber {
        let mut cfg = PlutoConfig::default();
        cfg.difficulty.enemy_floor = 0.0;
        cfg.difficulty.enemy_cap = 0.0;
        cfg.difficulty.power_up_floor = 0.0;
        cfg.difficulty.power_up_cap = 0.0;
        PlutoClimber::with_seed(cfg, 42).expect("config is valid")
    }

    fn keys(ks: &[Key]) -> KeySnapshot {
        KeySnapshot::from_keys(ks)
    }

    #[test]
    fn new_run_stands_on_launch_pad() {
        let g = game();
        let s = g.state();
        assert_eq!(s.platforms[0].y, 780.0);
        assert_eq!(s.player.hitbox().bottom(), s.platforms[0].hitbox().top());
        assert!(s.player.grounded);
        assert_eq!(g.camera().offset, 0.0);
    }

    #[test]
    fn world_is_prefilled_one_gap_apart() {
        let g = game();
        let ys: Vec<f32> = g.state().platforms.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![780.0, 580.0, 380.0, 180.0, -20.0]);
    }

    #[test]
    fn standing_still_is_stable() {
        let mut g = peaceful();
        let events = run_frames(&mut g, 100, KeySnapshot::empty());
        assert!(!g.is_run_over());
        assert_eq!(g.score(), 0, "The launch pad is worth nothing");
        assert!(events.contains(&ClimbEvent::Audio(AudioEvent::PlayMusic)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = PlutoConfig::default();
        cfg.window.width = 50.0;
        assert!(matches!(
            PlutoClimber::with_seed(cfg, 1),
            Err(ConfigError::WindowTooNarrow { .. })
        ));
    }

    #[test]
    fn speed_mode_follows_held_keys() {
        let mut g = peaceful();
        assert_eq!(g.tick_rate(), 45.0);
        g.update(&keys(&[Key::FastForward]));
        assert_eq!(g.state().speed, SpeedMode::FastForward);
        assert_eq!(g.tick_rate(), 90.0);
        assert_eq!(g.frame_rate_factor(), 0.5);
        g.update(&keys(&[Key::SlowMotion]));
        assert_eq!(g.tick_rate(), 22.5);
        assert_eq!(g.frame_rate_factor(), 2.0);
        g.update(&KeySnapshot::empty());
        assert_eq!(g.state().speed, SpeedMode::Normal);
    }

    #[test]
    fn cheat_boost_is_edge_triggered() {
        let mut g = peaceful();
        let boost = keys(&[Key::CheatScoreBoost]);
        g.update(&boost);
        g.update(&boost);
        g.update(&boost);
        assert_eq!(g.score(), 5);
        assert!(g.state().effects.is_active(EffectKind::ScoreBoost));
        g.update(&KeySnapshot::empty());
        g.update(&boost);
        assert_eq!(g.score(), 10);
    }

    #[test]
    fn held_cheats_pin_timers() {
        let mut g = peaceful();
        let held = keys(&[Key::CheatInvincibility, Key::CheatDoublePoints]);
        run_frames(&mut g, 10, held);
        assert_eq!(g.state().effects.invincibility.remaining(), 20);
        assert_eq!(g.state().effects.double_points.remaining(), 30);
    }

    #[test]
    fn single_cheat_press_lasts_its_full_count() {
        let mut g = peaceful();
        let frames = g.config().effects.cheat_invincibility_frames as usize;
        g.update(&keys(&[Key::CheatInvincibility]));
        let mut active = vec![g.state().effects.is_active(EffectKind::Invincibility)];
        for _ in 0..frames {
            g.update(&KeySnapshot::empty());
            active.push(g.state().effects.is_active(EffectKind::Invincibility));
        }
        assert!(active[..frames].iter().all(|&a| a), "got {active:?}");
        assert!(!active[frames]);
    }

    #[test]
    fn first_landing_reports_platform_touched() {
        let mut g = peaceful();
        let pad = g.state().platforms[0].clone();
        let fresh = Platform::new(
            pad.x,
            pad.y,
            PlatformKind::Normal,
            0.0,
            entity::Heading::Right,
            g.config(),
        );
        g.state_mut().platforms.push(fresh);
        let events = g.update(&KeySnapshot::empty());
        assert!(events.contains(&ClimbEvent::PlatformTouched { y: pad.y }));
        let events = g.update(&KeySnapshot::empty());
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, ClimbEvent::PlatformTouched { .. }))
        );
    }

    #[test]
    fn cheats_can_be_disabled() {
        let mut cfg = PlutoConfig::default();
        cfg.cheats_enabled = false;
        let mut g = PlutoClimber::with_seed(cfg, 3).expect("config is valid");
        g.update(&keys(&[Key::CheatScoreBoost, Key::FastForward]));
        assert_eq!(g.score(), 0);
        assert_eq!(g.tick_rate(), 45.0);
    }

    #[test]
    fn mute_toggles_on_press() {
        let mut g = peaceful();
        let m = keys(&[Key::ToggleMute]);
        let events = run_frames(&mut g, 3, m);
        let toggles = events
            .iter()
            .filter(|e| **e == ClimbEvent::Audio(AudioEvent::ToggleMute))
            .count();
        assert_eq!(toggles, 1);
        assert!(g.state().muted);
    }

    #[test]
    fn quit_records_high_score() {
        let mut g = peaceful();
        g.set_high_score(2);
        g.state_mut().score = 7;
        let events = g.update(&keys(&[Key::Quit]));
        assert!(events.contains(&ClimbEvent::RunOver {
            reason: RunEnd::Quit,
            score: 7,
            high_score: 7,
        }));
        assert_eq!(g.state().end_reason, Some(RunEnd::Quit));
    }

    #[test]
    fn restart_keeps_best_score() {
        let mut g = peaceful();
        g.state_mut().score = 12;
        g.update(&keys(&[Key::Quit]));
        g.restart();
        assert!(!g.is_run_over());
        assert_eq!(g.score(), 0);
        assert_eq!(g.state().high_score, 12);
        assert_eq!(g.state().frame, 0);
    }

    #[test]
    fn walking_off_the_pad_ends_run_by_falling() {
        let mut g = peaceful();
        // Remove everything but the launch pad so nothing catches the fall
        g.state_mut().platforms.truncate(1);
        let left = keys(&[Key::Left]);
        let frames = run_until(&mut g, 600, left, |g| g.is_run_over());
        assert!(frames < 600, "Run should end by falling");
        assert_eq!(g.state().end_reason, Some(RunEnd::Fell));
    }

    #[test]
    fn climbing_scores_and_scrolls() {
        let mut g = peaceful();
        // Make every platform sit right above the pad
        for p in &mut g.state_mut().platforms {
            p.x = 150.0;
            p.kind = PlatformKind::Normal;
        }
        let jump = keys(&[Key::Jump]);
        let frames = run_until(&mut g, 400, jump, |g| g.score() >= 2);
        assert!(frames < 400, "Should reach two platforms");
        assert!(g.camera().offset > 0.0);
        assert!(!g.is_run_over());
    }

    #[test]
    fn paused_game_ignores_input() {
        let mut g = peaceful();
        g.pause();
        assert!(g.is_paused());
        g.update(&keys(&[Key::Quit]));
        assert!(!g.is_run_over());
        g.resume();
        g.update(&keys(&[Key::Quit]));
        assert!(g.is_run_over());
    }

    #[test]
    fn metadata_reports_window() {
        let g = game();
        let m = g.metadata();
        assert_eq!(m.name, "Pluto");
        assert_eq!((m.window_width, m.window_height), (400, 800));
    }

    // ================================================================
    // FrameGame contract tests
    // ================================================================

    #[test]
    fn contract_start_creates_state() {
        pluto_core::test_helpers::contract_start_creates_state(&game());
    }

    #[test]
    fn contract_update_advances_frame() {
        pluto_core::test_helpers::contract_update_advances_frame(&mut game());
    }

    #[test]
    fn contract_state_roundtrip_preserves() {
        let mut g = game();
        run_frames(&mut g, 20, KeySnapshot::empty());
        pluto_core::test_helpers::contract_state_roundtrip_preserves(&mut g);
    }

    #[test]
    fn contract_apply_garbage_ignored() {
        pluto_core::test_helpers::contract_apply_garbage_ignored(&mut game());
    }

    #[test]
    fn contract_pause_stops_updates() {
        pluto_core::test_helpers::contract_pause_stops_updates(&mut peaceful());
    }

    #[test]
    fn contract_quit_ends_run() {
        pluto_core::test_helpers::contract_quit_ends_run(&mut game());
    }

    #[test]
    fn snapshot_restores_into_fresh_game() {
        let mut a = peaceful();
        run_frames(&mut a, 30, keys(&[Key::Right]));
        let snap = a.serialize_state();
        let mut b = game();
        b.apply_state(&snap);
        assert_eq!(a.state(), b.state());
    }
}
