use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Window size in world units (pixels at 1:1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 800.0,
        }
    }
}

/// Tick rate and the debug speed multipliers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Frame rate all per-frame speeds are tuned for (Hz).
    pub frame_rate: f32,
    pub fast_forward_multiplier: f32,
    pub slow_motion_multiplier: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            frame_rate: 45.0,
            fast_forward_multiplier: 2.0,
            slow_motion_multiplier: 0.5,
        }
    }
}

/// Platform, enemy and power-up geometry plus spawn odds that do not scale
/// with score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Vertical distance between consecutive platforms.
    pub platform_gap: f32,
    /// Horizontal margin kept clear at both window edges.
    pub padding: f32,
    pub platform_width: f32,
    pub platform_height: f32,
    /// Rows removed from the top of the platform sprite for its hitbox.
    pub hitbox_trim_top: f32,
    pub hitbox_height: f32,
    pub moving_chance: f32,
    /// Moving platform speed is drawn from `[min, max)` px/frame.
    pub moving_speed_min: f32,
    pub moving_speed_max: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
    /// Share of enemies that are static spikes instead of patrollers.
    pub spike_chance: f32,
    pub power_up_size: f32,
    /// Gap between a power-up and the platform surface below it.
    pub power_up_hover: f32,
    pub kill_animation_frames: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            platform_gap: 200.0,
            padding: 20.0,
            platform_width: 100.0,
            platform_height: 30.0,
            hitbox_trim_top: 7.0,
            hitbox_height: 20.0,
            moving_chance: 0.10,
            moving_speed_min: 0.5,
            moving_speed_max: 2.0,
            enemy_width: 40.0,
            enemy_height: 40.0,
            enemy_speed: 1.2,
            spike_chance: 0.3,
            power_up_size: 32.0,
            power_up_hover: 6.0,
            kill_animation_frames: 20,
        }
    }
}

/// Player sprite and jump model, in px and px/frame at the base frame rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPhysicsConfig {
    pub width: f32,
    pub height: f32,
    /// Transparent columns trimmed from each side of the sprite for the hitbox.
    pub hitbox_side_trim: f32,
    pub run_speed: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub max_fall_speed: f32,
    pub animation_frames: u32,
    pub animation_speed: f32,
}

impl Default for PlayerPhysicsConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 60.0,
            hitbox_side_trim: 8.0,
            run_speed: 6.0,
            gravity: 0.6,
            jump_velocity: 17.0,
            max_fall_speed: 20.0,
            animation_frames: 4,
            animation_speed: 0.2,
        }
    }
}

impl PlayerPhysicsConfig {
    /// Highest rise of the feet above the take-off point at the base rate.
    pub fn jump_apex(&self) -> f32 {
        if self.gravity <= 0.0 {
            return f32::INFINITY;
        }
        let rising_frames = (self.jump_velocity / self.gravity).floor();
        rising_frames * self.jump_velocity
            - self.gravity * rising_frames * (rising_frames + 1.0) / 2.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// World y the player's peak must pass before the camera starts to scroll.
    pub follow_line_y: f32,
    /// Extra room below the window, in player heights, before a fall ends the run.
    pub fall_margin_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_line_y: 400.0,
            fall_margin_factor: 1.5,
        }
    }
}

/// Score-driven spawn odds. Each probability ramps linearly from its floor at
/// score 0 to its cap at `saturation_score` and stays there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub enemy_floor: f32,
    pub enemy_cap: f32,
    pub power_up_floor: f32,
    pub power_up_cap: f32,
    pub saturation_score: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            enemy_floor: 0.25,
            enemy_cap: 0.80,
            power_up_floor: 0.30,
            power_up_cap: 0.85,
            saturation_score: 200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub invincibility_secs: f32,
    pub double_points_secs: f32,
    pub score_boost_secs: f32,
    /// Points granted immediately by a score boost.
    pub score_boost_points: u32,
    pub cheat_invincibility_frames: u32,
    pub cheat_double_points_frames: u32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            invincibility_secs: 3.0,
            double_points_secs: 5.0,
            score_boost_secs: 0.8,
            score_boost_points: 5,
            cheat_invincibility_frames: 20,
            cheat_double_points_frames: 30,
        }
    }
}

/// Presentation-only parameters used when building a frame view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub background_height: f32,
    /// Ascent, in window heights, over which the background scrolls fully.
    pub background_span_screens: f32,
    pub clouds_height: f32,
    /// Distance between the player sprite and effect cues.
    pub cue_spacing: f32,
    pub cue_max_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_height: 3200.0,
            background_span_screens: 35.0,
            clouds_height: 160.0,
            cue_spacing: 15.0,
            cue_max_size: 30.0,
        }
    }
}

/// Top-level game configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlutoConfig {
    pub window: WindowConfig,
    pub timing: TimingConfig,
    pub world: WorldConfig,
    pub player: PlayerPhysicsConfig,
    pub camera: CameraConfig,
    pub difficulty: DifficultyConfig,
    pub effects: EffectsConfig,
    pub render: RenderConfig,
    pub cheats_enabled: bool,
    /// Fixed RNG seed. A random seed is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for PlutoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            timing: TimingConfig::default(),
            world: WorldConfig::default(),
            player: PlayerPhysicsConfig::default(),
            camera: CameraConfig::default(),
            difficulty: DifficultyConfig::default(),
            effects: EffectsConfig::default(),
            render: RenderConfig::default(),
            cheats_enabled: true,
            seed: None,
        }
    }
}

impl PlutoConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("PLUTO_CONFIG").unwrap_or_else(|_| "config/pluto.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reject geometry and odds the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("window width", self.window.width),
            ("window height", self.window.height),
            ("platform gap", self.world.platform_gap),
            ("platform width", self.world.platform_width),
            ("frame rate", self.timing.frame_rate),
            ("fast-forward multiplier", self.timing.fast_forward_multiplier),
            ("slow-motion multiplier", self.timing.slow_motion_multiplier),
            ("platform height", self.world.platform_height),
            ("platform hitbox height", self.world.hitbox_height),
            ("enemy width", self.world.enemy_width),
            ("enemy height", self.world.enemy_height),
            ("power-up size", self.world.power_up_size),
            ("player width", self.player.width),
            ("player height", self.player.height),
            ("run speed", self.player.run_speed),
            ("gravity", self.player.gravity),
            ("jump velocity", self.player.jump_velocity),
            ("max fall speed", self.player.max_fall_speed),
            ("difficulty saturation score", self.difficulty.saturation_score),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let w = &self.world;
        let non_negative = [
            ("platform padding", w.padding),
            ("platform hitbox top trim", w.hitbox_trim_top),
            ("moving platform min speed", w.moving_speed_min),
            ("enemy speed", w.enemy_speed),
            ("power-up hover", w.power_up_hover),
            ("player hitbox side trim", self.player.hitbox_side_trim),
            ("animation speed", self.player.animation_speed),
            ("camera fall margin factor", self.camera.fall_margin_factor),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if !self.camera.follow_line_y.is_finite() {
            return Err(ConfigError::Negative {
                name: "camera follow line",
                value: self.camera.follow_line_y,
            });
        }

        if self.window.width < w.platform_width + 2.0 * w.padding {
            return Err(ConfigError::WindowTooNarrow {
                width: self.window.width,
                platform_width: w.platform_width,
                padding: w.padding,
            });
        }
        if !(w.moving_speed_min < w.moving_speed_max && w.moving_speed_max.is_finite()) {
            return Err(ConfigError::EmptySpeedRange {
                min: w.moving_speed_min,
                max: w.moving_speed_max,
            });
        }

        let d = &self.difficulty;
        let probabilities = [
            ("moving platform", w.moving_chance),
            ("spike", w.spike_chance),
            ("enemy floor", d.enemy_floor),
            ("enemy cap", d.enemy_cap),
            ("power-up floor", d.power_up_floor),
            ("power-up cap", d.power_up_cap),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        for (name, floor, cap) in [
            ("enemy", d.enemy_floor, d.enemy_cap),
            ("power-up", d.power_up_floor, d.power_up_cap),
        ] {
            if floor > cap {
                return Err(ConfigError::FloorAboveCap { name, floor, cap });
            }
        }

        let apex = self.player.jump_apex();
        if apex <= w.platform_gap {
            return Err(ConfigError::UnreachableGap {
                apex,
                gap: w.platform_gap,
            });
        }
        Ok(())
    }

    /// Lowest and highest x a platform's left edge may take.
    pub fn platform_x_range(&self) -> (f32, f32) {
        let min = self.world.padding;
        let max = self.window.width - self.world.platform_width - self.world.padding;
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PlutoConfig::default().validate(), Ok(()));
    }

    #[test]
    fn narrow_window_is_fatal() {
        let mut cfg = PlutoConfig::default();
        cfg.window.width = 120.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::WindowTooNarrow { .. })
        ));
    }

    #[test]
    fn exact_fit_window_is_allowed() {
        let mut cfg = PlutoConfig::default();
        cfg.window.width = cfg.world.platform_width + 2.0 * cfg.world.padding;
        assert_eq!(cfg.validate(), Ok(()));
        let (min, max) = cfg.platform_x_range();
        assert_eq!(min, max);
    }

    #[test]
    fn zero_gap_is_fatal() {
        let mut cfg = PlutoConfig::default();
        cfg.world.platform_gap = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive {
                name: "platform gap",
                ..
            })
        ));
    }

    #[test]
    fn inverted_odds_are_fatal() {
        let mut cfg = PlutoConfig::default();
        cfg.difficulty.enemy_floor = 0.9;
        cfg.difficulty.enemy_cap = 0.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::FloorAboveCap { name: "enemy", .. })
        ));

        let mut cfg = PlutoConfig::default();
        cfg.world.moving_chance = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn weak_jump_is_fatal() {
        let mut cfg = PlutoConfig::default();
        cfg.player.jump_velocity = 10.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::UnreachableGap { .. })
        ));
    }

    #[test]
    fn default_jump_clears_default_gap() {
        let cfg = PlutoConfig::default();
        let apex = cfg.player.jump_apex();
        assert!((apex - 232.4).abs() < 0.1, "apex was {apex}");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = PlutoConfig::from_toml(
            r#"
            cheats_enabled = false
            seed = 7

            [world]
            platform_gap = 180.0
            "#,
        )
        .unwrap();
        assert!(!cfg.cheats_enabled);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.world.platform_gap, 180.0);
        assert_eq!(cfg.world.padding, 20.0);
        assert_eq!(cfg.window.height, 800.0);
    }

    #[test]
    fn nan_padding_is_fatal() {
        let cfg = PlutoConfig::from_toml("[world]\npadding = nan").unwrap();
        assert!(cfg.world.padding.is_nan());
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Negative {
                name: "platform padding",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_geometry_and_motion_are_fatal() {
        let breakers: [fn(&mut PlutoConfig); 8] = [
            |c| c.world.hitbox_trim_top = f32::NAN,
            |c| c.world.hitbox_height = 0.0,
            |c| c.world.enemy_width = f32::INFINITY,
            |c| c.world.enemy_height = -1.0,
            |c| c.world.power_up_size = f32::NAN,
            |c| c.player.run_speed = f32::NAN,
            |c| c.player.jump_velocity = -17.0,
            |c| c.player.max_fall_speed = f32::INFINITY,
        ];
        for (i, brk) in breakers.iter().enumerate() {
            let mut cfg = PlutoConfig::default();
            brk(&mut cfg);
            assert!(cfg.validate().is_err(), "case {i} should be rejected");
        }
    }

    #[test]
    fn nan_speed_range_is_fatal() {
        let mut cfg = PlutoConfig::default();
        cfg.world.moving_speed_max = f32::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptySpeedRange { .. })
        ));
    }

    #[test]
    fn nan_padding_config_fails_to_start() {
        let cfg = PlutoConfig::from_toml("[world]\npadding = nan").unwrap();
        assert!(crate::PlutoClimber::with_config(cfg).is_err());
    }

    #[test]
    fn shipped_config_is_valid() {
        let cfg = PlutoConfig::from_toml(include_str!("../../../config/pluto.toml")).unwrap();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.timing.frame_rate, 45.0);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = ConfigError::WindowTooNarrow {
            width: 100.0,
            platform_width: 100.0,
            padding: 20.0,
        };
        assert!(err.to_string().contains("cannot fit"));
    }
}
