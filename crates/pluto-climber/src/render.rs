use serde::{Deserialize, Serialize};

use pluto_core::easing::InOut;
use pluto_core::geometry::Rect;

use crate::GameState;
use crate::camera::CameraView;
use crate::config::PlutoConfig;
use crate::enemy::EnemyLife;
use crate::entity::{Facing, Hitbox};
use crate::powerups::{Cue, EffectKind};
use crate::scoring;

/// Named image the render collaborator should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Player { facing: Facing, frame: usize },
    Platform,
    Enemy { facing: Facing },
    KillBurst { frame: u32 },
    PowerUp(EffectKind),
}

/// One sprite placement in window space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteDraw {
    pub asset: Asset,
    pub rect: Rect,
}

/// Text cue ("+5" or "2x") beside the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueDraw {
    pub cue: Cue,
    pub center: (f32, f32),
    pub size: f32,
    pub alpha: u8,
}

/// Force field drawn around the player while invincible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldDraw {
    pub center: (f32, f32),
    pub radius: f32,
    pub alpha: u8,
}

/// Small marker orbiting the player whose colour shifts from green to red as
/// the score climbs toward the difficulty cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatelliteDraw {
    pub center: (f32, f32),
    pub radius: f32,
    pub rgb: (u8, u8, u8),
}

/// Everything the render collaborator needs for one frame, in window space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    pub background_y: f32,
    /// Present only near the start of a run.
    pub clouds_y: Option<f32>,
    pub sprites: Vec<SpriteDraw>,
    pub satellite: SatelliteDraw,
    pub shield: Option<ShieldDraw>,
    pub cue: Option<CueDraw>,
    pub score: u32,
    pub high_score: u32,
    /// The live score has beaten the stored best.
    pub new_record: bool,
}

/// Render collaborator.
pub trait RenderSink {
    fn present(&mut self, view: &FrameView);
}

const SHIELD_RAMP_SECS: f32 = 0.2;
const SHIELD_MAX_ALPHA: u8 = 50;
const BOOST_RAMP_SECS: f32 = 0.2;
const DOUBLE_POINTS_RAMP_SECS: f32 = 0.3;
const SATELLITE_RADIUS: f32 = 10.0;

/// Background scroll: starts at the bottom of the image and reaches the top
/// after `background_span_screens` window heights of ascent.
pub fn background_y(offset: f32, cfg: &PlutoConfig) -> f32 {
    let max_offset = -(cfg.render.background_height - cfg.window.height).max(0.0);
    let span = cfg.render.background_span_screens * cfg.window.height;
    let progress = if span > 0.0 {
        (offset / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    max_offset * (1.0 - progress)
}

/// Cloud floor position, or `None` once it has scrolled out of view.
pub fn clouds_y(offset: f32, cfg: &PlutoConfig) -> Option<f32> {
    (offset < cfg.window.height)
        .then(|| cfg.window.height - (cfg.render.clouds_height - 10.0) + offset)
}

fn satellite_rgb(score: u32, saturation: f32) -> (u8, u8, u8) {
    let t = if saturation > 0.0 {
        (score as f32 / saturation).clamp(0.0, 1.0)
    } else {
        1.0
    };
    ((255.0 * t) as u8, (255.0 * (1.0 - t)) as u8, 0)
}

pub fn build_frame_view(
    state: &GameState,
    camera: &CameraView,
    cfg: &PlutoConfig,
    frame_rate: f32,
) -> FrameView {
    let player = &state.player;
    let mut sprites = Vec::with_capacity(
        state.platforms.len() + state.enemies.len() + state.power_ups.len() + 1,
    );

    for p in &state.platforms {
        sprites.push(SpriteDraw {
            asset: Asset::Platform,
            rect: camera.to_screen(p.sprite()),
        });
    }
    for pu in &state.power_ups {
        if pu.consumed {
            continue;
        }
        sprites.push(SpriteDraw {
            asset: Asset::PowerUp(pu.kind),
            rect: camera.to_screen(pu.hitbox().offset_y(pu.bob_offset())),
        });
    }
    for e in &state.enemies {
        match e.life {
            EnemyLife::Alive => sprites.push(SpriteDraw {
                asset: Asset::Enemy { facing: e.facing() },
                rect: camera.to_screen(e.sprite()),
            }),
            EnemyLife::Dying { timer, anchor } => {
                let size = e.width;
                let burst = Rect::new(anchor.0 - size / 2.0, anchor.1 - size / 2.0, size, size);
                let frame = cfg
                    .world
                    .kill_animation_frames
                    .saturating_sub(timer.remaining());
                sprites.push(SpriteDraw {
                    asset: Asset::KillBurst { frame },
                    rect: camera.to_screen(burst),
                });
            },
            EnemyLife::Dead => {},
        }
    }

    let player_rect = camera.to_screen(Rect::new(player.x, player.y, player.width, player.height));
    sprites.push(SpriteDraw {
        asset: Asset::Player {
            facing: player.facing,
            frame: player.animation_index(),
        },
        rect: player_rect,
    });

    let fx = &state.effects;
    let shield = fx.invincibility.is_active().then(|| {
        let curve = InOut {
            initial: 0.0,
            max: player.height,
            max_alpha: SHIELD_MAX_ALPHA,
            total_secs: cfg.effects.invincibility_secs,
            ramp_secs: SHIELD_RAMP_SECS,
        };
        let (radius, alpha) = curve.sample(fx.invincibility.remaining() as f32 / frame_rate);
        ShieldDraw {
            center: player_rect.center(),
            radius,
            alpha,
        }
    });

    let cue = fx.cue().map(|cue| {
        let (timer, total_secs, ramp_secs) = match cue {
            Cue::ScoreBoost => (fx.score_boost, cfg.effects.score_boost_secs, BOOST_RAMP_SECS),
            Cue::DoublePoints => (
                fx.double_points,
                cfg.effects.double_points_secs,
                DOUBLE_POINTS_RAMP_SECS,
            ),
        };
        let curve = InOut {
            initial: 0.0,
            max: cfg.render.cue_max_size,
            max_alpha: u8::MAX,
            total_secs,
            ramp_secs,
        };
        let (size, alpha) = curve.sample(timer.remaining() as f32 / frame_rate);
        CueDraw {
            cue,
            center: (
                player_rect.right() + cfg.render.cue_spacing,
                player_rect.top(),
            ),
            size,
            alpha,
        }
    });

    FrameView {
        background_y: background_y(camera.offset, cfg),
        clouds_y: clouds_y(camera.offset, cfg),
        sprites,
        satellite: SatelliteDraw {
            center: (player_rect.left(), player_rect.top()),
            radius: SATELLITE_RADIUS,
            rgb: satellite_rgb(state.score, cfg.difficulty.saturation_score),
        },
        shield,
        cue,
        score: state.score,
        high_score: scoring::display_high_score(state.high_score, state.score),
        new_record: scoring::is_new_record(state.high_score, state.score),
    }
}
