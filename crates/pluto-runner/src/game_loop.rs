use std::time::Duration;

use pluto_climber::render::RenderSink;
use pluto_climber::{ClimbEvent, PlutoClimber};
use pluto_core::audio::AudioSink;
use pluto_core::game_trait::FrameGame;
use pluto_core::input::{Key, KeySnapshot};

use crate::autopilot::generate_autopilot_input;

/// Host-side knobs, read from the environment by the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopOptions {
    /// Quit after this many frames.
    pub max_frames: Option<u64>,
    /// Hold the fast-forward key every frame.
    pub fast_forward: bool,
}

impl LoopOptions {
    /// `PLUTO_MAX_FRAMES` and `PLUTO_FAST_FORWARD` (any non-empty value).
    pub fn from_env() -> Self {
        let max_frames = std::env::var("PLUTO_MAX_FRAMES").ok().and_then(|v| {
            v.parse::<u64>()
                .inspect_err(|e| tracing::warn!("Ignoring PLUTO_MAX_FRAMES={v}: {e}"))
                .ok()
        });
        let fast_forward = std::env::var("PLUTO_FAST_FORWARD").is_ok_and(|v| !v.is_empty());
        Self {
            max_frames,
            fast_forward,
        }
    }
}

/// How a hosted run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub score: u32,
    pub high_score: u32,
}

fn frame_interval(tick_rate: f32) -> tokio::time::Interval {
    let mut interval = tokio::time::interval(Duration::from_secs_f32(1.0 / tick_rate));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval
}

fn dispatch(events: Vec<ClimbEvent>, audio: &mut dyn AudioSink) {
    for event in events {
        match event {
            ClimbEvent::Audio(cue) => audio.play(cue),
            ClimbEvent::PlatformSpawned { y, kind } => {
                tracing::trace!(y, ?kind, "Platform spawned");
            },
            ClimbEvent::PowerUpCollected { kind } => {
                tracing::debug!(?kind, "Power-up collected");
            },
            ClimbEvent::RunOver {
                reason,
                score,
                high_score,
            } => {
                tracing::info!(?reason, score, high_score, "Run finished");
            },
            _ => {},
        }
    }
}

/// Drive `game` one frame per tick until the run ends, ctrl-c is pressed or
/// the frame cap is hit. Input comes from the autopilot.
pub async fn run(
    game: &mut PlutoClimber,
    audio: &mut dyn AudioSink,
    render: &mut dyn RenderSink,
    options: LoopOptions,
) -> LoopSummary {
    let mut tick_rate = game.tick_rate();
    let mut interval = frame_interval(tick_rate);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut frames: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let capped = options.max_frames.is_some_and(|max| frames >= max);
                let mut keys = if capped {
                    tracing::info!(frames, "Frame cap reached");
                    KeySnapshot::from_keys(&[Key::Quit])
                } else {
                    generate_autopilot_input(game.state(), game.config())
                };
                if options.fast_forward {
                    keys = keys.with(Key::FastForward);
                }

                frames += 1;
                let events = game.update(&keys);
                dispatch(events, audio);
                render.present(&game.frame_view());

                if game.is_run_over() {
                    break;
                }

                // Speed keys change the pacing from the next frame on
                let rate = game.tick_rate();
                if rate != tick_rate {
                    tracing::debug!(from = tick_rate, to = rate, "Tick rate changed");
                    tick_rate = rate;
                    interval = frame_interval(tick_rate);
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted, ending run");
                let events = game.update(&KeySnapshot::from_keys(&[Key::Quit]));
                dispatch(events, audio);
                break;
            }
        }
    }

    LoopSummary {
        frames,
        score: game.score(),
        high_score: game.state().high_score,
    }
}
