mod autopilot;
mod game_loop;
mod sinks;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use pluto_climber::PlutoClimber;
use pluto_climber::config::PlutoConfig;
use pluto_core::storage::{self, FileHighScoreStore};

use game_loop::LoopOptions;
use sinks::{LoggingAudio, LoggingRender};

/// Frames between render summaries in the log.
const RENDER_LOG_EVERY: u64 = 60;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = PlutoConfig::load();
    let mut game = match PlutoClimber::with_config(config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        },
    };

    let mut store = FileHighScoreStore::from_env();
    game.set_high_score(storage::load_high_score_or_zero(&store));
    tracing::info!(
        high_score = game.state().high_score,
        path = %store.path().display(),
        "Pluto starting"
    );

    let mut audio = LoggingAudio::default();
    let mut render = LoggingRender::new(RENDER_LOG_EVERY);
    let summary = game_loop::run(&mut game, &mut audio, &mut render, LoopOptions::from_env()).await;

    storage::save_high_score_logged(&mut store, summary.high_score);
    tracing::info!(
        frames = summary.frames,
        score = summary.score,
        high_score = summary.high_score,
        presented = render.presented(),
        audio_cues = audio.cues,
        "Pluto stopped"
    );
    ExitCode::SUCCESS
}
