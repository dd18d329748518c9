use pluto_climber::render::{FrameView, RenderSink};
use pluto_core::audio::{AudioEvent, AudioSink};

/// Audio collaborator for headless runs: every cue becomes a log line.
#[derive(Debug, Default)]
pub struct LoggingAudio {
    pub cues: usize,
}

impl AudioSink for LoggingAudio {
    fn play(&mut self, event: AudioEvent) {
        self.cues += 1;
        tracing::info!(?event, "Audio cue");
    }
}

/// Render collaborator for headless runs. Logs a summary of every
/// `every`-th frame it is handed.
#[derive(Debug)]
pub struct LoggingRender {
    every: u64,
    presented: u64,
}

impl LoggingRender {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl RenderSink for LoggingRender {
    fn present(&mut self, view: &FrameView) {
        self.presented += 1;
        if self.presented % self.every != 0 {
            return;
        }
        tracing::debug!(
            frame = self.presented,
            sprites = view.sprites.len(),
            score = view.score,
            high_score = view.high_score,
            background_y = view.background_y,
            shield = view.shield.is_some(),
            cue = ?view.cue.map(|c| c.cue),
            "Frame"
        );
    }
}
