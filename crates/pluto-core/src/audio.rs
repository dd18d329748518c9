use serde::{Deserialize, Serialize};

/// Discrete cues sent to the audio collaborator. There is no feedback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEvent {
    /// Start the looping music track.
    PlayMusic,
    /// Flip between muted and playing.
    ToggleMute,
    /// Fade the music out on shutdown.
    FadeOut,
}

pub trait AudioSink {
    fn play(&mut self, event: AudioEvent);
}

/// Sink that records cues, for tests.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub events: Vec<AudioEvent>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, event: AudioEvent) {
        self.events.push(event);
    }
}
