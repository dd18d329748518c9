use serde::{Deserialize, Serialize};

use crate::input::KeySnapshot;

/// Frame-synchronous game driven by a host loop.
///
/// The host owns pacing, input polling, rendering and persistence; the game
/// only advances its own state one frame at a time.
pub trait FrameGame {
    /// Events emitted from `update` (scoring, deaths, audio cues, run end).
    type Event;

    fn metadata(&self) -> GameMetadata;

    /// Target frame rate in Hz for the next frame, including any
    /// fast-forward or slow-motion multiplier currently held.
    fn tick_rate(&self) -> f32;

    /// Advance exactly one frame using this frame's key snapshot.
    fn update(&mut self, keys: &KeySnapshot) -> Vec<Self::Event>;

    /// Serialize the full simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation state with a previously serialized one.
    /// Malformed input is ignored.
    fn apply_state(&mut self, state: &[u8]);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Whether the current run has ended (fell, died or quit).
    fn is_run_over(&self) -> bool;

    fn score(&self) -> u32;
}

/// Descriptive metadata shown by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub window_width: u32,
    pub window_height: u32,
}

/// Generates the 5 boilerplate `FrameGame` methods:
/// `serialize_state`, `apply_state`, `pause`, `resume`, `is_run_over`.
///
/// Requires the implementing struct to have `state: $StateType` and `paused: bool` fields,
/// and `$StateType` to have a `run_over: bool` field.
#[macro_export]
macro_rules! frame_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).unwrap_or_default()
        }

        fn apply_state(&mut self, state: &[u8]) {
            if let Ok(s) = rmp_serde::from_slice::<$StateType>(state) {
                self.state = s;
            }
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn resume(&mut self) {
            self.paused = false;
        }

        fn is_run_over(&self) -> bool {
            self.state.run_over
        }
    };
}
