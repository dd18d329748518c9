pub mod audio;
pub mod easing;
pub mod effect;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod storage;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::FrameGame;
    use crate::input::{Key, KeySnapshot};

    /// Run `n` frames with the same key snapshot, returning all events.
    pub fn run_frames<G: FrameGame>(game: &mut G, n: usize, keys: KeySnapshot) -> Vec<G::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(&keys));
        }
        all_events
    }

    /// Run frames until `done` returns true or `max` frames have passed.
    /// Returns the number of frames run.
    pub fn run_until<G: FrameGame>(
        game: &mut G,
        max: usize,
        keys: KeySnapshot,
        mut done: impl FnMut(&G) -> bool,
    ) -> usize {
        for frame in 0..max {
            if done(game) {
                return frame;
            }
            game.update(&keys);
        }
        max
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed<G: FrameGame>(game: &G, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // FrameGame Contract Tests
    // ================================================================
    // Generic checks every FrameGame implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules with a fresh instance.

    /// A freshly started game must serialize to non-empty bytes.
    pub fn contract_start_creates_state<G: FrameGame>(game: &G) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes after start"
        );
        assert!(!game.is_run_over(), "A new run must not start finished");
    }

    /// update() must advance state even with no keys held (frame counter).
    pub fn contract_update_advances_frame<G: FrameGame>(game: &mut G) {
        let before = game.serialize_state();
        game.update(&KeySnapshot::empty());
        assert_game_state_changed(game, &before);
    }

    /// serialize → apply → serialize must be stable.
    pub fn contract_state_roundtrip_preserves<G: FrameGame>(game: &mut G) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage snapshots must be ignored.
    pub fn contract_apply_garbage_ignored<G: FrameGame>(game: &mut G) {
        let before = game.serialize_state();
        game.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB]);
        assert_eq!(before, game.serialize_state(), "Garbage must not replace state");
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates<G: FrameGame>(game: &mut G) {
        game.pause();
        let before = game.serialize_state();
        game.update(&KeySnapshot::empty());
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(&KeySnapshot::empty());
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// Holding Quit must end the run on that frame, and later updates are no-ops.
    pub fn contract_quit_ends_run<G: FrameGame>(game: &mut G) {
        game.update(&KeySnapshot::from_keys(&[Key::Quit]));
        assert!(game.is_run_over(), "Quit must end the run");

        let after_quit = game.serialize_state();
        game.update(&KeySnapshot::empty());
        assert_eq!(
            after_quit,
            game.serialize_state(),
            "Updates after the run ends must be no-ops"
        );
    }
}
