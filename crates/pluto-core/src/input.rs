use serde::{Deserialize, Serialize};

/// Logical keys the core reacts to. Physical bindings belong to the input
/// collaborator (arrow keys and WASD both map onto `Left`/`Right`/`Jump`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Jump,
    ToggleMute,
    Quit,
    CheatScoreBoost,
    CheatInvincibility,
    CheatDoublePoints,
    FastForward,
    SlowMotion,
}

impl Key {
    pub const ALL: [Key; 10] = [
        Key::Left,
        Key::Right,
        Key::Jump,
        Key::ToggleMute,
        Key::Quit,
        Key::CheatScoreBoost,
        Key::CheatInvincibility,
        Key::CheatDoublePoints,
        Key::FastForward,
        Key::SlowMotion,
    ];

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Immutable set of keys held down during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySnapshot {
    bits: u16,
}

impl KeySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: &[Key]) -> Self {
        keys.iter().fold(Self::empty(), |snap, &k| snap.with(k))
    }

    pub fn with(mut self, key: Key) -> Self {
        self.bits |= key.bit();
        self
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.bits & key.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// Previous and current snapshots, for keys that fire once per press.
#[derive(Debug, Clone, Copy)]
pub struct KeyEdges {
    pub previous: KeySnapshot,
    pub current: KeySnapshot,
}

impl KeyEdges {
    pub fn new(previous: KeySnapshot, current: KeySnapshot) -> Self {
        Self { previous, current }
    }

    pub fn just_pressed(&self, key: Key) -> bool {
        self.current.is_pressed(key) && !self.previous.is_pressed(key)
    }

    pub fn held(&self, key: Key) -> bool {
        self.current.is_pressed(key)
    }
}
