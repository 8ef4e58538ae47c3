//! Key state fed in by the host's input poller
//!
//! Two parallel arrays: which keys are held, and which presses have already
//! been consumed. Menu-style actions only fire once per press.

use serde::{Deserialize, Serialize};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Move paddle left (A)
    Left,
    /// Move paddle right (D)
    Right,
    /// Release the ball (Space)
    Launch,
    /// Start / continue (Enter)
    Confirm,
    /// Next level in the menu (W)
    NextLevel,
    /// Previous level in the menu (S)
    PrevLevel,
}

impl Key {
    pub const COUNT: usize = 6;

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyState {
    down: [bool; Key::COUNT],
    processed: [bool; Key::COUNT],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Repeated calls while held do not re-arm the press.
    pub fn press(&mut self, key: Key) {
        let i = key.index();
        if !self.down[i] {
            self.processed[i] = false;
        }
        self.down[i] = true;
    }

    pub fn release(&mut self, key: Key) {
        self.down[key.index()] = false;
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.down[key.index()]
    }

    /// Consume a fresh press: true once per press-release cycle.
    pub fn take_press(&mut self, key: Key) -> bool {
        let i = key.index();
        if self.down[i] && !self.processed[i] {
            self.processed[i] = true;
            true
        } else {
            false
        }
    }

    pub fn release_all(&mut self) {
        self.down = [false; Key::COUNT];
    }
}
