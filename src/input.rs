//! Keyboard input to per-tick input snapshots
//!
//! The host forwards key down/up events by key code; the simulation only
//! ever sees the three held booleans of a [`TickInput`].

use crate::sim::TickInput;

/// Logical actions a key can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

impl Action {
    /// Map a DOM-style key code (`"ArrowLeft"`, `"KeyA"`, `"Space"`, ...)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Action::MoveLeft),
            "ArrowRight" | "KeyD" => Some(Action::MoveRight),
            "Space" | "ArrowUp" | "KeyW" => Some(Action::Jump),
            _ => None,
        }
    }
}

/// Held-key state written by key events and sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: TickInput,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns true if the key is bound, so the host
    /// can suppress its default action (page scroll on Space, etc).
    pub fn key_down(&mut self, code: &str) -> bool {
        self.set(code, true)
    }

    /// Handle a key release
    pub fn key_up(&mut self, code: &str) -> bool {
        self.set(code, false)
    }

    /// Release everything (focus loss, session restart)
    pub fn clear(&mut self) {
        self.held = TickInput::default();
    }

    /// The input the next tick will consume
    pub fn snapshot(&self) -> TickInput {
        self.held
    }

    fn set(&mut self, code: &str, down: bool) -> bool {
        let Some(action) = Action::from_code(code) else {
            return false;
        };
        match action {
            Action::MoveLeft => self.held.move_left = down,
            Action::MoveRight => self.held.move_right = down,
            Action::Jump => self.held.jump = down,
        }
        true
    }
}
