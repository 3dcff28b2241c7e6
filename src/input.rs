//! Key events to per-tick input
//!
//! Hosts deliver key-down / key-up events by name; `InputState` folds them
//! into one `TickInput` per simulation tick. Exact bindings stay here so the
//! simulation only ever sees actions.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Something a key can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Jump,
    Duck,
    Attack,
    Forward,
    Back,
    Pause,
    /// Rebuild the current level
    Restart,
    /// Continue after a completed level
    Confirm,
}

impl Action {
    /// Map a host key name (case-insensitive) to an action
    pub fn from_key_name(name: &str) -> Option<Self> {
        let action = match name.to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "w" => Action::Jump,
            "down" | "arrowdown" | "s" => Action::Duck,
            "space" | " " | "x" | "b" => Action::Attack,
            "right" | "arrowright" | "d" => Action::Forward,
            "left" | "arrowleft" | "a" => Action::Back,
            "esc" | "escape" => Action::Pause,
            "r" => Action::Restart,
            "enter" | "return" => Action::Confirm,
            _ => return None,
        };
        Some(action)
    }
}

/// Held keys plus the edges seen since the last tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
    released: HashSet<Action>,
    /// Steer the player automatically
    pub autopilot: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat of a held key is not a new press.
    pub fn key_down(&mut self, name: &str) {
        let Some(action) = Action::from_key_name(name) else {
            log::trace!("Unbound key {:?}", name);
            return;
        };
        if self.held.insert(action) {
            self.pressed.insert(action);
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(action) = Action::from_key_name(name) {
            if self.held.remove(&action) {
                self.released.insert(action);
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Consume a pending press of a session-level action
    pub fn take_press(&mut self, action: Action) -> bool {
        self.pressed.remove(&action)
    }

    /// Build this tick's input and clear the edges
    pub fn take_tick_input(&mut self) -> TickInput {
        let pressed = |a: Action| self.pressed.contains(&a);
        let down = |a: Action| self.pressed.contains(&a) || self.held.contains(&a);
        let input = TickInput {
            jump: pressed(Action::Jump),
            duck: down(Action::Duck),
            stop_ducking: self.released.contains(&Action::Duck),
            attack: pressed(Action::Attack),
            move_forward: down(Action::Forward),
            move_back: down(Action::Back),
            pause: pressed(Action::Pause),
            autopilot: self.autopilot,
        };
        self.pressed.clear();
        self.released.clear();
        input
    }

    /// Forget everything. The session calls this when a level restarts or changes.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.released.clear();
    }
}
