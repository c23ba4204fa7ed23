//! Discrete input events and per-frame folding

use crate::sim::{Steer, TickInput};

/// Host-level input, independent of the device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    Jump,
    Pause,
    Restart,
    ToggleMute,
}

/// Map a browser `KeyboardEvent.key` value to an input event
pub fn map_key(key: &str) -> Option<InputEvent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(InputEvent::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(InputEvent::MoveRight),
        "ArrowUp" | " " | "w" | "W" => Some(InputEvent::Jump),
        "Escape" | "p" | "P" => Some(InputEvent::Pause),
        "r" | "R" | "Enter" => Some(InputEvent::Restart),
        "m" | "M" => Some(InputEvent::ToggleMute),
        _ => None,
    }
}

/// Collects events between ticks; the latest steer wins
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    input: TickInput,
    restart: bool,
    toggle_mute: bool,
}

impl InputBuffer {
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::MoveLeft => self.input.steer = Some(Steer::Left),
            InputEvent::MoveRight => self.input.steer = Some(Steer::Right),
            InputEvent::Jump => self.input.jump = true,
            InputEvent::Pause => self.input.pause = true,
            InputEvent::Restart => self.restart = true,
            // Two presses in one frame cancel out
            InputEvent::ToggleMute => self.toggle_mute = !self.toggle_mute,
        }
    }

    /// Drain the frame's input. The bool is a pending restart request.
    pub fn take(&mut self) -> (TickInput, bool) {
        let restart = std::mem::take(&mut self.restart);
        (std::mem::take(&mut self.input), restart)
    }

    /// Drain a pending mute toggle
    pub fn take_mute_toggle(&mut self) -> bool {
        std::mem::take(&mut self.toggle_mute)
    }
}
