//! Pointer and keyboard event types consumed by the interaction engine.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Shift, Ctrl or Cmd toggles selection membership on click.
    pub fn toggles_selection(&self) -> bool {
        self.shift || self.ctrl || self.meta
    }

    /// Alt suspends guide snapping for the gesture.
    pub fn bypasses_snap(&self) -> bool {
        self.alt
    }

    /// Ctrl or Cmd turns the wheel into zoom.
    pub fn zooms_wheel(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: PointerButton,
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        modifiers: Modifiers,
    },
    Up {
        position: Point,
        modifiers: Modifiers,
    },
    Wheel {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}

/// Keyboard commands the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum KeyCommand {
    Delete,
    Duplicate,
    Undo,
    Redo,
    ToggleGrid,
    ToggleCenterLines,
    SelectAll,
    /// Move the selection by whole steps; `large` uses the large step.
    Nudge { dx: f64, dy: f64, large: bool },
    BringForward,
    SendBackward,
    BringToFront,
    SendToBack,
}

impl KeyCommand {
    /// Map a key name (DOM `KeyboardEvent.key` style) plus modifiers to a command.
    pub fn from_key(key: &str, modifiers: Modifiers) -> Option<Self> {
        let command = modifiers.ctrl || modifiers.meta;
        let large = modifiers.shift;
        let cmd = match key {
            "Delete" | "Backspace" => KeyCommand::Delete,
            "ArrowLeft" => KeyCommand::Nudge { dx: -1.0, dy: 0.0, large },
            "ArrowRight" => KeyCommand::Nudge { dx: 1.0, dy: 0.0, large },
            "ArrowUp" => KeyCommand::Nudge { dx: 0.0, dy: -1.0, large },
            "ArrowDown" => KeyCommand::Nudge { dx: 0.0, dy: 1.0, large },
            "d" | "D" if command => KeyCommand::Duplicate,
            "z" | "Z" if command && modifiers.shift => KeyCommand::Redo,
            "z" | "Z" if command => KeyCommand::Undo,
            "y" | "Y" if command => KeyCommand::Redo,
            "a" | "A" if command => KeyCommand::SelectAll,
            "]" if command && modifiers.shift => KeyCommand::BringToFront,
            "]" if command => KeyCommand::BringForward,
            "[" if command && modifiers.shift => KeyCommand::SendToBack,
            "[" if command => KeyCommand::SendBackward,
            "g" | "G" if !command => KeyCommand::ToggleGrid,
            "c" | "C" if !command => KeyCommand::ToggleCenterLines,
            _ => return None,
        };
        Some(cmd)
    }
}
