//! Toolkit-independent input events and the pointer gesture state machine.
//!
//! Front-ends translate their native events into [`InputEvent`]s; the
//! controller in [`super::state`] interprets them. Keeping this layer free of
//! any GUI types lets the interaction rules be tested headlessly.

use crate::model::Point;

/// A discrete input event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { at: Point },
    PointerMove { at: Point },
    PointerUp { at: Point },
    /// The pointer left the surface or the gesture was cancelled by the host.
    PointerLeave,
    /// Wheel scroll at `at`; positive `delta_y` scrolls down (zooms out).
    Wheel { at: Point, delta_y: f64 },
    Key { key: Key, modifiers: Modifiers },
}

/// Keys the editor reacts to. Anything else is [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Z,
    Y,
    Enter,
    Escape,
    Home,
    Num0,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS.
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub const fn ctrl_shift() -> Self {
        Self {
            ctrl: true,
            shift: true,
            ..Self::NONE
        }
    }

    /// The platform command modifier (Ctrl, or Cmd on macOS).
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Editor action bound to a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    Solve,
    ResetView,
    Cancel,
}

impl KeyCommand {
    /// Resolve a key press to a command, if it is bound.
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        let command = modifiers.command();
        match key {
            Key::Z if command && modifiers.shift => Some(KeyCommand::Redo),
            Key::Z if command => Some(KeyCommand::Undo),
            Key::Y if command => Some(KeyCommand::Redo),
            Key::Enter if !command => Some(KeyCommand::Solve),
            Key::Escape => Some(KeyCommand::Cancel),
            Key::Home | Key::Num0 if !command => Some(KeyCommand::ResetView),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pointer gesture
// ────────────────────────────────────────────────────────────────────────────

/// Where a pointer gesture currently stands.
///
/// A press starts as [`PointerState::PointerDown`]; it only becomes a pan once
/// the pointer has travelled past the drag threshold. Releasing before that
/// is a click.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    PointerDown {
        anchor: Point,
        last: Point,
    },
    Dragging {
        last: Point,
    },
}

impl PointerState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, PointerState::Dragging { .. })
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PointerState::Idle)
    }
}

/// Cursor affordance requested by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Crosshair,
    /// Hovering a city: a click removes it.
    Pointer,
    Grabbing,
}
