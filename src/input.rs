//! Input model: pointer buttons, keys, and the draw/select state machine.
//!
//! `UiState` carries the user's persistent intent (is the draw tool armed,
//! which rectangle is selected). `InputState` is the gesture tracked between
//! pointer-down and pointer-up. Selection is orthogonal to the gesture: a
//! rectangle can stay selected while nothing is being drawn.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;
use crate::page::ShapeId;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// The next pointer-down starts a rectangle instead of selecting.
    pub draw_armed: bool,
    /// The selected rectangle on the current page, if any.
    pub selected: Option<ShapeId>,
}

impl UiState {
    /// Cursor the host should show for this state.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        if self.draw_armed { "crosshair" } else { "default" }
    }
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A new rectangle is being sized by dragging away from `anchor`.
    Drawing {
        /// The rectangle being sized.
        id: ShapeId,
        /// Page the rectangle lives on.
        page: usize,
        /// Page-space point where the drag started.
        anchor: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
