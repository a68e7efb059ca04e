//! Structured input events produced by the input decoder.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::key::{Modifiers, SpecialKey};

/// Button or motion kind carried by a mouse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseKind {
    /// Button 1 pressed
    Left,
    /// Button 2 pressed
    Middle,
    /// Button 3 pressed
    Right,
    /// Button released
    Release,
    /// Pointer moved
    Motion,
    /// Wheel up
    ScrollUp,
    /// Wheel down
    ScrollDown,
    /// Wheel tilted left
    ScrollLeft,
    /// Wheel tilted right
    ScrollRight,
    /// First extra button
    Extra0,
    /// Second extra button
    Extra1,
    /// Third extra button
    Extra2,
    /// Fourth extra button
    Extra3,
}

/// Button ids 0..=12 in report order.
const MOUSE_BUTTONS: [MouseKind; 13] = [
    MouseKind::Left,
    MouseKind::Middle,
    MouseKind::Right,
    MouseKind::Release,
    MouseKind::Motion,
    MouseKind::ScrollUp,
    MouseKind::ScrollDown,
    MouseKind::ScrollLeft,
    MouseKind::ScrollRight,
    MouseKind::Extra0,
    MouseKind::Extra1,
    MouseKind::Extra2,
    MouseKind::Extra3,
];

impl MouseKind {
    /// Map a decoded button id to its kind. Ids outside 0..=12 have none.
    pub fn from_button_id(id: i32) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| MOUSE_BUTTONS.get(idx))
            .copied()
    }
}

/// Event decoded from remote terminal input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Literal printable text
    Text {
        /// The unit(s) as received
        text: String,
        /// Modifiers derivable from the encoding (Alt after a lone ESC)
        modifiers: Modifiers,
    },

    /// Named key
    Special {
        /// Key identity
        key: SpecialKey,
        /// Held modifiers
        modifiers: Modifiers,
    },

    /// Mouse report
    Mouse {
        /// 0-based column
        x: i32,
        /// 0-based row
        y: i32,
        /// Button or motion
        kind: MouseKind,
        /// Shift held
        shift: bool,
        /// Meta held
        meta: bool,
        /// Ctrl held
        ctrl: bool,
    },

    /// Answer to a cursor position query, 1-based as reported
    CursorReport {
        /// `x` is the column, `y` the row
        position: Point,
    },
}

impl InputEvent {
    /// Unmodified text event.
    pub fn text(text: impl Into<String>) -> Self {
        InputEvent::Text {
            text: text.into(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Unmodified special key event.
    pub fn special(key: SpecialKey) -> Self {
        InputEvent::Special {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Short name of the event kind, used in logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            InputEvent::Text { .. } => "text",
            InputEvent::Special { .. } => "special",
            InputEvent::Mouse { .. } => "mouse",
            InputEvent::CursorReport { .. } => "cursor_report",
        }
    }
}
