//! Key identities and modifier state decoded from terminal input.

use serde::{Deserialize, Serialize};

/// Named key reported by a remote terminal.
///
/// Covers the C0 control characters, DEL, ESC and the keys reachable through
/// CSI keycode sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKey {
    // C0 controls
    /// Null (Ctrl+@)
    Nul,
    /// Start of heading (Ctrl+A)
    Soh,
    /// Start of text (Ctrl+B)
    Stx,
    /// End of text (Ctrl+C)
    Etx,
    /// End of transmission (Ctrl+D)
    Eot,
    /// Enquiry (Ctrl+E)
    Enq,
    /// Acknowledge (Ctrl+F)
    Ack,
    /// Bell (Ctrl+G)
    Bel,
    /// Backspace (Ctrl+H)
    Bs,
    /// Horizontal tab
    Ht,
    /// Line feed
    Lf,
    /// Vertical tab
    Vt,
    /// Form feed
    Ff,
    /// Carriage return
    Cr,
    /// Shift out
    So,
    /// Shift in
    Si,
    /// Data link escape
    Dle,
    /// Device control 1 (XON)
    Dc1,
    /// Device control 2
    Dc2,
    /// Device control 3 (XOFF)
    Dc3,
    /// Device control 4
    Dc4,
    /// Negative acknowledge
    Nak,
    /// Synchronous idle
    Syn,
    /// End of transmission block
    Etb,
    /// Cancel
    Can,
    /// End of medium
    Em,
    /// Substitute (Ctrl+Z)
    Sub,
    /// Escape
    Esc,
    /// File separator
    Fs,
    /// Group separator
    Gs,
    /// Record separator
    Rs,
    /// Unit separator
    Us,
    /// Delete (0x7F)
    Del,

    // Navigation
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Right arrow
    Right,
    /// Left arrow
    Left,
    /// Home key
    Home,
    /// End key
    End,
    /// Insert key
    Insert,
    /// Delete key (CSI 3~)
    Delete,
    /// Page Up
    PageUp,
    /// Page Down
    PageDown,
    /// Keypad 5 with num lock off
    Keypad5,

    // Function keys
    /// F0 (CSI 10~)
    F0,
    /// F1
    F1,
    /// F2
    F2,
    /// F3
    F3,
    /// F4
    F4,
    /// F5
    F5,
    /// F6
    F6,
    /// F7
    F7,
    /// F8
    F8,
    /// F9
    F9,
    /// F10
    F10,
    /// F11
    F11,
    /// F12
    F12,
    /// F13
    F13,
    /// F14
    F14,
    /// F15
    F15,
    /// F16
    F16,
    /// F17
    F17,
    /// F18
    F18,
    /// F19
    F19,
    /// F20
    F20,
}

/// C0 control characters 0..=31, indexed by code.
const CONTROL_KEYS: [SpecialKey; 32] = [
    SpecialKey::Nul,
    SpecialKey::Soh,
    SpecialKey::Stx,
    SpecialKey::Etx,
    SpecialKey::Eot,
    SpecialKey::Enq,
    SpecialKey::Ack,
    SpecialKey::Bel,
    SpecialKey::Bs,
    SpecialKey::Ht,
    SpecialKey::Lf,
    SpecialKey::Vt,
    SpecialKey::Ff,
    SpecialKey::Cr,
    SpecialKey::So,
    SpecialKey::Si,
    SpecialKey::Dle,
    SpecialKey::Dc1,
    SpecialKey::Dc2,
    SpecialKey::Dc3,
    SpecialKey::Dc4,
    SpecialKey::Nak,
    SpecialKey::Syn,
    SpecialKey::Etb,
    SpecialKey::Can,
    SpecialKey::Em,
    SpecialKey::Sub,
    SpecialKey::Esc,
    SpecialKey::Fs,
    SpecialKey::Gs,
    SpecialKey::Rs,
    SpecialKey::Us,
];

/// Keycodes found in CSI key sequences, both the letter-terminated
/// (`ESC [ A`) and the tilde-terminated (`ESC [ 15 ~`) forms.
const KEYCODES: &[(&str, SpecialKey)] = &[
    ("A", SpecialKey::Up),
    ("B", SpecialKey::Down),
    ("C", SpecialKey::Right),
    ("D", SpecialKey::Left),
    ("P", SpecialKey::F1),
    ("Q", SpecialKey::F2),
    ("R", SpecialKey::F3),
    ("S", SpecialKey::F4),
    ("F", SpecialKey::End),
    ("G", SpecialKey::Keypad5),
    ("H", SpecialKey::Home),
    ("1", SpecialKey::Home),
    ("2", SpecialKey::Insert),
    ("3", SpecialKey::Delete),
    ("4", SpecialKey::End),
    ("5", SpecialKey::PageUp),
    ("6", SpecialKey::PageDown),
    ("7", SpecialKey::Home),
    ("10", SpecialKey::F0),
    ("11", SpecialKey::F1),
    ("12", SpecialKey::F2),
    ("13", SpecialKey::F3),
    ("14", SpecialKey::F4),
    ("15", SpecialKey::F5),
    ("17", SpecialKey::F6),
    ("18", SpecialKey::F7),
    ("19", SpecialKey::F8),
    ("20", SpecialKey::F9),
    ("21", SpecialKey::F10),
    ("23", SpecialKey::F11),
    ("24", SpecialKey::F12),
    ("25", SpecialKey::F13),
    ("26", SpecialKey::F14),
    ("28", SpecialKey::F15),
    ("29", SpecialKey::F16),
    ("31", SpecialKey::F17),
    ("32", SpecialKey::F18),
    ("33", SpecialKey::F19),
    ("34", SpecialKey::F20),
];

impl SpecialKey {
    /// Look up the control key for a single character, if it is one.
    ///
    /// Codes 0..=31 map to NUL..US and 127 maps to DEL.
    pub fn from_control(c: char) -> Option<Self> {
        match c as u32 {
            code @ 0..=31 => Some(CONTROL_KEYS[code as usize]),
            127 => Some(SpecialKey::Del),
            _ => None,
        }
    }

    /// Look up the key for a CSI keycode such as `"A"` or `"15"`.
    pub fn from_keycode(keycode: &str) -> Option<Self> {
        KEYCODES
            .iter()
            .find(|(code, _)| *code == keycode)
            .map(|(_, key)| *key)
    }

    /// Whether this key is one of the C0 controls or DEL.
    pub fn is_control(&self) -> bool {
        *self == SpecialKey::Del || CONTROL_KEYS.contains(self)
    }
}

/// Modifier keys held while a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    /// Meta key
    pub meta: bool,
    /// Control key
    pub ctrl: bool,
    /// Alt key
    pub alt: bool,
    /// Shift key
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        meta: false,
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// Only Alt held.
    pub const ALT: Self = Self {
        meta: false,
        ctrl: false,
        alt: true,
        shift: false,
    };

    /// Decode an xterm-style modifier parameter.
    ///
    /// The parameter is one more than a 4-bit field whose bits, from most to
    /// least significant, are meta, ctrl, alt and shift. Zero is treated as
    /// the default value 1 and bits past the fourth are ignored.
    pub fn from_param(param: u32) -> Self {
        let bits = param.saturating_sub(1) & 0xF;
        Self {
            meta: bits & 0b1000 != 0,
            ctrl: bits & 0b0100 != 0,
            alt: bits & 0b0010 != 0,
            shift: bits & 0b0001 != 0,
        }
    }

    /// Whether no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = [
            (self.meta, "Meta"),
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
        ];
        let held: Vec<&str> = names
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", held.join("+"))
    }
}
