//! Select Graphic Rendition (SGR) attributes and terminal colors.

use serde::{Deserialize, Serialize};

/// Terminal color supporting ANSI, 256-color palette, and true RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Default terminal color
    Default,

    /// Standard ANSI colors (0-7)
    Black,
    /// ANSI Red
    Red,
    /// ANSI Green
    Green,
    /// ANSI Yellow
    Yellow,
    /// ANSI Blue
    Blue,
    /// ANSI Magenta
    Magenta,
    /// ANSI Cyan
    Cyan,
    /// ANSI White
    White,

    /// Bright ANSI colors (8-15)
    BrightBlack,
    /// Bright Red
    BrightRed,
    /// Bright Green
    BrightGreen,
    /// Bright Yellow
    BrightYellow,
    /// Bright Blue
    BrightBlue,
    /// Bright Magenta
    BrightMagenta,
    /// Bright Cyan
    BrightCyan,
    /// Bright White
    BrightWhite,

    /// 256-color palette index (0-255)
    Indexed(u8),

    /// True color RGB (24-bit)
    Rgb {
        /// Red component
        r: u8,
        /// Green component
        g: u8,
        /// Blue component
        b: u8,
    },
}

const ANSI_COLORS: [Color; 16] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::BrightBlack,
    Color::BrightRed,
    Color::BrightGreen,
    Color::BrightYellow,
    Color::BrightBlue,
    Color::BrightMagenta,
    Color::BrightCyan,
    Color::BrightWhite,
];

impl Color {
    /// Named ANSI color for index 0..=15.
    pub fn from_ansi_index(index: u8) -> Option<Self> {
        ANSI_COLORS.get(index as usize).copied()
    }

    /// Index 0..=15 of a named ANSI color.
    pub fn ansi_index(&self) -> Option<u8> {
        ANSI_COLORS
            .iter()
            .position(|c| c == self)
            .map(|idx| idx as u8)
    }

    /// One of the eight standard (non-bright) named colors.
    pub fn is_standard(&self) -> bool {
        matches!(self.ansi_index(), Some(0..=7))
    }

    /// Bright, palette, RGB or default color.
    ///
    /// These already encode their brightness, so on terminals with ice
    /// color support they make a pending bold attribute redundant.
    pub fn encodes_brightness(&self) -> bool {
        !self.is_standard()
    }

    fn params(&self, base: u16, default: u16, extended: u16) -> Vec<u16> {
        match *self {
            Color::Default => vec![default],
            Color::Indexed(n) => vec![extended, 5, n as u16],
            Color::Rgb { r, g, b } => vec![extended, 2, r as u16, g as u16, b as u16],
            named => match named.ansi_index() {
                Some(idx @ 0..=7) => vec![base + idx as u16],
                Some(idx) => vec![base + 60 + (idx - 8) as u16],
                None => vec![default],
            },
        }
    }
}

/// Text intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// Neither bold nor dim (22)
    Normal,
    /// Bold or bright (1)
    Bold,
    /// Dim or thin (2)
    Dim,
}

/// Underline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Underline {
    /// Not underlined (24)
    Off,
    /// Single underline (4)
    Single,
    /// Double underline (21)
    Double,
}

/// Font emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// Neither italic nor fraktur (23)
    Off,
    /// Italic (3)
    Italic,
    /// Fraktur (20)
    Fraktur,
}

/// Blink rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blink {
    /// Not blinking (25)
    Off,
    /// Slow blink (5)
    Slow,
    /// Rapid blink (6)
    Rapid,
}

/// A single SGR styling directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "attr", content = "value", rename_all = "snake_case")]
pub enum SgrAttribute {
    /// Clear every attribute (0)
    Reset,
    /// Intensity (1, 2, 22)
    Intensity(Intensity),
    /// Foreground color (30-39, 90-97)
    Foreground(Color),
    /// Background color (40-49, 100-107)
    Background(Color),
    /// Underline style (4, 21, 24)
    Underline(Underline),
    /// Underline color (58), `None` restores the default (59)
    UnderlineColor(Option<Color>),
    /// Crossed out (9, 29)
    Strike(bool),
    /// Reverse video (7, 27)
    Invert(bool),
    /// Italic or fraktur (3, 20, 23)
    Emphasis(Emphasis),
    /// Blink (5, 6, 25)
    Blink(Blink),
    /// Font selection, 0 is the primary font (10-19)
    Font(u8),
    /// Concealed text (8, 28)
    Conceal(bool),
    /// Proportional spacing (26, 50)
    ProportionalSpacing(bool),
}

impl SgrAttribute {
    /// Whether this is the reset marker.
    pub fn is_reset(&self) -> bool {
        matches!(self, SgrAttribute::Reset)
    }

    /// ECMA-48 parameters encoding this attribute.
    pub fn params(&self) -> Vec<u16> {
        match *self {
            SgrAttribute::Reset => vec![0],
            SgrAttribute::Intensity(Intensity::Normal) => vec![22],
            SgrAttribute::Intensity(Intensity::Bold) => vec![1],
            SgrAttribute::Intensity(Intensity::Dim) => vec![2],
            SgrAttribute::Foreground(color) => color.params(30, 39, 38),
            SgrAttribute::Background(color) => color.params(40, 49, 48),
            SgrAttribute::Underline(Underline::Off) => vec![24],
            SgrAttribute::Underline(Underline::Single) => vec![4],
            SgrAttribute::Underline(Underline::Double) => vec![21],
            SgrAttribute::UnderlineColor(None) | SgrAttribute::UnderlineColor(Some(Color::Default)) => {
                vec![59]
            }
            SgrAttribute::UnderlineColor(Some(Color::Rgb { r, g, b })) => {
                vec![58, 2, r as u16, g as u16, b as u16]
            }
            SgrAttribute::UnderlineColor(Some(Color::Indexed(n))) => vec![58, 5, n as u16],
            SgrAttribute::UnderlineColor(Some(named)) => {
                vec![58, 5, named.ansi_index().unwrap_or(0) as u16]
            }
            SgrAttribute::Strike(on) => vec![if on { 9 } else { 29 }],
            SgrAttribute::Invert(on) => vec![if on { 7 } else { 27 }],
            SgrAttribute::Emphasis(Emphasis::Off) => vec![23],
            SgrAttribute::Emphasis(Emphasis::Italic) => vec![3],
            SgrAttribute::Emphasis(Emphasis::Fraktur) => vec![20],
            SgrAttribute::Blink(Blink::Off) => vec![25],
            SgrAttribute::Blink(Blink::Slow) => vec![5],
            SgrAttribute::Blink(Blink::Rapid) => vec![6],
            SgrAttribute::Font(n) => vec![10 + n.min(9) as u16],
            SgrAttribute::Conceal(on) => vec![if on { 8 } else { 28 }],
            SgrAttribute::ProportionalSpacing(on) => vec![if on { 26 } else { 50 }],
        }
    }

    /// Decode a single-parameter attribute code.
    ///
    /// Extended colors (38, 48, 58) need further parameters and are not
    /// handled here. Unknown codes return `None`.
    pub fn from_code(code: u16) -> Option<Self> {
        let attr = match code {
            0 => SgrAttribute::Reset,
            1 => SgrAttribute::Intensity(Intensity::Bold),
            2 => SgrAttribute::Intensity(Intensity::Dim),
            3 => SgrAttribute::Emphasis(Emphasis::Italic),
            4 => SgrAttribute::Underline(Underline::Single),
            5 => SgrAttribute::Blink(Blink::Slow),
            6 => SgrAttribute::Blink(Blink::Rapid),
            7 => SgrAttribute::Invert(true),
            8 => SgrAttribute::Conceal(true),
            9 => SgrAttribute::Strike(true),
            10..=19 => SgrAttribute::Font((code - 10) as u8),
            20 => SgrAttribute::Emphasis(Emphasis::Fraktur),
            21 => SgrAttribute::Underline(Underline::Double),
            22 => SgrAttribute::Intensity(Intensity::Normal),
            23 => SgrAttribute::Emphasis(Emphasis::Off),
            24 => SgrAttribute::Underline(Underline::Off),
            25 => SgrAttribute::Blink(Blink::Off),
            26 => SgrAttribute::ProportionalSpacing(true),
            27 => SgrAttribute::Invert(false),
            28 => SgrAttribute::Conceal(false),
            29 => SgrAttribute::Strike(false),
            30..=37 => SgrAttribute::Foreground(Color::from_ansi_index((code - 30) as u8)?),
            39 => SgrAttribute::Foreground(Color::Default),
            40..=47 => SgrAttribute::Background(Color::from_ansi_index((code - 40) as u8)?),
            49 => SgrAttribute::Background(Color::Default),
            50 => SgrAttribute::ProportionalSpacing(false),
            59 => SgrAttribute::UnderlineColor(None),
            90..=97 => SgrAttribute::Foreground(Color::from_ansi_index((code - 90 + 8) as u8)?),
            100..=107 => {
                SgrAttribute::Background(Color::from_ansi_index((code - 100 + 8) as u8)?)
            }
            _ => return None,
        };
        Some(attr)
    }
}
