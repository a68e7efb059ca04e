//! Input decoder state machine.
//!
//! Turns a stream of already-decoded input units into [`InputEvent`]s. Units
//! may arrive split arbitrarily; the decoder keeps just enough state to join
//! escape sequences back together. Nothing here fails: input that cannot be
//! understood produces no event.

use tracing::{debug, trace};

use prisma_core::{DecoderSettings, InputEvent, Modifiers, Point, SpecialKey};

use crate::mouse;

const ESC: &str = "\x1b";

/// Decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParserState {
    /// Waiting for input
    #[default]
    Ground,
    /// A lone ESC was received
    Escape,
    /// Inside `ESC [`, collecting the sequence body
    AnsiIdentifier,
    /// Inside a mouse report, collecting the payload
    AnsiMouse,
}

/// Stateful decoder for one connection.
#[derive(Debug, Clone, Default)]
pub struct InputDecoder {
    state: ParserState,
    buffer: String,
    /// Characters in `buffer`
    buffered: usize,
    settings: DecoderSettings,
}

impl InputDecoder {
    /// Create a decoder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with the given settings.
    pub fn with_settings(settings: DecoderSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Current state.
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Partial sequence collected so far.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Drop any partial sequence and return to [`ParserState::Ground`].
    pub fn reset(&mut self) {
        self.state = ParserState::Ground;
        self.buffer.clear();
        self.buffered = 0;
    }

    /// Feed one input unit.
    ///
    /// A unit is normally a single character but may be a longer run, which
    /// is passed through as text when it arrives in ground state. An empty
    /// unit is ignored.
    pub fn parse(&mut self, unit: &str) -> Option<InputEvent> {
        if unit.is_empty() {
            return None;
        }

        match self.state {
            ParserState::Ground => self.ground(unit),
            ParserState::Escape => self.escape(unit),
            ParserState::AnsiIdentifier => self.identifier(unit),
            ParserState::AnsiMouse => self.mouse(unit),
        }
    }

    /// Feed every character of `input` as its own unit.
    pub fn parse_str(&mut self, input: &str) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let mut buf = [0u8; 4];
        for c in input.chars() {
            if let Some(event) = self.parse(c.encode_utf8(&mut buf)) {
                events.push(event);
            }
        }
        events
    }

    fn ground(&mut self, unit: &str) -> Option<InputEvent> {
        if unit == ESC {
            self.state = ParserState::Escape;
            return None;
        }
        Some(classify_unit(unit))
    }

    fn escape(&mut self, unit: &str) -> Option<InputEvent> {
        match unit {
            ESC => {
                self.reset();
                Some(InputEvent::special(SpecialKey::Esc))
            }
            "[" => {
                self.reset();
                self.state = ParserState::AnsiIdentifier;
                None
            }
            _ => {
                self.reset();
                Some(InputEvent::Text {
                    text: unit.to_string(),
                    modifiers: Modifiers::ALT,
                })
            }
        }
    }

    fn identifier(&mut self, unit: &str) -> Option<InputEvent> {
        if unit == "[" {
            return None;
        }
        if unit == ESC {
            self.restart_escape();
            return None;
        }

        self.push(unit);
        if self.buffered > self.settings.max_sequence_len {
            debug!(
                "Dropping escape sequence longer than {} characters",
                self.settings.max_sequence_len
            );
            self.reset();
            return None;
        }

        let terminates = unit
            .chars()
            .next()
            .map_or(false, |c| c.is_alphabetic() || c == '~');
        if !terminates {
            return None;
        }

        // The report is whatever sits in the buffer once it holds four characters
        if unit == "M" {
            self.state = ParserState::AnsiMouse;
            return None;
        }

        let body = std::mem::take(&mut self.buffer);
        self.reset();
        let event = parse_sequence(&body);
        if event.is_none() {
            trace!("No event for sequence body {:?}", body);
        }
        event
    }

    fn mouse(&mut self, unit: &str) -> Option<InputEvent> {
        if unit == ESC {
            self.restart_escape();
            return None;
        }

        self.push(unit);
        if self.buffered < mouse::REPORT_LEN {
            return None;
        }

        let report = std::mem::take(&mut self.buffer);
        self.reset();
        mouse::decode(&report)
    }

    /// An ESC inside a sequence abandons it and starts a new one.
    fn restart_escape(&mut self) {
        debug!("Discarding partial sequence {:?} on ESC", self.buffer);
        self.reset();
        self.state = ParserState::Escape;
    }

    fn push(&mut self, unit: &str) {
        self.buffer.push_str(unit);
        self.buffered += unit.chars().count();
    }
}

/// Classify a unit received in ground state.
fn classify_unit(unit: &str) -> InputEvent {
    let mut chars = unit.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(key) = SpecialKey::from_control(c) {
            return InputEvent::special(key);
        }
    }
    InputEvent::text(unit)
}

/// Parse the body of a CSI sequence, everything after `ESC [`.
fn parse_sequence(body: &str) -> Option<InputEvent> {
    match body.chars().last()? {
        '~' => parse_tilde(body),
        'R' => parse_cursor_report(body),
        c if c.is_alphabetic() => parse_letter(body),
        _ => None,
    }
}

/// `keycode[;modifier]~`
fn parse_tilde(body: &str) -> Option<InputEvent> {
    let mut fields = body.split(|c: char| c == ';' || c == '~');
    let keycode = fields.next()?;
    let modifier = match fields.next() {
        Some(m) if !m.is_empty() => m.parse::<u32>().ok()?,
        _ => 1,
    };
    special_key(keycode, modifier)
}

/// `[ignored;]...[modifier]keycode`
///
/// A run of digits is one token, so `1;16A` reads modifier 16 where
/// single-digit splitting would read keycode `6` with modifier 1.
fn parse_letter(body: &str) -> Option<InputEvent> {
    let tail = match body.rfind(';') {
        Some(idx) => &body[idx + 1..],
        None => body,
    };

    let tokens = tokenize(tail);
    match tokens.as_slice() {
        [] => None,
        [keycode] => special_key(keycode, 1),
        [modifier, keycode, ..] => special_key(keycode, modifier.parse::<u32>().ok()?),
    }
}

/// `row;colR`
fn parse_cursor_report(body: &str) -> Option<InputEvent> {
    let fields = body.strip_suffix('R')?;
    let (row, col) = fields.split_once(';')?;
    let row = row.parse::<i32>().ok()?;
    let col = col.parse::<i32>().ok()?;
    Some(InputEvent::CursorReport {
        position: Point::new(col, row),
    })
}

/// Split into runs of ASCII digits and single ASCII letters, skipping
/// anything else.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut digits_start: Option<usize> = None;

    for (idx, c) in text.char_indices() {
        if c.is_ascii_digit() {
            digits_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = digits_start.take() {
            tokens.push(&text[start..idx]);
        }
        if c.is_ascii_alphabetic() {
            tokens.push(&text[idx..idx + c.len_utf8()]);
        }
    }
    if let Some(start) = digits_start {
        tokens.push(&text[start..]);
    }

    tokens
}

fn special_key(keycode: &str, modifier: u32) -> Option<InputEvent> {
    match SpecialKey::from_keycode(keycode) {
        Some(key) => Some(InputEvent::Special {
            key,
            modifiers: Modifiers::from_param(modifier),
        }),
        None => {
            trace!("Unrecognized keycode {:?}", keycode);
            None
        }
    }
}
