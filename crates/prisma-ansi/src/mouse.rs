//! Mouse report decoding.
//!
//! A report is the first four buffered characters of the sequence body,
//! normally the `M` introducer followed by three payload characters whose
//! code points carry the button byte and the coordinates.

use tracing::trace;

use prisma_core::{InputEvent, MouseKind};

/// Offset applied to payload characters in xterm (X10/normal) reports.
const XTERM_OFFSET: i32 = 32;

/// Offset applied to coordinates in the legacy dialect.
const LEGACY_OFFSET: i32 = 40;

/// Second unit that marks the legacy dialect.
const LEGACY_MARKER: char = '0';

/// Length of a complete report, introducer included.
pub const REPORT_LEN: usize = 4;

/// Decode a complete mouse report.
///
/// Returns `None` when the report is short or names a button with no
/// mapping. Coordinates are converted to 0-based and passed through as-is,
/// even when hostile input makes them negative.
pub fn decode(report: &str) -> Option<InputEvent> {
    let mut chars = report.chars();
    let (_introducer, b1, b2, b3) = (chars.next()?, chars.next()?, chars.next()?, chars.next()?);

    if b1 == LEGACY_MARKER {
        return Some(InputEvent::Mouse {
            x: value(b2) - LEGACY_OFFSET - 1,
            y: value(b3) - LEGACY_OFFSET - 1,
            kind: MouseKind::Left,
            shift: false,
            meta: false,
            ctrl: false,
        });
    }

    let x = value(b2) - XTERM_OFFSET - 1;
    let y = value(b3) - XTERM_OFFSET - 1;
    let flags = ButtonFlags::from_byte(value(b1) - XTERM_OFFSET);

    let kind = if flags.motion {
        MouseKind::Motion
    } else {
        match MouseKind::from_button_id(flags.button) {
            Some(kind) => kind,
            None => {
                trace!("Dropping mouse report with unmapped button {}", flags.button);
                return None;
            }
        }
    };

    Some(InputEvent::Mouse {
        x,
        y,
        kind,
        shift: flags.shift,
        meta: flags.meta,
        ctrl: flags.ctrl,
    })
}

fn value(c: char) -> i32 {
    c as i32
}

/// Fields of the xterm button byte.
///
/// ```text
///  bit 7   6   5   4    3    2     1 0
///      |   |   |   |    |    |     +-+-- base button (3 = release)
///      |   |   |   |    |    +---------- shift
///      |   |   |   |    +--------------- meta
///      |   |   |   +-------------------- ctrl
///      |   +---+------------------------ alternate button banks (+1, +2)
///      +-------------------------------- motion
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ButtonFlags {
    button: i32,
    shift: bool,
    meta: bool,
    ctrl: bool,
    motion: bool,
}

impl ButtonFlags {
    fn from_byte(byte: i32) -> Self {
        let bit = |n: u32| (byte >> n) & 1 == 1;

        let mut button = byte & 0x3;
        if bit(5) {
            button += 1;
        }
        if bit(6) {
            button += 2;
        }

        Self {
            button,
            shift: bit(2),
            meta: bit(3),
            ctrl: bit(4),
            motion: bit(7),
        }
    }
}
