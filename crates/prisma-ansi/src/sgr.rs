//! SGR (Select Graphic Rendition) sequence parsing and rendering.

use tracing::{debug, trace};
use vte::{Params, Perform};

use prisma_core::{Color, Error, Result, SgrAttribute};

use crate::sequence::{EscSequence, SequenceKind};

/// Ordered list of SGR attributes making up one `ESC [ … m` sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SgrSequence {
    attributes: Vec<SgrAttribute>,
}

impl SgrSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse SGR text such as `"\x1b[1;31m"`.
    ///
    /// The text must be exactly one CSI sequence ending in `m`. A sequence
    /// without parameters is a reset. Unknown codes and truncated extended
    /// colors are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let sequence = EscSequence::new(text)?;
        if sequence.kind() != SequenceKind::Csi || sequence.final_char() != Some('m') {
            return Err(Error::InvalidSgr(text.to_string()));
        }

        // vte only understands the 7-bit introducer
        let normalized = match text.strip_prefix('\u{9b}') {
            Some(rest) => format!("\x1b[{rest}"),
            None => text.to_string(),
        };

        let mut collector = SgrCollector::default();
        let mut parser = vte::Parser::new();
        for byte in normalized.bytes() {
            parser.advance(&mut collector, byte);
        }

        let groups = collector
            .groups
            .ok_or_else(|| Error::InvalidSgr(text.to_string()))?;

        Ok(Self {
            attributes: decode_groups(&groups),
        })
    }

    /// Append an attribute.
    pub fn push(&mut self, attribute: SgrAttribute) {
        self.attributes.push(attribute);
    }

    /// Attributes in order.
    pub fn attributes(&self) -> &[SgrAttribute] {
        &self.attributes
    }

    /// Consume the sequence and return its attributes.
    pub fn into_attributes(self) -> Vec<SgrAttribute> {
        self.attributes
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Render and wrap as a validated escape sequence.
    pub fn to_esc_sequence(&self) -> Result<EscSequence> {
        EscSequence::new(self.to_string())
    }
}

impl From<Vec<SgrAttribute>> for SgrSequence {
    fn from(attributes: Vec<SgrAttribute>) -> Self {
        Self { attributes }
    }
}

impl FromIterator<SgrAttribute> for SgrSequence {
    fn from_iter<I: IntoIterator<Item = SgrAttribute>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SgrSequence {
    type Item = &'a SgrAttribute;
    type IntoIter = std::slice::Iter<'a, SgrAttribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

impl std::fmt::Display for SgrSequence {
    /// An empty sequence renders as an explicit reset, which is what a
    /// terminal does with a parameterless SGR anyway.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.attributes.is_empty() {
            return f.write_str("\x1b[0m");
        }

        let params: Vec<String> = self
            .attributes
            .iter()
            .flat_map(|attr| attr.params())
            .map(|p| p.to_string())
            .collect();
        write!(f, "\x1b[{}m", params.join(";"))
    }
}

/// Collects the parameter groups of a single SGR dispatch.
#[derive(Default)]
struct SgrCollector {
    groups: Option<Vec<Vec<u16>>>,
}

impl Perform for SgrCollector {
    fn print(&mut self, _c: char) {}

    fn execute(&mut self, _byte: u8) {}

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _c: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, c: char) {
        // Private markers and intermediates make this something other than SGR
        if c != 'm' || ignore || !intermediates.is_empty() {
            return;
        }
        self.groups = Some(params.iter().map(|p| p.to_vec()).collect());
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
}

/// Turn parameter groups into attributes.
///
/// A group holds one parameter plus any colon-separated subparameters, so
/// `38:5:208` arrives as one group and `38;5;208` as three.
fn decode_groups(groups: &[Vec<u16>]) -> Vec<SgrAttribute> {
    if groups.is_empty() {
        return vec![SgrAttribute::Reset];
    }

    let mut attributes = Vec::with_capacity(groups.len());
    let mut iter = groups.iter();

    while let Some(group) = iter.next() {
        let Some(&code) = group.first() else {
            continue;
        };

        match code {
            38 | 48 | 58 => {
                let color = if group.len() > 1 {
                    color_from_subparams(&group[1..])
                } else {
                    color_from_params(&mut iter)
                };

                match (code, color) {
                    (38, Some(color)) => attributes.push(SgrAttribute::Foreground(color)),
                    (48, Some(color)) => attributes.push(SgrAttribute::Background(color)),
                    (_, Some(color)) => attributes.push(SgrAttribute::UnderlineColor(Some(color))),
                    (_, None) => debug!("Dropping truncated extended color for SGR {}", code),
                }
            }
            _ => match SgrAttribute::from_code(code) {
                Some(attr) => attributes.push(attr),
                None => trace!("Ignoring unknown SGR code {}", code),
            },
        }
    }

    attributes
}

/// Extended color from colon subparameters (`5:n`, `2:r:g:b`, `2:cs:r:g:b`).
fn color_from_subparams(sub: &[u16]) -> Option<Color> {
    match sub {
        [5, n, ..] => Some(Color::Indexed(u8::try_from(*n).ok()?)),
        [2, _, r, g, b] | [2, r, g, b] => rgb(*r, *g, *b),
        _ => None,
    }
}

/// Extended color from the semicolon form, consuming the groups it needs.
fn color_from_params<'a>(iter: &mut impl Iterator<Item = &'a Vec<u16>>) -> Option<Color> {
    let mut next = || iter.next().and_then(|g| g.first().copied());

    match next()? {
        5 => Some(Color::Indexed(u8::try_from(next()?).ok()?)),
        2 => {
            let (r, g, b) = (next()?, next()?, next()?);
            rgb(r, g, b)
        }
        _ => None,
    }
}

fn rgb(r: u16, g: u16, b: u16) -> Option<Color> {
    Some(Color::Rgb {
        r: u8::try_from(r).ok()?,
        g: u8::try_from(g).ok()?,
        b: u8::try_from(b).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prisma_core::{Intensity, Underline};

    #[test]
    fn test_parse_basic() {
        let seq = SgrSequence::parse("\x1b[1;31m").unwrap();
        assert_eq!(
            seq.attributes(),
            &[
                SgrAttribute::Intensity(Intensity::Bold),
                SgrAttribute::Foreground(Color::Red)
            ]
        );
    }

    #[test]
    fn test_parse_empty_is_reset() {
        let seq = SgrSequence::parse("\x1b[m").unwrap();
        assert_eq!(seq.attributes(), &[SgrAttribute::Reset]);
    }

    #[test]
    fn test_parse_extended_colors() {
        let seq = SgrSequence::parse("\x1b[38;5;208;48;2;1;2;3m").unwrap();
        assert_eq!(
            seq.attributes(),
            &[
                SgrAttribute::Foreground(Color::Indexed(208)),
                SgrAttribute::Background(Color::Rgb { r: 1, g: 2, b: 3 })
            ]
        );

        let colon = SgrSequence::parse("\x1b[58:2::10:20:30;4:0m").unwrap();
        assert_eq!(
            colon.attributes()[0],
            SgrAttribute::UnderlineColor(Some(Color::Rgb {
                r: 10,
                g: 20,
                b: 30
            }))
        );
    }

    #[test]
    fn test_parse_skips_unknown_and_truncated() {
        let seq = SgrSequence::parse("\x1b[4;60;38;5m").unwrap();
        assert_eq!(
            seq.attributes(),
            &[SgrAttribute::Underline(Underline::Single)]
        );

        let out_of_range = SgrSequence::parse("\x1b[38;5;300m").unwrap();
        assert!(out_of_range.is_empty());
    }

    #[test]
    fn test_parse_c1_introducer() {
        let seq = SgrSequence::parse("\u{9b}7m").unwrap();
        assert_eq!(seq.attributes(), &[SgrAttribute::Invert(true)]);
    }

    #[test]
    fn test_parse_rejects_non_sgr() {
        assert!(matches!(
            SgrSequence::parse("\x1b[2J"),
            Err(Error::InvalidSgr(_))
        ));
        assert!(matches!(
            SgrSequence::parse("\x1b[?1m"),
            Err(Error::InvalidSgr(_))
        ));
        assert!(matches!(
            SgrSequence::parse("\x1b[1m\x1b[2m"),
            Err(Error::MalformedSequence { .. })
        ));
    }

    #[test]
    fn test_render() {
        let seq: SgrSequence = [
            SgrAttribute::Intensity(Intensity::Bold),
            SgrAttribute::Foreground(Color::Indexed(208)),
        ]
        .into_iter()
        .collect();
        assert_eq!(seq.to_string(), "\x1b[1;38;5;208m");
        assert_eq!(SgrSequence::new().to_string(), "\x1b[0m");

        let esc = seq.to_esc_sequence().unwrap();
        assert_eq!(esc.kind(), SequenceKind::Csi);
    }

    #[test]
    fn test_render_then_parse_keeps_attributes() {
        let original = SgrSequence::from(vec![
            SgrAttribute::Background(Color::BrightCyan),
            SgrAttribute::Underline(Underline::Double),
            SgrAttribute::UnderlineColor(None),
        ]);
        let parsed = SgrSequence::parse(&original.to_string()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!((&parsed).into_iter().count(), 3);
    }
}
