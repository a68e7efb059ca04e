//! Escape-sequence validation and classification.
//!
//! [`EscSequence`] only exists for strings that hold exactly one well-formed
//! escape sequence: no text around it and no second sequence glued to it.
//! Remote input must never be interpreted as a compound sequence.

use lazy_static::lazy_static;
use regex::Regex;

use prisma_core::{Error, Result};

// 7-bit and 8-bit (C1) introducers for every family.
const SS2: &str = r"(?:\x1bN|\x{8e})[\x20-\x7e]";
const SS3: &str = r"(?:\x1bO|\x{8f})[\x20-\x7e]";
const DCS: &str = r"(?:\x1bP|\x{90})[^\x1b\x{9c}]*(?:\x1b\\|\x{9c})";
const CSI: &str = r"(?:\x1b\[|\x{9b})[\x30-\x3f]*[\x20-\x2f]*[\x40-\x7e]";
const ST: &str = r"(?:\x1b\\|\x{9c})";
const OSC: &str = r"(?:\x1b\]|\x{9d})[^\x07\x1b\x{9c}]*(?:\x07|\x1b\\|\x{9c})";
const SOS: &str = r"(?:\x1bX|\x{98})[^\x1b\x{98}\x{9c}]*(?:\x1b\\|\x{9c})";
const PM: &str = r"(?:\x1b\^|\x{9e})[^\x1b\x{9c}]*(?:\x1b\\|\x{9c})";
const APC: &str = r"(?:\x1b_|\x{9f})[^\x1b\x{9c}]*(?:\x1b\\|\x{9c})";
const RIS: &str = r"\x1bc";
// Any other `ESC intermediates final` escape. Without intermediates the
// final byte may not be a family introducer (`N O P X [ ] ^ _`), so a
// truncated string or control sequence never passes as a whole escape.
const ESC_OTHER: &str =
    r"\x1b(?:[\x20-\x2f]+[\x30-\x7e]|[\x30-\x4d\x51-\x57\x59-\x5a\x5c\x60-\x7e])";

lazy_static! {
    /// Every recognized sequence. String families come first so their
    /// introducers are not taken for a bare two-character escape.
    static ref ANY_SEQUENCE: Regex = Regex::new(
        &[DCS, SOS, PM, APC, OSC, CSI, SS2, SS3, ST, RIS, ESC_OTHER].join("|")
    )
    .expect("escape sequence grammar");

    /// Anchored per-family patterns in classification order.
    static ref FAMILIES: Vec<(SequenceKind, Regex)> = [
        (SequenceKind::Ss2, SS2),
        (SequenceKind::Ss3, SS3),
        (SequenceKind::Dcs, DCS),
        (SequenceKind::Csi, CSI),
        (SequenceKind::St, ST),
        (SequenceKind::Osc, OSC),
        (SequenceKind::Sos, SOS),
        (SequenceKind::Pm, PM),
        (SequenceKind::Apc, APC),
        (SequenceKind::Ris, RIS),
    ]
    .into_iter()
    .map(|(kind, body)| {
        let anchored = Regex::new(&format!("^(?:{body})$")).expect("escape family pattern");
        (kind, anchored)
    })
    .collect();
}

/// Escape sequence family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// Single shift two
    Ss2,
    /// Single shift three
    Ss3,
    /// Device control string
    Dcs,
    /// Control sequence introducer
    Csi,
    /// String terminator
    St,
    /// Operating system command
    Osc,
    /// Start of string
    Sos,
    /// Privacy message
    Pm,
    /// Application program command
    Apc,
    /// Reset to initial state
    Ris,
    /// Well-formed escape of no specific family
    Unknown,
}

impl std::fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SequenceKind::Ss2 => "SS2",
            SequenceKind::Ss3 => "SS3",
            SequenceKind::Dcs => "DCS",
            SequenceKind::Csi => "CSI",
            SequenceKind::St => "ST",
            SequenceKind::Osc => "OSC",
            SequenceKind::Sos => "SOS",
            SequenceKind::Pm => "PM",
            SequenceKind::Apc => "APC",
            SequenceKind::Ris => "RIS",
            SequenceKind::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Check that `candidate` is exactly one recognized escape sequence.
pub fn validate(candidate: &str) -> Result<()> {
    let mut leftover = String::new();
    let mut last = 0;
    let mut matches = 0usize;

    for m in ANY_SEQUENCE.find_iter(candidate) {
        leftover.push_str(&candidate[last..m.start()]);
        last = m.end();
        matches += 1;
    }
    leftover.push_str(&candidate[last..]);

    if !leftover.is_empty() {
        return Err(Error::malformed(
            candidate,
            format!("extra characters {leftover:?} outside the sequence"),
        ));
    }

    if matches != 1 {
        return Err(Error::malformed(
            candidate,
            format!("must be a single sequence, found {matches}"),
        ));
    }

    Ok(())
}

/// Validate `candidate` and return its family.
pub fn classify(candidate: &str) -> Result<SequenceKind> {
    validate(candidate)?;
    Ok(kind_of(candidate))
}

fn kind_of(sequence: &str) -> SequenceKind {
    FAMILIES
        .iter()
        .find(|(_, pattern)| pattern.is_match(sequence))
        .map(|(kind, _)| *kind)
        .unwrap_or(SequenceKind::Unknown)
}

/// A single validated escape sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EscSequence {
    text: String,
    kind: SequenceKind,
}

impl EscSequence {
    /// Validate and wrap a sequence.
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let kind = classify(&text)?;
        Ok(Self { text, kind })
    }

    /// Sequence family.
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// The sequence text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false; an empty string is never a sequence.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Final character of a CSI sequence.
    pub fn final_char(&self) -> Option<char> {
        match self.kind {
            SequenceKind::Csi => self.text.chars().last(),
            _ => None,
        }
    }

    /// Consume the wrapper and return the text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl std::fmt::Display for EscSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for EscSequence {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl TryFrom<&str> for EscSequence {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<String> for EscSequence {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_families() {
        let cases = [
            ("\x1bNa", SequenceKind::Ss2),
            ("\x1bOP", SequenceKind::Ss3),
            ("\x1bPq#0;2;0;0;0\x1b\\", SequenceKind::Dcs),
            ("\x1b[A", SequenceKind::Csi),
            ("\x1b[1;5C", SequenceKind::Csi),
            ("\x1b[38;2;255;0;0m", SequenceKind::Csi),
            ("\x1b[?25l", SequenceKind::Csi),
            ("\x1b\\", SequenceKind::St),
            ("\x1b]0;title\x07", SequenceKind::Osc),
            ("\x1b]2;title\x1b\\", SequenceKind::Osc),
            ("\x1bXpayload\x1b\\", SequenceKind::Sos),
            ("\x1b^private\x1b\\", SequenceKind::Pm),
            ("\x1b_app\x1b\\", SequenceKind::Apc),
            ("\x1bc", SequenceKind::Ris),
            ("\x1b7", SequenceKind::Unknown),
            ("\x1b(B", SequenceKind::Unknown),
        ];

        for (seq, expected) in cases {
            assert_eq!(classify(seq).unwrap(), expected, "sequence {seq:?}");
        }
    }

    #[test]
    fn test_classify_c1_forms() {
        assert_eq!(classify("\u{9b}31m").unwrap(), SequenceKind::Csi);
        assert_eq!(classify("\u{9d}0;t\u{9c}").unwrap(), SequenceKind::Osc);
        assert_eq!(classify("\u{9c}").unwrap(), SequenceKind::St);
        assert_eq!(classify("\u{8f}P").unwrap(), SequenceKind::Ss3);
    }

    #[test]
    fn test_rejects_concatenation() {
        let err = classify("\x1b[A\x1b[B").unwrap_err();
        assert!(matches!(err, Error::MalformedSequence { .. }));
        assert!(err.to_string().contains("found 2"));

        assert!(classify("\x1bc\x1bc").is_err());
        assert!(classify("\x1b]0;t\x07\x1b[m").is_err());
    }

    #[test]
    fn test_rejects_extra_characters() {
        let err = classify("\x1b[Ax").unwrap_err();
        assert!(err.to_string().contains("extra characters"));

        assert!(classify("x\x1b[A").is_err());
        assert!(classify("hello").is_err());
        assert!(classify("\x1b[1;5").is_err());
        assert!(classify("\x1b]0;unterminated").is_err());
    }

    #[test]
    fn test_rejects_bare_introducers() {
        for introducer in [
            "\x1b[", "\x1b]", "\x1bP", "\x1bX", "\x1b^", "\x1b_", "\x1bN", "\x1bO",
        ] {
            assert!(
                classify(introducer).is_err(),
                "introducer {introducer:?} classified"
            );
            assert!(EscSequence::new(introducer).is_err());
        }

        // Other two-character escapes still classify
        assert_eq!(classify("\x1b7").unwrap(), SequenceKind::Unknown);
        assert_eq!(classify("\x1b=").unwrap(), SequenceKind::Unknown);
        assert_eq!(classify("\x1b\\").unwrap(), SequenceKind::St);
        assert_eq!(classify("\x1bc").unwrap(), SequenceKind::Ris);
    }

    #[test]
    fn test_rejects_empty() {
        let err = classify("").unwrap_err();
        assert!(err.to_string().contains("found 0"));
    }

    #[test]
    fn test_esc_sequence_wrapper() {
        let seq = EscSequence::new("\x1b[2J").unwrap();
        assert_eq!(seq.kind(), SequenceKind::Csi);
        assert_eq!(seq.as_str(), "\x1b[2J");
        assert_eq!(seq.len(), 4);
        assert!(!seq.is_empty());
        assert_eq!(seq.final_char(), Some('J'));
        assert_eq!(seq.to_string(), "\x1b[2J");

        let ris = EscSequence::try_from("\x1bc").unwrap();
        assert_eq!(ris.final_char(), None);
        assert_eq!(ris.into_string(), "\x1bc");

        assert!(EscSequence::try_from(String::from("\x1b[A ")).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SequenceKind::Csi.to_string(), "CSI");
        assert_eq!(SequenceKind::Unknown.to_string(), "UNKNOWN");
    }
}
