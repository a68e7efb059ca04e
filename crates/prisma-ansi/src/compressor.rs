//! SGR output compressor.
//!
//! Window layers emit styling as a stream of SGR attributes, many of which
//! cancel each other out. [`SequenceCompressor`] keeps one slot per attribute
//! category so only the latest value of each survives, and hands back the
//! remaining statements in a fixed order.

use tracing::trace;

use prisma_core::{CapabilityQuery, Color, SgrAttribute};

use crate::sgr::SgrSequence;

/// Color channel a pending intensity can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Foreground,
    Background,
}

/// Coalesces SGR attributes for one connection.
#[derive(Debug, Clone)]
pub struct SequenceCompressor<C> {
    capabilities: C,

    intensity: Option<SgrAttribute>,
    fg_intensity: Option<SgrAttribute>,
    bg_intensity: Option<SgrAttribute>,
    fg_color: Option<SgrAttribute>,
    bg_color: Option<SgrAttribute>,
    underline: Option<SgrAttribute>,
    underline_color: Option<SgrAttribute>,
    strike: Option<SgrAttribute>,
    invert: Option<SgrAttribute>,
    emphasis: Option<SgrAttribute>,
    blink: Option<SgrAttribute>,
    font: Option<SgrAttribute>,
    conceal: Option<SgrAttribute>,
    prop_spacing: Option<SgrAttribute>,
}

impl<C: CapabilityQuery> SequenceCompressor<C> {
    /// Create an empty compressor reading capabilities from `capabilities`.
    pub fn new(capabilities: C) -> Self {
        Self {
            capabilities,
            intensity: None,
            fg_intensity: None,
            bg_intensity: None,
            fg_color: None,
            bg_color: None,
            underline: None,
            underline_color: None,
            strike: None,
            invert: None,
            emphasis: None,
            blink: None,
            font: None,
            conceal: None,
            prop_spacing: None,
        }
    }

    /// Capability source.
    pub fn capabilities(&self) -> &C {
        &self.capabilities
    }

    /// Clear every slot.
    pub fn reset(&mut self) {
        self.intensity = None;
        self.fg_intensity = None;
        self.bg_intensity = None;
        self.fg_color = None;
        self.bg_color = None;
        self.underline = None;
        self.underline_color = None;
        self.strike = None;
        self.invert = None;
        self.emphasis = None;
        self.blink = None;
        self.font = None;
        self.conceal = None;
        self.prop_spacing = None;
    }

    /// Apply one attribute.
    pub fn apply(&mut self, attribute: SgrAttribute) {
        match attribute {
            SgrAttribute::Reset => self.reset(),
            SgrAttribute::Intensity(_) => self.intensity = Some(attribute),
            SgrAttribute::Foreground(color) => {
                self.apply_color(Channel::Foreground, color, attribute)
            }
            SgrAttribute::Background(color) => {
                self.apply_color(Channel::Background, color, attribute)
            }
            SgrAttribute::Underline(_) => self.underline = Some(attribute),
            SgrAttribute::UnderlineColor(_) => self.underline_color = Some(attribute),
            SgrAttribute::Strike(_) => self.strike = Some(attribute),
            SgrAttribute::Invert(_) => self.invert = Some(attribute),
            SgrAttribute::Emphasis(_) => self.emphasis = Some(attribute),
            SgrAttribute::Blink(_) => self.blink = Some(attribute),
            SgrAttribute::Font(_) => self.font = Some(attribute),
            SgrAttribute::Conceal(_) => self.conceal = Some(attribute),
            SgrAttribute::ProportionalSpacing(_) => self.prop_spacing = Some(attribute),
        }
    }

    /// Apply a batch of attributes.
    ///
    /// Everything up to and including the last reset in the batch is
    /// dropped and the slots are cleared before the rest is applied.
    pub fn apply_all(&mut self, attributes: &[SgrAttribute]) {
        let remaining = match attributes.iter().rposition(SgrAttribute::is_reset) {
            Some(marker) => {
                trace!("Reset at position {} clears earlier attributes", marker);
                self.reset();
                &attributes[marker + 1..]
            }
            None => attributes,
        };

        for attribute in remaining {
            self.apply(*attribute);
        }
    }

    /// Apply every attribute of a parsed SGR sequence.
    pub fn apply_sequence(&mut self, sequence: &SgrSequence) {
        self.apply_all(sequence.attributes());
    }

    /// Current statements in output order.
    pub fn statements(&self) -> Vec<SgrAttribute> {
        [
            self.intensity,
            self.fg_intensity,
            self.bg_intensity,
            self.fg_color,
            self.bg_color,
            self.underline,
            self.underline_color,
            self.strike,
            self.invert,
            self.emphasis,
            self.blink,
            self.font,
            self.conceal,
            self.prop_spacing,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.statements().is_empty()
    }

    /// Current statements as one SGR sequence, or `None` when there is
    /// nothing to send.
    pub fn to_sequence(&self) -> Option<SgrSequence> {
        let statements = self.statements();
        if statements.is_empty() {
            None
        } else {
            Some(SgrSequence::from(statements))
        }
    }

    fn apply_color(&mut self, channel: Channel, color: Color, attribute: SgrAttribute) {
        if color.encodes_brightness() {
            // Ice color terminals need no bold to show bright colors
            if self.capabilities.supports_ice_color() {
                self.intensity = None;
                *self.intensity_slot(channel) = None;
            }
        } else if let Some(pending) = self.intensity.take() {
            *self.intensity_slot(channel) = Some(pending);
        }

        match channel {
            Channel::Foreground => self.fg_color = Some(attribute),
            Channel::Background => self.bg_color = Some(attribute),
        }
    }

    fn intensity_slot(&mut self, channel: Channel) -> &mut Option<SgrAttribute> {
        match channel {
            Channel::Foreground => &mut self.fg_intensity,
            Channel::Background => &mut self.bg_intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prisma_core::{Blink, Capabilities, Emphasis, Intensity, Underline};

    fn plain() -> SequenceCompressor<Capabilities> {
        SequenceCompressor::new(Capabilities::default())
    }

    fn ice() -> SequenceCompressor<Capabilities> {
        SequenceCompressor::new(Capabilities::default().with_ice_color())
    }

    const BOLD: SgrAttribute = SgrAttribute::Intensity(Intensity::Bold);

    #[test]
    fn test_empty() {
        let compressor = plain();
        assert!(compressor.is_empty());
        assert!(compressor.statements().is_empty());
        assert_eq!(compressor.to_sequence(), None);
    }

    #[test]
    fn test_later_value_replaces_slot() {
        let mut compressor = plain();
        compressor.apply(SgrAttribute::Underline(Underline::Single));
        compressor.apply(SgrAttribute::Underline(Underline::Double));
        compressor.apply(SgrAttribute::Strike(true));
        compressor.apply(SgrAttribute::Strike(false));
        assert_eq!(
            compressor.statements(),
            vec![
                SgrAttribute::Underline(Underline::Double),
                SgrAttribute::Strike(false)
            ]
        );
    }

    #[test]
    fn test_standard_color_binds_pending_intensity() {
        let mut compressor = plain();
        compressor.apply(BOLD);
        compressor.apply(SgrAttribute::Foreground(Color::Red));
        compressor.apply(SgrAttribute::Intensity(Intensity::Dim));
        compressor.apply(SgrAttribute::Background(Color::Blue));

        assert_eq!(
            compressor.statements(),
            vec![
                BOLD,
                SgrAttribute::Intensity(Intensity::Dim),
                SgrAttribute::Foreground(Color::Red),
                SgrAttribute::Background(Color::Blue),
            ]
        );
        // Nothing is left pending
        assert_eq!(compressor.intensity, None);
        assert_eq!(compressor.fg_intensity, Some(BOLD));
        assert_eq!(compressor.bg_intensity, Some(SgrAttribute::Intensity(Intensity::Dim)));
    }

    #[test]
    fn test_bright_color_with_ice_drops_intensity() {
        let mut compressor = ice();
        compressor.apply_all(&[BOLD, SgrAttribute::Foreground(Color::BrightRed)]);
        assert_eq!(
            compressor.statements(),
            vec![SgrAttribute::Foreground(Color::BrightRed)]
        );
    }

    #[test]
    fn test_bright_color_with_ice_clears_bound_intensity() {
        let mut compressor = ice();
        compressor.apply_all(&[
            BOLD,
            SgrAttribute::Foreground(Color::Red),
            SgrAttribute::Foreground(Color::BrightRed),
        ]);
        assert_eq!(
            compressor.statements(),
            vec![SgrAttribute::Foreground(Color::BrightRed)]
        );
    }

    #[test]
    fn test_ice_clears_only_its_channel() {
        let mut compressor = ice();
        compressor.apply_all(&[
            BOLD,
            SgrAttribute::Background(Color::Green),
            SgrAttribute::Foreground(Color::Rgb { r: 1, g: 2, b: 3 }),
        ]);
        assert_eq!(
            compressor.statements(),
            vec![
                BOLD,
                SgrAttribute::Foreground(Color::Rgb { r: 1, g: 2, b: 3 }),
                SgrAttribute::Background(Color::Green),
            ]
        );
    }

    #[test]
    fn test_bright_color_without_ice_keeps_intensity() {
        let mut compressor = plain();
        compressor.apply_all(&[BOLD, SgrAttribute::Foreground(Color::BrightRed)]);
        assert_eq!(
            compressor.statements(),
            vec![BOLD, SgrAttribute::Foreground(Color::BrightRed)]
        );
    }

    #[test]
    fn test_extended_and_default_colors_with_ice() {
        for color in [Color::Default, Color::Indexed(42), Color::BrightBlack] {
            let mut compressor = ice();
            compressor.apply(BOLD);
            compressor.apply(SgrAttribute::Background(color));
            assert_eq!(compressor.statements(), vec![SgrAttribute::Background(color)]);
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut compressor = plain();
        compressor.apply(SgrAttribute::Invert(true));
        compressor.reset();
        assert!(compressor.statements().is_empty());
        compressor.reset();
        assert!(compressor.statements().is_empty());
    }

    #[test]
    fn test_apply_all_uses_last_reset() {
        let mut compressor = plain();
        compressor.apply(SgrAttribute::Conceal(true));
        compressor.apply_all(&[
            SgrAttribute::Blink(Blink::Slow),
            SgrAttribute::Reset,
            SgrAttribute::Emphasis(Emphasis::Italic),
            SgrAttribute::Reset,
            SgrAttribute::Font(3),
        ]);
        assert_eq!(compressor.statements(), vec![SgrAttribute::Font(3)]);
    }

    #[test]
    fn test_apply_all_without_reset_keeps_state() {
        let mut compressor = plain();
        compressor.apply(SgrAttribute::Conceal(true));
        compressor.apply_all(&[SgrAttribute::Font(1)]);
        assert_eq!(
            compressor.statements(),
            vec![SgrAttribute::Font(1), SgrAttribute::Conceal(true)]
        );
    }

    #[test]
    fn test_fixed_output_order() {
        let ordered = vec![
            SgrAttribute::Intensity(Intensity::Dim),
            SgrAttribute::Foreground(Color::BrightWhite),
            SgrAttribute::Background(Color::Indexed(17)),
            SgrAttribute::Underline(Underline::Single),
            SgrAttribute::UnderlineColor(Some(Color::Rgb { r: 9, g: 9, b: 9 })),
            SgrAttribute::Strike(true),
            SgrAttribute::Invert(true),
            SgrAttribute::Emphasis(Emphasis::Fraktur),
            SgrAttribute::Blink(Blink::Rapid),
            SgrAttribute::Font(2),
            SgrAttribute::Conceal(true),
            SgrAttribute::ProportionalSpacing(true),
        ];

        let mut reversed = ordered.clone();
        reversed.reverse();

        let mut compressor = plain();
        compressor.apply_all(&reversed);
        assert_eq!(compressor.statements(), ordered);
    }

    #[test]
    fn test_apply_sequence() {
        let mut compressor = plain();
        let sequence = SgrSequence::parse("\x1b[4;0;1;31m").unwrap();
        compressor.apply_sequence(&sequence);
        assert_eq!(
            compressor.statements(),
            vec![BOLD, SgrAttribute::Foreground(Color::Red)]
        );
        assert_eq!(
            compressor.to_sequence().map(|s| s.to_string()),
            Some("\x1b[1;31m".to_string())
        );
    }

    #[test]
    fn test_capability_source_by_reference() {
        let caps = Capabilities::default().with_ice_color();
        let mut compressor = SequenceCompressor::new(&caps);
        compressor.apply_all(&[BOLD, SgrAttribute::Foreground(Color::BrightBlue)]);
        assert_eq!(compressor.statements().len(), 1);
        assert!(compressor.capabilities().ice_color);
    }
}
