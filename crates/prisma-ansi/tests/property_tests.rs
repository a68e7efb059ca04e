//! Property-based tests for the decoder, compressor and classifier.
//!
//! Uses proptest to generate hostile or shuffled input and verify the
//! invariants that remote peers rely on.

use proptest::prelude::*;

use prisma_ansi::{classify, InputDecoder, ParserState, SequenceCompressor};
use prisma_core::{
    Blink, Capabilities, Color, DecoderSettings, Emphasis, InputEvent, Intensity, Modifiers,
    SgrAttribute, SpecialKey, Underline,
};

/// Single input units, biased toward characters that drive the state machine.
fn input_unit() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("\x1b".to_string()),
        Just("[".to_string()),
        Just("M".to_string()),
        Just(";".to_string()),
        Just("~".to_string()),
        "[0-9]".prop_map(|s| s),
        "[A-Za-z]".prop_map(|s| s),
        any::<char>().prop_map(|c| c.to_string()),
        "\\PC{2,6}".prop_map(|s| s),
    ]
}

fn unit_stream() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(input_unit(), 0..200)
}

/// Well-formed escape sequences of several families.
fn valid_sequence() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-D]".prop_map(|k| format!("\x1b[{}", k)),
        (1u8..35).prop_map(|n| format!("\x1b[{}~", n)),
        (0u8..108, 0u8..108).prop_map(|(a, b)| format!("\x1b[{};{}m", a, b)),
        "[a-z ]{0,12}".prop_map(|t| format!("\x1b]0;{}\x07", t)),
        Just("\x1bc".to_string()),
        Just("\x1b\\".to_string()),
        "[P-S]".prop_map(|k| format!("\x1bO{}", k)),
    ]
}

/// One attribute from every compressor category, in output order.
fn one_per_category() -> Vec<SgrAttribute> {
    vec![
        SgrAttribute::Intensity(Intensity::Bold),
        SgrAttribute::Foreground(Color::Indexed(200)),
        SgrAttribute::Background(Color::BrightYellow),
        SgrAttribute::Underline(Underline::Double),
        SgrAttribute::UnderlineColor(None),
        SgrAttribute::Strike(true),
        SgrAttribute::Invert(false),
        SgrAttribute::Emphasis(Emphasis::Italic),
        SgrAttribute::Blink(Blink::Slow),
        SgrAttribute::Font(4),
        SgrAttribute::Conceal(false),
        SgrAttribute::ProportionalSpacing(false),
    ]
}

proptest! {
    /// Any unit stream is accepted without panicking, and the decoder
    /// always leaves the partial buffer bounded.
    #[test]
    fn decoder_never_panics(units in unit_stream()) {
        let mut decoder = InputDecoder::with_settings(DecoderSettings { max_sequence_len: 16 });
        for unit in &units {
            let _ = decoder.parse(unit);
            prop_assert!(decoder.pending().chars().count() <= 16 + 6);
            if decoder.state() == ParserState::Ground {
                prop_assert!(decoder.pending().is_empty());
            }
        }
    }

    /// Whatever came before, `ESC ESC` yields a single ESC key once the
    /// decoder is back in ground state.
    #[test]
    fn decoder_recovers_after_garbage(units in unit_stream()) {
        let mut decoder = InputDecoder::new();
        for unit in &units {
            let _ = decoder.parse(unit);
        }
        decoder.reset();

        prop_assert_eq!(decoder.parse("\x1b"), None);
        prop_assert_eq!(decoder.parse("\x1b"), Some(InputEvent::special(SpecialKey::Esc)));
        prop_assert_eq!(decoder.state(), ParserState::Ground);
    }

    /// An ESC always abandons a partial sequence and starts a fresh one.
    #[test]
    fn escape_restarts_any_sequence(units in unit_stream()) {
        let mut decoder = InputDecoder::new();
        for unit in &units {
            let _ = decoder.parse(unit);
        }

        let _ = decoder.parse("\x1b");
        if decoder.state() == ParserState::Escape {
            prop_assert_eq!(decoder.parse("["), None);
            prop_assert_eq!(decoder.parse("A"), Some(InputEvent::special(SpecialKey::Up)));
        } else {
            // The ESC completed an ESC ESC pair
            prop_assert_eq!(decoder.state(), ParserState::Ground);
        }
    }

    /// Printable characters in ground state come back verbatim.
    #[test]
    fn printable_text_round_trips(text in "[a-zA-Z0-9 ,.!?]{1,40}") {
        let mut decoder = InputDecoder::new();
        let events = decoder.parse_str(&text);
        let collected: String = events
            .iter()
            .map(|event| match event {
                InputEvent::Text { text, modifiers } => {
                    assert_eq!(*modifiers, Modifiers::NONE);
                    text.clone()
                }
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        prop_assert_eq!(collected, text);
    }

    /// Legacy mouse reports decode to the encoded cell.
    #[test]
    fn legacy_mouse_coordinates(x in 0i32..200, y in 0i32..200) {
        let encode = |v: i32| char::from_u32((v + 41) as u32).unwrap();
        let input = format!("\x1b[M0{}{}", encode(x), encode(y));

        let mut decoder = InputDecoder::new();
        let events = decoder.parse_str(&input);
        prop_assert_eq!(events.len(), 1);
        match &events[0] {
            InputEvent::Mouse { x: ex, y: ey, .. } => {
                prop_assert_eq!(*ex, x);
                prop_assert_eq!(*ey, y);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }

    /// Statements come back in category order whatever order they were
    /// applied in.
    #[test]
    fn compressor_output_order_is_fixed(
        shuffled in Just(one_per_category()).prop_shuffle(),
        ice in any::<bool>(),
    ) {
        let caps = if ice {
            Capabilities::default().with_ice_color()
        } else {
            Capabilities::default()
        };
        let mut compressor = SequenceCompressor::new(caps);
        compressor.apply_all(&shuffled);

        let expected: Vec<SgrAttribute> = one_per_category()
            .into_iter()
            .filter(|attr| {
                // Intensity is dropped when it precedes a bright color on
                // an ice color terminal
                !(ice && matches!(attr, SgrAttribute::Intensity(_)) && {
                    let bold = shuffled.iter().position(|a| matches!(a, SgrAttribute::Intensity(_)));
                    let colors = shuffled.iter().rposition(|a| {
                        matches!(a, SgrAttribute::Foreground(_) | SgrAttribute::Background(_))
                    });
                    matches!((bold, colors), (Some(b), Some(c)) if b < c)
                })
            })
            .collect();

        prop_assert_eq!(compressor.statements(), expected);
    }

    /// Reset is idempotent whatever was applied before it.
    #[test]
    fn compressor_reset_is_idempotent(shuffled in Just(one_per_category()).prop_shuffle()) {
        let mut compressor = SequenceCompressor::new(Capabilities::default());
        compressor.apply_all(&shuffled);
        compressor.reset();
        prop_assert!(compressor.statements().is_empty());
        compressor.reset();
        prop_assert!(compressor.statements().is_empty());
    }

    /// Two valid sequences glued together never classify.
    #[test]
    fn classifier_rejects_concatenation(a in valid_sequence(), b in valid_sequence()) {
        prop_assert!(classify(&a).is_ok());
        prop_assert!(classify(&b).is_ok());
        let joined = format!("{}{}", a, b);
        prop_assert!(classify(&joined).is_err());
    }

    /// A valid sequence followed by one more printable character never
    /// classifies.
    #[test]
    fn classifier_rejects_trailing_character(seq in valid_sequence(), extra in "[a-zA-Z0-9 ]") {
        let candidate = format!("{}{}", seq, extra);
        prop_assert!(classify(&candidate).is_err());
    }
}
