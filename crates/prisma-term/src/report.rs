//! Pipelines behind `prisma-decode`.

use serde::Serialize;
use tracing::{debug, trace};

use prisma_ansi::{InputDecoder, SequenceCompressor, SgrSequence};
use prisma_core::{CapabilityQuery, DecoderSettings, InputEvent, SgrAttribute};

use crate::splitter::UnitSplitter;

/// Raw bytes in, input events out.
#[derive(Debug, Default)]
pub struct EventStream {
    splitter: UnitSplitter,
    decoder: InputDecoder,
}

impl EventStream {
    /// Create a stream with the given decoder settings.
    pub fn new(settings: DecoderSettings) -> Self {
        Self {
            splitter: UnitSplitter::new(),
            decoder: InputDecoder::with_settings(settings),
        }
    }

    /// The underlying decoder.
    pub fn decoder(&self) -> &InputDecoder {
        &self.decoder
    }

    /// Decode one chunk of bytes.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<InputEvent> {
        let units = self.splitter.push(bytes);
        self.decode(units)
    }

    /// Flush at end of input.
    pub fn finish(&mut self) -> Vec<InputEvent> {
        let units: Vec<String> = self.splitter.finish().into_iter().collect();
        let events = self.decode(units);
        if !self.decoder.pending().is_empty() {
            debug!("Input ended inside sequence {:?}", self.decoder.pending());
        }
        events
    }

    fn decode(&mut self, units: Vec<String>) -> Vec<InputEvent> {
        units
            .iter()
            .filter_map(|unit| self.decoder.parse(unit))
            .inspect(|event| trace!("Decoded {} event", event.type_name()))
            .collect()
    }
}

/// Result of feeding one line to a [`StyleTracker`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SgrReport {
    /// Line as received
    pub input: String,
    /// Compressed style state after the line
    pub statements: Vec<SgrAttribute>,
    /// Style state rendered as one sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Why the line was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Feeds SGR lines into one compressor, as a window layer would.
#[derive(Debug)]
pub struct StyleTracker<C> {
    compressor: SequenceCompressor<C>,
}

impl<C: CapabilityQuery> StyleTracker<C> {
    /// Create a tracker for a terminal with the given capabilities.
    pub fn new(capabilities: C) -> Self {
        Self {
            compressor: SequenceCompressor::new(capabilities),
        }
    }

    /// Apply one line holding a single SGR sequence.
    ///
    /// Lines may spell ESC as `\e`, `\E`, `\033` or `\x1b`. Rejected lines
    /// leave the style state unchanged.
    pub fn apply_line(&mut self, line: &str) -> SgrReport {
        let input = line.trim_end_matches(['\r', '\n']).to_string();
        let text = unescape(&input);

        let error = match SgrSequence::parse(&text) {
            Ok(sequence) => {
                self.compressor.apply_sequence(&sequence);
                None
            }
            Err(e) => {
                debug!("Rejected SGR line {:?}: {}", input, e);
                Some(e.to_string())
            }
        };

        SgrReport {
            input,
            statements: self.compressor.statements(),
            output: self.compressor.to_sequence().map(|s| s.to_string()),
            error,
        }
    }
}

/// Replace textual spellings of ESC with the real character.
pub fn unescape(line: &str) -> String {
    line.replace("\\x1b", "\x1b")
        .replace("\\033", "\x1b")
        .replace("\\e", "\x1b")
        .replace("\\E", "\x1b")
}
