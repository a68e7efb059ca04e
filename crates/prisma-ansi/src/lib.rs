//! # prisma-ansi
//!
//! ANSI protocol handling for remote terminal connections.
//!
//! This crate provides:
//! - Escape-sequence validation and classification
//! - The input decoder state machine, including mouse reports
//! - SGR sequence parsing and rendering
//! - The SGR output compressor
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on prisma-core and is
//! used by the session layer and the command-line tools. Nothing in this
//! crate performs I/O or blocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compressor;
pub mod decoder;
pub mod mouse;
pub mod sequence;
pub mod sgr;

// Re-export commonly used types
pub use compressor::SequenceCompressor;
pub use decoder::{InputDecoder, ParserState};
pub use sequence::{classify, validate, EscSequence, SequenceKind};
pub use sgr::SgrSequence;
