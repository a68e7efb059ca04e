//! # prisma-term
//!
//! Command-line tooling for the Prisma terminal engine.
//!
//! This crate provides:
//! - Argument parsing for `prisma-decode`
//! - Incremental splitting of raw bytes into decoder input units
//! - Event and SGR pipelines that produce JSON reports
//!
//! ## Architecture
//!
//! This is Layer 3 in the architecture - the binary that ties together:
//! - prisma-core: Core types and configuration
//! - prisma-ansi: Decoder and compressor
//!
//! The binary itself is in main.rs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod report;
pub mod splitter;

// Re-export commonly used types
pub use args::{CliError, Mode, Options, USAGE};
pub use report::{unescape, EventStream, SgrReport, StyleTracker};
pub use splitter::UnitSplitter;
