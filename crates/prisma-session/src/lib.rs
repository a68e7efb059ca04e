//! # prisma-session
//!
//! Per-connection terminal state for the Prisma terminal engine.
//!
//! This crate provides:
//! - Terminal state (size, capabilities, charsets) behind a shared handle
//! - Input routing from raw units to dispatchable events
//! - Terminal probes for size and UTF-8 detection
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on prisma-core and
//! prisma-ansi and ties a decoder and compressor to one remote terminal.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod router;
pub mod terminal;

// Re-export commonly used types
pub use router::{InputRouter, Probe, RouterMode};
pub use terminal::{Charset, TerminalHandle, TerminalState};
