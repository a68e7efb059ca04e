//! # prisma-core
//!
//! Core types for the Prisma terminal engine.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other prisma crates. It provides:
//!
//! - Input event types (text, special keys, mouse, cursor reports)
//! - Key and mouse-button identity tables
//! - SGR attribute and color types
//! - Terminal capability flags
//! - Geometry values (Point, Dimensions)
//! - Configuration and error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other prisma crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod key;
pub mod sgr;

// Re-export commonly used types
pub use capabilities::{Capabilities, CapabilityQuery};
pub use config::{DecoderSettings, EngineConfig, ProbeSettings, TerminalSettings};
pub use error::{Error, Result};
pub use event::{InputEvent, MouseKind};
pub use geometry::{Dimensions, Point};
pub use key::{Modifiers, SpecialKey};
pub use sgr::{Blink, Color, Emphasis, Intensity, SgrAttribute, Underline};
