//! Terminal capability flags consulted when encoding output.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Read-only capability check supplied by the session layer.
pub trait CapabilityQuery {
    /// Whether the terminal renders bright colors without the bold
    /// attribute ("ice color").
    fn supports_ice_color(&self) -> bool;
}

/// Color and font capabilities of one remote terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// aixterm bright colors (90-97, 100-107)
    pub aixterm_color: bool,
    /// 256-color palette
    pub table_color: bool,
    /// 24-bit color
    pub true_color: bool,
    /// Bright colors without bold
    pub ice_color: bool,
    /// Alternate fonts (SGR 11-19)
    pub font_change: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            aixterm_color: true,
            table_color: true,
            true_color: true,
            ice_color: false,
            font_change: false,
        }
    }
}

impl Capabilities {
    /// Capabilities with ice color enabled.
    pub fn with_ice_color(mut self) -> Self {
        self.ice_color = true;
        self
    }
}

impl CapabilityQuery for Capabilities {
    fn supports_ice_color(&self) -> bool {
        self.ice_color
    }
}

impl<T: CapabilityQuery + ?Sized> CapabilityQuery for &T {
    fn supports_ice_color(&self) -> bool {
        (**self).supports_ice_color()
    }
}

impl<T: CapabilityQuery + ?Sized> CapabilityQuery for Arc<T> {
    fn supports_ice_color(&self) -> bool {
        (**self).supports_ice_color()
    }
}
