//! Per-connection terminal state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use prisma_core::{Capabilities, CapabilityQuery, Dimensions, Error, Result, TerminalSettings};

/// Character encodings a remote terminal may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    /// UTF-8
    Utf8,
    /// IBM PC code page 437
    Ibm437,
    /// 7-bit US-ASCII
    Ascii,
}

impl Charset {
    /// Canonical charset name.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Ibm437 => "IBM437",
            Charset::Ascii => "US-ASCII",
        }
    }

    /// Look up a charset by name, ignoring case and common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Some(Charset::Utf8),
            "IBM437" | "CP437" | "IBM-437" => Some(Charset::Ibm437),
            "US-ASCII" | "ASCII" => Some(Charset::Ascii),
            _ => None,
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Charset::from_name(s).ok_or_else(|| Error::UnsupportedCharset(s.to_string()))
    }
}

/// What is known about one remote terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalState {
    size: Dimensions,
    capabilities: Capabilities,
    charset: Charset,
    supported_charsets: Vec<Charset>,
}

impl TerminalState {
    /// State seeded from configured defaults.
    pub fn new(settings: &TerminalSettings) -> Self {
        Self {
            size: settings.dimensions(),
            capabilities: settings.capabilities,
            charset: Charset::Utf8,
            supported_charsets: vec![Charset::Utf8, Charset::Ibm437, Charset::Ascii],
        }
    }

    /// Terminal size.
    pub fn size(&self) -> Dimensions {
        self.size
    }

    /// Set the terminal size.
    pub fn set_size(&mut self, size: Dimensions) {
        self.size = size;
    }

    /// Capability flags.
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Mutable capability flags.
    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }

    /// Active charset.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Charsets the terminal is believed to support, most preferred first.
    pub fn supported_charsets(&self) -> &[Charset] {
        &self.supported_charsets
    }

    /// Whether `charset` is in the supported list.
    pub fn supports_charset(&self, charset: Charset) -> bool {
        self.supported_charsets.contains(&charset)
    }

    /// Switch the active charset.
    ///
    /// Fails with [`Error::UnsupportedCharset`] when the charset is not in
    /// the supported list.
    pub fn set_charset(&mut self, charset: Charset) -> Result<()> {
        if !self.supports_charset(charset) {
            return Err(Error::UnsupportedCharset(charset.name().to_string()));
        }
        debug!("Charset {} -> {}", self.charset, charset);
        self.charset = charset;
        Ok(())
    }

    /// Mark `charset` as supported.
    pub fn add_charset_support(&mut self, charset: Charset) {
        if !self.supports_charset(charset) {
            self.supported_charsets.push(charset);
        }
    }

    /// Mark `charset` as unsupported.
    ///
    /// The active charset is left alone; callers pick a replacement.
    pub fn remove_charset_support(&mut self, charset: Charset) {
        self.supported_charsets.retain(|c| *c != charset);
    }
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new(&TerminalSettings::default())
    }
}

/// Shared handle to a [`TerminalState`].
///
/// Cloning is cheap; every clone sees the same state.
#[derive(Debug, Clone, Default)]
pub struct TerminalHandle {
    inner: Arc<RwLock<TerminalState>>,
}

impl TerminalHandle {
    /// Wrap a terminal state.
    pub fn new(state: TerminalState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Lock for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, TerminalState> {
        // The state stays consistent even if a writer panicked
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, TerminalState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> TerminalState {
        self.read().clone()
    }

    /// Terminal size.
    pub fn size(&self) -> Dimensions {
        self.read().size()
    }

    /// Active charset.
    pub fn charset(&self) -> Charset {
        self.read().charset()
    }
}

impl CapabilityQuery for TerminalHandle {
    fn supports_ice_color(&self) -> bool {
        self.read().capabilities().ice_color
    }
}
