//! Configuration types for the Prisma terminal engine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::capabilities::Capabilities;
use crate::geometry::Dimensions;
use crate::{Error, Result};

/// Log levels accepted in `log_level`.
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Shortest sequence cap that still fits a mouse report.
const MIN_SEQUENCE_LEN: usize = 4;

/// Engine configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Input decoder settings
    pub decoder: DecoderSettings,
    /// Terminal defaults
    pub terminal: TerminalSettings,
    /// Terminal probe settings
    pub probe: ProbeSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            decoder: DecoderSettings::default(),
            terminal: TerminalSettings::default(),
            probe: ProbeSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(Error::Config(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }

        if self.decoder.max_sequence_len < MIN_SEQUENCE_LEN {
            return Err(Error::Config(format!(
                "decoder.max_sequence_len must be >= {MIN_SEQUENCE_LEN}"
            )));
        }

        if self.terminal.cols == 0 || self.terminal.rows == 0 {
            return Err(Error::Config("terminal dimensions must be > 0".to_string()));
        }

        if self.probe.timeout_ms == 0 {
            return Err(Error::Config("probe.timeout_ms must be > 0".to_string()));
        }

        Ok(())
    }
}

/// Input decoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderSettings {
    /// Longest CSI body buffered before the sequence is dropped
    pub max_sequence_len: usize,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            max_sequence_len: 64,
        }
    }
}

/// Terminal defaults assumed until a probe says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// Default terminal columns
    pub cols: u16,
    /// Default terminal rows
    pub rows: u16,
    /// Capability flags
    pub capabilities: Capabilities,
}

impl TerminalSettings {
    /// Default size as dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.cols, self.rows)
    }
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            cols: 80,
            rows: 24,
            capabilities: Capabilities::default(),
        }
    }
}

/// Terminal probe settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// How long to wait for a cursor position report
    pub timeout_ms: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self { timeout_ms: 1000 }
    }
}

impl ProbeSettings {
    /// Timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
