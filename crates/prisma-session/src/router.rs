//! Routing decoded input and answering terminal probes.
//!
//! Some facts about a remote terminal can only be learned by asking it: the
//! router writes a request, the terminal answers with a cursor position
//! report, and the answer arrives mixed in with ordinary input. While a probe
//! is in flight, [`InputRouter::feed`] swallows input until the report shows
//! up.

use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use prisma_ansi::{InputDecoder, ParserState, SgrSequence};
use prisma_core::{
    Color, DecoderSettings, Dimensions, EngineConfig, Error, InputEvent, Point, ProbeSettings,
    Result, SgrAttribute,
};

use crate::terminal::{Charset, TerminalHandle};

/// Column a UTF-8 terminal reports after printing the probe glyphs from
/// the home position: three double-width characters.
const UNICODE_PROBE_COLUMN: i32 = 7;

/// Three characters that take three bytes each in UTF-8.
const UNICODE_PROBE_GLYPHS: &str = "㐸惵㲒";

/// What the router does with decoded events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouterMode {
    /// Pass events through
    Normal,
    /// Waiting for the answer to a size probe
    DetectSize,
    /// Waiting for the answer to a UTF-8 probe
    DetectUnicode,
}

enum PendingProbe {
    Size(oneshot::Sender<Dimensions>),
    Unicode(oneshot::Sender<bool>),
}

/// A request written to the terminal and the eventual answer.
#[derive(Debug)]
pub struct Probe<T> {
    request: String,
    receiver: oneshot::Receiver<T>,
}

impl<T> Probe<T> {
    /// Text to send to the terminal.
    pub fn request(&self) -> &str {
        &self.request
    }

    /// Wait for the answer.
    ///
    /// Fails with [`Error::ProbeTimeout`] when `timeout` expires first and
    /// with [`Error::ProbeCancelled`] when the router gave up on the probe.
    pub async fn wait(self, timeout: Duration) -> Result<T> {
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(Error::ProbeCancelled),
            Err(_) => Err(Error::ProbeTimeout(timeout.as_millis() as u64)),
        }
    }
}

/// Routes input for one connection.
pub struct InputRouter {
    decoder: InputDecoder,
    terminal: TerminalHandle,
    pending: Option<PendingProbe>,
    probe_timeout: Duration,
}

impl InputRouter {
    /// Create a router with default decoder settings.
    pub fn new(terminal: TerminalHandle) -> Self {
        Self::with_settings(terminal, DecoderSettings::default())
    }

    /// Create a router with custom decoder settings.
    pub fn with_settings(terminal: TerminalHandle, settings: DecoderSettings) -> Self {
        Self {
            decoder: InputDecoder::with_settings(settings),
            terminal,
            pending: None,
            probe_timeout: ProbeSettings::default().timeout(),
        }
    }

    /// Create a router from engine configuration.
    pub fn from_config(terminal: TerminalHandle, config: &EngineConfig) -> Self {
        let mut router = Self::with_settings(terminal, config.decoder);
        router.probe_timeout = config.probe.timeout();
        router
    }

    /// How long callers should wait for a probe answer.
    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Current mode.
    pub fn mode(&self) -> RouterMode {
        match self.pending {
            None => RouterMode::Normal,
            Some(PendingProbe::Size(_)) => RouterMode::DetectSize,
            Some(PendingProbe::Unicode(_)) => RouterMode::DetectUnicode,
        }
    }

    /// Decoder state, for diagnostics.
    pub fn decoder_state(&self) -> ParserState {
        self.decoder.state()
    }

    /// Terminal this router updates.
    pub fn terminal(&self) -> &TerminalHandle {
        &self.terminal
    }

    /// Feed one input unit.
    ///
    /// Returns an event to dispatch in [`RouterMode::Normal`]. In a detect
    /// mode every event is consumed; a cursor position report completes the
    /// probe.
    pub fn feed(&mut self, unit: &str) -> Option<InputEvent> {
        let event = self.decoder.parse(unit)?;

        if self.pending.is_none() {
            return Some(event);
        }

        match event {
            InputEvent::CursorReport { position } => self.complete(position),
            other => debug!("Dropping {} event while probing", other.type_name()),
        }
        None
    }

    /// Ask the terminal for its size.
    ///
    /// The cursor is pushed to the bottom-right corner and its position
    /// requested; the report becomes the new size.
    pub fn request_size(&mut self) -> Result<Probe<Dimensions>> {
        self.ensure_idle()?;

        let (sender, receiver) = oneshot::channel();
        self.pending = Some(PendingProbe::Size(sender));

        Ok(Probe {
            request: "\x1b[255B\x1b[255C\x1b[6n".to_string(),
            receiver,
        })
    }

    /// Ask whether the terminal renders UTF-8.
    ///
    /// Switches the connection to UTF-8, then prints three wide characters
    /// in black on black from the home position and requests the cursor
    /// position.
    pub fn request_unicode(&mut self) -> Result<Probe<bool>> {
        self.ensure_idle()?;

        {
            let mut state = self.terminal.write();
            state.add_charset_support(Charset::Utf8);
            state.set_charset(Charset::Utf8)?;
        }

        let (sender, receiver) = oneshot::channel();
        self.pending = Some(PendingProbe::Unicode(sender));

        let hidden = SgrSequence::from(vec![
            SgrAttribute::Foreground(Color::Black),
            SgrAttribute::Background(Color::Black),
        ]);

        Ok(Probe {
            request: format!("\x1b[2J\x1b[H{hidden}{UNICODE_PROBE_GLYPHS}\x1b[6n"),
            receiver,
        })
    }

    /// Abandon the probe in flight, if any, and return to normal mode.
    ///
    /// A waiting [`Probe`] resolves with [`Error::ProbeCancelled`].
    pub fn cancel_probe(&mut self) {
        if self.pending.take().is_some() {
            debug!("Probe cancelled");
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        match self.pending {
            Some(_) => Err(Error::ProbeInProgress),
            None => Ok(()),
        }
    }

    fn complete(&mut self, position: Point) {
        match self.pending.take() {
            Some(PendingProbe::Size(sender)) => match Dimensions::from_report(position) {
                Some(size) => {
                    self.terminal.write().set_size(size);
                    info!("Terminal size is {}x{}", size.cols, size.rows);
                    if sender.send(size).is_err() {
                        debug!("Size probe answered after its waiter left");
                    }
                }
                None => {
                    warn!("Ignoring impossible size report {}", position);
                    self.pending = Some(PendingProbe::Size(sender));
                }
            },
            Some(PendingProbe::Unicode(sender)) => {
                let supported = position.x == UNICODE_PROBE_COLUMN;
                self.apply_unicode_result(supported);
                if sender.send(supported).is_err() {
                    debug!("Unicode probe answered after its waiter left");
                }
            }
            None => {}
        }
    }

    fn apply_unicode_result(&self, supported: bool) {
        let mut state = self.terminal.write();
        if supported {
            state.add_charset_support(Charset::Utf8);
            info!("Terminal renders UTF-8");
            return;
        }

        state.remove_charset_support(Charset::Utf8);
        warn!("Terminal does not render UTF-8, falling back to {}", Charset::Ibm437);
        if let Err(e) = state.set_charset(Charset::Ibm437) {
            warn!("Keeping charset {}: {}", state.charset(), e);
        }
    }
}

impl std::fmt::Debug for InputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputRouter")
            .field("decoder", &self.decoder)
            .field("terminal", &self.terminal)
            .field("mode", &self.mode())
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}
