//! Splitting raw bytes into decoder input units.

/// Replacement for bytes that are not valid UTF-8.
pub const REPLACEMENT: &str = "\u{FFFD}";

/// Incremental UTF-8 splitter.
///
/// Bytes arrive in arbitrary chunks, so a multi-byte character may straddle
/// two reads. The incomplete tail is held back until the next chunk.
#[derive(Debug, Default)]
pub struct UnitSplitter {
    pending: Vec<u8>,
}

impl UnitSplitter {
    /// Create an empty splitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back waiting for the rest of a character.
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Split a chunk into one-character units.
    ///
    /// Invalid sequences become [`REPLACEMENT`] units.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);

        let mut units = Vec::with_capacity(data.len());
        let mut rest: &[u8] = &data;

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    units.extend(valid.chars().map(String::from));
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        units.extend(valid.chars().map(String::from));
                    }

                    match e.error_len() {
                        Some(len) => {
                            units.push(REPLACEMENT.to_string());
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        units
    }

    /// Flush at end of input; an incomplete tail becomes one replacement
    /// unit.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        self.pending.clear();
        Some(REPLACEMENT.to_string())
    }
}
