//! Append-only capture of compiler stdout.

/// Every stdout chunk emitted by one compiler run, in arrival order.
///
/// Stored as bytes: a chunk boundary can fall inside a multi-byte UTF-8
/// sequence, so text is only decoded once the whole run has been captured.
#[derive(Debug, Clone, Default)]
pub struct RawOutputBuffer {
    bytes: Vec<u8>,
}

impl RawOutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Bytes captured so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the captured output. Invalid UTF-8 becomes U+FFFD.
    #[must_use]
    pub fn into_text(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        }
    }
}
