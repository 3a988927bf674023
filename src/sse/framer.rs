//! Line framing for chunked stream bodies.
//!
//! The orchestrator streams newline-delimited protocol lines, but the HTTP
//! layer hands us arbitrary byte chunks: a chunk may end mid-line or even
//! mid-way through a multi-byte UTF-8 character. The framer buffers bytes
//! and yields complete lines only.

/// Reassembles raw byte chunks into complete `\n`-delimited lines.
///
/// The accumulator is kept as bytes rather than a `String` so that a UTF-8
/// sequence split across two chunks is only decoded once the line it
/// belongs to is complete. A trailing `\r` is stripped from each line to
/// tolerate CRLF framing.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    /// Create a framer with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and drain every complete line it finishes.
    ///
    /// Lines are returned without their delimiter, in arrival order. Any
    /// trailing partial line stays buffered for the next chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        // A '\n' byte never appears inside a multi-byte UTF-8 sequence, so
        // splitting on raw bytes cannot cut a character in half.
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Drain the trailing unterminated fragment, if any.
    ///
    /// Called once when the byte stream ends. The final line of a stream
    /// may arrive without its newline if the connection is cut right after
    /// the payload; the session controller still offers it to the decoder.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.buffer);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Whether a partial line is currently buffered.
    pub fn has_partial(&self) -> bool {
        !self.buffer.is_empty()
    }
}
