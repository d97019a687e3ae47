//! Decoding of streamed chat-completion events into text fragments.
//!
//! The completion API streams newline-delimited `data: {json}` lines and ends
//! with `data: [DONE]`. Network chunks do not respect line boundaries, so
//! [`DeltaDecoder`] buffers bytes until a full line is available. Malformed
//! lines are skipped without interrupting the stream.

use serde::Deserialize;

/// Prefix marking an event payload line.
pub const DATA_PREFIX: &str = "data:";

/// Payload that terminates the event stream.
pub const DONE_SENTINEL: &str = "[DONE]";

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Extract `choices[0].delta.content` from a JSON event payload.
///
/// Returns `None` for unparseable payloads and for empty or missing content.
pub fn extract_delta(payload: &str) -> Option<String> {
    let chunk: StreamChunk = serde_json::from_str(payload).ok()?;
    chunk
        .choices
        .into_iter()
        .next()?
        .delta?
        .content
        .filter(|content| !content.is_empty())
}

/// Parse one complete event line.
pub fn parse_event_line(line: &str) -> Option<String> {
    let data = line.trim().strip_prefix(DATA_PREFIX)?.trim();
    if data.is_empty() || data == DONE_SENTINEL {
        return None;
    }
    extract_delta(data)
}

/// Incremental line decoder for a chat-completion event stream.
#[derive(Debug, Default)]
pub struct DeltaDecoder {
    buffer: Vec<u8>,
}

impl DeltaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a network chunk and return the text fragments of every line it
    /// completed, in arrival order.
    ///
    /// Lines are split on raw bytes. `\n` never occurs inside a multi-byte
    /// UTF-8 sequence, so characters split across chunks are reassembled
    /// before decoding.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut fragments = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(text) = parse_event_line(&String::from_utf8_lossy(&line)) {
                fragments.push(text);
            }
        }
        fragments
    }

    /// Give the unterminated remainder one final parse attempt and clear it.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buffer);
        let rest = String::from_utf8_lossy(&rest);
        let payload = rest.strip_prefix(DATA_PREFIX).unwrap_or(&rest).trim();
        extract_delta(payload)
    }
}
