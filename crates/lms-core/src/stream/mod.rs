//! Incremental reader for `data:`-prefixed event streams.
//!
//! Content-generation endpoints answer with newline-delimited lines of the
//! form `data: {json}`, finishing with `data: [DONE]`. Chunks may split a
//! line anywhere, including inside a multi-byte character.

use serde_json::Value;

const DATA_PREFIX: &[u8] = b"data:";
const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Payload parsed as JSON.
    Data(Value),
    /// Payload that was not valid JSON, passed through verbatim.
    Text(String),
    /// End-of-stream marker.
    Done,
}

/// Buffers partial lines between chunks.
#[derive(Debug, Default)]
pub struct EventStreamDecoder {
    pending: Vec<u8>,
    done: bool,
}

impl EventStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns the events completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.pending.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(event) = self.decode_line(&line[..pos]) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that never got its newline.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        let line = std::mem::take(&mut self.pending);
        self.decode_line(&line)
    }

    /// True once `data: [DONE]` has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn decode_line(&mut self, line: &[u8]) -> Option<StreamEvent> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let payload = line.strip_prefix(DATA_PREFIX)?;
        let payload = String::from_utf8_lossy(payload);
        let payload = payload.trim();
        if payload.is_empty() {
            return None;
        }
        if payload == DONE_MARKER {
            self.done = true;
            return Some(StreamEvent::Done);
        }
        match serde_json::from_str::<Value>(payload) {
            Ok(value) => Some(StreamEvent::Data(value)),
            Err(err) => {
                tracing::debug!(error = %err, "stream payload is not JSON, passing as text");
                Some(StreamEvent::Text(payload.to_string()))
            }
        }
    }
}

/// Decode a complete buffered stream in one go.
pub fn decode_all(bytes: &[u8]) -> Vec<StreamEvent> {
    let mut decoder = EventStreamDecoder::new();
    let mut events = decoder.push(bytes);
    events.extend(decoder.finish());
    events
}
