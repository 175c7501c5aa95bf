//! Incremental `text/event-stream` decoder.
//!
//! Chunks arrive split at arbitrary byte offsets; complete lines are
//! consumed and the remainder is kept for the next chunk. A blank line
//! dispatches the pending event.

use crate::events::envelope::EventEnvelope;

/// Event type used when a message carries no `event:` field.
const DEFAULT_EVENT: &str = "message";

/// Longest partial line kept between chunks.
pub const MAX_LINE_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    max_line: usize,
    /// Skipping the rest of an oversized line.
    discarding: bool,
    event: Option<String>,
    data: Vec<String>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_max_line(MAX_LINE_LEN)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line,
            discarding: false,
            event: None,
            data: Vec::new(),
        }
    }

    /// Consume `chunk`, returning every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<EventEnvelope> {
        let scan_from = self.buffer.len();
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        let mut search = scan_from;
        while let Some(offset) = self.buffer[search..].iter().position(|b| *b == b'\n') {
            let end = search + offset;
            let raw = &self.buffer[start..end];
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = String::from_utf8_lossy(raw).into_owned();
            start = end + 1;
            search = start;

            if self.discarding {
                self.discarding = false;
                continue;
            }
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        self.buffer.drain(..start);

        if self.buffer.len() > self.max_line {
            tracing::warn!(
                buffered = self.buffer.len(),
                max_line = self.max_line,
                "Dropping oversized event stream line"
            );
            self.buffer.clear();
            self.discarding = true;
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<EventEnvelope> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<EventEnvelope> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(EventEnvelope::new(
            event.unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
        ))
    }
}
