//! Line reassembly for the chat response stream.
//!
//! Chunks arrive with arbitrary boundaries: a single chunk may hold several
//! lines, half a line, or half a character. [`FrameReassembler`] decodes the
//! bytes, buffers the unterminated tail and emits each line only once its
//! terminating `\n` has arrived.
//!
//! # Event payloads
//!
//! Every `data:` line is a token, with one exception: the server follows
//! `event: start`, `event: done` and `event: error` with a single data line
//! of its own (a banner, the JSON summary, the error message). Only the data
//! line *directly* after one of those three is reported as
//! [`ProtocolLine::EventData`]. Any other line in between, or any other event
//! name, leaves later data lines as tokens.
//!
//! ```text
//! event: start
//! data: Generation started
//! data: Hello
//! event: done
//! data: {"token_count": 1, "generation_time": 0.12}
//! ```
//!
//! yields `EventData{start}`, `Token("Hello")`, `Done`, `EventData{done}`.
//! The state is line-level, so the output does not depend on chunking.

use super::decoder::Utf8StreamDecoder;
use super::line::{DATA_PREFIX, DONE_EVENT, ERROR_EVENT, EVENT_PREFIX, ProtocolLine, unescape_payload};

/// Server lifecycle event whose data line is a banner, not answer text.
const START_EVENT: &str = "start";

/// Reassembles complete protocol lines from raw byte chunks.
///
/// One instance serves exactly one response stream.
#[derive(Debug, Default)]
pub struct FrameReassembler {
    decoder: Utf8StreamDecoder,
    /// Decoded text after the last line terminator. Never contains `\n`.
    buffer: String,
    /// Known event whose payload line may come next.
    event: Option<&'static str>,
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completed, in stream order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ProtocolLine> {
        let text = self.decoder.decode(chunk);
        self.buffer.push_str(&text);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let complete: String = self.buffer.drain(..=last_newline).collect();
        complete[..complete.len() - 1]
            .split('\n')
            .filter_map(|raw| self.classify(raw))
            .collect()
    }

    /// The unterminated text currently held back.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// End the stream and return any unterminated trailing line.
    ///
    /// The fragment is never classified: a stream that stops mid-line has
    /// lost the rest of that line. Callers should log it.
    pub fn finish(mut self) -> Option<String> {
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);
        let rest = self.buffer.trim();
        (!rest.is_empty()).then(|| rest.to_string())
    }

    fn classify(&mut self, raw: &str) -> Option<ProtocolLine> {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        // Only the line right after a known event can be its payload
        let event = self.event.take();

        if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            return Some(match event {
                Some(event) => ProtocolLine::EventData {
                    event: event.to_string(),
                    data: payload.to_string(),
                },
                None => ProtocolLine::Token(unescape_payload(payload)),
            });
        }

        let name = line.strip_prefix(EVENT_PREFIX)?.trim();
        if name.starts_with(DONE_EVENT) {
            self.event = Some(DONE_EVENT);
            Some(ProtocolLine::Done)
        } else if name.starts_with(ERROR_EVENT) {
            self.event = Some(ERROR_EVENT);
            Some(ProtocolLine::Error)
        } else {
            if name == START_EVENT {
                self.event = Some(START_EVENT);
            }
            None
        }
    }
}
