//! Protocol line kinds and token payload decoding.

/// Prefix of a token data line.
pub const DATA_PREFIX: &str = "data: ";
/// Prefix of an event name line.
pub const EVENT_PREFIX: &str = "event: ";
/// Event name marking a completed generation.
pub const DONE_EVENT: &str = "done";
/// Event name marking a server-side generation failure.
pub const ERROR_EVENT: &str = "error";

/// A complete, classified line from the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolLine {
    /// A text fragment of the generated answer (already unescaped).
    Token(String),
    /// `event: done`: the server finished generating.
    Done,
    /// `event: error`: the server reported a generation failure.
    Error,
    /// A `data:` line that belongs to a named event (`start`, `done`,
    /// `error`, ...) rather than to the token stream.
    ///
    /// The payload is kept verbatim: for `done` it is a JSON summary, for
    /// `error` a human-readable message.
    EventData { event: String, data: String },
}

impl ProtocolLine {
    /// Returns the token text if this is a token line.
    pub fn token(&self) -> Option<&str> {
        match self {
            ProtocolLine::Token(text) => Some(text),
            _ => None,
        }
    }
}

/// Decode the escaped token payload sent by the server.
///
/// The server writes embedded newlines as the two characters `\n` (and
/// carriage returns as `\r`) so that a token never breaks line framing.
/// Any other backslash is kept as-is.
pub fn unescape_payload(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('n') => {
                    out.push('\n');
                    chars.next();
                }
                Some('r') => {
                    out.push('\r');
                    chars.next();
                }
                _ => out.push(c),
            }
        } else {
            out.push(c);
        }
    }

    out
}
