//! Streaming response framing.
//!
//! The inference server answers a chat request with a chunked body of
//! newline-delimited Server-Sent-Events lines. This module turns those raw
//! byte chunks into classified [`ProtocolLine`]s:
//!
//! - [`decoder::Utf8StreamDecoder`]: UTF-8 decoding that carries split
//!   multi-byte sequences across chunk boundaries
//! - [`reassembler::FrameReassembler`]: line buffering and classification
//! - [`line::ProtocolLine`]: the three line kinds the client acts upon
//!
//! Everything here is transport-agnostic and synchronous, so it can be fed
//! from any byte source (HTTP body, test fixture, file).

pub mod decoder;
pub mod line;
pub mod reassembler;
