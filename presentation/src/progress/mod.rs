//! Progress indicators

pub mod indicator;

pub use indicator::TypingIndicator;
