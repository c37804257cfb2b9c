//! Rendering of assistant answers for the terminal

pub mod markdown;

pub use markdown::MarkdownRenderer;
