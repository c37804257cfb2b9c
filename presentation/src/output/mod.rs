//! Terminal output

pub mod console;
pub mod status;

pub use console::ConsoleRenderer;
pub use status::{format_health, format_status};
