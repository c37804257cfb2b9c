//! Configuration value objects for the domain layer
//!
//! These are display-related concepts used across multiple layers.

mod render_mode;
mod theme;

pub use render_mode::RenderMode;
pub use theme::Theme;
