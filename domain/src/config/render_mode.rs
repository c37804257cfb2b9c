//! Render mode value object

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How assistant text is rendered
///
/// `Markdown` re-parses the full text on every update (headings, lists and
/// highlighted code blocks); `Plain` prints the text as received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Markdown,
    Plain,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(RenderMode::Markdown),
            "plain" | "text" => Ok(RenderMode::Plain),
            other => Err(format!("Unknown render mode: {}", other)),
        }
    }
}
