//! Slash commands understood by the chat REPL

use campus_chat_domain::Theme;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Quit,
    Clear,
    Status,
    History,
    /// `None` toggles between light and dark.
    Theme(Option<Theme>),
    /// `None` prints to stdout.
    Copy(Option<PathBuf>),
}

impl ReplCommand {
    pub const HELP: &'static str = "\
Commands:
  /help, /h, /?        - Show this help
  /clear               - Clear the conversation
  /status              - Check server status and health
  /history             - Show the conversation so far
  /theme [light|dark]  - Switch (or toggle) the code highlight theme
  /copy [PATH]         - Write the last answer to PATH, or print it raw
  /quit, /exit, /q     - Exit chat

Press Ctrl-C while an answer is streaming to stop it.";

    /// Parse a line starting with `/`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        match (name, arg) {
            ("/quit" | "/exit" | "/q", None) => Ok(ReplCommand::Quit),
            ("/help" | "/h" | "/?", None) => Ok(ReplCommand::Help),
            ("/clear", None) => Ok(ReplCommand::Clear),
            ("/status", None) => Ok(ReplCommand::Status),
            ("/history", None) => Ok(ReplCommand::History),
            ("/theme", None) => Ok(ReplCommand::Theme(None)),
            ("/theme", Some(theme)) => theme
                .parse()
                .map(|t| ReplCommand::Theme(Some(t)))
                .map_err(|_| format!("Unknown theme '{}' (use light or dark)", theme)),
            ("/copy", arg) => Ok(ReplCommand::Copy(arg.map(PathBuf::from))),
            (name, Some(_)) if Self::takes_no_argument(name) => {
                Err(format!("{} takes no argument", name))
            }
            _ => Err(format!(
                "Unknown command: {}\nType /help for available commands",
                name
            )),
        }
    }

    fn takes_no_argument(name: &str) -> bool {
        matches!(
            name,
            "/quit" | "/exit" | "/q" | "/help" | "/h" | "/?" | "/clear" | "/status" | "/history"
        )
    }
}

/// Deliver the last answer for `/copy`.
///
/// With a path the raw text is written to that file; otherwise it goes to
/// `out` unrendered so it can be selected and pasted as-is. Returns a short
/// confirmation message.
pub fn copy_response(text: &str, path: Option<&Path>, out: &mut dyn Write) -> io::Result<String> {
    match path {
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(format!(
                "Copied {} characters to {}",
                text.chars().count(),
                path.display()
            ))
        }
        None => {
            writeln!(out, "{}", text)?;
            out.flush()?;
            Ok(format!("{} characters", text.chars().count()))
        }
    }
}
