//! Path helpers for user-supplied file locations

use std::path::PathBuf;

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Per-user data directory for campus-chat (history, preferences).
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("campus-chat"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_untouched() {
        assert_eq!(expand_home("/tmp/x.log"), PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn test_tilde_is_expanded() {
        let expanded = expand_home("~/logs/chat.jsonl");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("logs/chat.jsonl"));
        }
    }
}
