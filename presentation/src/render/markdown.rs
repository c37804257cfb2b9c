//! Terminal markdown renderer
//!
//! Renders the subset of markdown the assistant produces: headings, lists,
//! block quotes, rules, fenced code blocks and inline `code` / `**bold**`
//! spans. Code blocks get keyword/string/comment highlighting from the
//! active [`Theme`] palette.
//!
//! Rendering is line-by-line with no lookahead: source line *n* always maps
//! to output line *n*, and rendering a prefix of a document yields a prefix
//! of the full rendering. The console relies on this to print a streaming
//! answer incrementally while re-rendering from scratch on every token.

use campus_chat_domain::Theme;
use colored::{Color, Colorize};

/// Colors for one theme.
#[derive(Debug, Clone, Copy)]
struct Palette {
    heading: Color,
    keyword: Color,
    string: Color,
    number: Color,
    comment: Color,
    inline_code: Color,
    bullet: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                heading: Color::Blue,
                keyword: Color::Blue,
                string: Color::Green,
                number: Color::Magenta,
                comment: Color::BrightBlack,
                inline_code: Color::Red,
                bullet: Color::Cyan,
            },
            Theme::Dark => Palette {
                heading: Color::BrightCyan,
                keyword: Color::BrightMagenta,
                string: Color::BrightGreen,
                number: Color::BrightYellow,
                comment: Color::BrightBlack,
                inline_code: Color::BrightYellow,
                bullet: Color::BrightCyan,
            },
        }
    }
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "class", "const", "continue", "def", "elif", "else",
    "enum", "except", "export", "extern", "false", "False", "fn", "for", "from", "func",
    "function", "if", "impl", "import", "in", "interface", "lambda", "let", "loop", "match",
    "mod", "mut", "new", "nil", "None", "null", "pub", "raise", "return", "self", "Self",
    "static", "struct", "switch", "trait", "true", "True", "try", "type", "use", "var", "where",
    "while", "with", "yield",
];

/// Languages whose line comments start with `#`.
const HASH_COMMENT_LANGS: &[&str] = &[
    "python", "py", "sh", "bash", "shell", "toml", "yaml", "yml", "ruby", "rb",
];

#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    theme: Theme,
    palette: Palette,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl MarkdownRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            palette: Palette::for_theme(theme),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.palette = Palette::for_theme(theme);
    }

    /// Render `text`, one output line per source line.
    pub fn render(&self, text: &str) -> Vec<String> {
        let mut fence: Option<String> = None;
        let mut out = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim_start();

            if let Some(info) = trimmed.strip_prefix("```") {
                match fence.take() {
                    Some(_) => out.push("└─".dimmed().to_string()),
                    None => {
                        let lang = info.trim().to_lowercase();
                        let header = format!("{} {}", "┌─".dimmed(), lang.dimmed());
                        out.push(header.trim_end().to_string());
                        fence = Some(lang);
                    }
                }
                continue;
            }

            match &fence {
                Some(lang) => out.push(format!("{} {}", "│".dimmed(), self.highlight(line, lang))),
                None => out.push(self.render_block_line(line)),
            }
        }

        out
    }

    fn render_block_line(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        let indent = &line[..line.len() - trimmed.len()];

        if trimmed.is_empty() {
            return String::new();
        }

        if let Some((level, title)) = heading(trimmed) {
            let styled = self.inline(title).color(self.palette.heading).bold();
            return if level == 1 {
                styled.underline().to_string()
            } else {
                styled.to_string()
            };
        }

        if is_rule(trimmed) {
            return "─".repeat(40).dimmed().to_string();
        }

        if let Some(quote) = trimmed.strip_prefix('>') {
            return format!("{}{} {}", indent, "│".dimmed(), self.inline(quote.trim_start()).italic());
        }

        for marker in ["- ", "* ", "+ "] {
            if let Some(item) = trimmed.strip_prefix(marker) {
                return format!("{}{} {}", indent, "•".color(self.palette.bullet), self.inline(item));
            }
        }

        if let Some((number, item)) = ordered_item(trimmed) {
            return format!(
                "{}{} {}",
                indent,
                format!("{}.", number).color(self.palette.bullet),
                self.inline(item)
            );
        }

        format!("{}{}", indent, self.inline(trimmed))
    }

    /// Inline spans: `code` and **bold**. Unclosed markers stay literal.
    fn inline(&self, text: &str) -> String {
        let mut out = String::new();
        let mut rest = text;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("**")
                && let Some(end) = after.find("**")
                && end > 0
            {
                out.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
                continue;
            }

            if let Some(after) = rest.strip_prefix('`')
                && let Some(end) = after.find('`')
            {
                out.push_str(&after[..end].color(self.palette.inline_code).to_string());
                rest = &after[end + 1..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }

        out
    }

    fn highlight(&self, line: &str, lang: &str) -> String {
        let trimmed = line.trim_start();
        let hash_comments = HASH_COMMENT_LANGS.contains(&lang);
        if trimmed.starts_with("//") || (hash_comments && trimmed.starts_with('#')) {
            return line.color(self.palette.comment).to_string();
        }

        let mut out = String::new();
        let mut chars = line.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if c == '"' || c == '\'' {
                let mut end = line.len();
                let mut escaped = false;
                for (i, d) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if d == '\\' {
                        escaped = true;
                    } else if d == c {
                        end = i + d.len_utf8();
                        break;
                    }
                }
                out.push_str(&self.paint(&line[start..end], self.palette.string));
            } else if c.is_alphabetic() || c == '_' {
                let mut end = start + c.len_utf8();
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let word = &line[start..end];
                if KEYWORDS.contains(&word) {
                    out.push_str(&self.paint(word, self.palette.keyword));
                } else {
                    out.push_str(word);
                }
            } else if c.is_ascii_digit() {
                let mut end = start + 1;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_alphanumeric() || d == '.' || d == '_' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&self.paint(&line[start..end], self.palette.number));
            } else {
                out.push(c);
            }
        }

        out
    }

    fn paint(&self, s: &str, color: Color) -> String {
        s.color(color).to_string()
    }
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&level) {
        line[level..].strip_prefix(' ').map(|title| (level, title.trim()))
    } else {
        None
    }
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && (compact.chars().all(|c| c == '-')
            || compact.chars().all(|c| c == '*')
            || compact.chars().all(|c| c == '_'))
}

fn ordered_item(line: &str) -> Option<(&str, &str)> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    line[digits..]
        .strip_prefix(". ")
        .map(|item| (&line[..digits], item))
}
