//! Console renderer for streamed answers
//!
//! Implements [`StreamObserver`]. Every `on_token` carries the full text so
//! far; the renderer re-renders the completed lines from scratch and prints
//! only those it has not printed yet. The unfinished last line lives in the
//! typing indicator until its newline arrives or the stream ends.

use super::status::format_status;
use crate::progress::TypingIndicator;
use crate::render::MarkdownRenderer;
use campus_chat_application::StreamObserver;
use campus_chat_domain::{
    MessageId, MessageRecord, RenderMode, Role, StatusIndicator, Theme, preview,
};
use colored::Colorize;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

struct RenderState {
    renderer: MarkdownRenderer,
    mode: RenderMode,
    out: Box<dyn Write + Send>,
    indicator: Option<TypingIndicator>,
    printed_lines: usize,
    last_text: String,
}

impl RenderState {
    fn render(&self, text: &str) -> Vec<String> {
        match self.mode {
            RenderMode::Markdown => self.renderer.render(text),
            RenderMode::Plain => text.lines().map(str::to_string).collect(),
        }
    }

    /// Print rendered lines of `text` beyond those already printed.
    fn print_new_lines(&mut self, text: &str) {
        let lines = self.render(text);
        if lines.len() <= self.printed_lines {
            return;
        }

        let fresh = &lines[self.printed_lines..];
        let out = &mut self.out;
        let mut write = || -> io::Result<()> {
            for line in fresh {
                writeln!(out, "{}", line)?;
            }
            out.flush()
        };
        let result = match &self.indicator {
            Some(indicator) => indicator.suspend(write),
            None => write(),
        };
        if let Err(e) = result {
            tracing::debug!("Console write failed: {}", e);
        }
        self.printed_lines = lines.len();
    }

    /// Print everything still unprinted, including an unterminated last line.
    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.last_text);
        self.print_new_lines(&text);
        self.last_text = text;
    }

    fn println(&mut self, line: impl std::fmt::Display) {
        let out = &mut self.out;
        let mut write = || writeln!(out, "{}", line).and_then(|_| out.flush());
        let result = match &self.indicator {
            Some(indicator) => indicator.suspend(write),
            None => write(),
        };
        if let Err(e) = result {
            tracing::debug!("Console write failed: {}", e);
        }
    }
}

/// Renders assistant answers to the terminal as they stream in.
pub struct ConsoleRenderer {
    state: Mutex<RenderState>,
    show_indicator: bool,
    show_label: bool,
    show_status: bool,
}

impl ConsoleRenderer {
    pub fn new(mode: RenderMode, theme: Theme) -> Self {
        Self::with_writer(mode, theme, Box::new(io::stdout()))
    }

    pub fn with_writer(mode: RenderMode, theme: Theme, out: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(RenderState {
                renderer: MarkdownRenderer::new(theme),
                mode,
                out,
                indicator: None,
                printed_lines: 0,
                last_text: String::new(),
            }),
            show_indicator: true,
            show_label: true,
            show_status: false,
        }
    }

    /// Show the spinner while generating (off in quiet mode).
    pub fn with_indicator(mut self, show: bool) -> Self {
        self.show_indicator = show;
        self
    }

    /// Print an `Assistant:` label before each answer.
    pub fn with_label(mut self, show: bool) -> Self {
        self.show_label = show;
        self
    }

    /// Print the `Generating...` status line when an answer starts.
    pub fn with_status(mut self, show: bool) -> Self {
        self.show_status = show;
        self
    }

    fn lock(&self) -> MutexGuard<'_, RenderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn theme(&self) -> Theme {
        self.lock().renderer.theme()
    }

    pub fn set_theme(&self, theme: Theme) {
        self.lock().renderer.set_theme(theme);
    }

    pub fn mode(&self) -> RenderMode {
        self.lock().mode
    }

    /// Print a finished record, e.g. when replaying the transcript.
    pub fn print_record(&self, record: &MessageRecord) {
        let mut state = self.lock();
        let label = match record.role {
            Role::User => "You:".cyan().bold(),
            Role::Assistant => "Assistant:".green().bold(),
        };
        state.println(label);
        for line in state.render(record.display_text()) {
            state.println(line);
        }
        if let Some(error) = record.error() {
            state.println(format!("Error: {}", error).red());
        }
    }
}

impl StreamObserver for ConsoleRenderer {
    fn on_generation_start(&self, _id: MessageId) {
        let mut state = self.lock();
        state.printed_lines = 0;
        state.last_text.clear();
        if self.show_status {
            state.println(format_status(&StatusIndicator::generating()));
        }
        if self.show_label {
            state.println("Assistant:".green().bold());
        }
        state.indicator = Some(TypingIndicator::start(self.show_indicator));
    }

    fn on_stream_open(&self, _id: MessageId) {
        if let Some(indicator) = &self.lock().indicator {
            indicator.set_message("");
        }
    }

    fn on_token(&self, _id: MessageId, text: &str) {
        let mut state = self.lock();
        state.last_text.clear();
        state.last_text.push_str(text);

        let (complete, partial) = match text.rfind('\n') {
            Some(pos) => (&text[..pos], &text[pos + 1..]),
            None => ("", text),
        };
        state.print_new_lines(complete);

        if let Some(indicator) = &state.indicator {
            indicator.set_message(preview(partial, 72));
        }
    }

    fn on_complete(&self, _id: MessageId, text: &str) {
        let mut state = self.lock();
        state.last_text = text.to_string();
        state.flush_text();
    }

    fn on_empty(&self, _id: MessageId) {
        self.lock()
            .println(MessageRecord::EMPTY_PLACEHOLDER.dimmed().italic());
    }

    fn on_cancelled(&self, _id: MessageId, text: &str) {
        let mut state = self.lock();
        state.last_text = text.to_string();
        state.flush_text();
        state.println("[generation cancelled]".yellow());
    }

    fn on_server_error(&self, _id: MessageId, message: Option<&str>) {
        let line = match message {
            Some(message) => format!("Server reported an error: {}", message),
            None => "Server reported an error".to_string(),
        };
        self.lock().println(line.yellow());
    }

    fn on_error(&self, _id: MessageId, message: &str) {
        let mut state = self.lock();
        state.flush_text();
        state.println(format!("Error: {}", message).red().bold());
    }

    fn on_generation_end(&self, _id: MessageId) {
        let mut state = self.lock();
        if let Some(indicator) = state.indicator.take() {
            indicator.finish();
        }
        state.printed_lines = 0;
        state.last_text.clear();
    }
}
