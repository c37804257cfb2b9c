//! REPL (Read-Eval-Print Loop) for interactive chat

use super::command::{ReplCommand, copy_response};
use crate::config::ReplConfig;
use crate::output::{ConsoleRenderer, format_health, format_status};
use campus_chat_application::{ChatController, PreferencePort, SendError, StatusMonitor};
use campus_chat_domain::StatusIndicator;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Interactive chat REPL
pub struct ChatRepl {
    controller: Arc<ChatController>,
    console: Arc<ConsoleRenderer>,
    monitor: Arc<StatusMonitor>,
    preferences: Arc<dyn PreferencePort>,
    config: ReplConfig,
    status_feed: Option<watch::Receiver<StatusIndicator>>,
}

impl ChatRepl {
    pub fn new(
        controller: Arc<ChatController>,
        console: Arc<ConsoleRenderer>,
        monitor: Arc<StatusMonitor>,
        preferences: Arc<dyn PreferencePort>,
    ) -> Self {
        Self {
            controller,
            console,
            monitor,
            preferences,
            config: ReplConfig::default(),
            status_feed: None,
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Receive background status polls; changes are announced between prompts.
    pub fn with_status_feed(mut self, feed: watch::Receiver<StatusIndicator>) -> Self {
        self.status_feed = Some(feed);
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = self.config.history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome().await;

        loop {
            self.announce_status_change();

            match rl.readline("you> ") {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    self.process_prompt(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path
            && let Err(e) = rl.save_history(path)
        {
            warn!("Could not save history to {}: {}", path.display(), e);
        }

        Ok(())
    }

    async fn print_welcome(&mut self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            campus-chat - Chat Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();

        let status = self.monitor.check().await;
        println!("{}", format_status(&status));
        if let Some(feed) = self.status_feed.as_mut() {
            feed.mark_unchanged();
        }
        println!();
        println!("Type /help for commands, /quit to exit.");
        println!();
    }

    /// Print the status line when a background poll changed its level.
    fn announce_status_change(&mut self) {
        let Some(feed) = self.status_feed.as_mut() else {
            return;
        };
        if !feed.has_changed().unwrap_or(false) {
            return;
        }
        let status = feed.borrow_and_update().clone();
        // A generation already ended by the time the prompt is back
        if status == StatusIndicator::generating() {
            return;
        }
        if !matches!(status, StatusIndicator::Connected { .. }) {
            println!("{}", format_status(&status));
        }
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&self, line: &str) -> bool {
        let command = match ReplCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                return false;
            }
        };

        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                println!("{}", ReplCommand::HELP);
                println!();
            }
            ReplCommand::Clear => {
                self.controller.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            ReplCommand::Status => {
                println!("{}", format_status(&self.monitor.check().await));
                match self.monitor.health().await {
                    Ok(report) => println!("{}", format_health(&report)),
                    Err(e) => println!("{}", format!("Health check failed: {}", e).red()),
                }
            }
            ReplCommand::History => {
                let transcript = self.controller.transcript();
                if transcript.is_empty() {
                    println!("{}", "No messages yet.".dimmed());
                }
                for record in transcript.messages() {
                    self.console.print_record(record);
                    println!();
                }
            }
            ReplCommand::Theme(choice) => {
                let theme = choice.unwrap_or_else(|| self.console.theme().toggled());
                self.console.set_theme(theme);
                if let Err(e) = self.preferences.save_theme(theme) {
                    warn!("{}", e);
                }
                println!("Theme: {}", theme);
            }
            ReplCommand::Copy(path) => match self.controller.last_response() {
                Some(text) => {
                    match copy_response(&text, path.as_deref(), &mut std::io::stdout()) {
                        Ok(message) => println!("{}", message.dimmed()),
                        Err(e) => println!("{}", format!("Copy failed: {}", e).red()),
                    }
                }
                None => println!("{}", "Nothing to copy yet.".dimmed()),
            },
        }

        false
    }

    async fn process_prompt(&self, prompt: &str) {
        println!();

        let send = self.controller.send(prompt, self.console.as_ref());
        tokio::pin!(send);

        let mut cancelled = false;
        let result = loop {
            tokio::select! {
                result = &mut send => break result,
                _ = tokio::signal::ctrl_c(), if !cancelled => {
                    debug!("Ctrl-C during generation");
                    cancelled = true;
                    self.controller.cancel();
                }
            }
        };

        match result {
            Ok(outcome) => {
                if let Some(stats) = outcome.stream.stats {
                    println!(
                        "{}",
                        format!(
                            "({} tokens in {:.1}s)",
                            stats.token_count, stats.generation_time
                        )
                        .dimmed()
                    );
                }
            }
            // Already shown inline by the console renderer
            Err(SendError::Stream(_)) => {}
            Err(e) => println!("{}", e.to_string().yellow()),
        }

        if self.config.show_status {
            println!("{}", format_status(&self.monitor.check().await));
        }
        println!();
    }
}
