//! CLI entrypoint for campus-chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use campus_chat_application::{
    ChatController, ConversationLogger, InMemoryPreferences, PreferencePort, SendError,
    StatusMonitor,
};
use campus_chat_domain::{StatusIndicator, Theme};
use campus_chat_infrastructure::config::paths::expand_home;
use campus_chat_infrastructure::{
    ConfigLoader, FileConfig, HttpChatGateway, JsonlConversationLogger, PreferenceStore,
};
use campus_chat_presentation::{
    ChatRepl, Cli, ConsoleRenderer, OutputConfig, ReplConfig, format_health, format_status,
};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate()?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.file.as_deref())?;

    info!("Starting campus-chat");
    debug!("Server: {}", config.server.base_url);

    if !config.output.color {
        colored::control::set_override(false);
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("Effective configuration:");
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(HttpChatGateway::new(&config.server.to_endpoint())?);
    let monitor = Arc::new(StatusMonitor::new(gateway.clone()));

    if cli.status {
        let status = monitor.check().await;
        println!("{}", format_status(&status));
        return Ok(if matches!(status, StatusIndicator::Error(_)) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    if cli.health {
        let report = monitor.health().await?;
        println!("{}", format_health(&report));
        return Ok(if report.is_healthy() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let client_config = config.to_client_config();
    let preferences: Arc<dyn PreferencePort> = match PreferenceStore::default_location() {
        Some(store) => Arc::new(store),
        None => Arc::new(InMemoryPreferences::default()),
    };
    let theme = resolve_theme(&cli, &config, preferences.as_ref());

    let output = OutputConfig {
        color: config.output.color,
        mode: client_config.render_mode,
        theme,
        show_indicator: !cli.quiet,
    };

    let mut controller = ChatController::new(gateway.clone()).with_config(&client_config);
    if let Some(path) = config.logging.conversation_log.as_deref()
        && let Some(logger) = JsonlConversationLogger::new(expand_home(path))
    {
        info!("Conversation log: {}", logger.path().display());
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        controller = controller.with_conversation_logger(logger);
    }
    let controller = Arc::new(controller);
    let monitor =
        Arc::new(StatusMonitor::new(gateway.clone()).with_activity(controller.activity()));

    // Chat mode
    if cli.chat {
        let repl_config = ReplConfig {
            show_status: config.repl.show_status && !cli.quiet,
            history_file: config.repl.history_file.as_deref().map(expand_home),
        };
        let console = Arc::new(
            ConsoleRenderer::new(output.mode, output.theme)
                .with_indicator(output.show_indicator)
                .with_status(repl_config.show_status),
        );

        let mut repl = ChatRepl::new(controller.clone(), console, monitor.clone(), preferences)
            .with_config(repl_config);

        let cancel = CancellationToken::new();
        let poller = if client_config.status_polling {
            let (tx, rx) = watch::channel(StatusIndicator::connection_error());
            repl = repl.with_status_feed(rx);
            let monitor = monitor.clone();
            let interval = client_config.status_interval;
            let token = cancel.clone();
            Some(tokio::spawn(async move {
                monitor.run(interval, token, tx).await;
            }))
        } else {
            None
        };

        let result = repl.run().await;

        cancel.cancel();
        if let Some(handle) = poller
            && let Err(e) = handle.await
        {
            warn!("Status poller ended abnormally: {}", e);
        }

        result?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single prompt mode - prompt is required
    let prompt = match cli.prompt {
        Some(p) => p,
        None => bail!("Prompt is required. Use --chat for interactive mode."),
    };

    let console = ConsoleRenderer::new(output.mode, output.theme)
        .with_indicator(output.show_indicator)
        .with_label(false);

    let send = controller.send(&prompt, &console);
    tokio::pin!(send);

    let mut cancelled = false;
    let result = loop {
        tokio::select! {
            result = &mut send => break result,
            _ = tokio::signal::ctrl_c(), if !cancelled => {
                cancelled = true;
                controller.cancel();
            }
        }
    };

    match result {
        Ok(outcome) => {
            if let Some(stats) = outcome.stream.stats
                && !cli.quiet
            {
                eprintln!(
                    "{}",
                    format!(
                        "({} tokens in {:.1}s)",
                        stats.token_count, stats.generation_time
                    )
                    .dimmed()
                );
            }
            Ok(if outcome.stream.cancelled {
                ExitCode::from(130)
            } else {
                ExitCode::SUCCESS
            })
        }
        // The renderer has already printed the error inline
        Err(SendError::Stream(_)) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}

/// Command-line flags win over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(server) = &cli.server {
        config.server.base_url = server.clone();
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.generation.max_tokens = max_tokens;
    }
    if let Some(temperature) = cli.temperature {
        config.generation.temperature = temperature;
    }
    if let Some(top_p) = cli.top_p {
        config.generation.top_p = top_p;
    }
    if cli.plain {
        config.output.markdown = false;
    }
    if let Some(theme) = cli.theme {
        config.output.theme = Some(theme.into());
    }
}

/// `--theme` (remembered for next time), then the config file, then the
/// theme saved from an earlier session.
fn resolve_theme(cli: &Cli, config: &FileConfig, preferences: &dyn PreferencePort) -> Theme {
    if let Some(theme) = cli.theme {
        let theme = Theme::from(theme);
        if let Err(e) = preferences.save_theme(theme) {
            warn!("{}", e);
        }
        return theme;
    }
    config.output.theme.unwrap_or_else(|| preferences.theme())
}

fn verbosity_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    }
}

/// Diagnostics go to stderr, or to `log_file` when configured so they do not
/// interleave with the streamed answer.
fn init_tracing(verbose: u8, log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = verbosity_filter(verbose);

    let Some(log_file) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let path = expand_home(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("logging.file '{}' has no file name", log_file))?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config_values() {
        let cli = Cli::parse_from([
            "campus-chat",
            "--server",
            "http://gpu-box:9000",
            "--top-p",
            "0.5",
            "--plain",
            "hi",
        ]);
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.server.base_url, "http://gpu-box:9000");
        assert_eq!(config.generation.top_p, 0.5);
        assert_eq!(config.generation.max_tokens, 512);
        assert!(!config.output.markdown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_theme_resolution_order() {
        let prefs = InMemoryPreferences::default();
        prefs.save_theme(Theme::Dark).unwrap();

        let cli = Cli::parse_from(["campus-chat", "hi"]);
        let mut config = FileConfig::default();
        assert_eq!(resolve_theme(&cli, &config, &prefs), Theme::Dark);

        config.output.theme = Some(Theme::Light);
        assert_eq!(resolve_theme(&cli, &config, &prefs), Theme::Light);

        let cli = Cli::parse_from(["campus-chat", "--theme", "light", "hi"]);
        let config = FileConfig::default();
        assert_eq!(resolve_theme(&cli, &config, &prefs), Theme::Light);
        assert_eq!(prefs.theme(), Theme::Light);
    }
}
