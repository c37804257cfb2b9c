//! Status line formatting

use campus_chat_domain::{HealthReport, StatusIndicator};
use colored::Colorize;

/// One-line connection indicator, e.g. `● Online • 1/3 users`.
pub fn format_status(indicator: &StatusIndicator) -> String {
    match indicator {
        StatusIndicator::Connected { .. } => format!("{} {}", "●".green(), indicator),
        StatusIndicator::Warning(_) => format!("{} {}", "●".yellow(), indicator.to_string().yellow()),
        StatusIndicator::Error(_) => format!("{} {}", "●".red(), indicator.to_string().red()),
    }
}

pub fn format_health(report: &HealthReport) -> String {
    let model = if report.model_loaded {
        "model loaded".green()
    } else {
        "model not loaded".yellow()
    };
    let status = if report.is_healthy() {
        report.status.green()
    } else {
        report.status.red()
    };
    format!("Health: {} ({})", status, model)
}
