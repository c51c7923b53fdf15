//! Output formatting

use clap::ValueEnum;
use colored::Colorize;
use kankercare_intake::notify::{Notification, Notifier, Variant};
use kankercare_intake::validation::FieldErrors;
use parking_lot::Mutex;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn print<T: Serialize>(&self, data: &T) {
        println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
    }

    pub fn is_json(&self) -> bool {
        *self == OutputFormat::Json
    }
}

pub fn render_notification(notification: &Notification) -> String {
    match notification.variant {
        Variant::Default => format!(
            "{} {} {}",
            "✔".green(),
            notification.title.green().bold(),
            notification.description
        ),
        Variant::Destructive => format!(
            "{} {} {}",
            "✖".red(),
            notification.title.red().bold(),
            notification.description
        ),
    }
}

pub fn render_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(path, message)| format!("  {} {}", format!("{path}:").yellow(), message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints toasts as they arrive in text mode and keeps them for the final
/// document in JSON mode
pub struct ConsoleNotifier {
    format: OutputFormat,
    held: Mutex<Vec<Notification>>,
}

impl ConsoleNotifier {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            held: Mutex::new(Vec::new()),
        }
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.held.lock())
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match self.format {
            OutputFormat::Text => println!("{}", render_notification(&notification)),
            OutputFormat::Json => self.held.lock().push(notification),
        }
    }
}
