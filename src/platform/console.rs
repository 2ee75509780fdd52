//! Console front end for watch mode
//!
//! Notifications are printed to stdout. While watching, single-word
//! commands on stdin trigger the same actions as the hotkey.

use async_trait::async_trait;
use screpo_core::{
    dispatch::UserAction,
    notify::{Notification, NotificationSink, Severity},
};

/// Prints notifications to stdout and mirrors them to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl NotificationSink for ConsoleNotifier {
    async fn notify(&self, n: Notification) {
        let marker = match n.severity {
            Severity::Success => "ok",
            Severity::Error => "!!",
        };
        for (i, line) in n.message.lines().enumerate() {
            if i == 0 {
                println!("[{}] {}", marker, line);
            } else {
                println!("     {}", line);
            }
        }
        tracing::debug!(
            severity = ?n.severity,
            color = n.severity.color(),
            region = %n.region,
            duration_ms = n.duration.as_millis() as u64,
            "notification shown"
        );
    }
}

/// A command typed on stdin during watch mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Run a user action
    Action(UserAction),
    /// Print the command list
    Help,
    /// Leave watch mode
    Quit,
}

/// Help text listing the console commands
pub const CONSOLE_HELP: &str = "commands: c|capture  v|clipboard  g|generate  p|copy-path  h|help  q|quit";

impl ConsoleCommand {
    /// Parses one input line; blank or unknown input yields `None`
    pub fn parse(line: &str) -> Option<Self> {
        let command = match line.trim().to_ascii_lowercase().as_str() {
            "c" | "capture" => Self::Action(UserAction::Capture),
            "v" | "clipboard" => Self::Action(UserAction::PublishClipboard),
            "g" | "generate" => Self::Action(UserAction::GeneratePage),
            "p" | "copy-path" => Self::Action(UserAction::CopyPath),
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleCommand::parse("c"), Some(ConsoleCommand::Action(UserAction::Capture)));
        assert_eq!(
            ConsoleCommand::parse("  Clipboard \n"),
            Some(ConsoleCommand::Action(UserAction::PublishClipboard))
        );
        assert_eq!(
            ConsoleCommand::parse("copy-path"),
            Some(ConsoleCommand::Action(UserAction::CopyPath))
        );
        assert_eq!(ConsoleCommand::parse("q"), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("?"), Some(ConsoleCommand::Help));
        assert_eq!(ConsoleCommand::parse(""), None);
        assert_eq!(ConsoleCommand::parse("shoot"), None);
    }
}
