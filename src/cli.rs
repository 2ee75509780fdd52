//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use screpo_core::{dispatch::UserAction, model::DEFAULT_TITLE, startup::DEFAULT_HOTKEY};

#[derive(Parser, Debug, Clone)]
#[command(name = "screpo", version)]
#[command(about = "Capture monitors to a folder and keep an HTML gallery of it up to date")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Destination folder (a folder dialog opens when omitted)
    #[arg(long, global = true, env = "SCREPO_FOLDER")]
    pub folder: Option<PathBuf>,

    /// Gallery title
    #[arg(long, global = true, env = "SCREPO_TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Monitor index as listed by `screpo monitors` (primary when omitted)
    #[arg(long, global = true)]
    pub monitor: Option<usize>,

    /// Regenerate the gallery after every saved image
    #[arg(long, global = true)]
    pub auto_publish: bool,

    /// Global hotkey used by `watch`
    #[arg(long, global = true, env = "SCREPO_HOTKEY", default_value = DEFAULT_HOTKEY)]
    pub hotkey: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the monitors that can be captured
    Monitors {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Capture the selected monitor once
    Capture,
    /// Save the clipboard image once
    Clipboard,
    /// Regenerate index.html from the img folder
    Generate,
    /// Copy the destination folder path to the clipboard
    CopyPath,
    /// Register the hotkey and capture on every press until Ctrl+C
    Watch,
}

impl Command {
    /// One-shot action run by this command, if any
    pub fn action(&self) -> Option<UserAction> {
        match self {
            Command::Capture => Some(UserAction::Capture),
            Command::Clipboard => Some(UserAction::PublishClipboard),
            Command::Generate => Some(UserAction::GeneratePage),
            Command::CopyPath => Some(UserAction::CopyPath),
            Command::Monitors { .. } | Command::Watch => None,
        }
    }

    /// Whether the command needs a working capture backend
    pub fn needs_capture(&self) -> bool {
        matches!(self, Command::Monitors { .. } | Command::Capture | Command::Watch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["screpo", "capture"]).unwrap();
        assert_eq!(cli.command, Command::Capture);
        assert_eq!(cli.hotkey, DEFAULT_HOTKEY);
        assert!(!cli.auto_publish);
        assert!(cli.monitor.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "screpo",
            "watch",
            "--folder",
            "/tmp/shots",
            "--title",
            "Sprint 12",
            "--monitor",
            "1",
            "--auto-publish",
        ])
        .unwrap();

        assert_eq!(cli.command, Command::Watch);
        assert_eq!(cli.folder, Some(PathBuf::from("/tmp/shots")));
        assert_eq!(cli.title, "Sprint 12");
        assert_eq!(cli.monitor, Some(1));
        assert!(cli.auto_publish);
    }

    #[test]
    fn test_monitors_json() {
        let cli = Cli::try_parse_from(["screpo", "monitors", "--json"]).unwrap();
        assert_eq!(cli.command, Command::Monitors { json: true });
        assert!(cli.command.action().is_none());
    }

    #[test]
    fn test_actions() {
        assert_eq!(Command::Clipboard.action(), Some(UserAction::PublishClipboard));
        assert_eq!(Command::CopyPath.action(), Some(UserAction::CopyPath));
        assert!(Command::Capture.needs_capture());
        assert!(!Command::Generate.needs_capture());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["screpo"]).is_err());
    }
}
