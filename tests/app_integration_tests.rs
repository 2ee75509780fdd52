//! End-to-end tests of the one-shot commands
//!
//! Commands that need a display, clipboard or hotkey are marked `#[ignore]`
//! and run manually inside a desktop session:
//!
//! ```bash
//! cargo test -- --ignored
//! ```

use std::{fs, path::Path, process::ExitCode};

use clap::Parser;
use screpo::{app, cli::Cli};

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["screpo"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("valid arguments")
}

async fn run(args: &[&str], folder: &Path) -> anyhow::Result<ExitCode> {
    app::run_command(&cli(args), folder.to_path_buf()).await
}

#[tokio::test]
async fn test_generate_lists_existing_images() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("img")).unwrap();
    fs::write(dir.path().join("img/old.png"), b"png").unwrap();
    fs::write(dir.path().join("img/readme.txt"), b"text").unwrap();

    let code = run(&["generate", "--title", "Weekly <review>"], dir.path()).await.unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(html.contains("<h1>Weekly &lt;review&gt;</h1>"));
    assert!(html.contains(r#"src="img/old.png""#));
    assert!(!html.contains("readme.txt"));
}

#[tokio::test]
async fn test_generate_failure_sets_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("index.html")).unwrap();

    let code = run(&["generate"], dir.path()).await.unwrap();

    assert_eq!(code, ExitCode::FAILURE);
    assert!(dir.path().join("img").is_dir());
}

#[tokio::test]
async fn test_blocked_images_folder_is_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("img"), b"file in the way").unwrap();

    let err = run(&["generate"], dir.path()).await.unwrap_err();

    assert!(app::remediation_hint(&err).unwrap().contains("writable"));
}

#[tokio::test]
#[ignore = "Requires a live desktop session"]
async fn test_capture_primary_monitor() {
    let dir = tempfile::tempdir().unwrap();

    let code = run(&["capture", "--auto-publish"], dir.path()).await.unwrap();

    assert_eq!(code, ExitCode::SUCCESS);
    let images: Vec<_> = fs::read_dir(dir.path().join("img")).unwrap().collect();
    assert_eq!(images.len(), 1);
    assert!(dir.path().join("index.html").is_file());
}
