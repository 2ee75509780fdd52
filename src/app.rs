//! Application wiring
//!
//! [`launch`] runs on the main thread. It resolves the folder there (native
//! dialogs are main-thread only), then either blocks on a tokio runtime for
//! a one-shot command or starts watch mode. Watch mode keeps the hotkey and
//! its winit loop on the main thread and drives the session from a runtime
//! thread.
//!
//! Startup failures are returned to `main`; action failures have already
//! been shown to the user and only affect the exit status.

use std::{future::Future, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use screpo_core::{
    capture::{ImageBuffer, MonitorEnumerator, ScreenCapture, create_default_backend},
    dispatch::{Dispatcher, UserAction},
    error::{CaptureError, CaptureResult, StartupError},
    model::{CaptureRegion, SessionConfig},
    notify::{NotificationSink, TracingNotifier},
    pipeline::CaptureOrchestrator,
    startup::{HotkeyRegistrar, prepare_layout, resolve_folder, select_monitor},
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    runtime::Runtime,
    sync::{mpsc, oneshot},
    task::JoinSet,
};

use crate::{
    cli::{Cli, Command},
    platform::{
        ConsoleCommand, ConsoleNotifier, DialogFolderPicker, GlobalHotkeyRegistrar,
        SystemClipboard,
        console::CONSOLE_HELP,
        event_loop::{HotkeyLoop, build_event_loop, request_exit},
        hotkey::forward_presses,
    },
};

/// Runs the parsed command; call from the main thread
pub fn launch(cli: Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Monitors { json } => runtime()?.block_on(list_monitors(*json)),
        Command::Watch => watch(&cli),
        _ => {
            let folder = resolve_folder(cli.folder.clone(), &DialogFolderPicker::new())?;
            runtime()?.block_on(run_command(&cli, folder))
        }
    }
}

/// Runs a one-shot command against an already resolved folder
///
/// Commands without a one-shot action (`monitors`, `watch`) are no-ops here.
pub async fn run_command(cli: &Cli, folder: PathBuf) -> Result<ExitCode> {
    let Some(action) = cli.command.action() else {
        return Ok(ExitCode::SUCCESS);
    };
    let session = start_session(cli, folder).await?;

    let status = match session.dispatcher.handle_user_action(action, &session.config).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    };
    Ok(status)
}

/// Remediation hint for a startup or capture failure, if one applies
pub fn remediation_hint(error: &anyhow::Error) -> Option<&str> {
    if let Some(e) = error.downcast_ref::<StartupError>() {
        return Some(e.remediation_hint());
    }
    error
        .downcast_ref::<CaptureError>()
        .map(CaptureError::remediation_hint)
}

fn runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")
}

/// Everything an action needs, fixed for the life of the process
struct Session {
    dispatcher: Arc<Dispatcher>,
    config:     Arc<SessionConfig>,
}

impl Session {
    fn spawn(&self, tasks: &mut JoinSet<()>, action: UserAction) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let config = Arc::clone(&self.config);
        tasks.spawn(async move {
            if let Err(e) = dispatcher.handle_user_action(action, &config).await {
                tracing::debug!("{} finished with error: {}", action, e);
            }
        });
    }
}

/// Where notifications end up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feedback {
    /// Printed to stdout
    Console,
    /// Emitted as log events only; keeps stdout free when logs are JSON
    Log,
}

impl Feedback {
    fn for_cli(cli: &Cli) -> Self {
        if cli.json_logs { Self::Log } else { Self::Console }
    }

    fn sink(self) -> Arc<dyn NotificationSink> {
        match self {
            Self::Console => Arc::new(ConsoleNotifier),
            Self::Log => Arc::new(TracingNotifier),
        }
    }
}

/// Capture backend used when no display server is present
///
/// Lets page generation and clipboard commands run headless; captures fail
/// with the original detection error.
struct NoDisplay(CaptureError);

#[async_trait]
impl ScreenCapture for NoDisplay {
    async fn capture(&self, _region: &CaptureRegion) -> CaptureResult<ImageBuffer> {
        Err(self.0.clone())
    }
}

/// Creates the `img/` folder and picks the capture target for `folder`
///
/// Folder selection and hotkey registration have already happened on the
/// main thread, in that order.
async fn start_session(cli: &Cli, folder: PathBuf) -> Result<Session, StartupError> {
    let layout = prepare_layout(folder)?;

    let (capturer, region) = capture_target(cli).await?;
    tracing::info!("Capture region {}", region);

    let config = SessionConfig::builder()
        .title(cli.title.clone())
        .region(region)
        .auto_publish(cli.auto_publish)
        .build();

    let clipboard = SystemClipboard::new();
    let orchestrator = CaptureOrchestrator::new(capturer, layout);
    let dispatcher = Dispatcher::new(
        Arc::new(orchestrator),
        Arc::new(clipboard.clone()),
        Arc::new(clipboard),
        Feedback::for_cli(cli).sink(),
    );

    Ok(Session {
        dispatcher: Arc::new(dispatcher),
        config:     Arc::new(config),
    })
}

async fn capture_target(
    cli: &Cli,
) -> Result<(Arc<dyn ScreenCapture>, CaptureRegion), StartupError> {
    let detected = match create_default_backend() {
        Ok(backend) => select_monitor(backend.as_ref(), cli.monitor)
            .await
            .map(|monitor| (backend, monitor)),
        Err(e) => Err(StartupError::MonitorSelection(e)),
    };

    match detected {
        Ok((backend, monitor)) => {
            tracing::info!("Selected monitor '{}' {}", monitor.name, monitor.region);
            let capturer: Arc<dyn ScreenCapture> = backend;
            Ok((capturer, monitor.region))
        }
        Err(StartupError::MonitorSelection(e)) if !cli.command.needs_capture() => {
            tracing::warn!("No capture target available: {}", e);
            Ok((Arc::new(NoDisplay(e)), CaptureRegion::new(0, 0, 0, 0)))
        }
        Err(e) => Err(e),
    }
}

/// Watch mode
///
/// Main thread: folder, event loop, hotkey, then the loop until exit. The
/// runtime thread builds the session and runs [`run_watch_loop`]. Whichever
/// side finishes first stops the other.
fn watch(cli: &Cli) -> Result<ExitCode> {
    let folder = resolve_folder(cli.folder.clone(), &DialogFolderPicker::new())?;
    let event_loop = build_event_loop().context("Failed to start the event loop")?;
    let hotkey = GlobalHotkeyRegistrar.register(&cli.hotkey)?;

    let (tx, presses) = mpsc::channel(8);
    forward_presses(hotkey.id(), tx);

    let proxy = event_loop.create_proxy();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let combo = hotkey.combo().to_string();
    let cli = cli.clone();

    let worker = std::thread::Builder::new()
        .name("screpo-runtime".to_string())
        .spawn(move || {
            let result = runtime().and_then(|rt| {
                let result = rt.block_on(async move {
                    let session = start_session(&cli, folder).await?;

                    println!("Press {} to capture. Ctrl+C to stop.", combo);
                    println!("{}", CONSOLE_HELP);

                    let stdin = BufReader::new(tokio::io::stdin());
                    run_watch_loop(&session, presses, stdin, async {
                        let _ = stop_rx.await;
                    })
                    .await;
                    Ok::<_, anyhow::Error>(ExitCode::SUCCESS)
                });
                // A pending stdin read holds a blocking thread until the next line
                rt.shutdown_background();
                result
            });
            request_exit(&proxy);
            result
        })
        .context("Failed to start the runtime thread")?;

    let loop_result = event_loop.run_app(&mut HotkeyLoop);
    let _ = stop_tx.send(());

    let result = worker
        .join()
        .map_err(|_| anyhow!("Watch runtime thread panicked"))?;
    drop(hotkey);

    loop_result.context("Event loop failed")?;
    result
}

/// Dispatches hotkey presses and console commands until told to stop
///
/// Stops on `q`, Ctrl+C or when `stop` resolves, then waits for running
/// actions. Closed `input` leaves the hotkey as the only trigger.
async fn run_watch_loop<R, S>(
    session: &Session,
    mut presses: mpsc::Receiver<()>,
    input: R,
    stop: S,
) where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    tokio::pin!(stop);

    let mut lines = input.lines();
    let mut input_open = true;
    let mut ctrl_c_armed = true;
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            signal = &mut ctrl_c, if ctrl_c_armed => match signal {
                Ok(()) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(e) => {
                    tracing::warn!("Ctrl+C handler unavailable: {}", e);
                    ctrl_c_armed = false;
                }
            },
            () = &mut stop => {
                tracing::info!("Event loop closed");
                break;
            }
            Some(()) = presses.recv() => session.spawn(&mut tasks, UserAction::Capture),
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match ConsoleCommand::parse(&line) {
                    Some(ConsoleCommand::Action(action)) => session.spawn(&mut tasks, action),
                    Some(ConsoleCommand::Help) => println!("{}", CONSOLE_HELP),
                    Some(ConsoleCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => println!("Unknown command '{}'. {}", line.trim(), CONSOLE_HELP),
                },
                Ok(None) => {
                    tracing::debug!("stdin closed; hotkey only");
                    input_open = false;
                }
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {}", e);
                    input_open = false;
                }
            },
        }
    }

    if !tasks.is_empty() {
        tracing::info!("Waiting for {} running action(s)", tasks.len());
        while tasks.join_next().await.is_some() {}
    }
}

async fn list_monitors(json: bool) -> Result<ExitCode> {
    let backend = create_default_backend()?;
    let monitors = backend.list_monitors().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&monitors)?);
        return Ok(ExitCode::SUCCESS);
    }

    for (index, monitor) in monitors.iter().enumerate() {
        println!(
            "{index}: {} {} scale {}{}",
            monitor.name,
            monitor.region,
            monitor.scale_factor,
            if monitor.is_primary { " (primary)" } else { "" }
        );
    }
    Ok(ExitCode::SUCCESS)
}
