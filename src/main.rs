//! Nivasa - rolling capture buffer that keeps your most recent snaps.
//!
//! Provides both human-friendly and agent-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use console::style;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Instrument, debug, info_span, warn};

use nivasa::camera::{Camera, SyntheticCamera};
use nivasa::cli::{self, Cli, Commands};
use nivasa::config::{self, LoadedConfig};
use nivasa::error::{NivasaError, Result, ResultExt};
use nivasa::gallery::DisplayOrder;
use nivasa::logging::init_logging;
use nivasa::output::{Output, OutputMode};
use nivasa::session::{CaptureOutcome, CaptureSession, PendingCapture};
use nivasa::share::{ManifestShare, ShareTarget};
use nivasa::storage::resolve_output_location;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> Option<&'static str> {
        option_env!("VERGEN_GIT_SHA")
    }

    pub fn build_timestamp() -> Option<&'static str> {
        option_env!("VERGEN_BUILD_TIMESTAMP")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let mode = OutputMode::from_cli(&cli);
    init_logging(mode.is_robot(), cli.verbose, cli.quiet);

    let output = mode.into_output();

    if let Err(e) = run(&cli, output.as_ref()).await {
        output.error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, output: &dyn Output) -> Result<()> {
    match &cli.command {
        None => print_quick_start(cli),
        Some(Commands::Capture(args)) => cmd_capture(cli, args, output).await,
        Some(Commands::Session(args)) => cmd_session(cli, args, output).await,
        Some(Commands::Where) => cmd_where(cli, output),
        Some(Commands::Init(args)) => cmd_init(cli, args, output),
        Some(Commands::Config(args)) => cmd_config(cli, args, output),
        Some(Commands::Version) => cmd_version(output),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Quick Start (Robot Mode Optimized) ===

/// Prints quick-start help optimized for both humans and AI agents.
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        print_robot_quick_start()
    } else {
        print_human_quick_start();
        Ok(())
    }
}

fn print_robot_quick_start() -> Result<()> {
    let help = RobotQuickStart {
        tool: "nivasa",
        version: build_info::VERSION,
        description: "Rolling capture buffer keeping the most recent snaps, with robot mode for AI agents",
        capture: RobotCapture {
            single: "nivasa capture --robot",
            burst: "nivasa capture --count <N> --robot",
            share: "nivasa capture --share-dir <DIR> --robot",
            interactive: "nivasa session --robot",
        },
        storage: RobotStorage {
            location: "nivasa where --robot",
            config: "nivasa config --robot",
            init: "nivasa init",
        },
        session_commands: &["capture", "gallery", "share", "help", "quit"],
        output_modes: OutputModes {
            human: "--format=text (default)",
            robot: "--robot or --format=json",
            compact: "--format=json-compact",
        },
    };

    let json =
        serde_json::to_string_pretty(&help).with_context(|| "Failed to serialize quick start")?;
    println!("{json}");
    Ok(())
}

fn print_human_quick_start() {
    println!(
        "{} {} - rolling capture buffer\n",
        style("nivasa").bold().cyan(),
        build_info::VERSION
    );

    println!("{}", style("QUICK START").bold().underlined());
    println!();
    println!("  {}  Take a photo", style("nivasa capture").green());
    println!("  {}  Fill the gallery", style("nivasa capture -n 4").green());
    println!(
        "  {}  Capture and share",
        style("nivasa capture --share-dir DIR").green()
    );
    println!("  {}  Interactive session", style("nivasa session").green());
    println!("  {}  Storage location", style("nivasa where").green());
    println!();

    println!("{}", style("ROBOT MODE (for AI agents)").bold().underlined());
    println!();
    println!("  {}  JSON output", style("nivasa --robot <command>").cyan());
    println!("  {}  Quick-start JSON", style("nivasa --robot").cyan());
    println!();

    println!("Run {} for full help", style("nivasa --help").yellow());
}

// === Robot Mode JSON Structures ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    capture: RobotCapture,
    storage: RobotStorage,
    session_commands: &'static [&'static str],
    output_modes: OutputModes,
}

#[derive(Serialize)]
struct RobotCapture {
    single: &'static str,
    burst: &'static str,
    share: &'static str,
    interactive: &'static str,
}

#[derive(Serialize)]
struct RobotStorage {
    location: &'static str,
    config: &'static str,
    init: &'static str,
}

#[derive(Serialize)]
struct OutputModes {
    human: &'static str,
    robot: &'static str,
    compact: &'static str,
}

// === Command Implementations ===

fn open_session(cli: &Cli) -> Result<(CaptureSession<SyntheticCamera>, DisplayOrder)> {
    let loaded = config::load_config(cli.config.as_deref())?;
    let camera = Arc::new(SyntheticCamera::new(&loaded.config.camera));
    let session = CaptureSession::from_config(camera, &loaded.config)?;
    let order = cli.order.unwrap_or(loaded.config.gallery.display_order);
    Ok((session, order))
}

/// Report a capture result; only non-capture errors are returned.
fn report_capture<C: Camera + ?Sized>(
    session: &CaptureSession<C>,
    result: Result<nivasa::snap::SnapReference>,
    output: &dyn Output,
) -> Result<()> {
    match result {
        Ok(snap) => {
            output.snap_captured(&snap, &session.view());
            Ok(())
        }
        Err(e @ (NivasaError::CaptureFailed { .. } | NivasaError::CameraUnavailable(_))) => {
            output.capture_failed(&e, &session.view());
            Ok(())
        }
        Err(NivasaError::CaptureInProgress) => {
            output.capture_ignored();
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn share_gallery<C: Camera + ?Sized>(
    session: &CaptureSession<C>,
    dir: Option<&Path>,
    output: &dyn Output,
) -> Result<()> {
    let request = session.share_request()?;
    let receipt = match dir {
        Some(dir) => Some(ManifestShare::new(dir).share(&request)?),
        None => None,
    };
    output.share_prepared(&request, receipt.as_ref());
    Ok(())
}

async fn cmd_capture(cli: &Cli, args: &cli::CaptureArgs, output: &dyn Output) -> Result<()> {
    let (mut session, order) = open_session(cli)?;
    let span = info_span!("session", id = %session.id());

    async {
        for n in 1..=args.count {
            debug!(n, total = args.count, "Capturing");
            let result = session.capture().await;
            report_capture(&session, result, output)?;
        }

        if !cli.quiet {
            output.newline();
        }
        output.gallery(&session.view(), order);

        if let Some(dir) = &args.share_dir {
            share_gallery(&session, Some(dir), output)?;
        }
        Ok::<_, NivasaError>(())
    }
    .instrument(span)
    .await
}

/// Wait for the in-flight capture, or forever when there is none.
async fn wait_pending(pending: &mut Option<PendingCapture>) -> CaptureOutcome {
    match pending {
        Some(capture) => capture.await,
        None => std::future::pending().await,
    }
}

fn print_session_help(output: &dyn Output) {
    output.info("Commands: capture (c), gallery (g), share (s), help (h), quit (q)");
}

async fn cmd_session(cli: &Cli, args: &cli::SessionArgs, output: &dyn Output) -> Result<()> {
    let (mut session, order) = open_session(cli)?;
    let span = info_span!("session", id = %session.id());

    async {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut gallery_rx = session.subscribe();
        let mut pending: Option<PendingCapture> = None;

        if !cli.quiet {
            print_session_help(output);
        }
        output.gallery(&session.view(), order);

        loop {
            tokio::select! {
                outcome = wait_pending(&mut pending) => {
                    pending = None;
                    let result = session.finish_capture(outcome);
                    report_capture(&session, result, output)?;
                }
                Ok(()) = gallery_rx.changed() => {
                    let view = gallery_rx.borrow_and_update().clone();
                    output.gallery(&view, order);
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin closed");
                        break;
                    };
                    match line.trim() {
                        "" => {}
                        "capture" | "c" => match session.begin_capture() {
                            Ok(capture) => {
                                debug!(path = %capture.target().display(), "Capture started");
                                pending = Some(capture);
                            }
                            Err(e) => report_capture(&session, Err(e), output)?,
                        },
                        "gallery" | "g" => output.gallery(&session.view(), order),
                        "share" | "s" => match share_gallery(&session, args.share_dir.as_deref(), output) {
                            Err(e @ NivasaError::NothingToShare) => output.error(&e),
                            other => other?,
                        },
                        "help" | "h" | "?" => print_session_help(output),
                        "quit" | "q" | "exit" => break,
                        other => {
                            warn!(command = other, "Unknown session command");
                            output.warning(&format!("Unknown command '{other}', try 'help'"));
                        }
                    }
                }
            }
        }

        // Let an in-flight capture land before leaving.
        if let Some(capture) = pending.take() {
            let outcome = capture.await;
            let result = session.finish_capture(outcome);
            report_capture(&session, result, output)?;
            output.gallery(&session.view(), order);
        }
        Ok::<_, NivasaError>(())
    }
    .instrument(span)
    .await
}

fn cmd_where(cli: &Cli, output: &dyn Output) -> Result<()> {
    let loaded = config::load_config(cli.config.as_deref())?;
    output.location(&resolve_output_location(&loaded.config.storage));
    Ok(())
}

fn cmd_init(cli: &Cli, args: &cli::InitArgs, output: &dyn Output) -> Result<()> {
    let (path, _source) = config::locate_config(cli.config.as_deref())?;
    config::write_default_config(&path, args.force)?;
    output.config_written(&path);
    Ok(())
}

fn cmd_config(cli: &Cli, args: &cli::ConfigArgs, output: &dyn Output) -> Result<()> {
    let loaded: LoadedConfig = config::load_config(cli.config.as_deref())?;
    output.config(&loaded, args.path);
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(output: &dyn Output) -> Result<()> {
    output.version_info(
        build_info::VERSION,
        build_info::git_sha(),
        build_info::build_timestamp(),
    );
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "nivasa", &mut io::stdout());
    Ok(())
}
