//! Structured logging initialization for the Nivasa CLI.
//!
//! Logs always go to stderr so stdout stays reserved for command output
//! (JSON documents in robot mode).

use std::io::{self, IsTerminal};

use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// JSON lines with the current span (session id) attached.
    Json,
    /// Colored, for interactive terminals.
    Pretty,
    /// Compact and uncolored, for pipes and files.
    Plain,
}

impl LogStyle {
    /// Robot mode always logs JSON; otherwise follow stderr's TTY status.
    pub fn detect(robot_mode: bool) -> Self {
        Self::select(robot_mode, io::stderr().is_terminal())
    }

    const fn select(robot_mode: bool, stderr_is_tty: bool) -> Self {
        match (robot_mode, stderr_is_tty) {
            (true, _) => Self::Json,
            (false, true) => Self::Pretty,
            (false, false) => Self::Plain,
        }
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr);

        match self {
            Self::Json => base
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_span_list(false)
                .boxed(),
            Self::Pretty => base.with_target(false).boxed(),
            Self::Plain => base.with_ansi(false).with_target(false).compact().boxed(),
        }
    }
}

/// Pick the default filter directive for the given verbosity flags.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "nivasa=error",
        (false, 0) => "nivasa=info",
        (false, 1) => "nivasa=debug",
        (false, _) => "nivasa=trace",
    }
}

/// Initialize the tracing subscriber based on CLI flags and environment.
///
/// `RUST_LOG` (e.g. `nivasa=debug,image=warn`) replaces the directive
/// derived from `-v`/`-q` entirely.
///
/// | Mode | TTY | Output |
/// |------|-----|--------|
/// | Robot | any | JSON lines to stderr |
/// | Human | yes | Colored output to stderr |
/// | Human | no | Compact plain output to stderr |
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::registry()
        .with(LogStyle::detect(robot_mode).layer())
        .with(filter)
        .init();
}
