//! Host binary (§6 CLI & JSON-RPC surface): argument parsing, logging
//! bring-up, the real terminal host loop, and the line-delimited JSON-RPC
//! harness used for headless/scripted driving.
//!
//! Grounded on `ox-bin::main`'s `Args`/`AppStartup` shape — a `clap` derive
//! struct, a logging-configuration step that keeps a `WorkerGuard` alive for
//! the process lifetime, and a thin run loop around a long-lived terminal
//! handle — generalized to this workspace's `loki-session::Session` facade
//! and its two transports (interactive terminal, JSON-RPC) instead of the
//! teacher's single hard-wired terminal path.

mod json_rpc;
mod terminal_renderer;

use std::io::stdout;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use loki_config::{load_from, Config};
use loki_input::source::{EventSource, ReadOutcome, TerminalEventSource};
use loki_render::render_frame;
use loki_session::{viewport_config_context, Session};
use loki_terminal::TerminalHost;

use crate::terminal_renderer::TerminalRenderer;

const LOG_DIR: &str = ".";
const LOG_FILE_PREFIX: &str = "loki";

/// A modal kilo-lineage source-code editor.
#[derive(Debug, Parser)]
#[command(name = "loki", version, about = "A modal kilo-lineage source-code editor.")]
struct Args {
    /// File to open on startup.
    path: Option<PathBuf>,

    /// Config file to load instead of the discovered default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force line numbers on regardless of the config file.
    #[arg(long = "line-numbers")]
    line_numbers: bool,

    /// Force word wrap on regardless of the config file.
    #[arg(long = "word-wrap")]
    word_wrap: bool,

    /// Speak line-delimited JSON-RPC on stdin/stdout instead of driving a
    /// real terminal; keeps running until a `quit` command or EOF.
    #[arg(long = "json-rpc")]
    json_rpc: bool,

    /// Like `--json-rpc`, but exit after the first command.
    #[arg(long = "json-rpc-single")]
    json_rpc_single: bool,

    /// Headless viewport row count, used with `--json-rpc*` where there is
    /// no real terminal to query a size from.
    #[arg(long)]
    rows: Option<usize>,

    /// Headless viewport column count.
    #[arg(long)]
    cols: Option<usize>,

    /// Serve the editor over a browser instead of the terminal.
    #[arg(long)]
    web: bool,

    /// Port for `--web`.
    #[arg(long = "web-port")]
    web_port: Option<u16>,

    /// Static asset root for `--web`.
    #[arg(long = "web-root")]
    web_root: Option<PathBuf>,
}

const DEFAULT_HEADLESS_ROWS: usize = 24;
const DEFAULT_HEADLESS_COLS: usize = 80;

fn main() -> ExitCode {
    let args = Args::parse();
    let _log_guard = configure_logging();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("loki: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Mirrors `ox-bin::AppStartup::configure_logging`: a rolling-never file
/// appender feeding a non-blocking writer, so raw-mode terminal sessions
/// never get tracing output interleaved with the alternate screen. Falls
/// back to a silently dropped guard if a global subscriber is already
/// installed (e.g. under a test harness).
fn configure_logging() -> Option<WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(LOG_DIR, format!("{LOG_FILE_PREFIX}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let result = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).with_writer(non_blocking).try_init();
    match result {
        Ok(()) => Some(guard),
        Err(_err) => None,
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = load_from(args.config.clone())?;
    if args.line_numbers {
        config.file.display.line_numbers = true;
    }
    if args.word_wrap {
        config.file.display.word_wrap = true;
    }
    Ok(config)
}

fn run(args: Args) -> Result<()> {
    if args.web {
        anyhow::bail!(
            "--web is not implemented in this build (port {:?}, root {:?}): no wire protocol is \
             specified for it, and this workspace carries no web-serving crate to invent one against",
            args.web_port,
            args.web_root,
        );
    }

    let config = load_config(&args)?;

    if args.json_rpc || args.json_rpc_single {
        let rows = args.rows.unwrap_or(DEFAULT_HEADLESS_ROWS);
        let cols = args.cols.unwrap_or(DEFAULT_HEADLESS_COLS);
        let session = Session::new(config, args.path.clone(), rows, cols).context("failed to start editor session")?;
        return json_rpc::run(session, args.json_rpc_single);
    }

    run_interactive(args, config)
}

fn run_interactive(args: Args, config: Config) -> Result<()> {
    let mut host = TerminalHost::acquire().context("failed to acquire the terminal")?;
    host.set_title("loki").ok();
    let (cols, rows) = host.window_size().unwrap_or((DEFAULT_HEADLESS_COLS as u16, DEFAULT_HEADLESS_ROWS as u16));

    let mut session = Session::new(config, args.path.clone(), rows as usize, cols as usize).context("failed to start editor session")?;
    session.apply_viewport_context(viewport_config_context(rows, cols, host.capabilities.supports_scroll_region));

    host.enter().context("failed to enter raw mode / alternate screen")?;
    let result = drive(&mut session, &mut host);
    let _ = host.leave();
    result
}

fn drive(session: &mut Session, host: &mut TerminalHost) -> Result<()> {
    let mut source = TerminalEventSource::new();
    let mut renderer = TerminalRenderer::new();
    let mut out = stdout();

    render_frame(&mut renderer, &session.snapshot());
    renderer.flush(&mut out)?;

    loop {
        if host.resize.take() {
            let (cols, rows) = host.window_size().unwrap_or((DEFAULT_HEADLESS_COLS as u16, DEFAULT_HEADLESS_ROWS as u16));
            session.resize(rows as usize, cols as usize);
            session.apply_viewport_context(viewport_config_context(rows, cols, host.capabilities.supports_scroll_region));
        }

        match source.read(200)? {
            ReadOutcome::Timeout => continue,
            ReadOutcome::Event(event) => {
                if let loki_events::Event::Resize { .. } = &event {
                    host.resize.mark();
                }
                let outcome = session.handle_event(event);
                if let Some(err) = &outcome.error {
                    tracing::warn!(target: "session", error = %err, "action failed");
                }
                if let Some(text) = &outcome.clipboard {
                    if let Err(err) = renderer.clipboard_copy(text) {
                        tracing::warn!(target: "session", error = %err, "clipboard copy failed");
                    }
                }
                render_frame(&mut renderer, &session.snapshot());
                renderer.flush(&mut out)?;
                if outcome.quit {
                    return Ok(());
                }
            }
        }
    }
}
