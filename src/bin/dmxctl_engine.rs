//! Real-time DMX engine.
//!
//! Reads protocol lines from stdin and writes 513-byte frames to a character
//! device. Usage: `dmxctl-engine <DEVICE> [--refresh-ms N] [--read-window-ms N]
//! [--report-device-faults]`

use std::{
    path::PathBuf,
    process,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use dmxctl::engine::{open_device, Engine, EngineConfig, LineReader, RawInput};

#[derive(Parser, Debug)]
#[command(name = "dmxctl-engine")]
#[command(about = "Drive a DMX512 universe from protocol lines on stdin")]
struct Args {
    /// Character device of the DMX transmitter
    device: PathBuf,

    /// Longest time between two frames when nothing changes
    #[arg(long = "refresh-ms", default_value_t = 20)]
    refresh_ms: u64,

    /// How long each loop iteration waits for input
    #[arg(long = "read-window-ms", default_value_t = 5)]
    read_window_ms: u64,

    /// Stop on device I/O errors instead of ignoring them
    #[arg(long = "report-device-faults")]
    report_device_faults: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Ask for SIGTERM when the controlling process goes away.
#[cfg(target_os = "linux")]
fn terminate_with_parent() {
    // SAFETY: prctl with PR_SET_PDEATHSIG only takes integer arguments.
    if unsafe { libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) } != 0 {
        warn!(
            "could not register for parent death: {}",
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn terminate_with_parent() {}

static STOP: AtomicBool = AtomicBool::new(false);

extern "C" fn request_stop(_signal: libc::c_int) {
    STOP.store(true, Ordering::SeqCst);
}

/// Turn SIGTERM, SIGINT and SIGHUP into a clean return from the engine loop,
/// so stdin gets its terminal settings back.
fn stop_on_signals() {
    for signal in [libc::SIGTERM, libc::SIGINT, libc::SIGHUP] {
        let handler = request_stop as extern "C" fn(libc::c_int) as libc::sighandler_t;
        // SAFETY: the handler only stores to an atomic.
        if unsafe { libc::signal(signal, handler) } == libc::SIG_ERR {
            warn!(
                "could not handle signal {signal}: {}",
                std::io::Error::last_os_error()
            );
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    stop_on_signals();
    terminate_with_parent();

    let config = EngineConfig::default()
        .with_refresh(Duration::from_millis(args.refresh_ms))
        .with_read_window(Duration::from_millis(args.read_window_ms))
        .with_suppress_device_faults(!args.report_device_faults);

    let device = open_device(&args.device)?;
    let input = RawInput::stdin().context("could not set up stdin")?;
    let eof_is_closed = !input.is_tty();
    let mut reader = LineReader::new(input, config.read_window(), eof_is_closed);

    info!("writing frames to {}", args.device.display());
    let mut engine = Engine::new(device, config);
    engine.run(&mut reader, &STOP, |input, echo| {
        if let Err(e) = input.set_echo(echo) {
            warn!("could not switch echo: {e}");
        }
    })?;
    Ok(())
}

fn main() {
    init_logging();

    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{e:#}");
        process::exit(1);
    }
}
