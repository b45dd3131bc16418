//! # mux
//!
//! Interactive mangOH GPIO mux control tool.
//!
//! Connects to the expander GPIO lines through sysfs (bounded by `--connect-timeout`), configures
//! every mux control line as output, routes UART2 to the debug console, and then serves routing
//! commands from the numbered menu, a single menu number, or `--intent`.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use mangoh_mux::client::{self, Client};
use mangoh_mux::config::{Args, Config, Mode, Ownership};
use mangoh_mux::{
    connect, report, ClaimedPins, LeasedPins, MuxControl, MuxCtrl, SysfsExpander, RETRY_INTERVAL,
    SERVICE_NAME,
};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("FATAL: {}", report(e.as_ref()));
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<i32, Box<dyn std::error::Error>> {
    let config = Config::from_args(args)?;

    if config.mode == Mode::Help {
        client::write_help(&mut io::stdout().lock())?;
        return Ok(0);
    }
    if config.mode == Mode::Interactive {
        client::write_help(&mut io::stdout().lock())?;
    }

    println!("Connecting to service ...");
    io::stdout().flush()?;
    let expander = connect(
        SERVICE_NAME,
        config.connect_timeout,
        RETRY_INTERVAL,
        || SysfsExpander::open(&config.sysfs_root, &config.chip_bases),
    )?;

    info!(ownership = ?config.ownership, "starting mux control service");
    let code = match config.ownership {
        Ownership::Claimed => serve(MuxCtrl::start(ClaimedPins::new(expander))?, config.mode)?,
        Ownership::Leased => serve(MuxCtrl::start(LeasedPins::new(expander))?, config.mode)?,
    };
    Ok(code)
}

fn serve<S: MuxControl>(service: S, mode: Mode) -> io::Result<i32> {
    let mut client = Client::new(service, io::stdin().lock(), io::stdout());
    client.serve(mode)
}

/// Setup tracing subscriber based on CLI arguments.
///
/// Logs go to stderr; stdout carries the menu.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
