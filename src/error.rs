//! Error types for mux control.

use core::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::{Direction, ExpanderPin, Intent, Signal};

/// Errors reported by a GPIO-expander backend.
#[derive(Error, Debug)]
pub enum ExpanderError {
    /// The expander chip is not present or not known to the backend
    #[error("expander chip {chip} is not available")]
    ChipUnavailable { chip: u8 },

    /// The pin index does not exist on the chip
    #[error("{pin} is not a valid expander line")]
    InvalidPin { pin: ExpanderPin },

    /// The backend has no line wired for this pin
    #[error("no output line is mapped to {pin}")]
    Unmapped { pin: ExpanderPin },

    /// The pin is already requested
    #[error("{pin} is already requested")]
    Busy { pin: ExpanderPin },

    /// The backend has no room left to register another line
    #[error("no room left to register {pin}")]
    TableFull { pin: ExpanderPin },

    /// The line cannot be switched to this direction
    #[error("{pin} cannot be configured as {dir}")]
    Unsupported { pin: ExpanderPin, dir: Direction },

    /// Access to a sysfs attribute failed
    #[error("sysfs access to {} failed", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An embedded-hal output pin reported an error
    #[error("digital I/O error on {pin}: {kind:?}")]
    Digital {
        pin: ExpanderPin,
        kind: embedded_hal::digital::ErrorKind,
    },
}

/// Part of a pin operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Request,
    Configure,
    Write,
    Release,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Request => f.write_str("request"),
            Phase::Configure => f.write_str("output configuration"),
            Phase::Write => f.write_str("write"),
            Phase::Release => f.write_str("release"),
        }
    }
}

/// A single operation on a signal's line failed.
#[derive(Error, Debug)]
#[error("{phase} of {signal} ({pin}) failed", pin = .signal.pin())]
pub struct PinError {
    pub signal: Signal,
    pub phase: Phase,
    #[source]
    pub source: ExpanderError,
}

/// A routing intent was aborted.
///
/// Steps before `step` were applied and stay applied.
#[derive(Error, Debug)]
#[error("{intent} aborted at step {step} of {total}")]
pub struct MuxError {
    pub intent: Intent,
    /// 1-based index of the failing step.
    pub step: usize,
    pub total: usize,
    #[source]
    pub source: PinError,
}

/// Initialization of the routing service failed.
#[derive(Error, Debug)]
pub enum StartupError {
    /// A control line could not be set up as an output
    #[error("failed to configure {} as output", .0.signal)]
    Configure(#[source] PinError),

    /// The initial debug console routing failed
    #[error("initial debug console routing failed")]
    DebugConsole(#[source] MuxError),
}

/// Connecting to the routing service failed.
#[derive(Error, Debug)]
#[error("can't connect to service; is {service} running? (gave up after {timeout:?})")]
pub struct ConnectError {
    pub service: &'static str,
    pub timeout: Duration,
    #[source]
    pub last: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Render an error together with its chain of sources, separated by `": "`.
pub fn report(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}
