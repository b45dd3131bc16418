//! Signal-routing ("mux") control for the mangOH IoT expansion board.
//!
//! The board routes its UART, SPI, PCM audio, SDIO and IoT-slot reset lines through
//! multiplexers whose enable and select inputs hang off GPIO expanders.  Every routing operation
//! ([`Intent`]) is a short, ordered sequence of pin writes executed by [`apply`] against a
//! [`PinBank`], which in turn drives a [`GpioExpander`] backend.

pub mod client;
mod common;
pub mod config;
mod connect;
pub mod dev;
mod error;
mod intent;
mod pin;
mod sequence;
mod service;
pub mod signal;

pub use common::{Direction, ExpanderPin, GpioExpander, Level, LINES_PER_CHIP};
pub use connect::{connect, CONNECT_TIMEOUT, RETRY_INTERVAL};
pub use error::{
    report, ConnectError, ExpanderError, MuxError, Phase, PinError, StartupError,
};
pub use intent::{Intent, ParseIntentError, Step};
pub use pin::{ClaimedPins, LeasedPins, PinBank, PinState};
pub use sequence::apply;
pub use service::{MuxControl, MuxCtrl, SERVICE_NAME};
pub use signal::Signal;

pub use dev::hal::HalExpander;
pub use dev::sysfs::SysfsExpander;
