use core::fmt;

/// Number of I/O lines on each expander chip of the board.
pub const LINES_PER_CHIP: u8 = 16;

/// Interface to a GPIO-expander driver.
///
/// This is the collaborator every routing operation is executed against.  A pin is requested by
/// its `(chip, pin)` address, which yields a handle; the handle is then configured, driven, and
/// finally released again.  Implementations must not change the level of a pin on `request()` or
/// `release()`.
pub trait GpioExpander {
    /// Handle to a requested pin.
    type Handle;

    /// Request exclusive use of `pin`.
    ///
    /// Fails if the expander chip is not available or the pin does not exist on it.
    fn request(&mut self, pin: ExpanderPin) -> Result<Self::Handle, crate::ExpanderError>;

    /// Switch the direction of a requested pin.
    ///
    /// When the pin becomes an output it must come up at `state` right away, without passing
    /// through the other level.  `state` is ignored for inputs.
    fn set_direction(
        &mut self,
        handle: &mut Self::Handle,
        dir: Direction,
        state: Level,
    ) -> Result<(), crate::ExpanderError>;

    /// Read back the level a requested pin is currently at.
    ///
    /// Backends that cannot read their lines return `None`.
    fn get(
        &mut self,
        handle: &mut Self::Handle,
    ) -> Result<Option<Level>, crate::ExpanderError> {
        let _ = handle;
        Ok(None)
    }

    /// Drive a requested output pin to `level`.
    fn output(&mut self, handle: &mut Self::Handle, level: Level) -> Result<(), crate::ExpanderError>;

    /// Give a requested pin back to the driver.
    fn release(&mut self, handle: Self::Handle) -> Result<(), crate::ExpanderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

/// Physical logic level of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for embedded_hal::digital::PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => embedded_hal::digital::PinState::Low,
            Level::High => embedded_hal::digital::PinState::High,
        }
    }
}

impl core::ops::Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => f.write_str("LOW"),
            Level::High => f.write_str("HIGH"),
        }
    }
}

/// Address of one line on one expander chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpanderPin {
    pub chip: u8,
    pub pin: u8,
}

impl ExpanderPin {
    pub const fn new(chip: u8, pin: u8) -> Self {
        Self { chip, pin }
    }

    /// Whether `pin` exists on a 16-line expander.
    pub fn is_valid(&self) -> bool {
        self.pin < LINES_PER_CHIP
    }
}

impl fmt::Display for ExpanderPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exp{}.io{}", self.chip, self.pin)
    }
}
