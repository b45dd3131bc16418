//! Expander backed by `embedded-hal` output pins
//!
//! For boards where the expander lines are already exposed as [`OutputPin`]s, e.g. through a
//! port-expander driver crate.  Each line is registered with the `(chip, pin)` address it stands
//! for.
use embedded_hal::digital::{Error as _, OutputPin};

use crate::{Direction, ExpanderError, ExpanderPin, GpioExpander, Level};

/// Upper bound for registered lines: three 16-line chips.
pub const MAX_LINES: usize = 48;

struct Line<P> {
    pin: ExpanderPin,
    output: P,
    requested: bool,
}

pub struct HalExpander<P> {
    lines: heapless::Vec<Line<P>, MAX_LINES>,
}

impl<P: OutputPin> HalExpander<P> {
    pub fn new() -> Self {
        Self {
            lines: heapless::Vec::new(),
        }
    }

    /// Register `output` as the line for `pin`.
    pub fn with_line(mut self, pin: ExpanderPin, output: P) -> Result<Self, ExpanderError> {
        self.add_line(pin, output)?;
        Ok(self)
    }

    pub fn add_line(&mut self, pin: ExpanderPin, output: P) -> Result<(), ExpanderError> {
        if !pin.is_valid() {
            return Err(ExpanderError::InvalidPin { pin });
        }
        if self.lines.iter().any(|l| l.pin == pin) {
            return Err(ExpanderError::Busy { pin });
        }
        let line = Line {
            pin,
            output,
            requested: false,
        };
        self.lines
            .push(line)
            .map_err(|_| ExpanderError::TableFull { pin })
    }
}

impl<P: OutputPin> Default for HalExpander<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> GpioExpander for HalExpander<P> {
    type Handle = usize;

    fn request(&mut self, pin: ExpanderPin) -> Result<usize, ExpanderError> {
        if !pin.is_valid() {
            return Err(ExpanderError::InvalidPin { pin });
        }
        let index = self
            .lines
            .iter()
            .position(|l| l.pin == pin)
            .ok_or(ExpanderError::Unmapped { pin })?;
        let line = &mut self.lines[index];
        if line.requested {
            return Err(ExpanderError::Busy { pin });
        }
        line.requested = true;
        Ok(index)
    }

    /// Registered lines are outputs already, so switching to output leaves their level alone.
    fn set_direction(
        &mut self,
        handle: &mut usize,
        dir: Direction,
        _state: Level,
    ) -> Result<(), ExpanderError> {
        match dir {
            Direction::Output => Ok(()),
            Direction::Input => Err(ExpanderError::Unsupported {
                pin: self.lines[*handle].pin,
                dir,
            }),
        }
    }

    fn output(&mut self, handle: &mut usize, level: Level) -> Result<(), ExpanderError> {
        let line = &mut self.lines[*handle];
        line.output
            .set_state(level.into())
            .map_err(|e| ExpanderError::Digital {
                pin: line.pin,
                kind: e.kind(),
            })
    }

    fn release(&mut self, handle: usize) -> Result<(), ExpanderError> {
        self.lines[handle].requested = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_mock::eh1::digital as mock_pin;

    use crate::{ClaimedPins, ExpanderError, ExpanderPin, GpioExpander, Level, MuxCtrl, Signal};

    #[test]
    fn routes_through_output_pins() {
        let mut lines: Vec<(Signal, mock_pin::Mock)> = Vec::new();
        for signal in Signal::ALL {
            let expectations = match signal {
                // debug console at startup
                Signal::Uart2Select => vec![mock_pin::Transaction::set(mock_pin::State::Low)],
                Signal::Uart2Enable => vec![mock_pin::Transaction::set(mock_pin::State::Low)],
                // iot0-uart1-on
                Signal::Uart1Select => vec![mock_pin::Transaction::set(mock_pin::State::High)],
                Signal::Uart1Enable => vec![mock_pin::Transaction::set(mock_pin::State::Low)],
                _ => vec![],
            };
            lines.push((signal, mock_pin::Mock::new(&expectations)));
        }

        let mut expander = super::HalExpander::new();
        for (signal, pin) in &lines {
            expander.add_line(signal.pin(), pin.clone()).unwrap();
        }

        let mut ctrl = MuxCtrl::start(ClaimedPins::new(expander)).unwrap();
        ctrl.iot0_uart1_on().unwrap();

        for (_, mut pin) in lines {
            pin.done();
        }
    }

    #[test]
    fn request_rules() {
        let mut pin = mock_pin::Mock::new(&[]);
        let mut expander = super::HalExpander::new()
            .with_line(ExpanderPin::new(1, 9), pin.clone())
            .unwrap();

        assert!(matches!(
            expander.request(ExpanderPin::new(1, 16)),
            Err(ExpanderError::InvalidPin { .. })
        ));
        assert!(matches!(
            expander.request(ExpanderPin::new(2, 9)),
            Err(ExpanderError::Unmapped { .. })
        ));

        let mut handle = expander.request(ExpanderPin::new(1, 9)).unwrap();
        assert!(matches!(
            expander.request(ExpanderPin::new(1, 9)),
            Err(ExpanderError::Busy { .. })
        ));
        assert!(matches!(
            expander.set_direction(&mut handle, crate::Direction::Input, Level::Low),
            Err(ExpanderError::Unsupported { .. })
        ));
        expander.release(handle).unwrap();
        expander.request(ExpanderPin::new(1, 9)).unwrap();

        pin.done();
    }

    #[test]
    fn registration_errors() {
        let mut pin = mock_pin::Mock::new(&[]);
        let mut expander = super::HalExpander::new();

        assert!(matches!(
            expander.add_line(ExpanderPin::new(1, 16), pin.clone()),
            Err(ExpanderError::InvalidPin { .. })
        ));
        expander.add_line(ExpanderPin::new(1, 0), pin.clone()).unwrap();
        assert!(matches!(
            expander.add_line(ExpanderPin::new(1, 0), pin.clone()),
            Err(ExpanderError::Busy { .. })
        ));

        for n in 1..super::MAX_LINES {
            let chip = (n / 16) as u8 + 1;
            let line = ExpanderPin::new(chip, (n % 16) as u8);
            expander.add_line(line, pin.clone()).unwrap();
        }
        assert!(matches!(
            expander.add_line(ExpanderPin::new(4, 0), pin.clone()),
            Err(ExpanderError::TableFull { .. })
        ));

        pin.done();
    }
}
