//! In-memory expander that records every successful operation, with fault injection.
use crate::{Direction, ExpanderError, ExpanderPin, GpioExpander, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Request(ExpanderPin),
    Direction(ExpanderPin, Direction, Level),
    Output(ExpanderPin, Level),
    Release(ExpanderPin),
}

#[derive(Default)]
pub struct RecordingExpander {
    events: Vec<Event>,
    output_attempts: usize,
    fail_output_at: Option<usize>,
    fail_request_of: Option<ExpanderPin>,
    fail_direction_of: Option<ExpanderPin>,
    /// Levels that can be read back, per line.
    levels: Vec<(ExpanderPin, Level)>,
}

impl RecordingExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests for `pin` fail as if its chip was missing.
    pub fn fail_request_of(mut self, pin: ExpanderPin) -> Self {
        self.fail_request_of = Some(pin);
        self
    }

    /// `pin` reads back as `level` until it is driven.
    pub fn with_level(mut self, pin: ExpanderPin, level: Level) -> Self {
        self.set_level(pin, level);
        self
    }

    fn set_level(&mut self, pin: ExpanderPin, level: Level) {
        self.levels.retain(|(p, _)| *p != pin);
        self.levels.push((pin, level));
    }

    /// Configuring `pin` as output fails.
    pub fn fail_direction_of(mut self, pin: ExpanderPin) -> Self {
        self.fail_direction_of = Some(pin);
        self
    }

    /// Let the next `n` output writes succeed and fail the one after.
    pub fn fail_output_after(&mut self, n: usize) {
        self.fail_output_at = Some(self.output_attempts + n + 1);
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Every attempted output write, failed ones included.
    pub fn output_attempts(&self) -> usize {
        self.output_attempts
    }

    /// Successful output writes, in order.
    pub fn outputs(&self) -> Vec<(ExpanderPin, Level)> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                Event::Output(pin, level) => Some((pin, level)),
                _ => None,
            })
            .collect()
    }
}

impl GpioExpander for RecordingExpander {
    type Handle = ExpanderPin;

    fn request(&mut self, pin: ExpanderPin) -> Result<ExpanderPin, ExpanderError> {
        if self.fail_request_of == Some(pin) {
            return Err(ExpanderError::ChipUnavailable { chip: pin.chip });
        }
        self.events.push(Event::Request(pin));
        Ok(pin)
    }

    fn set_direction(
        &mut self,
        pin: &mut ExpanderPin,
        dir: Direction,
        state: Level,
    ) -> Result<(), ExpanderError> {
        if self.fail_direction_of == Some(*pin) {
            return Err(ExpanderError::Unsupported { pin: *pin, dir });
        }
        self.events.push(Event::Direction(*pin, dir, state));
        if dir == Direction::Output {
            self.set_level(*pin, state);
        }
        Ok(())
    }

    fn get(&mut self, pin: &mut ExpanderPin) -> Result<Option<Level>, ExpanderError> {
        Ok(self
            .levels
            .iter()
            .find(|(p, _)| *p == *pin)
            .map(|(_, level)| *level))
    }

    fn output(&mut self, pin: &mut ExpanderPin, level: Level) -> Result<(), ExpanderError> {
        self.output_attempts += 1;
        if self.fail_output_at == Some(self.output_attempts) {
            return Err(ExpanderError::Digital {
                pin: *pin,
                kind: embedded_hal::digital::ErrorKind::Other,
            });
        }
        self.events.push(Event::Output(*pin, level));
        self.set_level(*pin, level);
        Ok(())
    }

    fn release(&mut self, pin: ExpanderPin) -> Result<(), ExpanderError> {
        self.events.push(Event::Release(pin));
        Ok(())
    }
}
