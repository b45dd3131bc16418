use tracing::{debug, warn};

use crate::{Direction, ExpanderError, GpioExpander, Level, Phase, PinError, Signal};

/// Access to the lines behind each [`Signal`].
///
/// A bank is first asked to `configure()` every signal it will drive; afterwards `drive()` writes
/// a level to a signal's line.
pub trait PinBank {
    /// Prepare the line of `signal` as a digital output.
    fn configure(&mut self, signal: Signal) -> Result<(), PinError>;

    /// Drive the line of `signal` to `level`.
    fn drive(&mut self, signal: Signal, level: Level) -> Result<(), PinError>;
}

/// Last known state of a claimed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinState {
    pub direction: Direction,
    /// `None` until the line was first written.
    pub level: Option<Level>,
}

struct Claimed<H> {
    signal: Signal,
    handle: H,
    state: PinState,
}

/// Lines claimed once and held for the lifetime of the bank.
///
/// `configure()` requests the line and switches it to output; the handle is then kept in an owned
/// table and looked up by signal on every write.
pub struct ClaimedPins<E: GpioExpander> {
    expander: E,
    lines: heapless::Vec<Claimed<E::Handle>, { Signal::COUNT }>,
}

impl<E: GpioExpander> ClaimedPins<E> {
    pub fn new(expander: E) -> Self {
        Self {
            expander,
            lines: heapless::Vec::new(),
        }
    }

    pub fn expander(&self) -> &E {
        &self.expander
    }

    pub fn expander_mut(&mut self) -> &mut E {
        &mut self.expander
    }

    pub fn is_claimed(&self, signal: Signal) -> bool {
        self.lines.iter().any(|l| l.signal == signal)
    }

    pub fn state(&self, signal: Signal) -> Option<PinState> {
        self.lines
            .iter()
            .find(|l| l.signal == signal)
            .map(|l| l.state)
    }

    /// Release every claimed line and hand back the expander.
    pub fn release(mut self) -> Result<E, PinError> {
        while let Some(line) = self.lines.pop() {
            self.expander
                .release(line.handle)
                .map_err(|source| PinError {
                    signal: line.signal,
                    phase: Phase::Release,
                    source,
                })?;
        }
        Ok(self.expander)
    }
}

impl<E: GpioExpander> PinBank for ClaimedPins<E> {
    fn configure(&mut self, signal: Signal) -> Result<(), PinError> {
        let pin = signal.pin();
        if self.is_claimed(signal) {
            return Err(PinError {
                signal,
                phase: Phase::Request,
                source: ExpanderError::Busy { pin },
            });
        }

        let mut handle = self.expander.request(pin).map_err(|source| PinError {
            signal,
            phase: Phase::Request,
            source,
        })?;

        if let Err(source) = into_output(&mut self.expander, signal, &mut handle, None) {
            if let Err(e) = self.expander.release(handle) {
                warn!(%signal, error = %e, "failed to release unconfigured line");
            }
            return Err(PinError {
                signal,
                phase: Phase::Configure,
                source,
            });
        }

        debug!(%signal, %pin, "claimed as output");
        let claimed = Claimed {
            signal,
            handle,
            state: PinState {
                direction: Direction::Output,
                level: None,
            },
        };
        if self.lines.push(claimed).is_err() {
            unreachable!("more lines claimed than signals exist");
        }
        Ok(())
    }

    fn drive(&mut self, signal: Signal, level: Level) -> Result<(), PinError> {
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.signal == signal)
            .ok_or(PinError {
                signal,
                phase: Phase::Request,
                source: ExpanderError::Unmapped { pin: signal.pin() },
            })?;

        self.expander
            .output(&mut line.handle, level)
            .map_err(|source| PinError {
                signal,
                phase: Phase::Write,
                source,
            })?;
        line.state.level = Some(level);
        Ok(())
    }
}

/// Lines leased from the expander for the duration of a single write.
///
/// Every `drive()` requests the line, switches it to output directly at the requested level,
/// writes the level, and releases it again.
pub struct LeasedPins<E> {
    expander: E,
}

impl<E: GpioExpander> LeasedPins<E> {
    pub fn new(expander: E) -> Self {
        Self { expander }
    }

    pub fn expander(&self) -> &E {
        &self.expander
    }

    pub fn expander_mut(&mut self) -> &mut E {
        &mut self.expander
    }

    pub fn into_inner(self) -> E {
        self.expander
    }

    /// Request the line of `signal` and make it an output at `target`, or at its current level.
    fn lease(&mut self, signal: Signal, target: Option<Level>) -> Result<E::Handle, PinError> {
        let mut handle = self
            .expander
            .request(signal.pin())
            .map_err(|source| PinError {
                signal,
                phase: Phase::Request,
                source,
            })?;
        match into_output(&mut self.expander, signal, &mut handle, target) {
            Ok(_) => Ok(handle),
            Err(source) => {
                self.give_back(signal, handle);
                Err(PinError {
                    signal,
                    phase: Phase::Configure,
                    source,
                })
            }
        }
    }

    fn give_back(&mut self, signal: Signal, handle: E::Handle) {
        if let Err(e) = self.expander.release(handle) {
            warn!(%signal, error = %e, "failed to release leased line");
        }
    }
}

impl<E: GpioExpander> PinBank for LeasedPins<E> {
    fn configure(&mut self, signal: Signal) -> Result<(), PinError> {
        let handle = self.lease(signal, None)?;
        self.expander.release(handle).map_err(|source| PinError {
            signal,
            phase: Phase::Release,
            source,
        })
    }

    fn drive(&mut self, signal: Signal, level: Level) -> Result<(), PinError> {
        let mut handle = self.lease(signal, Some(level))?;
        let written = self.expander.output(&mut handle, level);
        if let Err(source) = written {
            self.give_back(signal, handle);
            return Err(PinError {
                signal,
                phase: Phase::Write,
                source,
            });
        }
        self.expander.release(handle).map_err(|source| PinError {
            signal,
            phase: Phase::Release,
            source,
        })
    }
}

/// Switch a requested line to output.
///
/// The line comes up at `target` if given, otherwise at the level it is currently at, so
/// configuring never moves a line.  Lines that cannot be read back start at their idle level.
fn into_output<E: GpioExpander>(
    expander: &mut E,
    signal: Signal,
    handle: &mut E::Handle,
    target: Option<Level>,
) -> Result<Level, ExpanderError> {
    let state = match target {
        Some(level) => level,
        None => expander.get(handle)?.unwrap_or(signal.idle_level()),
    };
    expander.set_direction(handle, Direction::Output, state)?;
    Ok(state)
}
