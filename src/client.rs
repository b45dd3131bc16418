//! Interactive mux control client.
//!
//! Reads one menu number per line and runs the matching routing intent on a [`MuxControl`]
//! service.  Menu numbers map to commands only through the [`MENU`] table.
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::Mode;
use crate::{Intent, MuxControl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Run(Intent),
}

/// Menu numbers of the interactive client.
pub const MENU: [(u32, Command); 21] = [
    (0, Command::Exit),
    (1, Command::Help),
    (2, Command::Run(Intent::AllUart1Off)),
    (3, Command::Run(Intent::Iot0Uart1On)),
    (4, Command::Run(Intent::Iot1Uart1On)),
    (5, Command::Run(Intent::AllSpiOff)),
    (6, Command::Run(Intent::Iot0SpiOn)),
    (7, Command::Run(Intent::Iot1SpiOn)),
    (8, Command::Run(Intent::AllUart2Off)),
    (9, Command::Run(Intent::Iot2Uart2On)),
    (10, Command::Run(Intent::Uart2DebugOn)),
    (11, Command::Run(Intent::PcmOff)),
    (12, Command::Run(Intent::PcmIot0On)),
    (13, Command::Run(Intent::PcmCodecOn)),
    (14, Command::Run(Intent::SdioSelMicroSd)),
    (15, Command::Run(Intent::SdioSelIot0)),
    (16, Command::Run(Intent::OnboardCodecSel)),
    (17, Command::Run(Intent::ModuleCodecSel)),
    (18, Command::Run(Intent::Iot1ResetRelease)),
    (19, Command::Run(Intent::Iot0ResetRelease)),
    (20, Command::Run(Intent::Iot2ResetRelease)),
];

pub fn command(number: u32) -> Option<Command> {
    MENU.iter().find(|(n, _)| *n == number).map(|(_, c)| *c)
}

/// Menu number of `intent`, if it has one.
pub fn number_of(intent: Intent) -> Option<u32> {
    MENU.iter()
        .find(|(_, c)| *c == Command::Run(intent))
        .map(|(n, _)| *n)
}

const HELP_HEADER: &str = "\
NAME:
    mux - mangOH GPIO Mux Control tool

SYNOPSIS:
    mux help
    mux [cmd number]
    mux --intent <name>
    \tExample: TI IoT Bluetooth module: IoT0 UART1 On, cmd:3
    \tExample: IoT Dust Network module: IoT1 UART1 On, cmd:4
    \tExample: IoT Dust Network module: IoT2 UART2 On, cmd:9
    \tExample: IoT module SPI loopback: IoT1 SPI On, cmd:7
    \tExample: IoT MCP2515 CAN bus module: IoT1 SPI On, cmd:7
    \tExample: IoT MCP2515 CAN bus module: IoT1 out of reset, cmd:18

DESCRIPTION:
    mux help
      - Print this help message and exit
";

/// Print the static help text.
pub fn write_help<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    out.write_all(HELP_HEADER.as_bytes())?;
    for (number, cmd) in MENU {
        let label = match cmd {
            Command::Exit => "exit this tool",
            Command::Help => "tool command list",
            Command::Run(intent) => intent.name(),
        };
        writeln!(out, "    {:<4}{}", format!("{number}."), label)?;
    }

    writeln!(out)?;
    writeln!(out, "    Without menu number, run with --intent <name>:")?;
    for intent in Intent::ALL.iter().filter(|i| number_of(**i).is_none()) {
        writeln!(out, "        {intent}")?;
    }
    writeln!(out)
}

/// What a single menu command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Exit,
    Help,
    Unsupported,
    Done(Intent),
    Failed(Intent),
}

impl Outcome {
    /// Process exit code of a one-shot command that ended with this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Failed(_) => 1,
            _ => 0,
        }
    }
}

pub struct Client<S, R, W> {
    service: S,
    input: R,
    output: W,
}

impl<S: MuxControl, R: BufRead, W: Write> Client<S, R, W> {
    pub fn new(service: S, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Serve `mode` and return the process exit code.
    ///
    /// Interactive sessions always end with 0; a single command exits with 1 when its intent
    /// failed.
    pub fn serve(&mut self, mode: Mode) -> io::Result<i32> {
        let outcome = match mode {
            Mode::Help => {
                write_help(&mut self.output)?;
                Outcome::Help
            }
            Mode::Interactive => {
                self.run()?;
                Outcome::Exit
            }
            Mode::Menu(number) => self.dispatch(number)?,
            Mode::Intent(intent) => self.run_intent(intent)?,
        };
        Ok(outcome.exit_code())
    }

    /// Read and dispatch menu numbers until exit is selected or the input ends.
    ///
    /// Input that is not valid UTF-8 is an unsupported command like any other garbage.
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = Vec::new();
        loop {
            write!(self.output, "\nEnter the number for Mux Control function: \n")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                debug!("end of input");
                return Ok(());
            }
            let text = String::from_utf8_lossy(&line);
            let entry = text.trim();
            if entry.is_empty() {
                continue;
            }

            let outcome = match entry.parse::<u32>() {
                Ok(number) => self.dispatch(number)?,
                Err(_) => self.unsupported()?,
            };
            if outcome == Outcome::Exit {
                return Ok(());
            }
        }
    }

    /// Execute one menu command.
    pub fn dispatch(&mut self, number: u32) -> io::Result<Outcome> {
        match command(number) {
            Some(Command::Exit) => {
                writeln!(self.output, "Exit mux control tool")?;
                Ok(Outcome::Exit)
            }
            Some(Command::Help) => {
                writeln!(self.output, "Tool command list")?;
                write_help(&mut self.output)?;
                Ok(Outcome::Help)
            }
            Some(Command::Run(intent)) => {
                writeln!(self.output, "{number}: {intent}")?;
                self.run_intent(intent)
            }
            None => self.unsupported(),
        }
    }

    /// Run `intent` and print its result.
    pub fn run_intent(&mut self, intent: Intent) -> io::Result<Outcome> {
        match self.service.invoke(intent) {
            Ok(()) => {
                writeln!(self.output, "{intent}: OK")?;
                Ok(Outcome::Done(intent))
            }
            Err(e) => {
                writeln!(self.output, "{intent}: FAILED ({})", crate::report(&e))?;
                Ok(Outcome::Failed(intent))
            }
        }
    }

    fn unsupported(&mut self) -> io::Result<Outcome> {
        writeln!(self.output, "Non supported mux control command!\n")?;
        write_help(&mut self.output)?;
        Ok(Outcome::Unsupported)
    }
}
