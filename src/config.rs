//! Command line configuration of the `mux` tool.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::dev::sysfs::{ChipBase, DEFAULT_CHIP_BASES, SYSFS_GPIO_ROOT};
use crate::Intent;

/// Longest accepted `--connect-timeout`, in seconds.
pub const MAX_CONNECT_TIMEOUT: u64 = 24 * 60 * 60;

/// mangOH GPIO mux control tool
#[derive(Parser, Debug)]
#[command(name = "mux")]
#[command(version)]
#[command(about = "Route UART, SPI, PCM, SDIO and reset lines of the mangOH IoT slots")]
pub struct Args {
    /// `help` to print the command list, or a menu number to run once and exit.
    /// Without it, the interactive menu is started.
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Run a single routing intent by name and exit.
    #[arg(long, value_name = "NAME", conflicts_with = "command")]
    pub intent: Option<Intent>,

    /// sysfs GPIO class directory.
    #[arg(long, value_name = "DIR", default_value = SYSFS_GPIO_ROOT)]
    pub sysfs_root: PathBuf,

    /// First GPIO number of an expander chip, as CHIP=BASE. May be repeated.
    #[arg(long = "chip-base", value_name = "CHIP=BASE")]
    pub chip_bases: Vec<ChipBase>,

    /// Request and release lines around every write instead of claiming them at startup.
    #[arg(long)]
    pub lease_per_call: bool,

    /// Seconds to wait for the GPIO service before giving up.
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 20,
        value_parser = clap::value_parser!(u64).range(0..=MAX_CONNECT_TIMEOUT)
    )]
    pub connect_timeout: u64,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    pub verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    pub json: bool,
}

/// What the tool was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the help text; no hardware access.
    Help,
    Interactive,
    /// Run one menu number.
    Menu(u32),
    Intent(Intent),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` is neither `help` nor a menu number")]
    Command(String),
}

/// Line ownership model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Claimed,
    Leased,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub sysfs_root: PathBuf,
    pub chip_bases: Vec<ChipBase>,
    pub ownership: Ownership,
    pub connect_timeout: Duration,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mode = match (&args.command, args.intent) {
            (_, Some(intent)) => Mode::Intent(intent),
            (None, None) => Mode::Interactive,
            (Some(cmd), None) if cmd.eq_ignore_ascii_case("help") => Mode::Help,
            (Some(cmd), None) => cmd
                .trim()
                .parse()
                .map(Mode::Menu)
                .map_err(|_| ConfigError::Command(cmd.clone()))?,
        };

        // command line entries override the defaults chip by chip
        let mut chip_bases = DEFAULT_CHIP_BASES.to_vec();
        chip_bases.extend_from_slice(&args.chip_bases);

        let ownership = if args.lease_per_call {
            Ownership::Leased
        } else {
            Ownership::Claimed
        };

        Ok(Config {
            mode,
            sysfs_root: args.sysfs_root.clone(),
            chip_bases,
            ownership,
            connect_timeout: Duration::from_secs(args.connect_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(argv: &[&str]) -> Config {
        let argv = std::iter::once("mux").chain(argv.iter().copied());
        let args = Args::try_parse_from(argv).unwrap();
        Config::from_args(&args).unwrap()
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.mode, Mode::Interactive);
        assert_eq!(cfg.sysfs_root, PathBuf::from("/sys/class/gpio"));
        assert_eq!(cfg.chip_bases, DEFAULT_CHIP_BASES.to_vec());
        assert_eq!(cfg.ownership, Ownership::Claimed);
        assert_eq!(cfg.connect_timeout, Duration::from_secs(20));
    }

    #[test]
    fn modes() {
        assert_eq!(config(&["help"]).mode, Mode::Help);
        assert_eq!(config(&["7"]).mode, Mode::Menu(7));
        assert_eq!(config(&["99"]).mode, Mode::Menu(99));
        assert_eq!(
            config(&["--intent", "audio-disable"]).mode,
            Mode::Intent(Intent::AudioDisable)
        );

        let args = Args::try_parse_from(["mux", "uart"]).unwrap();
        assert_eq!(
            Config::from_args(&args).unwrap_err(),
            ConfigError::Command("uart".into())
        );
        assert!(Args::try_parse_from(["mux", "--intent", "uart9-on"]).is_err());
        assert!(Args::try_parse_from(["mux", "3", "--intent", "pcm-off"]).is_err());
    }

    #[test]
    fn hardware_options() {
        let cfg = config(&[
            "--chip-base",
            "3=200",
            "--lease-per-call",
            "--connect-timeout",
            "5",
            "--sysfs-root",
            "/tmp/gpio",
        ]);
        assert_eq!(cfg.chip_bases.last(), Some(&ChipBase::new(3, 200)));
        assert_eq!(cfg.ownership, Ownership::Leased);
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
        assert_eq!(cfg.sysfs_root, PathBuf::from("/tmp/gpio"));
        assert!(Args::try_parse_from(["mux", "--chip-base", "9=1"]).is_err());
        assert!(Args::try_parse_from(["mux", "--chip-base", "1=4294967295"]).is_err());
        assert!(Args::try_parse_from(["mux", "--connect-timeout", "86401"]).is_err());
        assert!(
            Args::try_parse_from(["mux", "--connect-timeout", "18446744073709551615"]).is_err()
        );
        assert_eq!(
            config(&["--connect-timeout", "0"]).connect_timeout,
            Duration::ZERO
        );
    }
}
