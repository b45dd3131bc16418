//! Expander lines exported through the Linux `/sys/class/gpio` interface
//!
//! The kernel driver registers every expander chip as a gpiochip; line `n` of a chip is then the
//! global GPIO number `base + n`.
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, trace};

use crate::signal::EXPANDER_COUNT;
use crate::{Direction, ExpanderError, ExpanderPin, GpioExpander, Level, LINES_PER_CHIP};

/// Default sysfs GPIO class directory.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// First global GPIO number of an expander chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipBase {
    pub chip: u8,
    pub base: u32,
}

impl ChipBase {
    pub const fn new(chip: u8, base: u32) -> Self {
        Self { chip, base }
    }
}

/// Chip bases the gpiochips of the three expanders get on the mangOH board.
pub const DEFAULT_CHIP_BASES: [ChipBase; EXPANDER_COUNT] = [
    ChipBase::new(1, 496),
    ChipBase::new(2, 480),
    ChipBase::new(3, 464),
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseChipBaseError {
    #[error("expected CHIP=BASE, got `{0}`")]
    Syntax(String),
    #[error("expander chip must be within 1..={max}, got {0}", max = EXPANDER_COUNT)]
    Chip(u8),
    #[error("base {0} leaves no room for the lines of a chip")]
    Base(u32),
}

impl FromStr for ChipBase {
    type Err = ParseChipBaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || ParseChipBaseError::Syntax(s.to_owned());
        let (chip, base) = s.split_once('=').ok_or_else(syntax)?;
        let chip: u8 = chip.trim().parse().map_err(|_| syntax())?;
        let base: u32 = base.trim().parse().map_err(|_| syntax())?;
        if chip == 0 || usize::from(chip) > EXPANDER_COUNT {
            return Err(ParseChipBaseError::Chip(chip));
        }
        if base.checked_add(u32::from(LINES_PER_CHIP - 1)).is_none() {
            return Err(ParseChipBaseError::Base(base));
        }
        Ok(ChipBase { chip, base })
    }
}

/// A requested sysfs line.
#[derive(Debug)]
pub struct SysfsLine {
    pin: ExpanderPin,
    number: u32,
    dir: PathBuf,
    /// Exported by this request, and so unexported again on release.
    exported: bool,
}

pub struct SysfsExpander {
    root: PathBuf,
    bases: heapless::Vec<ChipBase, EXPANDER_COUNT>,
}

impl SysfsExpander {
    /// Open the sysfs GPIO interface at `root`.
    ///
    /// Fails while the interface is not available, i.e. the `export` attribute is missing.
    pub fn open(root: impl Into<PathBuf>, bases: &[ChipBase]) -> Result<Self, ExpanderError> {
        let root = root.into();
        let export = root.join("export");
        fs::metadata(&export).map_err(|source| ExpanderError::Io {
            path: export,
            source,
        })?;

        let mut table: heapless::Vec<ChipBase, EXPANDER_COUNT> = heapless::Vec::new();
        for base in bases {
            // a later entry for the same chip overrides an earlier one
            table.retain(|b| b.chip != base.chip);
            if table.push(*base).is_err() {
                return Err(ExpanderError::ChipUnavailable { chip: base.chip });
            }
        }
        debug!(root = %root.display(), chips = table.len(), "sysfs gpio opened");
        Ok(Self { root, bases: table })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn base_of(&self, chip: u8) -> Option<u32> {
        self.bases.iter().find(|b| b.chip == chip).map(|b| b.base)
    }

    fn write_attr(&self, path: PathBuf, value: &str) -> Result<(), ExpanderError> {
        trace!(path = %path.display(), value, "sysfs write");
        fs::write(&path, value).map_err(|source| ExpanderError::Io { path, source })
    }
}

impl GpioExpander for SysfsExpander {
    type Handle = SysfsLine;

    fn request(&mut self, pin: ExpanderPin) -> Result<SysfsLine, ExpanderError> {
        if !pin.is_valid() {
            return Err(ExpanderError::InvalidPin { pin });
        }
        let base = self
            .base_of(pin.chip)
            .ok_or(ExpanderError::ChipUnavailable { chip: pin.chip })?;
        if !self.root.join(format!("gpiochip{base}")).is_dir() {
            return Err(ExpanderError::ChipUnavailable { chip: pin.chip });
        }

        let number = base
            .checked_add(u32::from(pin.pin))
            .ok_or(ExpanderError::InvalidPin { pin })?;
        let dir = self.root.join(format!("gpio{number}"));
        let exported = !dir.is_dir();
        if exported {
            self.write_attr(self.root.join("export"), &number.to_string())?;
        }
        Ok(SysfsLine {
            pin,
            number,
            dir,
            exported,
        })
    }

    /// `high` and `low` switch the line to output at that level in one step; a plain `out` would
    /// drive it LOW first.
    fn set_direction(
        &mut self,
        line: &mut SysfsLine,
        dir: Direction,
        state: Level,
    ) -> Result<(), ExpanderError> {
        let value = match (dir, state) {
            (Direction::Input, _) => "in",
            (Direction::Output, Level::High) => "high",
            (Direction::Output, Level::Low) => "low",
        };
        debug!(pin = %line.pin, gpio = line.number, %dir, %state, "set direction");
        self.write_attr(line.dir.join("direction"), value)
    }

    fn get(&mut self, line: &mut SysfsLine) -> Result<Option<Level>, ExpanderError> {
        let path = line.dir.join("value");
        let value = fs::read_to_string(&path).map_err(|source| ExpanderError::Io { path, source })?;
        match value.trim() {
            "0" => Ok(Some(Level::Low)),
            "1" => Ok(Some(Level::High)),
            other => {
                debug!(pin = %line.pin, value = other, "unreadable line level");
                Ok(None)
            }
        }
    }

    fn output(&mut self, line: &mut SysfsLine, level: Level) -> Result<(), ExpanderError> {
        let value = if level.is_high() { "1" } else { "0" };
        self.write_attr(line.dir.join("value"), value)
    }

    fn release(&mut self, line: SysfsLine) -> Result<(), ExpanderError> {
        if !line.exported {
            return Ok(());
        }
        self.write_attr(self.root.join("unexport"), &line.number.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fake sysfs tree with chips 1 and 3 present and line exp1.io9 already exported at LOW.
    fn fake_sysfs() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        for file in ["export", "unexport"] {
            fs::write(root.path().join(file), "").unwrap();
        }
        for chip in ["gpiochip496", "gpiochip464", "gpio505"] {
            fs::create_dir(root.path().join(chip)).unwrap();
        }
        fs::write(root.path().join("gpio505/value"), "0\n").unwrap();
        root
    }

    fn read(root: &Path, attr: &str) -> String {
        fs::read_to_string(root.join(attr)).unwrap()
    }

    #[test]
    fn parse_chip_base() {
        assert_eq!("1=496".parse::<ChipBase>(), Ok(ChipBase::new(1, 496)));
        assert_eq!(" 3 = 100".parse::<ChipBase>(), Ok(ChipBase::new(3, 100)));
        assert_eq!(
            "4=100".parse::<ChipBase>(),
            Err(ParseChipBaseError::Chip(4))
        );
        assert!(matches!(
            "1:496".parse::<ChipBase>(),
            Err(ParseChipBaseError::Syntax(_))
        ));
        assert_eq!(
            format!("1={}", u32::MAX).parse::<ChipBase>(),
            Err(ParseChipBaseError::Base(u32::MAX))
        );
        assert_eq!(
            format!("2={}", u32::MAX - 15).parse::<ChipBase>(),
            Ok(ChipBase::new(2, u32::MAX - 15))
        );
    }

    #[test]
    fn open_requires_export() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            SysfsExpander::open(root.path(), &DEFAULT_CHIP_BASES),
            Err(ExpanderError::Io { .. })
        ));
    }

    #[test]
    fn drives_an_exported_line() {
        let root = fake_sysfs();
        let mut exp = SysfsExpander::open(root.path(), &DEFAULT_CHIP_BASES).unwrap();

        let mut line = exp.request(ExpanderPin::new(1, 9)).unwrap();
        assert_eq!(exp.get(&mut line).unwrap(), Some(Level::Low));
        exp.set_direction(&mut line, Direction::Output, Level::High)
            .unwrap();
        assert_eq!(read(root.path(), "gpio505/direction"), "high");
        exp.output(&mut line, Level::High).unwrap();
        assert_eq!(read(root.path(), "gpio505/value"), "1");
        // already exported, nothing written
        assert_eq!(read(root.path(), "export"), "");

        exp.output(&mut line, Level::Low).unwrap();
        assert_eq!(read(root.path(), "gpio505/value"), "0");
        assert_eq!(exp.get(&mut line).unwrap(), Some(Level::Low));

        exp.set_direction(&mut line, Direction::Output, Level::Low)
            .unwrap();
        assert_eq!(read(root.path(), "gpio505/direction"), "low");
        exp.set_direction(&mut line, Direction::Input, Level::Low)
            .unwrap();
        assert_eq!(read(root.path(), "gpio505/direction"), "in");
    }

    #[test]
    fn release_leaves_foreign_exports_alone() {
        let root = fake_sysfs();
        let mut exp = SysfsExpander::open(root.path(), &DEFAULT_CHIP_BASES).unwrap();

        let line = exp.request(ExpanderPin::new(1, 9)).unwrap();
        exp.release(line).unwrap();
        assert_eq!(read(root.path(), "unexport"), "");

        let line = exp.request(ExpanderPin::new(3, 13)).unwrap();
        assert_eq!(read(root.path(), "export"), "477");
        exp.release(line).unwrap();
        assert_eq!(read(root.path(), "unexport"), "477");
    }

    #[test]
    fn missing_chip_is_unavailable() {
        let root = fake_sysfs();
        let mut exp = SysfsExpander::open(root.path(), &DEFAULT_CHIP_BASES).unwrap();
        assert!(matches!(
            exp.request(ExpanderPin::new(2, 0)),
            Err(ExpanderError::ChipUnavailable { chip: 2 })
        ));

        let mut exp = SysfsExpander::open(root.path(), &[ChipBase::new(1, 496)]).unwrap();
        assert!(matches!(
            exp.request(ExpanderPin::new(3, 1)),
            Err(ExpanderError::ChipUnavailable { chip: 3 })
        ));
        assert!(matches!(
            exp.request(ExpanderPin::new(1, 16)),
            Err(ExpanderError::InvalidPin { .. })
        ));
    }

    #[test]
    fn line_number_past_u32_is_invalid() {
        let root = fake_sysfs();
        fs::create_dir(root.path().join(format!("gpiochip{}", u32::MAX))).unwrap();
        let mut exp = SysfsExpander::open(root.path(), &[ChipBase::new(1, u32::MAX)]).unwrap();

        assert!(matches!(
            exp.request(ExpanderPin::new(1, 13)),
            Err(ExpanderError::InvalidPin { .. })
        ));
        exp.request(ExpanderPin::new(1, 0)).unwrap();
    }

    #[test]
    fn later_base_overrides() {
        let root = fake_sysfs();
        fs::create_dir(root.path().join("gpiochip200")).unwrap();
        let bases = [ChipBase::new(1, 496), ChipBase::new(1, 200)];
        let mut exp = SysfsExpander::open(root.path(), &bases).unwrap();
        exp.request(ExpanderPin::new(1, 2)).unwrap();
        assert_eq!(read(root.path(), "export"), "202");
    }
}
