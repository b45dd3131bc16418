//! Routing intents and the pin writes that implement them.
use core::fmt;
use core::str::FromStr;

use crate::signal::level;
use crate::{Level, Signal};

/// One pin write of a routing intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub signal: Signal,
    pub level: Level,
}

/// A named routing operation.
///
/// UART and SPI intents write the select line before the enable line, so the path never connects
/// to a stale destination.  The "off" intents only de-assert the enable line and leave the select
/// line alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    AllUart1Off,
    Iot0Uart1On,
    Iot1Uart1On,
    AllSpiOff,
    Iot0SpiOn,
    Iot1SpiOn,
    AllUart2Off,
    Iot2Uart2On,
    Uart2DebugOn,
    PcmOff,
    PcmIot0On,
    PcmCodecOn,
    /// Disable PCM and leave analog audio on the module's codec.
    AudioDisable,
    /// Route PCM to IoT slot 0, analog audio to the module's codec.
    AudioSelectIot0Codec,
    /// Route PCM to the onboard codec, analog audio to the module's codec.
    AudioSelectOnboardCodec,
    SdioSelMicroSd,
    SdioSelIot0,
    OnboardCodecSel,
    ModuleCodecSel,
    Iot0ResetRelease,
    Iot1ResetRelease,
    Iot2ResetRelease,
}

impl Intent {
    pub const COUNT: usize = 22;

    pub const ALL: [Intent; Intent::COUNT] = [
        Intent::AllUart1Off,
        Intent::Iot0Uart1On,
        Intent::Iot1Uart1On,
        Intent::AllSpiOff,
        Intent::Iot0SpiOn,
        Intent::Iot1SpiOn,
        Intent::AllUart2Off,
        Intent::Iot2Uart2On,
        Intent::Uart2DebugOn,
        Intent::PcmOff,
        Intent::PcmIot0On,
        Intent::PcmCodecOn,
        Intent::AudioDisable,
        Intent::AudioSelectIot0Codec,
        Intent::AudioSelectOnboardCodec,
        Intent::SdioSelMicroSd,
        Intent::SdioSelIot0,
        Intent::OnboardCodecSel,
        Intent::ModuleCodecSel,
        Intent::Iot0ResetRelease,
        Intent::Iot1ResetRelease,
        Intent::Iot2ResetRelease,
    ];

    /// Ordered pin writes of this intent.
    pub fn steps(self) -> &'static [Step] {
        use Signal::*;

        match self {
            Intent::AllUart1Off => &[Step { signal: Uart1Enable, level: level::ENABLE_INACTIVE }],
            Intent::Iot0Uart1On => &[
                Step { signal: Uart1Select, level: level::UART1_SLOT0 },
                Step { signal: Uart1Enable, level: level::ENABLE_ACTIVE },
            ],
            Intent::Iot1Uart1On => &[
                Step { signal: Uart1Select, level: level::UART1_SLOT1 },
                Step { signal: Uart1Enable, level: level::ENABLE_ACTIVE },
            ],
            Intent::AllSpiOff => &[Step { signal: SpiEnable, level: level::ENABLE_INACTIVE }],
            Intent::Iot0SpiOn => &[
                Step { signal: SpiSelect, level: level::SPI_SLOT0 },
                Step { signal: SpiEnable, level: level::ENABLE_ACTIVE },
            ],
            Intent::Iot1SpiOn => &[
                Step { signal: SpiSelect, level: level::SPI_SLOT1 },
                Step { signal: SpiEnable, level: level::ENABLE_ACTIVE },
            ],
            Intent::AllUart2Off => &[Step { signal: Uart2Enable, level: level::ENABLE_INACTIVE }],
            Intent::Iot2Uart2On => &[
                Step { signal: Uart2Select, level: level::UART2_SLOT2 },
                Step { signal: Uart2Enable, level: level::ENABLE_ACTIVE },
            ],
            Intent::Uart2DebugOn => &[
                Step { signal: Uart2Select, level: level::UART2_DEBUG },
                Step { signal: Uart2Enable, level: level::ENABLE_ACTIVE },
            ],
            Intent::PcmOff => &[Step { signal: PcmEnable, level: level::ENABLE_INACTIVE }],
            // The PCM switch is enabled before its select line is moved.
            Intent::PcmIot0On => &[
                Step { signal: PcmEnable, level: level::ENABLE_ACTIVE },
                Step { signal: PcmSelect, level: level::PCM_SLOT0 },
            ],
            Intent::PcmCodecOn => &[
                Step { signal: PcmEnable, level: level::ENABLE_ACTIVE },
                Step { signal: PcmSelect, level: level::PCM_CODEC },
            ],
            Intent::AudioDisable => &[
                Step { signal: PcmEnable, level: level::ENABLE_INACTIVE },
                Step { signal: AnalogSelect, level: level::ANALOG_OFF },
            ],
            Intent::AudioSelectIot0Codec => &[
                Step { signal: PcmSelect, level: level::PCM_SLOT0 },
                Step { signal: AnalogSelect, level: level::ANALOG_OFF },
                Step { signal: PcmEnable, level: level::ENABLE_ACTIVE },
            ],
            Intent::AudioSelectOnboardCodec => &[
                Step { signal: PcmSelect, level: level::PCM_CODEC },
                Step { signal: AnalogSelect, level: level::ANALOG_OFF },
                Step { signal: PcmEnable, level: level::ENABLE_ACTIVE },
            ],
            Intent::SdioSelMicroSd => &[Step { signal: SdioSelect, level: level::SDIO_MICROSD }],
            Intent::SdioSelIot0 => &[Step { signal: SdioSelect, level: level::SDIO_SLOT0 }],
            Intent::OnboardCodecSel => &[Step { signal: AnalogSelect, level: level::ANALOG_ON }],
            Intent::ModuleCodecSel => &[Step { signal: AnalogSelect, level: level::ANALOG_OFF }],
            Intent::Iot0ResetRelease => &[Step {
                signal: Slot0Reset,
                level: level::RESET_RELEASED,
            }],
            Intent::Iot1ResetRelease => &[Step {
                signal: Slot1Reset,
                level: level::RESET_RELEASED,
            }],
            Intent::Iot2ResetRelease => &[Step {
                signal: Slot2Reset,
                level: level::RESET_RELEASED,
            }],
        }
    }

    /// Stable kebab-case name, as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Intent::AllUart1Off => "all-uart1-off",
            Intent::Iot0Uart1On => "iot0-uart1-on",
            Intent::Iot1Uart1On => "iot1-uart1-on",
            Intent::AllSpiOff => "all-spi-off",
            Intent::Iot0SpiOn => "iot0-spi-on",
            Intent::Iot1SpiOn => "iot1-spi-on",
            Intent::AllUart2Off => "all-uart2-off",
            Intent::Iot2Uart2On => "iot2-uart2-on",
            Intent::Uart2DebugOn => "uart2-debug-on",
            Intent::PcmOff => "pcm-off",
            Intent::PcmIot0On => "pcm-iot0-on",
            Intent::PcmCodecOn => "pcm-codec-on",
            Intent::AudioDisable => "audio-disable",
            Intent::AudioSelectIot0Codec => "audio-select-iot0-codec",
            Intent::AudioSelectOnboardCodec => "audio-select-onboard-codec",
            Intent::SdioSelMicroSd => "sdio-sel-microsd",
            Intent::SdioSelIot0 => "sdio-sel-iot0",
            Intent::OnboardCodecSel => "onboard-codec-sel",
            Intent::ModuleCodecSel => "module-codec-sel",
            Intent::Iot0ResetRelease => "iot0-reset-release",
            Intent::Iot1ResetRelease => "iot1-reset-release",
            Intent::Iot2ResetRelease => "iot2-reset-release",
        }
    }

    /// Whether this intent only de-asserts a multiplexer enable.
    pub fn is_all_off(self) -> bool {
        matches!(
            self,
            Intent::AllUart1Off | Intent::AllSpiOff | Intent::AllUart2Off | Intent::PcmOff
        )
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown routing intent `{0}`")]
pub struct ParseIntentError(pub String);

impl FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|i| i.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseIntentError(s.to_owned()))
    }
}
