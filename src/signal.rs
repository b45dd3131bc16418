//! Board map of every mux control line on the mangOH board.
//!
//! Each [`Signal`] is wired to a fixed line on one of the GPIO expanders.  Which physical level
//! asserts a signal differs from line to line: the `*_ENn` multiplexer enables are active-low,
//! while select lines have one level per destination.  The [`level`] module names those levels.
use core::fmt;

use crate::{ExpanderPin, Level};

/// Number of GPIO-expander chips on the board.
pub const EXPANDER_COUNT: usize = 3;

/// A mux control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `UART_EXP1_ENn`: UART1 multiplexer enable.
    Uart1Enable,
    /// `UART_EXP1_IN`: UART1 destination select.
    Uart1Select,
    /// `UART_EXP2_ENn`: UART2 multiplexer enable.
    Uart2Enable,
    /// `UART_EXP2_IN`: UART2 destination select.
    Uart2Select,
    /// `SPI_EXP1_ENn`: SPI multiplexer enable.
    SpiEnable,
    /// `SPI_EXP1_IN`: SPI destination select.
    SpiSelect,
    /// `PCM_EXP1_ENn`: PCM multiplexer enable.
    PcmEnable,
    /// `PCM_EXP1_SEL`: PCM destination select.
    PcmSelect,
    /// `PCM_ANALOG_SELECT`: analog audio path select.
    AnalogSelect,
    /// `SDIO_SEL`: SDIO destination select.
    SdioSelect,
    /// `GPIO_IOT0_RESET`
    Slot0Reset,
    /// `GPIO_IOT1_RESET`
    Slot1Reset,
    /// `GPIO_IOT2_RESET`
    Slot2Reset,
}

impl Signal {
    pub const COUNT: usize = 13;

    /// Every controlled signal, in startup configuration order.
    pub const ALL: [Signal; Signal::COUNT] = [
        Signal::Uart1Enable,
        Signal::Uart1Select,
        Signal::Uart2Enable,
        Signal::Uart2Select,
        Signal::SpiEnable,
        Signal::SpiSelect,
        Signal::PcmEnable,
        Signal::PcmSelect,
        Signal::AnalogSelect,
        Signal::SdioSelect,
        Signal::Slot0Reset,
        Signal::Slot1Reset,
        Signal::Slot2Reset,
    ];

    /// Expander line this signal is wired to.
    pub const fn pin(self) -> ExpanderPin {
        match self {
            Signal::SdioSelect => ExpanderPin::new(1, 9),
            Signal::SpiEnable => ExpanderPin::new(1, 10),
            Signal::SpiSelect => ExpanderPin::new(1, 11),
            Signal::AnalogSelect => ExpanderPin::new(1, 12),
            Signal::Uart1Enable => ExpanderPin::new(1, 13),
            Signal::Uart1Select => ExpanderPin::new(1, 14),
            Signal::Uart2Select => ExpanderPin::new(1, 15),
            Signal::Slot2Reset => ExpanderPin::new(3, 1),
            Signal::Slot0Reset => ExpanderPin::new(3, 2),
            Signal::Slot1Reset => ExpanderPin::new(3, 3),
            Signal::Uart2Enable => ExpanderPin::new(3, 12),
            Signal::PcmEnable => ExpanderPin::new(3, 13),
            Signal::PcmSelect => ExpanderPin::new(3, 14),
        }
    }

    /// Net name on the board schematic.
    pub const fn net_name(self) -> &'static str {
        match self {
            Signal::Uart1Enable => "UART_EXP1_ENn",
            Signal::Uart1Select => "UART_EXP1_IN",
            Signal::Uart2Enable => "UART_EXP2_ENn",
            Signal::Uart2Select => "UART_EXP2_IN",
            Signal::SpiEnable => "SPI_EXP1_ENn",
            Signal::SpiSelect => "SPI_EXP1_IN",
            Signal::PcmEnable => "PCM_EXP1_ENn",
            Signal::PcmSelect => "PCM_EXP1_SEL",
            Signal::AnalogSelect => "PCM_ANALOG_SELECT",
            Signal::SdioSelect => "SDIO_SEL",
            Signal::Slot0Reset => "GPIO_IOT0_RESET",
            Signal::Slot1Reset => "GPIO_IOT1_RESET",
            Signal::Slot2Reset => "GPIO_IOT2_RESET",
        }
    }

    /// Level a line is brought up at when its current level cannot be read back.
    ///
    /// Multiplexers stay disabled and IoT slots stay out of reset.
    pub const fn idle_level(self) -> Level {
        match self {
            Signal::Uart1Enable | Signal::Uart2Enable | Signal::SpiEnable | Signal::PcmEnable => {
                level::ENABLE_INACTIVE
            }
            Signal::Uart1Select => level::UART1_SLOT0,
            Signal::Uart2Select => level::UART2_DEBUG,
            Signal::SpiSelect => level::SPI_SLOT0,
            Signal::PcmSelect => level::PCM_SLOT0,
            Signal::AnalogSelect => level::ANALOG_OFF,
            Signal::SdioSelect => level::SDIO_MICROSD,
            Signal::Slot0Reset | Signal::Slot1Reset | Signal::Slot2Reset => level::RESET_RELEASED,
        }
    }

    /// Whether this is the shared enable line of a multiplexer.
    pub const fn is_enable(self) -> bool {
        matches!(
            self,
            Signal::Uart1Enable | Signal::Uart2Enable | Signal::SpiEnable | Signal::PcmEnable
        )
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.net_name())
    }
}

/// Physical levels of each signal's states.
pub mod level {
    use crate::Level;

    /// Multiplexer enable asserted (all `*_ENn` lines).
    pub const ENABLE_ACTIVE: Level = Level::Low;
    /// Multiplexer enable de-asserted (all `*_ENn` lines).
    pub const ENABLE_INACTIVE: Level = Level::High;

    pub const UART1_SLOT0: Level = Level::High;
    pub const UART1_SLOT1: Level = Level::Low;

    pub const SPI_SLOT0: Level = Level::High;
    pub const SPI_SLOT1: Level = Level::Low;

    pub const UART2_SLOT2: Level = Level::High;
    pub const UART2_DEBUG: Level = Level::Low;

    pub const PCM_SLOT0: Level = Level::Low;
    /// PCM routed to the onboard codec.
    pub const PCM_CODEC: Level = Level::High;

    /// Analog audio through the onboard codec.
    pub const ANALOG_ON: Level = Level::High;
    /// Analog audio through the module's own codec.
    pub const ANALOG_OFF: Level = Level::Low;

    pub const SDIO_MICROSD: Level = Level::High;
    pub const SDIO_SLOT0: Level = Level::Low;

    /// IoT slot reset lines are active-low.
    pub const RESET_RELEASED: Level = Level::High;
}
