//! The mux control service.
use tracing::{error, info};

use crate::{Intent, MuxError, PinBank, Signal, StartupError};

/// Name under which the service is announced to clients.
pub const SERVICE_NAME: &str = "muxCtrlService";

/// Interface clients use to run routing intents.
pub trait MuxControl {
    fn invoke(&mut self, intent: Intent) -> Result<(), MuxError>;
}

/// Routing service over a bank of control lines.
pub struct MuxCtrl<B> {
    pins: B,
}

impl<B: PinBank> MuxCtrl<B> {
    /// Wrap an already configured pin bank.
    pub fn new(pins: B) -> Self {
        Self { pins }
    }

    /// Configure every control line as output, then route UART2 to the debug console.
    ///
    /// Fails on the first line that cannot be configured; no intent is run in that case.
    pub fn start(mut pins: B) -> Result<Self, StartupError> {
        for signal in Signal::ALL {
            pins.configure(signal).map_err(|e| {
                error!(%signal, error = %e, "control line configuration failed");
                StartupError::Configure(e)
            })?;
        }
        info!(lines = Signal::COUNT, "control lines configured");

        let mut ctrl = Self { pins };
        ctrl.uart2_debug_on().map_err(StartupError::DebugConsole)?;
        Ok(ctrl)
    }

    pub fn pins(&self) -> &B {
        &self.pins
    }

    pub fn pins_mut(&mut self) -> &mut B {
        &mut self.pins
    }

    pub fn into_pins(self) -> B {
        self.pins
    }

    pub fn run(&mut self, intent: Intent) -> Result<(), MuxError> {
        crate::apply(&mut self.pins, intent)
    }

    /// Disconnect UART1 from all IoT slots.
    pub fn iot_all_uart1_off(&mut self) -> Result<(), MuxError> {
        self.run(Intent::AllUart1Off)
    }

    /// Route UART1 to IoT slot 0.
    pub fn iot0_uart1_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot0Uart1On)
    }

    /// Route UART1 to IoT slot 1.
    pub fn iot1_uart1_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot1Uart1On)
    }

    /// Disconnect SPI from all IoT slots.
    pub fn iot_all_spi_off(&mut self) -> Result<(), MuxError> {
        self.run(Intent::AllSpiOff)
    }

    pub fn iot0_spi_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot0SpiOn)
    }

    pub fn iot1_spi_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot1SpiOn)
    }

    pub fn iot_all_uart2_off(&mut self) -> Result<(), MuxError> {
        self.run(Intent::AllUart2Off)
    }

    pub fn iot2_uart2_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot2Uart2On)
    }

    /// Route UART2 to the debug console.
    pub fn uart2_debug_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Uart2DebugOn)
    }

    pub fn pcm_off(&mut self) -> Result<(), MuxError> {
        self.run(Intent::PcmOff)
    }

    pub fn pcm_iot0_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::PcmIot0On)
    }

    pub fn pcm_codec_on(&mut self) -> Result<(), MuxError> {
        self.run(Intent::PcmCodecOn)
    }

    pub fn audio_disable(&mut self) -> Result<(), MuxError> {
        self.run(Intent::AudioDisable)
    }

    pub fn audio_select_iot0_codec(&mut self) -> Result<(), MuxError> {
        self.run(Intent::AudioSelectIot0Codec)
    }

    pub fn audio_select_onboard_codec(&mut self) -> Result<(), MuxError> {
        self.run(Intent::AudioSelectOnboardCodec)
    }

    /// Route SDIO to the microSD card slot.
    pub fn sdio_sel_microsd(&mut self) -> Result<(), MuxError> {
        self.run(Intent::SdioSelMicroSd)
    }

    /// Route SDIO to IoT slot 0.
    pub fn sdio_sel_iot0(&mut self) -> Result<(), MuxError> {
        self.run(Intent::SdioSelIot0)
    }

    pub fn onboard_codec_sel(&mut self) -> Result<(), MuxError> {
        self.run(Intent::OnboardCodecSel)
    }

    pub fn module_codec_sel(&mut self) -> Result<(), MuxError> {
        self.run(Intent::ModuleCodecSel)
    }

    /// Take the card in IoT slot 0 out of reset.
    pub fn iot0_reset_release(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot0ResetRelease)
    }

    pub fn iot1_reset_release(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot1ResetRelease)
    }

    pub fn iot2_reset_release(&mut self) -> Result<(), MuxError> {
        self.run(Intent::Iot2ResetRelease)
    }
}

impl<B: PinBank> MuxControl for MuxCtrl<B> {
    fn invoke(&mut self, intent: Intent) -> Result<(), MuxError> {
        self.run(intent)
    }
}
