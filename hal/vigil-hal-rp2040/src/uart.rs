//! UART line settings
//!
//! RP2040 has two UART peripherals (UART0 and UART1). Telemetry uses UART0
//! on GPIO0 (TX) / GPIO1 (RX).

use embassy_rp::uart;
use vigil_hal::uart::{DataBits, Parity, StopBits, UartConfig};

/// Line settings the RP2040 UART cannot produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnsupportedSetting {
    /// The PL011 frames carry at most 8 data bits
    NineDataBits,
}

/// Translate shared line settings into the embassy-rp driver config
pub fn driver_config(config: &UartConfig) -> Result<uart::Config, UnsupportedSetting> {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
        DataBits::Nine => return Err(UnsupportedSetting::NineDataBits),
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    Ok(out)
}
