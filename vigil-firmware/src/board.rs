//! Board wiring
//!
//! Raspberry Pi Pico with a 20x4 HD44780 LCD on a PCF8574 backpack:
//!
//! ```text
//! GPIO0  UART0 TX  → telemetry (9600 8N1)
//! GPIO1  UART0 RX  (unused)
//! GPIO4  I2C0 SDA  → LCD backpack
//! GPIO5  I2C0 SCL  → LCD backpack
//! GPIO26 ADC0      ← potentiometer wiper  (A0)
//! GPIO27 ADC1      ← LM35 output          (A1)
//! ```

use vigil_hal::i2c::{address, I2cConfig};
use vigil_hal::uart::UartConfig;
use vigil_hal_rp2040::AdcChannel;

/// ADC input behind logical channel A0
pub const POT_INPUT: AdcChannel = AdcChannel::Adc0;

/// GPIO carrying the potentiometer wiper
pub const POT_GPIO: u8 = 26;

/// ADC input behind logical channel A1
pub const LM35_INPUT: AdcChannel = AdcChannel::Adc1;

/// GPIO carrying the LM35 output
pub const LM35_GPIO: u8 = 27;

// The pin numbers must be the ones the ADC inputs are bonded to
const _: () = assert!(matches!(POT_INPUT.gpio(), Some(POT_GPIO)));
const _: () = assert!(matches!(LM35_INPUT.gpio(), Some(LM35_GPIO)));

/// Telemetry line settings
pub const TELEMETRY_UART: UartConfig = UartConfig::TELEMETRY;

/// LCD bus settings
pub const LCD_I2C: I2cConfig = I2cConfig::STANDARD;

/// LCD backpack address
pub const LCD_ADDRESS: u8 = address::PCF8574T;
