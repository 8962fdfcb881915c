//! I2C bus configuration
//!
//! Bus transactions go through `embedded_hal::i2c::I2c`; this module holds
//! the settings shared by the display adapter and the board setup.

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self { frequency: 100_000 };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self { frequency: 400_000 };
}

/// Common addresses of the PCF8574 backpack used on character LCDs
pub mod address {
    /// PCF8574T with all address jumpers open
    pub const PCF8574T: u8 = 0x27;
    /// PCF8574AT with all address jumpers open
    pub const PCF8574AT: u8 = 0x3F;
}
