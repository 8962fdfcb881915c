//! ADC channel management
//!
//! RP2040 has a single 12-bit ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//! - ADC4: Internal temperature sensor
//!
//! The monitor works on a 10-bit scale referenced to 5 V, while the Pico's
//! converter is 12-bit referenced to 3.3 V. Conversions are rescaled before
//! they leave this module so the voltage they stand for is preserved.

use embassy_rp::adc::{Adc, Blocking, Channel};
use vigil_hal::{rescale, AnalogChannel, AnalogInput};

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
    /// Internal temperature sensor
    Temperature,
}

impl AdcChannel {
    /// Get the GPIO pin for this ADC channel
    pub const fn gpio(&self) -> Option<u8> {
        match self {
            AdcChannel::Adc0 => Some(26),
            AdcChannel::Adc1 => Some(27),
            AdcChannel::Adc2 => Some(28),
            AdcChannel::Adc3 => Some(29),
            AdcChannel::Temperature => None,
        }
    }
}

/// Full-scale value of the 12-bit converter
pub const NATIVE_MAX: u16 = 4095;

/// ADC reference on the Pico (ADC_VREF tied to the 3.3 V rail, mV)
pub const VREF_MV: u32 = 3300;

/// Convert a 12-bit, 3.3 V conversion to the shared 10-bit, 5 V scale
pub const fn to_ten_bit(raw: u16) -> u16 {
    rescale(raw & 0x0FFF, NATIVE_MAX, VREF_MV)
}

/// Errors from the RP2040 analog adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogError {
    /// No input is wired to the requested logical channel
    Unmapped(AnalogChannel),
    /// The converter flagged the conversion as failed
    Conversion,
}

/// Blocking analog input over the RP2040 ADC
///
/// Logical channel `n` reads `inputs[n]`, so the board decides which GPIO
/// backs A0, A1 and so on.
pub struct Rp2040Analog<'d, const N: usize> {
    adc: Adc<'d, Blocking>,
    inputs: [Channel<'d>; N],
}

impl<'d, const N: usize> Rp2040Analog<'d, N> {
    /// Wrap a blocking ADC and its inputs, in logical channel order
    pub fn new(adc: Adc<'d, Blocking>, inputs: [Channel<'d>; N]) -> Self {
        Self { adc, inputs }
    }
}

impl<const N: usize> AnalogInput for Rp2040Analog<'_, N> {
    type Error = AnalogError;

    fn read(&mut self, channel: AnalogChannel) -> Result<u16, AnalogError> {
        let input = self
            .inputs
            .get_mut(channel.index())
            .ok_or(AnalogError::Unmapped(channel))?;

        let raw = self
            .adc
            .blocking_read(input)
            .map_err(|_| AnalogError::Conversion)?;

        Ok(to_ten_bit(raw))
    }
}
