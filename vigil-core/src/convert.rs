//! Raw acquisition to physical unit conversion
//!
//! Pure functions over the 10-bit conversion scale. No clamping or rounding
//! is applied: inputs outside `0..=1023` are rejected earlier, when the
//! [`RawSample`](crate::measurement::RawSample) is built, and display
//! rounding happens in the renderer.

use crate::config::{ADC_FULL_SCALE, ADC_REF_VOLTS, LM35_VOLTS_PER_DEGREE};

/// Voltage at the converter input (V)
///
/// `raw * 5.0 / 1023.0`
pub fn voltage(raw: u16) -> f32 {
    raw as f32 * ADC_REF_VOLTS / ADC_FULL_SCALE
}

/// Position of the potentiometer as a percentage of full travel
///
/// `(raw / 1023.0) * 100.0`
pub fn percentage(raw: u16) -> f32 {
    (raw as f32 / ADC_FULL_SCALE) * 100.0
}

/// Temperature reported by an LM35 (°C)
///
/// The LM35 outputs 10 mV per degree, so this is only meaningful for a
/// conversion taken on the LM35 channel.
pub fn temperature(raw: u16) -> f32 {
    voltage(raw) / LM35_VOLTS_PER_DEGREE
}
