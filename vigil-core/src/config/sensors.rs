//! Sensor scale factors

/// Converter reference voltage (V)
///
/// Matches `vigil_hal::ADC_REF_MV`; chip HALs rescale onto this reference.
pub const ADC_REF_VOLTS: f32 = 5.0;

/// Full-scale conversion value as a float divisor
pub const ADC_FULL_SCALE: f32 = vigil_hal::ADC_MAX as f32;

/// LM35 output slope (V per °C)
pub const LM35_VOLTS_PER_DEGREE: f32 = 0.01;
