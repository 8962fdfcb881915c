//! Analog input abstractions
//!
//! Provides the acquisition capability the sampling pipeline is built on.
//! Chip-specific HALs implement [`AnalogInput`] over their converter, tests
//! implement it with scripted values.

/// Identifier of a multiplexed analog input
///
/// The numbering is the board's logical numbering (A0, A1, ...), not a GPIO
/// number. The chip HAL maps it onto a physical converter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogChannel(pub u8);

impl AnalogChannel {
    /// Analog input A0
    pub const A0: Self = Self(0);
    /// Analog input A1
    pub const A1: Self = Self(1);
    /// Analog input A2
    pub const A2: Self = Self(2);
    /// Analog input A3
    pub const A3: Self = Self(3);

    /// Channel index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Analog-to-digital converter shared between channels
///
/// One conversion is issued per call; the converter is switched to `channel`
/// first if needed. Implementations report values on a 10-bit scale
/// (`0..=ADC_MAX`) referenced to [`ADC_REF_MV`], regardless of the
/// converter's native resolution and reference; see [`rescale`].
pub trait AnalogInput {
    /// Error type for conversions
    type Error;

    /// Perform a single conversion on `channel`
    fn read(&mut self, channel: AnalogChannel) -> Result<u16, Self::Error>;
}

/// Largest value a 10-bit conversion can produce
pub const ADC_MAX: u16 = 1023;

/// Reference voltage of the shared 10-bit scale (mV)
pub const ADC_REF_MV: u32 = 5000;

/// Map a native conversion onto the shared 10-bit, 5 V scale
///
/// - `raw`: native conversion, clamped to `native_max`
/// - `native_max`: full-scale value of the native converter (e.g. 4095)
/// - `native_vref_mv`: native reference voltage in millivolts
///
/// Rounds to the nearest count. The result keeps the input voltage, so a
/// converter with a lower reference never reaches `ADC_MAX`.
pub const fn rescale(raw: u16, native_max: u16, native_vref_mv: u32) -> u16 {
    if native_max == 0 {
        return 0;
    }
    let raw = if raw > native_max { native_max } else { raw };

    let num = raw as u64 * native_vref_mv as u64 * ADC_MAX as u64;
    let den = native_max as u64 * ADC_REF_MV as u64;
    let scaled = (num + den / 2) / den;

    if scaled > ADC_MAX as u64 {
        ADC_MAX
    } else {
        scaled as u16
    }
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    type Error = T::Error;

    fn read(&mut self, channel: AnalogChannel) -> Result<u16, Self::Error> {
        T::read(self, channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_same_reference_is_bit_shift_scale() {
        assert_eq!(rescale(0, 4095, 5000), 0);
        assert_eq!(rescale(4095, 4095, 5000), ADC_MAX);
        assert_eq!(rescale(1023, 1023, 5000), 1023);
    }

    #[test]
    fn test_rescale_lower_reference_keeps_voltage() {
        // 0.25 V on a 3.3 V 12-bit converter
        assert_eq!(rescale(310, 4095, 3300), 51);
        // 3.3 V full scale is 675 counts of 5 V
        assert_eq!(rescale(4095, 4095, 3300), 675);
        assert_eq!(rescale(2048, 4095, 3300), 338);
    }

    #[test]
    fn test_rescale_clamps() {
        assert_eq!(rescale(u16::MAX, 4095, 3300), 675);
        assert_eq!(rescale(4095, 4095, 9000), ADC_MAX);
        assert_eq!(rescale(100, 0, 3300), 0);
    }
}
