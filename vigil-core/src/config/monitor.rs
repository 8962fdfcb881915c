//! Monitor loop configuration

use vigil_hal::AnalogChannel;

/// Analog input wired to the potentiometer wiper
pub const POT_CHANNEL: AnalogChannel = AnalogChannel::A0;

/// Analog input wired to the LM35 output
pub const LM35_CHANNEL: AnalogChannel = AnalogChannel::A1;

/// Wait between the discarded and the kept conversion (ms)
pub const SETTLE_MS: u32 = 5;

/// Wait after each published cycle (ms)
pub const CYCLE_DELAY_MS: u32 = 500;

/// Character display width in columns
pub const DISPLAY_COLS: u8 = 20;

/// Character display height in rows
pub const DISPLAY_ROWS: u8 = 4;

/// Monitor loop settings
///
/// Built from the constants above; the struct exists so the controller and
/// sampler take their settings explicitly instead of reading globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Potentiometer channel
    pub pot_channel: AnalogChannel,
    /// LM35 channel
    pub lm35_channel: AnalogChannel,
    /// Settle interval inside each acquisition (ms)
    pub settle_ms: u32,
    /// Inter-cycle delay (ms)
    pub cycle_delay_ms: u32,
}

impl MonitorConfig {
    /// The build's configuration
    pub const DEFAULT: Self = Self {
        pot_channel: POT_CHANNEL,
        lm35_channel: LM35_CHANNEL,
        settle_ms: SETTLE_MS,
        cycle_delay_ms: CYCLE_DELAY_MS,
    };

    /// Nominal cycle period: both settle waits plus the cadence delay (ms)
    ///
    /// Conversion, rendering and transmission time come on top of this.
    pub const fn nominal_period_ms(&self) -> u32 {
        2 * self.settle_ms + self.cycle_delay_ms
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period() {
        assert_eq!(MonitorConfig::default().nominal_period_ms(), 510);
    }

    #[test]
    fn test_channels_distinct() {
        assert_ne!(POT_CHANNEL, LM35_CHANNEL);
    }
}
