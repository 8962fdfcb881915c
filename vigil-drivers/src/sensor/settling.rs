//! Settle-then-read analog sampler
//!
//! The potentiometer and the LM35 share one multiplexed converter. The
//! sample-and-hold capacitor still carries charge from the previously
//! selected channel right after a switch, so the first conversion on the new
//! channel is pulled towards the old value. Reading once, waiting and reading
//! again gives the input time to settle.

use embedded_hal::delay::DelayNs;
use vigil_core::config::SETTLE_MS;
use vigil_core::traits::Sampler;
use vigil_core::{RawSample, SampleError};
use vigil_hal::{AnalogChannel, AnalogInput};

/// Sampler that discards the first conversion after a settle wait
pub struct SettlingSampler<ADC, D> {
    adc: ADC,
    delay: D,
    /// Wait between the discarded and the kept conversion (ms)
    settle_ms: u32,
}

impl<ADC, D> SettlingSampler<ADC, D> {
    /// Create a sampler with the default 5 ms settle interval
    pub fn new(adc: ADC, delay: D) -> Self {
        Self::with_settle_ms(adc, delay, SETTLE_MS)
    }

    /// Create a sampler with a custom settle interval
    pub fn with_settle_ms(adc: ADC, delay: D, settle_ms: u32) -> Self {
        Self {
            adc,
            delay,
            settle_ms,
        }
    }

    /// Settle interval in milliseconds
    pub fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Release the converter and delay
    pub fn release(self) -> (ADC, D) {
        (self.adc, self.delay)
    }
}

impl<ADC: AnalogInput, D: DelayNs> Sampler for SettlingSampler<ADC, D> {
    fn sample(&mut self, channel: AnalogChannel) -> Result<RawSample, SampleError> {
        // Switches the mux; the value is not trusted
        self.adc
            .read(channel)
            .map_err(|_| SampleError::Acquisition(channel))?;

        self.delay.delay_ms(self.settle_ms);

        let value = self
            .adc
            .read(channel)
            .map_err(|_| SampleError::Acquisition(channel))?;

        RawSample::new(channel, value)
    }
}
