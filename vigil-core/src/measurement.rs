//! Samples, measurements and the per-cycle context
//!
//! A [`CycleContext`] is built once per cycle by the controller, handed by
//! reference to the renderer and the telemetry encoder, then dropped.

use vigil_hal::{AnalogChannel, ADC_MAX};
use vigil_protocol::TelemetryRecord;

use crate::convert;

/// Errors that can occur while acquiring a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleError {
    /// The converter reported a failure
    Acquisition(AnalogChannel),
    /// The converter returned a value above the 10-bit scale
    OutOfRange {
        /// Channel that was sampled
        channel: AnalogChannel,
        /// Offending value
        value: u16,
    },
}

/// A validated 10-bit conversion tagged with its channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    channel: AnalogChannel,
    value: u16,
}

impl RawSample {
    /// Create a sample, rejecting values outside `0..=1023`
    pub fn new(channel: AnalogChannel, value: u16) -> Result<Self, SampleError> {
        if value > ADC_MAX {
            return Err(SampleError::OutOfRange { channel, value });
        }
        Ok(Self { channel, value })
    }

    /// Channel the sample was taken on
    pub fn channel(&self) -> AnalogChannel {
        self.channel
    }

    /// Conversion value (0-1023)
    pub fn value(&self) -> u16 {
        self.value
    }
}

/// Potentiometer reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PotMeasurement {
    /// Wiper voltage (V)
    pub voltage: f32,
    /// Position as a percentage of full travel
    pub percentage: f32,
}

impl PotMeasurement {
    /// Derive voltage and travel from a potentiometer conversion
    pub fn from_sample(sample: RawSample) -> Self {
        Self {
            voltage: convert::voltage(sample.value()),
            percentage: convert::percentage(sample.value()),
        }
    }
}

/// LM35 reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lm35Measurement {
    /// Sensor output voltage (V)
    pub voltage: f32,
    /// Temperature (°C)
    pub temperature: f32,
}

impl Lm35Measurement {
    /// Derive voltage and temperature from an LM35 conversion
    pub fn from_sample(sample: RawSample) -> Self {
        Self {
            voltage: convert::voltage(sample.value()),
            temperature: convert::temperature(sample.value()),
        }
    }
}

/// Everything measured and derived in one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleContext {
    /// Potentiometer conversion
    pub pot: RawSample,
    /// Potentiometer measurement
    pub pot_reading: PotMeasurement,
    /// LM35 conversion
    pub lm35: RawSample,
    /// LM35 measurement
    pub lm35_reading: Lm35Measurement,
    /// Cycle counter value for this cycle
    pub reading_count: u64,
    /// Milliseconds since start-up, read after sampling
    pub reading_time_ms: u64,
}

impl CycleContext {
    /// Build the context, deriving both measurement sets
    pub fn new(pot: RawSample, lm35: RawSample, reading_count: u64, reading_time_ms: u64) -> Self {
        Self {
            pot,
            pot_reading: PotMeasurement::from_sample(pot),
            lm35,
            lm35_reading: Lm35Measurement::from_sample(lm35),
            reading_count,
            reading_time_ms,
        }
    }

    /// Whole seconds since start-up
    pub fn uptime_secs(&self) -> u64 {
        self.reading_time_ms / 1000
    }

    /// Project the context onto the telemetry record
    pub fn telemetry(&self) -> TelemetryRecord {
        TelemetryRecord {
            pot_value: self.pot.value(),
            voltage_pot: self.pot_reading.voltage,
            lm35_value: self.lm35.value(),
            voltage_lm35: self.lm35_reading.voltage,
            temperature: self.lm35_reading.temperature,
            reading_time: self.reading_time_ms,
            uptime_sec: self.uptime_secs(),
            reading_count: self.reading_count,
        }
    }
}
