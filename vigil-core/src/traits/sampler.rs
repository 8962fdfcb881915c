//! Analog sampler trait

use vigil_hal::AnalogChannel;

use crate::measurement::{RawSample, SampleError};

/// Trait for analog acquisition strategies
///
/// Implementations decide how a trustworthy conversion is obtained from a
/// shared multiplexed converter (discarded reads, settle waits, averaging).
/// The returned sample is already range-checked.
pub trait Sampler {
    /// Acquire one sample from `channel`
    ///
    /// Blocks for as long as the strategy needs.
    fn sample(&mut self, channel: AnalogChannel) -> Result<RawSample, SampleError>;
}

impl<T: Sampler + ?Sized> Sampler for &mut T {
    fn sample(&mut self, channel: AnalogChannel) -> Result<RawSample, SampleError> {
        T::sample(self, channel)
    }
}
