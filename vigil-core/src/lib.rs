//! Board-agnostic core logic for the sensor monitor firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Compile-time configuration (channels, timings, scale factors)
//! - Raw-to-physical conversions for the potentiometer and LM35
//! - Per-cycle measurement context and its telemetry projection
//! - Status screen formatting and rendering
//! - The fixed-cadence loop controller
//! - Hardware abstraction traits (sampler, character display)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod convert;
pub mod measurement;
pub mod render;
pub mod traits;

pub use controller::{CycleFault, CycleReport, LoopController};
pub use measurement::{CycleContext, RawSample, SampleError};
pub use render::{DisplayFrame, DisplayRenderer};
