//! Vigil Hardware Abstraction Layer
//!
//! This crate defines the hardware capabilities the monitor loop consumes,
//! so the same application code runs on a board or against test fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (vigil-core, firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  vigil-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  vigil-hal-   │       │  test fakes   │
//! │    rp2040     │       │               │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`adc::AnalogInput`] - Multiplexed analog acquisition
//! - [`time::Monotonic`] - Milliseconds since start-up
//!
//! Blocking delays, I2C and serial writes use the `embedded-hal` and
//! `embedded-io` traits directly; [`uart`] and [`i2c`] only carry settings.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod i2c;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use adc::{rescale, AnalogChannel, AnalogInput, ADC_MAX, ADC_REF_MV};
pub use time::Monotonic;
