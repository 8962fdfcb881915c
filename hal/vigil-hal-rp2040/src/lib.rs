//! RP2040-specific HAL for the sensor monitor
//!
//! This crate provides RP2040-specific implementations of the shared
//! `vigil-hal` traits, plus board plumbing:
//!
//! - ADC channel mapping and the blocking 10-bit analog adapter
//! - Monotonic clock backed by the embassy time driver
//! - UART line settings for the embassy-rp driver

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod uart;

pub use adc::{AdcChannel, AnalogError, Rp2040Analog};
pub use clock::EmbassyClock;
