//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in vigil-core for the monitor's hardware:
//!
//! - Settle-then-read analog sampler for a shared multiplexed ADC
//! - HD44780 character LCD behind a PCF8574 I2C expander

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;
