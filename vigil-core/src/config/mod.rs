//! Compile-time configuration
//!
//! Channel assignments, timings and scale factors are fixed at build time.
//! There is no runtime configuration surface.

pub mod monitor;
pub mod sensors;

pub use monitor::*;
pub use sensors::*;
