//! Vigil Serial Telemetry Protocol
//!
//! This crate defines the line-oriented text protocol the monitor emits on
//! its serial port: one compact JSON object per measurement cycle, terminated
//! by a newline.
//!
//! # Record Format
//!
//! ```text
//! {"potValue":512,"voltagePot":2.5024438,"lm35Value":45,"voltageLM35":0.21994135,
//!  "temperature":21.994135,"readingTime":10512,"uptimeSec":10,"readingCount":21}\n
//! ```
//!
//! (wrapped here for width; on the wire it is a single line)
//!
//! Every field is present exactly once, always in the order above. A record,
//! newline included, never exceeds [`TELEMETRY_CAPACITY`] bytes; the encoder
//! refuses to produce a longer one rather than cutting it short.
//!
//! The receiving side can use [`LineAssembler`] to split the byte stream back
//! into lines.

#![no_std]
#![deny(unsafe_code)]

pub mod encoder;
pub mod line;

pub use encoder::{EncodeError, TelemetryRecord, FIELD_NAMES, TELEMETRY_CAPACITY};
pub use line::{is_record_line, LineAssembler, LineError};
