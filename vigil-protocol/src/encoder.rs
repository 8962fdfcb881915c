//! Telemetry record encoding
//!
//! A record is serialized as compact JSON into a caller-supplied byte buffer.
//! Writes are bounds-checked: a record that does not fit is rejected with
//! [`EncodeError::BufferOverflow`] and the buffer contents are meaningless.

use core::fmt::{self, Write};

use heapless::Vec;

/// Capacity of the telemetry buffer in bytes, terminating newline included
pub const TELEMETRY_CAPACITY: usize = 256;

/// Wire names of the record fields, in emission order
pub const FIELD_NAMES: [&str; 8] = [
    "potValue",
    "voltagePot",
    "lm35Value",
    "voltageLM35",
    "temperature",
    "readingTime",
    "uptimeSec",
    "readingCount",
];

/// Errors that can occur while encoding a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Serialized record does not fit in the output buffer
    BufferOverflow,
    /// A float field is NaN or infinite and has no JSON form
    NonFinite,
}

/// One cycle's measurements as sent over the serial link
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TelemetryRecord {
    /// Raw potentiometer acquisition (0-1023)
    pub pot_value: u16,
    /// Potentiometer voltage (V)
    pub voltage_pot: f32,
    /// Raw temperature sensor acquisition (0-1023)
    pub lm35_value: u16,
    /// Temperature sensor voltage (V)
    #[cfg_attr(feature = "serde", serde(rename = "voltageLM35"))]
    pub voltage_lm35: f32,
    /// Derived temperature (°C)
    pub temperature: f32,
    /// Milliseconds since start-up when the cycle was sampled
    pub reading_time: u64,
    /// Whole seconds since start-up
    pub uptime_sec: u64,
    /// Cycle counter
    pub reading_count: u64,
}

impl TelemetryRecord {
    /// Encode this record into a byte buffer
    ///
    /// Writes the JSON object followed by `\n`. Returns the number of bytes
    /// written.
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, EncodeError> {
        if ![self.voltage_pot, self.voltage_lm35, self.temperature]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(EncodeError::NonFinite);
        }

        let mut out = SliceWriter::new(buffer);
        self.write_json(&mut out)
            .map_err(|_| EncodeError::BufferOverflow)?;

        Ok(out.len())
    }

    /// Encode this record into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, TELEMETRY_CAPACITY>, EncodeError> {
        let mut buffer = [0u8; TELEMETRY_CAPACITY];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| EncodeError::BufferOverflow)?;
        Ok(vec)
    }

    fn write_json(&self, out: &mut impl Write) -> fmt::Result {
        let [pot, vpot, lm35, vlm35, temp, time, uptime, count] = FIELD_NAMES;
        write!(
            out,
            "{{\"{pot}\":{},\"{vpot}\":{},\"{lm35}\":{},\"{vlm35}\":{},\"{temp}\":{},\
             \"{time}\":{},\"{uptime}\":{},\"{count}\":{}}}\n",
            self.pot_value,
            self.voltage_pot,
            self.lm35_value,
            self.voltage_lm35,
            self.temperature,
            self.reading_time,
            self.uptime_sec,
            self.reading_count,
        )
    }
}

/// `fmt::Write` over a borrowed slice that fails instead of truncating
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn len(&self) -> usize {
        self.pos
    }
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.pos.checked_add(bytes.len()).ok_or(fmt::Error)?;
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}
