//! Monitor loop controller
//!
//! Runs the fixed-cadence cycle:
//!
//! ```text
//!   ┌──────────────────────── acquire ────────────────────────┐
//!   │ count += 1 → sample pot → sample LM35 → read clock      │
//!   └─────────────────────────────┬───────────────────────────┘
//!                                 ▼
//!   ┌──────────────────────── publish ────────────────────────┐
//!   │ clear + draw 4 lines → encode record → write to serial  │
//!   └─────────────────────────────┬───────────────────────────┘
//!                                 ▼
//!                        wait cycle_delay_ms
//! ```
//!
//! Nothing in a cycle is fatal. Failures are collected in the
//! [`CycleReport`] and the loop carries on with the next cycle.

use embedded_hal::delay::DelayNs;
use embedded_io::{Error as _, ErrorKind, Write};
use heapless::Vec;
use vigil_hal::Monotonic;
use vigil_protocol::{EncodeError, TELEMETRY_CAPACITY};

use crate::config::MonitorConfig;
use crate::measurement::{CycleContext, SampleError};
use crate::render::{DisplayFrame, DisplayRenderer};
use crate::traits::{CharacterDisplay, DisplayError, Sampler};

/// Most faults a single cycle can produce
///
/// A sampling fault ends the cycle early; otherwise the display and the
/// telemetry path can each fail once.
pub const MAX_CYCLE_FAULTS: usize = 2;

/// A non-fatal failure inside one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleFault {
    /// A channel could not be sampled; nothing was published
    Sample(SampleError),
    /// The status screen could not be drawn
    Display(DisplayError),
    /// The telemetry record could not be encoded; nothing was sent
    Encode(EncodeError),
    /// The serial transport rejected the record
    Transmit(ErrorKind),
}

/// Outcome of one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Counter value of this cycle
    pub reading_count: u64,
    /// Clock reading of this cycle, if sampling got that far
    pub reading_time_ms: Option<u64>,
    /// Bytes of the record written to the serial transport
    ///
    /// Set once the whole record was accepted, even if the final flush
    /// then failed.
    pub telemetry_bytes: usize,
    /// Failures, in the order they happened
    pub faults: Vec<CycleFault, MAX_CYCLE_FAULTS>,
}

impl CycleReport {
    fn new(reading_count: u64) -> Self {
        Self {
            reading_count,
            reading_time_ms: None,
            telemetry_bytes: 0,
            faults: Vec::new(),
        }
    }

    fn fault(&mut self, fault: CycleFault) {
        // Capacity matches the worst case, see MAX_CYCLE_FAULTS
        let _ = self.faults.push(fault);
    }

    /// Check if every stage of the cycle succeeded
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Owns the cycle counter and sequences one cycle at a time
///
/// - `S`: analog sampler
/// - `D`: character display
/// - `W`: serial transport for telemetry
/// - `C`: monotonic clock
/// - `T`: blocking delay for the inter-cycle wait
pub struct LoopController<S, D, W, C, T> {
    sampler: S,
    renderer: DisplayRenderer<D>,
    serial: W,
    clock: C,
    delay: T,
    config: MonitorConfig,
    /// Cycles started since reset
    reading_count: u64,
    /// Telemetry serialization buffer
    tx_buffer: [u8; TELEMETRY_CAPACITY],
}

impl<S, D, W, C, T> LoopController<S, D, W, C, T>
where
    S: Sampler,
    D: CharacterDisplay,
    W: Write,
    C: Monotonic,
    T: DelayNs,
{
    /// Create a controller with the counter at zero
    pub fn new(sampler: S, display: D, serial: W, clock: C, delay: T, config: MonitorConfig) -> Self {
        Self {
            sampler,
            renderer: DisplayRenderer::new(display),
            serial,
            clock,
            delay,
            config,
            reading_count: 0,
            tx_buffer: [0u8; TELEMETRY_CAPACITY],
        }
    }

    /// Initialise the collaborators
    ///
    /// Call once before the first cycle.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.renderer.init()
    }

    /// Number of cycles started since reset
    pub fn reading_count(&self) -> u64 {
        self.reading_count
    }

    /// Settings the controller runs with
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Acquire-and-compute phase
    ///
    /// Advances the counter, samples the potentiometer then the LM35, and
    /// reads the clock. The counter advances even if sampling fails.
    pub fn acquire(&mut self) -> Result<CycleContext, SampleError> {
        self.reading_count += 1;

        let pot = self.sampler.sample(self.config.pot_channel)?;
        let lm35 = self.sampler.sample(self.config.lm35_channel)?;
        let now_ms = self.clock.now_ms();

        Ok(CycleContext::new(pot, lm35, self.reading_count, now_ms))
    }

    /// Publish phase
    ///
    /// Draws the status screen and sends the telemetry record. A display
    /// failure does not stop the record from being sent.
    pub fn publish(&mut self, context: &CycleContext, report: &mut CycleReport) {
        let frame = DisplayFrame::from_context(context);
        if let Err(e) = self.renderer.render(&frame) {
            report.fault(CycleFault::Display(e));
        }

        if let Err(fault) = self.transmit(context, report) {
            report.fault(fault);
        }
    }

    fn transmit(
        &mut self,
        context: &CycleContext,
        report: &mut CycleReport,
    ) -> Result<(), CycleFault> {
        let len = context
            .telemetry()
            .encode(&mut self.tx_buffer)
            .map_err(CycleFault::Encode)?;

        self.serial
            .write_all(&self.tx_buffer[..len])
            .map_err(|e| CycleFault::Transmit(e.kind()))?;
        report.telemetry_bytes = len;

        self.serial
            .flush()
            .map_err(|e| CycleFault::Transmit(e.kind()))
    }

    /// Run one cycle without the trailing delay
    pub fn run_cycle(&mut self) -> CycleReport {
        let acquired = self.acquire();
        let mut report = CycleReport::new(self.reading_count);

        match acquired {
            Ok(context) => {
                report.reading_time_ms = Some(context.reading_time_ms);
                self.publish(&context, &mut report);
            }
            Err(e) => report.fault(CycleFault::Sample(e)),
        }

        report
    }

    /// Block for the inter-cycle delay
    pub fn wait_for_next_cycle(&mut self) {
        self.delay.delay_ms(self.config.cycle_delay_ms);
    }

    /// Run one cycle followed by the inter-cycle delay
    pub fn step(&mut self) -> CycleReport {
        let report = self.run_cycle();
        self.wait_for_next_cycle();
        report
    }

    /// Run forever
    ///
    /// `on_cycle` sees every report before the inter-cycle delay starts.
    pub fn run(&mut self, mut on_cycle: impl FnMut(&CycleReport)) -> ! {
        loop {
            let report = self.run_cycle();
            on_cycle(&report);
            self.wait_for_next_cycle();
        }
    }

    /// Get the renderer
    pub fn renderer(&self) -> &DisplayRenderer<D> {
        &self.renderer
    }

    /// Get the serial transport
    pub fn serial(&self) -> &W {
        &self.serial
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use embedded_io::ErrorType;
    use heapless::String;
    use vigil_hal::AnalogChannel;

    use super::*;
    use crate::config::{DISPLAY_COLS, DISPLAY_ROWS};
    use crate::measurement::RawSample;

    /// Simulated time shared by the clock and the delays
    struct SimTime {
        now_ns: Cell<u64>,
    }

    impl SimTime {
        fn new() -> Self {
            Self { now_ns: Cell::new(0) }
        }

        fn advance_ns(&self, ns: u64) {
            self.now_ns.set(self.now_ns.get() + ns);
        }
    }

    struct SimClock<'a>(&'a SimTime);

    impl Monotonic for SimClock<'_> {
        fn now_ms(&self) -> u64 {
            self.0.now_ns.get() / 1_000_000
        }
    }

    struct SimDelay<'a> {
        time: &'a SimTime,
        calls_ms: Vec<u32, 16>,
    }

    impl DelayNs for SimDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.time.advance_ns(ns as u64);
        }

        fn delay_ms(&mut self, ms: u32) {
            let _ = self.calls_ms.push(ms);
            self.time.advance_ns(ms as u64 * 1_000_000);
        }
    }

    /// Sampler returning fixed values, spending the settle time like the real one
    struct FixedSampler<'a> {
        time: &'a SimTime,
        pot: u16,
        lm35: u16,
        fail_on: Option<AnalogChannel>,
    }

    impl Sampler for FixedSampler<'_> {
        fn sample(&mut self, channel: AnalogChannel) -> Result<RawSample, SampleError> {
            self.time.advance_ns(5_000_000);
            if self.fail_on == Some(channel) {
                return Err(SampleError::Acquisition(channel));
            }
            let value = if channel == AnalogChannel::A0 {
                self.pot
            } else {
                self.lm35
            };
            RawSample::new(channel, value)
        }
    }

    /// Display that keeps the last drawn lines
    struct GridDisplay {
        rows: [String<32>; 4],
        cursor_row: usize,
        clears: u32,
        fail: bool,
    }

    impl GridDisplay {
        fn new() -> Self {
            Self {
                rows: Default::default(),
                cursor_row: 0,
                clears: 0,
                fail: false,
            }
        }
    }

    impl CharacterDisplay for GridDisplay {
        fn init(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.clears += 1;
            for row in &mut self.rows {
                row.clear();
            }
            Ok(())
        }

        fn set_cursor(&mut self, _col: u8, row: u8) -> Result<(), DisplayError> {
            self.cursor_row = row as usize;
            Ok(())
        }

        fn print(&mut self, text: &str) -> Result<(), DisplayError> {
            self.rows[self.cursor_row]
                .push_str(text)
                .map_err(|_| DisplayError::InvalidPosition)
        }

        fn set_backlight(&mut self, _on: bool) -> Result<(), DisplayError> {
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (DISPLAY_COLS, DISPLAY_ROWS)
        }
    }

    #[derive(Debug)]
    struct LinkDown;

    impl embedded_io::Error for LinkDown {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NotConnected
        }
    }

    /// Serial port capturing everything written
    struct CaptureSerial {
        bytes: Vec<u8, 2048>,
        fail: bool,
        fail_flush: bool,
    }

    impl CaptureSerial {
        fn new() -> Self {
            Self {
                bytes: Vec::new(),
                fail: false,
                fail_flush: false,
            }
        }

        fn lines(&self) -> impl Iterator<Item = &str> {
            core::str::from_utf8(&self.bytes)
                .unwrap()
                .split_terminator('\n')
        }
    }

    impl ErrorType for CaptureSerial {
        type Error = LinkDown;
    }

    impl Write for CaptureSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.fail {
                return Err(LinkDown);
            }
            self.bytes.extend_from_slice(buf).map_err(|_| LinkDown)?;
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            if self.fail_flush {
                return Err(LinkDown);
            }
            Ok(())
        }
    }

    type TestController<'a> =
        LoopController<FixedSampler<'a>, GridDisplay, CaptureSerial, SimClock<'a>, SimDelay<'a>>;

    fn controller(time: &SimTime, pot: u16, lm35: u16) -> TestController<'_> {
        let sampler = FixedSampler {
            time,
            pot,
            lm35,
            fail_on: None,
        };
        let delay = SimDelay {
            time,
            calls_ms: Vec::new(),
        };
        LoopController::new(
            sampler,
            GridDisplay::new(),
            CaptureSerial::new(),
            SimClock(time),
            delay,
            MonitorConfig::DEFAULT,
        )
    }

    fn field<'a>(line: &'a str, name: &str) -> &'a str {
        let start = line.find(name).unwrap() + name.len() + 2;
        let rest = &line[start..];
        let end = rest.find([',', '}']).unwrap();
        &rest[..end]
    }

    #[test]
    fn test_counter_counts_cycles() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);
        assert_eq!(ctl.reading_count(), 0);

        for n in 1..=5 {
            let report = ctl.step();
            assert_eq!(report.reading_count, n);
            assert!(report.is_clean());
        }
        assert_eq!(ctl.reading_count(), 5);
        assert_eq!(ctl.serial().lines().count(), 5);
    }

    #[test]
    fn test_cadence_and_elapsed_time() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);

        let first = ctl.step();
        let second = ctl.step();

        // Two 5 ms settles, then 500 ms wait between cycles
        assert_eq!(first.reading_time_ms, Some(10));
        assert_eq!(second.reading_time_ms, Some(520));
        assert_eq!(ctl.delay.calls_ms.as_slice(), &[500, 500]);
    }

    #[test]
    fn test_uptime_matches_reading_time() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 100, 61);

        for _ in 0..6 {
            ctl.step();
        }

        for line in ctl.serial().lines() {
            let millis: u64 = field(line, "readingTime").parse().unwrap();
            let uptime: u64 = field(line, "uptimeSec").parse().unwrap();
            assert_eq!(uptime, millis / 1000);
        }
    }

    #[test]
    fn test_publishes_screen_and_record() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);
        ctl.init().unwrap();

        let report = ctl.run_cycle();
        assert_eq!(report.faults.len(), 0);

        let display = ctl.renderer().display();
        assert_eq!(display.clears, 1);
        assert_eq!(display.rows[0].as_str(), "Pot: 50.0%");
        assert_eq!(display.rows[1].as_str(), "Temp: 22.0 C");
        assert_eq!(display.rows[2].as_str(), "Count: 1");
        assert_eq!(display.rows[3].as_str(), "Uptime: 0s");

        let line = ctl.serial().lines().next().unwrap();
        assert_eq!(report.telemetry_bytes, line.len() + 1);
        assert_eq!(field(line, "potValue"), "512");
        assert_eq!(field(line, "lm35Value"), "45");
        assert_eq!(field(line, "readingCount"), "1");
    }

    #[test]
    fn test_sample_fault_skips_publish() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);
        ctl.sampler.fail_on = Some(AnalogChannel::A1);

        let report = ctl.step();
        assert_eq!(
            report.faults.as_slice(),
            &[CycleFault::Sample(SampleError::Acquisition(AnalogChannel::A1))]
        );
        assert_eq!(report.reading_time_ms, None);
        assert_eq!(report.telemetry_bytes, 0);
        assert_eq!(ctl.renderer().display().clears, 0);
        assert_eq!(ctl.serial().lines().count(), 0);

        // The loop carries on and the counter kept advancing
        ctl.sampler.fail_on = None;
        let report = ctl.step();
        assert!(report.is_clean());
        assert_eq!(report.reading_count, 2);
        assert_eq!(ctl.delay.calls_ms.len(), 2);
    }

    #[test]
    fn test_out_of_range_sample_reported() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 2000, 45);

        let report = ctl.run_cycle();
        assert_eq!(
            report.faults.as_slice(),
            &[CycleFault::Sample(SampleError::OutOfRange {
                channel: AnalogChannel::A0,
                value: 2000
            })]
        );
    }

    #[test]
    fn test_display_fault_still_transmits() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);
        ctl.renderer.display_mut().fail = true;

        let report = ctl.run_cycle();
        assert_eq!(
            report.faults.as_slice(),
            &[CycleFault::Display(DisplayError::Communication)]
        );
        assert!(report.telemetry_bytes > 0);
        assert_eq!(ctl.serial().lines().count(), 1);
    }

    #[test]
    fn test_transmit_fault_reported() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);
        ctl.serial.fail = true;

        let report = ctl.step();
        assert_eq!(
            report.faults.as_slice(),
            &[CycleFault::Transmit(ErrorKind::NotConnected)]
        );
        assert_eq!(report.telemetry_bytes, 0);
        assert_eq!(ctl.renderer().display().clears, 1);
    }

    #[test]
    fn test_flush_fault_keeps_written_bytes() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);
        ctl.serial.fail_flush = true;

        let report = ctl.run_cycle();
        assert_eq!(
            report.faults.as_slice(),
            &[CycleFault::Transmit(ErrorKind::NotConnected)]
        );

        let line = ctl.serial().lines().next().unwrap();
        assert_eq!(report.telemetry_bytes, line.len() + 1);
    }

    #[test]
    fn test_counter_keeps_counting_past_u32() {
        let time = SimTime::new();
        let mut ctl = controller(&time, 512, 45);
        ctl.reading_count = u32::MAX as u64;

        let first = ctl.step();
        let second = ctl.step();
        assert_eq!(first.reading_count, u32::MAX as u64 + 1);
        assert_eq!(second.reading_count, u32::MAX as u64 + 2);

        let last = ctl.serial().lines().last().unwrap();
        assert_eq!(field(last, "readingCount"), "4294967297");
    }
}
