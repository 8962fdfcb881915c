//! HD44780 Character LCD Driver
//!
//! Driver for HD44780-compatible text LCDs behind a PCF8574 I2C port
//! expander ("I2C backpack"). The controller runs in 4-bit mode; every
//! byte is sent as two nibbles, each latched by pulsing EN.
//!
//! Expander pin mapping:
//!
//! ```text
//! P7 P6 P5 P4 | P3 | P2 | P1 | P0
//! D7 D6 D5 D4 | BL | EN | RW | RS
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use vigil_core::config::{DISPLAY_COLS, DISPLAY_ROWS};
use vigil_core::traits::{CharacterDisplay, DisplayError};
use vigil_hal::i2c::address;

/// DDRAM address of the first column of each row (20x4 layout)
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Expander control bits
mod pin {
    pub const RS: u8 = 0x01;
    pub const EN: u8 = 0x04;
    pub const BACKLIGHT: u8 = 0x08;
}

/// HD44780 commands
#[allow(dead_code)]
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    pub const ENTRY_MODE: u8 = 0x04;
    pub const DISPLAY_CONTROL: u8 = 0x08;
    pub const FUNCTION_SET: u8 = 0x20;
    pub const SET_DDRAM_ADDR: u8 = 0x80;

    // Entry mode flags
    pub const ENTRY_INCREMENT: u8 = 0x02;

    // Display control flags
    pub const DISPLAY_ON: u8 = 0x04;

    // Function set flags
    pub const TWO_LINE: u8 = 0x08;

    /// Wake-up nibble sent three times before switching to 4-bit mode
    pub const WAKE: u8 = 0x03;
    /// Nibble selecting the 4-bit interface
    pub const FOUR_BIT: u8 = 0x02;
}

/// Character printed for anything outside the controller's ASCII range
const REPLACEMENT: u8 = b'?';

/// Degree sign in the A00 character ROM
const DEGREE: u8 = 0xDF;

/// HD44780 LCD on a PCF8574 backpack
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    cols: u8,
    rows: u8,
    backlight: bool,
    initialized: bool,
    /// Column the next character lands in
    column: u8,
}

impl<I2C, D> Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver for a 20x4 display at the default backpack address
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, address::PCF8574T)
    }

    /// Create a driver for a 20x4 display at `address`
    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            cols: DISPLAY_COLS,
            rows: DISPLAY_ROWS,
            backlight: false,
            initialized: false,
            column: 0,
        }
    }

    /// I2C address of the expander
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Whether the backlight is on
    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), DisplayError> {
        let bl = if self.backlight { pin::BACKLIGHT } else { 0 };
        self.i2c
            .write(self.address, &[bits | bl])
            .map_err(|_| DisplayError::Communication)
    }

    /// Put a nibble on D4-D7 and latch it
    fn write_nibble(&mut self, nibble: u8, mode: u8) -> Result<(), DisplayError> {
        let bits = (nibble << 4) | mode;
        self.expander_write(bits)?;
        self.expander_write(bits | pin::EN)?;
        self.delay.delay_us(1);
        self.expander_write(bits)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn send(&mut self, value: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble(value >> 4, mode)?;
        self.write_nibble(value & 0x0F, mode)
    }

    fn command(&mut self, value: u8) -> Result<(), DisplayError> {
        self.send(value, 0)
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }
}

impl<I2C, D> CharacterDisplay for Hd44780<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        // Power-on wait (datasheet: >40 ms after Vcc reaches 2.7 V)
        self.delay.delay_ms(50);
        self.expander_write(0)?;

        // Reset by instruction: works from any interface state
        self.write_nibble(cmd::WAKE, 0)?;
        self.delay.delay_us(4_500);
        self.write_nibble(cmd::WAKE, 0)?;
        self.delay.delay_us(4_500);
        self.write_nibble(cmd::WAKE, 0)?;
        self.delay.delay_us(150);
        self.write_nibble(cmd::FOUR_BIT, 0)?;

        self.command(cmd::FUNCTION_SET | cmd::TWO_LINE)?;
        self.command(cmd::DISPLAY_CONTROL | cmd::DISPLAY_ON)?;
        self.command(cmd::CLEAR)?;
        self.delay.delay_ms(2);
        self.command(cmd::ENTRY_MODE | cmd::ENTRY_INCREMENT)?;

        self.column = 0;
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.command(cmd::CLEAR)?;
        // Clear is the one slow instruction (1.52 ms)
        self.delay.delay_ms(2);
        self.column = 0;
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        if col >= self.cols || row >= self.rows {
            return Err(DisplayError::InvalidPosition);
        }
        self.command(cmd::SET_DDRAM_ADDR | (ROW_OFFSETS[row as usize] + col))?;
        self.column = col;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        for ch in text.chars() {
            // DDRAM rows are interleaved, so running past the edge would
            // land on another row
            if self.column >= self.cols {
                break;
            }
            let code = match ch {
                '°' => DEGREE,
                ' '..='}' => ch as u8,
                _ => REPLACEMENT,
            };
            self.send(code, pin::RS)?;
            self.column += 1;
        }
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight = on;
        self.expander_write(0)
    }

    fn dimensions(&self) -> (u8, u8) {
        (self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use heapless::Vec;

    /// Bus that records every byte written to the expander
    struct RecordingBus {
        writes: Vec<u8, 1024>,
        last_address: Option<u8>,
        fail: bool,
    }

    impl RecordingBus {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                last_address: None,
                fail: false,
            }
        }

        /// Decode latched nibbles back into (byte, rs) pairs
        fn decode(&self) -> Vec<(u8, bool), 128> {
            let mut out = Vec::new();
            let mut high: Option<u8> = None;
            for &w in self.writes.iter().filter(|&&w| w & pin::EN != 0) {
                let nibble = w >> 4;
                match high.take() {
                    None => high = Some(nibble),
                    Some(h) => out.push(((h << 4) | nibble, w & pin::RS != 0)).unwrap(),
                }
            }
            out
        }
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.last_address = Some(address);
            for op in operations {
                if let Operation::Write(bytes) = op {
                    for &b in bytes.iter() {
                        self.writes.push(b).unwrap();
                    }
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn ready() -> Hd44780<RecordingBus, NoDelay> {
        let mut lcd = Hd44780::new(RecordingBus::new(), NoDelay);
        lcd.init().unwrap();
        lcd.i2c.writes.clear();
        lcd
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = Hd44780::new(RecordingBus::new(), NoDelay);
        lcd.init().unwrap();

        let latched: Vec<u8, 64> = lcd
            .i2c
            .writes
            .iter()
            .filter(|&&w| w & pin::EN != 0)
            .map(|&w| w >> 4)
            .collect();

        // Three wake nibbles, 4-bit select, then four full commands
        assert_eq!(&latched[..4], &[0x3, 0x3, 0x3, 0x2]);
        assert_eq!(
            &latched[4..],
            &[0x2, 0x8, 0x0, 0xC, 0x0, 0x1, 0x0, 0x6]
        );
        assert_eq!(lcd.i2c.last_address, Some(address::PCF8574T));
    }

    #[test]
    fn test_use_before_init() {
        let mut lcd = Hd44780::new(RecordingBus::new(), NoDelay);
        assert_eq!(lcd.print("x"), Err(DisplayError::NotInitialized));
        assert_eq!(lcd.clear(), Err(DisplayError::NotInitialized));
        assert_eq!(lcd.set_cursor(0, 0), Err(DisplayError::NotInitialized));
    }

    #[test]
    fn test_print_sends_data() {
        let mut lcd = ready();
        lcd.print("Hi").unwrap();
        assert_eq!(lcd.i2c.decode().as_slice(), &[(b'H', true), (b'i', true)]);
    }

    #[test]
    fn test_cursor_row_offsets() {
        let mut lcd = ready();
        lcd.set_cursor(0, 1).unwrap();
        lcd.set_cursor(3, 2).unwrap();
        lcd.set_cursor(19, 3).unwrap();

        assert_eq!(
            lcd.i2c.decode().as_slice(),
            &[(0xC0, false), (0x97, false), (0xE7, false)]
        );
    }

    #[test]
    fn test_cursor_out_of_grid() {
        let mut lcd = ready();
        assert_eq!(lcd.set_cursor(20, 0), Err(DisplayError::InvalidPosition));
        assert_eq!(lcd.set_cursor(0, 4), Err(DisplayError::InvalidPosition));
        assert!(lcd.i2c.writes.is_empty());
    }

    #[test]
    fn test_print_stops_at_right_edge() {
        let mut lcd = ready();
        lcd.set_cursor(18, 0).unwrap();
        lcd.i2c.writes.clear();
        lcd.print("abcd").unwrap();
        assert_eq!(lcd.i2c.decode().as_slice(), &[(b'a', true), (b'b', true)]);
    }

    #[test]
    fn test_character_mapping() {
        let mut lcd = ready();
        lcd.print("°é").unwrap();
        assert_eq!(
            lcd.i2c.decode().as_slice(),
            &[(DEGREE, true), (REPLACEMENT, true)]
        );
    }

    #[test]
    fn test_backlight_bit() {
        let mut lcd = ready();
        lcd.set_backlight(true).unwrap();
        assert!(lcd.backlight());
        assert_eq!(lcd.i2c.writes.last(), Some(&pin::BACKLIGHT));

        lcd.print("A").unwrap();
        assert!(lcd.i2c.writes.iter().all(|w| w & pin::BACKLIGHT != 0));

        lcd.set_backlight(false).unwrap();
        assert_eq!(lcd.i2c.writes.last(), Some(&0));
    }

    #[test]
    fn test_bus_failure() {
        let mut lcd = ready();
        lcd.i2c.fail = true;
        assert_eq!(lcd.clear(), Err(DisplayError::Communication));
    }

    #[test]
    fn test_custom_address_and_dimensions() {
        let mut lcd = Hd44780::with_address(RecordingBus::new(), NoDelay, address::PCF8574AT);
        lcd.init().unwrap();
        assert_eq!(lcd.address(), 0x3F);
        assert_eq!(lcd.i2c.last_address, Some(0x3F));
        assert_eq!(lcd.dimensions(), (20, 4));
    }
}
