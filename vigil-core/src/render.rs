//! Status screen rendering
//!
//! The screen is a 20x4 character LCD. Every cycle the whole screen is
//! cleared and redrawn:
//!
//! ```text
//! ┌────────────────────┐
//! │Pot: 50.0%          │
//! │Temp: 22.0 C        │
//! │Count: 42           │
//! │Uptime: 21s         │
//! └────────────────────┘
//! ```

use core::fmt::{self, Write};

use heapless::String;

use crate::config::{DISPLAY_COLS, DISPLAY_ROWS};
use crate::measurement::CycleContext;
use crate::traits::{CharacterDisplay, DisplayError, DisplayExt};

/// Characters per line
pub const LINE_WIDTH: usize = DISPLAY_COLS as usize;

/// Lines per frame
pub const LINE_COUNT: usize = DISPLAY_ROWS as usize;

/// One line of the status screen
pub type Line = String<LINE_WIDTH>;

/// The four status lines for one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    lines: [Line; LINE_COUNT],
}

impl DisplayFrame {
    /// Format the status lines
    ///
    /// Floats are shown with one decimal. Lines longer than the display are
    /// clipped at the last column.
    pub fn new(percentage: f32, temperature: f32, reading_count: u64, uptime_secs: u64) -> Self {
        let mut lines: [Line; LINE_COUNT] = Default::default();

        let _ = write!(Clip(&mut lines[0]), "Pot: {:.1}%", percentage);
        let _ = write!(Clip(&mut lines[1]), "Temp: {:.1} C", temperature);
        let _ = write!(Clip(&mut lines[2]), "Count: {}", reading_count);
        let _ = write!(Clip(&mut lines[3]), "Uptime: {}s", uptime_secs);

        Self { lines }
    }

    /// Build the frame for a cycle
    pub fn from_context(context: &CycleContext) -> Self {
        Self::new(
            context.pot_reading.percentage,
            context.lm35_reading.temperature,
            context.reading_count,
            context.uptime_secs(),
        )
    }

    /// All lines, top to bottom
    pub fn lines(&self) -> &[Line; LINE_COUNT] {
        &self.lines
    }

    /// Get a line of text
    pub fn line(&self, row: u8) -> &str {
        self.lines
            .get(row as usize)
            .map(|l| l.as_str())
            .unwrap_or("")
    }
}

/// `fmt::Write` adapter that drops whatever does not fit in the line
struct Clip<'a>(&'a mut Line);

impl Write for Clip<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Draws frames on a character display
pub struct DisplayRenderer<D> {
    display: D,
}

impl<D: CharacterDisplay> DisplayRenderer<D> {
    /// Create a renderer for a display
    pub const fn new(display: D) -> Self {
        Self { display }
    }

    /// Initialise the display and switch the backlight on
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.display.init()?;
        self.display.set_backlight(true)
    }

    /// Clear the screen and draw `frame`
    pub fn render(&mut self, frame: &DisplayFrame) -> Result<(), DisplayError> {
        self.display.clear()?;
        for (row, line) in frame.lines().iter().enumerate() {
            self.display.draw_line(row as u8, line)?;
        }
        Ok(())
    }

    /// Get the underlying display
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Get the underlying display mutably
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}
