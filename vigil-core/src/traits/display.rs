//! Character display trait for the status screen

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transaction failed (NACK, arbitration, timeout)
    Communication,
    /// Cursor position outside the grid
    InvalidPosition,
    /// Display used before `init`
    NotInitialized,
}

/// Trait for addressable character-grid displays
///
/// Models an HD44780-style text LCD: a cursor is placed, text is printed
/// from there. Numbers are formatted by the caller.
pub trait CharacterDisplay {
    /// Run the controller initialisation sequence
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the whole screen and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Move the cursor
    ///
    /// - `col`: Column (0-based)
    /// - `row`: Row (0-based)
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError>;

    /// Print ASCII text at the cursor
    fn print(&mut self, text: &str) -> Result<(), DisplayError>;

    /// Switch the backlight
    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Grid size as (columns, rows)
    fn dimensions(&self) -> (u8, u8);
}

/// Helper trait for drawing whole lines
pub trait DisplayExt: CharacterDisplay {
    /// Print `text` starting at column 0 of `row`
    fn draw_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        let (_, rows) = self.dimensions();
        if row >= rows {
            return Err(DisplayError::InvalidPosition);
        }
        self.set_cursor(0, row)?;
        self.print(text)
    }
}

// Blanket implementation for all CharacterDisplay types
impl<T: CharacterDisplay> DisplayExt for T {}
