//! Color commands exchanged between the receive path and the LED.

use crate::types::Color;
use core::fmt::Write;
use heapless::String;

/// Longest rendered command: `C:255,255,255\n`.
pub const MAX_LINE_LEN: usize = 16;

/// A validated request to show a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    /// Color to show on the LED.
    pub color: Color,
}

impl Command {
    /// Creates a command from channel values.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            color: Color::new(red, green, blue),
        }
    }

    /// Renders the command in wire form, `C:<r>,<g>,<b>\n`.
    pub fn to_line(&self) -> String<MAX_LINE_LEN> {
        let mut line = String::new();
        // Three u8 fields always fit in MAX_LINE_LEN.
        let _ = writeln!(
            line,
            "C:{},{},{}",
            self.color.red, self.color.green, self.color.blue
        );
        line
    }
}

impl From<Color> for Command {
    fn from(color: Color) -> Self {
        Self { color }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "C:{},{},{}",
            self.color.red,
            self.color.green,
            self.color.blue
        )
    }
}
