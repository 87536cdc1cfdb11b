//! Line assembly for the receive interrupt.
//!
//! [`LineScanner`] takes one byte at a time and emits a parsed [`Command`]
//! whenever a `\n` or `\r` terminates a non-empty line. It never allocates,
//! blocks or logs, so it is safe to drive from an interrupt handler.

use crate::command::Command;
use crate::config::LINE_CAPACITY;
use crate::parser::parse_command;
use heapless::Vec;

/// Result of feeding one byte to a [`LineScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanEvent {
    /// Byte appended; line still in progress.
    Pending,
    /// Terminator on an empty line; nothing to do.
    Idle,
    /// A complete line parsed into a command.
    Command(Command),
    /// A complete line that is not a command.
    Malformed,
    /// Line exceeded the buffer; it was discarded along with this byte.
    Overflow,
}

/// Accumulates received bytes into command lines.
///
/// `N` is the maximum number of content bytes per line.
#[derive(Debug, Default)]
pub struct LineScanner<const N: usize = LINE_CAPACITY> {
    line: Vec<u8, N>,
}

impl<const N: usize> LineScanner<N> {
    /// Creates an empty scanner.
    pub const fn new() -> Self {
        Self { line: Vec::new() }
    }

    /// Processes one received byte.
    pub fn feed(&mut self, byte: u8) -> ScanEvent {
        match byte {
            b'\n' | b'\r' => {
                if self.line.is_empty() {
                    return ScanEvent::Idle;
                }
                let event = match parse_command(&self.line) {
                    Ok(command) => ScanEvent::Command(command),
                    Err(_) => ScanEvent::Malformed,
                };
                self.line.clear();
                event
            }
            _ => match self.line.push(byte) {
                Ok(()) => ScanEvent::Pending,
                Err(_) => {
                    self.line.clear();
                    ScanEvent::Overflow
                }
            },
        }
    }

    /// Bytes accumulated for the current line.
    pub fn pending(&self) -> &[u8] {
        &self.line
    }

    /// Drops the line in progress.
    pub fn reset(&mut self) {
        self.line.clear();
    }

    /// Maximum number of content bytes per line.
    pub const fn capacity(&self) -> usize {
        N
    }
}
