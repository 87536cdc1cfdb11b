//! Shared test infrastructure for ws2812-bridge integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

// Provides the host critical-section implementation the queues rely on.
use critical_section as _;

use std::collections::VecDeque;
use std::convert::Infallible;

use embedded_hal::spi::{ErrorKind, ErrorType, SpiBus};
use ws2812_bridge::{Color, EncoderError, RgbLed, SpiConfig, SpiTransmitter};

// ============================================================================
// Mock SPI
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSpiError;

impl embedded_hal::spi::Error for MockSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Overrun
    }
}

/// Mock SPI bus that records every frame written
pub struct MockSpi {
    pub ready: bool,
    pub fail_configure: bool,
    pub fail_writes: bool,
    pub configured: Option<SpiConfig>,
    pub configure_calls: usize,
    pub writes: Vec<Vec<u8>>,
    pub flushes: usize,
}

impl MockSpi {
    pub fn new() -> Self {
        Self {
            ready: true,
            fail_configure: false,
            fail_writes: false,
            configured: None,
            configure_calls: 0,
            writes: Vec::new(),
            flushes: 0,
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub fn last_write(&self) -> Option<&[u8]> {
        self.writes.last().map(Vec::as_slice)
    }
}

impl ErrorType for MockSpi {
    type Error = MockSpiError;
}

impl SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MockSpiError);
        }
        self.writes.push(words.to_vec());
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(&words.to_vec())?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

impl SpiTransmitter for MockSpi {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error> {
        self.configure_calls += 1;
        if self.fail_configure {
            return Err(MockSpiError);
        }
        self.configured = Some(*config);
        Ok(())
    }
}

// ============================================================================
// Mock UART receiver
// ============================================================================

/// Mock RX FIFO holding bytes that "arrived" on the wire
pub struct MockRx {
    fifo: VecDeque<u8>,
}

impl MockRx {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            fifo: bytes.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.fifo.len()
    }
}

impl embedded_io::ErrorType for MockRx {
    type Error = Infallible;
}

impl embedded_io::ReadReady for MockRx {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.fifo.is_empty())
    }
}

impl embedded_io::Read for MockRx {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut n = 0;
        while n < buf.len() {
            match self.fifo.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

// ============================================================================
// Recording LED
// ============================================================================

/// LED that records every color it is asked to show
pub struct RecordingLed {
    pub colors: Vec<Color>,
    pub fail: bool,
}

impl RecordingLed {
    pub fn new() -> Self {
        Self {
            colors: Vec::new(),
            fail: false,
        }
    }
}

impl RgbLed for RecordingLed {
    fn set_color(&mut self, color: Color) -> Result<(), EncoderError> {
        if self.fail {
            return Err(EncoderError::Transmit(ErrorKind::Other));
        }
        self.colors.push(color);
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Bits of a pixel segment, classified by pulse width (count of high SPI bits)
pub fn pulse_bits(pixel: &[u8]) -> Vec<u8> {
    pixel
        .iter()
        .map(|byte| if byte.count_ones() >= 2 { 1 } else { 0 })
        .collect()
}

/// MSB-first bits of a channel value
pub fn channel_bits(value: u8) -> Vec<u8> {
    (0..8).rev().map(|i| (value >> i) & 1).collect()
}
