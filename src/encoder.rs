//! WS2812 signal encoding over SPI.
//!
//! The LED protocol encodes each bit as the width of a high pulse. Clocked at
//! 4 MHz, one SPI byte spans 2 µs and each SPI bit 250 ns, so a byte whose
//! leading bits are set produces a high pulse of the matching width:
//!
//! | LED bit | SPI byte      | High time |
//! |---------|---------------|-----------|
//! | `0`     | `0b0100_0000` | 250 ns    |
//! | `1`     | `0b0111_0000` | 750 ns    |
//!
//! A pixel is 24 such bytes in green, red, blue order, most significant bit
//! first, followed by [`RESET_BYTES`] zero bytes that hold the line low long
//! enough for the LED to latch.

use crate::config::{BITS_PER_PIXEL, FRAME_LEN, RESET_BYTES, SpiConfig};
use crate::types::{Color, EncodedFrame, EncoderError};
use embedded_hal::spi::SpiBus;

/// Short-pulse byte, a logical `0`.
pub const BIT_ZERO: u8 = 0x40;

/// Long-pulse byte, a logical `1`.
pub const BIT_ONE: u8 = 0x70;

/// SPI byte for each bit value, indexed by the bit.
pub const BIT_PATTERNS: [u8; 2] = [BIT_ZERO, BIT_ONE];

/// SPI peripheral used as the LED data line.
///
/// Implement this for your HAL's SPI bus. Only MOSI needs to be wired.
pub trait SpiTransmitter: SpiBus<u8> {
    /// Returns true once the peripheral is claimed and usable.
    fn is_ready(&self) -> bool;

    /// Applies clock rate, word size and bit order.
    fn configure(&mut self, config: &SpiConfig) -> Result<(), Self::Error>;
}

/// Anything that can display a single color.
///
/// The consumer loop drives the LED through this trait.
pub trait RgbLed {
    /// Shows `color`, returning once the LED has been updated.
    fn set_color(&mut self, color: Color) -> Result<(), EncoderError>;
}

/// Lifecycle of an encoder's peripheral binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderState {
    /// `initialize` has not run yet.
    Uninitialized,
    /// Peripheral configured; frames can be sent.
    Ready,
    /// Initialization failed. No further transmission is attempted.
    Failed(EncoderError),
}

/// Writes the frame for `color` into `frame`.
///
/// The frame is cleared first, so the reset segment is left all zero.
pub fn encode_into(color: Color, frame: &mut EncodedFrame) {
    frame.fill(0);

    let channels = [color.green, color.red, color.blue];
    for (&channel, out) in channels.iter().zip(frame[..BITS_PER_PIXEL].chunks_exact_mut(8)) {
        for (i, byte) in out.iter_mut().enumerate() {
            let bit = (channel >> (7 - i)) & 1;
            *byte = BIT_PATTERNS[bit as usize];
        }
    }
}

/// Recovers the color from an encoded frame.
///
/// Returns `None` if a pixel byte is neither pulse pattern or the reset
/// segment is not all zero.
pub fn decode_frame(frame: &EncodedFrame) -> Option<Color> {
    let (pixel, reset) = frame.split_at(BITS_PER_PIXEL);
    if reset.iter().any(|&b| b != 0) {
        return None;
    }

    let mut channels = [0u8; 3];
    for (channel, bits) in channels.iter_mut().zip(pixel.chunks_exact(8)) {
        for &byte in bits {
            let bit = match byte {
                BIT_ZERO => 0,
                BIT_ONE => 1,
                _ => return None,
            };
            *channel = (*channel << 1) | bit;
        }
    }

    let [green, red, blue] = channels;
    Some(Color::new(red, green, blue))
}

/// Drives one WS2812 LED through an SPI peripheral.
///
/// Owns both the peripheral and the frame buffer; only the consumer context
/// should hold it.
pub struct Ws2812Encoder<S> {
    spi: S,
    config: SpiConfig,
    frame: EncodedFrame,
    state: EncoderState,
}

impl<S: SpiTransmitter> Ws2812Encoder<S> {
    /// Creates an encoder with the default 4 MHz configuration.
    pub fn new(spi: S) -> Self {
        Self::with_config(spi, SpiConfig::default())
    }

    /// Creates an encoder with a custom SPI configuration.
    ///
    /// The configuration is validated by [`initialize`](Self::initialize).
    pub fn with_config(spi: S, config: SpiConfig) -> Self {
        Self {
            spi,
            config,
            frame: [0; FRAME_LEN],
            state: EncoderState::Uninitialized,
        }
    }

    /// Claims and configures the peripheral.
    ///
    /// Failure is terminal: later calls return the same error without
    /// touching the peripheral again.
    pub fn initialize(&mut self) -> Result<(), EncoderError> {
        match self.state {
            EncoderState::Ready => return Ok(()),
            EncoderState::Failed(err) => return Err(err),
            EncoderState::Uninitialized => {}
        }

        debug!("initializing WS2812 encoder");
        match self.try_initialize() {
            Ok(()) => {
                self.state = EncoderState::Ready;
                info!(
                    "WS2812 encoder ready at {} Hz, {} reset bytes",
                    self.config.frequency_hz, RESET_BYTES
                );
                Ok(())
            }
            Err(err) => {
                self.state = EncoderState::Failed(err);
                error!("WS2812 encoder initialization failed: {:?}", err);
                Err(err)
            }
        }
    }

    fn try_initialize(&mut self) -> Result<(), EncoderError> {
        if !self.spi.is_ready() {
            return Err(EncoderError::DeviceNotReady);
        }
        self.config.validate()?;
        self.spi
            .configure(&self.config)
            .map_err(|_| EncoderError::DeviceNotReady)
    }

    /// Encodes `color` into the scratch frame and returns it.
    pub fn encode(&mut self, color: Color) -> &EncodedFrame {
        encode_into(color, &mut self.frame);
        &self.frame
    }

    /// Encodes and transmits `color`, blocking until the transfer completes.
    pub fn set_color(&mut self, color: Color) -> Result<(), EncoderError> {
        match self.state {
            EncoderState::Ready => {}
            EncoderState::Uninitialized => return Err(EncoderError::NotInitialized),
            EncoderState::Failed(_) => return Err(EncoderError::DeviceNotReady),
        }

        encode_into(color, &mut self.frame);
        self.spi.write(&self.frame).map_err(transmit_error)?;
        self.spi.flush().map_err(transmit_error)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EncoderState {
        self.state
    }

    /// Returns true if frames can be transmitted.
    pub fn is_ready(&self) -> bool {
        self.state == EncoderState::Ready
    }

    /// The SPI configuration in use.
    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// The most recently encoded frame.
    pub fn frame(&self) -> &EncodedFrame {
        &self.frame
    }

    /// Releases the SPI peripheral.
    pub fn release(self) -> S {
        self.spi
    }
}

fn transmit_error<E: embedded_hal::spi::Error>(err: E) -> EncoderError {
    EncoderError::Transmit(err.kind())
}

impl<S: SpiTransmitter> RgbLed for Ws2812Encoder<S> {
    fn set_color(&mut self, color: Color) -> Result<(), EncoderError> {
        Ws2812Encoder::set_color(self, color)
    }
}
