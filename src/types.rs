//! Core value and error types shared across the pipeline.

use crate::config::ConfigError;
use embedded_hal::spi::ErrorKind;
use palette::Srgb;

/// An 8-bit-per-channel RGB color.
pub type Color = Srgb<u8>;

/// Encoded SPI frame for a single pixel followed by the reset segment.
pub type EncodedFrame = [u8; crate::config::FRAME_LEN];

/// Encoder errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderError {
    /// The SPI peripheral could not be claimed or configured.
    ///
    /// Terminal: the encoder never transmits afterwards.
    DeviceNotReady,

    /// `set_color` called before `initialize`.
    NotInitialized,

    /// The SPI configuration cannot produce a valid signal.
    InvalidConfig(ConfigError),

    /// The bus reported an error while writing a frame.
    Transmit(ErrorKind),
}

impl core::fmt::Display for EncoderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncoderError::DeviceNotReady => write!(f, "SPI device not ready"),
            EncoderError::NotInitialized => write!(f, "encoder not initialized"),
            EncoderError::InvalidConfig(err) => write!(f, "invalid SPI configuration: {}", err),
            EncoderError::Transmit(kind) => write!(f, "SPI transmit failed: {}", kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncoderError {}

impl From<ConfigError> for EncoderError {
    fn from(err: ConfigError) -> Self {
        EncoderError::InvalidConfig(err)
    }
}

/// A received line that is not a color command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line does not start with the `C:` prefix.
    Malformed,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::Malformed => write!(f, "malformed command line"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Returned by a queue pop once the queue has been shut down and drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cancelled;

impl core::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "command queue shut down")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Cancelled {}
