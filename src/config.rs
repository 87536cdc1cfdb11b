//! Protocol constants and peripheral configuration.

/// SPI clock rate. Each SPI byte lasts 2 µs at this rate.
pub const SPI_FREQUENCY_HZ: u32 = 4_000_000;

/// One SPI byte per color bit: 3 channels × 8 bits.
pub const BITS_PER_PIXEL: usize = 24;

/// Zero bytes appended after the pixel to hold the line low (latch).
pub const RESET_BYTES: usize = 50;

/// Total bytes written per color update.
pub const FRAME_LEN: usize = BITS_PER_PIXEL + RESET_BYTES;

/// Minimum low time the LED needs to latch a frame.
pub const RESET_MIN_NS: u64 = 50_000;

/// Size of the receive line buffer, including the terminator slot.
pub const RX_BUFFER_SIZE: usize = 64;

/// Maximum number of content bytes in one command line.
pub const LINE_CAPACITY: usize = RX_BUFFER_SIZE - 1;

/// Default number of commands buffered between the receive interrupt and the
/// consumer.
pub const QUEUE_CAPACITY: usize = 10;

/// Prefix every color command starts with.
pub const COMMAND_PREFIX: &[u8] = b"C:";

/// Order in which bits are shifted out of the SPI peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first.
    MsbFirst,
    /// Least significant bit first.
    LsbFirst,
}

/// SPI settings applied by [`Ws2812Encoder::initialize`](crate::Ws2812Encoder::initialize).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock rate in Hz.
    pub frequency_hz: u32,
    /// Bits per transferred word.
    pub word_size: u8,
    /// Bit order on the wire.
    pub bit_order: BitOrder,
}

impl SpiConfig {
    /// Creates a configuration with the given clock rate, 8-bit words, MSB first.
    pub const fn new(frequency_hz: u32) -> Self {
        Self {
            frequency_hz,
            word_size: 8,
            bit_order: BitOrder::MsbFirst,
        }
    }

    /// Duration of the reset segment at this clock rate, in nanoseconds.
    ///
    /// Returns `u64::MAX` for a zero frequency.
    pub const fn reset_duration_ns(&self) -> u64 {
        if self.frequency_hz == 0 {
            return u64::MAX;
        }
        let bits = (RESET_BYTES as u64) * (self.word_size as u64);
        bits * 1_000_000_000 / (self.frequency_hz as u64)
    }

    /// Checks that the encoded frame will be clocked out correctly.
    ///
    /// The pulse patterns assume 8-bit words shifted out MSB first, and the
    /// reset segment must keep the line low for at least [`RESET_MIN_NS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frequency_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if self.word_size != 8 {
            return Err(ConfigError::UnsupportedWordSize(self.word_size));
        }
        if self.bit_order != BitOrder::MsbFirst {
            return Err(ConfigError::UnsupportedBitOrder);
        }

        let actual_ns = self.reset_duration_ns();
        if actual_ns < RESET_MIN_NS {
            return Err(ConfigError::ResetTooShort {
                actual_ns,
                required_ns: RESET_MIN_NS,
            });
        }

        Ok(())
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::new(SPI_FREQUENCY_HZ)
    }
}

/// Invalid SPI configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock rate of zero.
    ZeroFrequency,

    /// Word size other than 8 bits.
    UnsupportedWordSize(u8),

    /// Bit order other than MSB first.
    UnsupportedBitOrder,

    /// Reset segment too short at the configured rate.
    ResetTooShort {
        /// Reset duration the configuration produces.
        actual_ns: u64,
        /// Minimum the LED requires.
        required_ns: u64,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroFrequency => write!(f, "SPI frequency must be non-zero"),
            ConfigError::UnsupportedWordSize(bits) => {
                write!(f, "unsupported SPI word size: {} bits (expected 8)", bits)
            }
            ConfigError::UnsupportedBitOrder => write!(f, "SPI must shift MSB first"),
            ConfigError::ResetTooShort {
                actual_ns,
                required_ns,
            } => {
                write!(
                    f,
                    "reset segment lasts {} ns, LED requires at least {} ns",
                    actual_ns, required_ns
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
