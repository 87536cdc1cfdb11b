#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Color`**: An 8-bit RGB triple (`palette::Srgb<u8>`)
//! - **`Ws2812Encoder`**: Turns a color into a 74-byte SPI frame and transmits it
//! - **`SpiTransmitter`**: Trait to implement for your SPI peripheral
//! - **`RgbLed`**: Anything that can display one color; implemented by the encoder
//! - **`LineScanner`**: Assembles received bytes into command lines
//! - **`parse_command`**: Turns a `C:<r>,<g>,<b>` line into a `Command`
//! - **`CommandQueue`**: Bounded, non-blocking handoff from interrupt to consumer
//! - **`Producer`** / **`Consumer`**: The interrupt and task halves of the pipeline
//! - **`Bridge`**: Initializes the LED, binds the producer and runs the consumer
//!
//! Nothing on the producer path blocks, allocates or logs. The SPI transfer
//! only ever happens on the consumer context.

#[macro_use]
mod fmt;

pub mod colors;
pub mod command;
pub mod config;
pub mod encoder;
pub mod parser;
pub mod pipeline;
pub mod queue;
pub mod scanner;
pub mod types;

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub use command::Command;
pub use config::{BitOrder, ConfigError, SpiConfig};
pub use encoder::{
    EncoderState, RgbLed, SpiTransmitter, Ws2812Encoder, decode_frame, encode_into,
};
pub use parser::parse_command;
pub use pipeline::{Bridge, ByteOutcome, Consumer, ConsumerReport, Producer, ProducerStats};
pub use queue::{CommandQueue, IsrCommandQueue};
pub use scanner::{LineScanner, ScanEvent};
pub use types::{Cancelled, Color, EncodedFrame, EncoderError, ParseError};
