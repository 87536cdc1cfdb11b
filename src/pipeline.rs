//! Receive-to-LED command pipeline.
//!
//! The pipeline has two halves that share only a [`CommandQueue`]:
//!
//! - [`Producer`] runs in the receive interrupt. It drains the UART FIFO,
//!   assembles lines, parses them and pushes commands without ever waiting.
//! - [`Consumer`] runs on an ordinary task or thread. It waits for commands
//!   and hands each one to an [`RgbLed`], which may block for the SPI
//!   transfer.
//!
//! [`Bridge`] wires both halves to a [`Ws2812Encoder`].

use crate::colors::OFF;
use crate::command::Command;
use crate::config::{LINE_CAPACITY, QUEUE_CAPACITY};
use crate::encoder::{RgbLed, SpiTransmitter, Ws2812Encoder};
use crate::queue::CommandQueue;
use crate::scanner::{LineScanner, ScanEvent};
use crate::types::EncoderError;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io::{Read, ReadReady};

/// What happened to one received byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOutcome {
    /// Part of a line, or an empty terminator.
    Pending,
    /// Completed a command that was queued.
    Enqueued(Command),
    /// Completed a command that was dropped because the queue was full.
    Dropped(Command),
    /// Completed a line that is not a command.
    Malformed,
    /// Overran the line buffer; the line was discarded.
    Overflow,
}

/// Counters kept by the producer in place of logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProducerStats {
    pub bytes: u32,
    pub enqueued: u32,
    pub dropped: u32,
    pub malformed: u32,
    pub overflows: u32,
}

/// Interrupt-side half of the pipeline.
pub struct Producer<'q, M: RawMutex, const N: usize = QUEUE_CAPACITY> {
    scanner: LineScanner<LINE_CAPACITY>,
    queue: &'q CommandQueue<M, N>,
    stats: ProducerStats,
}

impl<'q, M: RawMutex, const N: usize> Producer<'q, M, N> {
    /// Creates a producer feeding `queue`.
    pub const fn new(queue: &'q CommandQueue<M, N>) -> Self {
        Self {
            scanner: LineScanner::new(),
            queue,
            stats: ProducerStats {
                bytes: 0,
                enqueued: 0,
                dropped: 0,
                malformed: 0,
                overflows: 0,
            },
        }
    }

    /// Processes one received byte.
    pub fn on_byte(&mut self, byte: u8) -> ByteOutcome {
        self.stats.bytes = self.stats.bytes.wrapping_add(1);

        match self.scanner.feed(byte) {
            ScanEvent::Pending | ScanEvent::Idle => ByteOutcome::Pending,
            ScanEvent::Command(command) => {
                if self.queue.try_push(command) {
                    self.stats.enqueued = self.stats.enqueued.wrapping_add(1);
                    ByteOutcome::Enqueued(command)
                } else {
                    self.stats.dropped = self.stats.dropped.wrapping_add(1);
                    ByteOutcome::Dropped(command)
                }
            }
            ScanEvent::Malformed => {
                self.stats.malformed = self.stats.malformed.wrapping_add(1);
                ByteOutcome::Malformed
            }
            ScanEvent::Overflow => {
                self.stats.overflows = self.stats.overflows.wrapping_add(1);
                ByteOutcome::Overflow
            }
        }
    }

    /// Body of the receive interrupt handler.
    ///
    /// Reads bytes one at a time while `rx` reports data ready and returns
    /// how many were consumed. Read errors end the drain quietly; the next
    /// interrupt picks up where this one stopped.
    pub fn on_rx_interrupt<R: Read + ReadReady>(&mut self, rx: &mut R) -> usize {
        let mut consumed = 0;
        let mut byte = [0u8; 1];

        while let Ok(true) = rx.read_ready() {
            match rx.read(&mut byte) {
                Ok(1) => {
                    self.on_byte(byte[0]);
                    consumed += 1;
                }
                _ => break,
            }
        }

        consumed
    }

    /// Counters since creation.
    pub fn stats(&self) -> ProducerStats {
        self.stats
    }

    /// The queue this producer feeds.
    pub fn queue(&self) -> &'q CommandQueue<M, N> {
        self.queue
    }
}

/// Summary returned when a consumer loop ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    /// Commands shown on the LED.
    pub applied: u32,
    /// Commands the LED rejected.
    pub failed: u32,
}

/// Task-side half of the pipeline.
pub struct Consumer<'q, L: RgbLed, M: RawMutex, const N: usize = QUEUE_CAPACITY> {
    queue: &'q CommandQueue<M, N>,
    led: L,
    report: ConsumerReport,
}

impl<'q, L: RgbLed, M: RawMutex, const N: usize> Consumer<'q, L, M, N> {
    /// Creates a consumer draining `queue` into `led`.
    pub fn new(queue: &'q CommandQueue<M, N>, led: L) -> Self {
        Self {
            queue,
            led,
            report: ConsumerReport::default(),
        }
    }

    /// Applies one command to the LED.
    pub fn apply(&mut self, command: Command) -> Result<(), EncoderError> {
        let color = command.color;
        match self.led.set_color(color) {
            Ok(()) => {
                self.report.applied = self.report.applied.wrapping_add(1);
                debug!(
                    "set color ({}, {}, {})",
                    color.red, color.green, color.blue
                );
                Ok(())
            }
            Err(err) => {
                self.report.failed = self.report.failed.wrapping_add(1);
                warn!("failed to set color: {:?}", err);
                Err(err)
            }
        }
    }

    /// Runs until the queue is shut down, blocking between commands.
    ///
    /// See [`CommandQueue::pop_blocking`] for how the wait behaves with and
    /// without `std`.
    pub fn run(&mut self) -> ConsumerReport {
        while let Ok(command) = self.queue.pop_blocking() {
            let _ = self.apply(command);
        }
        self.finish()
    }

    /// Runs until the queue is shut down, suspending between commands.
    pub async fn run_async(&mut self) -> ConsumerReport {
        while let Ok(command) = self.queue.pop().await {
            let _ = self.apply(command);
        }
        self.finish()
    }

    fn finish(&self) -> ConsumerReport {
        info!(
            "queue shut down: {} applied, {} failed, {} dropped",
            self.report.applied,
            self.report.failed,
            self.queue.dropped()
        );
        self.report
    }

    /// Counters so far.
    pub fn report(&self) -> ConsumerReport {
        self.report
    }

    /// The LED driven by this consumer.
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Returns the LED.
    pub fn into_led(self) -> L {
        self.led
    }
}

/// A WS2812 encoder fed from a receive interrupt.
///
/// # Example
///
/// ```ignore
/// static QUEUE: IsrCommandQueue = IsrCommandQueue::new();
///
/// let bridge = Bridge::new(&QUEUE, Ws2812Encoder::new(spi));
/// bridge.start(|producer| install_uart_handler(producer))?;
/// ```
pub struct Bridge<'q, S: SpiTransmitter, M: RawMutex, const N: usize = QUEUE_CAPACITY> {
    queue: &'q CommandQueue<M, N>,
    encoder: Ws2812Encoder<S>,
}

impl<'q, S: SpiTransmitter, M: RawMutex, const N: usize> Bridge<'q, S, M, N> {
    /// Creates a bridge around an uninitialized encoder.
    pub fn new(queue: &'q CommandQueue<M, N>, encoder: Ws2812Encoder<S>) -> Self {
        Self { queue, encoder }
    }

    /// Initializes the LED, turns it off, hands a [`Producer`] to `bind` and
    /// runs the consumer loop on the calling context.
    ///
    /// `bind` installs the producer in the receive interrupt handler and
    /// returns. Only returns once the queue is shut down, or immediately if
    /// the encoder cannot be initialized, in which case `bind` is never
    /// called.
    ///
    /// The consumer parks its thread between commands only with `std`.
    /// Bare-metal firmware should use [`start_async`](Self::start_async).
    pub fn start<F>(self, bind: F) -> Result<ConsumerReport, EncoderError>
    where
        F: FnOnce(Producer<'q, M, N>),
    {
        let mut consumer = self.prepare(bind)?;
        Ok(consumer.run())
    }

    /// Async variant of [`start`](Self::start) for executor-based firmware.
    pub async fn start_async<F>(self, bind: F) -> Result<ConsumerReport, EncoderError>
    where
        F: FnOnce(Producer<'q, M, N>),
    {
        let mut consumer = self.prepare(bind)?;
        Ok(consumer.run_async().await)
    }

    fn prepare<F>(self, bind: F) -> Result<Consumer<'q, Ws2812Encoder<S>, M, N>, EncoderError>
    where
        F: FnOnce(Producer<'q, M, N>),
    {
        let Self { queue, mut encoder } = self;

        encoder.initialize()?;
        if let Err(err) = encoder.set_color(OFF) {
            warn!("could not blank LED: {:?}", err);
        }

        bind(Producer::new(queue));
        info!("bridge listening for commands");

        Ok(Consumer::new(queue, encoder))
    }
}
