//! Integration tests for the producer, consumer and bridge

mod common;
use common::*;

use std::thread;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use ws2812_bridge::colors::OFF;
use ws2812_bridge::{
    Bridge, ByteOutcome, Color, Command, CommandQueue, Consumer, ConsumerReport, EncoderError,
    Producer, ProducerStats, Ws2812Encoder, decode_frame,
};

type Queue<const N: usize> = CommandQueue<CriticalSectionRawMutex, N>;

fn frame_colors(spi: &MockSpi) -> Vec<Color> {
    spi.writes
        .iter()
        .map(|bytes| {
            let frame: [u8; 74] = bytes.as_slice().try_into().unwrap();
            decode_frame(&frame).unwrap()
        })
        .collect()
}

// ============================================================================
// Producer
// ============================================================================

#[test]
fn producer_enqueues_one_command_per_line() {
    let queue = Queue::<4>::new();
    let mut producer = Producer::new(&queue);

    let outcomes: Vec<_> = b"C:255,0,0\n".iter().map(|&b| producer.on_byte(b)).collect();

    assert_eq!(
        outcomes.last(),
        Some(&ByteOutcome::Enqueued(Command::new(255, 0, 0)))
    );
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.try_pop(), Some(Command::new(255, 0, 0)));
}

#[test]
fn producer_drains_rx_fifo_and_counts_outcomes() {
    let queue = Queue::<2>::new();
    let mut producer = Producer::new(&queue);

    let mut input = b"C:1,1,1\nbogus\r\n".to_vec();
    input.extend_from_slice(&[b'z'; 64]);
    input.extend_from_slice(b"C:2,2,2\nC:3,3,3\n");
    let mut rx = MockRx::new(&input);

    let consumed = producer.on_rx_interrupt(&mut rx);

    assert_eq!(consumed, input.len());
    assert_eq!(rx.remaining(), 0);
    assert_eq!(
        producer.stats(),
        ProducerStats {
            bytes: input.len() as u32,
            enqueued: 2,
            dropped: 1,
            malformed: 1,
            overflows: 1,
        }
    );
    assert_eq!(queue.dropped(), 1);
    assert_eq!(queue.try_pop(), Some(Command::new(1, 1, 1)));
    assert_eq!(queue.try_pop(), Some(Command::new(2, 2, 2)));
    assert_eq!(queue.try_pop(), None);
}

#[test]
fn producer_reports_dropped_command_when_queue_full() {
    let queue = Queue::<1>::new();
    let mut producer = Producer::new(&queue);

    let mut rx = MockRx::new(b"C:1,2,3\n");
    producer.on_rx_interrupt(&mut rx);

    let outcomes: Vec<_> = b"C:4,5,6\n".iter().map(|&b| producer.on_byte(b)).collect();
    assert_eq!(
        outcomes.last(),
        Some(&ByteOutcome::Dropped(Command::new(4, 5, 6)))
    );
    assert_eq!(queue.len(), 1);
}

#[test]
fn empty_fifo_consumes_nothing() {
    let queue = Queue::<1>::new();
    let mut producer = Producer::new(&queue);
    let mut rx = MockRx::new(b"");

    assert_eq!(producer.on_rx_interrupt(&mut rx), 0);
    assert_eq!(producer.stats(), ProducerStats::default());
}

// ============================================================================
// Consumer
// ============================================================================

#[test]
fn consumer_sets_color_once_per_command_in_order() {
    let queue = Queue::<8>::new();
    let commands = [
        Command::new(255, 0, 0),
        Command::new(0, 255, 0),
        Command::new(0, 0, 255),
        Command::new(0, 0, 255),
    ];
    for command in commands {
        assert!(queue.try_push(command));
    }
    queue.shutdown();

    let mut consumer = Consumer::new(&queue, RecordingLed::new());
    let report = consumer.run();

    assert_eq!(report, ConsumerReport { applied: 4, failed: 0 });
    let colors: Vec<_> = commands.iter().map(|c| c.color).collect();
    assert_eq!(consumer.into_led().colors, colors);
}

#[test]
fn consumer_counts_led_failures_and_keeps_going() {
    let queue = Queue::<4>::new();
    queue.try_push(Command::new(1, 2, 3));
    queue.try_push(Command::new(4, 5, 6));
    queue.shutdown();

    let mut led = RecordingLed::new();
    led.fail = true;
    let mut consumer = Consumer::new(&queue, led);

    assert_eq!(consumer.run(), ConsumerReport { applied: 0, failed: 2 });
    assert!(queue.is_empty());
}

#[test]
fn consumer_and_producer_on_separate_threads() {
    let queue = Queue::<4>::new();
    let mut input = Vec::new();
    for i in 0..50u8 {
        input.extend_from_slice(Command::new(i, 0, 255 - i).to_line().as_bytes());
    }

    let (stats, led) = thread::scope(|s| {
        let consumer = s.spawn(|| {
            let mut consumer = Consumer::new(&queue, RecordingLed::new());
            consumer.run();
            consumer.into_led()
        });

        let producer = s.spawn(|| {
            let mut producer = Producer::new(&queue);
            for &byte in &input {
                producer.on_byte(byte);
                thread::yield_now();
            }
            queue.shutdown();
            producer.stats()
        });

        (producer.join().unwrap(), consumer.join().unwrap())
    });

    assert_eq!(stats.enqueued + stats.dropped, 50);
    assert_eq!(led.colors.len() as u32, stats.enqueued);

    // Whatever got through arrives in send order without duplicates
    let reds: Vec<u8> = led.colors.iter().map(|c| c.red).collect();
    assert!(reds.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn async_consumer_drains_queue() {
    let queue = Queue::<4>::new();
    queue.try_push(Command::new(9, 9, 9));
    queue.shutdown();

    let mut consumer = Consumer::new(&queue, RecordingLed::new());
    let report = embassy_futures::block_on(consumer.run_async());

    assert_eq!(report.applied, 1);
    assert_eq!(consumer.led().colors, [Color::new(9, 9, 9)]);
}

// ============================================================================
// Bridge
// ============================================================================

#[test]
fn bridge_blanks_led_then_applies_received_commands() {
    let queue = Queue::<4>::new();
    let bridge = Bridge::new(&queue, Ws2812Encoder::new(MockSpi::new()));

    let report = thread::scope(|s| {
        bridge.start(|mut producer| {
            s.spawn(move || {
                let mut rx = MockRx::new(b"C:255,0,0\nC:0,0,255\n");
                producer.on_rx_interrupt(&mut rx);
                producer.queue().shutdown();
            });
        })
    });

    assert_eq!(report, Ok(ConsumerReport { applied: 2, failed: 0 }));
}

#[test]
fn bridge_binds_a_fresh_producer_once() {
    let queue = Queue::<4>::new();
    queue.try_push(Command::new(10, 20, 30));
    queue.shutdown();

    let mut binds = Vec::new();
    let bridge = Bridge::new(&queue, Ws2812Encoder::new(MockSpi::new()));
    let report = bridge.start(|producer| binds.push(producer.stats()));

    assert_eq!(report, Ok(ConsumerReport { applied: 1, failed: 0 }));
    assert_eq!(binds, [ProducerStats::default()]);
}

#[test]
fn blanked_encoder_frames_decode_in_command_order() {
    let queue = Queue::<4>::new();
    queue.try_push(Command::new(10, 20, 30));
    queue.try_push(Command::new(1, 2, 3));
    queue.shutdown();

    let mut consumer = Consumer::new(&queue, {
        let mut encoder = Ws2812Encoder::new(MockSpi::new());
        encoder.initialize().unwrap();
        encoder.set_color(OFF).unwrap();
        encoder
    });
    consumer.run();

    let spi = consumer.into_led().release();
    assert_eq!(
        frame_colors(&spi),
        [OFF, Color::new(10, 20, 30), Color::new(1, 2, 3)]
    );
}

#[test]
fn bridge_with_unready_device_never_binds() {
    let queue = Queue::<4>::new();
    let bridge = Bridge::new(&queue, Ws2812Encoder::new(MockSpi::not_ready()));

    let mut bound = false;
    let result = bridge.start(|_| bound = true);

    assert_eq!(result, Err(EncoderError::DeviceNotReady));
    assert!(!bound);
}

#[test]
fn bridge_async_start() {
    let queue = Queue::<4>::new();
    queue.try_push(Command::new(5, 6, 7));
    queue.shutdown();

    let bridge = Bridge::new(&queue, Ws2812Encoder::new(MockSpi::new()));
    let report = embassy_futures::block_on(bridge.start_async(|_| {}));

    assert_eq!(report, Ok(ConsumerReport { applied: 1, failed: 0 }));
}
