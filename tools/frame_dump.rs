//! Frame dump utility for ws2812-bridge
//!
//! Runs command lines through the same scanner, parser and encoder the
//! firmware uses and prints the SPI frame each one produces. Handy for
//! checking a sender script against a logic analyzer capture.
//!
//! Usage:
//!   cd tools
//!   cargo run --bin frame_dump -- "C:255,0,0" "C:0,0,255"
//!   printf 'C:1,2,3\n' | cargo run --bin frame_dump
//!   cargo run --bin frame_dump -- --sizes

use std::io::{self, BufRead, Write};
use std::mem::size_of;

use critical_section as _;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use ws2812_bridge::config::{BITS_PER_PIXEL, FRAME_LEN, SPI_FREQUENCY_HZ};
use ws2812_bridge::{
    Command, CommandQueue, EncodedFrame, LineScanner, ScanEvent, SpiConfig, decode_frame,
    encode_into,
};

fn dump_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    let mut scanner: LineScanner = LineScanner::new();
    let mut event = ScanEvent::Idle;
    for &byte in line.as_bytes().iter().chain(b"\n") {
        event = scanner.feed(byte);
        if event == ScanEvent::Overflow {
            break;
        }
    }

    match event {
        ScanEvent::Command(command) => dump_command(out, line, command),
        ScanEvent::Malformed => writeln!(out, "{line:?}: not a command"),
        ScanEvent::Overflow => writeln!(out, "{line:?}: line too long, discarded"),
        ScanEvent::Pending | ScanEvent::Idle => Ok(()),
    }
}

fn dump_command(out: &mut impl Write, line: &str, command: Command) -> io::Result<()> {
    let mut frame: EncodedFrame = [0; FRAME_LEN];
    encode_into(command.color, &mut frame);

    let color = command.color;
    writeln!(
        out,
        "{line:?} -> rgb({}, {}, {})",
        color.red, color.green, color.blue
    )?;

    for (name, chunk) in ["G", "R", "B"].iter().zip(frame[..BITS_PER_PIXEL].chunks(8)) {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02X}")).collect();
        writeln!(out, "  {name}: {}", hex.join(" "))?;
    }
    writeln!(out, "  reset: {} x 00", FRAME_LEN - BITS_PER_PIXEL)?;

    if decode_frame(&frame) != Some(color) {
        writeln!(out, "  warning: frame does not decode back to the same color")?;
    }
    Ok(())
}

fn dump_sizes(out: &mut impl Write) -> io::Result<()> {
    let config = SpiConfig::default();
    writeln!(out, "SPI clock:        {} Hz", SPI_FREQUENCY_HZ)?;
    writeln!(out, "Reset low time:   {} ns", config.reset_duration_ns())?;
    writeln!(out, "Frame:            {} bytes", size_of::<EncodedFrame>())?;
    writeln!(out, "Command:          {} bytes", size_of::<Command>())?;
    writeln!(out, "LineScanner:      {} bytes", size_of::<LineScanner>())?;
    writeln!(
        out,
        "CommandQueue:     {} bytes",
        size_of::<CommandQueue<CriticalSectionRawMutex>>()
    )
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.iter().any(|a| a == "--sizes") {
        return dump_sizes(&mut out);
    }

    if args.is_empty() {
        for line in io::stdin().lock().lines() {
            dump_line(&mut out, line?.trim_end())?;
        }
    } else {
        for line in &args {
            dump_line(&mut out, line)?;
        }
    }
    Ok(())
}
