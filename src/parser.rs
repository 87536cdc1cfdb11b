//! Parsing of `C:<r>,<g>,<b>` command lines.
//!
//! Fields are read with C `strtol` rules: leading whitespace is skipped, an
//! optional sign is accepted, and a field with no digits reads as zero
//! without consuming anything. A comma after a field is consumed if present
//! and silently skipped otherwise, so `C:255 0 0` parses the same as
//! `C:255,0,0`. Values are not range-checked; each is truncated to its low
//! eight bits (`300` becomes `44`, `-1` becomes `255`).

use crate::command::Command;
use crate::config::COMMAND_PREFIX;
use crate::types::{Color, ParseError};

/// Parses one command line (without its terminator).
pub fn parse_command(line: &[u8]) -> Result<Command, ParseError> {
    // A NUL ends the line, as it would a C string.
    let line = line.split(|&b| b == 0).next().unwrap_or_default();

    let mut rest = line
        .strip_prefix(COMMAND_PREFIX)
        .ok_or(ParseError::Malformed)?;

    let (red, tail) = parse_long(rest);
    rest = skip_comma(tail);
    let (green, tail) = parse_long(rest);
    rest = skip_comma(tail);
    let (blue, _) = parse_long(rest);

    Ok(Command {
        color: Color::new(red as u8, green as u8, blue as u8),
    })
}

fn skip_comma(input: &[u8]) -> &[u8] {
    input.strip_prefix(b",").unwrap_or(input)
}

/// Reads a base-10 integer the way `strtol` does on a 32-bit target.
///
/// Returns the value and the unparsed remainder. If no digits are found the
/// value is zero and the remainder is the whole input.
fn parse_long(input: &[u8]) -> (i32, &[u8]) {
    let mut rest = input;
    while let [b, tail @ ..] = rest {
        if !is_c_space(*b) {
            break;
        }
        rest = tail;
    }

    let negative = match rest {
        [b'-', tail @ ..] => {
            rest = tail;
            true
        }
        [b'+', tail @ ..] => {
            rest = tail;
            false
        }
        _ => false,
    };

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return (0, input);
    }

    // Magnitude saturates one past i32::MAX so that "-2147483648" still fits.
    let limit = i32::MAX as i64 + 1;
    let magnitude = rest[..digits].iter().fold(0i64, |acc, &d| {
        (acc * 10 + (d - b'0') as i64).min(limit)
    });

    let value = if negative { -magnitude } else { magnitude };
    let value = value.clamp(i32::MIN as i64, i32::MAX as i64) as i32;

    (value, &rest[digits..])
}

/// `isspace` in the C locale.
fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}
