// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Punycode ([RFC 3492](https://tools.ietf.org/html/rfc3492)) implementation.
//!
//! The code-point-level algorithms are `encode` and `decode`, with
//! `encode_str` and `decode_to_string` layered on top for `str`/`String`
//! callers.
//!
//! All arithmetic is checked: RFC 3492 requires overflow to be rejected,
//! and `None` comes back whenever an intermediate value would not fit in
//! `u32`. No label short enough for DNS (63 bytes) can overflow.

use std::char;

// Bootstring parameters for the Punycode profile
const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;

fn digit_value(byte: u8) -> Option<u32> {
    match byte {
        b'a'..=b'z' => Some(u32::from(byte - b'a')),
        b'A'..=b'Z' => Some(u32::from(byte - b'A')),
        b'0'..=b'9' => Some(u32::from(byte - b'0') + 26),
        _ => None,
    }
}

fn digit_char(value: u32) -> char {
    match value {
        0..=25 => (value as u8 + b'a') as char,
        26..=35 => (value as u8 - 26 + b'0') as char,
        _ => unreachable!("digit out of range"),
    }
}

/// The digit threshold for variable-length-integer position `step`,
/// clamped to `T_MIN..=T_MAX` around the current bias (RFC 3492 §5).
fn threshold(step: u32, bias: u32) -> u32 {
    if step <= bias + T_MIN {
        T_MIN
    } else if step >= bias + T_MAX {
        T_MAX
    } else {
        step - bias
    }
}

// Bias adaptation, RFC 3492 §6.1
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + (((BASE - T_MIN + 1) * delta) / (delta + SKEW))
}

/// Convert Punycode to a Unicode `String`.
///
/// Returns `None` on malformed input or overflow.
#[inline]
pub fn decode_to_string(input: &str) -> Option<String> {
    decode(input).map(|chars| chars.into_iter().collect())
}

/// Convert Punycode to Unicode.
///
/// Returns `None` on malformed input or overflow.
pub fn decode(input: &str) -> Option<Vec<char>> {
    // Basic code points come verbatim before the last delimiter. A '-' at
    // position zero cannot be a delimiter; it belongs to the encoded part.
    let (basic, encoded) = match input.rfind('-') {
        Some(position) if position > 0 => (&input[..position], &input[position + 1..]),
        _ => ("", input),
    };
    if !basic.is_ascii() {
        return None;
    }
    let mut output: Vec<char> = basic.chars().collect();

    let mut codepoint = INITIAL_N;
    let mut bias = INITIAL_BIAS;
    let mut insert_at: u32 = 0;
    let mut first_delta = true;
    let mut rest = encoded.bytes();

    while rest.len() != 0 {
        // Read one generalized variable-length integer
        let mut delta: u32 = 0;
        let mut scale: u32 = 1;
        let mut step = BASE;
        loop {
            let digit = digit_value(rest.next()?)?;
            delta = delta.checked_add(digit.checked_mul(scale)?)?;
            let cutoff = threshold(step, bias);
            if digit < cutoff {
                break;
            }
            scale = scale.checked_mul(BASE - cutoff)?;
            step += BASE;
        }

        // The delta advances the insertion point through the output, which
        // has one more slot than it has characters; every full wrap moves
        // on to the next code point value
        let slots = output.len() as u32 + 1;
        bias = adapt(delta, slots, first_delta);
        first_delta = false;
        let position = insert_at.checked_add(delta)?;
        codepoint = codepoint.checked_add(position / slots)?;
        insert_at = position % slots;

        output.insert(insert_at as usize, char::from_u32(codepoint)?);
        insert_at += 1;
    }
    Some(output)
}

/// Convert a Unicode `str` to Punycode.
///
/// Returns `None` on overflow.
#[inline]
pub fn encode_str(input: &str) -> Option<String> {
    let mut output = String::with_capacity(input.len());
    encode_into(input.chars(), &mut output).map(|()| output)
}

/// Convert Unicode to Punycode.
///
/// Returns `None` on overflow.
pub fn encode(input: &[char]) -> Option<String> {
    let mut output = String::with_capacity(input.len());
    encode_into(input.iter().copied(), &mut output).map(|()| output)
}

/// Emit `value` as a generalized variable-length integer (RFC 3492 §6.3,
/// the inner digit loop).
fn push_varint(mut value: u32, bias: u32, output: &mut String) {
    let mut step = BASE;
    loop {
        let cutoff = threshold(step, bias);
        if value < cutoff {
            break;
        }
        output.push(digit_char(cutoff + (value - cutoff) % (BASE - cutoff)));
        value = (value - cutoff) / (BASE - cutoff);
        step += BASE;
    }
    output.push(digit_char(value));
}

fn encode_into<I>(input: I, output: &mut String) -> Option<()>
where
    I: Iterator<Item = char> + Clone,
{
    // Basic (ASCII) code points are emitted as-is, up front
    let mut total: u32 = 0;
    let mut basic_count: u32 = 0;
    for c in input.clone() {
        total = total.checked_add(1)?;
        if c.is_ascii() {
            output.push(c);
            basic_count += 1;
        }
    }
    if basic_count > 0 {
        output.push('-');
    }

    // Insert the remaining code points smallest-first, each round encoding
    // the accumulated distance from the previous decoder state as deltas
    let mut current = INITIAL_N;
    let mut pending: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut done = basic_count;
    while done < total {
        let next = input
            .clone()
            .map(u32::from)
            .filter(|&c| c >= current)
            .min()?;
        pending = pending.checked_add((next - current).checked_mul(done + 1)?)?;
        current = next;

        for c in input.clone().map(u32::from) {
            if c < current {
                pending = pending.checked_add(1)?;
            } else if c == current {
                push_varint(pending, bias, output);
                bias = adapt(pending, done + 1, done == basic_count);
                pending = 0;
                done += 1;
            }
        }
        pending = pending.checked_add(1)?;
        current = current.checked_add(1)?;
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sample strings from RFC 3492 §7.1
    #[test]
    fn rfc_samples() {
        let cases: &[(&str, &str)] = &[
            ("\u{4ED6}\u{4EEC}\u{4E3A}\u{4EC0}\u{4E48}\u{4E0D}\u{8BF4}\u{4E2D}\u{6587}",
             "ihqwcrb4cv8a8dqg056pqjye"),
            ("\u{30D1}\u{30D5}\u{30A3}\u{30FC}de\u{30EB}\u{30F3}\u{30D0}",
             "de-jg4avhby1noc0d"),
            ("3\u{5E74}B\u{7D44}\u{91D1}\u{516B}\u{5148}\u{751F}",
             "3B-ww4c5e180e575a65lsy2b"),
            ("-> $1.00 <-", "-> $1.00 <--"),
        ];
        for &(decoded, encoded) in cases {
            assert_eq!(encode_str(decoded).as_deref(), Some(encoded));
            assert_eq!(decode_to_string(encoded).as_deref(), Some(decoded));
        }
    }

    #[test]
    fn pure_ascii() {
        assert_eq!(decode_to_string("abc-").as_deref(), Some("abc"));
        assert_eq!(encode_str("abc").as_deref(), Some("abc-"));
    }

    #[test]
    fn malformed() {
        // Non-digit in the encoded part
        assert_eq!(decode("bcher-_kva"), None);
        // A '9' digit (value 35) is always at or above the threshold, so
        // this either runs off the end of the input or overflows
        assert_eq!(decode("999999999"), None);
        // A leading delimiter belongs to the encoded part
        assert_eq!(decode("-foo"), None);
    }
}
