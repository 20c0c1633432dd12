// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt::{self, Formatter};

use weburl_idna as idna;
use weburl_percent_encoding::{from_hex, percent_decode, utf8_percent_encode, C0_CONTROL};

use crate::parser::{is_url_code_point, ParseError, SyntaxViolation};

/// The host name of a URL.
#[derive(PartialEq, Eq, Clone, Debug, Hash, PartialOrd, Ord)]
pub enum Host {
    /// A (DNS) domain name, in its ASCII (possibly Punycode) form.
    Domain(String),

    /// An IPv4 address.
    Ipv4(Ipv4Address),

    /// An IPv6 address, serialized inside `[...]` square brackets so that
    /// `:` colons in the address are not ambiguous with the port delimiter.
    Ipv6(Ipv6Address),

    /// The percent-encoded host of a URL with a non-special scheme, which is
    /// never interpreted as a domain or address.
    Opaque(String),

    /// The empty host, as in `file:///some/path`. Distinct from no host at
    /// all (`mailto:` URLs have none).
    Empty,
}

/// A 32 bit IPv4 address.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
pub struct Ipv4Address {
    pub number: u32,
}

/// A 128 bit IPv6 address, as eight 16 bit pieces.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, PartialOrd, Ord)]
pub struct Ipv6Address {
    pub pieces: [u16; 8],
}

/// How parsing the text between `[` and `]` as an IPv6 address can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ipv6ParseError {
    /// A lone `:` at the start; a leading colon must be part of `::`.
    DoesNotStartWithDoubleColon,
    /// A piece is malformed, or there are too many of them.
    InvalidPiece,
    /// Fewer than eight pieces without a `::` to make up the difference,
    /// or more than one `::`.
    CompressExpected,
    /// A dotted segment of the IPv4 tail has no digits.
    EmptyIpv4Segment,
    /// A dotted segment of the IPv4 tail is out of range or zero-padded.
    InvalidIpv4SegmentNumber,
}

/// Code points that may not appear in an opaque host.
fn is_forbidden_host_code_point(c: char) -> bool {
    matches!(
        c,
        '\0'..='\u{1F}'
            | ' '
            | '#'
            | '/'
            | ':'
            | '<'
            | '>'
            | '?'
            | '@'
            | '['
            | '\\'
            | ']'
            | '^'
            | '|'
    )
}

/// Code points that may not appear in a domain, even percent-encoded.
fn is_forbidden_domain_code_point(c: char) -> bool {
    matches!(
        c,
        '\0' | '\t' | '\n' | '\r' | ' ' | '#' | '%' | '/' | ':' | '?' | '@' | '[' | '\\' | ']'
    )
}

impl Host {
    /// Parse a host: an IPv6 address in `[]` square brackets, an opaque host
    /// (when `is_opaque` is true, i.e. the scheme is not special), or a
    /// domain that may turn out to be an IPv4 address.
    pub fn parse(input: &str, is_opaque: bool) -> Result<Host, ParseError> {
        Host::parse_impl(input, is_opaque, &mut |_| {})
    }

    pub(crate) fn parse_impl(
        input: &str,
        is_opaque: bool,
        vfn: &mut dyn FnMut(SyntaxViolation),
    ) -> Result<Host, ParseError> {
        if input.starts_with('[') {
            if !input.ends_with(']') {
                return Err(ParseError::InvalidIpv6Address);
            }
            let address = Ipv6Address::parse(&input[1..input.len() - 1])
                .map_err(|_| ParseError::InvalidIpv6Address)?;
            return Ok(Host::Ipv6(address));
        }
        if is_opaque {
            return Host::parse_opaque(input, vfn);
        }

        let decoded = percent_decode(input.as_bytes());
        let domain =
            String::from_utf8(decoded).map_err(|_| ParseError::CannotDecodeHostPoint)?;
        let ascii_domain =
            idna::domain_to_ascii(&domain).map_err(|_| ParseError::DomainError)?;
        if ascii_domain.is_empty() || ascii_domain.chars().any(is_forbidden_domain_code_point) {
            return Err(ParseError::DomainError);
        }
        match Ipv4Address::parse_impl(&ascii_domain, vfn)? {
            Some(address) => Ok(Host::Ipv4(address)),
            None => Ok(Host::Domain(ascii_domain)),
        }
    }

    fn parse_opaque(
        input: &str,
        vfn: &mut dyn FnMut(SyntaxViolation),
    ) -> Result<Host, ParseError> {
        if input.is_empty() {
            return Ok(Host::Empty);
        }
        if input.chars().any(is_forbidden_host_code_point) {
            return Err(ParseError::ForbiddenHostPoint);
        }
        for (index, c) in input.char_indices() {
            if c == '%' {
                if !weburl_percent_encoding::is_percent_encoded(&input[index..]) {
                    vfn(SyntaxViolation::PercentDecode)
                }
            } else if !is_url_code_point(c) {
                vfn(SyntaxViolation::NonUrlCodePoint)
            }
        }
        Ok(Host::Opaque(utf8_percent_encode(input, &C0_CONTROL)))
    }

    /// Serialize the host as it appears in a URL.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Host::Domain(domain) | Host::Opaque(domain) => f.write_str(domain),
            Host::Ipv4(address) => write!(f, "{}", address),
            Host::Ipv6(address) => write!(f, "[{}]", address),
            Host::Empty => Ok(()),
        }
    }
}

impl Ipv4Address {
    /// Parse a dotted IPv4 address with 1 to 4 parts in decimal, octal
    /// (leading `0`) or hexadecimal (leading `0x`) notation.
    ///
    /// `Ok(None)` means the input is not shaped like an IPv4 address at all
    /// and is to be kept as a domain. Numeric input whose value is out of
    /// range fails hard instead.
    pub fn parse(input: &str) -> Result<Option<Ipv4Address>, ParseError> {
        Ipv4Address::parse_impl(input, &mut |_| {})
    }

    pub(crate) fn parse_impl(
        input: &str,
        vfn: &mut dyn FnMut(SyntaxViolation),
    ) -> Result<Option<Ipv4Address>, ParseError> {
        let mut parts: Vec<&str> = input.split('.').collect();
        if parts.len() >= 2 && parts.last() == Some(&"") {
            vfn(SyntaxViolation::EmptyIpv4Part);
            parts.pop();
        }
        if parts.len() > 4 {
            return Ok(None);
        }

        let mut numbers = Vec::with_capacity(parts.len());
        for part in &parts {
            match parse_ipv4_number(part) {
                Some(number) => numbers.push(number),
                None => return Ok(None),
            }
        }

        let (&last, rest) = match numbers.split_last() {
            Some(split) => split,
            None => return Ok(None),
        };
        if rest.iter().any(|&number| number > 255) {
            return Err(ParseError::InvalidIpv4Address);
        }
        // The last part fills the remaining low-order octets
        if last >= 256u64.pow(4 - rest.len() as u32) {
            return Err(ParseError::InvalidIpv4Address);
        }

        let mut number = last as u32;
        for (counter, &part) in rest.iter().enumerate() {
            number += (part as u32) << (8 * (3 - counter));
        }
        Ok(Some(Ipv4Address { number }))
    }
}

/// An `ipv4-number`: `0x` selects base 16, a leading `0` base 8, otherwise
/// base 10; the empty string is zero. `None` means not a number (and the
/// whole input is not an IPv4 address).
fn parse_ipv4_number(input: &str) -> Option<u64> {
    let (digits, radix) = if input.starts_with("0x") || input.starts_with("0X") {
        (&input[2..], 16)
    } else if input.len() >= 2 && input.starts_with('0') {
        (&input[1..], 8)
    } else {
        (input, 10)
    };
    let mut value: u64 = 0;
    for c in digits.chars() {
        let digit = u64::from(c.to_digit(radix)?);
        // Saturate rather than wrap; any saturated value is out of range
        value = value.saturating_mul(u64::from(radix)).saturating_add(digit);
    }
    Some(value)
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.number >> 24,
            (self.number >> 16) & 0xFF,
            (self.number >> 8) & 0xFF,
            self.number & 0xFF
        )
    }
}

impl Ipv6Address {
    /// Parse an IPv6 address, without the `[]` square brackets.
    pub fn parse(input: &str) -> Result<Ipv6Address, Ipv6ParseError> {
        let input = input.as_bytes();
        let len = input.len();
        let mut pieces = [0u16; 8];
        let mut piece_index = 0;
        let mut compress = None;
        let mut is_ipv4_tail = false;
        let mut i = 0;

        if input.first() == Some(&b':') {
            if input.get(1) != Some(&b':') {
                return Err(Ipv6ParseError::DoesNotStartWithDoubleColon);
            }
            i = 2;
            piece_index = 1;
            compress = Some(1);
        }

        while i < len {
            if piece_index == 8 {
                return Err(Ipv6ParseError::InvalidPiece);
            }
            if input[i] == b':' {
                if compress.is_some() {
                    return Err(Ipv6ParseError::CompressExpected);
                }
                i += 1;
                piece_index += 1;
                compress = Some(piece_index);
                continue;
            }

            let start = i;
            let end = len.min(start + 4);
            let mut value = 0u16;
            while i < end {
                match from_hex(input[i]) {
                    Some(digit) => {
                        value = value * 0x10 + u16::from(digit);
                        i += 1;
                    }
                    None => break,
                }
            }
            if i < len {
                match input[i] {
                    b'.' => {
                        if i == start {
                            return Err(Ipv6ParseError::EmptyIpv4Segment);
                        }
                        // Re-read the digits as the first dotted segment
                        i = start;
                        is_ipv4_tail = true;
                    }
                    b':' => {
                        i += 1;
                        if i == len {
                            return Err(Ipv6ParseError::InvalidPiece);
                        }
                    }
                    _ => return Err(Ipv6ParseError::InvalidPiece),
                }
            }
            if is_ipv4_tail {
                break;
            }
            pieces[piece_index] = value;
            piece_index += 1;
        }

        if is_ipv4_tail {
            // The embedded IPv4 address takes the last two pieces
            if piece_index > 6 {
                return Err(Ipv6ParseError::InvalidPiece);
            }
            let mut numbers_seen = 0;
            while i < len {
                if numbers_seen > 0 {
                    if input[i] == b'.' && numbers_seen < 4 {
                        i += 1;
                    } else {
                        return Err(Ipv6ParseError::InvalidIpv4SegmentNumber);
                    }
                }
                let mut segment: Option<u16> = None;
                while i < len && input[i].is_ascii_digit() {
                    let digit = u16::from(input[i] - b'0');
                    segment = match segment {
                        None => Some(digit),
                        // Zero-padded segments are not allowed
                        Some(0) => return Err(Ipv6ParseError::InvalidIpv4SegmentNumber),
                        Some(value) => {
                            let value = value * 10 + digit;
                            if value > 255 {
                                return Err(Ipv6ParseError::InvalidIpv4SegmentNumber);
                            }
                            Some(value)
                        }
                    };
                    i += 1;
                }
                let segment = match segment {
                    Some(segment) => segment,
                    None => return Err(Ipv6ParseError::EmptyIpv4Segment),
                };
                pieces[piece_index] = pieces[piece_index] * 0x100 + segment;
                numbers_seen += 1;
                if numbers_seen == 2 || numbers_seen == 4 {
                    piece_index += 1;
                }
            }
            if numbers_seen != 4 {
                return Err(Ipv6ParseError::EmptyIpv4Segment);
            }
        }

        match compress {
            Some(compress) => {
                // Shift everything after the compression point to the high
                // end, zero-filling the gap
                let mut swaps = piece_index - compress;
                let mut index = 7;
                while swaps > 0 {
                    pieces.swap(index, compress + swaps - 1);
                    index -= 1;
                    swaps -= 1;
                }
            }
            None if piece_index != 8 => return Err(Ipv6ParseError::CompressExpected),
            None => {}
        }
        Ok(Ipv6Address { pieces })
    }

    /// Serialize to the canonical shortest form: lowercase hex, the longest
    /// run of two or more zero pieces compressed to `::`.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

fn longest_zero_run(pieces: &[u16; 8]) -> Option<(usize, usize)> {
    let mut longest: Option<(usize, usize)> = None;
    let mut start = None;
    for i in 0..=8 {
        if i < 8 && pieces[i] == 0 {
            start.get_or_insert(i);
        } else if let Some(run_start) = start.take() {
            let run_len = i - run_start;
            if run_len >= 2 && longest.map_or(true, |(_, len)| run_len > len) {
                longest = Some((run_start, run_len));
            }
        }
    }
    longest
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let run = longest_zero_run(&self.pieces);
        let mut i = 0;
        let mut needs_separator = false;
        while i < 8 {
            if let Some((start, len)) = run {
                if i == start {
                    f.write_str("::")?;
                    i += len;
                    needs_separator = false;
                    continue;
                }
            }
            if needs_separator {
                f.write_str(":")?;
            }
            write!(f, "{:x}", self.pieces[i])?;
            needs_separator = true;
            i += 1;
        }
        Ok(())
    }
}
