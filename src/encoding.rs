// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Wide-string adapters.
//!
//! The parser works on UTF-8 only; hosts holding URLs as UTF-16 or UTF-32
//! (JavaScript engines, wide-character platforms) convert here first.
//! Invalid input — lone surrogates, out-of-range code points — is rejected
//! rather than replaced, since a URL containing U+FFFD was almost certainly
//! not what the caller meant.

use std::char;

use crate::parser::ParseError;

/// Convert UTF-16 to UTF-8, rejecting unpaired surrogates.
pub fn utf16_to_utf8(input: &[u16]) -> Result<String, ParseError> {
    char::decode_utf16(input.iter().copied())
        .collect::<Result<String, _>>()
        .map_err(|_| ParseError::InvalidUnicodeCharacter)
}

/// Convert UTF-32 to UTF-8, rejecting surrogate and out-of-range values.
pub fn utf32_to_utf8(input: &[u32]) -> Result<String, ParseError> {
    input
        .iter()
        .map(|&value| char::from_u32(value).ok_or(ParseError::InvalidUnicodeCharacter))
        .collect()
}

/// Convert UTF-8 to UTF-16.
pub fn utf8_to_utf16(input: &str) -> Vec<u16> {
    input.encode_utf16().collect()
}

/// Convert UTF-8 to UTF-32.
pub fn utf8_to_utf32(input: &str) -> Vec<u32> {
    input.chars().map(u32::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseError;

    #[test]
    fn utf16_round_trip() {
        let input = "http://example.com/\u{1F30D}";
        let wide = utf8_to_utf16(input);
        assert_eq!(utf16_to_utf8(&wide).as_deref(), Ok(input));
    }

    #[test]
    fn utf32_round_trip() {
        let input = "http://example.com/ünïcode";
        let wide = utf8_to_utf32(input);
        assert_eq!(utf32_to_utf8(&wide).as_deref(), Ok(input));
    }

    #[test]
    fn lone_surrogate() {
        assert_eq!(
            utf16_to_utf8(&[0x68, 0xD800, 0x69]),
            Err(ParseError::InvalidUnicodeCharacter)
        );
        assert_eq!(
            utf32_to_utf8(&[0x68, 0xD800]),
            Err(ParseError::InvalidUnicodeCharacter)
        );
        assert_eq!(
            utf32_to_utf8(&[0x110000]),
            Err(ParseError::InvalidUnicodeCharacter)
        );
    }
}
