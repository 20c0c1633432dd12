// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parser and serializer for `application/x-www-form-urlencoded`
//! (<https://url.spec.whatwg.org/#application/x-www-form-urlencoded>).
//!
//! Converts between a query string and a list of name/value pairs. This is
//! the primitive a search-parameters API is built on.

use weburl_percent_encoding::{percent_decode, percent_encode_byte};

/// Parse a query string into name/value pairs.
///
/// Empty `&`-separated pieces are skipped; a piece without `=` becomes a
/// name with an empty value; `+` is a space.
pub fn parse(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| match piece.find('=') {
            Some(position) => (
                decode(&piece[..position]),
                decode(&piece[position + 1..]),
            ),
            None => (decode(piece), String::new()),
        })
        .collect()
}

fn decode(input: &str) -> String {
    let replaced: Vec<u8> = input
        .bytes()
        .map(|byte| if byte == b'+' { b' ' } else { byte })
        .collect();
    String::from_utf8_lossy(&percent_decode(&replaced)).into_owned()
}

/// Serialize name/value pairs as a query string.
pub fn serialize<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut output = String::new();
    for (name, value) in pairs {
        if !output.is_empty() {
            output.push('&');
        }
        byte_serialize(name, &mut output);
        output.push('=');
        byte_serialize(value, &mut output);
    }
    output
}

/// The serializer's byte-level escaping: space becomes `+`, ASCII
/// alphanumerics and `*-._` stay, everything else is percent-encoded.
pub fn byte_serialize(input: &str, output: &mut String) {
    for byte in input.bytes() {
        match byte {
            b' ' => output.push('+'),
            b'*' | b'-' | b'.' | b'_' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' => {
                output.push(byte as char)
            }
            _ => percent_encode_byte(byte, output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pairs() {
        assert_eq!(
            parse("a=b&c=d"),
            vec![("a".to_owned(), "b".to_owned()), ("c".to_owned(), "d".to_owned())]
        );
        assert_eq!(parse("a=b&&c"), vec![
            ("a".to_owned(), "b".to_owned()),
            ("c".to_owned(), String::new()),
        ]);
        assert_eq!(parse("key+name=val%26ue"), vec![
            ("key name".to_owned(), "val&ue".to_owned()),
        ]);
        assert_eq!(parse(""), vec![]);
    }

    #[test]
    fn serialize_pairs() {
        assert_eq!(serialize(vec![("a", "b"), ("c d", "&e")]), "a=b&c+d=%26e");
        assert_eq!(serialize(vec![("ünï", "*-._")]), "%C3%BCn%C3%AF=*-._");
        assert_eq!(serialize(Vec::new()), "");
    }

    #[test]
    fn round_trip() {
        let pairs = vec![("na me", "v&l=e"), ("emoji", "\u{1F600}")];
        let encoded = serialize(pairs.clone());
        let decoded = parse(&encoded);
        assert_eq!(
            decoded,
            pairs
                .into_iter()
                .map(|(n, v)| (n.to_owned(), v.to_owned()))
                .collect::<Vec<_>>()
        );
    }
}
