// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate assert_matches;

use weburl_idna::{domain_to_ascii, domain_to_ascii_strict, domain_to_unicode, Config, Error};

#[test]
fn ascii_passthrough() {
    assert_eq!(domain_to_ascii("example.com"), Ok("example.com".to_owned()));
    assert_eq!(domain_to_ascii("ex-ample.co2"), Ok("ex-ample.co2".to_owned()));
}

#[test]
fn case_mapping() {
    assert_eq!(domain_to_ascii("EXAMPLE.com"), Ok("example.com".to_owned()));
    assert_eq!(domain_to_ascii("WWW.Example.COM"), Ok("www.example.com".to_owned()));
    // Non-ASCII case folding happens before Punycode
    assert_eq!(domain_to_ascii("BÜCHER.de"), domain_to_ascii("bücher.de"));
}

#[test]
fn punycode_encoding() {
    assert_eq!(domain_to_ascii("bücher.de"), Ok("xn--bcher-kva.de".to_owned()));
    assert_eq!(domain_to_ascii("faß.de"), Ok("xn--fa-hia.de".to_owned()));
    assert_eq!(domain_to_ascii("日本語.jp"), Ok("xn--wgv71a119e.jp".to_owned()));
}

#[test]
fn punycode_label_round_trip() {
    // An xn-- label is decoded, validated, and re-encoded
    assert_eq!(
        domain_to_ascii("xn--bcher-kva.example"),
        Ok("xn--bcher-kva.example".to_owned())
    );
    let (unicode, result) = domain_to_unicode("xn--bcher-kva.example");
    assert!(result.is_ok());
    assert_eq!(unicode, "bücher.example");
}

#[test]
fn malformed_punycode() {
    assert_matches!(domain_to_ascii("xn--999999999.example"), Err(Error::EncodingError));
}

#[test]
fn combining_mark_start() {
    // A label may not begin with a combining mark
    assert_matches!(domain_to_ascii("\u{0301}abc.example"), Err(Error::BadInput));
    assert!(domain_to_ascii("a\u{0301}bc.example").is_ok());
}

#[test]
fn disallowed_code_points() {
    assert_matches!(domain_to_ascii("ab\u{0085}.example"), Err(Error::DisallowedCodePoint));
    assert_matches!(domain_to_ascii("ab\u{2028}c.example"), Err(Error::DisallowedCodePoint));
}

#[test]
fn ignored_code_points() {
    // Soft hyphen and zero-width space are dropped by the mapping
    assert_eq!(domain_to_ascii("exam\u{00AD}ple.com"), Ok("example.com".to_owned()));
    assert_eq!(domain_to_ascii("exam\u{200B}ple.com"), Ok("example.com".to_owned()));
}

#[test]
fn std3_rules() {
    // Without STD3 rules, ASCII symbols pass through; the URL host parser
    // applies its own deny list on top
    assert_eq!(domain_to_ascii("a_b.com"), Ok("a_b.com".to_owned()));
    assert_matches!(domain_to_ascii_strict("a_b.com"), Err(Error::DisallowedCodePoint));
    assert_matches!(domain_to_ascii_strict("a b.com"), Err(Error::DisallowedCodePoint));
}

#[test]
fn dns_length_checks() {
    assert_matches!(domain_to_ascii_strict(""), Err(Error::EmptyString));
    assert_matches!(domain_to_ascii_strict("a..b"), Err(Error::InvalidLength));
    let long_label = "a".repeat(64);
    assert_matches!(
        domain_to_ascii_strict(&format!("{}.com", long_label)),
        Err(Error::InvalidLength)
    );
    let long_domain = format!("{}.{}.{}.{}.com", "a".repeat(63), "b".repeat(63), "c".repeat(63), "d".repeat(63));
    assert_matches!(domain_to_ascii_strict(&long_domain), Err(Error::InvalidLength));
    // A single trailing dot is tolerated
    assert_eq!(domain_to_ascii_strict("example.com."), Ok("example.com.".to_owned()));
    // Without the strict flag there are no length limits
    assert!(domain_to_ascii(&format!("{}.com", long_label)).is_ok());
    assert_eq!(domain_to_ascii(""), Ok(String::new()));
}

#[test]
fn joiners_need_virama() {
    // A zero-width joiner is only meaningful after a virama
    assert_matches!(domain_to_ascii("a\u{200D}b.example"), Err(Error::BadInput));
    // U+094D DEVANAGARI SIGN VIRAMA has combining class 9
    assert!(domain_to_ascii("\u{0915}\u{094D}\u{200D}\u{0937}.example").is_ok());
}

#[test]
fn deviation_characters_nontransitional() {
    // ß maps to itself outside transitional processing
    assert_eq!(domain_to_ascii("faß.de"), Ok("xn--fa-hia.de".to_owned()));
    // but is folded to "ss" with it enabled
    assert_eq!(
        Config::default().transitional_processing(true).to_ascii("faß.de"),
        Ok("fass.de".to_owned())
    );
}

#[test]
fn bidi_rules() {
    assert_eq!(domain_to_ascii_strict("abc"), Ok("abc".to_owned()));
    assert_eq!(domain_to_ascii_strict("123"), Ok("123".to_owned()));
    assert_eq!(domain_to_ascii_strict("אבּג"), Ok("xn--kdb3bdf".to_owned()));
    assert_eq!(domain_to_ascii_strict("ابج"), Ok("xn--mgbcm".to_owned()));
    assert_eq!(domain_to_ascii_strict("abc.ابج"), Ok("abc.xn--mgbcm".to_owned()));
    assert_eq!(
        domain_to_ascii_strict("אבּג.ابج"),
        Ok("xn--kdb3bdf.xn--mgbcm".to_owned())
    );

    // In a bidi domain, a label may not start with a digit
    assert_matches!(domain_to_ascii("0a.\u{05D0}"), Err(Error::BadInput));

    // Bidi characters arriving in Punycode are still subject to the rules
    assert_matches!(domain_to_ascii("xn--0ca24w"), Err(Error::BadInput));
}
