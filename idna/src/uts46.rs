// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [*Unicode IDNA Compatibility Processing*
//! (Unicode Technical Standard #46)](http://www.unicode.org/reports/tr46/)

use crate::punycode;
use std::{error::Error as StdError, fmt};
use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::char::{canonical_combining_class, is_combining_mark};
use unicode_normalization::UnicodeNormalization;

const PUNYCODE_PREFIX: &str = "xn--";

/// The status a code point holds in the IDNA mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Valid,
    Ignored,
    Mapped,
    Deviation,
    Disallowed,
    DisallowedStd3Valid,
}

/// Default-ignorable code points that the mapping drops entirely.
fn is_ignored(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{034F}'
            | '\u{17B4}'
            | '\u{17B5}'
            | '\u{180B}'..='\u{180D}'
            | '\u{200B}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FE00}'..='\u{FE0F}'
            | '\u{FEFF}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{E0100}'..='\u{E01EF}'
    )
}

/// Code points that may never appear in a domain name, mapped or not:
/// C1 controls, separators, noncharacters, private use, tags.
fn is_disallowed(c: char) -> bool {
    let value = u32::from(c);
    matches!(
        c,
        '\u{0080}'..='\u{009F}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{FDD0}'..='\u{FDEF}'
            | '\u{FFF9}'..='\u{FFFD}'
            | '\u{E0000}'..='\u{E00FF}'
            | '\u{F0000}'..='\u{10FFFF}'
    ) || value & 0xFFFE == 0xFFFE
}

fn char_status(c: char) -> Status {
    match c {
        'a'..='z' | '0'..='9' | '-' | '.' => Status::Valid,
        'A'..='Z' => Status::Mapped,
        '\0'..='\x7F' => Status::DisallowedStd3Valid,
        // Label separators equivalent to FULL STOP, and the capital sharp S,
        // carry fixed replacements
        '\u{3002}' | '\u{FF0E}' | '\u{FF61}' | '\u{1E9E}' => Status::Mapped,
        '\u{00DF}' | '\u{03C2}' | '\u{200C}' | '\u{200D}' => Status::Deviation,
        c if is_ignored(c) => Status::Ignored,
        c if is_disallowed(c) => Status::Disallowed,
        c => {
            // The bulk of the frozen table is case folding plus compatibility
            // decomposition; derive it instead of shipping the table.
            let mut mapped = c.to_lowercase().nfkc();
            if mapped.next() == Some(c) && mapped.next().is_none() {
                Status::Valid
            } else if c.to_lowercase().nfkc().any(|m| m == '.') {
                // A mapping may not introduce a label separator
                Status::Disallowed
            } else {
                Status::Mapped
            }
        }
    }
}

fn push_mapped(c: char, output: &mut String) {
    match c {
        'A'..='Z' => output.push(c.to_ascii_lowercase()),
        '\u{3002}' | '\u{FF0E}' | '\u{FF61}' => output.push('.'),
        '\u{1E9E}' => output.push_str("ss"),
        c => output.extend(c.to_lowercase().nfkc()),
    }
}

fn map_char(c: char, config: Config, output: &mut String, errors: &mut Vec<Error>) {
    match char_status(c) {
        Status::Valid => output.push(c),
        Status::Ignored => {}
        Status::Mapped => push_mapped(c, output),
        Status::Deviation => {
            if config.transitional_processing {
                match c {
                    '\u{00DF}' => output.push_str("ss"),
                    '\u{03C2}' => output.push('\u{03C3}'),
                    _ => {} // the joiners map to nothing
                }
            } else {
                output.push(c)
            }
        }
        Status::Disallowed => {
            errors.push(Error::DisallowedCodePoint);
            output.push(c);
        }
        Status::DisallowedStd3Valid => {
            if config.use_std3_ascii_rules {
                errors.push(Error::DisallowedCodePoint);
            }
            output.push(c)
        }
    }
}

/// Whether the joiner at byte `index` directly follows a virama
/// (canonical combining class 9), per the ContextJ rules of RFC 5892.
fn follows_virama(label: &str, index: usize) -> bool {
    label[..index]
        .chars()
        .next_back()
        .map_or(false, |prev| canonical_combining_class(prev) == 9)
}

/// Check the validity criteria for a single label.
///
/// NFC (V1) is checked by the caller; bidi (V8) is checked over the whole
/// domain once all labels are known.
///
/// <http://www.unicode.org/reports/tr46/#Validity_Criteria>
fn is_valid(label: &str, config: Config) -> bool {
    let first = match label.chars().next() {
        None => return true,
        Some(c) => c,
    };
    // V3; V2 (hyphens in positions 3 and 4) is not enforced, in line with
    // https://github.com/whatwg/url/issues/53
    if config.check_hyphens && (label.starts_with('-') || label.ends_with('-')) {
        return false;
    }
    // V5
    if is_combining_mark(first) {
        return false;
    }
    // V6, plus ContextJ for the zero-width joiners
    for (index, c) in label.char_indices() {
        match char_status(c) {
            Status::Valid => {}
            Status::Deviation => {
                if config.transitional_processing {
                    return false;
                }
                if matches!(c, '\u{200C}' | '\u{200D}') && !follows_virama(label, index) {
                    return false;
                }
            }
            Status::DisallowedStd3Valid => {
                if config.use_std3_ascii_rules {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

fn is_bidi_label(label: &str) -> bool {
    label
        .chars()
        .any(|c| matches!(bidi_class(c), BidiClass::R | BidiClass::AL | BidiClass::AN))
}

/// The bidi class of the last code point that is not a non-spacing mark.
fn trailing_class(label: &str) -> Option<BidiClass> {
    label
        .chars()
        .rev()
        .map(bidi_class)
        .find(|&class| class != BidiClass::NSM)
}

// RFC 5893 §2. The rules only bind in a bidi domain name, i.e. one where
// some label contains an R, AL or AN code point.
fn passes_bidi(label: &str, is_bidi_domain: bool) -> bool {
    if !is_bidi_domain {
        return true;
    }
    let mut chars = label.chars();
    let first = match chars.next() {
        None => return true,
        Some(c) => c,
    };
    match bidi_class(first) {
        BidiClass::L => {
            // Rule 5
            for c in chars {
                if !matches!(
                    bidi_class(c),
                    BidiClass::L
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            // Rule 6: end in L or EN, ignoring trailing non-spacing marks
            matches!(
                trailing_class(label),
                Some(BidiClass::L) | Some(BidiClass::EN)
            )
        }
        BidiClass::R | BidiClass::AL => {
            let mut found_en = false;
            let mut found_an = false;
            // Rule 2
            for c in chars {
                let class = bidi_class(c);
                found_en |= class == BidiClass::EN;
                found_an |= class == BidiClass::AN;
                if !matches!(
                    class,
                    BidiClass::R
                        | BidiClass::AL
                        | BidiClass::AN
                        | BidiClass::EN
                        | BidiClass::ES
                        | BidiClass::CS
                        | BidiClass::ET
                        | BidiClass::ON
                        | BidiClass::BN
                        | BidiClass::NSM
                ) {
                    return false;
                }
            }
            // Rule 3
            if !matches!(
                trailing_class(label),
                Some(BidiClass::R) | Some(BidiClass::AL) | Some(BidiClass::EN) | Some(BidiClass::AN)
            ) {
                return false;
            }
            // Rule 4
            !(found_en && found_an)
        }
        // Rule 1: must start with L, R or AL
        _ => false,
    }
}

/// <http://www.unicode.org/reports/tr46/#Processing>
fn processing(domain: &str, config: Config, errors: &mut Vec<Error>) -> String {
    // Fast path: all-lowercase ASCII with no Punycode labels needs no
    // mapping, normalization or bidi work.
    let simple = !domain.is_empty()
        && !config.check_hyphens
        && domain
            .bytes()
            .all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.'))
        && !domain
            .split('.')
            .any(|label| label.starts_with(PUNYCODE_PREFIX));
    if simple {
        return domain.to_owned();
    }

    let mut mapped = String::with_capacity(domain.len());
    for c in domain.chars() {
        map_char(c, config, &mut mapped, errors)
    }
    let normalized: String = mapped.nfc().collect();

    let mut validated = String::with_capacity(normalized.len());
    let mut valid = true;
    let mut has_bidi_labels = false;
    let mut first = true;
    for label in normalized.split('.') {
        if !first {
            validated.push('.');
        }
        first = false;
        if label.starts_with(PUNYCODE_PREFIX) {
            match punycode::decode_to_string(&label[PUNYCODE_PREFIX.len()..]) {
                Some(decoded) => {
                    has_bidi_labels = has_bidi_labels || is_bidi_label(&decoded);

                    // A decoded label is re-validated without transitional
                    // mapping, and must already be NFC.
                    let config = config.transitional_processing(false);
                    if decoded.nfc().ne(decoded.chars()) || !is_valid(&decoded, config) {
                        valid = false;
                    }
                    validated.push_str(&decoded)
                }
                None => {
                    has_bidi_labels = true;
                    errors.push(Error::EncodingError);
                }
            }
        } else {
            has_bidi_labels = has_bidi_labels || is_bidi_label(label);
            valid = valid && is_valid(label, config);
            validated.push_str(label)
        }
    }

    if valid {
        for label in validated.split('.') {
            if !passes_bidi(label, has_bidi_labels) {
                valid = false;
                break;
            }
        }
    }
    if !valid {
        errors.push(Error::BadInput);
    }
    validated
}

/// Parameters for UTS #46 processing.
///
/// The defaults are those of <https://url.spec.whatwg.org/#idna> with
/// *beStrict* false.
#[derive(Clone, Copy, Default)]
pub struct Config {
    use_std3_ascii_rules: bool,
    transitional_processing: bool,
    verify_dns_length: bool,
    check_hyphens: bool,
}

impl Config {
    #[inline]
    pub fn use_std3_ascii_rules(mut self, value: bool) -> Self {
        self.use_std3_ascii_rules = value;
        self
    }

    #[inline]
    pub fn transitional_processing(mut self, value: bool) -> Self {
        self.transitional_processing = value;
        self
    }

    #[inline]
    pub fn verify_dns_length(mut self, value: bool) -> Self {
        self.verify_dns_length = value;
        self
    }

    #[inline]
    pub fn check_hyphens(mut self, value: bool) -> Self {
        self.check_hyphens = value;
        self
    }

    /// <http://www.unicode.org/reports/tr46/#ToASCII>
    pub fn to_ascii(self, domain: &str) -> Result<String, Error> {
        let mut errors = Vec::new();
        let mut result = String::new();
        let mut first = true;
        for label in processing(domain, self, &mut errors).split('.') {
            if !first {
                result.push('.');
            }
            first = false;
            if label.is_ascii() {
                result.push_str(label);
            } else {
                match punycode::encode_str(label) {
                    Some(encoded) => {
                        result.push_str(PUNYCODE_PREFIX);
                        result.push_str(&encoded);
                    }
                    None => errors.push(Error::Overflow),
                }
            }
        }

        if self.verify_dns_length {
            let domain = result.strip_suffix('.').unwrap_or(&result);
            if domain.is_empty() {
                errors.push(Error::EmptyString)
            } else if domain.split('.').any(|label| label.is_empty()) {
                errors.push(Error::InvalidLength)
            }
            if domain.len() > 253 || domain.split('.').any(|label| label.len() > 63) {
                errors.push(Error::InvalidLength)
            }
        }
        match errors.into_iter().next() {
            None => Ok(result),
            Some(error) => Err(error),
        }
    }

    /// <http://www.unicode.org/reports/tr46/#ToUnicode>
    pub fn to_unicode(self, domain: &str) -> (String, Result<(), Error>) {
        let mut errors = Vec::new();
        let domain = processing(domain, self, &mut errors);
        let result = match errors.into_iter().next() {
            None => Ok(()),
            Some(error) => Err(error),
        };
        (domain, result)
    }
}

/// The ways UTS #46 processing can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A label failed the validity criteria (bidi, joiners, combining marks).
    BadInput,
    /// A code point is disallowed in domain names.
    DisallowedCodePoint,
    /// An `xn--` label did not hold well-formed Punycode.
    EncodingError,
    /// The domain or one of its labels is outside the DNS length limits.
    InvalidLength,
    /// Punycode encoding overflowed.
    Overflow,
    /// The domain is empty.
    EmptyString,
}

impl Error {
    fn as_str(&self) -> &str {
        match self {
            Error::BadInput => "invalid label",
            Error::DisallowedCodePoint => "disallowed code point",
            Error::EncodingError => "invalid punycode",
            Error::InvalidLength => "invalid domain length",
            Error::Overflow => "punycode overflow",
            Error::EmptyString => "empty domain",
        }
    }
}

impl StdError for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
