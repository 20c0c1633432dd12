// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The [basic URL parser](https://url.spec.whatwg.org/#concept-basic-url-parser):
//! a state machine over the input code points that fills in a [`Url`] record,
//! either from scratch or re-entered at a specific state by the setters.

use std::error::Error;
use std::fmt;
use std::mem;

use weburl_percent_encoding::{
    utf8_percent_encode_to, C0_CONTROL, FRAGMENT, PATH, QUERY, SPECIAL_QUERY, USERINFO,
};

use crate::host::Host;
use crate::{default_port, Url};

/// Errors that stop the parser without producing a URL record.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[non_exhaustive]
pub enum ParseError {
    InvalidSchemeCharacter,
    NotAnAbsoluteUrlWithFragment,
    EmptyHostname,
    InvalidIpv6Address,
    InvalidIpv4Address,
    ForbiddenHostPoint,
    CannotDecodeHostPoint,
    DomainError,
    InvalidPort,
    CannotOverrideScheme,
    CannotBeABaseUrl,
    CannotHaveCredentialsOrPort,
    InvalidUnicodeCharacter,
}

impl ParseError {
    fn as_str(&self) -> &str {
        match self {
            ParseError::InvalidSchemeCharacter => "invalid character in scheme",
            ParseError::NotAnAbsoluteUrlWithFragment => "relative URL without a base",
            ParseError::EmptyHostname => "empty host",
            ParseError::InvalidIpv6Address => "invalid IPv6 address",
            ParseError::InvalidIpv4Address => "invalid IPv4 address",
            ParseError::ForbiddenHostPoint => "forbidden code point in host",
            ParseError::CannotDecodeHostPoint => "invalid UTF-8 in host",
            ParseError::DomainError => "invalid international domain name",
            ParseError::InvalidPort => "invalid port number",
            ParseError::CannotOverrideScheme => "cannot override scheme",
            ParseError::CannotBeABaseUrl => "URL has an opaque path",
            ParseError::CannotHaveCredentialsOrPort => "URL cannot have credentials or a port",
            ParseError::InvalidUnicodeCharacter => "invalid Unicode code point in input",
        }
    }
}

impl Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal deviations from the URL syntax.
///
/// The parser recovers from all of these and still produces a well-defined
/// record; they are latched on the record and reported through the optional
/// callback of [`ParseOptions`](crate::ParseOptions).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[non_exhaustive]
pub enum SyntaxViolation {
    /// Backslash used where the URL syntax wants a forward slash.
    Backslash,
    /// Leading or trailing C0 control or space characters were stripped.
    C0SpaceIgnored,
    /// ASCII tab or newline characters were removed from the input.
    TabOrNewlineIgnored,
    /// The authority contains embedded credentials (`user:pass@`).
    EmbeddedCredentials,
    /// A `@` appears in the authority after the credentials delimiter.
    UnencodedAtSign,
    /// `//` expected after a special scheme.
    ExpectedDoubleSlash,
    /// `//` expected after `file:`.
    ExpectedFileDoubleSlash,
    /// A `file:` URL with a host also carries a Windows drive letter.
    FileWithHostAndWindowsDrive,
    /// A Windows drive letter appeared where a `file:` host was expected.
    UnexpectedDriveLetter,
    /// The empty host in a host setter left the URL unchanged.
    EmptyHost,
    /// An IPv4 address with a trailing dot.
    EmptyIpv4Part,
    /// A code point outside the URL code point set was kept as-is.
    NonUrlCodePoint,
    /// A `%` is not followed by two ASCII hex digits.
    PercentDecode,
}

impl SyntaxViolation {
    pub fn description(&self) -> &'static str {
        match self {
            SyntaxViolation::Backslash => "backslash",
            SyntaxViolation::C0SpaceIgnored => {
                "leading or trailing control or space character are ignored in URLs"
            }
            SyntaxViolation::TabOrNewlineIgnored => "tabs or newlines are ignored in URLs",
            SyntaxViolation::EmbeddedCredentials => {
                "embedding authentication information (username or password) \
                 in an URL is not recommended"
            }
            SyntaxViolation::UnencodedAtSign => "unencoded @ sign in username or password",
            SyntaxViolation::ExpectedDoubleSlash => "expected //",
            SyntaxViolation::ExpectedFileDoubleSlash => "expected // after file:",
            SyntaxViolation::FileWithHostAndWindowsDrive => {
                "file: with host and Windows drive letter"
            }
            SyntaxViolation::UnexpectedDriveLetter => "unexpected Windows drive letter",
            SyntaxViolation::EmptyHost => "empty host left the URL unchanged",
            SyntaxViolation::EmptyIpv4Part => "IPv4 address with a trailing dot",
            SyntaxViolation::NonUrlCodePoint => "non-URL code point",
            SyntaxViolation::PercentDecode => "expected 2 hex digits after %",
        }
    }
}

impl fmt::Display for SyntaxViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The states of the basic URL parser. The setters re-enter the machine at
/// one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    CannotBeABaseUrlPath,
    Query,
    Fragment,
}

/// What the cursor does after a state handler ran.
enum Action {
    /// Advance one code point (or finish, if the EOF sentinel was handled).
    Increment,
    /// Re-dispatch the current code point under the new state.
    Continue,
    /// A state override reached its goal; stop here.
    Done,
}

/// Run the basic URL parser.
///
/// `url` seeds the record (the setters pass the current record here) and
/// `state_override` enters the machine at the given state instead of
/// [`State::SchemeStart`]. Input preprocessing (whitespace trimming, tab and
/// newline removal) only happens without an override.
pub fn basic_parse(
    input: &str,
    base: Option<&Url>,
    url: Option<Url>,
    state_override: Option<State>,
) -> Result<Url, ParseError> {
    parse_with(input, base, url, state_override, None)
}

pub(crate) fn parse_with(
    input: &str,
    base: Option<&Url>,
    url: Option<Url>,
    state_override: Option<State>,
    violation_fn: Option<&dyn Fn(SyntaxViolation)>,
) -> Result<Url, ParseError> {
    let mut parser = Parser {
        url: url.unwrap_or_else(Url::blank),
        base,
        input: Vec::new(),
        pos: 0,
        buffer: String::new(),
        state: state_override.unwrap_or(State::SchemeStart),
        state_override,
        at_sign_seen: false,
        inside_brackets: false,
        password_token_seen: false,
        violation_fn,
    };
    parser.preprocess(input);
    parser.run()
}

struct Parser<'a> {
    url: Url,
    base: Option<&'a Url>,
    input: Vec<char>,
    pos: usize,
    buffer: String,
    state: State,
    state_override: Option<State>,
    at_sign_seen: bool,
    inside_brackets: bool,
    password_token_seen: bool,
    violation_fn: Option<&'a dyn Fn(SyntaxViolation)>,
}

impl<'a> Parser<'a> {
    fn preprocess(&mut self, input: &str) {
        if self.state_override.is_some() {
            self.input = input.chars().collect();
            return;
        }
        let trimmed = input.trim_matches(|c: char| c <= ' ');
        if trimmed.len() != input.len() {
            self.violation(SyntaxViolation::C0SpaceIgnored);
        }
        self.input = trimmed
            .chars()
            .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
            .collect();
        if self.input.len() != trimmed.chars().count() {
            self.violation(SyntaxViolation::TabOrNewlineIgnored);
        }
    }

    fn violation(&mut self, v: SyntaxViolation) {
        self.url.syntax_violation = true;
        if let Some(f) = self.violation_fn {
            f(v)
        }
    }

    fn run(mut self) -> Result<Url, ParseError> {
        loop {
            let c = self.input.get(self.pos).copied();
            match self.step(c)? {
                Action::Done => return Ok(self.url),
                Action::Continue => {}
                Action::Increment => {
                    if self.pos >= self.input.len() {
                        // The EOF sentinel was just handled
                        return Ok(self.url);
                    }
                    self.pos += 1;
                }
            }
        }
    }

    /// The input from the current code point (inclusive) onwards.
    fn from_current(&self) -> &[char] {
        &self.input[self.pos.min(self.input.len())..]
    }

    /// The input after the current code point.
    fn remaining(&self) -> &[char] {
        &self.input[(self.pos + 1).min(self.input.len())..]
    }

    fn remaining_starts_with(&self, c: char) -> bool {
        self.remaining().first() == Some(&c)
    }

    /// Whether the two code points after the current one are hex digits.
    fn starts_with_two_hex(&self) -> bool {
        matches!(
            (self.input.get(self.pos + 1), self.input.get(self.pos + 2)),
            (Some(a), Some(b)) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()
        )
    }

    fn base_scheme_is(&self, scheme: &str) -> bool {
        self.base.map_or(false, |base| base.scheme == scheme)
    }

    /// Validate one code point of a path, query, fragment or opaque path.
    fn check_url_code_point(&mut self, c: char) {
        if c == '%' {
            if !self.starts_with_two_hex() {
                self.violation(SyntaxViolation::PercentDecode)
            }
        } else if !is_url_code_point(c) {
            self.violation(SyntaxViolation::NonUrlCodePoint)
        }
    }

    fn parse_host_from_buffer(&mut self) -> Result<Host, ParseError> {
        let mut latched = None;
        let host = Host::parse_impl(&self.buffer, !self.url.is_special(), &mut |v| {
            latched = Some(v);
        })?;
        if let Some(v) = latched {
            self.violation(v);
        }
        Ok(host)
    }

    fn step(&mut self, c: Option<char>) -> Result<Action, ParseError> {
        match self.state {
            State::SchemeStart => {
                match c {
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.buffer.push(c.to_ascii_lowercase());
                        self.state = State::Scheme;
                        Ok(Action::Increment)
                    }
                    _ if self.state_override.is_none() => {
                        self.state = State::NoScheme;
                        Ok(Action::Continue)
                    }
                    _ => Err(ParseError::InvalidSchemeCharacter),
                }
            }
            State::Scheme => match c {
                Some(c) if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') => {
                    self.buffer.push(c.to_ascii_lowercase());
                    Ok(Action::Increment)
                }
                Some(':') => {
                    if self.state_override.is_some() {
                        // Scheme changes may not cross the special/non-special
                        // divide, may not give file: URLs credentials or a
                        // port, and may not take file: away from an empty host
                        if self.url.is_special() != is_special_scheme(&self.buffer)
                            || (self.buffer == "file"
                                && (self.url.includes_credentials() || self.url.port.is_some()))
                            || (self.url.scheme == "file"
                                && self.url.host == Some(Host::Empty)
                                && self.buffer != "file")
                        {
                            return Err(ParseError::CannotOverrideScheme);
                        }
                    }
                    self.url.scheme = mem::take(&mut self.buffer);
                    if self.state_override.is_some() {
                        if self.url.port == default_port(&self.url.scheme) {
                            self.url.port = None;
                        }
                        return Ok(Action::Done);
                    }
                    if self.url.scheme == "file" {
                        if !(self.remaining_starts_with('/')
                            && self.remaining().get(1) == Some(&'/'))
                        {
                            self.violation(SyntaxViolation::ExpectedFileDoubleSlash);
                        }
                        self.state = State::File;
                    } else if self.url.is_special() && self.base_scheme_is(&self.url.scheme) {
                        self.state = State::SpecialRelativeOrAuthority;
                    } else if self.url.is_special() {
                        self.state = State::SpecialAuthoritySlashes;
                    } else if self.remaining_starts_with('/') {
                        self.state = State::PathOrAuthority;
                        self.pos += 1;
                    } else {
                        self.url.cannot_be_a_base = true;
                        self.url.path = vec![String::new()];
                        self.state = State::CannotBeABaseUrlPath;
                    }
                    Ok(Action::Increment)
                }
                _ if self.state_override.is_none() => {
                    self.buffer.clear();
                    self.state = State::NoScheme;
                    // Start over from the first code point
                    self.pos = 0;
                    Ok(Action::Continue)
                }
                _ => Err(ParseError::InvalidSchemeCharacter),
            },
            State::NoScheme => {
                let base = match self.base {
                    Some(base) if !(base.cannot_be_a_base && c != Some('#')) => base,
                    _ => return Err(ParseError::NotAnAbsoluteUrlWithFragment),
                };
                if base.cannot_be_a_base {
                    // Fragment-only change on an opaque-path base
                    self.url.scheme = base.scheme.clone();
                    self.url.path = base.path.clone();
                    self.url.query = base.query.clone();
                    self.url.fragment = Some(String::new());
                    self.url.cannot_be_a_base = true;
                    self.state = State::Fragment;
                    Ok(Action::Increment)
                } else if base.scheme != "file" {
                    self.state = State::Relative;
                    Ok(Action::Continue)
                } else {
                    self.state = State::File;
                    Ok(Action::Continue)
                }
            }
            State::SpecialRelativeOrAuthority => {
                if c == Some('/') && self.remaining_starts_with('/') {
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                    self.pos += 1;
                    Ok(Action::Increment)
                } else {
                    self.violation(SyntaxViolation::ExpectedDoubleSlash);
                    self.state = State::Relative;
                    Ok(Action::Continue)
                }
            }
            State::PathOrAuthority => {
                if c == Some('/') {
                    self.state = State::Authority;
                    Ok(Action::Increment)
                } else {
                    self.state = State::Path;
                    Ok(Action::Continue)
                }
            }
            State::Relative => {
                let base = match self.base {
                    Some(base) => base,
                    None => return Err(ParseError::NotAnAbsoluteUrlWithFragment),
                };
                self.url.scheme = base.scheme.clone();
                match c {
                    Some('/') => {
                        self.state = State::RelativeSlash;
                        Ok(Action::Increment)
                    }
                    Some('\\') if self.url.is_special() => {
                        self.violation(SyntaxViolation::Backslash);
                        self.state = State::RelativeSlash;
                        Ok(Action::Increment)
                    }
                    _ => {
                        self.url.username = base.username.clone();
                        self.url.password = base.password.clone();
                        self.url.host = base.host.clone();
                        self.url.port = base.port;
                        self.url.path = base.path.clone();
                        self.url.query = base.query.clone();
                        match c {
                            None => Ok(Action::Increment),
                            Some('?') => {
                                self.url.query = Some(String::new());
                                self.state = State::Query;
                                Ok(Action::Increment)
                            }
                            Some('#') => {
                                self.url.fragment = Some(String::new());
                                self.state = State::Fragment;
                                Ok(Action::Increment)
                            }
                            Some(_) => {
                                self.url.query = None;
                                self.url.path.pop();
                                self.state = State::Path;
                                Ok(Action::Continue)
                            }
                        }
                    }
                }
            }
            State::RelativeSlash => {
                if self.url.is_special() && matches!(c, Some('/') | Some('\\')) {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::SpecialAuthorityIgnoreSlashes;
                    Ok(Action::Increment)
                } else if c == Some('/') {
                    self.state = State::Authority;
                    Ok(Action::Increment)
                } else {
                    let base = match self.base {
                        Some(base) => base,
                        None => return Err(ParseError::NotAnAbsoluteUrlWithFragment),
                    };
                    self.url.username = base.username.clone();
                    self.url.password = base.password.clone();
                    self.url.host = base.host.clone();
                    self.url.port = base.port;
                    self.state = State::Path;
                    Ok(Action::Continue)
                }
            }
            State::SpecialAuthoritySlashes => {
                self.state = State::SpecialAuthorityIgnoreSlashes;
                if c == Some('/') && self.remaining_starts_with('/') {
                    self.pos += 1;
                    Ok(Action::Increment)
                } else {
                    self.violation(SyntaxViolation::ExpectedDoubleSlash);
                    Ok(Action::Continue)
                }
            }
            State::SpecialAuthorityIgnoreSlashes => {
                if !matches!(c, Some('/') | Some('\\')) {
                    self.state = State::Authority;
                    Ok(Action::Continue)
                } else {
                    self.violation(SyntaxViolation::ExpectedDoubleSlash);
                    Ok(Action::Increment)
                }
            }
            State::Authority => match c {
                Some('@') => {
                    if self.at_sign_seen {
                        self.violation(SyntaxViolation::UnencodedAtSign);
                        self.buffer.insert_str(0, "%40");
                    } else {
                        self.violation(SyntaxViolation::EmbeddedCredentials);
                    }
                    self.at_sign_seen = true;
                    let buffer = mem::take(&mut self.buffer);
                    for c in buffer.chars() {
                        if c == ':' && !self.password_token_seen {
                            self.password_token_seen = true;
                            continue;
                        }
                        let target = if self.password_token_seen {
                            &mut self.url.password
                        } else {
                            &mut self.url.username
                        };
                        utf8_percent_encode_to(c.encode_utf8(&mut [0; 4]), &USERINFO, target);
                    }
                    Ok(Action::Increment)
                }
                None | Some('/') | Some('?') | Some('#') => self.end_of_authority(),
                Some('\\') if self.url.is_special() => self.end_of_authority(),
                Some(c) => {
                    self.buffer.push(c);
                    Ok(Action::Increment)
                }
            },
            State::Host | State::Hostname => {
                if self.state_override.is_some() && self.url.scheme == "file" {
                    self.state = State::FileHost;
                    return Ok(Action::Continue);
                }
                match c {
                    Some(':') if !self.inside_brackets => {
                        if self.buffer.is_empty() {
                            return Err(ParseError::EmptyHostname);
                        }
                        let host = self.parse_host_from_buffer()?;
                        self.url.host = Some(host);
                        self.buffer.clear();
                        self.state = State::Port;
                        if self.state_override == Some(State::Hostname) {
                            return Ok(Action::Done);
                        }
                        Ok(Action::Increment)
                    }
                    None | Some('/') | Some('?') | Some('#') => self.end_of_host(),
                    Some('\\') if self.url.is_special() => self.end_of_host(),
                    Some(c) => {
                        if c == '[' {
                            self.inside_brackets = true;
                        } else if c == ']' {
                            self.inside_brackets = false;
                        }
                        self.buffer.push(c);
                        Ok(Action::Increment)
                    }
                }
            }
            State::Port => match c {
                Some(c) if c.is_ascii_digit() => {
                    self.buffer.push(c);
                    Ok(Action::Increment)
                }
                None | Some('/') | Some('?') | Some('#') => self.end_of_port(),
                Some('\\') if self.url.is_special() => self.end_of_port(),
                _ if self.state_override.is_some() => self.end_of_port(),
                _ => Err(ParseError::InvalidPort),
            },
            State::File => {
                self.url.scheme = "file".to_owned();
                self.url.host = Some(Host::Empty);
                if matches!(c, Some('/') | Some('\\')) {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::FileSlash;
                    return Ok(Action::Increment);
                }
                let base = match self.base {
                    Some(base) if base.scheme == "file" => base,
                    _ => {
                        self.state = State::Path;
                        return Ok(Action::Continue);
                    }
                };
                self.url.host = base.host.clone();
                self.url.path = base.path.clone();
                self.url.query = base.query.clone();
                match c {
                    None => Ok(Action::Increment),
                    Some('?') => {
                        self.url.query = Some(String::new());
                        self.state = State::Query;
                        Ok(Action::Increment)
                    }
                    Some('#') => {
                        self.url.fragment = Some(String::new());
                        self.state = State::Fragment;
                        Ok(Action::Increment)
                    }
                    Some(_) => {
                        self.url.query = None;
                        if !starts_with_windows_drive_letter(self.from_current()) {
                            shorten_path(&self.url.scheme, &mut self.url.path);
                        } else {
                            self.violation(SyntaxViolation::UnexpectedDriveLetter);
                            self.url.path.clear();
                        }
                        self.state = State::Path;
                        Ok(Action::Continue)
                    }
                }
            }
            State::FileSlash => {
                if matches!(c, Some('/') | Some('\\')) {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::FileHost;
                    Ok(Action::Increment)
                } else {
                    if let Some(base) = self.base {
                        if base.scheme == "file" {
                            self.url.host = base.host.clone();
                            if !starts_with_windows_drive_letter(self.from_current()) {
                                if let Some(first) = base.path.first() {
                                    if is_normalized_windows_drive_letter(first) {
                                        self.url.path.push(first.clone());
                                    }
                                }
                            }
                        }
                    }
                    self.state = State::Path;
                    Ok(Action::Continue)
                }
            }
            State::FileHost => match c {
                None | Some('/') | Some('\\') | Some('?') | Some('#') => {
                    if self.state_override.is_none() && is_windows_drive_letter(&self.buffer) {
                        self.violation(SyntaxViolation::UnexpectedDriveLetter);
                        // The buffer becomes the first path segment
                        self.state = State::Path;
                        Ok(Action::Continue)
                    } else if self.buffer.is_empty() {
                        self.url.host = Some(Host::Empty);
                        if self.state_override.is_some() {
                            return Ok(Action::Done);
                        }
                        self.state = State::PathStart;
                        Ok(Action::Continue)
                    } else {
                        let mut host = self.parse_host_from_buffer()?;
                        if host == Host::Domain("localhost".to_owned()) {
                            host = Host::Empty;
                        }
                        self.url.host = Some(host);
                        self.buffer.clear();
                        if self.state_override.is_some() {
                            return Ok(Action::Done);
                        }
                        self.state = State::PathStart;
                        Ok(Action::Continue)
                    }
                }
                Some(c) => {
                    self.buffer.push(c);
                    Ok(Action::Increment)
                }
            },
            State::PathStart => {
                if self.url.is_special() {
                    if c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    self.state = State::Path;
                    if matches!(c, Some('/') | Some('\\')) {
                        Ok(Action::Increment)
                    } else {
                        Ok(Action::Continue)
                    }
                } else if self.state_override.is_none() && c == Some('?') {
                    self.url.query = Some(String::new());
                    self.state = State::Query;
                    Ok(Action::Increment)
                } else if self.state_override.is_none() && c == Some('#') {
                    self.url.fragment = Some(String::new());
                    self.state = State::Fragment;
                    Ok(Action::Increment)
                } else if c.is_some() {
                    self.state = State::Path;
                    if c == Some('/') {
                        Ok(Action::Increment)
                    } else {
                        Ok(Action::Continue)
                    }
                } else {
                    if self.state_override.is_some() && self.url.host.is_none() {
                        self.url.path.push(String::new());
                    }
                    Ok(Action::Increment)
                }
            }
            State::Path => {
                let at_segment_end = matches!(c, None | Some('/'))
                    || (self.url.is_special() && c == Some('\\'))
                    || (self.state_override.is_none() && matches!(c, Some('?') | Some('#')));
                if at_segment_end {
                    let slash = c == Some('/') || (self.url.is_special() && c == Some('\\'));
                    if self.url.is_special() && c == Some('\\') {
                        self.violation(SyntaxViolation::Backslash);
                    }
                    if is_double_dot_path_segment(&self.buffer) {
                        shorten_path(&self.url.scheme, &mut self.url.path);
                        if !slash {
                            self.url.path.push(String::new());
                        }
                    } else if is_single_dot_path_segment(&self.buffer) {
                        if !slash {
                            self.url.path.push(String::new());
                        }
                    } else {
                        if self.url.scheme == "file"
                            && self.url.path.is_empty()
                            && is_windows_drive_letter(&self.buffer)
                        {
                            if !matches!(self.url.host, None | Some(Host::Empty)) {
                                self.violation(SyntaxViolation::FileWithHostAndWindowsDrive);
                                self.url.host = Some(Host::Empty);
                            }
                            // Normalize the drive letter separator to a colon
                            self.buffer.replace_range(1..2, ":");
                        }
                        let segment = mem::take(&mut self.buffer);
                        self.url.path.push(segment);
                    }
                    self.buffer.clear();
                    if self.url.scheme == "file" && matches!(c, None | Some('?') | Some('#')) {
                        while self.url.path.len() > 1
                            && self.url.path.first().map_or(false, String::is_empty)
                        {
                            self.url.path.remove(0);
                        }
                    }
                    match c {
                        Some('?') => {
                            self.url.query = Some(String::new());
                            self.state = State::Query;
                        }
                        Some('#') => {
                            self.url.fragment = Some(String::new());
                            self.state = State::Fragment;
                        }
                        _ => {}
                    }
                    Ok(Action::Increment)
                } else {
                    let c = match c {
                        Some(c) => c,
                        None => return Ok(Action::Increment),
                    };
                    self.check_url_code_point(c);
                    utf8_percent_encode_to(c.encode_utf8(&mut [0; 4]), &PATH, &mut self.buffer);
                    Ok(Action::Increment)
                }
            }
            State::CannotBeABaseUrlPath => match c {
                Some('?') => {
                    self.url.query = Some(String::new());
                    self.state = State::Query;
                    Ok(Action::Increment)
                }
                Some('#') => {
                    self.url.fragment = Some(String::new());
                    self.state = State::Fragment;
                    Ok(Action::Increment)
                }
                Some(c) => {
                    self.check_url_code_point(c);
                    if let Some(first) = self.url.path.first_mut() {
                        utf8_percent_encode_to(c.encode_utf8(&mut [0; 4]), &C0_CONTROL, first);
                    }
                    Ok(Action::Increment)
                }
                None => Ok(Action::Increment),
            },
            State::Query => {
                if self.state_override.is_none() && c == Some('#') {
                    self.url.fragment = Some(String::new());
                    self.state = State::Fragment;
                    return Ok(Action::Increment);
                }
                if let Some(c) = c {
                    self.check_url_code_point(c);
                    let set = if self.url.is_special() {
                        &SPECIAL_QUERY
                    } else {
                        &QUERY
                    };
                    let query = self.url.query.get_or_insert_with(String::new);
                    utf8_percent_encode_to(c.encode_utf8(&mut [0; 4]), set, query);
                }
                Ok(Action::Increment)
            }
            State::Fragment => {
                if let Some(c) = c {
                    self.check_url_code_point(c);
                    let fragment = self.url.fragment.get_or_insert_with(String::new);
                    utf8_percent_encode_to(c.encode_utf8(&mut [0; 4]), &FRAGMENT, fragment);
                }
                Ok(Action::Increment)
            }
        }
    }

    fn end_of_authority(&mut self) -> Result<Action, ParseError> {
        if self.at_sign_seen && self.buffer.is_empty() {
            return Err(ParseError::EmptyHostname);
        }
        // Replay everything since the credentials delimiter as the host
        self.pos -= self.buffer.chars().count();
        self.buffer.clear();
        self.state = State::Host;
        Ok(Action::Continue)
    }

    fn end_of_host(&mut self) -> Result<Action, ParseError> {
        if self.url.is_special() && self.buffer.is_empty() {
            return Err(ParseError::EmptyHostname);
        }
        if self.state_override.is_some()
            && self.buffer.is_empty()
            && (self.url.includes_credentials() || self.url.port.is_some())
        {
            self.violation(SyntaxViolation::EmptyHost);
            return Ok(Action::Done);
        }
        let host = self.parse_host_from_buffer()?;
        self.url.host = Some(host);
        self.buffer.clear();
        if self.state_override.is_some() {
            return Ok(Action::Done);
        }
        self.state = State::PathStart;
        Ok(Action::Continue)
    }

    fn end_of_port(&mut self) -> Result<Action, ParseError> {
        if !self.buffer.is_empty() {
            let port = self
                .buffer
                .parse::<u16>()
                .map_err(|_| ParseError::InvalidPort)?;
            self.url.port = if default_port(&self.url.scheme) == Some(port) {
                None
            } else {
                Some(port)
            };
            self.buffer.clear();
        }
        if self.state_override.is_some() {
            return Ok(Action::Done);
        }
        self.state = State::PathStart;
        Ok(Action::Continue)
    }
}

/// <https://url.spec.whatwg.org/#special-scheme>
pub(crate) fn is_special_scheme(scheme: &str) -> bool {
    matches!(scheme, "ftp" | "file" | "http" | "https" | "ws" | "wss")
}

/// Remove the last path segment, except a lone `file:` drive letter.
fn shorten_path(scheme: &str, path: &mut Vec<String>) {
    if scheme == "file"
        && path.len() == 1
        && path.first().map_or(false, |s| is_normalized_windows_drive_letter(s))
    {
        return;
    }
    path.pop();
}

pub(crate) fn is_windows_drive_letter(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && matches!(bytes[1], b':' | b'|')
}

pub(crate) fn is_normalized_windows_drive_letter(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Whether the input begins with a Windows drive letter, optionally followed
/// by `/`, `\`, `?` or `#`.
fn starts_with_windows_drive_letter(input: &[char]) -> bool {
    if input.len() < 2 || !input[0].is_ascii_alphabetic() || !matches!(input[1], ':' | '|') {
        return false;
    }
    match input.get(2) {
        None => true,
        Some(&c) => matches!(c, '/' | '\\' | '?' | '#'),
    }
}

fn is_double_dot_path_segment(buffer: &str) -> bool {
    matches!(
        buffer.to_ascii_lowercase().as_str(),
        ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}

fn is_single_dot_path_segment(buffer: &str) -> bool {
    matches!(buffer.to_ascii_lowercase().as_str(), "." | "%2e")
}

/// <https://url.spec.whatwg.org/#url-code-points>
pub(crate) fn is_url_code_point(c: char) -> bool {
    matches!(c,
        'a'..='z'
        | 'A'..='Z'
        | '0'..='9'
        | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | '-'
        | '.' | '/' | ':' | ';' | '=' | '?' | '@' | '_' | '~')
        || (c >= '\u{A0}' && !is_non_character(c))
}

fn is_non_character(c: char) -> bool {
    let value = u32::from(c);
    (0xFDD0..=0xFDEF).contains(&value) || value & 0xFFFE == 0xFFFE
}
