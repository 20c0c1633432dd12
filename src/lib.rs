// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/*!
URL library for Rust, based on the [WHATWG URL Standard](https://url.spec.whatwg.org/).

Parsing follows the standard's basic URL parser exactly, including the
quirks browsers implement around `file:` URLs, special schemes, IPv4
shorthand, IPv6 bracket syntax, IDNA domain encoding and percent-encoding:

```
use weburl::Url;

let url = Url::parse("HTTP://EXAMPLE.com:80/Path?Q=1#F").unwrap();
assert_eq!(url.to_string(), "http://example.com/Path?Q=1#F");
assert_eq!(url.scheme(), "http");
assert_eq!(url.port(), None); // the default port is elided
```

A URL can be parsed relative to a base:

```
use weburl::Url;

let base = Url::parse("http://a/b/c/d;p?q").unwrap();
let url = base.join("../../../g").unwrap();
assert_eq!(url.to_string(), "http://a/g");
```

The setters re-run the relevant part of the parser, so mutation keeps every
component normalized:

```
use weburl::Url;

let mut url = Url::parse("http://example.com/").unwrap();
url.set_port("8080").unwrap();
url.set_path("/a b").unwrap();
assert_eq!(url.to_string(), "http://example.com:8080/a%20b");
```
*/

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use weburl_percent_encoding::{utf8_percent_encode_to, USERINFO};

pub use crate::host::{Host, Ipv4Address, Ipv6Address, Ipv6ParseError};
pub use crate::origin::{OpaqueOrigin, Origin};
pub use crate::parser::{basic_parse, ParseError, State, SyntaxViolation};

pub mod encoding;
pub mod form_urlencoded;
mod host;
mod origin;
mod parser;
pub mod webidl;

/// A parsed URL record.
///
/// Components are stored in their canonical percent-encoded form; the
/// serialization is reassembled on demand by [`Display`](fmt::Display) and
/// the accessors.
#[derive(Clone, Debug)]
pub struct Url {
    pub(crate) scheme: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) host: Option<Host>,
    pub(crate) port: Option<u16>,
    pub(crate) path: Vec<String>,
    pub(crate) query: Option<String>,
    pub(crate) fragment: Option<String>,
    pub(crate) cannot_be_a_base: bool,
    // Latched when the parser recovered from a syntax violation; not part
    // of equality
    pub(crate) syntax_violation: bool,
}

/// Full configuration for parsing a URL: an optional base and an optional
/// syntax-violation callback.
#[derive(Copy, Clone)]
pub struct ParseOptions<'a> {
    base_url: Option<&'a Url>,
    violation_fn: Option<&'a dyn Fn(SyntaxViolation)>,
}

impl<'a> ParseOptions<'a> {
    /// Change the base URL.
    pub fn base_url(mut self, base: Option<&'a Url>) -> Self {
        self.base_url = base;
        self
    }

    /// Call the provided function on non-fatal deviations from the URL
    /// syntax that the parser recovered from.
    pub fn syntax_violation_callback(
        mut self,
        callback: Option<&'a dyn Fn(SyntaxViolation)>,
    ) -> Self {
        self.violation_fn = callback;
        self
    }

    /// Parse a URL string with the configuration so far.
    pub fn parse(self, input: &str) -> Result<Url, ParseError> {
        parser::parse_with(input, self.base_url, None, None, self.violation_fn)
    }
}

impl Url {
    /// Parse an absolute URL from a string.
    #[inline]
    pub fn parse(input: &str) -> Result<Url, ParseError> {
        Url::options().parse(input)
    }

    /// Parse a string as a URL, with this URL as the base.
    #[inline]
    pub fn join(&self, input: &str) -> Result<Url, ParseError> {
        Url::options().base_url(Some(self)).parse(input)
    }

    /// Return a default `ParseOptions` that can fully configure the parser.
    pub fn options<'a>() -> ParseOptions<'a> {
        ParseOptions {
            base_url: None,
            violation_fn: None,
        }
    }

    pub(crate) fn blank() -> Url {
        Url {
            scheme: String::new(),
            username: String::new(),
            password: String::new(),
            host: None,
            port: None,
            path: Vec::new(),
            query: None,
            fragment: None,
            cannot_be_a_base: false,
            syntax_violation: false,
        }
    }

    /// The scheme, lower-cased, without the trailing `:`.
    #[inline]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Whether the scheme is one of `http`, `https`, `ws`, `wss`, `ftp` or
    /// `file`, which the standard parses with extra leniency.
    #[inline]
    pub fn is_special(&self) -> bool {
        parser::is_special_scheme(&self.scheme)
    }

    /// Whether the path is a single opaque string that cannot be used as a
    /// base for relative URLs (as in `mailto:user@example.com`).
    #[inline]
    pub fn cannot_be_a_base(&self) -> bool {
        self.cannot_be_a_base
    }

    /// The username, possibly empty.
    #[inline]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password, possibly empty.
    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether the username or password is non-empty.
    #[inline]
    pub fn includes_credentials(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }

    /// The host, if any. [`Host::Empty`] (as in `file:///p`) is a host.
    #[inline]
    pub fn host(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    /// Whether the URL has a host, possibly the empty one.
    #[inline]
    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// The port, if it is explicit and not the scheme's default.
    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The explicit port, or the scheme's default.
    #[inline]
    pub fn port_or_known_default(&self) -> Option<u16> {
        self.port.or_else(|| default_port(&self.scheme))
    }

    /// The path as a string: the opaque path itself, or `/`-separated
    /// segments.
    pub fn path(&self) -> String {
        if self.cannot_be_a_base {
            self.path.first().cloned().unwrap_or_default()
        } else {
            let mut output = String::new();
            for segment in &self.path {
                output.push('/');
                output.push_str(segment);
            }
            output
        }
    }

    /// The path segments, unless the path is opaque.
    pub fn path_segments(&self) -> Option<&[String]> {
        if self.cannot_be_a_base {
            None
        } else {
            Some(&self.path)
        }
    }

    /// The query string, if any, without the leading `?`.
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The fragment identifier, if any, without the leading `#`.
    #[inline]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Whether the parser recovered from any syntax violation while
    /// producing this record.
    #[inline]
    pub fn had_syntax_violation(&self) -> bool {
        self.syntax_violation
    }

    /// <https://url.spec.whatwg.org/#cannot-have-a-username-password-port>
    fn cannot_have_credentials_or_port(&self) -> bool {
        matches!(self.host, None | Some(Host::Empty))
            || self.cannot_be_a_base
            || self.scheme == "file"
    }

    /// Change the scheme. A trailing `:` is tolerated.
    ///
    /// Fails with [`ParseError::CannotOverrideScheme`] when the change would
    /// cross the special/non-special divide, give a `file:` URL credentials
    /// or a port, or take `file:` away from an empty host.
    pub fn set_scheme(&mut self, scheme: &str) -> Result<(), ParseError> {
        let mut input = scheme.to_owned();
        if !input.ends_with(':') {
            input.push(':');
        }
        self.reparse(&input, State::SchemeStart)
    }

    /// Change the username.
    ///
    /// Fails when the URL cannot carry credentials (no host, empty host,
    /// opaque path, or `file:` scheme).
    pub fn set_username(&mut self, username: &str) -> Result<(), ParseError> {
        if self.cannot_have_credentials_or_port() {
            return Err(ParseError::CannotHaveCredentialsOrPort);
        }
        self.username.clear();
        utf8_percent_encode_to(username, &USERINFO, &mut self.username);
        Ok(())
    }

    /// Change the password. Same restrictions as [`set_username`](Url::set_username).
    pub fn set_password(&mut self, password: &str) -> Result<(), ParseError> {
        if self.cannot_have_credentials_or_port() {
            return Err(ParseError::CannotHaveCredentialsOrPort);
        }
        self.password.clear();
        utf8_percent_encode_to(password, &USERINFO, &mut self.password);
        Ok(())
    }

    /// Change the host, also accepting a trailing `:port`.
    pub fn set_host(&mut self, host: &str) -> Result<(), ParseError> {
        if self.cannot_be_a_base {
            return Err(ParseError::CannotBeABaseUrl);
        }
        match self.reparse(host, State::Host) {
            // A junk port does not stop the host itself from applying
            Err(ParseError::InvalidPort) => self.reparse(host, State::Hostname),
            result => result,
        }
    }

    /// Change the host, ignoring any `:port` suffix.
    pub fn set_hostname(&mut self, hostname: &str) -> Result<(), ParseError> {
        if self.cannot_be_a_base {
            return Err(ParseError::CannotBeABaseUrl);
        }
        self.reparse(hostname, State::Hostname)
    }

    /// Change the port. The empty string clears it.
    pub fn set_port(&mut self, port: &str) -> Result<(), ParseError> {
        if self.cannot_have_credentials_or_port() {
            return Err(ParseError::CannotHaveCredentialsOrPort);
        }
        if port.is_empty() {
            self.port = None;
            return Ok(());
        }
        self.reparse(port, State::Port)
    }

    /// Change the path.
    pub fn set_path(&mut self, path: &str) -> Result<(), ParseError> {
        if self.cannot_be_a_base {
            return Err(ParseError::CannotBeABaseUrl);
        }
        let mut url = self.clone();
        url.path.clear();
        *self = parser::basic_parse(path, None, Some(url), Some(State::PathStart))?;
        Ok(())
    }

    /// Change the query string. The empty string clears it; a leading `?`
    /// is dropped.
    pub fn set_query(&mut self, query: &str) -> Result<(), ParseError> {
        if query.is_empty() {
            self.query = None;
            return Ok(());
        }
        let input = query.strip_prefix('?').unwrap_or(query);
        let mut url = self.clone();
        url.query = Some(String::new());
        *self = parser::basic_parse(input, None, Some(url), Some(State::Query))?;
        Ok(())
    }

    /// Change the fragment. The empty string clears it; a leading `#` is
    /// dropped.
    pub fn set_fragment(&mut self, fragment: &str) -> Result<(), ParseError> {
        if fragment.is_empty() {
            self.fragment = None;
            return Ok(());
        }
        let input = fragment.strip_prefix('#').unwrap_or(fragment);
        let mut url = self.clone();
        url.fragment = Some(String::new());
        *self = parser::basic_parse(input, None, Some(url), Some(State::Fragment))?;
        Ok(())
    }

    /// Re-enter the parser at `state` over `input`, with the current record
    /// as the seed. The record is only replaced on success.
    fn reparse(&mut self, input: &str, state: State) -> Result<(), ParseError> {
        *self = parser::basic_parse(input, None, Some(self.clone()), Some(state))?;
        Ok(())
    }

    /// Convert an absolute file path into a `file:` URL.
    ///
    /// Returns `Err` if the path is not absolute.
    ///
    /// Unix-only: Windows paths need drive-letter and UNC mapping that this
    /// crate does not implement.
    #[cfg(unix)]
    pub fn from_file_path<P: AsRef<std::path::Path>>(path: P) -> Result<Url, ()> {
        let mut url = Url::blank();
        url.scheme = "file".to_owned();
        url.host = Some(Host::Empty);
        url.path = encode_file_path(path.as_ref())?;
        Ok(url)
    }

    /// Convert an absolute directory path into a `file:` URL ending in a
    /// slash, so that joining a relative reference keeps the whole path.
    ///
    /// `"index.html"` joined onto `from_directory_path("/var/www")` is
    /// `file:///var/www/index.html`; joined onto `from_file_path` of the
    /// same path it would be `file:///var/index.html`.
    #[cfg(unix)]
    pub fn from_directory_path<P: AsRef<std::path::Path>>(path: P) -> Result<Url, ()> {
        let mut url = Url::from_file_path(path)?;
        if url.path.last().map_or(true, |segment| !segment.is_empty()) {
            url.path.push(String::new());
        }
        Ok(url)
    }

    /// Assuming the URL is in the `file:` scheme or similar, convert its
    /// path to an absolute `std::path::Path`.
    ///
    /// Returns `Err` if the path is opaque, the host is neither empty nor
    /// `localhost`, or a segment decodes to a NUL byte.
    #[cfg(unix)]
    pub fn to_file_path(&self) -> Result<std::path::PathBuf, ()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        use weburl_percent_encoding::percent_decode;

        if self.cannot_be_a_base {
            return Err(());
        }
        match &self.host {
            Some(Host::Empty) => {}
            Some(Host::Domain(domain)) if domain == "localhost" => {}
            _ => return Err(()),
        }
        let mut bytes = Vec::new();
        for segment in &self.path {
            bytes.push(b'/');
            bytes.extend(percent_decode(segment.as_bytes()));
        }
        if bytes.is_empty() {
            bytes.push(b'/');
        }
        if bytes.contains(&b'\0') {
            return Err(());
        }
        Ok(OsStr::from_bytes(&bytes).into())
    }

    fn write_serialization<W: Write>(&self, output: &mut W) -> fmt::Result {
        output.write_str(&self.scheme)?;
        output.write_str(":")?;
        if let Some(host) = &self.host {
            output.write_str("//")?;
            if self.includes_credentials() {
                output.write_str(&self.username)?;
                if !self.password.is_empty() {
                    write!(output, ":{}", self.password)?;
                }
                output.write_str("@")?;
            }
            write!(output, "{}", host)?;
            if let Some(port) = self.port {
                write!(output, ":{}", port)?;
            }
        } else if self.scheme == "file" {
            output.write_str("//")?;
        }
        if self.cannot_be_a_base {
            if let Some(first) = self.path.first() {
                output.write_str(first)?;
            }
        } else {
            for segment in &self.path {
                output.write_str("/")?;
                output.write_str(segment)?;
            }
        }
        if let Some(query) = &self.query {
            write!(output, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(output, "#{}", fragment)?;
        }
        Ok(())
    }
}

/// The canonical serialization of the record.
impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_serialization(f)
    }
}

impl FromStr for Url {
    type Err = ParseError;

    #[inline]
    fn from_str(input: &str) -> Result<Url, ParseError> {
        Url::parse(input)
    }
}

/// The syntax-violation latch is excluded: two records that serialize the
/// same are equal.
impl PartialEq for Url {
    fn eq(&self, other: &Url) -> bool {
        self.scheme == other.scheme
            && self.username == other.username
            && self.password == other.password
            && self.host == other.host
            && self.port == other.port
            && self.path == other.path
            && self.query == other.query
            && self.fragment == other.fragment
            && self.cannot_be_a_base == other.cannot_be_a_base
    }
}

impl Eq for Url {}

impl Hash for Url {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scheme.hash(state);
        self.username.hash(state);
        self.password.hash(state);
        self.host.hash(state);
        self.port.hash(state);
        self.path.hash(state);
        self.query.hash(state);
        self.fragment.hash(state);
        self.cannot_be_a_base.hash(state);
    }
}

#[cfg(unix)]
fn encode_file_path(path: &std::path::Path) -> Result<Vec<String>, ()> {
    use std::os::unix::ffi::OsStrExt;
    use std::path::Component;

    use weburl_percent_encoding::{percent_encode, PATH};

    if !path.is_absolute() {
        return Err(());
    }
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::RootDir => {}
            Component::Normal(part) => segments.push(percent_encode(part.as_bytes(), &PATH)),
            _ => return Err(()),
        }
    }
    if segments.is_empty() {
        segments.push(String::new());
    }
    Ok(segments)
}

/// The default port of a special scheme, if it has one.
///
/// The lookup is ASCII case-insensitive and a trailing `:` is tolerated, so
/// this can be fed a `protocol` value directly.
pub fn default_port(scheme: &str) -> Option<u16> {
    let scheme = scheme.strip_suffix(':').unwrap_or(scheme);
    if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("ws") {
        Some(80)
    } else if scheme.eq_ignore_ascii_case("https") || scheme.eq_ignore_ascii_case("wss") {
        Some(443)
    } else if scheme.eq_ignore_ascii_case("ftp") {
        Some(21)
    } else {
        None
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Url {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Url {
    fn deserialize<D>(deserializer: D) -> Result<Url, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let input = <String as serde::Deserialize>::deserialize(deserializer)?;
        Url::parse(&input).map_err(serde::de::Error::custom)
    }
}
