// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Getters and setters with the exact string semantics of the
//! [`URL` interface](https://url.spec.whatwg.org/#api) exposed to
//! JavaScript, for embedders implementing that API on top of [`Url`].
//!
//! Getters render components to strings (`port` is `""` when absent,
//! `search` keeps its `?`, and so on); setters accept the leniencies the
//! API requires and delegate to the typed setters on [`Url`].

use crate::{ParseError, Url};

/// Getter for <https://url.spec.whatwg.org/#dom-url-href>
pub fn href(url: &Url) -> String {
    url.to_string()
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-href>
pub fn set_href(url: &mut Url, value: &str) -> Result<(), ParseError> {
    *url = Url::parse(value)?;
    Ok(())
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-origin>
pub fn origin(url: &Url) -> String {
    // The standard serializes file: origins as "null" too, but implementers
    // are allowed to do better; here they read as the empty string so they
    // are distinguishable from other opaque origins.
    if url.scheme() == "file" {
        return String::new();
    }
    url.origin().ascii_serialization()
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-protocol>
pub fn protocol(url: &Url) -> String {
    let mut output = url.scheme().to_owned();
    output.push(':');
    output
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-protocol>
pub fn set_protocol(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_scheme(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-username>
pub fn username(url: &Url) -> &str {
    url.username()
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-username>
pub fn set_username(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_username(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-password>
pub fn password(url: &Url) -> &str {
    url.password()
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-password>
pub fn set_password(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_password(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-host>:
/// the hostname followed by `:port` when the port is explicit.
pub fn host(url: &Url) -> String {
    let mut output = hostname(url);
    if let Some(port) = url.port() {
        output.push(':');
        output.push_str(&port.to_string());
    }
    output
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-host>
pub fn set_host(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_host(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-hostname>
pub fn hostname(url: &Url) -> String {
    match url.host() {
        Some(host) => host.to_string(),
        None => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-hostname>
pub fn set_hostname(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_hostname(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-port>
pub fn port(url: &Url) -> String {
    match url.port() {
        Some(port) => port.to_string(),
        None => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-port>
pub fn set_port(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_port(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-pathname>
pub fn pathname(url: &Url) -> String {
    url.path()
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-pathname>
pub fn set_pathname(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_path(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-search>:
/// `?` plus the query, or the empty string when there is no query.
pub fn search(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("?{}", query),
        _ => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-search>
pub fn set_search(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_query(value)
}

/// Getter for <https://url.spec.whatwg.org/#dom-url-hash>:
/// `#` plus the fragment, or the empty string when there is no fragment.
pub fn hash(url: &Url) -> String {
    match url.fragment() {
        Some(fragment) if !fragment.is_empty() => format!("#{}", fragment),
        _ => String::new(),
    }
}

/// Setter for <https://url.spec.whatwg.org/#dom-url-hash>
pub fn set_hash(url: &mut Url, value: &str) -> Result<(), ParseError> {
    url.set_fragment(value)
}
