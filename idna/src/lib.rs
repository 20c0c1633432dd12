// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! IDNA [per the WHATWG URL Standard](https://url.spec.whatwg.org/#idna).
//!
//! Exposes the underlying algorithms from [*Unicode IDNA Compatibility
//! Processing* (Unicode Technical Standard #46)](http://www.unicode.org/reports/tr46/)
//! and [Punycode (RFC 3492)](https://tools.ietf.org/html/rfc3492).
//!
//! Domain names were originally restricted to ASCII. Internationalized
//! domain names are carried over DNS by mapping each Unicode label to an
//! ASCII `xn--` label via Punycode; this crate performs that mapping and the
//! validation around it, with the parameter profile the URL Standard uses.

pub mod punycode;
pub mod uts46;

pub use crate::uts46::{Config, Error};

/// The [domain to ASCII](https://url.spec.whatwg.org/#concept-domain-to-ascii)
/// algorithm.
///
/// Returns the ASCII representation of a domain name, normalizing characters
/// (upper-case to lower-case and other kinds of equivalence) and using
/// Punycode as necessary.
///
/// This process may fail.
pub fn domain_to_ascii(domain: &str) -> Result<String, Error> {
    Config::default().to_ascii(domain)
}

/// The [domain to ASCII](https://url.spec.whatwg.org/#concept-domain-to-ascii)
/// algorithm with the *beStrict* flag set.
///
/// Note that this rejects various real-world names, including some GitHub
/// user pages and pseudo-hosts used by TXT-record-based protocols.
pub fn domain_to_ascii_strict(domain: &str) -> Result<String, Error> {
    Config::default()
        .use_std3_ascii_rules(true)
        .verify_dns_length(true)
        .to_ascii(domain)
}

/// The [domain to Unicode](https://url.spec.whatwg.org/#concept-domain-to-unicode)
/// algorithm.
///
/// Returns the Unicode representation of a domain name, decoding Punycode as
/// necessary. The string is returned even on error, with errors denoted by
/// the second item of the tuple; it must not be used in a network protocol
/// in that case.
pub fn domain_to_unicode(domain: &str) -> (String, Result<(), Error>) {
    Config::default().to_unicode(domain)
}
