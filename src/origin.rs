// Copyright 2026 The weburl developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use crate::host::Host;
use crate::{default_port, Url};

impl Url {
    /// Return the origin of this URL (<https://url.spec.whatwg.org/#origin>).
    ///
    /// `blob:` URLs take the origin of the URL in their path; the special
    /// network schemes form a (scheme, host, port) tuple; everything else,
    /// `file:` included, is opaque.
    pub fn origin(&self) -> Origin {
        match self.scheme() {
            "blob" => match Url::parse(&self.path()) {
                Ok(inner) => inner.origin(),
                Err(_) => Origin::new_opaque(),
            },
            "ftp" | "http" | "https" | "ws" | "wss" => {
                match (&self.host, self.port_or_known_default()) {
                    (Some(host), Some(port)) => {
                        Origin::Tuple(self.scheme.clone(), host.clone(), port)
                    }
                    _ => Origin::new_opaque(),
                }
            }
            _ => Origin::new_opaque(),
        }
    }
}

/// The origin of a URL.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Origin {
    /// A globally unique identifier, equal only to itself.
    Opaque(OpaqueOrigin),

    /// The URL's scheme, host and effective port.
    Tuple(String, Host, u16),
}

impl Origin {
    /// Create a new opaque origin that is only equal to itself.
    pub fn new_opaque() -> Origin {
        Origin::Opaque(OpaqueOrigin(Arc::new(0)))
    }

    /// Whether the origin is a (scheme, host, port) tuple.
    pub fn is_tuple(&self) -> bool {
        matches!(self, Origin::Tuple(..))
    }

    /// <https://html.spec.whatwg.org/multipage/#ascii-serialisation-of-an-origin>
    pub fn ascii_serialization(&self) -> String {
        match self {
            Origin::Opaque(_) => "null".to_owned(),
            Origin::Tuple(scheme, host, port) => {
                if default_port(scheme) == Some(*port) {
                    format!("{}://{}", scheme, host)
                } else {
                    format!("{}://{}:{}", scheme, host, port)
                }
            }
        }
    }
}

/// Opaque identifier, one per allocation.
// `u8` is a dummy non-zero-sized type so the allocator hands out a unique
// pointer to compare by.
#[derive(Eq, Clone, Debug)]
pub struct OpaqueOrigin(Arc<u8>);

/// Note that `opaque_origin.clone() == opaque_origin`, but two separately
/// created opaque origins are never equal.
impl PartialEq for OpaqueOrigin {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
