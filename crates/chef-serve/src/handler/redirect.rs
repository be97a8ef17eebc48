// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! HTTPS redirect handler.

use tracing::debug;

use crate::http::response::ResponseExt;
use crate::http::{Request, Response};

use super::Handler;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTPS redirect handler.
///
/// This handler answers every request with "301 Moved Permanently", pointing
/// the client to the same request target on the given base, which is usually
/// the origin of a TLS-enabled server. It's meant to be served on the plain
/// HTTP port next to such a server.
///
/// # Examples
///
/// ```
/// use chef_serve::handler::{Handler, RedirectHttps};
/// use chef_serve::http::{Header, Request, Status};
///
/// // Create handler
/// let handler = RedirectHttps::new("https://localhost:8443");
///
/// // Handle request with handler
/// let res = handler.handle(Request::new().uri("/push?x=1"));
/// assert_eq!(res.status, Status::MovedPermanently);
/// assert_eq!(
///     res.headers.get(Header::Location),
///     Some("https://localhost:8443/push?x=1")
/// );
/// ```
#[derive(Clone, Debug)]
pub struct RedirectHttps {
    /// Base to redirect to, without trailing slash.
    base: String,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl RedirectHttps {
    /// Creates an HTTPS redirect handler.
    pub fn new<B>(base: B) -> Self
    where
        B: Into<String>,
    {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for RedirectHttps {
    /// Handles the given request.
    fn handle(&self, req: Request) -> Response {
        let location = format!("{}{}", self.base, req.uri);
        debug!(location = %location, "redirecting to https");
        Response::redirect_permanent(location)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::http::{Header, Status};

    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let handler = RedirectHttps::new("https://example.com/");
        let res = handler.handle(Request::new().uri("/a%20b"));
        assert_eq!(res.status, Status::MovedPermanently);
        assert_eq!(
            res.headers.get(Header::Location),
            Some("https://example.com/a%20b")
        );
    }
}
