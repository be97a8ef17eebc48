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

//! HTTP request.

use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path};
use std::str::{self, FromStr};

use super::component::{Header, Method, Status};

mod capability;
mod error;
mod headers;
mod uri;

pub use capability::Capability;
pub use error::{Error, Result};
pub use headers::Headers;
pub use uri::Uri;
pub(crate) use uri::PATH;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Maximum size of a request, including headers and body.
const MAX_REQUEST_SIZE: usize = 8 * 1024 * 1024;

/// Maximum length of the request target.
const MAX_URI_LENGTH: usize = 2 * 1024;

/// Maximum length of a single header value.
const MAX_HEADER_LENGTH: usize = 4 * 1024;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request.
///
/// Requests are usually obtained from [`Request::from_bytes`], which borrows
/// from the connection's read buffer, so parsing allocates as little as
/// possible. The server stamps every parsed request with the [`Capability`]
/// of the connection it arrived on, before passing it to the handler.
///
/// # Examples
///
/// ```
/// use chef_serve::http::{Method, Request};
///
/// // Create request
/// let req = Request::new()
///     .method(Method::Get)
///     .uri("/valid");
/// ```
#[derive(Clone, Debug)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Request URI.
    pub uri: Uri<'a>,
    /// Request headers.
    pub headers: Headers<'a>,
    /// Request body.
    pub body: Cow<'a, [u8]>,
    /// Capability of the connection the request arrived on.
    pub capability: Capability,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Request<'a> {
    /// Creates a request.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::Request;
    ///
    /// // Create request
    /// let req = Request::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request from the given bytes.
    ///
    /// Parsing is done with [`httparse`], after which the request is validated
    /// against size limits and path traversal attempts. If the request carries
    /// a `Content-Length` header, parsing only completes once the entire body
    /// has been received, and the body is cut to exactly that length. Chunked
    /// request bodies are not supported.
    ///
    /// The returned request always has [`Capability::Basic`], as only the
    /// connection knows what the transport supports.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Incomplete`], if more data is necessary,
    /// [`Error::Parser`], if the buffer contains malformed data, and
    /// [`Error::Validation`], if a limit is exceeded or the request is not
    /// acceptable for another reason.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use chef_serve::http::{Capability, Method, Request};
    ///
    /// // Create request from bytes
    /// let req = Request::from_bytes(b"GET /valid HTTP/1.1\r\n\r\n")?;
    /// assert_eq!(req.method, Method::Get);
    /// assert_eq!(req.uri.path, "/valid");
    /// assert_eq!(req.capability, Capability::Basic);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::missing_panics_doc)]
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() > MAX_REQUEST_SIZE {
            return Err(Error::Validation(Status::PayloadTooLarge));
        }

        // Initialize buffer for headers and request parser
        let mut headers = [httparse::EMPTY_HEADER; 64];
        let mut req = httparse::Request::new(&mut headers);
        let n = match req.parse(bytes)? {
            httparse::Status::Partial => return Err(Error::Incomplete),
            httparse::Status::Complete(n) => n,
        };

        // Once parsing completed, method and path are guaranteed to be set
        let method = Method::from_str(req.method.expect("invariant"))?;
        let path = req.path.expect("invariant");
        if path.len() > MAX_URI_LENGTH {
            return Err(Error::Validation(Status::UriTooLong));
        }

        // Proxy requests are not supported, so the path must start with a
        // slash, and must not try to escape the root after decoding
        let uri = Uri::from(path);
        if !uri.path.starts_with('/') {
            return Err(Error::Validation(Status::BadRequest));
        }
        if uri.path.contains("..") {
            let mut iter = Path::new(uri.path.as_ref()).components();
            if iter.any(|component| component == Component::ParentDir) {
                return Err(Error::Validation(Status::BadRequest));
            }
        }

        // Collect known headers, skipping unknown ones and values that are not
        // valid UTF-8, but rejecting values that exceed the length limit
        let mut map = Headers::new();
        for header in req.headers.iter() {
            if header.value.len() > MAX_HEADER_LENGTH {
                let status = Status::RequestHeaderFieldsTooLarge;
                return Err(Error::Validation(status));
            }
            let Ok(name) = Header::from_str(header.name) else {
                continue;
            };
            if let Ok(value) = str::from_utf8(header.value) {
                map.add(name, value);
            }
        }

        // We don't implement chunked decoding, so refuse it early
        if map.contains(Header::TransferEncoding) {
            return Err(Error::Validation(Status::NotImplemented));
        }

        // Wait for the entire body, if its length is known
        let body = &bytes[n..];
        let body = match map.get(Header::ContentLength) {
            None => body,
            Some(value) => {
                let Ok(length) = value.trim().parse::<usize>() else {
                    return Err(Error::Validation(Status::BadRequest));
                };
                if body.len() < length {
                    return Err(Error::Incomplete);
                }
                &body[..length]
            }
        };

        // Return request
        Ok(Request {
            method,
            uri,
            headers: map,
            body: Cow::Borrowed(body),
            capability: Capability::Basic,
        })
    }

    /// Returns whether the client asked to close the connection.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::{Header, Request};
    ///
    /// // Create request asking to close the connection
    /// let req = Request::new()
    ///     .header(Header::Connection, "close");
    /// assert!(req.is_close());
    /// ```
    #[must_use]
    pub fn is_close(&self) -> bool {
        self.headers.has_token(Header::Connection, "close")
    }
}

impl<'a> Request<'a> {
    /// Sets the method of the request.
    #[inline]
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the URI of the request.
    #[inline]
    #[must_use]
    pub fn uri<U>(mut self, uri: U) -> Self
    where
        U: Into<Uri<'a>>,
    {
        self.uri = uri.into();
        self
    }

    /// Adds a header to the request.
    #[allow(clippy::needless_pass_by_value)]
    #[inline]
    #[must_use]
    pub fn header<V>(mut self, header: Header, value: V) -> Self
    where
        V: ToString,
    {
        self.headers.add(header, value.to_string());
        self
    }

    /// Sets the body of the request.
    #[inline]
    #[must_use]
    pub fn body<B>(mut self, body: B) -> Self
    where
        B: Into<Vec<u8>>,
    {
        self.body = Cow::Owned(body.into());
        self
    }

    /// Sets the capability of the request.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::{Capability, Request};
    ///
    /// // Create request from a connection that supports push
    /// let req = Request::new()
    ///     .capability(Capability::Pushable);
    /// ```
    #[inline]
    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Request<'_> {
    /// Creates a default request.
    #[inline]
    fn default() -> Self {
        Self {
            method: Method::Get,
            uri: Uri::default(),
            headers: Headers::default(),
            body: Cow::Borrowed(&[]),
            capability: Capability::default(),
        }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Request<'_> {
    /// Formats the request for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} HTTP/1.1\r\n", self.method, self.uri)?;
        write!(f, "{}\r\n", self.headers)?;
        write!(f, "[Body: {} bytes]\r\n", self.body.len())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_headers() {
        let res = Request::from_bytes(b"GET /valid HTTP/1.1\r\nHost: x");
        assert!(matches!(res, Err(Error::Incomplete)));
    }

    #[test]
    fn test_incomplete_body() {
        let bytes = b"POST / HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        let res = Request::from_bytes(bytes);
        assert!(matches!(res, Err(Error::Incomplete)));
    }

    #[test]
    fn test_body_is_cut_to_length() {
        let bytes = b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef";
        let req = Request::from_bytes(bytes).expect("complete request");
        assert_eq!(req.body.as_ref(), b"abc");
    }

    #[test]
    fn test_rejects_traversal() {
        let bytes = b"GET /a/%2e%2e/b HTTP/1.1\r\n\r\n";
        let res = Request::from_bytes(bytes);
        assert!(matches!(res, Err(Error::Validation(Status::BadRequest))));
    }

    #[test]
    fn test_rejects_chunked() {
        let bytes = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n";
        let res = Request::from_bytes(bytes);
        assert!(matches!(
            res,
            Err(Error::Validation(Status::NotImplemented))
        ));
    }

    #[test]
    fn test_skips_unknown_headers() {
        let bytes = b"GET / HTTP/1.1\r\nX-Custom: 1\r\nHost: localhost\r\n\r\n";
        let req = Request::from_bytes(bytes).expect("complete request");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.headers.get(Header::Host), Some("localhost"));
    }

    #[test]
    fn test_repeated_connection_header() {
        let bytes = b"GET / HTTP/1.1\r\nConnection: keep-alive\r\n\
                      Connection: Close\r\n\r\n";
        let req = Request::from_bytes(bytes).expect("complete request");
        let value = req.headers.get(Header::Connection);
        assert_eq!(value, Some("keep-alive, Close"));
        assert!(req.is_close());
    }
}
