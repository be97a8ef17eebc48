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

//! HTTP request URI.

use percent_encoding::{AsciiSet, percent_decode_str, utf8_percent_encode};
use std::borrow::Cow;
use std::fmt;

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Characters that must be percent-encoded in a path.
#[rustfmt::skip]
pub(crate) const PATH: &AsciiSet = &percent_encoding::CONTROLS
    .add(b' ').add(b'"').add(b'#').add(b'%').add(b'<').add(b'>').add(b'?')
    .add(b'[').add(b']').add(b'^').add(b'`').add(b'{').add(b'|').add(b'}');

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request URI.
///
/// The path is percent-decoded when the URI is parsed, and encoded again when
/// it's formatted for display, which is what redirects rely on. The query is
/// kept verbatim, since none of our handlers need to look into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Uri<'a> {
    /// Decoded path.
    pub path: Cow<'a, str>,
    /// Raw query string, without the leading `?`.
    pub query: Option<Cow<'a, str>>,
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl<'a> From<&'a str> for Uri<'a> {
    /// Creates a URI from a request target.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::Uri;
    ///
    /// // Create URI from request target
    /// let uri = Uri::from("/a%20b?c=d");
    /// assert_eq!(uri.path, "/a b");
    /// assert_eq!(uri.query.as_deref(), Some("c=d"));
    /// ```
    fn from(value: &'a str) -> Self {
        let (path, query) = match value.split_once('?') {
            Some((path, query)) => (path, Some(Cow::Borrowed(query))),
            None => (value, None),
        };
        Uri {
            path: percent_decode_str(path).decode_utf8_lossy(),
            query,
        }
    }
}

impl From<String> for Uri<'_> {
    /// Creates a URI from an owned request target.
    fn from(value: String) -> Self {
        let Uri { path, query } = Uri::from(value.as_str());
        Uri {
            path: Cow::Owned(path.into_owned()),
            query: query.map(|query| Cow::Owned(query.into_owned())),
        }
    }
}

// ----------------------------------------------------------------------------

impl Default for Uri<'_> {
    /// Creates the root URI.
    #[inline]
    fn default() -> Self {
        Uri { path: Cow::Borrowed("/"), query: None }
    }
}

// ----------------------------------------------------------------------------

impl fmt::Display for Uri<'_> {
    /// Formats the URI for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::Uri;
    ///
    /// // Format URI, encoding the path again
    /// let uri = Uri::from("/a%20b?c=d");
    /// assert_eq!(uri.to_string(), "/a%20b?c=d");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Cow<'_, str> = utf8_percent_encode(&self.path, PATH).into();
        f.write_str(&path)?;

        // Write query string, if any
        if let Some(query) = &self.query {
            f.write_str("?")?;
            f.write_str(query)?;
        }

        // No errors occurred
        Ok(())
    }
}
