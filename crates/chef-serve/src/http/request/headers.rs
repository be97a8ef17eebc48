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
// ----------------------------------------------------------------------------

//! HTTP request headers.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::http::Header;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// HTTP request headers.
///
/// Parsed requests borrow header values from the connection buffer. Clients
/// may send a header more than once, in which case the values are combined
/// into a single comma-separated list, which is only then owned. For list
/// headers like `Connection`, [`Headers::has_token`] looks at the items.
#[derive(Clone, Debug, Default)]
pub struct Headers<'a> {
    /// Values by header.
    values: BTreeMap<Header, Cow<'a, str>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl<'a> Headers<'a> {
    /// Creates a header map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { values: BTreeMap::new() }
    }

    /// Returns the value of the given header.
    #[inline]
    #[must_use]
    pub fn get(&self, header: Header) -> Option<&str> {
        self.values.get(&header).map(AsRef::as_ref)
    }

    /// Returns whether the given header was sent.
    #[inline]
    #[must_use]
    pub fn contains(&self, header: Header) -> bool {
        self.values.contains_key(&header)
    }

    /// Returns whether a list header contains the given token.
    ///
    /// Tokens are compared case-insensitively, and surrounding whitespace of
    /// list items is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::request::Headers;
    /// use chef_serve::http::Header;
    ///
    /// // Create header map and check for token
    /// let mut headers = Headers::new();
    /// headers.add(Header::Connection, "keep-alive, Close");
    /// assert!(headers.has_token(Header::Connection, "close"));
    /// ```
    #[must_use]
    pub fn has_token(&self, header: Header, token: &str) -> bool {
        self.get(header).is_some_and(|value| {
            value
                .split(',')
                .any(|item| item.trim().eq_ignore_ascii_case(token))
        })
    }

    /// Adds a value for the given header.
    ///
    /// If the header is already present, the value is appended to the list.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::request::Headers;
    /// use chef_serve::http::Header;
    ///
    /// // Create header map and add the same header twice
    /// let mut headers = Headers::new();
    /// headers.add(Header::Accept, "text/html");
    /// headers.add(Header::Accept, "text/css");
    /// assert_eq!(headers.get(Header::Accept), Some("text/html, text/css"));
    /// ```
    pub fn add<V>(&mut self, header: Header, value: V)
    where
        V: Into<Cow<'a, str>>,
    {
        let value = value.into();
        match self.values.get_mut(&header) {
            Some(current) => {
                let current = current.to_mut();
                current.push_str(", ");
                current.push_str(&value);
            }
            None => {
                self.values.insert(header, value);
            }
        }
    }

    /// Replaces the value of the given header.
    #[inline]
    pub fn set<V>(&mut self, header: Header, value: V)
    where
        V: Into<Cow<'a, str>>,
    {
        self.values.insert(header, value.into());
    }
}

#[allow(clippy::must_use_candidate)]
impl Headers<'_> {
    /// Returns the number of distinct headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether no headers were sent.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Display for Headers<'_> {
    /// Formats the header map for display.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.values
            .iter()
            .try_for_each(|(header, value)| write!(f, "{header}: {value}\r\n"))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_borrowed_single_value() {
        let mut headers = Headers::new();
        headers.add(Header::Host, "localhost");
        assert!(matches!(
            headers.values.get(&Header::Host),
            Some(Cow::Borrowed("localhost"))
        ));
    }

    #[test]
    fn test_set_replaces_list() {
        let mut headers = Headers::new();
        headers.add(Header::Connection, "keep-alive");
        headers.add(Header::Connection, "upgrade");
        headers.set(Header::Connection, "close");
        assert_eq!(headers.get(Header::Connection), Some("close"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_has_token_ignores_partial_matches() {
        let mut headers = Headers::new();
        headers.add(Header::Connection, "closed");
        assert!(!headers.has_token(Header::Connection, "close"));
        assert!(!headers.has_token(Header::Host, "close"));
    }
}
