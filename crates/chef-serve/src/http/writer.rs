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

//! Response writer.

use std::fmt;

use crate::push::{Preload, Pusher};

use super::request::{Capability, Request};
use super::response::Response;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Response writer.
///
/// A writer is the handle a handler uses to answer a single request. It holds
/// the [`Response`] that is being built and, if the connection supports it, a
/// [`Pusher`] that can push additional resources to the client. Whether there
/// is a pusher is decided by [`Writer::new`] from the [`Capability`] of the
/// request, so the handle is either basic or pushable for its entire life.
///
/// Writers convert into responses, which means handlers and actions can just
/// return them. Pushed resources are handed to the response at that point.
///
/// # Examples
///
/// ```
/// use chef_serve::http::response::ResponseExt;
/// use chef_serve::http::{Capability, Request, Response, Writer};
///
/// // Create request from a connection that supports push
/// let req = Request::new()
///     .uri("/")
///     .capability(Capability::Pushable);
///
/// // Create writer and set response
/// let mut writer = Writer::new(&req);
/// writer.response = Response::from_text("Hello, world!");
/// assert_eq!(writer.capability(), Capability::Pushable);
/// ```
pub struct Writer {
    /// Response being built.
    pub response: Response,
    /// Pusher, if the connection supports push.
    pusher: Option<Box<dyn Pusher>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Writer {
    /// Creates a writer for the given request.
    ///
    /// Requests from pushable connections receive a [`Preload`] pusher, which
    /// announces pushed resources as preload links on the response.
    #[must_use]
    pub fn new(req: &Request) -> Self {
        match req.capability {
            Capability::Basic => Self::basic(),
            Capability::Pushable => Self::pushable(Preload::default()),
        }
    }

    /// Creates a writer that can't push.
    #[must_use]
    pub fn basic() -> Self {
        Self { response: Response::new(), pusher: None }
    }

    /// Creates a writer that pushes with the given pusher.
    #[must_use]
    pub fn pushable<P>(pusher: P) -> Self
    where
        P: Pusher + 'static,
    {
        Self {
            response: Response::new(),
            pusher: Some(Box::new(pusher)),
        }
    }

    /// Returns the capability of the writer.
    #[inline]
    #[must_use]
    pub fn capability(&self) -> Capability {
        if self.pusher.is_some() {
            Capability::Pushable
        } else {
            Capability::Basic
        }
    }

    /// Returns the pusher, if the writer is pushable.
    #[inline]
    pub fn pusher(&mut self) -> Option<&mut dyn Pusher> {
        self.pusher
            .as_mut()
            .map(|pusher| &mut **pusher as &mut dyn Pusher)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl From<Writer> for Response {
    /// Finishes the writer and returns the response.
    fn from(writer: Writer) -> Self {
        let Writer { mut response, pusher } = writer;
        if let Some(mut pusher) = pusher {
            pusher.finish(&mut response);
        }
        response
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for Writer {
    /// Formats the writer for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("response", &self.response)
            .field("capability", &self.capability())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::http::{Header, Request};

    use super::*;

    #[test]
    fn test_capability_follows_request() {
        let req = Request::new();
        assert_eq!(Writer::new(&req).capability(), Capability::Basic);

        let req = Request::new().capability(Capability::Pushable);
        assert_eq!(Writer::new(&req).capability(), Capability::Pushable);
    }

    #[test]
    fn test_basic_writer_has_no_pusher() {
        let mut writer = Writer::basic();
        assert!(writer.pusher().is_none());
    }

    #[test]
    fn test_finish_hands_pushes_to_response() {
        let req = Request::new().capability(Capability::Pushable);
        let mut writer = Writer::new(&req);
        if let Some(pusher) = writer.pusher() {
            pusher.push("/style.css").expect("valid target");
        }
        let res = Response::from(writer);
        assert_eq!(
            res.headers.get(Header::Link),
            Some("</style.css>; rel=preload; as=style")
        );
    }
}
