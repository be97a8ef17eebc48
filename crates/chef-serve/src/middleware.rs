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

//! Middleware.

use std::fmt;

use super::handler::Handler;
use super::http::{Request, Response};

mod convert;

pub use convert::TryIntoMiddleware;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Middleware.
///
/// Middlewares are layers of request processing. They can modify or answer a
/// [`Request`], or forward it to the next [`Handler`], which is either the
/// next middleware or the end of the chain. Besides closures that match the
/// signature of [`Middleware::process`], this trait is implemented by:
///
/// - [`Stack`][]: Stack of middlewares.
/// - [`Routes`][]: Routes of a router.
///
/// [`Routes`]: crate::router::Routes
/// [`Stack`]: crate::handler::Stack
pub trait Middleware: 'static {
    /// Processes the given request.
    ///
    /// Request processing is infallible, which means that errors must always
    /// be handled gracefully, e.g., by answering with an error status.
    ///
    /// # Examples
    ///
    /// This example shows a middleware that adds a `Cache-Control` header to
    /// all responses of the next handler.
    ///
    /// ```
    /// use chef_serve::handler::{Handler, NotFound};
    /// use chef_serve::http::{Header, Request, Response};
    /// use chef_serve::middleware::Middleware;
    ///
    /// // Define middleware
    /// struct NoCache;
    ///
    /// // Create middleware implementation
    /// impl Middleware for NoCache {
    ///     fn process(&self, req: Request, next: &dyn Handler) -> Response {
    ///         next.handle(req).header(Header::CacheControl, "no-cache")
    ///     }
    /// }
    ///
    /// // Handle request with middleware
    /// let res = NoCache.process(Request::new(), &NotFound);
    /// assert_eq!(res.headers.get(Header::CacheControl), Some("no-cache"));
    /// ```
    fn process(&self, req: Request, next: &dyn Handler) -> Response;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for Box<dyn Middleware> {
    /// Formats the middleware for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Box<dyn Middleware>")
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, R> Middleware for F
where
    F: Fn(Request, &dyn Handler) -> R + 'static,
    R: Into<Response>,
{
    #[inline]
    fn process(&self, req: Request, next: &dyn Handler) -> Response {
        self(req, next).into()
    }
}
