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

//! Handler.

use std::fmt;

use super::http::response::ResponseExt;
use super::http::{Request, Response, Status};

mod convert;
mod error;
pub mod matcher;
mod redirect;
pub mod stack;

pub use convert::TryIntoHandler;
pub use error::{Error, Result};
pub use matcher::Matcher;
pub use redirect::RedirectHttps;
pub use stack::Stack;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Handler.
///
/// Handlers are the executable end of a request processing chain. Every given
/// [`Request`] is answered with a [`Response`], so there's no next handler to
/// defer to. Handlers live on the thread that drives the server, which is why
/// they're not required to be [`Send`].
pub trait Handler {
    /// Handles the given request.
    ///
    /// This method is invoked with a request and is required to return a
    /// response. It must be infallible and should not panic.
    ///
    /// # Examples
    ///
    /// This example shows how to implement a handler that answers requests
    /// for `/valid` with "200 OK", and all other requests with "404 Not Found".
    /// Note that for routing, using a [`Router`][] is usually a better choice.
    ///
    /// [`Router`]: crate::router::Router
    ///
    /// ```
    /// use chef_serve::handler::Handler;
    /// use chef_serve::http::response::ResponseExt;
    /// use chef_serve::http::{Request, Response, Status};
    ///
    /// // Define handler
    /// struct Valid;
    ///
    /// // Create handler implementation
    /// impl Handler for Valid {
    ///     fn handle(&self, req: Request) -> Response {
    ///         if req.uri.path == "/valid" {
    ///             Response::from_status(Status::Ok)
    ///         } else {
    ///             Response::from_status(Status::NotFound)
    ///         }
    ///     }
    /// }
    ///
    /// // Handle request with handler
    /// let res = Valid.handle(Request::new().uri("/valid"));
    /// assert_eq!(res.status, Status::Ok);
    /// ```
    fn handle(&self, req: Request) -> Response;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Fallback handler.
///
/// This handler always returns "404 Not Found", and is the fallback at the
/// end of every [`Stack`] and [`Router`][].
///
/// [`Router`]: crate::router::Router
#[derive(Clone, Copy, Debug, Default)]
pub struct NotFound;

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Handler for NotFound {
    /// Handles the given request.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::handler::{Handler, NotFound};
    /// use chef_serve::http::{Method, Request, Status};
    ///
    /// // Create request
    /// let req = Request::new()
    ///     .method(Method::Get)
    ///     .uri("/invalid");
    ///
    /// // Handle request with handler
    /// let res = NotFound.handle(req);
    /// assert_eq!(res.status, Status::NotFound);
    /// ```
    #[inline]
    fn handle(&self, _req: Request) -> Response {
        Response::from_status(Status::NotFound)
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for Box<dyn Handler> {
    /// Formats the handler for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Box<dyn Handler>")
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, R> Handler for F
where
    F: Fn(Request) -> R,
    R: Into<Response>,
{
    #[inline]
    fn handle(&self, req: Request) -> Response {
        self(req).into()
    }
}
