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

//! Action.

use std::fmt;

use crate::http::{Request, Response};
use crate::router::Params;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// Action.
///
/// If a route matches, its action is called with the [`Request`] and the
/// [`Params`] extracted from the path. Actions always answer the request, so
/// middlewares after the route are only reached when no route matched.
///
/// Actions may return anything that converts into a [`Response`], including
/// a [`Writer`][], which is how actions push resources.
///
/// [`Writer`]: crate::http::Writer
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef_serve::handler::{Handler, TryIntoHandler};
/// use chef_serve::http::response::ResponseExt;
/// use chef_serve::http::{Request, Response, Status, Writer};
/// use chef_serve::push;
/// use chef_serve::router::{Params, Router};
///
/// // Create router with action that pushes a stylesheet, if possible
/// let router = Router::new()
///     .get("/", |req: Request, _params: Params| {
///         let mut writer = Writer::new(&req);
///         writer.response = Response::from_text("<html></html>");
///         let _ = push::push_files(&mut writer, ["/style.css"]);
///         writer
///     })
///     .try_into_handler()?;
///
/// // Handle request with router
/// let res = router.handle(Request::new());
/// assert_eq!(res.status, Status::Ok);
/// # Ok(())
/// # }
/// ```
pub trait Action: 'static {
    /// Handles the given request with parameters.
    fn handle(&self, req: Request, params: Params) -> Response;
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl fmt::Debug for Box<dyn Action> {
    /// Formats the action for debugging.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Box<dyn Action>")
    }
}

// ----------------------------------------------------------------------------
// Blanket implementations
// ----------------------------------------------------------------------------

impl<F, R> Action for F
where
    F: Fn(Request, Params) -> R + 'static,
    R: Into<Response>,
{
    #[inline]
    fn handle(&self, req: Request, params: Params) -> Response {
        self(req, params).into()
    }
}
