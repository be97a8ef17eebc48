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

//! Stack.

use crate::handler::{Handler, NotFound};
use crate::http::{Request, Response};
use crate::middleware::Middleware;

mod builder;

pub use builder::Builder;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Stack.
///
/// Stacks compose multiple middlewares into one, passing the request from one
/// middleware to the next, until one of them answers it. If the request falls
/// through all middlewares, it's answered with "404 Not Found" when the stack
/// is used as a handler, or passed on to the next handler when the stack is
/// itself used as a middleware.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef_serve::handler::{Handler, Stack, TryIntoHandler};
/// use chef_serve::http::response::ResponseExt;
/// use chef_serve::http::{Request, Response, Status};
///
/// // Create stack with middleware
/// let stack = Stack::new()
///     .with(|req: Request, next: &dyn Handler| {
///         if req.uri.path == "/valid" {
///             Response::from_status(Status::Ok)
///         } else {
///             next.handle(req)
///         }
///     })
///     .try_into_handler()?;
///
/// // Handle requests with stack
/// let res = stack.handle(Request::new().uri("/valid"));
/// assert_eq!(res.status, Status::Ok);
/// let res = stack.handle(Request::new().uri("/invalid"));
/// assert_eq!(res.status, Status::NotFound);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Stack {
    /// Middlewares.
    middlewares: Vec<Box<dyn Middleware>>,
}

/// Stack handler.
///
/// Keeps track of the middlewares that haven't been invoked yet, and of the
/// handler to invoke once none are left.
struct StackHandler<'a> {
    /// Remaining middlewares.
    middlewares: &'a [Box<dyn Middleware>],
    /// Next handler.
    next: &'a dyn Handler,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Stack {
    /// Creates a stack builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::handler::Stack;
    ///
    /// // Create stack
    /// let stack = Stack::new();
    /// ```
    #[allow(clippy::new_ret_no_self)]
    #[must_use]
    pub fn new() -> Builder {
        Builder::new()
    }
}

#[allow(clippy::must_use_candidate)]
impl Stack {
    /// Returns the number of middlewares.
    #[inline]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns whether there are any middlewares.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for Stack {
    /// Processes the given request, starting with the first middleware.
    fn process(&self, req: Request, next: &dyn Handler) -> Response {
        let handler = StackHandler {
            middlewares: &self.middlewares,
            next,
        };
        handler.handle(req)
    }
}

// ----------------------------------------------------------------------------

impl Handler for Stack {
    /// Handles the given request, passing it through the entire stack.
    #[inline]
    fn handle(&self, req: Request) -> Response {
        self.process(req, &NotFound)
    }
}

impl Handler for StackHandler<'_> {
    /// Handles the given request with the next middleware, if any.
    fn handle(&self, req: Request) -> Response {
        match self.middlewares {
            [] => self.next.handle(req),
            [middleware, middlewares @ ..] => {
                let next = StackHandler { middlewares, next: self.next };
                middleware.process(req, &next)
            }
        }
    }
}

// ----------------------------------------------------------------------------

impl FromIterator<Box<dyn Middleware>> for Stack {
    /// Creates a stack from an iterator.
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Box<dyn Middleware>>,
    {
        Self { middlewares: Vec::from_iter(iter) }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::handler::TryIntoHandler;
    use crate::http::{Header, Status};

    use super::*;

    #[test]
    fn test_middlewares_run_in_order() {
        let stack = Stack::new()
            .with(|req: Request, next: &dyn Handler| {
                next.handle(req).header(Header::Server, "outer")
            })
            .with(|req: Request, next: &dyn Handler| {
                let res = next.handle(req);
                assert_eq!(res.headers.get(Header::Server), None);
                res.header(Header::Server, "inner")
            })
            .try_into_handler()
            .unwrap();

        let res = stack.handle(Request::new());
        assert_eq!(res.status, Status::NotFound);
        assert_eq!(res.headers.get(Header::Server), Some("outer"));
    }

    #[test]
    fn test_nested_stack_falls_through() {
        let inner = Stack::new().with(|req: Request, next: &dyn Handler| {
            next.handle(req).header(Header::Server, "inner")
        });
        let stack = Stack::new().with(inner).try_into_handler().unwrap();
        assert_eq!(stack.len(), 1);

        let res = stack.handle(Request::new());
        assert_eq!(res.status, Status::NotFound);
        assert_eq!(res.headers.get(Header::Server), Some("inner"));
    }
}
