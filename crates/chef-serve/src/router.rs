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

//! Router.

use super::handler::stack::{self, Stack};
use super::handler::{Result, TryIntoHandler};
use super::http::Method;
use super::middleware::{Middleware, TryIntoMiddleware};

// Re-export for convenient usage with routers
pub use super::handler::matcher::Params;

mod action;
mod routes;

pub use action::Action;
pub use routes::Routes;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Router layer.
///
/// Consecutive middlewares are grouped into stacks, and consecutive routes
/// into a set of routes, so the order in which they're added is preserved.
#[derive(Debug)]
enum Layer {
    /// Stack builder.
    Stack(stack::Builder),
    /// Routes builder.
    Routes(routes::Builder),
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Router.
///
/// Routers associate paths with actions, optionally scoped to a method, and
/// allow to add middlewares before and after routes. Routes are validated
/// when the router is converted into a handler, which answers all requests
/// that no route matched with "404 Not Found".
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use chef_serve::handler::{Handler, TryIntoHandler};
/// use chef_serve::http::response::ResponseExt;
/// use chef_serve::http::{Method, Request, Response, Status};
/// use chef_serve::router::{Params, Router};
///
/// // Create router and add route
/// let router = Router::new()
///     .get("/valid", |_req: Request, _params: Params| {
///         Response::from_text("valid")
///     })
///     .try_into_handler()?;
///
/// // Handle requests with router
/// let res = router.handle(Request::new().uri("/valid"));
/// assert_eq!(res.status, Status::Ok);
/// let res = router.handle(Request::new().uri("/invalid"));
/// assert_eq!(res.status, Status::NotFound);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Router {
    /// Layers.
    layers: Vec<Layer>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Router {
    /// Creates a router.
    #[must_use]
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Adds a route for any method to the router.
    ///
    /// Routes that are added for a specific method take precedence, so this
    /// can be used to provide a fallback for a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::response::ResponseExt;
    /// use chef_serve::http::{Request, Response};
    /// use chef_serve::router::{Params, Router};
    ///
    /// // Create router and add route
    /// let router = Router::new()
    ///     .route("/valid", |_req: Request, _params: Params| {
    ///         Response::from_text("valid")
    ///     });
    /// ```
    #[inline]
    #[must_use]
    pub fn route<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(None, path, action)
    }

    /// Adds a `GET` route to the router.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::http::{Request, Response};
    /// use chef_serve::router::{Params, Router};
    ///
    /// // Create router and add route
    /// let router = Router::new()
    ///     .get("/", |_req: Request, _params: Params| {
    ///         Response::default()
    ///     });
    /// ```
    #[inline]
    #[must_use]
    pub fn get<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(Some(Method::Get), path, action)
    }

    /// Adds a `POST` route to the router.
    #[inline]
    #[must_use]
    pub fn post<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(Some(Method::Post), path, action)
    }

    /// Adds a `PUT` route to the router.
    #[inline]
    #[must_use]
    pub fn put<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(Some(Method::Put), path, action)
    }

    /// Adds a `DELETE` route to the router.
    #[inline]
    #[must_use]
    pub fn delete<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(Some(Method::Delete), path, action)
    }

    /// Adds a `HEAD` route to the router.
    #[inline]
    #[must_use]
    pub fn head<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(Some(Method::Head), path, action)
    }

    /// Adds an `OPTIONS` route to the router.
    #[inline]
    #[must_use]
    pub fn options<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(Some(Method::Options), path, action)
    }

    /// Adds a `PATCH` route to the router.
    #[inline]
    #[must_use]
    pub fn patch<P, A>(self, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        self.add(Some(Method::Patch), path, action)
    }

    /// Adds a middleware to the router.
    ///
    /// Middlewares can be added before or after routes. Those added after
    /// routes only see requests that none of the routes matched.
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::handler::Handler;
    /// use chef_serve::http::{Header, Request};
    /// use chef_serve::router::Router;
    ///
    /// // Create router with middleware
    /// let router = Router::new()
    ///     .with(|req: Request, next: &dyn Handler| {
    ///         next.handle(req).header(Header::Server, "chef")
    ///     });
    /// ```
    #[must_use]
    pub fn with<T>(mut self, middleware: T) -> Self
    where
        T: TryIntoMiddleware,
    {
        if let Some(Layer::Stack(builder)) = self.layers.last_mut() {
            builder.add(middleware);
        } else {
            let mut builder = Stack::new();
            builder.add(middleware);
            self.layers.push(Layer::Stack(builder));
        }
        self
    }

    /// Adds a route for the given method, or any method, to the router.
    fn add<P, A>(mut self, method: Option<Method>, path: P, action: A) -> Self
    where
        P: Into<String>,
        A: Action,
    {
        if let Some(Layer::Routes(builder)) = self.layers.last_mut() {
            builder.add(method, path, action);
        } else {
            let mut builder = Routes::builder();
            builder.add(method, path, action);
            self.layers.push(Layer::Routes(builder));
        }
        self
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl TryIntoMiddleware for Router {
    type Output = Stack;

    /// Attempts to convert the router into a middleware.
    ///
    /// # Errors
    ///
    /// In case a route is invalid or conflicts with another route of the same
    /// method, an [`Error`][] is returned.
    ///
    /// [`Error`]: crate::handler::Error
    fn try_into_middleware(self) -> Result<Self::Output> {
        let iter = self.layers.into_iter().map(|layer| match layer {
            Layer::Stack(builder) => builder
                .try_into_middleware()
                .map(|middleware| Box::new(middleware) as Box<dyn Middleware>),
            Layer::Routes(builder) => builder
                .try_into_middleware()
                .map(|middleware| Box::new(middleware) as Box<dyn Middleware>),
        });

        // Collect middlewares into a stack
        iter.collect()
    }
}

impl TryIntoHandler for Router {
    type Output = Stack;

    /// Attempts to convert the router into a handler.
    ///
    /// # Errors
    ///
    /// In case a route is invalid or conflicts with another route of the same
    /// method, an [`Error`][] is returned.
    ///
    /// [`Error`]: crate::handler::Error
    ///
    /// # Examples
    ///
    /// ```
    /// use chef_serve::handler::TryIntoHandler;
    /// use chef_serve::http::{Request, Response};
    /// use chef_serve::router::{Params, Router};
    ///
    /// // Create router with conflicting routes
    /// let router = Router::new()
    ///     .get("/valid", |_req: Request, _params: Params| Response::new())
    ///     .get("/valid", |_req: Request, _params: Params| Response::new());
    ///
    /// // Conversion fails
    /// assert!(router.try_into_handler().is_err());
    /// ```
    #[inline]
    fn try_into_handler(self) -> Result<Self::Output> {
        self.try_into_middleware()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::handler::{Error, Handler};
    use crate::http::response::ResponseExt;
    use crate::http::{Header, Request, Response, Status};

    use super::*;

    fn text(content: &'static str) -> impl Action {
        move |_req: Request, _params: Params| Response::from_text(content)
    }

    #[test]
    fn test_method_routes_take_precedence() {
        let router = Router::new()
            .route("/valid", text("any"))
            .post("/valid", text("post"))
            .try_into_handler()
            .unwrap();

        let req = Request::new().method(Method::Post).uri("/valid");
        assert_eq!(router.handle(req).body, b"post");
        let req = Request::new().method(Method::Delete).uri("/valid");
        assert_eq!(router.handle(req).body, b"any");
    }

    #[test]
    fn test_method_routes() {
        let router = Router::new()
            .put("/valid", text("put"))
            .delete("/valid", text("delete"))
            .head("/valid", text("head"))
            .options("/valid", text("options"))
            .patch("/valid", text("patch"))
            .try_into_handler()
            .unwrap();

        for (method, body) in [
            (Method::Put, "put"),
            (Method::Delete, "delete"),
            (Method::Head, "head"),
            (Method::Options, "options"),
            (Method::Patch, "patch"),
        ] {
            let req = Request::new().method(method).uri("/valid");
            assert_eq!(router.handle(req).body, body.as_bytes());
        }

        // Methods without a route fall through
        let req = Request::new().method(Method::Get).uri("/valid");
        assert_eq!(router.handle(req).status, Status::NotFound);
    }

    #[test]
    fn test_trailing_slash_matches() {
        let router = Router::new()
            .get("/valid", text("valid"))
            .try_into_handler()
            .unwrap();

        let res = router.handle(Request::new().uri("/valid/"));
        assert_eq!(res.status, Status::Ok);
    }

    #[test]
    fn test_parameters() {
        let router = Router::new()
            .get("/files/{name}", |_req: Request, params: Params| {
                Response::from_text(params.get("name").unwrap_or_default())
            })
            .try_into_handler()
            .unwrap();

        let res = router.handle(Request::new().uri("/files/test.html"));
        assert_eq!(res.body, b"test.html");
    }

    #[test]
    fn test_middlewares_after_routes() {
        let router = Router::new()
            .get("/valid", text("valid"))
            .with(|req: Request, next: &dyn Handler| {
                next.handle(req).header(Header::Server, "fallback")
            })
            .try_into_handler()
            .unwrap();

        let res = router.handle(Request::new().uri("/valid"));
        assert!(!res.headers.contains(Header::Server));
        let res = router.handle(Request::new().uri("/invalid"));
        assert_eq!(res.status, Status::NotFound);
        assert_eq!(res.headers.get(Header::Server), Some("fallback"));
    }

    #[test]
    fn test_invalid_route() {
        let res = Router::new().get("valid", text("")).try_into_handler();
        assert!(matches!(res, Err(Error::Matcher(_))));
    }
}
