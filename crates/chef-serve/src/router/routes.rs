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

//! Routes.

use std::collections::BTreeMap;

use crate::handler::matcher::{Match, Matcher};
use crate::handler::Handler;
use crate::http::{Method, Request, Response};
use crate::middleware::Middleware;

use super::action::Action;

mod builder;

pub use builder::Builder;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Routes.
///
/// Routes are compiled into one matcher per method, plus one for routes that
/// apply to any method, which is only consulted when the method-specific one
/// didn't match.
#[derive(Debug)]
pub struct Routes {
    /// Map methods to matchers, with `None` meaning any method.
    matchers: BTreeMap<Option<Method>, Matcher<Box<dyn Action>>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Routes {
    /// Creates a routes builder.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Middleware for Routes {
    /// Processes the given request.
    ///
    /// If a route matches, its action answers the request. Otherwise, the
    /// request is forwarded to the next handler.
    fn process(&self, req: Request, next: &dyn Handler) -> Response {
        // If the path is borrowed, which is the normal case for parsing, this
        // only clones the reference, so the request can be moved on
        let path = req.uri.path.clone();

        // Routes never end with a slash, so neither must the path
        let path = if path == "/" {
            path.as_ref()
        } else {
            path.trim_end_matches('/')
        };

        // Method-specific routes take precedence
        for method in [Some(req.method), None] {
            let Some(matcher) = self.matchers.get(&method) else {
                continue;
            };
            if let Some(Match { data: action, params }) = matcher.resolve(path)
            {
                return action.handle(req, params);
            }
        }

        // Forward to next handler
        next.handle(req)
    }
}
