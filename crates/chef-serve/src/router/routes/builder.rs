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

//! Routes builder.

use std::collections::BTreeMap;

use crate::handler::matcher::{self, Route};
use crate::handler::{Matcher, Result};
use crate::http::Method;
use crate::middleware::TryIntoMiddleware;
use crate::router::Action;

use super::Routes;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Routes builder.
#[allow(clippy::type_complexity)]
#[derive(Debug)]
pub struct Builder {
    /// Map methods to routes, with `None` meaning any method.
    routes: BTreeMap<Option<Method>, Vec<(String, Box<dyn Action>)>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Builder {
    /// Creates a routes builder.
    #[allow(clippy::new_without_default)]
    #[must_use]
    pub fn new() -> Self {
        Self { routes: BTreeMap::new() }
    }

    /// Adds a route for the given method, or any method.
    ///
    /// This method is infallible, as paths are only validated when the routes
    /// are converted into a middleware.
    pub fn add<P, A>(&mut self, method: Option<Method>, path: P, action: A)
    where
        P: Into<String>,
        A: Action,
    {
        self.routes
            .entry(method)
            .or_default()
            .push((path.into(), Box::new(action)));
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl TryIntoMiddleware for Builder {
    type Output = Routes;

    /// Attempts to convert the routes into a middleware.
    ///
    /// Every path is validated as a [`Route`], and must not conflict with any
    /// other route of the same method, which the matcher checks on insertion.
    fn try_into_middleware(self) -> Result<Self::Output> {
        let iter = self.routes.into_iter();
        let iter = iter.map(|(method, items)| -> Result<_> {
            let mut table = Matcher::new();
            for (path, action) in items {
                let route: Route =
                    path.parse().map_err(matcher::Error::from)?;
                table.add(route, action)?;
            }
            Ok((method, table))
        });

        // Collect methods and matchers into an ordered map
        iter.collect::<Result<BTreeMap<_, _>>>()
            .map(|matchers| Routes { matchers })
    }
}
