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

//! Stack builder.

use crate::handler::{Result, TryIntoHandler};
use crate::middleware::{Middleware, TryIntoMiddleware};

use super::Stack;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Stack builder.
///
/// Middlewares are converted as soon as they're added, but errors are held
/// back until the builder itself is converted, which keeps [`Builder::with`]
/// infallible. The first error wins.
#[derive(Debug)]
pub struct Builder {
    /// Converted middlewares.
    middlewares: Vec<Result<Box<dyn Middleware>>>,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Builder {
    /// Creates a stack builder.
    ///
    /// Note that the canonical way to create a [`Stack`] is to invoke the
    /// [`Stack::new`] method, which creates an instance of [`Builder`].
    #[allow(clippy::new_without_default)]
    #[must_use]
    pub fn new() -> Self {
        Self { middlewares: Vec::new() }
    }

    /// Extends the stack with the given middleware.
    ///
    /// Anything that can be converted into a [`Middleware`] can be added to
    /// the stack, including closures, stacks and routers.
    #[inline]
    #[must_use]
    pub fn with<T>(mut self, middleware: T) -> Self
    where
        T: TryIntoMiddleware,
    {
        self.add(middleware);
        self
    }

    /// Adds a middleware to the stack.
    pub fn add<T>(&mut self, middleware: T)
    where
        T: TryIntoMiddleware,
    {
        self.middlewares.push(
            middleware
                .try_into_middleware()
                .map(|middleware| Box::new(middleware) as Box<dyn Middleware>),
        );
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl TryIntoMiddleware for Builder {
    type Output = Stack;

    /// Attempts to convert the stack into a middleware.
    ///
    /// # Errors
    ///
    /// The first error that occurred while adding middlewares is returned.
    fn try_into_middleware(self) -> Result<Self::Output> {
        self.middlewares.into_iter().collect()
    }
}

impl TryIntoHandler for Builder {
    type Output = Stack;

    /// Attempts to convert the stack into a handler.
    ///
    /// # Errors
    ///
    /// The first error that occurred while adding middlewares is returned.
    #[inline]
    fn try_into_handler(self) -> Result<Self::Output> {
        self.try_into_middleware()
    }
}
