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

//! Server push error.

use std::{io, result};
use thiserror::Error;

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Server push error.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection doesn't support push.
    #[error("push capability unavailable")]
    Unsupported,

    /// Path could not be resolved.
    #[error("could not resolve path '{path}'")]
    PathResolution {
        /// File reference as given.
        path: String,
        /// Underlying cause.
        source: io::Error,
    },

    /// Transport rejected the push.
    #[error("could not push '{path}'")]
    PushFailed {
        /// File reference as given.
        path: String,
        /// Underlying cause.
        source: Rejection,
    },
}

/// Push rejection.
///
/// Rejections are raised by a [`Pusher`][] when it refuses to push a single
/// resource, and are carried as the cause of [`Error::PushFailed`].
///
/// [`Pusher`]: crate::push::Pusher
#[derive(Debug, Error)]
pub enum Rejection {
    /// Push limit reached.
    #[error("push limit of {0} reached")]
    Limit(usize),

    /// Push target is invalid.
    #[error("invalid push target")]
    InvalidTarget,

    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

// ----------------------------------------------------------------------------
// Type aliases
// ----------------------------------------------------------------------------

/// Server push result.
pub type Result<T = ()> = result::Result<T, Error>;
